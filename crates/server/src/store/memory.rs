use std::collections::BTreeSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{
    CatalogRow, LikeRow, NewWorkoutExercise, StoreError, WorkoutDetail, WorkoutExerciseRow,
    WorkoutFields, WorkoutRow, WorkoutStore,
};

/// Keeps all data in process memory.
///
/// Every operation holds the lock for its whole duration, so a like is applied atomically.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    workouts: Vec<WorkoutRow>,
    workout_exercises: Vec<WorkoutExerciseRow>,
    exercises: Vec<CatalogRow>,
    last_workout_id: i64,
    last_workout_exercise_id: i64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_exercises(exercises: Vec<CatalogRow>) -> Self {
        Self {
            state: Mutex::new(State {
                exercises,
                ..State::default()
            }),
        }
    }
}

impl State {
    fn catalog_entry(&self, exercise_id: &str) -> Option<&CatalogRow> {
        self.exercises.iter().find(|e| e.id == exercise_id)
    }

    fn detail_rows(&self, workout_id: i64) -> Vec<WorkoutExerciseRow> {
        let mut rows = self
            .workout_exercises
            .iter()
            .filter(|row| row.workout_id == workout_id)
            .map(|row| {
                let entry = self.catalog_entry(&row.exercise_id);
                WorkoutExerciseRow {
                    name: row.name.clone().or_else(|| entry.map(|e| e.name.clone())),
                    category: row
                        .category
                        .clone()
                        .or_else(|| entry.and_then(|e| e.category.clone())),
                    equipment: row
                        .equipment
                        .clone()
                        .or_else(|| entry.and_then(|e| e.equipment.clone())),
                    ..row.clone()
                }
            })
            .collect::<Vec<_>>();
        rows.sort_by_key(|row| (row.position, row.sets, row.id));
        rows
    }

    fn counted(&self, workout: &WorkoutRow) -> WorkoutRow {
        let positions = self
            .workout_exercises
            .iter()
            .filter(|row| row.workout_id == workout.id)
            .map(|row| row.position)
            .collect::<BTreeSet<_>>();
        WorkoutRow {
            exercise_count: Some(i64::try_from(positions.len()).unwrap_or(i64::MAX)),
            ..workout.clone()
        }
    }

    fn sorted_workouts(&self, filter: impl Fn(&WorkoutRow) -> bool) -> Vec<WorkoutRow> {
        let mut workouts = self
            .workouts
            .iter()
            .filter(|w| filter(w))
            .map(|w| self.counted(w))
            .collect::<Vec<_>>();
        workouts.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        workouts
    }
}

#[async_trait]
impl WorkoutStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn workouts(&self) -> Result<Vec<WorkoutRow>, StoreError> {
        Ok(self.state.lock().await.sorted_workouts(|_| true))
    }

    async fn workout(&self, id: i64) -> Result<Option<WorkoutDetail>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .workouts
            .iter()
            .find(|w| w.id == id)
            .map(|workout| WorkoutDetail {
                workout: workout.clone(),
                exercises: state.detail_rows(id),
            }))
    }

    async fn workouts_by_category(&self, category: &str) -> Result<Vec<WorkoutRow>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.sorted_workouts(|w| {
            state
                .detail_rows(w.id)
                .iter()
                .filter_map(|row| row.category.as_deref())
                .any(|c| c.eq_ignore_ascii_case(category))
        }))
    }

    async fn exercises(&self) -> Result<Vec<CatalogRow>, StoreError> {
        let mut exercises = self.state.lock().await.exercises.clone();
        exercises.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(exercises)
    }

    async fn exercises_by_category(&self, category: &str) -> Result<Vec<CatalogRow>, StoreError> {
        Ok(self
            .exercises()
            .await?
            .into_iter()
            .filter(|e| e.category.as_deref() == Some(category))
            .collect())
    }

    async fn create_workout(&self, fields: WorkoutFields) -> Result<WorkoutRow, StoreError> {
        let mut state = self.state.lock().await;
        state.last_workout_id += 1;
        let workout = WorkoutRow {
            id: state.last_workout_id,
            user_id: fields.user_id,
            title: fields.title,
            description: fields.description,
            date: fields.date,
            duration_minutes: fields.duration_minutes,
            likes: 0,
            exercise_count: None,
        };
        state.workouts.push(workout.clone());
        Ok(workout)
    }

    async fn create_workout_exercise(
        &self,
        row: NewWorkoutExercise,
    ) -> Result<WorkoutExerciseRow, StoreError> {
        let mut state = self.state.lock().await;
        if !state.workouts.iter().any(|w| w.id == row.workout_id) {
            return Err(StoreError::UnknownWorkout(row.workout_id));
        }
        state.last_workout_exercise_id += 1;
        let row = WorkoutExerciseRow {
            id: state.last_workout_exercise_id,
            workout_id: row.workout_id,
            exercise_id: row.exercise_id,
            name: row.name,
            category: row.body_part,
            equipment: row.equipment,
            position: row.position,
            sets: row.sets,
            reps: row.reps,
            weight: row.weight,
            completed: row.completed,
            notes: row.notes,
        };
        state.workout_exercises.push(row.clone());
        Ok(row)
    }

    async fn update_workout(
        &self,
        id: i64,
        fields: WorkoutFields,
    ) -> Result<Option<WorkoutRow>, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state.workouts.iter_mut().find(|w| w.id == id).map(|w| {
            w.title = fields.title;
            w.description = fields.description;
            w.date = fields.date;
            w.duration_minutes = fields.duration_minutes;
            w.clone()
        }))
    }

    async fn delete_workout(&self, id: i64) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.workouts.retain(|w| w.id != id);
        state.workout_exercises.retain(|row| row.workout_id != id);
        Ok(())
    }

    async fn delete_workout_exercises(&self, workout_id: i64) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .workout_exercises
            .retain(|row| row.workout_id != workout_id);
        Ok(())
    }

    async fn like_workout(&self, id: i64) -> Result<Option<LikeRow>, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state.workouts.iter_mut().find(|w| w.id == id).map(|w| {
            w.likes += 1;
            LikeRow {
                id: w.id,
                likes: w.likes,
            }
        }))
    }
}
