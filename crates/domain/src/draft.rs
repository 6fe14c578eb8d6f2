//! Workout draft
//!
//! A draft is the editable, not yet stored form of a workout. Weight and reps are kept as
//! entered and only interpreted when the draft is saved. Exercise and set indices refer to list
//! positions; an index that does not exist leaves the draft unchanged.

use chrono::NaiveDate;
use log::debug;

use crate::{
    CreateError, Exercise, ExerciseID, ExerciseSet, Name, NewWorkout, Reps, UpdateError, Weight,
    Workout, WorkoutExercise, WorkoutID, WorkoutService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    Empty,
    Editing,
    Saved(WorkoutID),
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDraft {
    id: Option<WorkoutID>,
    likes: u32,
    state: DraftState,
    pub name: String,
    pub date: NaiveDate,
    pub exercises: Vec<ExerciseDraft>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDraft {
    pub exercise_id: ExerciseID,
    pub name: String,
    pub body_part: String,
    pub equipment: String,
    pub sets: Vec<SetDraft>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetDraft {
    pub number: u32,
    pub weight: String,
    pub reps: String,
    pub completed: bool,
}

impl SetDraft {
    fn new(number: u32) -> Self {
        Self {
            number,
            weight: String::new(),
            reps: String::new(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetField {
    Weight(String),
    Reps(String),
    Completed(bool),
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a workout name")]
    MissingName,
    #[error("Please add at least one exercise to your workout")]
    NoExercises,
}

#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to save workout: {0}")]
    Create(#[from] CreateError),
    #[error("Failed to save workout: {0}")]
    Update(#[from] UpdateError),
    #[error("Workout has already been {0}")]
    Closed(&'static str),
}

impl WorkoutDraft {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: None,
            likes: 0,
            state: DraftState::Empty,
            name: String::new(),
            date,
            exercises: vec![],
        }
    }

    /// Opens a stored workout for editing. Zero weight and reps are shown as blank fields.
    #[must_use]
    pub fn from_workout(workout: Workout) -> Self {
        fn blank_if_zero<T: ToString + Default + PartialEq>(value: T) -> String {
            if value == T::default() {
                String::new()
            } else {
                value.to_string()
            }
        }

        Self {
            id: Some(workout.id),
            likes: workout.likes,
            state: DraftState::Editing,
            name: workout.name.to_string(),
            date: workout.date,
            exercises: workout
                .exercises
                .into_iter()
                .map(|e| ExerciseDraft {
                    exercise_id: e.exercise_id,
                    name: e.name,
                    body_part: e.body_part,
                    equipment: e.equipment,
                    sets: e
                        .sets
                        .into_iter()
                        .map(|s| SetDraft {
                            number: s.number,
                            weight: blank_if_zero(s.weight),
                            reps: blank_if_zero(s.reps),
                            completed: s.completed,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<WorkoutID> {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> DraftState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, DraftState::Empty | DraftState::Editing)
    }

    pub fn set_name(&mut self, name: &str) {
        if self.touch() {
            self.name = name.to_string();
        }
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        if self.touch() {
            self.date = date;
        }
    }

    /// Appends the exercise with a single empty set. Adding the same exercise twice results in
    /// two independent entries.
    pub fn add_exercise(&mut self, exercise: &Exercise) {
        if self.touch() {
            self.exercises.push(ExerciseDraft {
                exercise_id: exercise.id.clone(),
                name: exercise.name.clone(),
                body_part: exercise.body_part().to_string(),
                equipment: exercise.equipment().to_string(),
                sets: vec![SetDraft::new(1)],
            });
        }
    }

    pub fn remove_exercise(&mut self, exercise_idx: usize) {
        if exercise_idx < self.exercises.len() && self.touch() {
            self.exercises.remove(exercise_idx);
        }
    }

    pub fn add_set(&mut self, exercise_idx: usize) {
        if exercise_idx < self.exercises.len() && self.touch() {
            let sets = &mut self.exercises[exercise_idx].sets;
            #[allow(clippy::cast_possible_truncation)]
            sets.push(SetDraft::new(sets.len() as u32 + 1));
        }
    }

    #[must_use]
    pub fn can_remove_set(&self, exercise_idx: usize) -> bool {
        self.is_open()
            && self
                .exercises
                .get(exercise_idx)
                .is_some_and(|e| e.sets.len() > 1)
    }

    /// Removes a set and renumbers the remaining sets of the exercise. The last set of an
    /// exercise cannot be removed.
    pub fn remove_set(&mut self, exercise_idx: usize, set_idx: usize) {
        if !self.can_remove_set(exercise_idx)
            || set_idx >= self.exercises[exercise_idx].sets.len()
        {
            return;
        }
        self.touch();
        let sets = &mut self.exercises[exercise_idx].sets;
        sets.remove(set_idx);
        for (number, set) in (1..).zip(sets.iter_mut()) {
            set.number = number;
        }
    }

    pub fn update_set_field(&mut self, exercise_idx: usize, set_idx: usize, field: SetField) {
        if self
            .exercises
            .get(exercise_idx)
            .is_none_or(|e| set_idx >= e.sets.len())
            || !self.touch()
        {
            return;
        }
        let set = &mut self.exercises[exercise_idx].sets[set_idx];
        match field {
            SetField::Weight(weight) => set.weight = weight,
            SetField::Reps(reps) => set.reps = reps,
            SetField::Completed(completed) => set.completed = completed,
        }
    }

    pub fn discard(&mut self) {
        if self.is_open() {
            self.state = DraftState::Discarded;
        }
    }

    /// Checks the preconditions for saving and interprets the entered set values.
    pub fn validate(&self) -> Result<NewWorkout, ValidationError> {
        let name = Name::new(&self.name).map_err(|_| ValidationError::MissingName)?;

        if self.exercises.is_empty() {
            return Err(ValidationError::NoExercises);
        }

        Ok(NewWorkout {
            name,
            date: self.date,
            exercises: self
                .exercises
                .iter()
                .map(|e| WorkoutExercise {
                    exercise_id: e.exercise_id.clone(),
                    name: e.name.clone(),
                    body_part: e.body_part.clone(),
                    equipment: e.equipment.clone(),
                    sets: e
                        .sets
                        .iter()
                        .map(|s| ExerciseSet {
                            number: s.number,
                            weight: Weight::parse_or_zero(&s.weight),
                            reps: Reps::parse_or_zero(&s.reps),
                            completed: s.completed,
                        })
                        .collect(),
                })
                .collect(),
        })
    }

    /// Stores the draft, creating a new workout or replacing the workout it was opened from.
    ///
    /// Nothing is sent if validation fails. On failure the draft stays unchanged and can be
    /// saved again.
    pub async fn save(&mut self, service: &impl WorkoutService) -> Result<Workout, SaveError> {
        match self.state {
            DraftState::Saved(_) => return Err(SaveError::Closed("saved")),
            DraftState::Discarded => return Err(SaveError::Closed("discarded")),
            DraftState::Empty | DraftState::Editing => {}
        }

        let workout = self.validate()?;

        let stored = match self.id {
            Some(id) => {
                let mut workout = workout.with_id(id);
                workout.likes = self.likes;
                service.replace_workout(workout).await?
            }
            None => service.create_workout(workout).await?,
        };

        debug!("saved workout {}", stored.id);
        self.id = Some(stored.id);
        self.state = DraftState::Saved(stored.id);

        Ok(stored)
    }

    fn touch(&mut self) -> bool {
        match self.state {
            DraftState::Empty => {
                self.state = DraftState::Editing;
                true
            }
            DraftState::Editing => true,
            DraftState::Saved(_) | DraftState::Discarded => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{DeleteError, ReadError, StorageError, WorkoutSummary};

    static DATE: std::sync::LazyLock<NaiveDate> =
        std::sync::LazyLock::new(|| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

    fn exercise(id: &str, name: &str, body_part: &str, equipment: &str) -> Exercise {
        Exercise {
            id: id.into(),
            name: name.to_string(),
            body_parts: vec![body_part.to_string()],
            equipments: vec![equipment.to_string()],
            target_muscles: vec![],
            secondary_muscles: vec![],
            instructions: vec![],
            gif_url: None,
        }
    }

    fn squat() -> Exercise {
        exercise("0043", "Squat", "upper legs", "barbell")
    }

    fn set_numbers(draft: &WorkoutDraft, exercise_idx: usize) -> Vec<u32> {
        draft.exercises[exercise_idx]
            .sets
            .iter()
            .map(|s| s.number)
            .collect()
    }

    #[derive(Default)]
    struct FakeWorkoutService {
        created: RefCell<Vec<NewWorkout>>,
        replaced: RefCell<Vec<Workout>>,
        fail: bool,
    }

    impl WorkoutService for FakeWorkoutService {
        async fn get_workouts(&self) -> Result<Vec<WorkoutSummary>, ReadError> {
            unimplemented!()
        }

        async fn get_workout(&self, _: WorkoutID) -> Result<Workout, ReadError> {
            unimplemented!()
        }

        async fn get_workouts_by_category(
            &self,
            _: &str,
        ) -> Result<Vec<WorkoutSummary>, ReadError> {
            unimplemented!()
        }

        async fn create_workout(&self, workout: NewWorkout) -> Result<Workout, CreateError> {
            self.created.borrow_mut().push(workout.clone());
            if self.fail {
                return Err(CreateError::Storage(StorageError::Unavailable(
                    "connection refused".to_string(),
                )));
            }
            Ok(workout.with_id(42.into()))
        }

        async fn replace_workout(&self, workout: Workout) -> Result<Workout, UpdateError> {
            self.replaced.borrow_mut().push(workout.clone());
            if self.fail {
                return Err(UpdateError::NotFound);
            }
            Ok(workout)
        }

        async fn delete_workout(&self, _: WorkoutID) -> Result<WorkoutID, DeleteError> {
            unimplemented!()
        }

        async fn like_workout(&self, _: WorkoutID) -> Result<u32, UpdateError> {
            unimplemented!()
        }
    }

    #[test]
    fn test_new() {
        let draft = WorkoutDraft::new(*DATE);
        assert_eq!(draft.state(), DraftState::Empty);
        assert_eq!(draft.id(), None);
        assert_eq!(draft.date, *DATE);
        assert!(draft.exercises.is_empty());
    }

    #[test]
    fn test_add_exercise() {
        let mut draft = WorkoutDraft::new(*DATE);

        draft.add_exercise(&squat());
        draft.add_exercise(&squat());

        assert_eq!(draft.state(), DraftState::Editing);
        assert_eq!(draft.exercises.len(), 2);
        assert_eq!(
            draft.exercises[0],
            ExerciseDraft {
                exercise_id: "0043".into(),
                name: "Squat".to_string(),
                body_part: "upper legs".to_string(),
                equipment: "barbell".to_string(),
                sets: vec![SetDraft {
                    number: 1,
                    weight: String::new(),
                    reps: String::new(),
                    completed: false,
                }],
            }
        );
        assert_eq!(draft.exercises[0], draft.exercises[1]);

        draft.add_set(0);
        assert_eq!(set_numbers(&draft, 0), vec![1, 2]);
        assert_eq!(set_numbers(&draft, 1), vec![1]);
    }

    #[test]
    fn test_add_and_remove_sets_keep_numbers_contiguous() {
        let mut draft = WorkoutDraft::new(*DATE);
        draft.add_exercise(&squat());

        let operations: &[(bool, usize)] = &[
            (true, 0),
            (true, 0),
            (true, 0),
            (false, 1),
            (true, 0),
            (false, 0),
            (false, 2),
            (false, 1),
            (false, 0),
            (false, 0),
            (true, 0),
            (false, 1),
        ];

        for (add, set_idx) in operations {
            if *add {
                draft.add_set(0);
            } else {
                draft.remove_set(0, *set_idx);
            }
            let count = draft.exercises[0].sets.len();
            assert!(count >= 1);
            assert_eq!(
                set_numbers(&draft, 0),
                (1..=u32::try_from(count).unwrap()).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_remove_set_renumbers_and_keeps_values() {
        let mut draft = WorkoutDraft::new(*DATE);
        draft.add_exercise(&squat());
        draft.add_set(0);
        draft.add_set(0);
        draft.update_set_field(0, 2, SetField::Weight("120".to_string()));

        draft.remove_set(0, 1);

        assert_eq!(set_numbers(&draft, 0), vec![1, 2]);
        assert_eq!(draft.exercises[0].sets[1].weight, "120");
    }

    #[test]
    fn test_remove_last_set_is_noop() {
        let mut draft = WorkoutDraft::new(*DATE);
        draft.add_exercise(&squat());

        assert!(!draft.can_remove_set(0));
        draft.remove_set(0, 0);

        assert_eq!(draft.exercises[0].sets.len(), 1);

        draft.add_set(0);
        assert!(draft.can_remove_set(0));
        assert!(!draft.can_remove_set(1));
    }

    #[rstest]
    #[case(5, 0)]
    #[case(0, 5)]
    fn test_out_of_range_indices_are_ignored(#[case] exercise_idx: usize, #[case] set_idx: usize) {
        let mut draft = WorkoutDraft::new(*DATE);
        draft.add_exercise(&squat());
        draft.add_set(0);
        let expected = draft.clone();

        draft.add_set(exercise_idx.max(1));
        draft.remove_set(exercise_idx, set_idx);
        draft.update_set_field(exercise_idx, set_idx, SetField::Completed(true));
        draft.remove_exercise(exercise_idx.max(1));

        assert_eq!(draft, expected);
    }

    #[test]
    fn test_remove_exercise() {
        let mut draft = WorkoutDraft::new(*DATE);
        draft.add_exercise(&squat());
        draft.add_exercise(&exercise("0025", "Bench Press", "chest", "barbell"));

        draft.remove_exercise(0);

        assert_eq!(draft.exercises.len(), 1);
        assert_eq!(draft.exercises[0].name, "Bench Press");
    }

    #[test]
    fn test_update_set_field() {
        let mut draft = WorkoutDraft::new(*DATE);
        draft.add_exercise(&squat());

        draft.update_set_field(0, 0, SetField::Weight("-7".to_string()));
        draft.update_set_field(0, 0, SetField::Reps("abc".to_string()));
        draft.update_set_field(0, 0, SetField::Completed(true));

        assert_eq!(
            draft.exercises[0].sets[0],
            SetDraft {
                number: 1,
                weight: "-7".to_string(),
                reps: "abc".to_string(),
                completed: true,
            }
        );
        assert_eq!(
            draft.validate().map(|w| w.exercises[0].sets[0]),
            Err(ValidationError::MissingName)
        );

        draft.set_name("A");
        assert_eq!(
            draft.validate().unwrap().exercises[0].sets[0],
            ExerciseSet {
                number: 1,
                weight: Weight::default(),
                reps: Reps::default(),
                completed: true,
            }
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn test_save_without_name(#[case] name: &str) {
        let service = FakeWorkoutService::default();
        let mut draft = WorkoutDraft::new(*DATE);
        draft.set_name(name);
        draft.add_exercise(&squat());
        let expected = draft.clone();

        assert!(matches!(
            draft.save(&service).await,
            Err(SaveError::Validation(ValidationError::MissingName))
        ));
        assert!(service.created.borrow().is_empty());
        assert!(service.replaced.borrow().is_empty());
        assert_eq!(draft, expected);
    }

    #[tokio::test]
    async fn test_save_without_exercises() {
        let service = FakeWorkoutService::default();
        let mut draft = WorkoutDraft::new(*DATE);
        draft.set_name("Leg Day");

        let result = draft.save(&service).await;

        assert!(matches!(
            result,
            Err(SaveError::Validation(ValidationError::NoExercises))
        ));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Please add at least one exercise to your workout"
        );
        assert!(service.created.borrow().is_empty());
        assert_eq!(draft.state(), DraftState::Editing);
    }

    #[tokio::test]
    async fn test_save_new_workout() {
        let service = FakeWorkoutService::default();
        let mut draft = WorkoutDraft::new(*DATE);
        draft.set_name("Leg Day");
        draft.add_exercise(&squat());
        draft.update_set_field(0, 0, SetField::Weight("100".to_string()));
        draft.update_set_field(0, 0, SetField::Reps("5".to_string()));

        let workout = draft.save(&service).await.unwrap();

        assert_eq!(
            *service.created.borrow(),
            vec![NewWorkout {
                name: Name::new("Leg Day").unwrap(),
                date: *DATE,
                exercises: vec![WorkoutExercise {
                    exercise_id: "0043".into(),
                    name: "Squat".to_string(),
                    body_part: "upper legs".to_string(),
                    equipment: "barbell".to_string(),
                    sets: vec![ExerciseSet {
                        number: 1,
                        weight: Weight::new(100.0).unwrap(),
                        reps: Reps::new(5),
                        completed: false,
                    }],
                }],
            }]
        );
        assert!(!workout.id.is_nil());
        assert_eq!(draft.state(), DraftState::Saved(workout.id));
        assert_eq!(draft.id(), Some(workout.id));
    }

    #[tokio::test]
    async fn test_save_existing_workout() {
        let service = FakeWorkoutService::default();
        let stored = Workout {
            id: 7.into(),
            name: Name::new("Push").unwrap(),
            date: *DATE,
            likes: 4,
            exercises: vec![WorkoutExercise {
                exercise_id: "0025".into(),
                name: "Bench Press".to_string(),
                body_part: "chest".to_string(),
                equipment: "barbell".to_string(),
                sets: vec![ExerciseSet {
                    number: 1,
                    weight: Weight::new(60.0).unwrap(),
                    reps: Reps::default(),
                    completed: true,
                }],
            }],
        };
        let mut draft = WorkoutDraft::from_workout(stored.clone());

        assert_eq!(draft.state(), DraftState::Editing);
        assert_eq!(draft.exercises[0].sets[0].weight, "60");
        assert_eq!(draft.exercises[0].sets[0].reps, "");

        draft.set_name("Push Day");
        let workout = draft.save(&service).await.unwrap();

        assert!(service.created.borrow().is_empty());
        assert_eq!(
            *service.replaced.borrow(),
            vec![Workout {
                name: Name::new("Push Day").unwrap(),
                ..stored
            }]
        );
        assert_eq!(draft.state(), DraftState::Saved(workout.id));
    }

    #[tokio::test]
    async fn test_save_failure_keeps_draft() {
        let service = FakeWorkoutService {
            fail: true,
            ..FakeWorkoutService::default()
        };
        let mut draft = WorkoutDraft::new(*DATE);
        draft.set_name("Leg Day");
        draft.add_exercise(&squat());
        let expected = draft.clone();

        let result = draft.save(&service).await;

        assert_eq!(
            result.unwrap_err().to_string(),
            "Failed to save workout: connection refused"
        );
        assert_eq!(draft, expected);
        assert_eq!(service.created.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_closed_draft() {
        let service = FakeWorkoutService::default();
        let mut draft = WorkoutDraft::new(*DATE);
        draft.set_name("Leg Day");
        draft.add_exercise(&squat());
        draft.discard();

        assert_eq!(draft.state(), DraftState::Discarded);
        draft.add_set(0);
        assert_eq!(draft.exercises[0].sets.len(), 1);
        assert!(matches!(
            draft.save(&service).await,
            Err(SaveError::Closed("discarded"))
        ));
        assert!(service.created.borrow().is_empty());
    }
}
