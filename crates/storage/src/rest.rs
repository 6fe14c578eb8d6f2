//! Relational REST gateway
//!
//! Each set of a workout is stored as one `workout_exercises` row. The `position` column keeps the
//! order of the exercises, the `sets` column holds the set number.

use chrono::NaiveDate;
use liftbook_domain as domain;
use log::warn;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use super::{ReqwestSendRequest, ResponseError, SendRequest, endpoint, fetch, fetch_no_content};

#[derive(Clone)]
pub struct REST<S: SendRequest> {
    base_url: String,
    client: reqwest::Client,
    sender: S,
}

impl REST<ReqwestSendRequest> {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::new();
        Self {
            base_url: base_url.into(),
            sender: ReqwestSendRequest::new(client.clone()),
            client,
        }
    }
}

impl<S: SendRequest> REST<S> {
    pub fn with_sender(base_url: impl Into<String>, sender: S) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
            sender,
        }
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<reqwest::RequestBuilder, ResponseError> {
        Ok(self
            .client
            .request(method, endpoint(&self.base_url, segments)?))
    }

    async fn create_exercise_rows(
        &self,
        id: domain::WorkoutID,
        exercises: &[domain::WorkoutExercise],
    ) -> Result<(), ResponseError> {
        for (position, exercise) in exercises.iter().enumerate() {
            for set in &exercise.sets {
                let request = self
                    .request(Method::POST, &["api", "workout-exercises"])?
                    .json(&json!({
                        "workout_id": u64::from(id),
                        "exercise_id": exercise.exercise_id.as_str(),
                        "sets": set.number,
                        "reps": u32::from(set.reps),
                        "weight": f32::from(set.weight),
                        "notes": null,
                        "name": exercise.name,
                        "body_part": exercise.body_part,
                        "equipment": exercise.equipment,
                        "position": position,
                        "completed": set.completed,
                    }));
                if let Err(err) = fetch_no_content(&self.sender, request).await {
                    warn!("workout {id} was stored incompletely");
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    async fn read_catalog_rows(
        &self,
        segments: &[&str],
    ) -> Result<Vec<domain::Exercise>, ResponseError> {
        let rows: Vec<CatalogRow> =
            fetch(&self.sender, self.request(Method::GET, segments)?).await?;
        Ok(rows.into_iter().map(domain::Exercise::from).collect())
    }
}

fn workout_fields(name: &domain::Name, date: NaiveDate) -> serde_json::Value {
    json!({
        "user_id": null,
        "title": name.to_string(),
        "description": "",
        "date": date,
        "duration_minutes": null,
    })
}

impl<S: SendRequest> domain::WorkoutRepository for REST<S> {
    async fn read_workouts(&self) -> Result<Vec<domain::WorkoutSummary>, domain::ReadError> {
        let rows: Vec<WorkoutRow> =
            fetch(&self.sender, self.request(Method::GET, &["api", "workouts"])?).await?;
        rows.into_iter()
            .map(domain::WorkoutSummary::try_from)
            .collect()
    }

    async fn read_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::Workout, domain::ReadError> {
        let detail: WorkoutDetail = fetch(
            &self.sender,
            self.request(Method::GET, &["api", "workouts", &id.to_string()])?,
        )
        .await?;
        domain::Workout::try_from(detail)
    }

    async fn read_workouts_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<domain::WorkoutSummary>, domain::ReadError> {
        let rows: Vec<WorkoutRow> = fetch(
            &self.sender,
            self.request(Method::GET, &["api", "workouts", "category", category])?,
        )
        .await?;
        rows.into_iter()
            .map(domain::WorkoutSummary::try_from)
            .collect()
    }

    async fn create_workout(
        &self,
        workout: domain::NewWorkout,
    ) -> Result<domain::Workout, domain::CreateError> {
        let row: WorkoutRow = fetch(
            &self.sender,
            self.request(Method::POST, &["api", "workouts"])?
                .json(&workout_fields(&workout.name, workout.date)),
        )
        .await?;
        let id = domain::WorkoutID::from(row.id);
        self.create_exercise_rows(id, &workout.exercises).await?;
        Ok(workout.with_id(id))
    }

    async fn replace_workout(
        &self,
        workout: domain::Workout,
    ) -> Result<domain::Workout, domain::UpdateError> {
        let id = workout.id.to_string();
        let row: WorkoutRow = fetch(
            &self.sender,
            self.request(Method::PUT, &["api", "workouts", &id])?
                .json(&workout_fields(&workout.name, workout.date)),
        )
        .await?;
        fetch_no_content(
            &self.sender,
            self.request(Method::DELETE, &["api", "workout-exercises", &id])?,
        )
        .await?;
        self.create_exercise_rows(workout.id, &workout.exercises)
            .await?;
        Ok(domain::Workout {
            likes: row.likes.unwrap_or(workout.likes),
            ..workout
        })
    }

    async fn delete_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::WorkoutID, domain::DeleteError> {
        fetch_no_content(
            &self.sender,
            self.request(Method::DELETE, &["api", "workouts", &id.to_string()])?,
        )
        .await?;
        Ok(id)
    }

    async fn increment_likes(&self, id: domain::WorkoutID) -> Result<u32, domain::UpdateError> {
        let row: LikeRow = fetch(
            &self.sender,
            self.request(Method::POST, &["api", "workouts", &id.to_string(), "like"])?,
        )
        .await?;
        Ok(row.likes)
    }
}

/// The exercise table of the relational backend.
///
/// It only knows a category (body part) and the equipment of an exercise. Queries the backend
/// cannot answer are filtered on the client.
impl<S: SendRequest> domain::CatalogRepository for REST<S> {
    async fn read_exercises(
        &self,
        query: &domain::CatalogQuery,
    ) -> Result<Vec<domain::Exercise>, domain::CatalogError> {
        let exercises = match query {
            domain::CatalogQuery::BodyPart(category) => {
                self.read_catalog_rows(&["api", "exercises", "category", category.as_str()])
                    .await
            }
            _ => self.read_catalog_rows(&["api", "exercises"]).await,
        }
        .map_err(|err| domain::CatalogError::Unavailable(err.to_string()))?;

        Ok(match query {
            domain::CatalogQuery::All => exercises
                .into_iter()
                .take(domain::CatalogQuery::ALL_LIMIT)
                .collect(),
            domain::CatalogQuery::BodyPart(_) => exercises,
            _ => exercises.into_iter().filter(|e| e.matches(query)).collect(),
        })
    }

    async fn read_exercise(
        &self,
        id: &domain::ExerciseID,
    ) -> Result<domain::Exercise, domain::CatalogError> {
        self.read_catalog_rows(&["api", "exercises"])
            .await
            .map_err(|err| domain::CatalogError::Unavailable(err.to_string()))?
            .into_iter()
            .find(|e| e.id == *id)
            .ok_or(domain::CatalogError::NotFound)
    }

    async fn read_filter_values(
        &self,
        filter: domain::CatalogFilter,
    ) -> Result<Vec<String>, domain::CatalogError> {
        let exercises = self
            .read_catalog_rows(&["api", "exercises"])
            .await
            .map_err(|err| domain::CatalogError::Unavailable(err.to_string()))?;
        let mut values: Vec<String> = exercises
            .iter()
            .flat_map(|e| filter.values_of(e).iter().cloned())
            .collect();
        values.sort();
        values.dedup();
        Ok(values)
    }
}

#[derive(Deserialize, Debug)]
struct WorkoutRow {
    id: u64,
    title: String,
    date: NaiveDate,
    #[serde(default)]
    likes: Option<u32>,
    #[serde(default)]
    exercise_count: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct WorkoutDetail {
    workout: WorkoutRow,
    exercises: Vec<ExerciseRow>,
}

#[derive(Deserialize, Debug)]
struct ExerciseRow {
    exercise_id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    equipment: Option<String>,
    #[serde(default)]
    position: u32,
    sets: u32,
    reps: u32,
    weight: f32,
    #[serde(default)]
    completed: bool,
}

#[derive(Deserialize, Debug)]
struct LikeRow {
    likes: u32,
}

#[derive(Deserialize, Debug)]
struct CatalogRow {
    id: String,
    name: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    equipment: Option<String>,
}

fn name(title: &str) -> Result<domain::Name, domain::ReadError> {
    domain::Name::new(title)
        .map_err(|err| domain::ReadError::Storage(domain::StorageError::Other(Box::new(err))))
}

impl TryFrom<WorkoutRow> for domain::WorkoutSummary {
    type Error = domain::ReadError;

    fn try_from(value: WorkoutRow) -> Result<Self, Self::Error> {
        Ok(domain::WorkoutSummary {
            id: value.id.into(),
            name: name(&value.title)?,
            date: value.date,
            likes: value.likes.unwrap_or_default(),
            exercise_count: usize::try_from(value.exercise_count.unwrap_or_default())
                .unwrap_or(usize::MAX),
        })
    }
}

impl TryFrom<WorkoutDetail> for domain::Workout {
    type Error = domain::ReadError;

    fn try_from(value: WorkoutDetail) -> Result<Self, Self::Error> {
        let mut rows = value.exercises;
        rows.sort_by_key(|row| (row.position, row.sets));

        let mut exercises: Vec<(u32, domain::WorkoutExercise)> = vec![];
        for row in rows {
            let set = domain::ExerciseSet {
                number: row.sets,
                weight: domain::Weight::new(row.weight).unwrap_or_default(),
                reps: domain::Reps::new(row.reps),
                completed: row.completed,
            };
            match exercises.last_mut() {
                Some((position, exercise)) if *position == row.position => {
                    exercise.sets.push(set);
                }
                _ => exercises.push((
                    row.position,
                    domain::WorkoutExercise {
                        exercise_id: row.exercise_id.into(),
                        name: row.name.unwrap_or_default(),
                        body_part: row.category.unwrap_or_default(),
                        equipment: row.equipment.unwrap_or_default(),
                        sets: vec![set],
                    },
                )),
            }
        }

        Ok(domain::Workout {
            id: value.workout.id.into(),
            name: name(&value.workout.title)?,
            date: value.workout.date,
            likes: value.workout.likes.unwrap_or_default(),
            exercises: exercises.into_iter().map(|(_, exercise)| exercise).collect(),
        })
    }
}

impl From<CatalogRow> for domain::Exercise {
    fn from(value: CatalogRow) -> Self {
        domain::Exercise {
            id: value.id.into(),
            name: value.name,
            body_parts: value.category.into_iter().collect(),
            equipments: value.equipment.into_iter().collect(),
            target_muscles: vec![],
            secondary_muscles: vec![],
            instructions: vec![],
            gif_url: None,
        }
    }
}
