//! Document store gateway
//!
//! Workouts are stored as single documents in the `workouts` collection of a PostgREST endpoint,
//! with their exercises and sets embedded as JSON.
//!
//! The endpoint offers no increment operation, so liking a workout reads the document and writes
//! the incremented count back. Two concurrent likes can therefore result in a single increment.

use chrono::NaiveDate;
use liftbook_domain as domain;
use log::debug;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    DocumentStoreConfig, ReqwestSendRequest, ResponseError, SendRequest, endpoint, fetch,
    fetch_no_content,
};

#[derive(Clone)]
pub struct DocumentStore<S: SendRequest> {
    config: DocumentStoreConfig,
    client: reqwest::Client,
    sender: S,
}

impl DocumentStore<ReqwestSendRequest> {
    #[must_use]
    pub fn new(config: DocumentStoreConfig) -> Self {
        let client = reqwest::Client::new();
        Self {
            config,
            sender: ReqwestSendRequest::new(client.clone()),
            client,
        }
    }
}

impl<S: SendRequest> DocumentStore<S> {
    pub fn with_sender(config: DocumentStoreConfig, sender: S) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            sender,
        }
    }

    fn request(&self, method: Method) -> Result<reqwest::RequestBuilder, ResponseError> {
        Ok(self
            .client
            .request(method, endpoint(&self.config.url, &["rest", "v1", "workouts"])?)
            .header("apikey", &self.config.key)
            .bearer_auth(&self.config.key))
    }

    fn request_by_id(
        &self,
        method: Method,
        id: domain::WorkoutID,
    ) -> Result<reqwest::RequestBuilder, ResponseError> {
        Ok(self.request(method)?.query(&[("id", format!("eq.{id}"))]))
    }

    async fn read_documents(&self) -> Result<Vec<Document>, ResponseError> {
        fetch(
            &self.sender,
            self.request(Method::GET)?
                .query(&[("select", "*"), ("order", "date.desc")]),
        )
        .await
    }

    /// Sends a modifying request and returns the affected document.
    async fn write_document(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Document, ResponseError> {
        let documents: Vec<Document> = fetch(
            &self.sender,
            request.header("Prefer", "return=representation"),
        )
        .await?;
        documents.into_iter().next().ok_or(ResponseError::NotFound)
    }
}

impl<S: SendRequest> domain::WorkoutRepository for DocumentStore<S> {
    async fn read_workouts(&self) -> Result<Vec<domain::WorkoutSummary>, domain::ReadError> {
        self.read_documents()
            .await?
            .into_iter()
            .map(|document| domain::Workout::try_from(document).map(|w| w.summary()))
            .collect()
    }

    async fn read_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::Workout, domain::ReadError> {
        let documents: Vec<Document> = fetch(
            &self.sender,
            self.request_by_id(Method::GET, id)?
                .query(&[("select", "*")]),
        )
        .await?;
        documents
            .into_iter()
            .next()
            .ok_or(domain::ReadError::NotFound)?
            .try_into()
    }

    async fn read_workouts_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<domain::WorkoutSummary>, domain::ReadError> {
        let mut workouts = vec![];
        for document in self.read_documents().await? {
            let workout = domain::Workout::try_from(document)?;
            if workout.has_body_part(category) {
                workouts.push(workout.summary());
            }
        }
        Ok(workouts)
    }

    async fn create_workout(
        &self,
        workout: domain::NewWorkout,
    ) -> Result<domain::Workout, domain::CreateError> {
        let content = Content::new(&workout.name, workout.date, &workout.exercises);
        let document = self
            .write_document(self.request(Method::POST)?.json(&[content]))
            .await?;
        Ok(workout.with_id(document.id.into()))
    }

    async fn replace_workout(
        &self,
        workout: domain::Workout,
    ) -> Result<domain::Workout, domain::UpdateError> {
        let content = Content::new(&workout.name, workout.date, &workout.exercises);
        let document = self
            .write_document(self.request_by_id(Method::PATCH, workout.id)?.json(&content))
            .await?;
        Ok(domain::Workout {
            likes: document.likes.unwrap_or(workout.likes),
            ..workout
        })
    }

    async fn delete_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::WorkoutID, domain::DeleteError> {
        fetch_no_content(&self.sender, self.request_by_id(Method::DELETE, id)?).await?;
        Ok(id)
    }

    async fn increment_likes(&self, id: domain::WorkoutID) -> Result<u32, domain::UpdateError> {
        let likes = domain::WorkoutRepository::read_workout(self, id).await?.likes + 1;
        debug!("setting likes of workout {id} to {likes} without atomic increment");
        let document = self
            .write_document(
                self.request_by_id(Method::PATCH, id)?
                    .json(&json!({ "likes": likes })),
            )
            .await?;
        Ok(document.likes.unwrap_or(likes))
    }
}

#[derive(Deserialize, Debug)]
struct Document {
    id: u64,
    name: String,
    date: NaiveDate,
    #[serde(default)]
    likes: Option<u32>,
    #[serde(default)]
    exercises: Option<Vec<DocumentExercise>>,
}

/// Writable fields of a document.
#[derive(Serialize, Debug)]
struct Content {
    name: String,
    date: NaiveDate,
    exercises: Vec<DocumentExercise>,
}

impl Content {
    fn new(name: &domain::Name, date: NaiveDate, exercises: &[domain::WorkoutExercise]) -> Self {
        Self {
            name: name.to_string(),
            date,
            exercises: exercises.iter().map(DocumentExercise::from).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct DocumentExercise {
    exercise_id: String,
    name: String,
    #[serde(default)]
    body_part: String,
    #[serde(default)]
    equipment: String,
    #[serde(default)]
    sets: Vec<DocumentSet>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct DocumentSet {
    set_number: u32,
    #[serde(default)]
    weight: f32,
    #[serde(default)]
    reps: u32,
    #[serde(default)]
    completed: bool,
}

impl From<&domain::WorkoutExercise> for DocumentExercise {
    fn from(value: &domain::WorkoutExercise) -> Self {
        Self {
            exercise_id: value.exercise_id.to_string(),
            name: value.name.clone(),
            body_part: value.body_part.clone(),
            equipment: value.equipment.clone(),
            sets: value
                .sets
                .iter()
                .map(|set| DocumentSet {
                    set_number: set.number,
                    weight: set.weight.into(),
                    reps: set.reps.into(),
                    completed: set.completed,
                })
                .collect(),
        }
    }
}

impl TryFrom<Document> for domain::Workout {
    type Error = domain::ReadError;

    fn try_from(value: Document) -> Result<Self, Self::Error> {
        Ok(domain::Workout {
            id: value.id.into(),
            name: domain::Name::new(&value.name).map_err(|err| {
                domain::ReadError::Storage(domain::StorageError::Other(Box::new(err)))
            })?,
            date: value.date,
            likes: value.likes.unwrap_or_default(),
            exercises: value
                .exercises
                .unwrap_or_default()
                .into_iter()
                .map(|exercise| domain::WorkoutExercise {
                    exercise_id: exercise.exercise_id.into(),
                    name: exercise.name,
                    body_part: exercise.body_part,
                    equipment: exercise.equipment,
                    sets: exercise
                        .sets
                        .into_iter()
                        .map(|set| domain::ExerciseSet {
                            number: set.set_number,
                            weight: domain::Weight::new(set.weight).unwrap_or_default(),
                            reps: domain::Reps::new(set.reps),
                            completed: set.completed,
                        })
                        .collect(),
                })
                .collect(),
        })
    }
}
