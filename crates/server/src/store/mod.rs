//! Persistence of workouts and their exercise rows
//!
//! A workout is stored as a parent row. Each performed set of an exercise is a child row that
//! carries the position of the exercise within the workout and the set number.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait WorkoutStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
    /// All workouts with the number of exercises they contain, most recent first.
    async fn workouts(&self) -> Result<Vec<WorkoutRow>, StoreError>;
    async fn workout(&self, id: i64) -> Result<Option<WorkoutDetail>, StoreError>;
    /// Workouts containing at least one exercise of the given category.
    async fn workouts_by_category(&self, category: &str) -> Result<Vec<WorkoutRow>, StoreError>;
    /// All catalog exercises sorted by name.
    async fn exercises(&self) -> Result<Vec<CatalogRow>, StoreError>;
    async fn exercises_by_category(&self, category: &str) -> Result<Vec<CatalogRow>, StoreError>;
    async fn create_workout(&self, fields: WorkoutFields) -> Result<WorkoutRow, StoreError>;
    async fn create_workout_exercise(
        &self,
        row: NewWorkoutExercise,
    ) -> Result<WorkoutExerciseRow, StoreError>;
    async fn update_workout(
        &self,
        id: i64,
        fields: WorkoutFields,
    ) -> Result<Option<WorkoutRow>, StoreError>;
    async fn delete_workout(&self, id: i64) -> Result<(), StoreError>;
    /// Removes all exercise rows of a workout.
    async fn delete_workout_exercises(&self, workout_id: i64) -> Result<(), StoreError>;
    /// Increments the like counter in a single step.
    async fn like_workout(&self, id: i64) -> Result<Option<LikeRow>, StoreError>;
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("workout {0} does not exist")]
    UnknownWorkout(i64),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub duration_minutes: Option<i32>,
    pub likes: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_count: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutDetail {
    pub workout: WorkoutRow,
    pub exercises: Vec<WorkoutExerciseRow>,
}

/// A stored set of an exercise within a workout.
///
/// Name and category fall back to the catalog entry of the exercise if the row does not carry
/// them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutExerciseRow {
    pub id: i64,
    pub workout_id: i64,
    pub exercise_id: String,
    pub name: Option<String>,
    pub category: Option<String>,
    pub equipment: Option<String>,
    pub position: i32,
    pub sets: i32,
    pub reps: i32,
    pub weight: f64,
    pub completed: bool,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CatalogRow {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub equipment: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeRow {
    pub id: i64,
    pub likes: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutFields {
    #[serde(default)]
    pub user_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewWorkoutExercise {
    pub workout_id: i64,
    pub exercise_id: String,
    pub sets: i32,
    pub reps: i32,
    pub weight: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body_part: Option<String>,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub completed: bool,
}
