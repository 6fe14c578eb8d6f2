use chrono::NaiveDate;
use derive_more::{Deref, Display, Into};

use crate::{CreateError, DeleteError, ExerciseID, Name, ReadError, UpdateError};

#[allow(async_fn_in_trait)]
pub trait WorkoutService {
    async fn get_workouts(&self) -> Result<Vec<WorkoutSummary>, ReadError>;
    async fn get_workout(&self, id: WorkoutID) -> Result<Workout, ReadError>;
    async fn get_workouts_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<WorkoutSummary>, ReadError>;
    async fn create_workout(&self, workout: NewWorkout) -> Result<Workout, CreateError>;
    async fn replace_workout(&self, workout: Workout) -> Result<Workout, UpdateError>;
    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError>;
    async fn like_workout(&self, id: WorkoutID) -> Result<u32, UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait WorkoutRepository {
    async fn read_workouts(&self) -> Result<Vec<WorkoutSummary>, ReadError>;
    async fn read_workout(&self, id: WorkoutID) -> Result<Workout, ReadError>;
    async fn read_workouts_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<WorkoutSummary>, ReadError>;
    async fn create_workout(&self, workout: NewWorkout) -> Result<Workout, CreateError>;
    async fn replace_workout(&self, workout: Workout) -> Result<Workout, UpdateError>;
    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError>;
    async fn increment_likes(&self, id: WorkoutID) -> Result<u32, UpdateError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub name: Name,
    pub date: NaiveDate,
    pub likes: u32,
    pub exercises: Vec<WorkoutExercise>,
}

impl Workout {
    #[must_use]
    pub fn summary(&self) -> WorkoutSummary {
        WorkoutSummary {
            id: self.id,
            name: self.name.clone(),
            date: self.date,
            likes: self.likes,
            exercise_count: self.exercises.len(),
        }
    }

    #[must_use]
    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    #[must_use]
    pub fn completed_sets(&self) -> usize {
        self.exercises
            .iter()
            .flat_map(|e| &e.sets)
            .filter(|s| s.completed)
            .count()
    }

    /// Sum of weight times reps over all completed sets.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.exercises
            .iter()
            .flat_map(|e| &e.sets)
            .filter(|s| s.completed)
            .map(ExerciseSet::volume)
            .sum()
    }

    #[must_use]
    pub fn has_body_part(&self, body_part: &str) -> bool {
        self.exercises
            .iter()
            .any(|e| e.body_part.eq_ignore_ascii_case(body_part))
    }
}

/// Workout that has not been assigned an identifier by the storage yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub name: Name,
    pub date: NaiveDate,
    pub exercises: Vec<WorkoutExercise>,
}

impl NewWorkout {
    #[must_use]
    pub fn with_id(self, id: WorkoutID) -> Workout {
        Workout {
            id,
            name: self.name,
            date: self.date,
            likes: 0,
            exercises: self.exercises,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSummary {
    pub id: WorkoutID,
    pub name: Name,
    pub date: NaiveDate,
    pub likes: u32,
    pub exercise_count: usize,
}

/// Sorts by date, newest first. Workouts on the same date keep their relative order.
pub fn sort_by_date_descending(workouts: &mut [WorkoutSummary]) {
    workouts.sort_by(|a, b| b.date.cmp(&a.date));
}

#[derive(
    Deref, Display, Into, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct WorkoutID(u64);

impl WorkoutID {
    #[must_use]
    pub fn nil() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for WorkoutID {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Exercise entry of a workout.
///
/// Name, body part and equipment are copied from the catalog, so that a stored workout can be
/// shown without querying the catalog again.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutExercise {
    pub exercise_id: ExerciseID,
    pub name: String,
    pub body_part: String,
    pub equipment: String,
    pub sets: Vec<ExerciseSet>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseSet {
    pub number: u32,
    pub weight: Weight,
    pub reps: Reps,
    pub completed: bool,
}

impl ExerciseSet {
    #[must_use]
    pub fn volume(&self) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let reps = u32::from(self.reps) as f32;
        f32::from(self.weight) * reps
    }
}

#[derive(Debug, Display, Default, Clone, Copy, PartialEq, PartialOrd, Into)]
pub struct Weight(f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !value.is_finite() || value < 0.0 {
            return Err(WeightError::Invalid(value));
        }

        Ok(Self(value))
    }

    /// Interprets form input, falling back to zero for blank or invalid input.
    #[must_use]
    pub fn parse_or_zero(input: &str) -> Self {
        input
            .trim()
            .parse::<f32>()
            .ok()
            .and_then(|value| Weight::new(value).ok())
            .unwrap_or_default()
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be a non-negative number ({0})")]
    Invalid(f32),
}

#[derive(Debug, Display, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Into)]
pub struct Reps(u32);

impl Reps {
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Interprets form input, falling back to zero for blank or invalid input.
    ///
    /// Fractional input is truncated.
    #[must_use]
    pub fn parse_or_zero(input: &str) -> Self {
        let input = input.trim();
        if let Ok(value) = input.parse::<u32>() {
            return Self(value);
        }
        match input.parse::<f64>() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Ok(value) if value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX) => {
                Self(value.trunc() as u32)
            }
            _ => Self::default(),
        }
    }
}
