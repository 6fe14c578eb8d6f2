#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;
mod draft;
mod error;
mod exercise;
mod handoff;
mod name;
mod service;
mod workout;

pub use catalog::{FallbackCatalog, Listing};
pub use draft::{
    DraftState, ExerciseDraft, SaveError, SetDraft, SetField, ValidationError, WorkoutDraft,
};
pub use error::{BoxError, CreateError, DeleteError, ReadError, StorageError, UpdateError};
pub use exercise::{
    CatalogError, CatalogFilter, CatalogQuery, CatalogRepository, Exercise, ExerciseID,
};
pub use handoff::Handoff;
pub use name::{Name, NameError};
pub use service::Service;
pub use workout::{
    ExerciseSet, NewWorkout, Reps, Weight, WeightError, Workout, WorkoutExercise, WorkoutID,
    WorkoutRepository, WorkoutService, WorkoutSummary, sort_by_date_descending,
};
