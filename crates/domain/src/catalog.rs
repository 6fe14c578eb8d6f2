//! Catalog fallback
//!
//! The exercise catalog is an external service that may be unreachable or reject the configured
//! credentials. `FallbackCatalog` wraps any catalog repository and substitutes a fixed set of
//! example exercises in that case, so that browsing and workout creation stay usable.

use std::collections::BTreeSet;

use log::warn;

use crate::{CatalogError, CatalogFilter, CatalogQuery, CatalogRepository, Exercise, ExerciseID};

pub const FALLBACK_WARNING: &str = "Could not connect to exercise database. Using example data.";

struct BaseExercise {
    id: &'static str,
    name: &'static str,
    body_part: &'static str,
    equipment: &'static str,
    target: &'static str,
    instructions: &'static [&'static str],
}

impl From<&BaseExercise> for Exercise {
    fn from(value: &BaseExercise) -> Self {
        Exercise {
            id: ExerciseID::from(value.id),
            name: value.name.to_string(),
            body_parts: vec![value.body_part.to_string()],
            equipments: vec![value.equipment.to_string()],
            target_muscles: vec![value.target.to_string()],
            secondary_muscles: vec![],
            instructions: value.instructions.iter().map(ToString::to_string).collect(),
            gif_url: None,
        }
    }
}

const EXAMPLES: &[BaseExercise] = &[
    BaseExercise {
        id: "ex1",
        name: "Bench Press",
        body_part: "chest",
        equipment: "barbell",
        target: "pectorals",
        instructions: &["A compound exercise that targets the chest, shoulders, and triceps."],
    },
    BaseExercise {
        id: "ex2",
        name: "Squat",
        body_part: "upper legs",
        equipment: "barbell",
        target: "quads",
        instructions: &["A compound lower body exercise that targets the quadriceps, hamstrings, and glutes."],
    },
    BaseExercise {
        id: "ex3",
        name: "Deadlift",
        body_part: "upper legs",
        equipment: "barbell",
        target: "glutes",
        instructions: &["A compound exercise that works the entire posterior chain."],
    },
    BaseExercise {
        id: "ex4",
        name: "Pull-up",
        body_part: "back",
        equipment: "body weight",
        target: "lats",
        instructions: &["An upper body pulling exercise that targets the back and biceps."],
    },
    BaseExercise {
        id: "ex5",
        name: "Push-up",
        body_part: "chest",
        equipment: "body weight",
        target: "pectorals",
        instructions: &["A bodyweight exercise that works the chest, shoulders, and triceps."],
    },
    BaseExercise {
        id: "ex6",
        name: "Dumbbell Curl",
        body_part: "upper arms",
        equipment: "dumbbell",
        target: "biceps",
        instructions: &["An isolation exercise for the biceps."],
    },
    BaseExercise {
        id: "ex7",
        name: "Tricep Extension",
        body_part: "upper arms",
        equipment: "cable",
        target: "triceps",
        instructions: &["An isolation exercise for the triceps."],
    },
    BaseExercise {
        id: "ex8",
        name: "Lateral Raise",
        body_part: "shoulders",
        equipment: "dumbbell",
        target: "delts",
        instructions: &["An isolation exercise for the side deltoids."],
    },
    BaseExercise {
        id: "ex9",
        name: "Plank",
        body_part: "waist",
        equipment: "body weight",
        target: "abs",
        instructions: &["An isometric core exercise."],
    },
    BaseExercise {
        id: "ex10",
        name: "Russian Twist",
        body_part: "waist",
        equipment: "medicine ball",
        target: "abs",
        instructions: &["A rotational core exercise for the obliques."],
    },
    BaseExercise {
        id: "ex11",
        name: "Leg Press",
        body_part: "upper legs",
        equipment: "machine",
        target: "quads",
        instructions: &["A machine-based compound exercise for the legs."],
    },
    BaseExercise {
        id: "ex12",
        name: "Treadmill Running",
        body_part: "cardio",
        equipment: "machine",
        target: "cardiovascular system",
        instructions: &["Cardio exercise on a treadmill."],
    },
];

#[must_use]
pub fn example_exercises() -> Vec<Exercise> {
    EXAMPLES.iter().map(Exercise::from).collect()
}

/// Distinct values of a filter over the example exercises, in order of first occurrence.
#[must_use]
pub fn example_filter_values(filter: CatalogFilter) -> Vec<String> {
    let mut seen = BTreeSet::new();
    example_exercises()
        .iter()
        .flat_map(|e| filter.values_of(e).to_vec())
        .filter(|v| !v.is_empty() && seen.insert(v.clone()))
        .collect()
}

/// Result of a catalog read that may have been served from example data.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub warning: Option<String>,
}

impl<T> Listing<T> {
    fn fresh(items: Vec<T>) -> Self {
        Self {
            items,
            warning: None,
        }
    }

    fn fallback(items: Vec<T>) -> Self {
        Self {
            items,
            warning: Some(FALLBACK_WARNING.to_string()),
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.warning.is_some()
    }
}

pub struct FallbackCatalog<C> {
    catalog: C,
}

impl<C: CatalogRepository> FallbackCatalog<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn inner(&self) -> &C {
        &self.catalog
    }

    pub async fn exercises(&self, query: &CatalogQuery) -> Listing<Exercise> {
        match self.catalog.read_exercises(query).await {
            Ok(exercises) => Listing::fresh(exercises),
            Err(err) => {
                warn!("failed to read exercises ({query:?}), using example data: {err}");
                Listing::fallback(example_exercises())
            }
        }
    }

    pub async fn filter_values(&self, filter: CatalogFilter) -> Listing<String> {
        match self.catalog.read_filter_values(filter).await {
            Ok(values) => Listing::fresh(values),
            Err(err) => {
                warn!("failed to read {filter} list, using example data: {err}");
                Listing::fallback(example_filter_values(filter))
            }
        }
    }

    pub async fn exercise(&self, id: &ExerciseID) -> Result<Exercise, CatalogError> {
        match self.catalog.read_exercise(id).await {
            Err(CatalogError::Unavailable(err)) => {
                warn!("failed to read exercise {id}, using example data: {err}");
                example_exercises()
                    .into_iter()
                    .find(|e| e.id == *id)
                    .ok_or(CatalogError::NotFound)
            }
            result => result,
        }
    }
}
