use std::fmt;

use derive_more::{AsRef, Deref, Display};

#[allow(async_fn_in_trait)]
pub trait CatalogRepository {
    async fn read_exercises(&self, query: &CatalogQuery) -> Result<Vec<Exercise>, CatalogError>;
    async fn read_exercise(&self, id: &ExerciseID) -> Result<Exercise, CatalogError>;
    async fn read_filter_values(&self, filter: CatalogFilter) -> Result<Vec<String>, CatalogError>;
}

/// Exercise as offered by the catalog.
///
/// Body part, equipment and target are kept as lists, because catalog responses are not
/// consistent about expressing them as a single value or as several.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: String,
    pub body_parts: Vec<String>,
    pub equipments: Vec<String>,
    pub target_muscles: Vec<String>,
    pub secondary_muscles: Vec<String>,
    pub instructions: Vec<String>,
    pub gif_url: Option<String>,
}

impl Exercise {
    #[must_use]
    pub fn body_part(&self) -> &str {
        self.body_parts.first().map_or("", String::as_str)
    }

    #[must_use]
    pub fn equipment(&self) -> &str {
        self.equipments.first().map_or("", String::as_str)
    }

    #[must_use]
    pub fn target_muscle(&self) -> &str {
        self.target_muscles.first().map_or("", String::as_str)
    }

    #[must_use]
    pub fn matches(&self, query: &CatalogQuery) -> bool {
        fn contains(values: &[String], value: &str) -> bool {
            values.iter().any(|v| v.eq_ignore_ascii_case(value))
        }

        match query {
            CatalogQuery::All => true,
            CatalogQuery::Name(name) => self
                .name
                .to_lowercase()
                .contains(&name.trim().to_lowercase()),
            CatalogQuery::BodyPart(body_part) => contains(&self.body_parts, body_part),
            CatalogQuery::Equipment(equipment) => contains(&self.equipments, equipment),
            CatalogQuery::Target(target) => contains(&self.target_muscles, target),
        }
    }
}

#[derive(AsRef, Deref, Display, Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(String);

impl ExerciseID {
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ExerciseID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ExerciseID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    /// First page of the catalog.
    All,
    Name(String),
    BodyPart(String),
    Equipment(String),
    Target(String),
}

impl CatalogQuery {
    pub const ALL_LIMIT: usize = 50;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFilter {
    BodyPart,
    Equipment,
    Target,
}

impl CatalogFilter {
    #[must_use]
    pub fn values_of(self, exercise: &Exercise) -> &[String] {
        match self {
            CatalogFilter::BodyPart => &exercise.body_parts,
            CatalogFilter::Equipment => &exercise.equipments,
            CatalogFilter::Target => &exercise.target_muscles,
        }
    }
}

impl fmt::Display for CatalogFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CatalogFilter::BodyPart => "body part",
                CatalogFilter::Equipment => "equipment",
                CatalogFilter::Target => "target muscle",
            }
        )
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("exercise catalog unavailable: {0}")]
    Unavailable(String),
    #[error("exercise not found")]
    NotFound,
}
