use derive_more::{AsRef, Display};

/// Name of a workout, trimmed and never blank.
#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new(name: &str) -> Result<Self, NameError> {
        match name.trim() {
            "" => Err(NameError::Empty),
            trimmed => Ok(Self(trimmed.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("workout name is blank")]
    Empty,
}
