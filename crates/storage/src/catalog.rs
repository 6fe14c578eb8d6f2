//! ExerciseDB catalog client
//!
//! Records of the different ExerciseDB versions name the same attributes differently and use
//! either a single value or a list. Everything is normalized into the list fields of
//! [`domain::Exercise`].

use liftbook_domain as domain;
use serde::Deserialize;

use super::{CatalogConfig, ReqwestSendRequest, SendRequest, endpoint, fetch};

#[derive(Clone)]
pub struct ExerciseDB<S: SendRequest> {
    config: CatalogConfig,
    client: reqwest::Client,
    sender: S,
}

impl ExerciseDB<ReqwestSendRequest> {
    #[must_use]
    pub fn new(config: CatalogConfig) -> Self {
        let client = reqwest::Client::new();
        Self {
            config,
            sender: ReqwestSendRequest::new(client.clone()),
            client,
        }
    }
}

impl<S: SendRequest> ExerciseDB<S> {
    pub fn with_sender(config: CatalogConfig, sender: S) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            sender,
        }
    }

    fn get(&self, segments: &[&str]) -> Result<reqwest::RequestBuilder, domain::CatalogError> {
        let url = endpoint(&self.config.base_url, segments)
            .map_err(|err| domain::CatalogError::Unavailable(err.to_string()))?;
        Ok(self
            .client
            .get(url)
            .header("x-rapidapi-key", &self.config.api_key)
            .header("x-rapidapi-host", &self.config.api_host))
    }

    async fn fetch_exercises(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<domain::Exercise>, domain::CatalogError> {
        let records: Vec<CatalogRecord> = fetch(&self.sender, request)
            .await
            .map_err(|err| match domain::CatalogError::from(err) {
                domain::CatalogError::NotFound => {
                    domain::CatalogError::Unavailable(String::from("404 Not Found"))
                }
                err => err,
            })?;
        Ok(records.into_iter().map(domain::Exercise::from).collect())
    }
}

impl<S: SendRequest> domain::CatalogRepository for ExerciseDB<S> {
    async fn read_exercises(
        &self,
        query: &domain::CatalogQuery,
    ) -> Result<Vec<domain::Exercise>, domain::CatalogError> {
        let request = match query {
            domain::CatalogQuery::All => self
                .get(&["exercises"])?
                .query(&[("limit", domain::CatalogQuery::ALL_LIMIT)]),
            domain::CatalogQuery::Name(name) => {
                self.get(&["exercises", "name", &name.trim().to_lowercase()])?
            }
            domain::CatalogQuery::BodyPart(body_part) => {
                self.get(&["exercises", "bodyPart", body_part.as_str()])?
            }
            domain::CatalogQuery::Equipment(equipment) => {
                self.get(&["exercises", "equipment", equipment.as_str()])?
            }
            domain::CatalogQuery::Target(target) => {
                self.get(&["exercises", "target", target.as_str()])?
            }
        };
        self.fetch_exercises(request).await
    }

    async fn read_exercise(
        &self,
        id: &domain::ExerciseID,
    ) -> Result<domain::Exercise, domain::CatalogError> {
        let request = self.get(&["exercises", "exercise", id.as_str()])?;
        let record: CatalogRecord = fetch(&self.sender, request).await?;
        Ok(record.into())
    }

    async fn read_filter_values(
        &self,
        filter: domain::CatalogFilter,
    ) -> Result<Vec<String>, domain::CatalogError> {
        let list = match filter {
            domain::CatalogFilter::BodyPart => "bodyPartList",
            domain::CatalogFilter::Equipment => "equipmentList",
            domain::CatalogFilter::Target => "targetList",
        };
        fetch(&self.sender, self.get(&["exercises", list])?)
            .await
            .map_err(|err| domain::CatalogError::Unavailable(err.to_string()))
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
enum Identifier {
    Text(String),
    Number(u64),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CatalogRecord {
    #[serde(alias = "exerciseId")]
    id: Identifier,
    name: String,
    #[serde(default)]
    body_part: Option<OneOrMany>,
    #[serde(default)]
    body_parts: Option<OneOrMany>,
    #[serde(default)]
    equipment: Option<OneOrMany>,
    #[serde(default)]
    equipments: Option<OneOrMany>,
    #[serde(default)]
    target: Option<OneOrMany>,
    #[serde(default)]
    target_muscles: Option<OneOrMany>,
    #[serde(default)]
    secondary_muscles: Option<OneOrMany>,
    #[serde(default)]
    instructions: Option<OneOrMany>,
    #[serde(default)]
    gif_url: Option<String>,
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Merges the scalar and list spelling of a field, keeping the first occurrence of each value.
fn merge(scalar: Option<OneOrMany>, list: Option<OneOrMany>) -> Vec<String> {
    let mut result: Vec<String> = vec![];
    for value in [scalar, list].into_iter().flatten().flat_map(OneOrMany::into_vec) {
        if !value.is_empty() && !result.contains(&value) {
            result.push(value);
        }
    }
    result
}

impl From<CatalogRecord> for domain::Exercise {
    fn from(value: CatalogRecord) -> Self {
        domain::Exercise {
            id: match value.id {
                Identifier::Text(id) => id.into(),
                Identifier::Number(id) => format!("{id:04}").into(),
            },
            name: value.name,
            body_parts: merge(value.body_part, value.body_parts),
            equipments: merge(value.equipment, value.equipments),
            target_muscles: merge(value.target, value.target_muscles),
            secondary_muscles: value.secondary_muscles.map(OneOrMany::into_vec).unwrap_or_default(),
            instructions: value.instructions.map(OneOrMany::into_vec).unwrap_or_default(),
            gif_url: value.gif_url.filter(|url| !url.is_empty()),
        }
    }
}
