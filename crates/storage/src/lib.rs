#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use liftbook_domain as domain;
use log::debug;
use serde::de::DeserializeOwned;

pub mod catalog;
pub mod config;
pub mod document;
pub mod rest;

pub use catalog::ExerciseDB;
pub use config::{CatalogConfig, Config, ConfigError, DocumentStoreConfig};
pub use document::DocumentStore;
pub use rest::REST;

/// Transport seam of all gateways.
#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error>;
}

#[derive(Clone, Default)]
pub struct ReqwestSendRequest {
    client: reqwest::Client,
}

impl ReqwestSendRequest {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl SendRequest for ReqwestSendRequest {
    async fn send_request(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.client.execute(request).await
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("invalid URL: {0}")]
pub struct InvalidUrl(String);

/// Appends percent-encoded path segments to a base URL.
pub fn endpoint(base: &str, segments: &[&str]) -> Result<reqwest::Url, InvalidUrl> {
    let mut url = reqwest::Url::parse(base).map_err(|err| InvalidUrl(format!("{base}: {err}")))?;
    url.path_segments_mut()
        .map_err(|()| InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Failure of a single request, before it is mapped to the error type of the operation.
#[derive(thiserror::Error, Debug)]
pub enum ResponseError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] domain::StorageError),
}

impl From<InvalidUrl> for ResponseError {
    fn from(value: InvalidUrl) -> Self {
        ResponseError::Storage(domain::StorageError::Other(Box::new(value)))
    }
}

impl From<ResponseError> for domain::ReadError {
    fn from(value: ResponseError) -> Self {
        match value {
            ResponseError::NotFound => domain::ReadError::NotFound,
            ResponseError::Storage(err) => domain::ReadError::Storage(err),
        }
    }
}

impl From<ResponseError> for domain::CreateError {
    fn from(value: ResponseError) -> Self {
        match value {
            ResponseError::NotFound => domain::CreateError::Storage(
                domain::StorageError::Unavailable(String::from("404 Not Found")),
            ),
            ResponseError::Storage(err) => domain::CreateError::Storage(err),
        }
    }
}

impl From<ResponseError> for domain::UpdateError {
    fn from(value: ResponseError) -> Self {
        match value {
            ResponseError::NotFound => domain::UpdateError::NotFound,
            ResponseError::Storage(err) => domain::UpdateError::Storage(err),
        }
    }
}

impl From<ResponseError> for domain::DeleteError {
    fn from(value: ResponseError) -> Self {
        match value {
            ResponseError::NotFound => domain::DeleteError::Storage(
                domain::StorageError::Unavailable(String::from("404 Not Found")),
            ),
            ResponseError::Storage(err) => domain::DeleteError::Storage(err),
        }
    }
}

impl From<ResponseError> for domain::CatalogError {
    fn from(value: ResponseError) -> Self {
        match value {
            ResponseError::NotFound => domain::CatalogError::NotFound,
            ResponseError::Storage(err) => domain::CatalogError::Unavailable(err.to_string()),
        }
    }
}

async fn send(
    sender: &impl SendRequest,
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, ResponseError> {
    let request = request
        .build()
        .map_err(|err| domain::StorageError::Other(Box::new(err)))?;
    let method = request.method().clone();
    let url = request.url().clone();
    let response = match sender.send_request(request).await {
        Ok(response) => response,
        Err(err) => {
            debug!("{method} {url} failed: {err}");
            return Err(domain::StorageError::NoConnection.into());
        }
    };

    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ResponseError::NotFound);
    }
    if !status.is_success() {
        let message = error_message(response).await;
        return Err(domain::StorageError::Unavailable(message).into());
    }

    Ok(response)
}

async fn fetch<T: DeserializeOwned>(
    sender: &impl SendRequest,
    request: reqwest::RequestBuilder,
) -> Result<T, ResponseError> {
    let response = send(sender, request).await?;
    match response.json::<T>().await {
        Ok(data) => Ok(data),
        Err(err) => Err(domain::StorageError::Other(
            format!("deserialization failed: {err}").into(),
        )
        .into()),
    }
}

async fn fetch_no_content(
    sender: &impl SendRequest,
    request: reqwest::RequestBuilder,
) -> Result<(), ResponseError> {
    send(sender, request).await?;
    Ok(())
}

/// Uses the `error` or `message` field of a JSON error body if present.
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.json::<serde_json::Value>().await.ok();
    match body
        .as_ref()
        .and_then(|body| body.get("error").or_else(|| body.get("message")))
        .and_then(serde_json::Value::as_str)
    {
        Some(message) => format!("{status}: {message}"),
        None => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    pub mod data;
    pub mod mock;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("http://localhost:3000", &["api", "workouts"], "http://localhost:3000/api/workouts")]
    #[case("http://localhost:3000/", &["api", "workouts", "7"], "http://localhost:3000/api/workouts/7")]
    #[case(
        "https://exercisedb.p.rapidapi.com",
        &["exercises", "name", "bench press"],
        "https://exercisedb.p.rapidapi.com/exercises/name/bench%20press"
    )]
    #[case("http://host/base", &["bodyPart", "a/b"], "http://host/base/bodyPart/a%2Fb")]
    fn test_endpoint(#[case] base: &str, #[case] segments: &[&str], #[case] expected: &str) {
        assert_eq!(endpoint(base, segments).unwrap().as_str(), expected);
    }

    #[test]
    fn test_endpoint_invalid_base() {
        assert!(endpoint("localhost", &["api"]).is_err());
        assert!(endpoint("mailto:someone@example.com", &["api"]).is_err());
    }

    #[tokio::test]
    async fn test_send_maps_status() {
        let sender = mock::MockSendRequest::new(vec![
            Some(mock::response(404, "")),
            Some(mock::response(500, r#"{"error":"Server error"}"#)),
            None,
        ]);
        let client = reqwest::Client::new();

        assert!(matches!(
            fetch_no_content(&sender, client.get("http://host/a")).await,
            Err(ResponseError::NotFound)
        ));
        assert_eq!(
            fetch_no_content(&sender, client.get("http://host/b"))
                .await
                .unwrap_err()
                .to_string(),
            "500 Internal Server Error: Server error"
        );
        assert!(matches!(
            fetch_no_content(&sender, client.get("http://host/c")).await,
            Err(ResponseError::Storage(domain::StorageError::NoConnection))
        ));
    }

    #[tokio::test]
    async fn test_fetch_invalid_body() {
        let sender = mock::MockSendRequest::new(vec![Some(mock::response(200, "<html>"))]);

        assert!(matches!(
            fetch::<Vec<u32>>(&sender, reqwest::Client::new().get("http://host/a")).await,
            Err(ResponseError::Storage(domain::StorageError::Other(_)))
        ));
    }
}
