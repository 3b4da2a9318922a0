// API client module: a small blocking HTTP client for the remote question
// collection. The collection only has to support create, list and
// delete-by-id, so it is modelled as the `QuestionStore` trait; the
// migration stages only ever see the trait.

use crate::config::Config;
use crate::error::MigrateError;
use crate::question::{Question, RemoteRecord};
use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;

/// The three operations the migration needs from the remote collection.
pub trait QuestionStore {
    /// `POST <base>`: succeeds on 200 or 201.
    fn create(&self, question: &Question) -> Result<(), MigrateError>;

    /// `GET <base>`: succeeds on 200 with a JSON array of records. Only the
    /// first page is seen if the service paginates.
    fn list(&self) -> Result<Vec<RemoteRecord>, MigrateError>;

    /// `DELETE <base>/<id>`: succeeds on 200.
    fn delete(&self, id: &str) -> Result<(), MigrateError>;
}

/// Blocking reqwest client bound to one collection URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create an ApiClient for `config.base_url` with the configured
    /// request timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

/// Turn a response into `HttpStatus` unless its status is one of `accepted`.
/// The body is kept so the operator can see what the service complained about.
fn check_status(res: Response, accepted: &[StatusCode]) -> Result<Response, MigrateError> {
    let status = res.status();
    if accepted.contains(&status) {
        return Ok(res);
    }
    let body = res.text().unwrap_or_else(|_| "".into());
    Err(MigrateError::HttpStatus {
        status: status.as_u16(),
        body,
    })
}

impl QuestionStore for ApiClient {
    fn create(&self, question: &Question) -> Result<(), MigrateError> {
        tracing::debug!(url = %self.base_url, stage = %question.stage, "POST question");
        let res = self.client.post(&self.base_url).json(question).send()?;
        check_status(res, &[StatusCode::OK, StatusCode::CREATED])?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<RemoteRecord>, MigrateError> {
        tracing::debug!(url = %self.base_url, "GET collection");
        let res = self.client.get(&self.base_url).send()?;
        let res = check_status(res, &[StatusCode::OK])?;
        let text = res.text()?;
        let records: Vec<RemoteRecord> = serde_json::from_str(&text)
            .map_err(|e| MigrateError::InvalidResponse(e.to_string()))?;
        tracing::debug!(count = records.len(), "collection listed");
        Ok(records)
    }

    fn delete(&self, id: &str) -> Result<(), MigrateError> {
        let url = self.record_url(id);
        tracing::debug!(url = %url, "DELETE record");
        let res = self.client.delete(&url).send()?;
        check_status(res, &[StatusCode::OK])?;
        Ok(())
    }
}
