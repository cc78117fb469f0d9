use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::{
    Credentials, CredentialsError, FetchParams, MutationResult, Record, RecordApi, RecordId,
    RecordsResponse, RecordsURL, Table, UserProfile,
};

pub struct RecordClient {
    http: reqwest::Client,
    base_url: RecordsURL,
    credentials: Credentials,
}

impl RecordClient {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, RecordsError> {
        credentials.validate()?;
        let http = reqwest::Client::builder()
            .default_headers(credentials.headers()?)
            .build()
            .map_err(|e| RecordsError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url: RecordsURL::new(base_url),
            credentials,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: RecordsURL,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<Option<RecordsResponse<T>>, RecordsError> {
        let mut request = self.http.request(method.clone(), url.as_ref());
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| RecordsError::Request(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(%method, url = url.as_ref(), %status, "record API refused credentials");
            return Err(RecordsError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(RecordsError::Request(format!("{}: {}", status, text)));
        }

        let resp_data = resp.json::<RecordsResponse<T>>().await.map_err(|e| {
            RecordsError::Parsing(format!("Failed to parse response as JSON: {}", e))
        })?;

        resp_data.accepted().map(Some)
    }

    async fn mutate(
        &self,
        method: Method,
        table: Table,
        records: Vec<Record>,
    ) -> Result<Vec<MutationResult>, RecordsError> {
        let body = json!({ "records": records });
        let response: RecordsResponse<serde_json::Value> = self
            .send(method, self.base_url.records(table), Some(&body))
            .await?
            .ok_or_else(|| RecordsError::NotFound(format!("table {}", table)))?;

        Ok(response.results)
    }
}

#[async_trait]
impl RecordApi for RecordClient {
    #[tracing::instrument(skip(self, params), fields(table = %table))]
    async fn fetch_records(
        &self,
        table: Table,
        params: &FetchParams,
    ) -> Result<Vec<Record>, RecordsError> {
        let response: Option<RecordsResponse<Vec<Record>>> = self
            .send(Method::POST, self.base_url.query(table), Some(params))
            .await?;

        let records = response.and_then(|r| r.data).unwrap_or_default();
        tracing::debug!(count = records.len(), "fetched records");
        Ok(records)
    }

    #[tracing::instrument(skip(self), fields(table = %table))]
    async fn get_record_by_id(
        &self,
        table: Table,
        id: RecordId,
    ) -> Result<Option<Record>, RecordsError> {
        let response: Option<RecordsResponse<Record>> = self
            .send(Method::GET, self.base_url.record(table, id), None::<&()>)
            .await?;

        Ok(response.and_then(|r| r.data))
    }

    #[tracing::instrument(skip(self, records), fields(table = %table, count = records.len()))]
    async fn create_records(
        &self,
        table: Table,
        records: Vec<Record>,
    ) -> Result<Vec<MutationResult>, RecordsError> {
        self.mutate(Method::POST, table, records).await
    }

    #[tracing::instrument(skip(self, records), fields(table = %table, count = records.len()))]
    async fn update_records(
        &self,
        table: Table,
        records: Vec<Record>,
    ) -> Result<Vec<MutationResult>, RecordsError> {
        self.mutate(Method::PUT, table, records).await
    }

    #[tracing::instrument(skip(self), fields(table = %table))]
    async fn delete_records(&self, table: Table, ids: &[RecordId]) -> Result<bool, RecordsError> {
        let body = json!({ "RecordIds": ids });
        let response: Option<RecordsResponse<serde_json::Value>> = self
            .send(Method::DELETE, self.base_url.records(table), Some(&body))
            .await?;

        Ok(response.is_some_and(|r| r.results.iter().all(|res| res.success)))
    }

    async fn current_user(&self) -> Result<Option<UserProfile>, RecordsError> {
        let response: Option<RecordsResponse<UserProfile>> = self
            .send(
                Method::GET,
                self.base_url.append_path("auth/me"),
                None::<&()>,
            )
            .await?;

        Ok(response.and_then(|r| r.data))
    }
}

#[derive(Error, Debug)]
pub enum RecordsError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("RequestError: {0}")]
    Request(String),
    #[error("ParsingError: {0}")]
    Parsing(String),
    #[error("Rejected: {0}")]
    Rejected(String),
    #[error("NotFound: {0}")]
    NotFound(String),
    #[error("Credentials: {0}")]
    Credentials(#[from] CredentialsError),
}

impl RecordsError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RecordsError::Unauthorized)
    }
}
