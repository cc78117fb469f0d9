use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::env;
use thiserror::Error;

pub const PROJECT_ID_HEADER: &str = "X-Apper-Project-Id";
pub const PUBLIC_KEY_HEADER: &str = "X-Apper-Public-Key";

/// Identifies the backend project and, once signed in, the user session.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub project_id: String,
    pub public_key: String,
    pub session_token: Option<String>,
}

#[derive(Error, Debug)]
pub enum CredentialsError {
    #[error("Missing project id")]
    MissingProjectId,
    #[error("Missing public key")]
    MissingPublicKey,
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl Credentials {
    pub fn new(project_id: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            public_key: public_key.into(),
            session_token: None,
        }
    }

    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Reads `APPER_PROJECT_ID` and `APPER_PUBLIC_KEY`.
    pub fn from_env() -> Result<Self, CredentialsError> {
        let project_id = env::var("APPER_PROJECT_ID")
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(CredentialsError::MissingProjectId)?;
        let public_key = env::var("APPER_PUBLIC_KEY")
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(CredentialsError::MissingPublicKey)?;
        Ok(Self::new(project_id, public_key))
    }

    pub fn validate(&self) -> Result<(), CredentialsError> {
        if self.project_id.trim().is_empty() {
            return Err(CredentialsError::MissingProjectId);
        }
        if self.public_key.trim().is_empty() {
            return Err(CredentialsError::MissingPublicKey);
        }
        Ok(())
    }

    pub fn headers(&self) -> Result<HeaderMap, CredentialsError> {
        let value = |v: &str| {
            HeaderValue::from_str(v).map_err(|e| CredentialsError::InvalidHeader(e.to_string()))
        };

        let mut headers = HeaderMap::new();
        headers.insert(PROJECT_ID_HEADER, value(&self.project_id)?);
        headers.insert(PUBLIC_KEY_HEADER, value(&self.public_key)?);
        if let Some(token) = &self.session_token {
            headers.insert(AUTHORIZATION, value(&format!("Bearer {}", token))?);
        }
        Ok(headers)
    }
}
