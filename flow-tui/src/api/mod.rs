use records::{Credentials, MemoryRecordApi, RecordApi, RecordClient, RecordsError};
use std::sync::Arc;

use crate::config::FlowConfig;

pub mod dev_backend;

pub type SharedApi = Arc<dyn RecordApi>;

/// Where records live. Turned into a [`RecordApi`] once the session is known.
#[derive(Debug, Clone)]
pub enum Backend {
    Remote {
        api_url: String,
        project_id: String,
        public_key: String,
    },
    Dev(MemoryRecordApi),
}

impl Backend {
    pub fn remote(cfg: &FlowConfig) -> Self {
        Backend::Remote {
            api_url: cfg.api_url.clone(),
            project_id: cfg.project_id.clone(),
            public_key: cfg.public_key.clone(),
        }
    }

    pub fn dev() -> Self {
        Backend::Dev(dev_backend::seeded())
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Backend::Dev(_))
    }

    /// Build an API handle, authenticated with `session` when given.
    pub fn connect(&self, session: Option<&str>) -> Result<SharedApi, RecordsError> {
        match self {
            Backend::Remote {
                api_url,
                project_id,
                public_key,
            } => {
                let mut credentials = Credentials::new(project_id.clone(), public_key.clone());
                if let Some(token) = session {
                    credentials = credentials.with_session(token);
                }
                Ok(Arc::new(RecordClient::new(api_url, credentials)?))
            }
            Backend::Dev(api) => {
                api.set_signed_out(session.is_none());
                Ok(Arc::new(api.clone()))
            }
        }
    }
}
