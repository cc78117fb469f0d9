use serde::Deserialize;

use crate::{Record, RecordsError};

/// Outcome of a single record in a create or update call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MutationResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Record>,
    #[serde(default)]
    pub message: Option<String>,
}

impl MutationResult {
    pub fn ok(data: Record) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// This is the generic envelope the record API wraps every response in. `data` is used by reads,
/// `results` by writes.
#[derive(Debug, Deserialize)]
pub struct RecordsResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub results: Vec<MutationResult>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

fn default_success() -> bool {
    true
}

impl<T> RecordsResponse<T> {
    /// Turns an envelope with `success: false` into [`RecordsError::Rejected`].
    pub fn accepted(self) -> Result<Self, RecordsError> {
        if self.success {
            Ok(self)
        } else {
            Err(RecordsError::Rejected(
                self.message
                    .unwrap_or_else(|| "request rejected by record API".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_success_defaults_to_accepted() {
        let response: RecordsResponse<Vec<Record>> =
            serde_json::from_str(r#"{"data": [{"Id": 1, "Name": "Acme"}]}"#).unwrap();
        let response = response.accepted().unwrap();
        assert_eq!(response.data.unwrap().len(), 1);
    }

    #[test]
    fn unsuccessful_envelope_is_rejected_with_message() {
        let response: RecordsResponse<Vec<Record>> =
            serde_json::from_str(r#"{"success": false, "message": "Invalid field budget"}"#)
                .unwrap();
        match response.accepted() {
            Err(RecordsError::Rejected(msg)) => assert_eq!(msg, "Invalid field budget"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn null_data_reads_as_none() {
        let response: RecordsResponse<Record> =
            serde_json::from_str(r#"{"success": true, "data": null}"#).unwrap();
        assert!(response.data.is_none());
    }
}
