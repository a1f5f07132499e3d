//! Wire types for `POST /analyze`, shared by the remote client and the server.

use crate::{FileRecord, GenerationOptions};
use serde::{Deserialize, Serialize};

/// Maximum accepted request body, in bytes
pub const MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// File as sent to the generation endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePayload {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub path: Option<String>,
}

impl From<&FileRecord> for SourcePayload {
    fn from(file: &FileRecord) -> Self {
        Self {
            name: file.name.clone(),
            content: file.content.clone(),
            path: Some(file.preferred_path().to_string()),
        }
    }
}

/// Request body of `POST /analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub file: SourcePayload,
    /// Framework name; unknown values are treated as Jest
    #[serde(default)]
    pub framework: String,
    #[serde(default)]
    pub options: GenerationOptions,
}

impl AnalyzeRequest {
    pub fn new(file: &FileRecord, framework: crate::Framework, options: GenerationOptions) -> Self {
        Self {
            file: SourcePayload::from(file),
            framework: framework.as_str().to_string(),
            options,
        }
    }
}

/// Provenance attached to a successful response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Which tier produced the test (`agent`, `template`, ...)
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Success body of `POST /analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub generated_test: Option<String>,
    #[serde(default)]
    pub metadata: Option<ResponseMetadata>,
}

/// Error body returned with a non-2xx status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
