use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub url: String,

    #[serde(default)]
    pub test_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StopResponse {
    pub message: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeResponse {
    pub code: String,
    pub is_recording: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
