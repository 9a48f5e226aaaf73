use serde::Serialize;
use serde_json::{Map, Value};

use crate::constants::retry::RATE_LIMITED_STATUS;

const RETRY_AFTER_KEY: &str = "retry_after";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    InvalidCredential,
    Timeout,
    Network,
    /// Failure reported by the API itself (HTTP status or `success: false`).
    Remote,
    InvalidResponse,
    Internal,
    /// Routing signal: the host must serve the call locally.
    LocalOnlyAction,
    UnsupportedTool,
    ProjectResolveFailed,
}

#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub code: String,
    pub message: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl ApiError {
    pub fn new(
        kind: ApiErrorKind,
        code: impl Into<String>,
        message: impl Into<String>,
        status_code: u16,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            status_code,
            details: None,
        }
    }

    pub fn with_retry_after(mut self, retry_after: impl Into<String>) -> Self {
        self.details
            .get_or_insert_with(Map::new)
            .insert(RETRY_AFTER_KEY.to_string(), Value::String(retry_after.into()));
        self
    }

    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new(
            ApiErrorKind::InvalidCredential,
            "INVALID_CREDENTIAL",
            message,
            0,
        )
    }

    pub fn timeout() -> Self {
        Self::new(ApiErrorKind::Timeout, "TIMEOUT", "Request timed out", 408)
    }

    pub fn network(cause: impl std::fmt::Display) -> Self {
        Self::new(
            ApiErrorKind::Network,
            "NETWORK_ERROR",
            format!("Network error: {}", cause),
            0,
        )
    }

    /// Error surfaced by the API; a missing code falls back to `default_code`.
    pub fn remote(
        code: Option<String>,
        default_code: &str,
        message: impl Into<String>,
        status_code: u16,
    ) -> Self {
        let code = code
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| default_code.to_string());
        Self::new(ApiErrorKind::Remote, code, message, status_code)
    }

    pub fn invalid_response() -> Self {
        Self::new(
            ApiErrorKind::InvalidResponse,
            "INVALID_RESPONSE",
            "Invalid JSON response from server",
            500,
        )
    }

    pub fn internal(message: impl Into<String>, status_code: u16) -> Self {
        Self::new(ApiErrorKind::Internal, "INTERNAL_ERROR", message, status_code)
    }

    pub fn local_only(tool: &str, action: &str) -> Self {
        Self::new(
            ApiErrorKind::LocalOnlyAction,
            "LOCAL_ONLY_ACTION",
            format!(
                "Action '{}.{}' should be handled locally (no DB access required)",
                tool, action
            ),
            200,
        )
    }

    pub fn unsupported_tool(tool: &str, supported: &[&str]) -> Self {
        Self::new(
            ApiErrorKind::UnsupportedTool,
            "UNSUPPORTED_TOOL",
            format!(
                "Tool '{}' is not supported in SaaS mode. Supported tools: {}",
                tool,
                supported.join(", ")
            ),
            400,
        )
    }

    pub fn project_resolve_failed(message: impl Into<String>, status_code: u16) -> Self {
        Self::new(
            ApiErrorKind::ProjectResolveFailed,
            "PROJECT_RESOLVE_FAILED",
            message,
            status_code,
        )
    }

    pub fn is_local_only(&self) -> bool {
        self.kind == ApiErrorKind::LocalOnlyAction
    }

    pub fn is_project_resolve_failure(&self) -> bool {
        self.kind == ApiErrorKind::ProjectResolveFailed
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status_code == RATE_LIMITED_STATUS
    }

    pub fn retry_after(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.get(RETRY_AFTER_KEY))
            .and_then(Value::as_str)
    }
}
