use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::ApiError;

pub mod saas;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendType {
    Local,
    Plugin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheckResult {
    pub ok: bool,
    /// Milliseconds spent on the probe, up to success or failure.
    pub latency: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Capability set shared by every tool backend the host can select.
#[async_trait]
pub trait ToolBackend: Send + Sync {
    async fn execute(
        &self,
        tool: &str,
        action: &str,
        params: Map<String, Value>,
    ) -> Result<Value, ApiError>;

    async fn health_check(&self) -> HealthCheckResult;

    async fn disconnect(&self) -> Result<(), ApiError>;

    fn backend_type(&self) -> BackendType;

    fn plugin_name(&self) -> Option<&str> {
        None
    }
}
