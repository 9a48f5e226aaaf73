use std::time::Instant;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::CloudConfig;
use crate::constants::{plugin, routes, tools};
use crate::errors::ApiError;
use crate::managers::{BackendType, HealthCheckResult, ToolBackend};
use crate::services::auth::AuthManager;
use crate::services::http_client::HttpClient;
use crate::services::identity::ConnectionContext;
use crate::services::logger::Logger;

pub fn is_local_only_action(tool: &str, action: &str) -> bool {
    let key = format!("{}.{}", tool, action);
    tools::LOCAL_ONLY_ACTIONS.contains(&key.as_str())
}

pub fn is_supported_tool(tool: &str) -> bool {
    tools::SUPPORTED_TOOLS.contains(&tool)
}

/// Renames legacy field names the API no longer accepts. An explicit
/// target field is never overwritten.
pub fn normalize_params(
    tool: &str,
    action: &str,
    mut params: Map<String, Value>,
) -> Map<String, Value> {
    for (remap_tool, remap_action, from, to) in tools::PARAM_REMAPS {
        if *remap_tool != tool || *remap_action != action {
            continue;
        }
        if params.contains_key(*to) {
            continue;
        }
        if let Some(value) = params.remove(*from) {
            params.insert(to.to_string(), value);
        }
    }
    params
}

pub struct SaasBackend {
    logger: Logger,
    http: HttpClient,
    display_name: Option<String>,
}

impl SaasBackend {
    pub fn new(logger: Logger, config: CloudConfig) -> Result<Self, ApiError> {
        let logger = logger.child("saas");
        let auth = AuthManager::new(config.api_key)?;
        let context = ConnectionContext::new(
            config.project_name,
            config.project_id,
            config.connection_identity,
        );
        let http = HttpClient::new(logger.clone(), auth, context)?;
        Ok(Self {
            logger,
            http,
            display_name: None,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = Some(name.into()).filter(|n| !n.trim().is_empty());
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Routes one call: local-only and unsupported checks both run before
    /// params are touched or anything goes on the wire.
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        tool: &str,
        action: &str,
        params: Map<String, Value>,
    ) -> Result<T, ApiError> {
        if is_local_only_action(tool, action) {
            self.logger.debug(
                "Deflecting to local handler",
                Some(&serde_json::json!({"tool": tool, "action": action})),
            );
            return Err(ApiError::local_only(tool, action));
        }
        if !is_supported_tool(tool) {
            return Err(ApiError::unsupported_tool(tool, tools::SUPPORTED_TOOLS));
        }

        let params = normalize_params(tool, action, params);
        let path = format!("{}/{}/{}", routes::TOOL_PREFIX, tool, action);
        self.http.post(&path, params).await
    }
}

#[async_trait]
impl ToolBackend for SaasBackend {
    async fn execute(
        &self,
        tool: &str,
        action: &str,
        params: Map<String, Value>,
    ) -> Result<Value, ApiError> {
        self.execute_as(tool, action, params).await
    }

    async fn health_check(&self) -> HealthCheckResult {
        let started = Instant::now();
        let result = self.http.get::<Value>(routes::HEALTH).await;
        let latency = started.elapsed().as_millis() as u64;
        match result {
            Ok(_) => HealthCheckResult {
                ok: true,
                latency,
                message: None,
            },
            Err(err) => {
                self.logger.warn(
                    "Health check failed",
                    Some(&serde_json::json!({"code": err.code, "latency": latency})),
                );
                HealthCheckResult {
                    ok: false,
                    latency,
                    message: Some(err.message),
                }
            }
        }
    }

    async fn disconnect(&self) -> Result<(), ApiError> {
        // stateless HTTP; nothing to release
        Ok(())
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Plugin
    }

    fn plugin_name(&self) -> Option<&str> {
        Some(plugin::NAME)
    }
}
