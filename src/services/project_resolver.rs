use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;

use crate::constants::{endpoint::API_ENDPOINT, network, routes};
use crate::errors::ApiError;
use crate::services::auth::AuthManager;
use crate::services::http_client::{build_client, ApiResponse};
use crate::services::logger::Logger;

#[derive(Debug, Deserialize)]
pub struct ProjectResolveResponse {
    pub project_id: Option<String>,
}

/// Exchanges a project name for its stable id. Runs before any
/// `HttpClient` exists, so it owns its transport and never retries.
#[derive(Debug, Clone)]
pub struct ProjectResolver {
    logger: Logger,
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ProjectResolver {
    pub fn new(logger: Logger) -> Result<Self, ApiError> {
        Ok(Self {
            logger: logger.child("resolve"),
            client: build_client()?,
            base_url: API_ENDPOINT.to_string(),
            timeout: Duration::from_millis(network::RESOLVE_TIMEOUT_MS),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[cfg(test)]
    pub(crate) fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn resolve(&self, api_key: &str, project_name: &str) -> Result<String, ApiError> {
        let auth = AuthManager::new(api_key)?;
        let url = format!("{}{}", self.base_url, routes::PROJECT_RESOLVE);
        let request = self
            .client
            .post(&url)
            .header(AUTHORIZATION, auth.header_value()?)
            .json(&serde_json::json!({ "project_name": project_name }));

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await;
            Ok::<_, reqwest::Error>((status, text))
        };
        let (status, text) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| ApiError::timeout())?
            .map_err(|err| {
                if err.is_timeout() {
                    ApiError::timeout()
                } else {
                    ApiError::network(err)
                }
            })?;

        let envelope = text.ok().and_then(|body| {
            serde_json::from_str::<ApiResponse<ProjectResolveResponse>>(&body).ok()
        });
        let failure = |detail: String| {
            ApiError::project_resolve_failed(
                format!("Failed to resolve project '{}': {}", project_name, detail),
                status.as_u16(),
            )
        };

        let Some(envelope) = envelope else {
            return Err(failure(format!("HTTP {}", status.as_u16())));
        };
        let error_message = envelope
            .error
            .and_then(|e| e.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        if !status.is_success() || !envelope.success {
            return Err(failure(error_message));
        }
        let project_id = envelope
            .data
            .and_then(|d| d.project_id)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| failure("response did not include a project_id".to_string()))?;

        self.logger.info(
            "Resolved project",
            Some(&serde_json::json!({"project_name": project_name, "project_id": project_id})),
        );
        Ok(project_id)
    }
}
