use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::services::identity::ConnectionIdentity;
use crate::utils::env::env_string;

pub const API_KEY_ENV: &str = "SQLEW_API_KEY";
pub const PROJECT_NAME_ENV: &str = "SQLEW_PROJECT_NAME";
pub const PROJECT_ID_ENV: &str = "SQLEW_PROJECT_ID";

/// Configuration bundle handed over by the host when it creates a backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudConfig {
    pub api_key: String,
    /// `[project].name` from the host's project config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Previously resolved project id, if the host has one cached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_identity: Option<ConnectionIdentity>,
}

impl CloudConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_name: None,
            project_id: None,
            connection_identity: None,
        }
    }

    pub fn from_env() -> Result<Self, ApiError> {
        let api_key = env_string(API_KEY_ENV).ok_or_else(|| {
            ApiError::invalid_credential(format!("{} is not set", API_KEY_ENV))
        })?;
        Ok(Self {
            api_key,
            project_name: env_string(PROJECT_NAME_ENV),
            project_id: env_string(PROJECT_ID_ENV),
            connection_identity: None,
        })
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn with_project_id(mut self, id: impl Into<String>) -> Self {
        self.project_id = Some(id.into());
        self
    }

    pub fn with_connection_identity(mut self, identity: ConnectionIdentity) -> Self {
        self.connection_identity = Some(identity);
        self
    }

    /// A project name is configured but has not been resolved to an id yet.
    pub fn needs_project_resolution(&self) -> bool {
        self.project_id.is_none() && self.project_name.is_some()
    }
}

impl std::fmt::Debug for CloudConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudConfig")
            .field("api_key", &"[REDACTED]")
            .field("project_name", &self.project_name)
            .field("project_id", &self.project_id)
            .field("connection_identity", &self.connection_identity)
            .finish()
    }
}
