use std::path::{Component, Path};

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Windows,
    Macos,
    Linux,
    Wsl,
    Docker,
    #[default]
    Unknown,
}

impl Environment {
    pub fn detect() -> Self {
        if Path::new("/.dockerenv").exists() {
            return Environment::Docker;
        }
        if cfg!(target_os = "windows") {
            return Environment::Windows;
        }
        if cfg!(target_os = "macos") {
            return Environment::Macos;
        }
        if cfg!(target_os = "linux") {
            let is_wsl = std::fs::read_to_string("/proc/version")
                .map(|v| v.to_lowercase().contains("microsoft"))
                .unwrap_or(false);
            return if is_wsl {
                Environment::Wsl
            } else {
                Environment::Linux
            };
        }
        Environment::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Windows => "windows",
            Environment::Macos => "macos",
            Environment::Linux => "linux",
            Environment::Wsl => "wsl",
            Environment::Docker => "docker",
            Environment::Unknown => "unknown",
        }
    }
}

/// Identifies one client installation for seat-based usage attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionIdentity {
    /// SHA-256 of the full path, Base64URL without padding (43 chars).
    pub connection_hash: String,
    pub environment: Environment,
    /// Last two path segments, e.g. `RustroverProjects/my-app`.
    pub path_suffix: String,
    /// Kept locally; never sent to the API.
    #[serde(default)]
    pub full_path: String,
}

impl ConnectionIdentity {
    pub fn from_path(path: &Path) -> Self {
        Self::with_environment(path, Environment::detect())
    }

    pub fn with_environment(path: &Path, environment: Environment) -> Self {
        let full_path = path.to_string_lossy().into_owned();
        let digest = Sha256::digest(full_path.as_bytes());
        let connection_hash = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest);
        Self {
            connection_hash,
            environment,
            path_suffix: path_suffix(path),
            full_path,
        }
    }
}

fn path_suffix(path: &Path) -> String {
    let segments: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let start = segments.len().saturating_sub(2);
    segments[start..].join("/")
}

/// Ambient fields merged into every POST body. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionContext {
    pub project_name: Option<String>,
    pub project_id: Option<String>,
    pub identity: Option<ConnectionIdentity>,
}

impl ConnectionContext {
    pub fn new(
        project_name: Option<String>,
        project_id: Option<String>,
        identity: Option<ConnectionIdentity>,
    ) -> Self {
        Self {
            project_name,
            project_id,
            identity,
        }
    }

    /// Context fields first, then `body` on top: caller keys win on collision.
    pub fn merge_into(&self, body: Map<String, Value>) -> Map<String, Value> {
        let mut merged = Map::new();
        if let Some(id) = &self.project_id {
            merged.insert("project_id".to_string(), Value::String(id.clone()));
        }
        if let Some(name) = &self.project_name {
            merged.insert("project_name".to_string(), Value::String(name.clone()));
        }
        if let Some(identity) = &self.identity {
            merged.insert(
                "connection_hash".to_string(),
                Value::String(identity.connection_hash.clone()),
            );
            merged.insert(
                "connection_display".to_string(),
                serde_json::json!({
                    "environment": identity.environment.as_str(),
                    "path_suffix": identity.path_suffix,
                }),
            );
        }
        merged.extend(body);
        merged
    }
}
