//! Entry points the host's plugin loader calls.

use crate::config::CloudConfig;
use crate::constants::plugin;
use crate::errors::ApiError;
use crate::managers::saas::SaasBackend;
use crate::services::logger::Logger;
use crate::services::project_resolver::ProjectResolver;

pub const VERSION: &str = plugin::VERSION;
/// Oldest host release this connector works with.
pub const MIN_VERSION: &str = plugin::MIN_HOST_VERSION;

const LOG_CONTEXT: &str = "sqlew-connector";

pub fn create_backend(config: CloudConfig) -> Result<SaasBackend, ApiError> {
    SaasBackend::new(Logger::new(LOG_CONTEXT), config)
}

/// Safe to repeat; the host typically calls this on a project-id cache miss.
pub async fn resolve_project(api_key: &str, project_name: &str) -> Result<String, ApiError> {
    ProjectResolver::new(Logger::new(LOG_CONTEXT))?
        .resolve(api_key, project_name)
        .await
}
