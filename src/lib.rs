pub mod config;
pub mod constants;
pub mod errors;
pub mod managers;
pub mod plugin;
pub mod services;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use config::CloudConfig;
pub use errors::{ApiError, ApiErrorKind};
pub use managers::saas::SaasBackend;
pub use managers::{BackendType, HealthCheckResult, ToolBackend};
pub use plugin::{create_backend, resolve_project, MIN_VERSION, VERSION};
pub use services::identity::{ConnectionIdentity, Environment};
