pub mod auth;
pub mod http_client;
pub mod identity;
pub mod logger;
pub mod project_resolver;
