pub mod env;
pub mod redact;
