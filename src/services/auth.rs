use reqwest::header::HeaderValue;

use crate::errors::ApiError;

/// Holds the API key and renders the `Authorization` header for it.
#[derive(Clone)]
pub struct AuthManager {
    api_key: String,
}

impl AuthManager {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ApiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ApiError::invalid_credential("API key is required"));
        }
        Ok(Self { api_key })
    }

    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    pub fn header_value(&self) -> Result<HeaderValue, ApiError> {
        HeaderValue::from_str(&self.authorization_header()).map_err(|_| {
            ApiError::invalid_credential("API key contains characters not allowed in a header")
        })
    }
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
