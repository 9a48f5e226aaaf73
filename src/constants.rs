pub mod endpoint {
    pub const PRODUCTION: &str = "https://api.sqlew.io";
    pub const DEVELOPMENT: &str = "http://localhost:8080";

    // Fixed at build time; there is deliberately no runtime override.
    #[cfg(feature = "development")]
    pub const API_ENDPOINT: &str = DEVELOPMENT;
    #[cfg(not(feature = "development"))]
    pub const API_ENDPOINT: &str = PRODUCTION;
}

pub mod network {
    pub const REQUEST_TIMEOUT_MS: u64 = 30_000;
    pub const RESOLVE_TIMEOUT_MS: u64 = 30_000;
    pub const USER_AGENT: &str = concat!("sqlew-connector/", env!("CARGO_PKG_VERSION"));
}

pub mod retry {
    pub const MAX_RETRIES: u32 = 3;
    pub const INITIAL_DELAY_MS: u64 = 1_000;
    pub const MAX_DELAY_MS: u64 = 30_000;
    pub const RATE_LIMITED_STATUS: u16 = 429;
}

pub mod routes {
    pub const HEALTH: &str = "/health";
    pub const PROJECT_RESOLVE: &str = "/api/v1/project/resolve";
    pub const TOOL_PREFIX: &str = "/api/v1";
}

pub mod tools {
    pub const SUPPORTED_TOOLS: &[&str] = &["decision", "constraint", "suggest"];

    /// `tool.action` pairs answered from local TOML/help data, never the API.
    pub const LOCAL_ONLY_ACTIONS: &[&str] = &[
        "decision.help",
        "decision.example",
        "decision.use_case",
        "constraint.suggest_pending",
        "constraint.help",
        "constraint.example",
        "constraint.use_case",
        "suggest.help",
    ];

    /// (tool, action, from, to) field renames applied before forwarding.
    pub const PARAM_REMAPS: &[(&str, &str, &str, &str)] = &[
        ("constraint", "deactivate", "constraint_id", "id"),
        ("constraint", "activate", "constraint_id", "id"),
    ];
}

pub mod plugin {
    pub const NAME: &str = "saas-connector";
    pub const VERSION: &str = "1.0.0";
    pub const MIN_HOST_VERSION: &str = "4.4.0";
}
