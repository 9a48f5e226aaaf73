/// Reads an env var, trimming it; blank values count as unset.
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn first_env_string(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| env_string(key))
}
