//! Environment variable helpers shared by the loader and the null
//! driver's test configuration surface.

/// Read a boolean toggle: only the literal string "1" counts as set.
pub fn env_to_bool(name: &str) -> bool {
    matches!(std::env::var(name).as_deref(), Ok("1"))
}

/// Read a variable, treating absent and empty as the same thing.
pub fn env_string(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Some(v),
        _ => None,
    }
}
