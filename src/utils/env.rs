/// Environment variable prefix checked before the bare key
pub const ENV_PREFIX: &str = "KITE_";

/// Get environment variable with KITE_ prefix, falling back to unprefixed version
///
/// Checks `KITE_{key}` first, then `{key}`, so deployments can use either
/// `KITE_PORT` or the conventional `PORT`.
///
/// # Examples
///
/// ```rust,ignore
/// // Checks KITE_METRICS_PATH first, then METRICS_PATH
/// let path = get_env_with_prefix("METRICS_PATH");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("{}{}", ENV_PREFIX, key))
        .or_else(|_| std::env::var(key))
        .ok()
}

/// Parse a boolean flag, accepting `true/false`, `1/0`, `yes/no` and `on/off`
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
