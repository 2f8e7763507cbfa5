//! Support for library configuration options

use once_cell::sync::Lazy;

/// The server that is used when nothing else has been configured
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// The environment variable that can override [`DEFAULT_SERVER_URL`]
pub const SERVER_URL_ENV_VAR: &str = "TASK_CALENDAR_URL";

/// The base URL of the `/tasks` service.
/// It is read from the environment once, the first time it is used.
pub static SERVER_URL: Lazy<String> = Lazy::new(|| {
    server_url_from(std::env::var(SERVER_URL_ENV_VAR).ok())
});

/// Blank values fall back to [`DEFAULT_SERVER_URL`]
fn server_url_from(value: Option<String>) -> String {
    match value {
        Some(url) if url.trim().is_empty() == false => url.trim().to_string(),
        _ => DEFAULT_SERVER_URL.to_string(),
    }
}

/// The month displayed on startup, unless told otherwise (May)
pub const DEFAULT_MONTH: u32 = 5;
/// The year displayed on startup, unless told otherwise
pub const DEFAULT_YEAR: i32 = 2025;

pub fn server_url() -> &'static str {
    SERVER_URL.as_str()
}
