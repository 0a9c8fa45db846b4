use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api/v1";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_STORAGE_PATH: &str = ".mechanic-connect/storage.json";

#[derive(Debug, Clone)]
pub struct Config {
    /// Origin plus the `/api/v1` prefix every domain call is made under.
    pub api_base_url: String,
    /// Applied uniformly to every transport call.
    pub request_timeout: Duration,
    /// Where `FileStore` keeps the persisted account-kind marker.
    pub storage_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let timeout_ms = env::var("API_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            request_timeout: Duration::from_millis(timeout_ms),
            storage_path: env::var("SESSION_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_PATH)),
        }
    }

    /// Config pointing at `base_url` with every other field defaulted.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::remove_var("API_BASE_URL");
        env::remove_var("API_TIMEOUT_MS");
        env::remove_var("SESSION_STORAGE_PATH");

        let config = Config::from_env();

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.storage_path, PathBuf::from(DEFAULT_STORAGE_PATH));

        // Test custom values
        env::set_var("API_BASE_URL", "https://api.example.com/api/v1");
        env::set_var("API_TIMEOUT_MS", "2500");
        env::set_var("SESSION_STORAGE_PATH", "/tmp/session.json");

        let config = Config::from_env();

        assert_eq!(config.api_base_url, "https://api.example.com/api/v1");
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.storage_path, PathBuf::from("/tmp/session.json"));

        // Unparsable timeout falls back to the default
        env::set_var("API_TIMEOUT_MS", "soon");
        let config = Config::from_env();
        assert_eq!(config.request_timeout, Duration::from_secs(10));

        env::remove_var("API_BASE_URL");
        env::remove_var("API_TIMEOUT_MS");
        env::remove_var("SESSION_STORAGE_PATH");
    }
}
