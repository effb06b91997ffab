//! Runtime configuration from environment variables.

use std::env;

/// Configuration loaded from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite catalog database
    pub db_path: String,

    /// Per-vendor snapshot fetch timeout in milliseconds
    pub vendor_fetch_timeout_ms: u64,

    /// Chart render call timeout in milliseconds
    pub chart_timeout_ms: u64,

    /// Chart render endpoint (QuickChart-compatible)
    pub chart_url: String,

    /// Title index refresh interval in milliseconds
    pub title_refresh_interval_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `GAMESEEKER_DB_PATH` (default: gameseeker.db)
    /// - `VENDOR_FETCH_TIMEOUT_MS` (default: 5000)
    /// - `CHART_RENDER_TIMEOUT_MS` (default: 10000)
    /// - `CHART_RENDER_URL` (default: https://quickchart.io/chart)
    /// - `TITLE_REFRESH_INTERVAL_MS` (default: 300000)
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("GAMESEEKER_DB_PATH")
                .unwrap_or_else(|_| "gameseeker.db".to_string()),

            vendor_fetch_timeout_ms: env::var("VENDOR_FETCH_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5_000),

            chart_timeout_ms: env::var("CHART_RENDER_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10_000),

            chart_url: env::var("CHART_RENDER_URL")
                .unwrap_or_else(|_| "https://quickchart.io/chart".to_string()),

            title_refresh_interval_ms: env::var("TITLE_REFRESH_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300_000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_and_overrides() {
        // Defaults when nothing is set
        env::remove_var("GAMESEEKER_DB_PATH");
        env::remove_var("VENDOR_FETCH_TIMEOUT_MS");
        env::remove_var("CHART_RENDER_TIMEOUT_MS");
        env::remove_var("CHART_RENDER_URL");
        env::remove_var("TITLE_REFRESH_INTERVAL_MS");

        let config = Config::from_env();
        assert_eq!(config.db_path, "gameseeker.db");
        assert_eq!(config.vendor_fetch_timeout_ms, 5_000);
        assert_eq!(config.chart_timeout_ms, 10_000);
        assert_eq!(config.chart_url, "https://quickchart.io/chart");
        assert_eq!(config.title_refresh_interval_ms, 300_000);

        // Overrides, including an unparseable number falling back
        env::set_var("GAMESEEKER_DB_PATH", "/tmp/test.db");
        env::set_var("VENDOR_FETCH_TIMEOUT_MS", "2500");
        env::set_var("TITLE_REFRESH_INTERVAL_MS", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.db_path, "/tmp/test.db");
        assert_eq!(config.vendor_fetch_timeout_ms, 2_500);
        assert_eq!(config.title_refresh_interval_ms, 300_000);

        // Cleanup
        env::remove_var("GAMESEEKER_DB_PATH");
        env::remove_var("VENDOR_FETCH_TIMEOUT_MS");
        env::remove_var("TITLE_REFRESH_INTERVAL_MS");
    }
}
