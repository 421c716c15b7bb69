//! Dashboard configuration.

use std::path::PathBuf;

/// Environment variable that overrides the default backend URL.
pub const URL_ENV: &str = "TASKDASH_URL";

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Task backend base URL.
    pub base_url: String,

    /// File holding task tokens.
    pub token_store_path: PathBuf,

    /// Board refresh interval for `watch` (seconds).
    pub refresh_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: std::env::var(URL_ENV)
                .ok()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| "http://localhost:5000".to_string()),
            token_store_path: default_token_store_path(),
            refresh_interval_secs: 30,
        }
    }
}

impl Config {
    /// Apply command-line overrides on top of the defaults.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        token_store: Option<PathBuf>,
        interval_secs: Option<u64>,
    ) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(path) = token_store {
            self.token_store_path = path;
        }
        if let Some(secs) = interval_secs {
            // tokio::time::interval panics on a zero period.
            self.refresh_interval_secs = secs.max(1);
        }
        self
    }
}

fn default_token_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("taskdash").join("tokens.json"))
        .unwrap_or_else(|| PathBuf::from("taskdash-tokens.json"))
}
