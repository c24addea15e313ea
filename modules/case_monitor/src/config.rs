use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the case monitor (`modules.case_monitor` in the app config).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseMonitorConfig {
    /// Analysis backend root, e.g. `https://analysis.example.com`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_upload_timeout_secs")]
    pub upload_timeout_secs: u64,
    #[serde(default = "default_search_timeout_secs")]
    pub search_timeout_secs: u64,
    #[serde(default = "default_analyze_timeout_secs")]
    pub analyze_timeout_secs: u64,
    #[serde(default = "default_days_back")]
    pub default_days_back: u32,
    #[serde(default = "default_max_results")]
    pub default_max_results: u32,
    /// Articles sent for analysis when none are selected.
    #[serde(default = "default_analyze_fallback")]
    pub analyze_fallback_count: usize,
    /// Refresh a token this many seconds before it expires.
    #[serde(default = "default_refresh_skew_secs")]
    pub token_refresh_skew_secs: i64,
}

impl Default for CaseMonitorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            upload_timeout_secs: default_upload_timeout_secs(),
            search_timeout_secs: default_search_timeout_secs(),
            analyze_timeout_secs: default_analyze_timeout_secs(),
            default_days_back: default_days_back(),
            default_max_results: default_max_results(),
            analyze_fallback_count: default_analyze_fallback(),
            token_refresh_skew_secs: default_refresh_skew_secs(),
        }
    }
}

impl CaseMonitorConfig {
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn analyze_timeout(&self) -> Duration {
        Duration::from_secs(self.analyze_timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_upload_timeout_secs() -> u64 {
    180
}

fn default_search_timeout_secs() -> u64 {
    120
}

fn default_analyze_timeout_secs() -> u64 {
    300
}

fn default_days_back() -> u32 {
    7
}

fn default_max_results() -> u32 {
    20
}

fn default_analyze_fallback() -> usize {
    10
}

fn default_refresh_skew_secs() -> i64 {
    60
}
