//! Configuration data model and validation

use crate::models::run::{MAX_REQUEST_COUNT, MIN_REQUEST_COUNT};
use crate::types::{AppError, Result, RunCategory};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the deployment under test
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Deployment mode the run is tagged with
    #[serde(default = "default_category")]
    pub category: RunCategory,

    /// Number of sequential round trips to issue
    #[serde(default = "default_request_count")]
    pub request_count: u32,

    /// Request timeout duration
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// How many recent runs to show in the history table
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            category: default_category(),
            request_count: default_request_count(),
            timeout_seconds: default_timeout_secs(),
            history_limit: default_history_limit(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(AppError::config("Base URL cannot be empty"));
        }

        match url::Url::parse(&self.base_url) {
            Ok(parsed) => {
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::config(format!(
                        "Base URL must use http or https: {}",
                        self.base_url
                    )));
                }
            }
            Err(e) => {
                return Err(AppError::config(format!(
                    "Invalid base URL '{}': {}",
                    self.base_url, e
                )));
            }
        }

        // Out-of-range counts are rejected before a run may start, not clamped
        if self.request_count < MIN_REQUEST_COUNT {
            return Err(AppError::config(format!(
                "Request count must be at least {}",
                MIN_REQUEST_COUNT
            )));
        }

        if self.request_count > MAX_REQUEST_COUNT {
            return Err(AppError::config(format!(
                "Request count cannot exceed {}",
                MAX_REQUEST_COUNT
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > 300 {
            return Err(AppError::config("Timeout cannot exceed 300 seconds"));
        }

        if self.history_limit == 0 {
            return Err(AppError::config("History limit must be greater than 0"));
        }

        Ok(())
    }

    /// Absolute URL of the ping endpoint
    pub fn ping_url(&self) -> String {
        format!("{}/benchmark/ping", self.base_url.trim_end_matches('/'))
    }

    /// Absolute URL of the runs resource
    pub fn runs_url(&self) -> String {
        format!("{}/benchmark/runs", self.base_url.trim_end_matches('/'))
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var("BENCH_BASE_URL") {
            if !base_url.trim().is_empty() {
                self.base_url = base_url.trim().to_string();
            }
        }

        if let Ok(category) = std::env::var("BENCH_CATEGORY") {
            self.category = RunCategory::from_str(&category)?;
        }

        if let Ok(request_count) = std::env::var("BENCH_REQUEST_COUNT") {
            self.request_count = request_count.parse().map_err(|e| {
                AppError::config(format!(
                    "Invalid BENCH_REQUEST_COUNT value '{}': {}",
                    request_count, e
                ))
            })?;
        }

        if let Ok(timeout) = std::env::var("BENCH_TIMEOUT_SECONDS") {
            self.timeout_seconds = timeout.parse().map_err(|e| {
                AppError::config(format!("Invalid BENCH_TIMEOUT_SECONDS value '{}': {}", timeout, e))
            })?;
        }

        if let Ok(enable_color) = std::env::var("BENCH_ENABLE_COLOR") {
            self.enable_color = enable_color.parse().map_err(|e| {
                AppError::config(format!("Invalid BENCH_ENABLE_COLOR value '{}': {}", enable_color, e))
            })?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_base_url() -> String {
    crate::defaults::DEFAULT_BASE_URL.to_string()
}

fn default_category() -> RunCategory {
    crate::defaults::DEFAULT_CATEGORY
}

fn default_request_count() -> u32 {
    crate::defaults::DEFAULT_REQUEST_COUNT
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_history_limit() -> usize {
    crate::defaults::DEFAULT_HISTORY_LIMIT
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
