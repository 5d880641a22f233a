//! Configuration management: CLI/env merging and validation warnings

use crate::{cli::Cli, error::Result, models::Config};
use std::str::FromStr;

// Re-export from models for convenience
pub use crate::models::config::Config as BenchConfig;

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        // Start with default configuration
        let mut config = Config::default();

        // Load .env file if present; a missing file is not an error, but a
        // malformed one is
        match dotenv::dotenv() {
            Ok(path) => {
                if self.cli.debug {
                    println!("Loaded environment from {}", path.display());
                }
            }
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        // Merge environment variables into config
        config.merge_from_env()?;

        // Override with CLI arguments
        self.apply_cli_overrides(&mut config)?;

        // Validate the final configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) -> Result<()> {
        if let Some(ref base_url) = self.cli.base_url {
            config.base_url = base_url.clone();
        }

        if let Some(ref category) = self.cli.category {
            config.category = crate::types::RunCategory::from_str(category)?;
        }

        if let Some(count) = self.cli.count {
            config.request_count = count;
        }

        if let Some(timeout) = self.cli.timeout {
            config.timeout_seconds = timeout;
        }

        if let Some(limit) = self.cli.history_limit {
            config.history_limit = limit;
        }

        if self.cli.no_color {
            config.enable_color = false;
        } else if self.cli.color {
            config.enable_color = true;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        Ok(())
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Severity of a non-fatal configuration finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationLevel::Info => "INFO",
            ValidationLevel::Warning => "WARNING",
        }
    }
}

/// A non-fatal configuration finding worth surfacing to the user
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, _use_color: bool) -> String {
        format!("[{}] {}", self.level.as_str(), self.message)
    }
}

/// Validate configuration and collect advisory warnings beyond the hard checks
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    // Hard errors first
    config.validate()?;

    let mut warnings = Vec::new();

    if let Ok(parsed) = url::Url::parse(&config.base_url) {
        if parsed.scheme() == "https" {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Base URL '{}' uses HTTPS; TLS overhead is included in every sample",
                    config.base_url
                ),
            ));
        }

        if let Some(url::Host::Domain(host)) = parsed.host() {
            if host != "localhost" && !host.ends_with(".local") {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!(
                        "Base URL '{}' is not local; network jitter will dominate framework overhead",
                        config.base_url
                    ),
                ));
            }
        }
    }

    if config.request_count < 20 {
        warnings.push(ValidationWarning::new(
            ValidationLevel::Warning,
            format!(
                "Request count {} is low; percentile estimates will be coarse",
                config.request_count
            ),
        ));
    }

    if config.timeout_seconds > 60 {
        warnings.push(ValidationWarning::new(
            ValidationLevel::Info,
            format!(
                "Timeout of {}s is generous for a ping endpoint; a stuck server will stall the run",
                config.timeout_seconds
            ),
        ));
    }

    Ok(warnings)
}

/// Get configuration summary for display
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = String::new();
    summary.push_str(&format!("  Base URL: {}\n", config.base_url));
    summary.push_str(&format!("  Category: {}\n", config.category));
    summary.push_str(&format!("  Request count: {}\n", config.request_count));
    summary.push_str(&format!("  Timeout: {}s\n", config.timeout_seconds));
    summary.push_str(&format!("  History limit: {}\n", config.history_limit));
    summary.push_str(&format!("  Color output: {}", config.enable_color));
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RunCategory;

    fn cli_with_defaults() -> Cli {
        Cli {
            category: None,
            count: None,
            base_url: None,
            timeout: None,
            history_limit: None,
            color: false,
            no_color: false,
            verbose: false,
            debug: false,
            history: false,
            skip_record: false,
        }
    }

    #[test]
    fn test_cli_overrides_take_precedence() {
        let mut cli = cli_with_defaults();
        cli.category = Some("standard".to_string());
        cli.count = Some(42);
        cli.base_url = Some("http://10.0.0.5:8000".to_string());
        cli.no_color = true;

        let config = ConfigParser::new(cli).parse().unwrap();
        assert_eq!(config.category, RunCategory::Standard);
        assert_eq!(config.request_count, 42);
        assert_eq!(config.base_url, "http://10.0.0.5:8000");
        assert!(!config.enable_color);
    }

    #[test]
    fn test_invalid_category_rejected() {
        let mut cli = cli_with_defaults();
        cli.category = Some("turbo".to_string());
        assert!(ConfigParser::new(cli).parse().is_err());
    }

    #[test]
    fn test_out_of_range_count_rejected() {
        let mut cli = cli_with_defaults();
        cli.count = Some(1000);
        assert!(ConfigParser::new(cli).parse().is_err());
    }

    #[test]
    fn test_low_count_produces_warning() {
        let mut config = Config::default();
        config.request_count = 5;
        let warnings = validate_config(&config).unwrap();
        assert!(warnings
            .iter()
            .any(|w| w.level == ValidationLevel::Warning && w.message.contains("low")));
    }

    #[test]
    fn test_remote_base_url_produces_warning() {
        let mut config = Config::default();
        config.base_url = "https://bench.example.com".to_string();
        let warnings = validate_config(&config).unwrap();
        assert!(warnings.iter().any(|w| w.message.contains("not local")));
    }

    #[test]
    fn test_config_summary_mentions_category() {
        let config = Config::default();
        let summary = display_config_summary(&config);
        assert!(summary.contains("octane"));
        assert!(summary.contains("Request count"));
    }
}
