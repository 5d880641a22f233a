//! Command-line interface module

use clap::Parser;

/// Octane Benchmark - measure serialized round-trip latency per deployment mode
#[derive(Parser, Debug, Clone)]
#[command(name = "octane-bench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Deployment category to tag the run with (octane or standard)
    #[arg(short = 'C', long)]
    pub category: Option<String>,

    /// Number of sequential requests to issue (1-500)
    #[arg(short, long)]
    pub count: Option<u32>,

    /// Base URL of the deployment under test
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// How many historical runs to display
    #[arg(long)]
    pub history_limit: Option<usize>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Only display recorded run history and the latest comparison, no new run
    #[arg(long)]
    pub history: bool,

    /// Run the benchmark without persisting the result
    #[arg(long)]
    pub skip_record: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.history && self.skip_record {
            return Err("--skip-record has no effect together with --history".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_long_flags() {
        let cli = Cli::parse_from([
            "octane-bench",
            "--category",
            "standard",
            "--count",
            "50",
            "--base-url",
            "http://localhost:8000",
            "--no-color",
        ]);

        assert_eq!(cli.category.as_deref(), Some("standard"));
        assert_eq!(cli.count, Some(50));
        assert!(cli.no_color);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_conflicting_color_flags_rejected() {
        let cli = Cli::parse_from(["octane-bench", "--color", "--no-color"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_history_conflicts_with_skip_record() {
        let cli = Cli::parse_from(["octane-bench", "--history", "--skip-record"]);
        assert!(cli.validate().is_err());
    }
}
