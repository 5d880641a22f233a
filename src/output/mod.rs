//! Output formatting and display system
//!
//! Renders run summaries, the latest octane/standard comparison, and the
//! recent-run history table, with colored and plain variants.

use crate::models::run::{BenchmarkRun, RunStatistics};
use crate::models::sample::TimingSample;
use crate::runner::ProgressObserver;
use crate::types::RunCategory;
use colored::Colorize;
use std::fmt::Write as _;

/// Formatter abstraction so scripts can get stable plain-text output
pub trait OutputFormatter: Send + Sync {
    /// Section header line
    fn format_header(&self, title: &str) -> String;

    /// Summary block for one finished run
    fn format_run_summary(&self, run: &BenchmarkRun, statistics: &RunStatistics) -> String;

    /// Side-by-side comparison of the latest run per category
    fn format_comparison(
        &self,
        latest_octane: Option<&BenchmarkRun>,
        latest_standard: Option<&BenchmarkRun>,
    ) -> String;

    /// Table of recent runs, newest first
    fn format_history(&self, runs: &[BenchmarkRun]) -> String;
}

/// Relative improvement of octane over standard, rendered like the web UI:
/// negative percentage means octane is faster.
fn delta_percent(octane: f64, standard: f64) -> String {
    if standard == 0.0 {
        return "-".to_string();
    }
    let delta = ((standard - octane) / standard) * 100.0;
    let sign = if delta > 0.0 { "-" } else { "+" };
    format!("{}{:.1}%", sign, delta.abs())
}

fn format_ms(ms: f64) -> String {
    format!("{:.2}", ms)
}

const COMPARISON_ROWS: [(&str, fn(&BenchmarkRun) -> f64); 6] = [
    ("Average", |r| r.avg_ms),
    ("Median", |r| r.median_ms),
    ("P95", |r| r.p95_ms),
    ("Minimum", |r| r.min_ms),
    ("Maximum", |r| r.max_ms),
    ("Total", |r| r.total_ms),
];

/// Plain text formatter for scripts and logs
pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> String {
        let border = "=".repeat(title.len() + 4);
        format!("{}\n  {}\n{}", border, title, border)
    }

    fn format_run_summary(&self, run: &BenchmarkRun, statistics: &RunStatistics) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Run complete ({})", run.category);
        let _ = writeln!(output, "  Requests: {}", run.request_count);
        let _ = writeln!(output, "  Avg:      {} ms", format_ms(statistics.avg_ms));
        let _ = writeln!(output, "  Median:   {} ms", format_ms(statistics.median_ms));
        let _ = writeln!(output, "  P95:      {} ms", format_ms(statistics.p95_ms));
        let _ = writeln!(output, "  Min:      {} ms", format_ms(statistics.min_ms));
        let _ = writeln!(output, "  Max:      {} ms", format_ms(statistics.max_ms));
        let _ = write!(output, "  Total:    {} ms", format_ms(statistics.total_ms));
        output
    }

    fn format_comparison(
        &self,
        latest_octane: Option<&BenchmarkRun>,
        latest_standard: Option<&BenchmarkRun>,
    ) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "{:<10} {:>12} {:>12} {:>8}", "Metric", "Octane", "Standard", "Delta");

        for (label, metric) in COMPARISON_ROWS {
            let octane = latest_octane.map(metric);
            let standard = latest_standard.map(metric);
            let delta = match (octane, standard) {
                (Some(o), Some(s)) => delta_percent(o, s),
                _ => "-".to_string(),
            };
            let _ = writeln!(
                output,
                "{:<10} {:>12} {:>12} {:>8}",
                label,
                octane.map(format_ms).unwrap_or_else(|| "-".to_string()),
                standard.map(format_ms).unwrap_or_else(|| "-".to_string()),
                delta,
            );
        }

        output.trim_end().to_string()
    }

    fn format_history(&self, runs: &[BenchmarkRun]) -> String {
        if runs.is_empty() {
            return "No recorded runs yet.".to_string();
        }

        let mut output = String::new();
        let _ = writeln!(
            output,
            "{:<10} {:>8} {:>10} {:>10} {:>10} {:>10}  {}",
            "Type", "Requests", "Avg", "P95", "Min", "Max", "When"
        );

        for run in runs {
            let _ = writeln!(
                output,
                "{:<10} {:>8} {:>10} {:>10} {:>10} {:>10}  {}",
                run.category.as_str(),
                run.request_count,
                format_ms(run.avg_ms),
                format_ms(run.p95_ms),
                format_ms(run.min_ms),
                format_ms(run.max_ms),
                run.created_at.format("%Y-%m-%d %H:%M:%S"),
            );
        }

        output.trim_end().to_string()
    }
}

/// Colored console formatter
pub struct ColoredFormatter;

impl ColoredFormatter {
    fn category_label(category: RunCategory) -> String {
        match category {
            RunCategory::Octane => category.as_str().green().bold().to_string(),
            RunCategory::Standard => category.as_str().yellow().bold().to_string(),
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> String {
        let border = "=".repeat(title.len() + 4);
        format!("{}\n  {}\n{}", border, title.bold(), border)
    }

    fn format_run_summary(&self, run: &BenchmarkRun, statistics: &RunStatistics) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "Run complete ({})",
            Self::category_label(run.category)
        );
        let _ = writeln!(output, "  Requests: {}", run.request_count.to_string().bold());
        let _ = writeln!(output, "  Avg:      {} ms", format_ms(statistics.avg_ms).bold());
        let _ = writeln!(output, "  Median:   {} ms", format_ms(statistics.median_ms));
        let _ = writeln!(output, "  P95:      {} ms", format_ms(statistics.p95_ms));
        let _ = writeln!(output, "  Min:      {} ms", format_ms(statistics.min_ms));
        let _ = writeln!(output, "  Max:      {} ms", format_ms(statistics.max_ms));
        let _ = write!(output, "  Total:    {} ms", format_ms(statistics.total_ms));
        output
    }

    fn format_comparison(
        &self,
        latest_octane: Option<&BenchmarkRun>,
        latest_standard: Option<&BenchmarkRun>,
    ) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "{:<10} {:>12} {:>12} {:>8}",
            "Metric".bold(),
            "Octane".green().bold(),
            "Standard".yellow().bold(),
            "Delta".bold()
        );

        for (label, metric) in COMPARISON_ROWS {
            let octane = latest_octane.map(metric);
            let standard = latest_standard.map(metric);
            let delta = match (octane, standard) {
                (Some(o), Some(s)) => {
                    let text = delta_percent(o, s);
                    if o < s {
                        text.green().to_string()
                    } else {
                        text.red().to_string()
                    }
                }
                _ => "-".to_string(),
            };
            let _ = writeln!(
                output,
                "{:<10} {:>12} {:>12} {:>8}",
                label,
                octane.map(format_ms).unwrap_or_else(|| "-".to_string()),
                standard.map(format_ms).unwrap_or_else(|| "-".to_string()),
                delta,
            );
        }

        output.trim_end().to_string()
    }

    fn format_history(&self, runs: &[BenchmarkRun]) -> String {
        if runs.is_empty() {
            return "No recorded runs yet.".to_string();
        }

        let mut output = String::new();
        let _ = writeln!(
            output,
            "{:<10} {:>8} {:>10} {:>10} {:>10} {:>10}  {}",
            "Type".bold(),
            "Requests".bold(),
            "Avg".bold(),
            "P95".bold(),
            "Min".bold(),
            "Max".bold(),
            "When".bold()
        );

        for run in runs {
            let _ = writeln!(
                output,
                "{:<10} {:>8} {:>10} {:>10} {:>10} {:>10}  {}",
                Self::category_label(run.category),
                run.request_count,
                format_ms(run.avg_ms),
                format_ms(run.p95_ms),
                format_ms(run.min_ms),
                format_ms(run.max_ms),
                run.created_at.format("%Y-%m-%d %H:%M:%S"),
            );
        }

        output.trim_end().to_string()
    }
}

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool) -> Box<dyn OutputFormatter> {
        if enable_color {
            Box::new(ColoredFormatter)
        } else {
            Box::new(PlainFormatter)
        }
    }
}

/// Progress observer that prints live statistics to the console.
///
/// In verbose mode every round trip also gets its own line, showing the
/// wall-clock time next to the handling time the server reported for itself.
pub struct ConsoleProgress {
    enable_color: bool,
    verbose: bool,
}

impl ConsoleProgress {
    pub fn new(enable_color: bool, verbose: bool) -> Self {
        Self {
            enable_color,
            verbose,
        }
    }

    fn sample_line(completed: u32, sample: &TimingSample) -> String {
        if sample.is_valid() {
            let server = match sample.server_elapsed_ms {
                Some(ms) => format!("server {} ms", format_ms(ms)),
                None => "server n/a".to_string(),
            };
            format!(
                "  #{:<4} {} ms ({})",
                completed,
                format_ms(sample.elapsed_ms),
                server
            )
        } else {
            format!(
                "  #{:<4} failed: {}",
                completed,
                sample.error_message.as_deref().unwrap_or("unknown error")
            )
        }
    }
}

impl ProgressObserver for ConsoleProgress {
    fn on_sample(&self, completed: u32, sample: &TimingSample) {
        if !self.verbose {
            return;
        }

        let line = Self::sample_line(completed, sample);
        if self.enable_color && !sample.is_valid() {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }

    fn on_progress(&self, completed: u32, total: u32, snapshot: Option<&RunStatistics>) {
        let percent = ((completed as f64 / total as f64) * 100.0).round() as u32;
        let line = match snapshot {
            Some(stats) => format!(
                "[{:>3}%] {}/{} requests | avg {} ms | min {} ms | max {} ms | valid {}",
                percent,
                completed,
                total,
                format_ms(stats.avg_ms),
                format_ms(stats.min_ms),
                format_ms(stats.max_ms),
                stats.count,
            ),
            None => format!(
                "[{:>3}%] {}/{} requests | no valid samples yet",
                percent, completed, total
            ),
        };

        if self.enable_color {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(category: RunCategory, avg: f64) -> BenchmarkRun {
        BenchmarkRun::from_statistics(category, &stats(avg), None)
    }

    fn stats(avg: f64) -> RunStatistics {
        RunStatistics {
            count: 100,
            avg_ms: avg,
            min_ms: avg * 0.5,
            max_ms: avg * 2.0,
            median_ms: avg * 0.9,
            p95_ms: avg * 1.8,
            total_ms: avg * 100.0,
        }
    }

    #[test]
    fn test_delta_percent_octane_faster() {
        // Octane at 2ms vs standard at 4ms: 50% faster, shown as -50.0%
        assert_eq!(delta_percent(2.0, 4.0), "-50.0%");
    }

    #[test]
    fn test_delta_percent_octane_slower() {
        assert_eq!(delta_percent(6.0, 4.0), "+50.0%");
    }

    #[test]
    fn test_delta_percent_zero_standard() {
        assert_eq!(delta_percent(2.0, 0.0), "-");
    }

    #[test]
    fn test_plain_summary_contains_all_metrics() {
        let statistics = stats(3.0);
        let summary = PlainFormatter.format_run_summary(&run(RunCategory::Octane, 3.0), &statistics);
        for label in ["Requests", "Avg", "Median", "P95", "Min", "Max", "Total"] {
            assert!(summary.contains(label), "missing {}", label);
        }
        assert!(summary.contains("octane"));
    }

    #[test]
    fn test_plain_comparison_handles_missing_side() {
        let octane = run(RunCategory::Octane, 2.0);
        let output = PlainFormatter.format_comparison(Some(&octane), None);
        assert!(output.contains("Octane"));
        assert!(output.contains('-'));
    }

    #[test]
    fn test_plain_history_empty() {
        assert_eq!(PlainFormatter.format_history(&[]), "No recorded runs yet.");
    }

    #[test]
    fn test_plain_history_lists_runs() {
        let runs = vec![run(RunCategory::Standard, 8.0), run(RunCategory::Octane, 2.0)];
        let output = PlainFormatter.format_history(&runs);
        assert!(output.contains("standard"));
        assert!(output.contains("octane"));
        assert!(output.lines().count() >= 3);
    }

    #[test]
    fn test_verbose_sample_line_shows_both_timings() {
        let sample = TimingSample::success(std::time::Duration::from_micros(1_420), Some(0.38));
        let line = ConsoleProgress::sample_line(3, &sample);
        assert!(line.contains("#3"));
        assert!(line.contains("1.42 ms"));
        assert!(line.contains("server 0.38 ms"));
    }

    #[test]
    fn test_verbose_sample_line_for_failure() {
        let sample = TimingSample::failed("connection refused".to_string());
        let line = ConsoleProgress::sample_line(7, &sample);
        assert!(line.contains("#7"));
        assert!(line.contains("failed"));
        assert!(line.contains("connection refused"));
    }

    #[test]
    fn test_factory_selects_formatter() {
        // Just verify both variants construct and render
        let runs = vec![run(RunCategory::Octane, 2.0)];
        for enable_color in [true, false] {
            let formatter = OutputFormatterFactory::create_formatter(enable_color);
            let output = formatter.format_history(&runs);
            assert!(output.contains("octane") || output.contains("Octane"));
        }
    }
}
