//! Octane Benchmark - Main CLI Application
//!
//! Measures serialized HTTP round-trip latency against a deployment in
//! "octane" or "standard" mode, records the finished run, and displays the
//! latest per-category comparison.

use clap::Parser;
use octane_bench::{
    cli::Cli,
    config::{display_config_summary, load_config, validate_config},
    error::Result,
    logging::Logger,
    models::Config,
    output::{ConsoleProgress, OutputFormatterFactory},
    recorder::{HttpRecorder, MemoryRecorder, Recorder},
    runner::{AbortReason, RunController, RunOutcome},
    sampler::HttpSampler,
    types::RunCategory,
    PKG_NAME, VERSION,
};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    // Parse command line arguments
    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    let use_color = !cli.no_color;
    if let Err(e) = run_application(cli).await {
        eprintln!("{}", e.format_for_console(use_color));
        if e.is_recoverable() {
            eprintln!("This error is likely transient; retrying may succeed.");
        }
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    if cli.debug {
        println!("{} v{}", PKG_NAME, VERSION);
        println!(
            "Built {} (commit {})",
            env!("BUILD_TIME"),
            option_env!("GIT_COMMIT").unwrap_or("unknown")
        );
        println!("Debug mode enabled");
        println!();
    }

    let history_only = cli.history;
    let skip_record = cli.skip_record;

    // Load and validate configuration
    let config = load_config(cli)?;
    let logger = Logger::new(config.debug, config.enable_color);

    for warning in validate_config(&config)? {
        logger.warn(&warning.format(config.enable_color));
    }

    if config.debug {
        println!("Configuration loaded successfully:");
        println!("{}", display_config_summary(&config));
        println!();
    }

    let formatter = OutputFormatterFactory::create_formatter(config.enable_color);

    if history_only {
        let recorder = HttpRecorder::new(&config)?;
        return display_history(&config, &recorder, formatter.as_ref()).await;
    }

    run_benchmark(&config, formatter.as_ref(), skip_record, &logger).await
}

/// Execute one benchmark run and display the outcome
async fn run_benchmark(
    config: &Config,
    formatter: &dyn octane_bench::output::OutputFormatter,
    skip_record: bool,
    logger: &Logger,
) -> Result<()> {
    let sampler = HttpSampler::new(config)?;

    // Ctrl-C sets the flag; the controller checks it between round trips
    let cancel_flag = Arc::new(AtomicBool::new(false));
    {
        let flag = cancel_flag.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                flag.store(true, Ordering::Relaxed);
            }
        });
    }

    let mut controller = RunController::new(config.category, config.request_count)?
        .with_cancel_flag(cancel_flag);

    logger.info(&format!(
        "Starting {} run: {} sequential requests against {}",
        config.category,
        config.request_count,
        config.ping_url()
    ));
    logger.debug(&format!("Run id: {}", controller.run_id()));
    if skip_record {
        logger.info("Recording disabled; the result will not be persisted");
    }

    let progress = ConsoleProgress::new(config.enable_color, config.verbose);
    let memory_recorder;
    let http_recorder;
    let recorder: &dyn Recorder = if skip_record {
        memory_recorder = MemoryRecorder::new();
        &memory_recorder
    } else {
        http_recorder = HttpRecorder::new(config)?;
        &http_recorder
    };

    let outcome = controller.run(&sampler, recorder, &progress).await?;

    match outcome {
        RunOutcome::Completed { run, statistics } => {
            println!();
            println!("{}", formatter.format_header("Benchmark Result"));
            println!("{}", formatter.format_run_summary(&run, &statistics));

            if !skip_record {
                println!();
                display_comparison(recorder, formatter, config.category).await?;
            }
            Ok(())
        }
        RunOutcome::Aborted { reason } => {
            match reason {
                AbortReason::NoValidSamples => {
                    logger.error("Run aborted: no request produced a valid sample");
                }
                AbortReason::Cancelled => {
                    logger.warn("Run cancelled; nothing was recorded");
                }
            }
            Ok(())
        }
    }
}

/// Display the history table and the latest per-category comparison
async fn display_history(
    config: &Config,
    recorder: &dyn Recorder,
    formatter: &dyn octane_bench::output::OutputFormatter,
) -> Result<()> {
    let runs = recorder.recent(config.history_limit).await?;

    println!("{}", formatter.format_header("Recent Runs"));
    println!("{}", formatter.format_history(&runs));
    println!();

    display_comparison(recorder, formatter, config.category).await
}

/// Fetch the latest run for one category and its counterpart, then render
/// the comparison card
async fn display_comparison(
    recorder: &dyn Recorder,
    formatter: &dyn octane_bench::output::OutputFormatter,
    category: RunCategory,
) -> Result<()> {
    let own = recorder.latest(category).await?;
    let other = recorder.latest(category.counterpart()).await?;
    let (latest_octane, latest_standard) = match category {
        RunCategory::Octane => (own, other),
        RunCategory::Standard => (other, own),
    };

    println!("{}", formatter.format_header("Octane vs Standard"));
    println!(
        "{}",
        formatter.format_comparison(latest_octane.as_ref(), latest_standard.as_ref())
    );
    Ok(())
}
