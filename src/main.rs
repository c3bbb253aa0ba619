/*!
 * Command-line interface for dagdump
 */

use std::io;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dagdump::config::{Args, Config};
use dagdump::report::{CrawlReport, ReportFormat, Reporter};
use dagdump::walker::Crawler;
use dagdump::writer::CsvSink;
use dagdump::HttpGraphClient;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> dagdump::Result<ExitCode> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "dagdump", &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    // Create and validate configuration
    let config = Config::from_args(args);
    setup_logging(config.verbose);
    config.validate()?;

    let client = HttpGraphClient::new(&config.node_address, config.timeout)?;
    let mut sink = CsvSink::create(&config.outputs)?;

    let progress = if config.show_progress {
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {prefix:.bold.cyan} {pos} rows {wide_msg:.dim.white} Elapsed: {elapsed_precise}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.enable_steady_tick(Duration::from_millis(100));
        progress.set_prefix("Crawling");
        progress
    } else {
        ProgressBar::hidden()
    };
    let progress = Arc::new(progress);

    let crawler = Crawler::new(client, config.visit_scope).with_progress(Arc::clone(&progress));

    // Stop at the next unit of work on Ctrl-C; outputs are still flushed
    let shutdown = crawler.shutdown_flag();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, stopping crawl...");
        shutdown.store(true, Ordering::SeqCst);
    }) {
        error!("Failed to set signal handler: {}", e);
    }

    info!(
        node = %config.node_address,
        directories = %config.outputs.directories.display(),
        files = %config.outputs.files.display(),
        blocks = %config.outputs.blocks.display(),
        "writing outputs"
    );

    let started_at = Local::now();
    let start_time = Instant::now();

    let statistics = crawler.crawl(&config.root_cid, &mut sink)?;

    progress.finish_and_clear();

    let report = CrawlReport {
        root_cid: config.root_cid.to_string(),
        node_address: config.node_address.clone(),
        outputs: config.outputs.clone(),
        started_at,
        duration: start_time.elapsed(),
        statistics,
    };

    Reporter::new(ReportFormat::ConsoleTable).print_report(&report);

    if report.statistics.interrupted {
        Ok(ExitCode::from(130))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("dagdump=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dagdump=info,warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
