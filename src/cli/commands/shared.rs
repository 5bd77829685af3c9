//! Shared components for CLI commands
//!
//! Logging setup, configuration loading, input discovery and the
//! concurrent batch parser used by `parse` and `validate`.

use crate::cli::args::GlobalArgs;
use crate::config::Config;
use crate::parser::{LogFormat, LogParser, ParseResult};
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Outcome summary shared by all commands
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of files handled
    pub files_processed: usize,
    /// Number of files that failed, did not validate or differed
    pub files_failed: usize,
    /// Total processing time
    pub processing_time: Duration,
}

impl RunSummary {
    /// Process exit code: 0 when every file succeeded, 2 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.files_failed == 0 { 0 } else { 2 }
    }
}

/// One file of a batch and what parsing it produced
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: crate::Result<ParseResult>,
}

/// Set up structured logging
pub fn setup_logging(args: &GlobalArgs) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("qclog={}", log_level)));

    if args.quiet {
        // Minimal logging for quiet mode
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Load configuration from the optional TOML file, then apply CLI overrides
pub fn load_configuration(args: &GlobalArgs) -> Result<Config> {
    let mut config = match &args.config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            Config::from_file(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?
        }
        None => {
            debug!("No config file given, using defaults");
            Config::default()
        }
    };

    if let Some(workers) = args.workers {
        config.processing.workers = workers;
    }

    config
        .validate()
        .map_err(|message| anyhow::anyhow!("Invalid configuration: {message}"))?;
    Ok(config)
}

/// Expand files, directories and glob patterns into a sorted list of input files
///
/// Directories are walked recursively and contribute files whose extension
/// matches `format`. Explicit files are taken as given.
pub fn discover_inputs(inputs: &[String], format: LogFormat) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();

    for input in inputs {
        let path = Path::new(input);

        if path.is_file() {
            files.insert(path.to_path_buf());
        } else if path.is_dir() {
            let before = files.len();
            for entry in WalkDir::new(path)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let candidate = entry.path();
                if candidate.is_file() && has_extension(candidate, format.extension()) {
                    files.insert(candidate.to_path_buf());
                }
            }
            debug!(
                "Found {} {} files under {}",
                files.len() - before,
                format,
                path.display()
            );
        } else {
            let matches = glob::glob(input)
                .with_context(|| format!("Invalid input pattern: {input}"))?;
            let before = files.len();
            for candidate in matches.filter_map(|e| e.ok()) {
                if candidate.is_file() {
                    files.insert(candidate);
                }
            }
            if files.len() == before {
                warn!("No files matched input: {}", input);
            }
        }
    }

    Ok(files.into_iter().collect())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Parse files concurrently, one blocking task per file
///
/// Outcomes are returned sorted by path. With `fail_fast` the batch stops
/// collecting at the first file that cannot be read.
pub async fn parse_batch(
    files: Vec<PathBuf>,
    parser: LogParser,
    workers: usize,
    fail_fast: bool,
    show_progress: bool,
) -> Vec<FileOutcome> {
    info!(
        "Parsing {} {} files with {} workers",
        files.len(),
        parser.format(),
        workers
    );

    let progress_bar = if show_progress && files.len() > 1 {
        Some(create_progress_bar(files.len() as u64, "Parsing files..."))
    } else {
        None
    };

    let mut pending = stream::iter(files)
        .map(|path| {
            let parser = parser.clone();
            async move {
                let task_path = path.clone();
                let result = task::spawn_blocking(move || parser.parse_file(&task_path))
                    .await
                    .unwrap_or_else(|e| Err(std::io::Error::other(e).into()));
                FileOutcome { path, result }
            }
        })
        .buffer_unordered(workers.max(1));

    let mut outcomes = Vec::new();
    while let Some(outcome) = pending.next().await {
        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
        let stop = fail_fast && outcome.result.is_err();
        outcomes.push(outcome);
        if stop {
            warn!("Stopping batch at first failure");
            break;
        }
    }

    if let Some(pb) = &progress_bar {
        pb.finish_with_message(format!("Parsed {} files", outcomes.len()));
    }

    outcomes.sort_by(|a, b| a.path.cmp(&b.path));
    outcomes
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}
