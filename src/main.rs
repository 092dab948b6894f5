// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use md2notion::{
    cancellation, convert, measure_blocks, render_dry_run, AppError, Block, BlockComposer,
    BlockDelivery, CancellationSignal, CommandLineInput, MarkdownInput, NotionApi,
    NotionHttpClient, RetryPolicy, SyncConfig, SyncReport, Synchronizer,
};
use std::fs;

/// Root level for every appender; request bodies only reach the log file
/// with `--verbose`.
fn root_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Sets up logging configuration.
///
/// The console goes to stderr so stdout stays clean for dry-run JSON.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = root_level(verbose);

    let log_file_path = std::env::temp_dir().join("md2notion.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .loggers(
            ["hyper", "hyper_util", "reqwest", "rustls", "h2"]
                .into_iter()
                .map(|name| Logger::builder().build(name, LevelFilter::Info)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Executes the three-stage pipeline: read, convert, deliver.
async fn execute_pipeline(config: &SyncConfig, cancel: CancellationSignal) -> Result<(), AppError> {
    let pipeline = MarkdownToNotion::new(config, cancel);

    let markdown = pipeline.read()?;
    let blocks = pipeline.compose(&markdown)?;

    if blocks.is_empty() {
        eprintln!("No content to upload");
        return Ok(());
    }

    if config.dry_run {
        println!("{}", render_dry_run(&blocks)?);
        return Ok(());
    }

    let report = pipeline.deliver(blocks).await?;
    pipeline.report_completion(&report);
    Ok(())
}

/// Orchestrates reading, converting and syncing one Markdown document.
struct MarkdownToNotion<'a> {
    config: &'a SyncConfig,
    cancel: CancellationSignal,
}

impl<'a> MarkdownToNotion<'a> {
    fn new(config: &'a SyncConfig, cancel: CancellationSignal) -> Self {
        Self { config, cancel }
    }

    /// Reports completion to the user.
    fn report_completion(&self, report: &SyncReport) {
        if report.failed_archives > 0 {
            eprintln!(
                "Warning: {} existing block(s) could not be deleted",
                report.failed_archives
            );
        }
        log::info!(
            "Wrote {} blocks in {} batch(es) to {}",
            report.blocks_written,
            report.batches,
            report.page_id
        );
        println!("{}", report.summary_line());
    }
}

impl MarkdownInput for MarkdownToNotion<'_> {
    fn read(&self) -> Result<Vec<u8>, AppError> {
        log::debug!("Reading Markdown from {:?}", self.config.source);
        self.config.source.read()
    }
}

impl BlockComposer for MarkdownToNotion<'_> {
    fn compose(&self, markdown: &[u8]) -> Result<Vec<Block>, AppError> {
        let blocks = convert(markdown, &self.config.conversion)?;
        let stats = measure_blocks(&blocks);
        log::info!(
            "Converted {} blocks ({} including nested, depth {})",
            stats.top_level,
            stats.total,
            stats.deepest_nesting
        );
        for (block_type, count) in &stats.by_type {
            log::debug!("  {}: {}", block_type, count);
        }
        Ok(blocks)
    }
}

#[async_trait::async_trait]
impl BlockDelivery for MarkdownToNotion<'_> {
    async fn deliver(&self, blocks: Vec<Block>) -> Result<SyncReport, AppError> {
        let token = self.config.token.as_ref().ok_or_else(|| {
            AppError::MissingConfiguration("NOTION_TOKEN environment variable is required".into())
        })?;

        let client =
            NotionHttpClient::new(token, &self.config.notion_version, self.config.timeout)?;
        let api = NotionApi::new(client, RetryPolicy::default(), self.cancel.clone());

        Synchronizer::new(&api, self.cancel.clone())
            .run(self.config.operation.clone(), &blocks)
            .await
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = SyncConfig::resolve(cli)?;

    let (trigger, signal) = cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling outstanding requests");
            trigger.cancel();
        }
    });

    execute_pipeline(&config, signal).await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
