use clap::{Args, Parser, Subcommand};
use cloud_audit::report::{save_report, AuditSummary, ReportError, ReportFormat};
use cloud_audit::storage::config::parse_option_pair;
use cloud_audit::{AuditError, Auditor, ScanOptions, StorageConfig, StorageType, DEFAULT_DAYS_STALE};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Audit object storage for stale, oversized, and duplicated objects
#[derive(Parser)]
#[command(name = "cloud-audit", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan one bucket, container, or directory and write a report
    Scan(ScanArgs),
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Storage provider: aws|s3, gcs|gcp, azure, local
    provider: StorageType,

    /// Bucket, container (or container URL), or local directory
    container: String,

    /// Objects not modified for this many days are stale
    #[arg(long, default_value_t = DEFAULT_DAYS_STALE)]
    days_stale: u32,

    /// Flag objects larger than this many MiB (0 disables the check)
    #[arg(long, default_value_t = 0.0)]
    oversize_mb: f64,

    /// Stop after this many objects
    #[arg(long)]
    limit: Option<usize>,

    /// Report file to write
    #[arg(short, long, default_value = "report.html")]
    output: PathBuf,

    /// Report format: html, csv, json (defaults to the output extension)
    #[arg(short, long)]
    format: Option<ReportFormat>,

    /// Probe known keys of a public bucket anonymously (degraded mode)
    #[arg(long)]
    public: bool,

    /// Provider option, repeatable (e.g. region=us-east-1)
    #[arg(long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,

    /// JSON storage configuration: {"type": "...", "options": {...}}
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a summary after writing the report
    #[arg(long)]
    summary: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl CliError {
    fn kind(&self) -> String {
        match self {
            CliError::Audit(e) => e.kind().to_string(),
            CliError::Report(_) => "ReportFailed".to_string(),
        }
    }

    fn hint(&self) -> String {
        match self {
            CliError::Audit(e) => e.hint(),
            CliError::Report(ReportError::UnsupportedFormat(_)) => {
                "Use --format html|csv|json or an output file with one of those extensions."
                    .to_string()
            }
            CliError::Report(_) => "Check that the output directory exists and is writable.".to_string(),
        }
    }
}

fn load_config_file(path: &Path) -> Result<StorageConfig, AuditError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AuditError::InvalidConfiguration(format!("cannot read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        AuditError::InvalidConfiguration(format!("cannot parse {}: {}", path.display(), e))
    })
}

/// File options first, then `--option` pairs, then the positional container.
fn storage_config(args: &ScanArgs) -> Result<StorageConfig, AuditError> {
    let mut config = StorageConfig::of_type(args.provider);

    if let Some(path) = &args.config {
        let file_config = load_config_file(path)?;
        if file_config.storage_type != args.provider {
            return Err(AuditError::InvalidConfiguration(format!(
                "{} configures provider '{}' but '{}' was requested",
                path.display(),
                file_config.storage_type,
                args.provider
            )));
        }
        config = config.with_options(file_config.options);
    }

    for pair in &args.options {
        let (key, value) = parse_option_pair(pair)
            .map_err(|e| AuditError::InvalidConfiguration(e.to_string()))?;
        config = config.with_option(key, value);
    }

    Ok(config.with_container(&args.container))
}

async fn run_scan(args: ScanArgs, cancel: CancellationToken) -> Result<(), CliError> {
    let format = args
        .format
        .or_else(|| ReportFormat::from_path(&args.output).ok())
        .unwrap_or(ReportFormat::Html);

    let mut options = ScanOptions::new(args.days_stale).with_oversize_mb(args.oversize_mb);
    if let Some(limit) = args.limit {
        options = options.with_limit(limit);
    }

    let auditor = Auditor::builder(storage_config(&args)?)
        .with_options(options)
        .with_public_access(args.public)
        .build()
        .await?;

    info!("Scanning location={}", auditor.base_uri());
    let records = auditor.scan_with_cancellation(&cancel).await?;

    save_report(&records, &args.output, format)?;
    let saved = std::fs::canonicalize(&args.output).unwrap_or_else(|_| args.output.clone());
    println!("Report saved to {}", saved.display());

    if args.summary {
        println!("{}", AuditSummary::from_records(auditor.base_uri(), &records));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the result
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling scan");
            on_interrupt.cancel();
        }
    });

    let result = match cli.command {
        Commands::Scan(args) => run_scan(args, cancel).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error[{}]: {}", e.kind(), e);
            eprintln!("hint: {}", e.hint());
            ExitCode::FAILURE
        }
    }
}
