//! CLI for deploy-scout.
//!
//! Scans a GitHub account (or a single repository) for live deployments and
//! prints the detected apps.

use clap::Parser;
use deploy_scout::{
    CancelFlag, DetectedApp, FleetScanner, ScanOptions, ScanSummary, ScannerConfig,
};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// deploy-scout - Find the live deployments behind a GitHub account's repositories.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Single repository to scan, in "owner/name" form. Scans the whole
    /// account when omitted.
    repo: Option<String>,

    /// GitHub Personal Access Token. Enables the deployment-environments
    /// detection stage and scans the token's own account.
    #[arg(long, env = "GITHUB_TOKEN")]
    token: Option<String>,

    /// Scan this user's public repositories without authenticating.
    #[arg(long)]
    user: Option<String>,

    /// Maximum concurrent repository detections.
    #[arg(long, default_value_t = 5)]
    concurrency: usize,

    /// Print results as JSON instead of a text summary.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Parse arguments
    let args = Args::parse();

    // Run the main logic
    match run(args).await {
        Ok(had_errors) => {
            if had_errors {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        // Use compact formatting without module target paths for cleaner output
        .with(fmt::layer().compact().with_target(false))
        // Allow runtime log filtering via RUST_LOG env var (e.g., RUST_LOG=debug)
        // Falls back to "info" level if RUST_LOG is not set or invalid
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        // Register as the global default subscriber
        .init();
}

/// Main execution logic. Returns whether per-repository errors occurred.
async fn run(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let config = scanner_config(&args)?;
    let scanner = FleetScanner::new(config)?;

    match &args.repo {
        Some(repo) => {
            let (owner, name) = split_repo(repo)?;
            let app = scanner.scan_repository(owner, name).await?;
            print_single(app.as_ref(), args.json)?;
            Ok(false)
        }
        None => {
            let summary = scan_fleet(&scanner, &args).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
            Ok(summary.has_errors())
        }
    }
}

/// Picks the scan target from the provided arguments.
fn scanner_config(args: &Args) -> Result<ScannerConfig, Box<dyn std::error::Error>> {
    if let Some(user) = &args.user {
        return Ok(ScannerConfig::public_user(user));
    }
    if let Some(token) = &args.token {
        return Ok(ScannerConfig::authenticated(token));
    }
    // A single public repository can be scanned without any credential; the
    // owner doubles as the target account.
    if let Some(repo) = &args.repo {
        let (owner, _) = split_repo(repo)?;
        return Ok(ScannerConfig::public_user(owner));
    }
    Err("either --token or --user is required for a full account scan".into())
}

/// Runs the fleet scan with progress output and Ctrl-C cancellation.
async fn scan_fleet(
    scanner: &FleetScanner,
    args: &Args,
) -> Result<ScanSummary, deploy_scout::ScanError> {
    let cancel = CancelFlag::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_on_signal.cancel();
        }
    });

    let mut options = ScanOptions::new()
        .with_concurrency(args.concurrency)
        .with_cancel_flag(cancel);

    if !args.json {
        options = options
            .on_progress(|settled, total, current| {
                if let Some(repo) = current {
                    println!("[{settled}/{total}] {repo}");
                }
            })
            .on_app_detected(|app| {
                println!(
                    "  detected: {} -> {} ({}, {})",
                    app.repo_full_name,
                    app.url,
                    app.source.as_str(),
                    app.confidence.as_str()
                );
            });
    }

    scanner.scan_all(&options).await
}

/// Prints the result of a single-repository scan.
fn print_single(app: Option<&DetectedApp>, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(&app)?);
        return Ok(());
    }

    match app {
        Some(app) => {
            println!("{}", app.repo_full_name);
            println!("  url:        {}", app.url);
            println!("  source:     {}", app.source.as_str());
            println!("  confidence: {}", app.confidence.as_str());
            println!("  thumbnail:  {}", app.thumbnail_url);
        }
        None => println!("No deployment found"),
    }
    Ok(())
}

/// Prints the final scan summary.
fn print_summary(summary: &ScanSummary) {
    println!("\nSummary:");
    println!(
        "  Repositories scanned: {}/{}",
        summary.scanned_repos, summary.total_repos
    );
    println!("  Apps detected: {}", summary.detected_apps.len());
    println!("  Skipped (no deployment): {}", summary.skipped_repos.len());
    println!("  Errors: {}", summary.errors.len());
    if summary.cancelled {
        println!("  Scan was cancelled before completing");
    }

    for app in &summary.detected_apps {
        println!(
            "    {} -> {} ({}, {})",
            app.repo_full_name,
            app.url,
            app.source.as_str(),
            app.confidence.as_str()
        );
    }
    for error in &summary.errors {
        println!("    {} failed: {}", error.repo, error.error);
    }
}

/// Splits an "owner/name" argument into its parts.
fn split_repo(repo: &str) -> Result<(&str, &str), Box<dyn std::error::Error>> {
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() => Ok((owner, name)),
        _ => Err(format!("invalid repository '{repo}', expected owner/name").into()),
    }
}
