//! sftp-outbox – scheduled SFTP outbox drainer.
//!
//! Usage:
//!     sftp-outbox --config /etc/sftp-outbox.toml
//!
//! One invocation is one run: discover files under the source directory,
//! filter by extension policy, upload each over SFTP, and move successful
//! files into the backup directory. Per-file failures are logged and never
//! abort the run; only pre-run validation is fatal.

mod settings;

use clap::Parser;
use outbox_core::outbox::{discover, BatchOptions, BatchProcessor};
use outbox_sftp::sftp::SftpUploader;
use settings::Settings;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "sftp-outbox",
    about = "Drain a local outbox directory to an SFTP server, backing up sent files"
)]
struct Args {
    /// Path to the TOML settings file
    #[arg(long, default_value = "sftp-outbox.toml")]
    config: PathBuf,

    /// Discover and filter only; no uploads, no moves
    #[arg(long)]
    dry_run: bool,

    /// Log debug detail to the console
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn run(args: &Args) -> anyhow::Result<()> {
    let settings = Settings::load(&args.config)?;
    settings.validate()?;

    info!(
        "sftp-outbox started. Source: {}, Destination: {}@{}:{} on port {}",
        settings.source_dir.display(),
        settings.dest_user,
        settings.dest_host,
        settings.dest_path,
        settings.dest_port
    );
    if !settings.do_backup {
        info!("Note: backups are disabled.");
    }

    let policy = settings.filter_policy();

    if args.dry_run {
        let candidates = discover(&settings.source_dir)?;
        let mut eligible = 0usize;
        for candidate in &candidates {
            if policy.should_process(&candidate.extension) {
                debug!("would upload {}", candidate.path.display());
                eligible += 1;
            }
        }
        info!(
            "dry run: {} of {} discovered files would be uploaded",
            eligible,
            candidates.len()
        );
        return Ok(());
    }

    let options = BatchOptions {
        source_dir: settings.source_dir.clone(),
        policy,
        dest: settings.destination(),
        backup_dir: settings.backup_dir(),
    };

    let summary = BatchProcessor::new(SftpUploader::new(), options).run()?;

    debug!("run summary: {}", serde_json::to_string(&summary)?);
    info!("Processed {} files.", summary.succeeded);
    Ok(())
}
