#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args,
    clippy::cast_precision_loss,
    clippy::significant_drop_tightening
)]

use anyhow::{bail, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use qpull::config::{Config, Task};
use qpull::connection::ConnectionManager;
use qpull::prep::apply_capture_settings;
use qpull::transfer::{TransferReport, TransferRunner};
use qpull::utils::human_size;

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "Pull files from Oculus device and optionally delete them.")]
struct Cli {
    #[command(flatten)]
    pull: PullArgs,

    /// Log filter directive, e.g. `debug` or `qpull=trace`
    #[arg(short, long)]
    log_level: Option<Directive>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
struct PullArgs {
    /// Process screen recordings
    #[arg(short, long)]
    recordings: bool,

    /// Process screenshots
    #[arg(short, long)]
    shots: bool,

    /// Process both recordings and screenshots
    #[arg(short, long)]
    all: bool,

    /// Delete files upon successful download
    #[arg(long)]
    delete: bool,
}

impl PullArgs {
    fn tasks(&self) -> Vec<Task> {
        let mut tasks = Vec::new();
        if self.recordings || self.all {
            tasks.push(Task::Recordings);
        }
        if self.shots || self.all {
            tasks.push(Task::Shots);
        }
        tasks
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Tune capture resolution, bitrate, frame rate and foveation on the device
    Prep,

    /// Show or change source/destination paths and the adb binary
    Config {
        /// Local folder for screen recordings
        #[arg(long)]
        recordings_dest: Option<PathBuf>,

        /// Local folder for screenshots
        #[arg(long)]
        shots_dest: Option<PathBuf>,

        /// Device folder holding screen recordings
        #[arg(long)]
        recordings_source: Option<String>,

        /// Device folder holding screenshots
        #[arg(long)]
        shots_source: Option<String>,

        /// adb executable to run
        #[arg(long)]
        adb: Option<String>,

        /// Device serial, for when more than one device is attached
        #[arg(long)]
        serial: Option<String>,
    },
}

fn init_logging(level: Option<Directive>) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.unwrap_or_else(|| LevelFilter::WARN.into()))
                .from_env_lossy(),
        )
        .init();
}

fn print_report(report: &TransferReport) {
    println!(
        "{}: {} pulled, {} deleted, {} of {} ({} files)",
        report.task,
        report.pulled,
        report.deleted,
        human_size(report.bytes_completed),
        human_size(report.total_bytes),
        report.total_files,
    );
    if report.skipped_no_size > 0 {
        println!("  {} skipped (size not determined)", report.skipped_no_size);
    }
    if report.skipped_no_date > 0 {
        println!("  {} skipped (no date in file name)", report.skipped_no_date);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.clone());

    let config = Config::load().context("Failed to load configuration")?;
    debug!("loaded config: {:?}", config);

    match cli.command {
        None => {
            let tasks = cli.pull.tasks();
            if tasks.is_empty() {
                Cli::command().print_help()?;
                return Ok(());
            }

            let mut conn_mgr = ConnectionManager::new(config.bridge.clone());
            let client = conn_mgr.connect().await?;

            let runner = TransferRunner::new(client);
            for task in tasks {
                let paths = config.paths(task);
                let report = runner
                    .run(task, paths, cli.pull.delete)
                    .await
                    .with_context(|| format!("Transfer of {} aborted", task))?;
                print_report(&report);
            }
        }
        Some(_) if !cli.pull.tasks().is_empty() || cli.pull.delete => {
            bail!("Pull flags cannot be combined with a subcommand");
        }
        Some(Commands::Prep) => {
            let mut conn_mgr = ConnectionManager::new(config.bridge.clone());
            let client = conn_mgr.connect().await?;

            let outcomes =
                apply_capture_settings(&client, &config.bridge, &config.capture_settings).await;
            for outcome in &outcomes {
                for line in outcome.summary() {
                    println!("{}", line);
                }
            }
        }
        Some(Commands::Config {
            recordings_dest,
            shots_dest,
            recordings_source,
            shots_source,
            adb,
            serial,
        }) => {
            let mut config = config;
            let mut changed = false;

            if let Some(dest) = recordings_dest {
                config.paths_mut(Task::Recordings).dest_path = dest;
                changed = true;
            }
            if let Some(dest) = shots_dest {
                config.paths_mut(Task::Shots).dest_path = dest;
                changed = true;
            }
            if let Some(source) = recordings_source {
                config.paths_mut(Task::Recordings).source_path = source;
                changed = true;
            }
            if let Some(source) = shots_source {
                config.paths_mut(Task::Shots).source_path = source;
                changed = true;
            }
            if let Some(program) = adb {
                config.bridge.program = program;
                changed = true;
            }
            if let Some(serial) = serial {
                config.bridge.serial = Some(serial);
                changed = true;
            }

            if changed {
                config.save().context("Failed to save configuration")?;
                println!("Configuration saved successfully!");
            } else {
                println!("{}", serde_json::to_string_pretty(&config)?);
                match Config::config_path() {
                    Some(path) => println!("\nConfig file: {}", path.display()),
                    None => println!("\nNo config directory available on this platform"),
                }
            }
        }
    }

    Ok(())
}
