use crate::client::DeviceBridge;
use crate::config::{Task, TaskPaths};
use crate::connection::SharedBridge;
use crate::error::{Error, Result};
use crate::listing::Listing;
use crate::utils::{date_key, human_size, remote_path};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::{debug, info};

const PROGRESS_TEMPLATE: &str =
    "{prefix} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})";

/// Totals for one task run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    pub task: Task,
    pub total_files: usize,
    pub total_bytes: u64,
    /// Bytes credited to the progress bar. Files without a date are counted
    /// in `total_bytes` but never credited here.
    pub bytes_completed: u64,
    pub pulled: usize,
    pub deleted: usize,
    pub skipped_no_size: usize,
    pub skipped_no_date: usize,
}

impl TransferReport {
    fn new(task: Task, listing: &Listing) -> Self {
        Self {
            task,
            total_files: listing.total_files(),
            total_bytes: listing.total_bytes(),
            bytes_completed: 0,
            pulled: 0,
            deleted: 0,
            skipped_no_size: 0,
            skipped_no_date: 0,
        }
    }
}

/// Pulls every dated file of a task into `<dest>/<YYYY.MM.DD>/`, one at a time.
pub struct TransferRunner {
    client: SharedBridge,
    show_progress: bool,
}

impl TransferRunner {
    pub fn new(client: SharedBridge) -> Self {
        Self {
            client,
            show_progress: true,
        }
    }

    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn progress_bar(&self, task: Task, total_bytes: u64) -> ProgressBar {
        let pb = if self.show_progress {
            ProgressBar::new(total_bytes)
        } else {
            ProgressBar::with_draw_target(Some(total_bytes), ProgressDrawTarget::hidden())
        };
        pb.set_style(
            ProgressStyle::with_template(PROGRESS_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_prefix(format!("Overall Progress {} :", task));
        pb
    }

    /// Prints above the bar; unlike `ProgressBar::println` this also prints
    /// when the bar is hidden.
    fn notice(pb: &ProgressBar, msg: &str) {
        pb.suspend(|| println!("{}", msg));
    }

    /// Runs one task. Any failing bridge command aborts the run; files
    /// already pulled stay where they are.
    pub async fn run(
        &self,
        task: Task,
        paths: &TaskPaths,
        delete_after_transfer: bool,
    ) -> Result<TransferReport> {
        let mut client = self.client.lock().await;

        let lines = client.list_dir(&paths.source_path).await?;
        let listing = Listing::parse(&lines);
        let pb = self.progress_bar(task, listing.total_bytes());

        Self::transfer(
            &mut **client,
            task,
            paths,
            &listing,
            delete_after_transfer,
            &pb,
        )
        .await
    }

    /// Walks the listing and leaves `pb` abandoned at its last position on
    /// every exit, so undated files keep it short of full.
    async fn transfer(
        client: &mut dyn DeviceBridge,
        task: Task,
        paths: &TaskPaths,
        listing: &Listing,
        delete_after_transfer: bool,
        pb: &ProgressBar,
    ) -> Result<TransferReport> {
        let result =
            Self::transfer_entries(client, task, paths, listing, delete_after_transfer, pb).await;
        pb.abandon();
        result
    }

    async fn transfer_entries(
        client: &mut dyn DeviceBridge,
        task: Task,
        paths: &TaskPaths,
        listing: &Listing,
        delete_after_transfer: bool,
        pb: &ProgressBar,
    ) -> Result<TransferReport> {
        let mut report = TransferReport::new(task, listing);

        let mut current_file_number = 0;
        for name in listing.names() {
            let Some(size) = listing.size_of(name) else {
                Self::notice(pb, &format!("Skipping file {} (size not determined).", name));
                report.skipped_no_size += 1;
                continue;
            };

            current_file_number += 1;
            Self::notice(pb, &format!("Downloading: {} ({})", name, human_size(size)));
            pb.set_message(format!(
                "(File {} of {})",
                current_file_number, report.total_files
            ));

            let Some(date) = date_key(name) else {
                debug!("{}", Error::MissingDate { name: name.to_string() });
                report.skipped_no_date += 1;
                continue;
            };

            let dir_path = paths.dest_path.join(&date);
            tokio::fs::create_dir_all(&dir_path).await?;

            let remote = remote_path(&paths.source_path, name);
            let outcome = client.pull(&remote, &dir_path).await?;
            report.pulled += 1;
            info!("pulled {} into {}", remote, dir_path.display());

            if delete_after_transfer && outcome.is_confirmed() {
                client.remove(&remote).await?;
                report.deleted += 1;
                info!("removed {}", remote);
            }

            pb.inc(size);
            report.bytes_completed += size;
        }

        Ok(report)
    }
}
