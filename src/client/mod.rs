pub mod adb;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Result of a single pull as reported by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// The bridge reported the file as copied.
    Confirmed,
    /// The command exited zero but did not report a copy.
    Unconfirmed,
}

impl PullOutcome {
    pub const fn is_confirmed(self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

#[async_trait]
pub trait DeviceBridge: Send + Sync {
    async fn check_available(&mut self) -> Result<()>;
    async fn device_state(&mut self) -> Result<String>;
    async fn list_dir(&mut self, path: &str) -> Result<Vec<String>>;
    async fn pull(&mut self, remote_path: &str, local_dir: &Path) -> Result<PullOutcome>;
    async fn remove(&mut self, remote_path: &str) -> Result<()>;
    async fn set_prop(&mut self, key: &str, value: &str) -> Result<String>;
}
