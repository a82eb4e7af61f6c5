use super::{DeviceBridge, PullOutcome};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use tokio::process::Command as TokioCommand;
use tracing::trace;

/// Substrings adb prints on the first output line after a successful pull.
const PULL_SUCCESS_MARKERS: [&str; 2] = ["file pulled", "bytes in"];

/// The command as run, for messages: `<program> [-s <serial>] <args...>`.
pub fn command_line(program: &str, serial: Option<&str>, args: &[&str]) -> String {
    let mut parts = vec![program];
    if let Some(serial) = serial {
        parts.extend(["-s", serial]);
    }
    parts.extend(args);
    parts.join(" ")
}

pub struct AdbClient {
    program: String,
    serial: Option<String>,
}

impl AdbClient {
    pub fn new(program: String, serial: Option<String>) -> Self {
        Self { program, serial }
    }

    fn base_args(&self) -> Vec<String> {
        match &self.serial {
            Some(serial) => vec!["-s".to_string(), serial.clone()],
            None => Vec::new(),
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        command_line(&self.program, self.serial.as_deref(), args)
    }

    async fn run_adb_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = TokioCommand::new(&self.program);
        cmd.args(self.base_args());
        cmd.args(args);

        let command = self.describe(args);
        trace!("executing cmd: {}", command);

        let output = cmd.output().await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                Error::BridgeUnavailable {
                    program: self.program.clone(),
                    source,
                }
            } else {
                Error::Io(source)
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        trace!(
            "output of {}: {}\nSTDOUT: {}\nSTDERR: {}",
            command,
            output.status,
            stdout,
            stderr
        );

        if !output.status.success() {
            return Err(Error::Command {
                command,
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(stdout)
    }

    /// Classifies pull output by its first line.
    fn pull_outcome(output: &str) -> PullOutcome {
        let first = output.lines().next().unwrap_or("");
        if PULL_SUCCESS_MARKERS.iter().any(|m| first.contains(m)) {
            PullOutcome::Confirmed
        } else {
            PullOutcome::Unconfirmed
        }
    }
}

#[async_trait]
impl DeviceBridge for AdbClient {
    async fn check_available(&mut self) -> Result<()> {
        self.run_adb_command(&["version"]).await?;
        Ok(())
    }

    async fn device_state(&mut self) -> Result<String> {
        let output = self.run_adb_command(&["get-state"]).await?;
        Ok(output.trim().to_string())
    }

    async fn list_dir(&mut self, path: &str) -> Result<Vec<String>> {
        let output = self.run_adb_command(&["shell", "ls", "-l", path]).await?;
        Ok(output.lines().map(str::to_string).collect())
    }

    async fn pull(&mut self, remote_path: &str, local_dir: &Path) -> Result<PullOutcome> {
        let local_str = local_dir.to_string_lossy();
        let output = self
            .run_adb_command(&["pull", remote_path, &*local_str])
            .await?;
        Ok(Self::pull_outcome(&output))
    }

    async fn remove(&mut self, remote_path: &str) -> Result<()> {
        self.run_adb_command(&["shell", "rm", remote_path]).await?;
        Ok(())
    }

    async fn set_prop(&mut self, key: &str, value: &str) -> Result<String> {
        let output = self
            .run_adb_command(&["shell", "setprop", key, value])
            .await?;
        Ok(output.trim().to_string())
    }
}
