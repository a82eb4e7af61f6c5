//! Capture tuning: sets recording resolution, bitrate, frame rate and
//! foveation on the headset through `setprop`.

use crate::client::adb::command_line;
use crate::config::{BridgeConfig, CaptureSetting};
use crate::connection::SharedBridge;
use crate::error::{Error, Result};
use tracing::warn;

/// What happened to one setting.
#[derive(Debug)]
pub struct PrepOutcome {
    pub setting: CaptureSetting,
    /// The command line as run, with the configured program and serial.
    pub command: String,
    pub result: Result<String>,
}

impl PrepOutcome {
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Lines printed for this setting.
    pub fn summary(&self) -> Vec<String> {
        match &self.result {
            Ok(stdout) => {
                let mut lines = vec![format!("Successfully executed command: {}", self.command)];
                if !stdout.is_empty() {
                    lines.push(stdout.clone());
                }
                lines
            }
            Err(e) => {
                let message = match e {
                    Error::Command { stderr, .. } => stderr.clone(),
                    other => other.to_string(),
                };
                vec![
                    format!("Error executing command: {}", self.command),
                    format!("Error message: {}", message),
                ]
            }
        }
    }
}

/// Applies every setting in order. A failure is recorded and the next
/// setting is still attempted.
pub async fn apply_capture_settings(
    client: &SharedBridge,
    bridge: &BridgeConfig,
    settings: &[CaptureSetting],
) -> Vec<PrepOutcome> {
    let mut client = client.lock().await;
    let mut outcomes = Vec::with_capacity(settings.len());

    for setting in settings {
        let result = client.set_prop(&setting.key, &setting.value).await;
        if let Err(e) = &result {
            warn!("setprop {} failed: {}", setting.key, e);
        }
        let command = command_line(
            &bridge.program,
            bridge.serial.as_deref(),
            &["shell", "setprop", &setting.key, &setting.value],
        );
        outcomes.push(PrepOutcome {
            setting: setting.clone(),
            command,
            result,
        });
    }

    outcomes
}
