#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Stand-in for `adb`: logs each invocation, serves a canned listing, and
/// creates pulled files in the target folder.
const FAKE_ADB: &str = r#"#!/bin/sh
echo "$*" >> "$QPULL_FAKE_ROOT/calls.log"
case "$1" in
  version)
    echo "Android Debug Bridge version 1.0.41"
    ;;
  get-state)
    cat "$QPULL_FAKE_ROOT/state.txt"
    ;;
  shell)
    case "$2" in
      ls)
        cat "$QPULL_FAKE_ROOT/listing.txt"
        ;;
      rm)
        exit 0
        ;;
      setprop)
        if [ "$3" = "$QPULL_FAKE_FAIL" ]; then
          echo "Failed to set property '$3' to '$4'" >&2
          exit 1
        fi
        ;;
    esac
    ;;
  pull)
    name=$(basename "$2")
    if [ "$name" = "$QPULL_FAKE_FAIL" ]; then
      echo "adb: error: failed to copy '$2' to '$3/$name'" >&2
      exit 1
    fi
    echo "data" > "$3/$name"
    echo "$2: 1 file pulled, 0 skipped. 0.1 MB/s (5 bytes in 0.001s)"
    ;;
esac
"#;

pub struct FakeDevice {
    pub root: TempDir,
    fail: String,
}

impl FakeDevice {
    pub fn new(listing: &[&str]) -> Self {
        let root = TempDir::new().unwrap();
        let device = Self {
            root,
            fail: String::new(),
        };

        let adb = device.path().join("adb");
        fs::write(&adb, FAKE_ADB).unwrap();
        fs::set_permissions(&adb, fs::Permissions::from_mode(0o755)).unwrap();

        fs::write(device.path().join("state.txt"), "device\n").unwrap();
        fs::write(device.path().join("listing.txt"), listing.join("\n")).unwrap();
        fs::write(device.path().join("calls.log"), "").unwrap();

        let config = serde_json::json!({
            "recordings": {
                "source_path": "/sdcard/Oculus/VideoShots",
                "dest_path": device.recordings_dest(),
            },
            "shots": {
                "source_path": "/sdcard/Oculus/Screenshots",
                "dest_path": device.shots_dest(),
            },
            "bridge": { "program": adb },
        });
        let config_dir = device.path().join("xdg").join("qpull");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(
            config_dir.join("config.json"),
            serde_json::to_string_pretty(&config).unwrap(),
        )
        .unwrap();

        device
    }

    /// Makes the named file or setprop key fail.
    pub fn failing(mut self, name: &str) -> Self {
        self.fail = name.to_string();
        self
    }

    pub fn with_state(self, state: &str) -> Self {
        fs::write(self.path().join("state.txt"), format!("{}\n", state)).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn recordings_dest(&self) -> PathBuf {
        self.path().join("out").join("screen_recordings")
    }

    pub fn shots_dest(&self) -> PathBuf {
        self.path().join("out").join("screenshots")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_qpull"))
            .args(args)
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"))
            .env("QPULL_FAKE_ROOT", self.path())
            .env("QPULL_FAKE_FAIL", &self.fail)
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute qpull")
    }

    /// Every adb invocation, arguments joined by spaces.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.path().join("calls.log"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }
}
