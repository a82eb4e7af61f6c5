use anyhow::Result;
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// The two fixed transfer categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Task {
    Recordings,
    Shots,
}

impl Task {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recordings => "recordings",
            Self::Shots => "shots",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote source directory and local destination root for one task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskPaths {
    pub source_path: String,
    pub dest_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BridgeConfig {
    pub program: String,
    #[serde(default)]
    pub serial: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            program: "adb".to_string(),
            serial: None,
        }
    }
}

/// A device property applied by `qpull prep`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaptureSetting {
    pub key: String,
    pub value: String,
}

impl CaptureSetting {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

pub fn default_capture_settings() -> Vec<CaptureSetting> {
    vec![
        CaptureSetting::new("debug.oculus.capture.width", "1920"), // default is 1024
        CaptureSetting::new("debug.oculus.capture.height", "1080"), // default is 1024
        CaptureSetting::new("debug.oculus.capture.bitrate", "10000000"), // default is 50000000
        CaptureSetting::new("debug.oculus.capture.fps", "60"),     // default is 30
        CaptureSetting::new("debug.oculus.foveation.level", "0"),  // default is 2
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub recordings: TaskPaths,
    pub shots: TaskPaths,
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default = "default_capture_settings")]
    pub capture_settings: Vec<CaptureSetting>,
}

impl Default for Config {
    fn default() -> Self {
        let user_dirs = UserDirs::new();
        let videos = user_dirs
            .as_ref()
            .and_then(UserDirs::video_dir)
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let pictures = user_dirs
            .as_ref()
            .and_then(UserDirs::picture_dir)
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        Self {
            recordings: TaskPaths {
                source_path: "/sdcard/Oculus/VideoShots".to_string(),
                dest_path: videos.join("qpull").join("screen_recordings"),
            },
            shots: TaskPaths {
                source_path: "/sdcard/Oculus/Screenshots".to_string(),
                dest_path: pictures.join("qpull").join("screenshots"),
            },
            bridge: BridgeConfig::default(),
            capture_settings: default_capture_settings(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(config_path) => Self::load_from(&config_path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            return Ok(config);
        }
        Ok(Self::default())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_path() {
            self.save_to(&config_path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "qpull", "qpull")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub const fn paths(&self, task: Task) -> &TaskPaths {
        match task {
            Task::Recordings => &self.recordings,
            Task::Shots => &self.shots,
        }
    }

    pub fn paths_mut(&mut self, task: Task) -> &mut TaskPaths {
        match task {
            Task::Recordings => &mut self.recordings,
            Task::Shots => &mut self.shots,
        }
    }
}
