use thiserror::Error;

/// Errors raised while talking to the device bridge or writing pulled files.
#[derive(Debug, Error)]
pub enum Error {
    /// An external command exited non-zero.
    #[error("Command failed: {command}: {stderr}")]
    Command { command: String, stderr: String },

    /// A listing line had a size field that is not an integer.
    #[error("Could not parse size from line: {line}")]
    SizeParse { line: String },

    /// A filename carries no 8-digit date.
    #[error("No date found in file name: {name}")]
    MissingDate { name: String },

    /// The bridge program could not be started at all.
    #[error("{program} not found. Please install the Android platform tools")]
    BridgeUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The bridge runs but no device is attached and authorized.
    #[error("No device ready (state: {state})")]
    NoDevice { state: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
