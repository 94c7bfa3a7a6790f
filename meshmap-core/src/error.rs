use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("Unknown map layer {0:?} (expected standard, hybrid, satellite or offline)")]
    UnknownLayer(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
