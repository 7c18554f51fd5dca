//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0} must be greater than zero")]
    ZeroDelay(&'static str),

    #[error("tabSettleMs ({settle_ms}) is shorter than the tab transition ({transition_ms})")]
    TabSettleTooShort { settle_ms: u64, transition_ms: u64 },

    #[error("minPaneFraction must be within (0, 0.5], got {0}")]
    PaneFraction(f64),
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Document error: {0}")]
    Document(#[from] vitae_document::DocumentError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Editor driver has shut down")]
    DriverClosed,
}
