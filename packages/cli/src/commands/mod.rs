pub mod check;
pub mod init;
pub mod replay;

pub use check::{check, CheckArgs};
pub use init::{init, InitArgs};
pub use replay::{replay, ReplayArgs};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use vitae_editor::EditorConfig;

/// Load config from an explicit path, or `vitae.config.json` in `cwd`
pub(crate) fn load_config(path: Option<&Path>, cwd: &str) -> Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => EditorConfig::load_from_dir(&PathBuf::from(cwd))
            .with_context(|| format!("Failed to load config from {}", cwd)),
    }
}
