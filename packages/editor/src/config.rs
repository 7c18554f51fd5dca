use crate::errors::ConfigError;
use crate::shell::LayoutMode;
use crate::tabs::SectionTabMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "vitae.config.json";

/// Live editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Mirror scrolling between the panes
    pub sync_enabled: bool,

    /// Layout the shell starts in
    pub layout: LayoutMode,

    /// Quiet period before an edit reaches the preview
    pub preview_debounce_ms: u64,

    /// Time after the last mirrored scroll before sync returns to idle
    pub scroll_release_ms: u64,

    /// Duration of the preview's own tab-switch transition
    pub tab_transition_ms: u64,

    /// Wait after selecting a tab before scrolling to the section
    pub tab_settle_ms: u64,

    /// Wait for the scroll-into-view animation before releasing sync
    pub scroll_settle_ms: u64,

    /// Smallest share of the width either pane may be resized to
    pub min_pane_fraction: f64,

    /// Dim everything but the active section in the preview
    pub focus_mode: bool,

    /// Which preview tab shows each editing section
    pub section_tabs: SectionTabMap,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            sync_enabled: true,
            layout: LayoutMode::Split,
            preview_debounce_ms: 500,
            scroll_release_ms: 150,
            tab_transition_ms: 150,
            tab_settle_ms: 200,
            scroll_settle_ms: 800,
            min_pane_fraction: 0.3,
            focus_mode: false,
            section_tabs: SectionTabMap::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load config from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Load `vitae.config.json` from a directory, or defaults if absent
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(DEFAULT_CONFIG_NAME);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let delays = [
            ("previewDebounceMs", self.preview_debounce_ms),
            ("scrollReleaseMs", self.scroll_release_ms),
            ("tabSettleMs", self.tab_settle_ms),
            ("scrollSettleMs", self.scroll_settle_ms),
        ];
        if let Some((name, _)) = delays.iter().find(|(_, ms)| *ms == 0) {
            return Err(ConfigError::ZeroDelay(*name));
        }

        if self.tab_settle_ms < self.tab_transition_ms {
            return Err(ConfigError::TabSettleTooShort {
                settle_ms: self.tab_settle_ms,
                transition_ms: self.tab_transition_ms,
            });
        }

        if !(self.min_pane_fraction > 0.0 && self.min_pane_fraction <= 0.5) {
            return Err(ConfigError::PaneFraction(self.min_pane_fraction));
        }

        Ok(())
    }

    pub fn preview_debounce(&self) -> Duration {
        Duration::from_millis(self.preview_debounce_ms)
    }

    pub fn scroll_release(&self) -> Duration {
        Duration::from_millis(self.scroll_release_ms)
    }

    pub fn tab_settle(&self) -> Duration {
        Duration::from_millis(self.tab_settle_ms)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }
}
