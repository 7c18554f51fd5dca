//! # Vitae Editor
//!
//! Coordination engine for the dual-pane live resume editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ DualPaneShell: layout + pane ownership      │
//! └─────────────────────────────────────────────┘
//!        ↓                ↓                 ↓
//! ┌──────────────┐ ┌──────────────┐ ┌──────────────────┐
//! │ Change       │ │ ScrollSync   │ │ SectionActivation│
//! │ Propagator   │ │ Controller   │←│ Bridge           │
//! └──────────────┘ └──────────────┘ └──────────────────┘
//!        ↓                ↓                 ↓
//! ┌─────────────────────────────────────────────┐
//! │ TimerQueue: every pending delay, cancelable │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ ShellDriver: tokio loop firing due timers   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The core is sans-IO. Panes are reached through [`ScrollPane`] and
//! [`PreviewSurface`]; time is passed in as `Instant`s and delays are
//! entries in the shell's [`TimerQueue`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vitae_editor::{DualPaneShell, EditorConfig, ShellDriver};
//! use vitae_editor::sim::{SimulatedPane, SimulatedPreview};
//!
//! let config = EditorConfig::load_from_dir(&cwd)?;
//! let mut shell = DualPaneShell::new(config.clone(), store);
//! shell.attach_editor(SimulatedPane::new(2000.0, 500.0));
//! shell.attach_preview(SimulatedPreview::new(config.section_tabs, 500.0));
//!
//! let (driver, handle) = ShellDriver::new(shell);
//! tokio::spawn(driver.run());
//! handle.activate(SectionId::Certifications)?;
//! ```

mod activation;
mod config;
mod driver;
mod errors;
mod propagator;
mod scroll_sync;
mod shell;
pub mod sim;
mod surface;
mod tabs;
mod timers;

pub use activation::{ActivationRequest, ActivationStage, SectionActivationBridge, StageOutcome};
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use driver::{ShellCommand, ShellDriver, ShellHandle};
pub use errors::{ConfigError, EditorError};
pub use propagator::{ChangePropagator, PreviewSnapshot};
pub use scroll_sync::{ScrollOutcome, ScrollSyncController, SyncState};
pub use shell::{DualPaneShell, LayoutMode, ShellStatus};
pub use surface::{PaneSide, PreviewSurface, ScrollEvent, ScrollMetrics, ScrollPane};
pub use tabs::{PreviewTabId, SectionTabMap};
pub use timers::{DueTimer, TimerId, TimerQueue, TimerTask};
