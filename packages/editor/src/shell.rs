//! # Dual-Pane Shell
//!
//! Owns the document store, both pane handles and the coordination
//! machinery between them.
//!
//! Sync is live only in split layout with both panes attached and sync
//! enabled. Otherwise the controller and bridge exist but do nothing.
//!
//! Any change that can take a pane away (layout switch, detach, sync
//! toggle, reset, teardown) quiesces first: scroll release and activation
//! timers are cancelled, and a pending preview update is either flushed to
//! a visible preview or parked until one is shown again. Nothing scheduled
//! before the change can fire after it.

use crate::activation::{ActivationRequest, SectionActivationBridge, StageOutcome};
use crate::config::EditorConfig;
use crate::errors::EditorError;
use crate::propagator::{ChangePropagator, PreviewSnapshot};
use crate::scroll_sync::{ScrollOutcome, ScrollSyncController, SyncState};
use crate::surface::{PaneSide, PreviewSurface, ScrollEvent, ScrollPane};
use crate::tabs::PreviewTabId;
use crate::timers::{TimerQueue, TimerTask};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use vitae_document::{DocumentStore, Mutation, MutationResult, ResumeDocument, SectionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    EditorOnly,
    PreviewOnly,
    Split,
}

impl LayoutMode {
    pub fn shows_editor(&self) -> bool {
        matches!(self, LayoutMode::EditorOnly | LayoutMode::Split)
    }

    pub fn shows_preview(&self) -> bool {
        matches!(self, LayoutMode::PreviewOnly | LayoutMode::Split)
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutMode::EditorOnly => f.write_str("editor-only"),
            LayoutMode::PreviewOnly => f.write_str("preview-only"),
            LayoutMode::Split => f.write_str("split"),
        }
    }
}

/// Point-in-time view of a shell, for hosts and logs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellStatus {
    pub layout: LayoutMode,
    pub sync_live: bool,
    pub sync_state: SyncState,
    pub version: u64,
    pub published_version: u64,
    pub dirty: bool,
    pub pending_timers: usize,
    pub active_section: Option<SectionId>,
    pub active_tab: Option<PreviewTabId>,
    pub highlighted: Option<SectionId>,
    pub focus_mode: bool,
    pub split_fraction: f64,
}

pub struct DualPaneShell<E: ScrollPane, P: PreviewSurface> {
    config: EditorConfig,
    layout: LayoutMode,
    store: DocumentStore,
    propagator: ChangePropagator,
    scroll: ScrollSyncController,
    bridge: SectionActivationBridge,
    timers: TimerQueue,

    editor: Option<E>,
    preview: Option<P>,

    /// Editor pane's share of the width
    split_fraction: f64,
    min_pane_fraction: f64,

    /// User's sync toggle; live sync also needs split layout and both panes
    sync_enabled: bool,

    /// Why sync was forced off at construction, if it was
    degraded: Option<String>,
}

impl<E: ScrollPane, P: PreviewSurface> DualPaneShell<E, P> {
    /// Create a shell around a store
    ///
    /// An invalid config does not fail construction: the shell logs why and
    /// runs with sync disabled.
    pub fn new(config: EditorConfig, store: DocumentStore) -> Self {
        let defaults = EditorConfig::default();
        let (degraded, min_pane_fraction) = match config.validate() {
            Ok(()) => (None, config.min_pane_fraction),
            Err(err) => {
                warn!(error = %err, "Invalid editor config, scroll sync disabled");
                let fraction = if config.min_pane_fraction > 0.0 && config.min_pane_fraction <= 0.5 {
                    config.min_pane_fraction
                } else {
                    defaults.min_pane_fraction
                };
                (Some(err.to_string()), fraction)
            }
        };
        let sync_enabled = config.sync_enabled && degraded.is_none();

        let initial = PreviewSnapshot {
            version: store.version(),
            document: store.current(),
        };
        let mut bridge =
            SectionActivationBridge::new(config.section_tabs, config.tab_settle(), config.scroll_settle());
        bridge.set_focus_mode::<P>(config.focus_mode, None);

        info!(layout = %config.layout, sync = sync_enabled, "Shell created");
        Self {
            layout: config.layout,
            propagator: ChangePropagator::new(config.preview_debounce(), initial),
            scroll: ScrollSyncController::new(config.scroll_release(), false),
            bridge,
            timers: TimerQueue::new(),
            editor: None,
            preview: None,
            split_fraction: 0.5,
            min_pane_fraction,
            sync_enabled,
            degraded,
            store,
            config,
        }
    }

    /// Attach the editing pane, returning any pane it replaces
    pub fn attach_editor(&mut self, pane: E) -> Option<E> {
        let previous = self.editor.replace(pane);
        self.quiesce();
        self.refresh_sync();
        previous
    }

    /// Attach the preview and bring it up to date
    pub fn attach_preview(&mut self, mut preview: P) -> Option<P> {
        preview.render(self.propagator.published());
        preview.set_focus_mode(false);
        let previous = self.preview.replace(preview);
        self.quiesce();
        self.refresh_sync();
        previous
    }

    pub fn detach_editor(&mut self) -> Option<E> {
        let pane = self.editor.take();
        self.quiesce();
        self.refresh_sync();
        pane
    }

    pub fn detach_preview(&mut self) -> Option<P> {
        let preview = self.preview.take();
        self.quiesce();
        self.refresh_sync();
        preview
    }

    #[instrument(skip(self), fields(from = %self.layout))]
    pub fn set_layout(&mut self, layout: LayoutMode) {
        if self.layout == layout {
            return;
        }
        self.layout = layout;
        let cancelled = self.quiesce();
        self.refresh_sync();
        info!(cancelled, sync = self.is_sync_live(), "Layout changed");
    }

    /// Toggle scroll sync; returns whether sync is now enabled
    #[instrument(skip(self))]
    pub fn set_sync_enabled(&mut self, enabled: bool) -> bool {
        if enabled {
            if let Some(reason) = &self.degraded {
                warn!(reason = %reason, "Scroll sync unavailable with invalid config");
                return false;
            }
        }
        if self.sync_enabled != enabled {
            self.sync_enabled = enabled;
            self.quiesce();
            self.refresh_sync();
            info!(live = self.is_sync_live(), "Scroll sync toggled");
        }
        self.sync_enabled
    }

    pub fn set_focus_mode(&mut self, enabled: bool) {
        let preview = self.preview.as_mut().filter(|_| self.layout.shows_preview());
        self.bridge.set_focus_mode(enabled, preview);
    }

    /// Resize the split; clamped so neither pane drops below the minimum
    pub fn set_split_fraction(&mut self, fraction: f64) -> f64 {
        if fraction.is_finite() {
            self.split_fraction = fraction.clamp(self.min_pane_fraction, 1.0 - self.min_pane_fraction);
            debug!(fraction = self.split_fraction, "Split resized");
        }
        self.split_fraction
    }

    /// Feed a scroll event raised by one of the panes
    pub fn on_scroll(&mut self, event: ScrollEvent, now: Instant) -> ScrollOutcome {
        if !self.is_sync_live() {
            return ScrollOutcome::Inactive;
        }

        let outcome = match event.pane {
            PaneSide::Editor => match self.preview.as_mut() {
                Some(preview) => {
                    self.scroll
                        .on_scroll(PaneSide::Editor, event.metrics, preview, &mut self.timers, now)
                }
                None => ScrollOutcome::Inactive,
            },
            PaneSide::Preview => match self.editor.as_mut() {
                Some(editor) => {
                    self.scroll
                        .on_scroll(PaneSide::Preview, event.metrics, editor, &mut self.timers, now)
                }
                None => ScrollOutcome::Inactive,
            },
        };
        debug!(pane = %event.pane, ?outcome, "Scroll handled");
        outcome
    }

    /// Move one pane as the user would and feed the resulting event
    pub fn scroll_pane_to(&mut self, side: PaneSide, top: f64, now: Instant) -> ScrollOutcome {
        let metrics = match side {
            PaneSide::Editor => self.editor.as_mut().map(|pane| {
                pane.set_scroll_top(top);
                pane.metrics()
            }),
            PaneSide::Preview => self.preview.as_mut().map(|pane| {
                pane.set_scroll_top(top);
                pane.metrics()
            }),
        };

        match metrics {
            Some(metrics) => self.on_scroll(ScrollEvent { pane: side, metrics }, now),
            None => ScrollOutcome::Inactive,
        }
    }

    /// The form's expanded section changed
    #[instrument(skip(self, now))]
    pub fn activate_section(&mut self, section: SectionId, now: Instant) -> ActivationRequest {
        if self.is_sync_live() {
            if let Some(preview) = self.preview.as_mut() {
                return self
                    .bridge
                    .activate(section, preview, &mut self.scroll, &mut self.timers, now);
            }
        }
        self.bridge.record_inert(section, &mut self.timers)
    }

    /// Apply an edit; the preview sees it once edits go quiet
    pub fn apply(&mut self, mutation: Mutation, now: Instant) -> Result<MutationResult, EditorError> {
        let result = self.store.apply(mutation)?;
        let snapshot = PreviewSnapshot {
            version: result.version,
            document: Arc::clone(&result.document),
        };

        if self.layout.shows_preview() && self.preview.is_some() {
            self.propagator.notify(snapshot, &mut self.timers, now);
        } else {
            self.propagator.stash(snapshot, &mut self.timers);
        }
        Ok(result)
    }

    /// Discard edits since the last save
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Arc<ResumeDocument> {
        let document = self.store.reset();
        self.republish(Arc::clone(&document));
        info!(version = self.store.version(), "Document reset");
        document
    }

    /// Replace the document with an arbitrary snapshot
    pub fn reset_to(&mut self, snapshot: Arc<ResumeDocument>) -> Arc<ResumeDocument> {
        let document = self.store.reset_to(snapshot);
        self.republish(Arc::clone(&document));
        document
    }

    /// Make the current document the new reset baseline
    pub fn mark_saved(&mut self) -> Arc<ResumeDocument> {
        info!(version = self.store.version(), "Document saved");
        self.store.mark_saved()
    }

    /// Run every timer due at `now`, returning how many fired
    pub fn fire_due(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some(due) = self.timers.pop_due(now) {
            fired += 1;
            match due.task {
                TimerTask::PublishPreview => {
                    if let Some(snapshot) = self.propagator.on_timer(due.id) {
                        if let Some(preview) = self.preview.as_mut().filter(|_| self.layout.shows_preview()) {
                            preview.render(snapshot);
                        }
                    }
                }
                TimerTask::ReleaseScroll => {
                    self.scroll.on_release_timer(due.id);
                }
                TimerTask::Activation { .. } => {
                    let outcome = match self.preview.as_mut() {
                        Some(preview) => self.bridge.fire(&due, preview, &mut self.scroll, &mut self.timers),
                        None => StageOutcome::Stale,
                    };
                    debug!(?outcome, "Activation stage fired");
                }
            }
        }
        fired
    }

    /// Cancel everything; the shell stays usable but idle
    #[instrument(skip(self))]
    pub fn teardown(&mut self) {
        self.bridge.reset(self.preview.as_mut(), &mut self.scroll, &mut self.timers);
        self.scroll.cancel(&mut self.timers);
        self.propagator.cancel(&mut self.timers);
        let leftover = self.timers.clear();
        info!(leftover, "Shell torn down");
    }

    pub fn status(&self) -> ShellStatus {
        ShellStatus {
            layout: self.layout,
            sync_live: self.is_sync_live(),
            sync_state: self.scroll.state(),
            version: self.store.version(),
            published_version: self.propagator.published().version,
            dirty: self.store.is_dirty(),
            pending_timers: self.timers.len(),
            active_section: self.bridge.active_section(),
            active_tab: self.bridge.active_tab_hint(),
            highlighted: self.bridge.highlighted(),
            focus_mode: self.bridge.focus_mode(),
            split_fraction: self.split_fraction,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_sync_live(&self) -> bool {
        self.sync_enabled && self.layout == LayoutMode::Split && self.editor.is_some() && self.preview.is_some()
    }

    pub fn is_sync_enabled(&self) -> bool {
        self.sync_enabled
    }

    /// Reason sync was forced off, if the config failed validation
    pub fn degraded(&self) -> Option<&str> {
        self.degraded.as_deref()
    }

    pub fn sync_state(&self) -> SyncState {
        self.scroll.state()
    }

    /// Number of sync state changes since creation
    pub fn sync_transitions(&self) -> u64 {
        self.scroll.transitions()
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    pub fn split_fraction(&self) -> f64 {
        self.split_fraction
    }

    pub fn document(&self) -> Arc<ResumeDocument> {
        self.store.current()
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Snapshot the preview was last given
    pub fn published(&self) -> &PreviewSnapshot {
        self.propagator.published()
    }

    pub fn is_preview_stale(&self) -> bool {
        self.propagator.is_pending()
    }

    pub fn active_section(&self) -> Option<SectionId> {
        self.bridge.active_section()
    }

    pub fn active_tab_hint(&self) -> Option<PreviewTabId> {
        self.bridge.active_tab_hint()
    }

    pub fn highlighted(&self) -> Option<SectionId> {
        self.bridge.highlighted()
    }

    pub fn focus_mode(&self) -> bool {
        self.bridge.focus_mode()
    }

    pub fn is_activation_in_flight(&self) -> bool {
        self.bridge.is_in_flight()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn editor(&self) -> Option<&E> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut E> {
        self.editor.as_mut()
    }

    pub fn preview(&self) -> Option<&P> {
        self.preview.as_ref()
    }

    pub fn preview_mut(&mut self) -> Option<&mut P> {
        self.preview.as_mut()
    }

    /// Cancel scroll and activation timers; flush or park the preview update
    fn quiesce(&mut self) -> usize {
        let before = self.timers.len();
        self.bridge.reset(self.preview.as_mut(), &mut self.scroll, &mut self.timers);
        self.scroll.cancel(&mut self.timers);

        if self.layout.shows_preview() {
            if let Some(preview) = self.preview.as_mut() {
                if let Some(snapshot) = self.propagator.flush(&mut self.timers) {
                    preview.render(snapshot);
                }
            } else {
                self.propagator.cancel(&mut self.timers);
            }
        } else {
            self.propagator.cancel(&mut self.timers);
        }

        before - self.timers.len()
    }

    fn refresh_sync(&mut self) {
        let live = self.is_sync_live();
        self.scroll.set_enabled(live, &mut self.timers);
    }

    fn republish(&mut self, document: Arc<ResumeDocument>) {
        self.quiesce();
        let snapshot = PreviewSnapshot {
            version: self.store.version(),
            document,
        };
        let published = self.propagator.replace(snapshot, &mut self.timers);
        if let Some(preview) = self.preview.as_mut().filter(|_| self.layout.shows_preview()) {
            preview.render(published);
        }
    }
}

impl<E: ScrollPane, P: PreviewSurface> Drop for DualPaneShell<E, P> {
    fn drop(&mut self) {
        if !self.timers.is_empty() {
            self.teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimulatedPane, SimulatedPreview};
    use crate::tabs::SectionTabMap;
    use std::time::Duration;
    use vitae_document::{ProfileField, ResumeData};

    type Shell = DualPaneShell<SimulatedPane, SimulatedPreview>;

    fn shell(config: EditorConfig) -> Shell {
        let mut shell = Shell::new(config, DocumentStore::new("test", ResumeData::default()));
        shell.attach_editor(SimulatedPane::new(2000.0, 500.0));
        shell.attach_preview(SimulatedPreview::new(SectionTabMap::default(), 400.0));
        shell
    }

    fn bio(value: &str) -> Mutation {
        Mutation::SetField {
            field: ProfileField::Bio,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_sync_live_only_in_split() {
        let mut shell = shell(EditorConfig::default());
        assert!(shell.is_sync_live());

        shell.set_layout(LayoutMode::EditorOnly);
        assert!(!shell.is_sync_live());
        assert_eq!(shell.scroll_pane_to(PaneSide::Editor, 300.0, Instant::now()), ScrollOutcome::Inactive);

        shell.set_layout(LayoutMode::Split);
        shell.set_sync_enabled(false);
        assert!(!shell.is_sync_live());
    }

    #[test]
    fn test_edits_reach_preview_after_quiet_period() {
        let mut shell = shell(EditorConfig::default());
        let start = Instant::now();

        shell.apply(bio("a"), start).unwrap();
        shell.apply(bio("ab"), start + Duration::from_millis(100)).unwrap();
        assert_eq!(shell.preview().unwrap().rendered_version(), Some(0));

        shell.fire_due(start + Duration::from_millis(599));
        assert_eq!(shell.preview().unwrap().rendered_version(), Some(0));

        shell.fire_due(start + Duration::from_millis(600));
        assert_eq!(shell.preview().unwrap().rendered_version(), Some(2));
        assert_eq!(shell.published().document.profile.bio, "ab");
    }

    #[test]
    fn test_hidden_preview_catches_up_on_show() {
        let mut shell = shell(EditorConfig::default());
        shell.set_layout(LayoutMode::EditorOnly);

        shell.apply(bio("offscreen"), Instant::now()).unwrap();
        assert_eq!(shell.pending_timers(), 0);
        assert!(shell.is_preview_stale());

        shell.set_layout(LayoutMode::Split);
        assert_eq!(shell.preview().unwrap().rendered_version(), Some(1));
        assert!(!shell.is_preview_stale());
    }

    #[test]
    fn test_failed_mutation_schedules_nothing() {
        let mut shell = shell(EditorConfig::default());
        let result = shell.apply(
            Mutation::SetField {
                field: ProfileField::Name,
                value: "  ".to_string(),
            },
            Instant::now(),
        );

        assert!(result.is_err());
        assert_eq!(shell.store().version(), 0);
        assert_eq!(shell.pending_timers(), 0);
    }

    #[test]
    fn test_split_fraction_clamped() {
        let mut shell = shell(EditorConfig::default());
        assert_eq!(shell.set_split_fraction(0.1), 0.3);
        assert!((shell.set_split_fraction(0.95) - 0.7).abs() < 1e-9);
        assert!((shell.set_split_fraction(f64::NAN) - 0.7).abs() < 1e-9);
        assert_eq!(shell.set_split_fraction(0.45), 0.45);
    }

    #[test]
    fn test_resize_leaves_sync_alone() {
        let mut shell = shell(EditorConfig::default());
        let now = Instant::now();
        shell.scroll_pane_to(PaneSide::Editor, 600.0, now);
        let pending = shell.pending_timers();

        shell.set_split_fraction(0.6);
        assert_eq!(shell.sync_state(), SyncState::DrivenByEditorPane);
        assert_eq!(shell.pending_timers(), pending);
    }

    #[test]
    fn test_invalid_config_degrades() {
        let config = EditorConfig {
            tab_transition_ms: 400,
            ..Default::default()
        };
        let mut shell = shell(config);

        assert!(shell.degraded().is_some());
        assert!(!shell.is_sync_live());
        assert!(!shell.set_sync_enabled(true));

        // Editing still works
        shell.apply(bio("still editable"), Instant::now()).unwrap();
        assert_eq!(shell.document().profile.bio, "still editable");
    }

    #[test]
    fn test_reset_restores_baseline() {
        let mut shell = shell(EditorConfig::default());
        let now = Instant::now();

        shell.apply(bio("draft"), now).unwrap();
        shell.mark_saved();
        shell.apply(bio("scratch"), now).unwrap();
        shell.activate_section(SectionId::Skills, now);

        let document = shell.reset();
        assert_eq!(document.profile.bio, "draft");
        assert_eq!(shell.pending_timers(), 0);
        assert_eq!(shell.sync_state(), SyncState::Idle);
        assert_eq!(shell.preview().unwrap().rendered_version(), Some(shell.store().version()));
    }

    #[test]
    fn test_drop_clears_timers() {
        let mut shell = shell(EditorConfig::default());
        shell.activate_section(SectionId::Projects, Instant::now());
        assert!(shell.pending_timers() > 0);

        shell.teardown();
        assert_eq!(shell.pending_timers(), 0);
        assert!(!shell.is_activation_in_flight());
    }
}
