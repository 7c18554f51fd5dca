//! # Scroll Synchronization
//!
//! Mirrors scroll position between the editor and preview panes by ratio.
//!
//! ## State machine
//!
//! ```text
//!            user scroll on X
//!   Idle ───────────────────────▶ DrivenBy(X)
//!    ▲                               │  scroll on X: mirror, re-arm release
//!    │      release timer fires      │  scroll on Y: echo, ignored
//!    └───────────────────────────────┘
//! ```
//!
//! Assigning the other pane's offset makes that pane raise its own scroll
//! event. While `DrivenBy(X)` holds, that event is recognised as the echo
//! and dropped, which is what keeps the two panes from ping-ponging.
//!
//! The activation bridge can also *hold* the controller in
//! `DrivenByEditorPane` while it moves the preview itself. A hold is only
//! ever ended by its owner; the release timer does not run during it.

use crate::surface::{PaneSide, ScrollMetrics, ScrollPane};
use crate::timers::{TimerId, TimerQueue, TimerTask};
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncState {
    #[default]
    Idle,
    DrivenByEditorPane,
    DrivenByPreviewPane,
}

impl SyncState {
    pub fn driven_by(side: PaneSide) -> Self {
        match side {
            PaneSide::Editor => SyncState::DrivenByEditorPane,
            PaneSide::Preview => SyncState::DrivenByPreviewPane,
        }
    }

    /// The pane currently being mirrored, if any
    pub fn driver(&self) -> Option<PaneSide> {
        match self {
            SyncState::Idle => None,
            SyncState::DrivenByEditorPane => Some(PaneSide::Editor),
            SyncState::DrivenByPreviewPane => Some(PaneSide::Preview),
        }
    }
}

/// What the controller did with a scroll event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollOutcome {
    /// The other pane was moved to `target_top`
    Mirrored { ratio: f64, target_top: f64 },

    /// Event came from the pane being driven into; dropped
    Echo,

    /// Source content fits its viewport; nothing to mirror
    Degenerate,

    /// Sync is disabled or has no second pane
    Inactive,
}

#[derive(Debug)]
pub struct ScrollSyncController {
    enabled: bool,
    state: SyncState,
    release_delay: Duration,
    release_timer: Option<TimerId>,

    /// Activation request currently holding the controller
    hold: Option<u64>,

    transitions: u64,
}

impl ScrollSyncController {
    pub fn new(release_delay: Duration, enabled: bool) -> Self {
        Self {
            enabled,
            state: SyncState::Idle,
            release_delay,
            release_timer: None,
            hold: None,
            transitions: 0,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of `SyncState` changes so far
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    pub fn is_held(&self) -> bool {
        self.hold.is_some()
    }

    pub fn has_pending_release(&self) -> bool {
        self.release_timer.is_some()
    }

    /// Enable or disable mirroring; disabling drops all state
    pub fn set_enabled(&mut self, enabled: bool, timers: &mut TimerQueue) {
        if !enabled {
            self.cancel(timers);
        }
        self.enabled = enabled;
    }

    /// Handle a scroll event from `side`, mirroring it onto `other`
    pub fn on_scroll<P: ScrollPane + ?Sized>(
        &mut self,
        side: PaneSide,
        metrics: ScrollMetrics,
        other: &mut P,
        timers: &mut TimerQueue,
        now: Instant,
    ) -> ScrollOutcome {
        if !self.enabled {
            return ScrollOutcome::Inactive;
        }

        if let Some(driver) = self.state.driver() {
            if driver != side {
                debug!(pane = %side, driver = %driver, "Ignoring echo scroll");
                return ScrollOutcome::Echo;
            }
        }

        if metrics.is_degenerate() {
            return ScrollOutcome::Degenerate;
        }

        let ratio = metrics.ratio();
        self.set_state(SyncState::driven_by(side));

        let target_top = other.metrics().offset_for(ratio);
        other.set_scroll_top(target_top);

        if self.hold.is_none() {
            timers.cancel_slot(&mut self.release_timer);
            self.release_timer =
                Some(timers.schedule(now + self.release_delay, TimerTask::ReleaseScroll));
        }

        ScrollOutcome::Mirrored { ratio, target_top }
    }

    /// Handle the release timer firing
    pub fn on_release_timer(&mut self, id: TimerId) -> bool {
        if self.release_timer != Some(id) {
            return false;
        }
        self.release_timer = None;
        self.set_state(SyncState::Idle);
        true
    }

    /// Take the controller for an activation pipeline
    pub fn hold(&mut self, request_id: u64, timers: &mut TimerQueue) {
        timers.cancel_slot(&mut self.release_timer);
        self.hold = Some(request_id);
        self.set_state(SyncState::DrivenByEditorPane);
    }

    /// End a hold; only the request that holds the controller can end it
    pub fn release_hold(&mut self, request_id: u64) -> bool {
        if self.hold != Some(request_id) {
            return false;
        }
        self.hold = None;
        self.set_state(SyncState::Idle);
        true
    }

    /// Cancel the release timer, drop any hold and return to idle
    pub fn cancel(&mut self, timers: &mut TimerQueue) {
        timers.cancel_slot(&mut self.release_timer);
        self.hold = None;
        self.set_state(SyncState::Idle);
    }

    fn set_state(&mut self, next: SyncState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "Sync state changed");
            self.state = next;
            self.transitions += 1;
        }
    }
}
