//! # Section Activation
//!
//! Turns "the user expanded section S in the form" into "the preview shows
//! S's tab, scrolled to S, with S highlighted".
//!
//! ## Pipeline
//!
//! ```text
//! activate(S)          tab settle            scroll settle
//!     │                    │                      │
//!     ├─ clear highlight   ├─ scroll S into view  └─ release hold → Idle
//!     ├─ hold sync         └─ highlight S
//!     └─ select tab
//! ```
//!
//! One request owns the pipeline at a time. A newer request cancels the
//! outstanding stage timer before starting over, and every stage checks its
//! captured request id against the latest one before touching the preview.

use crate::scroll_sync::ScrollSyncController;
use crate::surface::PreviewSurface;
use crate::tabs::{PreviewTabId, SectionTabMap};
use crate::timers::{DueTimer, TimerId, TimerQueue, TimerTask};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};
use vitae_document::SectionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivationStage {
    /// Waiting for the tab switch to finish rendering
    TabSettle,

    /// Waiting for the scroll-into-view animation
    ScrollSettle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationRequest {
    pub section_id: SectionId,
    pub request_id: u64,
}

/// Result of one pipeline stage firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage belonged to a superseded or cancelled request
    Stale,

    /// Section scrolled into view and highlighted
    Revealed(SectionId),

    /// The visible tab had no node for the section
    NodeMissing(SectionId),

    /// Hold released, sync back to idle
    Released(SectionId),
}

#[derive(Debug, Clone, Copy)]
struct ActivationTask {
    request: ActivationRequest,
    tab: PreviewTabId,
    stage: ActivationStage,
    timer: TimerId,
}

#[derive(Debug)]
pub struct SectionActivationBridge {
    tabs: SectionTabMap,
    tab_settle: Duration,
    scroll_settle: Duration,

    /// Highest request id issued so far
    last_request_id: u64,

    task: Option<ActivationTask>,
    active_section: Option<SectionId>,
    highlighted: Option<SectionId>,
    focus_mode: bool,
}

impl SectionActivationBridge {
    pub fn new(tabs: SectionTabMap, tab_settle: Duration, scroll_settle: Duration) -> Self {
        Self {
            tabs,
            tab_settle,
            scroll_settle,
            last_request_id: 0,
            task: None,
            active_section: None,
            highlighted: None,
            focus_mode: false,
        }
    }

    /// Start the pipeline for `section`, superseding any request in flight
    pub fn activate<P: PreviewSurface + ?Sized>(
        &mut self,
        section: SectionId,
        preview: &mut P,
        sync: &mut ScrollSyncController,
        timers: &mut TimerQueue,
        now: Instant,
    ) -> ActivationRequest {
        let request = self.issue(section, timers);

        self.clear_highlight(preview);
        sync.hold(request.request_id, timers);

        let tab = self.tabs.tab_for(section);
        if preview.active_tab() != Some(tab) {
            debug!(section = %section, tab = %tab, "Selecting preview tab");
            preview.select_tab(tab);
        }

        let timer = timers.schedule(
            now + self.tab_settle,
            TimerTask::Activation {
                request_id: request.request_id,
                stage: ActivationStage::TabSettle,
            },
        );
        self.task = Some(ActivationTask {
            request,
            tab,
            stage: ActivationStage::TabSettle,
            timer,
        });

        request
    }

    /// Record a section change while the pipeline cannot run
    ///
    /// The label still follows the form; nothing is scheduled.
    pub fn record_inert(&mut self, section: SectionId, timers: &mut TimerQueue) -> ActivationRequest {
        self.issue(section, timers)
    }

    /// Advance the pipeline for a due activation timer
    pub fn fire<P: PreviewSurface + ?Sized>(
        &mut self,
        due: &DueTimer,
        preview: &mut P,
        sync: &mut ScrollSyncController,
        timers: &mut TimerQueue,
    ) -> StageOutcome {
        let TimerTask::Activation { request_id, stage } = due.task else {
            return StageOutcome::Stale;
        };

        let task = match self.task {
            Some(task)
                if task.timer == due.id
                    && task.request.request_id == request_id
                    && request_id == self.last_request_id =>
            {
                task
            }
            _ => {
                debug!(request_id, latest = self.last_request_id, "Dropping stale activation stage");
                return StageOutcome::Stale;
            }
        };
        let section = task.request.section_id;

        match stage {
            ActivationStage::TabSettle => {
                let outcome = if preview.scroll_section_into_view(section) {
                    self.highlighted = Some(section);
                    preview.set_highlight(Some(section));
                    if self.focus_mode {
                        preview.set_focus_mode(true);
                    }
                    debug!(section = %section, tab = %task.tab, "Revealed section");
                    StageOutcome::Revealed(section)
                } else {
                    warn!(section = %section, tab = %task.tab, "Section node not found in preview");
                    StageOutcome::NodeMissing(section)
                };

                let timer = timers.schedule(
                    due.deadline + self.scroll_settle,
                    TimerTask::Activation {
                        request_id,
                        stage: ActivationStage::ScrollSettle,
                    },
                );
                self.task = Some(ActivationTask {
                    stage: ActivationStage::ScrollSettle,
                    timer,
                    ..task
                });
                outcome
            }
            ActivationStage::ScrollSettle => {
                self.task = None;
                sync.release_hold(request_id);
                debug!(section = %section, "Activation settled");
                StageOutcome::Released(section)
            }
        }
    }

    /// Cancel the pipeline in flight and release its hold
    pub fn cancel(&mut self, sync: &mut ScrollSyncController, timers: &mut TimerQueue) {
        if let Some(task) = self.task.take() {
            timers.cancel(task.timer);
            sync.release_hold(task.request.request_id);
            debug!(request_id = task.request.request_id, stage = ?task.stage, "Cancelled activation");
        }
    }

    /// Drop the highlight along with any pipeline in flight
    pub fn reset<P: PreviewSurface + ?Sized>(
        &mut self,
        preview: Option<&mut P>,
        sync: &mut ScrollSyncController,
        timers: &mut TimerQueue,
    ) {
        self.cancel(sync, timers);
        match preview {
            Some(preview) => self.clear_highlight(preview),
            None => self.highlighted = None,
        }
    }

    pub fn set_focus_mode<P: PreviewSurface + ?Sized>(&mut self, enabled: bool, preview: Option<&mut P>) {
        self.focus_mode = enabled;
        if let Some(preview) = preview {
            preview.set_focus_mode(enabled && self.highlighted.is_some());
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.task.is_some()
    }

    /// Stage the pipeline is waiting on, if any
    pub fn pending_stage(&self) -> Option<ActivationStage> {
        self.task.map(|task| task.stage)
    }

    /// Section most recently activated from the form
    pub fn active_section(&self) -> Option<SectionId> {
        self.active_section
    }

    /// Tab the preview should show for the active section
    pub fn active_tab_hint(&self) -> Option<PreviewTabId> {
        self.active_section.map(|section| self.tabs.tab_for(section))
    }

    pub fn highlighted(&self) -> Option<SectionId> {
        self.highlighted
    }

    pub fn focus_mode(&self) -> bool {
        self.focus_mode
    }

    pub fn last_request_id(&self) -> u64 {
        self.last_request_id
    }

    fn issue(&mut self, section: SectionId, timers: &mut TimerQueue) -> ActivationRequest {
        if let Some(task) = self.task.take() {
            timers.cancel(task.timer);
            debug!(
                superseded = task.request.request_id,
                section = %task.request.section_id,
                "Superseding activation"
            );
        }

        self.last_request_id += 1;
        self.active_section = Some(section);
        ActivationRequest {
            section_id: section,
            request_id: self.last_request_id,
        }
    }

    fn clear_highlight<P: PreviewSurface + ?Sized>(&mut self, preview: &mut P) {
        if self.highlighted.take().is_some() {
            preview.set_highlight(None);
            if self.focus_mode {
                preview.set_focus_mode(false);
            }
        }
    }
}
