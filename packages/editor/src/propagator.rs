//! # Change Propagation
//!
//! Decouples edit-time churn from preview re-render cost.
//!
//! The editing pane sees every document value immediately. The preview
//! only sees a value once edits have been quiet for the debounce period:
//! each change re-arms one timer instead of queueing another publication.

use crate::timers::{TimerId, TimerQueue, TimerTask};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use vitae_document::ResumeDocument;

/// A document value published to the preview
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSnapshot {
    /// Store version the snapshot was taken at
    pub version: u64,

    pub document: Arc<ResumeDocument>,
}

/// Debounces document changes on their way to the preview
#[derive(Debug)]
pub struct ChangePropagator {
    quiet_period: Duration,
    timer: Option<TimerId>,

    /// Latest change not yet published
    pending: Option<PreviewSnapshot>,

    /// Last snapshot handed to the preview
    published: PreviewSnapshot,
}

impl ChangePropagator {
    /// Create a propagator whose first published snapshot is `initial`
    pub fn new(quiet_period: Duration, initial: PreviewSnapshot) -> Self {
        Self {
            quiet_period,
            timer: None,
            pending: None,
            published: initial,
        }
    }

    /// Record a change and (re)start the quiet period
    pub fn notify(&mut self, snapshot: PreviewSnapshot, timers: &mut TimerQueue, now: Instant) {
        timers.cancel_slot(&mut self.timer);
        debug!(version = snapshot.version, "Preview update deferred");
        self.pending = Some(snapshot);
        self.timer = Some(timers.schedule(now + self.quiet_period, TimerTask::PublishPreview));
    }

    /// Record a change without arming the timer
    ///
    /// Used while no preview is shown; the next flush publishes it.
    pub fn stash(&mut self, snapshot: PreviewSnapshot, timers: &mut TimerQueue) {
        timers.cancel_slot(&mut self.timer);
        self.pending = Some(snapshot);
    }

    /// Handle the debounce timer firing
    pub fn on_timer(&mut self, id: TimerId) -> Option<&PreviewSnapshot> {
        if self.timer != Some(id) {
            return None;
        }
        self.timer = None;
        self.publish()
    }

    /// Publish any pending change now
    pub fn flush(&mut self, timers: &mut TimerQueue) -> Option<&PreviewSnapshot> {
        timers.cancel_slot(&mut self.timer);
        self.publish()
    }

    /// Stop the quiet period; the change stays pending until the next flush
    pub fn cancel(&mut self, timers: &mut TimerQueue) {
        timers.cancel_slot(&mut self.timer);
    }

    /// Replace everything with a snapshot that is published immediately
    pub fn replace(&mut self, snapshot: PreviewSnapshot, timers: &mut TimerQueue) -> &PreviewSnapshot {
        timers.cancel_slot(&mut self.timer);
        self.pending = None;
        self.published = snapshot;
        &self.published
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    pub fn published(&self) -> &PreviewSnapshot {
        &self.published
    }

    fn publish(&mut self) -> Option<&PreviewSnapshot> {
        let snapshot = self.pending.take()?;
        debug!(version = snapshot.version, "Publishing preview snapshot");
        self.published = snapshot;
        Some(&self.published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(version: u64) -> PreviewSnapshot {
        let mut document = ResumeDocument::default();
        document.profile.bio = format!("v{}", version);
        PreviewSnapshot {
            version,
            document: Arc::new(document),
        }
    }

    fn drain(propagator: &mut ChangePropagator, timers: &mut TimerQueue, now: Instant) -> Vec<u64> {
        let mut published = Vec::new();
        while let Some(due) = timers.pop_due(now) {
            if let Some(snapshot) = propagator.on_timer(due.id) {
                published.push(snapshot.version);
            }
        }
        published
    }

    #[test]
    fn test_burst_publishes_only_final_state() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        let mut propagator = ChangePropagator::new(Duration::from_millis(500), snapshot(0));

        for (i, offset) in [0u64, 100, 200, 300].iter().enumerate() {
            let now = start + Duration::from_millis(*offset);
            assert!(drain(&mut propagator, &mut timers, now).is_empty());
            propagator.notify(snapshot(i as u64 + 1), &mut timers, now);
        }

        // Quiet period counts from the last edit
        assert!(drain(&mut propagator, &mut timers, start + Duration::from_millis(799)).is_empty());
        assert_eq!(drain(&mut propagator, &mut timers, start + Duration::from_millis(800)), vec![4]);
        assert_eq!(propagator.published().document.profile.bio, "v4");
        assert!(timers.is_empty());
    }

    #[test]
    fn test_flush_publishes_immediately() {
        let now = Instant::now();
        let mut timers = TimerQueue::new();
        let mut propagator = ChangePropagator::new(Duration::from_millis(500), snapshot(0));

        propagator.notify(snapshot(1), &mut timers, now);
        assert_eq!(propagator.flush(&mut timers).map(|s| s.version), Some(1));
        assert!(timers.is_empty());
        assert!(propagator.flush(&mut timers).is_none());
    }

    #[test]
    fn test_cancel_keeps_change_pending() {
        let now = Instant::now();
        let mut timers = TimerQueue::new();
        let mut propagator = ChangePropagator::new(Duration::from_millis(500), snapshot(0));

        propagator.notify(snapshot(1), &mut timers, now);
        propagator.cancel(&mut timers);

        assert!(timers.is_empty());
        assert!(propagator.is_pending());
        assert!(!propagator.is_armed());
        assert_eq!(propagator.published().version, 0);
    }

    #[test]
    fn test_stash_waits_for_flush() {
        let now = Instant::now();
        let mut timers = TimerQueue::new();
        let mut propagator = ChangePropagator::new(Duration::from_millis(500), snapshot(0));

        propagator.notify(snapshot(1), &mut timers, now);
        propagator.stash(snapshot(2), &mut timers);
        assert!(timers.is_empty());

        assert_eq!(propagator.flush(&mut timers).map(|s| s.version), Some(2));
    }
}
