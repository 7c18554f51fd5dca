//! # Timer Queue
//!
//! Every delay in the editor (preview debounce, scroll release, tab-settle,
//! scroll-settle) is one entry in a [`TimerQueue`] owned by the shell.
//!
//! The queue never sleeps. The host asks for [`TimerQueue::next_deadline`],
//! waits however it likes, then drains due entries with
//! [`TimerQueue::pop_due`]. A [`TimerId`] is the task handle: cancelling it
//! removes the entry, so a cancelled callback can never run.

use crate::activation::ActivationStage;
use std::collections::BTreeMap;
use tokio::time::Instant;

/// Handle to one scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// What to do when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Publish the pending preview snapshot
    PublishPreview,

    /// Return scroll sync to idle
    ReleaseScroll,

    /// Advance an activation pipeline
    Activation {
        request_id: u64,
        stage: ActivationStage,
    },
}

/// A timer that has come due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTimer {
    pub id: TimerId,
    pub task: TimerTask,

    /// When the timer was scheduled to fire; follow-up stages are
    /// scheduled relative to this, not to the host's wake-up time
    pub deadline: Instant,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    deadline: Instant,
    task: TimerTask,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    entries: BTreeMap<TimerId, Entry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline: Instant, task: TimerTask) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.entries.insert(id, Entry { deadline, task });
        id
    }

    /// Remove a timer; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Cancel the timer held in `slot`, leaving it empty
    pub fn cancel_slot(&mut self, slot: &mut Option<TimerId>) -> bool {
        match slot.take() {
            Some(id) => self.cancel(id),
            None => false,
        }
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.values().map(|entry| entry.deadline).min()
    }

    /// Take the earliest timer due at `now`, ties broken by scheduling order
    pub fn pop_due(&mut self, now: Instant) -> Option<DueTimer> {
        let (id, entry) = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.deadline <= now)
            .min_by_key(|(id, entry)| (entry.deadline, **id))
            .map(|(id, entry)| (*id, *entry))?;

        self.entries.remove(&id);
        Some(DueTimer {
            id,
            task: entry.task,
            deadline: entry.deadline,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every pending timer, returning how many were cancelled
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_pop_due_in_deadline_order() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();

        let late = timers.schedule(start + Duration::from_millis(200), TimerTask::ReleaseScroll);
        let early = timers.schedule(start + Duration::from_millis(100), TimerTask::PublishPreview);

        assert_eq!(timers.next_deadline(), Some(start + Duration::from_millis(100)));
        assert!(timers.pop_due(start).is_none());

        let now = start + Duration::from_millis(250);
        assert_eq!(timers.pop_due(now).map(|due| due.id), Some(early));
        assert_eq!(timers.pop_due(now).map(|due| due.id), Some(late));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        let mut slot = Some(timers.schedule(start, TimerTask::ReleaseScroll));

        assert!(timers.cancel_slot(&mut slot));
        assert!(slot.is_none());
        assert!(!timers.cancel_slot(&mut slot));
        assert!(timers.pop_due(start + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_ties_fire_in_scheduling_order() {
        let at = Instant::now();
        let mut timers = TimerQueue::new();
        let first = timers.schedule(at, TimerTask::PublishPreview);
        let second = timers.schedule(at, TimerTask::ReleaseScroll);

        assert_eq!(timers.pop_due(at).unwrap().id, first);
        assert_eq!(timers.pop_due(at).unwrap().id, second);
    }

    #[test]
    fn test_clear_counts_entries() {
        let at = Instant::now();
        let mut timers = TimerQueue::new();
        timers.schedule(at, TimerTask::PublishPreview);
        timers.schedule(at, TimerTask::ReleaseScroll);

        assert_eq!(timers.clear(), 2);
        assert_eq!(timers.len(), 0);
        assert_eq!(timers.next_deadline(), None);
    }
}
