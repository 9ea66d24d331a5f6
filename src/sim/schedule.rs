//! Delayed simulation events
//!
//! Timed continuations (attack-lock release, popup expiry, the pause after a
//! boss kill) are queued against the tick clock and drained at the start of
//! each tick. Every entry is stamped with the session epoch; bumping the
//! epoch on teardown turns anything still queued into a no-op.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// What to do when an entry comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScheduledEvent {
    /// End the player's attack lock
    ReleaseAttack,
    /// Remove a score popup
    ExpirePopup { popup_id: u32 },
    /// Resolve the transition after a boss kill
    FinishBossDefeat,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    due_tick: u64,
    /// Insertion order breaks ties between entries due on the same tick
    seq: u64,
    epoch: u32,
    event: ScheduledEvent,
}

/// Min-heap of pending events keyed by due tick
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<Entry>>,
    epoch: u32,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current epoch; entries from older epochs are discarded when drained
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Queue `event` to fire at `due_tick`
    pub fn schedule(&mut self, due_tick: u64, event: ScheduledEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry {
            due_tick,
            seq,
            epoch: self.epoch,
            event,
        }));
    }

    /// Drop everything pending and invalidate any entry that slips through
    pub fn cancel_all(&mut self) {
        self.queue.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Pop every live entry due at or before `now`, in due order
    pub fn drain_due(&mut self, now: u64) -> Vec<ScheduledEvent> {
        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.queue.peek() {
            if entry.due_tick > now {
                break;
            }
            let Some(Reverse(entry)) = self.queue.pop() else {
                break;
            };
            if entry.epoch == self.epoch {
                due.push(entry.event);
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_pending(&self, event: ScheduledEvent) -> bool {
        self.queue
            .iter()
            .any(|Reverse(e)| e.event == event && e.epoch == self.epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drains_in_due_order() {
        let mut sched = Scheduler::new();
        sched.schedule(10, ScheduledEvent::FinishBossDefeat);
        sched.schedule(5, ScheduledEvent::ExpirePopup { popup_id: 3 });
        sched.schedule(5, ScheduledEvent::ReleaseAttack);

        assert!(sched.drain_due(4).is_empty());
        assert_eq!(
            sched.drain_due(5),
            vec![
                ScheduledEvent::ExpirePopup { popup_id: 3 },
                ScheduledEvent::ReleaseAttack
            ]
        );
        assert_eq!(sched.len(), 1);
        assert_eq!(sched.drain_due(100), vec![ScheduledEvent::FinishBossDefeat]);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_cancel_all_discards_pending() {
        let mut sched = Scheduler::new();
        sched.schedule(3, ScheduledEvent::ReleaseAttack);
        let epoch = sched.epoch();
        sched.cancel_all();
        assert_ne!(sched.epoch(), epoch);
        assert!(sched.drain_due(10).is_empty());
        assert!(!sched.is_pending(ScheduledEvent::ReleaseAttack));
    }
}
