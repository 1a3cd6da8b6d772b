//! Deferred state transitions on the logical game clock.
//!
//! The crate owns no threads and no OS timers. Flip-back and collection
//! sequencing are entries with a game-time deadline, drained in deadline
//! order as the embedding advances the clock. The game owns every entry,
//! so starting a new game cancels the lot in one call - nothing can fire
//! against a discarded game.

use std::time::Duration;

use crate::core::CardId;

/// A delayed state transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Task {
    /// Flip two mismatched cards face-down and empty the selection buffer.
    FlipBack { a: CardId, b: CardId },

    /// Start the collection animation for a matched pair.
    BeginCollection { a: CardId, b: CardId, seq: u64 },

    /// Finish collection: record the pair, mark both cards collected.
    FinishCollection { a: CardId, b: CardId, seq: u64 },
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    due_at: Duration,
    /// Insertion order, breaks deadline ties deterministically.
    order: u64,
    task: Task,
}

/// Pending timed transitions, owned by one game instance.
#[derive(Debug, Default)]
pub(crate) struct Scheduler {
    entries: Vec<Entry>,
    next_order: u64,
}

impl Scheduler {
    /// Schedule `task` to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Duration, delay: Duration, task: Task) {
        let order = self.next_order;
        self.next_order += 1;
        self.entries.push(Entry {
            due_at: now + delay,
            order,
            task,
        });
    }

    /// Discard every outstanding entry.
    ///
    /// Called on reset: a new game must never see a stale transition.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Number of outstanding entries.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Remove and return the next entry due at or before `now`, with its
    /// deadline.
    ///
    /// Entries come out in (deadline, insertion) order, and follow-up
    /// tasks are chained from the returned deadline, so a drain loop
    /// replays transitions exactly as wall-clock timers would have fired
    /// even when `now` jumps far past several deadlines at once.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Task, Duration)> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_at <= now)
            .min_by_key(|(_, e)| (e.due_at, e.order))
            .map(|(i, _)| i)?;
        let entry = self.entries.swap_remove(index);
        Some((entry.task, entry.due_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flip_back(a: u32, b: u32) -> Task {
        Task::FlipBack {
            a: CardId::new(a),
            b: CardId::new(b),
        }
    }

    #[test]
    fn test_nothing_due_before_deadline() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(Duration::ZERO, Duration::from_millis(100), flip_back(0, 1));

        assert_eq!(scheduler.pop_due(Duration::from_millis(99)), None);
        assert_eq!(
            scheduler.pop_due(Duration::from_millis(100)),
            Some((flip_back(0, 1), Duration::from_millis(100)))
        );
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_deadline_order() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(Duration::ZERO, Duration::from_millis(200), flip_back(2, 3));
        scheduler.schedule(Duration::ZERO, Duration::from_millis(100), flip_back(0, 1));

        let now = Duration::from_millis(500);
        assert_eq!(
            scheduler.pop_due(now),
            Some((flip_back(0, 1), Duration::from_millis(100)))
        );
        assert_eq!(
            scheduler.pop_due(now),
            Some((flip_back(2, 3), Duration::from_millis(200)))
        );
        assert_eq!(scheduler.pop_due(now), None);
    }

    #[test]
    fn test_equal_deadlines_fire_in_insertion_order() {
        let mut scheduler = Scheduler::default();
        let delay = Duration::from_millis(100);
        scheduler.schedule(Duration::ZERO, delay, flip_back(0, 1));
        scheduler.schedule(Duration::ZERO, delay, flip_back(2, 3));

        assert_eq!(scheduler.pop_due(delay).unwrap().0, flip_back(0, 1));
        assert_eq!(scheduler.pop_due(delay).unwrap().0, flip_back(2, 3));
    }

    #[test]
    fn test_cancel_all_discards_everything() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(Duration::ZERO, Duration::from_millis(1), flip_back(0, 1));
        scheduler.schedule(Duration::ZERO, Duration::from_millis(2), flip_back(2, 3));
        assert_eq!(scheduler.pending(), 2);

        scheduler.cancel_all();
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.pop_due(Duration::from_secs(60)), None);
    }
}
