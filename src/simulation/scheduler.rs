//! Deterministic timer queue driving every panel.
//!
//! Time only moves when the owner calls [`Scheduler::pop_due`] with a target
//! instant, so a run is fully reproducible. Timers fire in due-time order;
//! timers due at the same instant fire in the order they were (re)armed.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::Panel;

/// Handle returned when a timer is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer does when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerKind {
    OverviewRefresh,
    AlertSpawn,
    AlertSweep,
    OverrideComplete { override_id: String },
}

/// A timer that reached its due time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub owner: Panel,
    pub kind: TimerKind,
    /// Simulated milliseconds at which it fired
    pub at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    due_ms: u64,
    seq: u64,
    id: TimerId,
    owner: Panel,
    kind: TimerKind,
    period_ms: Option<u64>,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.due_ms, self.seq).cmp(&(other.due_ms, other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Entry>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated milliseconds since the scheduler was created.
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Arm a timer that fires every `period_ms`, first at `now + period_ms`.
    pub fn every(&mut self, owner: Panel, kind: TimerKind, period_ms: u64) -> TimerId {
        let period_ms = period_ms.max(1);
        self.arm(owner, kind, period_ms, Some(period_ms))
    }

    /// Arm a timer that fires once at `now + delay_ms`.
    pub fn once(&mut self, owner: Panel, kind: TimerKind, delay_ms: u64) -> TimerId {
        self.arm(owner, kind, delay_ms, None)
    }

    fn arm(&mut self, owner: Panel, kind: TimerKind, delay_ms: u64, period_ms: Option<u64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.push(Entry {
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq: 0,
            id,
            owner,
            kind,
            period_ms,
        });
        id
    }

    fn push(&mut self, mut entry: Entry) {
        entry.seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(entry));
    }

    /// Drop every timer owned by `owner`. Returns how many were cancelled.
    pub fn cancel_owner(&mut self, owner: Panel) -> usize {
        let before = self.queue.len();
        self.queue.retain(|Reverse(e)| e.owner != owner);
        before - self.queue.len()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn pending_for(&self, owner: Panel) -> usize {
        self.queue.iter().filter(|Reverse(e)| e.owner == owner).count()
    }

    /// Pop the earliest timer due at or before `until_ms`, moving the clock to
    /// its due time and re-arming it if it repeats. When nothing is due the
    /// clock moves to `until_ms` and `None` is returned.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired> {
        let due = matches!(self.queue.peek(), Some(Reverse(e)) if e.due_ms <= until_ms);
        if !due {
            self.now_ms = self.now_ms.max(until_ms);
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        self.now_ms = self.now_ms.max(entry.due_ms);

        let fired = Fired {
            id: entry.id,
            owner: entry.owner,
            kind: entry.kind.clone(),
            at_ms: entry.due_ms,
        };
        if let Some(period) = entry.period_ms {
            self.push(Entry {
                due_ms: entry.due_ms.saturating_add(period),
                ..entry
            });
        }
        Some(fired)
    }
}
