use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("repeating timer interval must be non-zero")]
    ZeroInterval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Repeating(Duration),
    Once,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired<K> {
    pub key: K,
    pub kind: TimerKind,
    pub deadline: Instant,
}

#[derive(Debug, Clone)]
struct TimerEntry<K> {
    key: K,
    kind: TimerKind,
    deadline: Instant,
}

/// Deadline-ordered set of repeating and one-shot timers.
///
/// The queue never sleeps on its own; the owning event loop asks for
/// `next_deadline`, waits until then, and calls `poll` to collect whatever
/// became due.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    entries: Vec<TimerEntry<K>>,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq> TimerQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn every(&mut self, key: K, interval: Duration, now: Instant) -> Result<(), SchedulerError> {
        if interval.is_zero() {
            return Err(SchedulerError::ZeroInterval);
        }
        self.insert(TimerEntry {
            key,
            kind: TimerKind::Repeating(interval),
            deadline: now + interval,
        });
        Ok(())
    }

    pub fn once(&mut self, key: K, delay: Duration, now: Instant) {
        self.insert(TimerEntry {
            key,
            kind: TimerKind::Once,
            deadline: now + delay,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.deadline).min()
    }

    /// Collects every timer due at `now`, earliest deadline first.
    ///
    /// A repeating timer that missed several periods fires once and is
    /// re-armed on its original cadence at the first slot after `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<Fired<K>> {
        let mut fired = Vec::new();
        let mut index = 0;
        while index < self.entries.len() {
            let entry = &mut self.entries[index];
            if entry.deadline > now {
                index += 1;
                continue;
            }
            fired.push(Fired {
                key: entry.key,
                kind: entry.kind,
                deadline: entry.deadline,
            });
            let kind = entry.kind;
            match kind {
                TimerKind::Repeating(interval) => {
                    while entry.deadline <= now {
                        entry.deadline += interval;
                    }
                    index += 1;
                }
                TimerKind::Once => {
                    self.entries.remove(index);
                }
            }
        }
        fired.sort_by_key(|event| event.deadline);
        fired
    }

    fn insert(&mut self, entry: TimerEntry<K>) {
        self.entries.retain(|existing| existing.key != entry.key);
        self.entries.push(entry);
    }
}
