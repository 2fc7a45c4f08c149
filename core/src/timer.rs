use alloc::vec::Vec;
use core::time::Duration;

/// Converts a configured number of seconds, treating negative or invalid values as zero.
pub fn seconds(secs: f32) -> Duration {
    Duration::try_from_secs_f32(secs).unwrap_or(Duration::ZERO)
}

/// Repeating timer driven by per-tick deltas.
///
/// Fires at most once per tick: an exhausted interval re-arms and fires, otherwise it only counts
/// down.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval {
    period: Duration,
    remaining: Duration,
}

impl Interval {
    /// First firing happens once a full period has elapsed.
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            remaining: period,
        }
    }

    /// First firing happens on the next tick.
    pub const fn due(period: Duration) -> Self {
        Self {
            period,
            remaining: Duration::ZERO,
        }
    }

    pub const fn period(&self) -> Duration {
        self.period
    }

    pub fn reset(&mut self) {
        self.remaining = self.period;
    }

    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.remaining.is_zero() {
            self.remaining = self.period;
            true
        } else {
            self.remaining = self.remaining.saturating_sub(delta);
            false
        }
    }
}

/// One-shot delayed events.
///
/// Each [`Scheduler::advance`] call releases the events whose delay has run out, in the order they
/// were scheduled. Handlers that schedule follow-ups from a released event will see them no sooner
/// than the next advance, which makes every chained sequence progress one step per tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Scheduler<E> {
    pending: Vec<(Duration, E)>,
}

impl<E> Scheduler<E> {
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, after: Duration, event: E) {
        self.pending.push((after, event));
    }

    pub fn advance(&mut self, delta: Duration) -> Vec<E> {
        let mut due = Vec::new();
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].0 <= delta {
                due.push(self.pending.remove(index).1);
            } else {
                self.pending[index].0 -= delta;
                index += 1;
            }
        }
        due
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}
