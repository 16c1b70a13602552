// Timer and animation-frame bookkeeping with explicit cancellation handles.
// The engines never call setTimeout/requestAnimationFrame themselves: the
// plumbing ticks them with the current time and they fire what is due.

use crate::types::Timestamp;

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<T> {
    id: TimerId,
    due: Timestamp,
    timer: T,
}

/// One-shot timers keyed by a caller-defined payload.
#[derive(Debug)]
pub struct Scheduler<T> {
    pending: Vec<Pending<T>>,
    next_id: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Scheduler {
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `timer` to fire `delay_ms` after `now`.
    pub fn schedule(&mut self, now: Timestamp, delay_ms: u64, timer: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: now.after_millis(delay_ms),
            timer,
        });
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Cancel the timer behind `slot` (if any) and store the new one in its place.
    pub fn reschedule(
        &mut self,
        slot: &mut Option<TimerId>,
        now: Timestamp,
        delay_ms: u64,
        timer: T,
    ) {
        if let Some(previous) = slot.take() {
            self.cancel(previous);
        }
        *slot = Some(self.schedule(now, delay_ms, timer));
    }

    /// Remove and return the earliest timer due at `now`, if any.
    /// Ties fire in scheduling order.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<(TimerId, T)> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= now)
            .min_by_key(|(_, p)| (p.due, p.id.0))
            .map(|(i, _)| i)?;
        let pending = self.pending.remove(index);
        Some((pending.id, pending.timer))
    }

    pub fn next_due(&self) -> Option<Timestamp> {
        self.pending.iter().map(|p| p.due).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A self-rescheduling per-frame loop. At most one frame is pending at a time:
/// requesting again replaces the pending frame instead of adding a second one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameLoop {
    #[default]
    Idle,
    Pending,
}

impl FrameLoop {
    /// Request the next frame. Returns true if a pending frame was replaced.
    pub fn request(&mut self) -> bool {
        let replaced = self.is_pending();
        *self = FrameLoop::Pending;
        replaced
    }

    pub fn cancel(&mut self) {
        *self = FrameLoop::Idle;
    }

    /// Consume the pending frame for this tick.
    pub fn take(&mut self) -> bool {
        let pending = self.is_pending();
        *self = FrameLoop::Idle;
        pending
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FrameLoop::Pending)
    }
}
