// Carousel rotation guarded by a transition lock.
// The lock covers the CSS transition; the controller owns the release timer.

use crate::effects::{Effects, ElementRole};
use crate::ring::CarouselRing;
use crate::types::Direction;

/// Held for the duration of one rotation's visual transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransitionLock(bool);

impl TransitionLock {
    /// Acquire the lock. Returns false if it is already held.
    pub fn try_acquire(&mut self) -> bool {
        if self.0 {
            return false;
        }
        self.0 = true;
        true
    }

    pub fn release(&mut self) {
        self.0 = false;
    }

    pub fn is_held(&self) -> bool {
        self.0
    }
}

/// Drives animated single-step rotations of the ring.
#[derive(Debug, Default)]
pub struct Rotator {
    lock: TransitionLock,
}

impl Rotator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_held()
    }

    /// Start a rotation. Returns false without touching anything when a
    /// rotation is already in flight or there is no list to rotate; the
    /// caller schedules [`Rotator::finish`] only on true.
    pub fn begin(
        &mut self,
        direction: Direction,
        ring: &mut CarouselRing,
        effects: &mut Effects,
    ) -> bool {
        if !effects.has(ElementRole::List) || ring.is_empty() {
            return false;
        }
        if !self.lock.try_acquire() {
            log::trace!("rotation {:?} ignored: transition in flight", direction);
            return false;
        }

        set_controls_enabled(effects, false);
        effects.remove_class(ElementRole::Carousel, "next");
        effects.remove_class(ElementRole::Carousel, "prev");
        ring.step(direction, effects);
        effects.add_class(ElementRole::Carousel, direction.class());
        true
    }

    /// Release the lock once the transition has had time to finish.
    pub fn finish(&mut self, effects: &mut Effects) {
        self.lock.release();
        set_controls_enabled(effects, true);
    }
}

fn set_controls_enabled(effects: &mut Effects, enabled: bool) {
    let value = if enabled { "auto" } else { "none" };
    effects.set_style(ElementRole::NextButton, "pointer-events", value);
    effects.set_style(ElementRole::PrevButton, "pointer-events", value);
}
