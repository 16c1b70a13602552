// Circular item ordering of the carousel list.
// Mirrors the DOM list: every move here is emitted as the matching list op.

use std::collections::VecDeque;

use crate::effects::{DomOp, Effects};
use crate::types::{Direction, ItemId, ItemSpec};

/// Position of the displayed item in the list.
pub const CENTER_SLOT: usize = 1;

/// The carousel items in current DOM order.
#[derive(Debug, Clone)]
pub struct CarouselRing {
    items: VecDeque<ItemSpec>,
}

impl CarouselRing {
    pub fn new(items: Vec<ItemSpec>) -> Self {
        CarouselRing {
            items: items.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter().map(|item| &item.id)
    }

    /// Item in the center slot, if the list is long enough to have one.
    pub fn center(&self) -> Option<&ItemSpec> {
        self.items.get(CENTER_SLOT)
    }

    pub fn center_id(&self) -> Option<&ItemId> {
        self.center().map(|item| &item.id)
    }

    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// Move one step and emit the list op. No-op on an empty ring.
    pub fn step(&mut self, direction: Direction, effects: &mut Effects) {
        match direction {
            Direction::Next => {
                if let Some(head) = self.items.pop_front() {
                    self.items.push_back(head);
                    effects.push(DomOp::MoveHeadToTail);
                }
            }
            Direction::Prev => {
                if let Some(tail) = self.items.pop_back() {
                    self.items.push_front(tail);
                    effects.push(DomOp::MoveTailToHead);
                }
            }
        }
    }

    /// Steps needed to bring `id` into the center slot, in the shorter direction.
    pub fn route_to(&self, id: &ItemId) -> Option<(Direction, usize)> {
        let len = self.items.len();
        let index = self.position(id)?;
        let forward = (index + len - CENTER_SLOT % len) % len;
        let backward = (len - forward) % len;
        if forward <= backward {
            Some((Direction::Next, forward))
        } else {
            Some((Direction::Prev, backward))
        }
    }

    /// Rotate until `id` is centered. Returns false if `id` is not in the ring.
    pub fn navigate_to(&mut self, id: &ItemId, effects: &mut Effects) -> bool {
        let Some((direction, steps)) = self.route_to(id) else {
            return false;
        };
        for _ in 0..steps {
            self.step(direction, effects);
        }
        true
    }
}
