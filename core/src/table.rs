//! Latest position and base size of every item, readable by all items while
//! a frame is being stepped.
//!
//! Items are stepped one at a time on a single thread, so each slot has a
//! single writer and reads inside a frame may see a mix of this-frame and
//! last-frame values. A multi-threaded port must either lock the table or
//! double-buffer it (read the previous frame, write the next one) to keep
//! that stale-read behavior well defined.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SharedSlot {
    pub pos: Option<(f64, f64)>,
    pub base_size: f64,
}

#[derive(Clone, Debug, Default)]
pub struct SharedPositionTable {
    slots: Vec<Option<SharedSlot>>,
}

impl SharedPositionTable {
    pub fn with_sizes(sizes: impl IntoIterator<Item = f64>) -> Self {
        Self {
            slots: sizes
                .into_iter()
                .map(|base_size| {
                    Some(SharedSlot {
                        pos: None,
                        base_size,
                    })
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SharedSlot> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    /// Placed, live slots other than `skip`.
    pub fn neighbors(&self, skip: usize) -> impl Iterator<Item = (usize, (f64, f64), f64)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != skip)
            .filter_map(|(index, slot)| {
                let slot = slot.as_ref()?;
                let pos = slot.pos?;
                if !pos.0.is_finite() || !pos.1.is_finite() {
                    return None;
                }
                Some((index, pos, slot.base_size))
            })
    }

    pub fn set_pos(&mut self, index: usize, pos: (f64, f64)) {
        if let Some(Some(slot)) = self.slots.get_mut(index) {
            slot.pos = Some(pos);
        }
    }

    pub fn clear(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}
