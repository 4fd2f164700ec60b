// Chunk: docs/chunks/marker_tracking - Markers that survive buffer edits

//! Markers: logical positions that automatically follow buffer edits.
//!
//! A marker is registered with a [`GapBuffer`](crate::GapBuffer) and is
//! adjusted in place by every insertion and deletion, so a position taken
//! before an edit elsewhere in the buffer stays semantically valid after
//! it. Callers hold a copyable [`MarkerId`] handle; the buffer owns the
//! marker storage in a generational arena, so a handle to a removed
//! marker is detected as stale rather than silently pointing at a
//! recycled slot.

/// Controls how a marker behaves when text is inserted exactly at its
/// position.
///
/// Two markers at the same position with different insertion types
/// diverge on an insertion exactly there: a `Before` marker stays at the
/// start of the inserted run while an `After` marker ends up past it.
/// This is what makes start-of-region and end-of-region markers track a
/// region that grows at one end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionType {
    /// Stay-behind: an insertion at the marker's position leaves it in place.
    Before,
    /// Advance: an insertion at the marker's position moves it past the
    /// inserted text.
    After,
}

/// A marker's observable state: its current position and insertion type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    /// Current logical byte position, always in `[0, buffer.len()]`.
    pub pos: usize,
    /// How the marker reacts to an insertion exactly at `pos`.
    pub insertion_type: InsertionType,
}

/// Opaque handle to a marker registered with a buffer.
///
/// Handles are `Copy` and stay valid until the marker is removed. A
/// handle to a removed marker is stale: lookups through it return `None`
/// even if the underlying slot has been reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId {
    index: u32,
    generation: u32,
}

/// One arena slot. The generation increments on every removal so stale
/// handles can be told apart from the slot's next occupant.
#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    marker: Option<Marker>,
}

/// The buffer-owned marker arena.
///
/// Slots are recycled through a free list, so long-lived buffers that
/// churn through markers don't grow the arena without bound.
#[derive(Debug, Clone, Default)]
pub(crate) struct MarkerTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl MarkerTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a marker and returns its handle.
    pub(crate) fn insert(&mut self, marker: Marker) -> MarkerId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.marker = Some(marker);
                MarkerId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    marker: Some(marker),
                });
                MarkerId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Removes the marker behind `id`. Returns false for stale handles.
    pub(crate) fn remove(&mut self, id: MarkerId) -> bool {
        match self.slots.get_mut(id.index as usize) {
            Some(slot) if slot.generation == id.generation && slot.marker.is_some() => {
                slot.marker = None;
                slot.generation += 1;
                self.free.push(id.index);
                true
            }
            _ => false,
        }
    }

    /// Looks up the marker behind `id`, or `None` for stale handles.
    pub(crate) fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.marker.as_ref())
    }

    /// Number of live markers.
    pub(crate) fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Iterates over live markers (used by the buffer's debug checks).
    #[cfg(debug_assertions)]
    pub(crate) fn iter_live(&self) -> impl Iterator<Item = &Marker> {
        self.slots.iter().filter_map(|slot| slot.marker.as_ref())
    }

    /// Adjusts every live marker for an insertion of `len` bytes at `pos`.
    ///
    /// Markers strictly after `pos` always advance. Markers exactly at
    /// `pos` advance only with [`InsertionType::After`]. Markers before
    /// `pos` are untouched.
    pub(crate) fn adjust_for_insert(&mut self, pos: usize, len: usize) {
        if len == 0 {
            return;
        }
        for slot in &mut self.slots {
            let Some(marker) = slot.marker.as_mut() else {
                continue;
            };
            if marker.pos > pos
                || (marker.pos == pos && marker.insertion_type == InsertionType::After)
            {
                marker.pos += len;
            }
        }
    }

    /// Adjusts every live marker for a deletion of `len` bytes at `pos`.
    ///
    /// Markers at or past the end of the deleted range shift back by
    /// `len`; markers inside the range collapse to its start; markers at
    /// or before `pos` are untouched.
    pub(crate) fn adjust_for_delete(&mut self, pos: usize, len: usize) {
        if len == 0 {
            return;
        }
        let end = pos + len;
        for slot in &mut self.slots {
            let Some(marker) = slot.marker.as_mut() else {
                continue;
            };
            if marker.pos >= end {
                marker.pos -= len;
            } else if marker.pos > pos {
                marker.pos = pos;
            }
        }
    }
}
