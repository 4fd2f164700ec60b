// Chunk: docs/chunks/gap_buffer - Byte-addressed gap buffer with marker adjustment

//! Gap buffer: the byte container at the heart of the editor core.
//!
//! A gap buffer is a contiguous byte array with an interior unused region
//! (the "gap"). Edits at a position cost only the work of moving the gap
//! there, which amortizes to O(1) for the localized bursts of editing an
//! interactive session produces.
//!
//! Positions are 0-based byte offsets into the *logical* text, as if the
//! gap did not exist. The physical layout is:
//!
//! ```text
//! data: [--- text before gap ---][=== gap ===][--- text after gap ---]
//!        ^                        ^            ^                      ^
//!        0                    gap_start     gap_end             capacity
//! ```
//!
//! The buffer also owns the set of registered markers (see [`MarkerId`]):
//! every insertion and deletion adjusts marker positions in the same
//! operation, so no intermediate state is ever observable.

use tracing::{debug, trace};

use crate::marker::{InsertionType, Marker, MarkerId, MarkerTable};

/// Capacity floor. A buffer created with a smaller (even zero) requested
/// capacity still starts with this much storage, so the first insert
/// never has to grow.
const MIN_CAPACITY: usize = 1024;

/// A byte-addressed gap buffer with registered markers.
///
/// Invariants, restored after every public operation:
/// - `gap_start <= gap_end <= capacity`
/// - every live marker position lies in `[0, len()]`
/// - bytes inside the gap never escape through a logical accessor
/// - capacity never shrinks
#[derive(Debug)]
pub struct GapBuffer {
    /// Backing storage. Gap bytes are unspecified garbage.
    data: Vec<u8>,
    /// First byte of the gap.
    gap_start: usize,
    /// One past the last byte of the gap.
    gap_end: usize,
    /// Markers registered with this buffer.
    markers: MarkerTable,
    /// Mutation counter for sampling debug invariant checks (debug builds only).
    #[cfg(debug_assertions)]
    debug_mutation_count: u64,
}

impl GapBuffer {
    /// Creates an empty buffer with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(MIN_CAPACITY)
    }

    /// Creates an empty buffer with at least `capacity` bytes of storage.
    ///
    /// The requested capacity is clamped up to the floor of 1024, so even
    /// `with_capacity(0)` permits an immediate insert without growing.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            data: vec![0; capacity],
            gap_start: 0,
            gap_end: capacity,
            markers: MarkerTable::new(),
            #[cfg(debug_assertions)]
            debug_mutation_count: 0,
        }
    }

    /// Creates a buffer initialized with `content`, gap at the end.
    pub fn from_bytes(content: &[u8]) -> Self {
        let capacity = content.len() + MIN_CAPACITY;
        let mut data = vec![0; capacity];
        data[..content.len()].copy_from_slice(content);
        Self {
            data,
            gap_start: content.len(),
            gap_end: capacity,
            markers: MarkerTable::new(),
            #[cfg(debug_assertions)]
            debug_mutation_count: 0,
        }
    }

    // ==================== Accessors ====================

    /// Logical length in bytes (excluding the gap).
    pub fn len(&self) -> usize {
        self.data.len() - self.gap_len()
    }

    /// Returns true if the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current storage capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Maps a logical position to its physical index in `data`.
    fn physical(&self, pos: usize) -> usize {
        if pos < self.gap_start {
            pos
        } else {
            pos + self.gap_len()
        }
    }

    /// Returns the byte at logical position `pos`, or `None` past the end.
    pub fn byte_at(&self, pos: usize) -> Option<u8> {
        if pos >= self.len() {
            return None;
        }
        Some(self.data[self.physical(pos)])
    }

    /// Copies `out.len()` logical bytes starting at `pos` into `out`,
    /// crossing the gap transparently.
    ///
    /// # Panics
    ///
    /// Panics if `pos + out.len()` exceeds the buffer length.
    pub fn copy_into(&self, pos: usize, out: &mut [u8]) {
        let n = out.len();
        assert!(
            pos + n <= self.len(),
            "copy_into range {}..{} out of bounds (len {})",
            pos,
            pos + n,
            self.len()
        );
        if pos + n <= self.gap_start {
            // Entirely before the gap.
            out.copy_from_slice(&self.data[pos..pos + n]);
        } else if pos >= self.gap_start {
            // Entirely after the gap.
            let start = pos + self.gap_len();
            out.copy_from_slice(&self.data[start..start + n]);
        } else {
            // Spans the gap.
            let head = self.gap_start - pos;
            out[..head].copy_from_slice(&self.data[pos..self.gap_start]);
            out[head..].copy_from_slice(&self.data[self.gap_end..self.gap_end + (n - head)]);
        }
    }

    /// Returns an owned copy of the logical range starting at `pos`.
    ///
    /// The range is clamped to the buffer, so over-long requests return
    /// what exists rather than panicking.
    pub fn slice(&self, pos: usize, len: usize) -> Vec<u8> {
        let total = self.len();
        let start = pos.min(total);
        let n = len.min(total - start);
        let mut out = vec![0; n];
        self.copy_into(start, &mut out);
        out
    }

    /// Returns a freshly allocated contiguous copy of the logical content.
    pub fn contents(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.data[..self.gap_start]);
        out.extend_from_slice(&self.data[self.gap_end..]);
        out
    }

    // ==================== Editing ====================

    /// Inserts `text` at logical position `pos` and adjusts markers.
    ///
    /// `pos` is clamped to `[0, len()]`; inserting an empty slice is a
    /// no-op that leaves markers untouched.
    pub fn insert(&mut self, pos: usize, text: &[u8]) {
        if text.is_empty() {
            return;
        }
        let pos = pos.min(self.len());
        self.move_gap(pos);
        self.ensure_gap(text.len());
        self.data[self.gap_start..self.gap_start + text.len()].copy_from_slice(text);
        self.gap_start += text.len();
        self.markers.adjust_for_insert(pos, text.len());
        trace!(pos, len = text.len(), "insert");
        self.check_invariants();
    }

    /// Deletes `len` bytes starting at `pos` and adjusts markers.
    ///
    /// The range is clamped to the end of the buffer; deleting nothing
    /// (empty range or `pos` past the end) is a no-op that leaves markers
    /// untouched.
    pub fn delete(&mut self, pos: usize, len: usize) {
        let total = self.len();
        if pos >= total {
            return;
        }
        let len = len.min(total - pos);
        if len == 0 {
            return;
        }
        self.move_gap(pos);
        self.gap_end += len;
        self.markers.adjust_for_delete(pos, len);
        trace!(pos, len, "delete");
        self.check_invariants();
    }

    /// Moves the gap so it starts at logical position `pos`.
    ///
    /// O(distance) in the number of bytes between the current gap and the
    /// target. Uses `copy_within` (memmove semantics) so overlapping
    /// shifts cannot corrupt the text.
    fn move_gap(&mut self, pos: usize) {
        debug_assert!(pos <= self.len());
        if pos < self.gap_start {
            // Shift [pos, gap_start) rightward so it ends at gap_end.
            let shift = self.gap_start - pos;
            self.data.copy_within(pos..self.gap_start, self.gap_end - shift);
            self.gap_start = pos;
            self.gap_end -= shift;
        } else if pos > self.gap_start {
            // Shift [gap_end, gap_end + shift) leftward onto gap_start.
            let shift = pos - self.gap_start;
            self.data
                .copy_within(self.gap_end..self.gap_end + shift, self.gap_start);
            self.gap_start += shift;
            self.gap_end += shift;
        }
    }

    /// Grows storage until the gap holds at least `need` bytes.
    ///
    /// Growth is geometric: the new capacity is the larger of twice the
    /// old capacity and `len + need + MIN_CAPACITY`. The gap stays where
    /// `move_gap` put it; only the post-gap tail relocates.
    fn ensure_gap(&mut self, need: usize) {
        if self.gap_len() >= need {
            return;
        }
        let old_capacity = self.data.len();
        let new_capacity = (old_capacity * 2).max(self.len() + need + MIN_CAPACITY);
        let post_gap_len = old_capacity - self.gap_end;

        self.data.resize(new_capacity, 0);
        if post_gap_len > 0 {
            let new_gap_end = new_capacity - post_gap_len;
            self.data.copy_within(self.gap_end..old_capacity, new_gap_end);
            self.gap_end = new_gap_end;
        } else {
            self.gap_end = new_capacity;
        }
        debug!(old_capacity, new_capacity, "grew gap buffer storage");
    }

    // ==================== Markers ====================

    /// Registers a marker at `pos` (clamped to `[0, len()]`) and returns
    /// its handle.
    pub fn create_marker(&mut self, pos: usize, insertion_type: InsertionType) -> MarkerId {
        let pos = pos.min(self.len());
        self.markers.insert(Marker {
            pos,
            insertion_type,
        })
    }

    /// Returns the marker's current state, or `None` for a stale handle.
    pub fn marker(&self, id: MarkerId) -> Option<Marker> {
        self.markers.get(id).copied()
    }

    /// Returns the marker's current position, or `None` for a stale handle.
    pub fn marker_position(&self, id: MarkerId) -> Option<usize> {
        self.markers.get(id).map(|m| m.pos)
    }

    /// Deregisters a marker. Returns false if the handle was already stale.
    pub fn remove_marker(&mut self, id: MarkerId) -> bool {
        self.markers.remove(id)
    }

    /// Number of live markers registered with this buffer.
    pub fn marker_count(&self) -> usize {
        self.markers.live_count()
    }

    // ==================== Validation ====================

    /// Debug assertion: verifies the gap offsets and every marker bound.
    ///
    /// Sampled by a mutation counter (every 64th mutation) so the O(markers)
    /// sweep doesn't tank tight edit loops. Compiled out of release builds.
    #[cfg(debug_assertions)]
    fn check_invariants(&mut self) {
        self.debug_mutation_count += 1;
        if self.debug_mutation_count % 64 != 0 {
            return;
        }
        assert!(
            self.gap_start <= self.gap_end && self.gap_end <= self.data.len(),
            "gap invariant violated: gap_start {} gap_end {} capacity {}",
            self.gap_start,
            self.gap_end,
            self.data.len()
        );
        let len = self.len();
        for marker in self.markers.iter_live() {
            assert!(
                marker.pos <= len,
                "marker out of bounds: pos {} buffer len {}",
                marker.pos,
                len
            );
        }
    }

    #[cfg(not(debug_assertions))]
    fn check_invariants(&mut self) {}
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new()
    }
}
