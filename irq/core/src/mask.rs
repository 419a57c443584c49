//! Pending/enabled bitmask decoding

use crate::EventId;

/// Decode a status snapshot against an enabled mask
///
/// Yields the bit positions set in both `pending` and `enabled`, in
/// ascending order. Masked sources never fire: `enabled == 0` produces
/// an empty sequence regardless of `pending`.
///
/// The returned iterator owns its snapshot, so it can be re-created on
/// every dispatch cycle without touching the originals.
pub const fn decode(pending: u32, enabled: u32) -> PendingEvents {
    PendingEvents {
        word: pending & enabled,
    }
}

/// Iterator over the ready event bits of one status snapshot
///
/// At most 32 elements; never scans past the highest set bit.
#[derive(Debug, Clone)]
pub struct PendingEvents {
    word: u32,
}

impl Iterator for PendingEvents {
    type Item = EventId;

    fn next(&mut self) -> Option<EventId> {
        if self.word == 0 {
            return None;
        }
        let bit = self.word.trailing_zeros() as u8;
        // Clear the lowest set bit
        self.word &= self.word - 1;
        Some(EventId::new_unchecked(bit))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.word.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for PendingEvents {}
