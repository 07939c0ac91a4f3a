use std::cmp::Ordering;
use std::fmt;

use bytes::Bytes;

/// The unit of work travelling through the pipeline.
///
/// `position` is fixed at read time and identifies the block's place in the
/// original uncompressed stream. The payload is owned by whichever stage holds
/// the block and is swapped once per stage transition (raw -> compressed, or
/// compressed -> raw).
///
/// Blocks compare by `position` only.
#[derive(Clone)]
pub struct Block {
    position: u32,
    payload: Bytes,
}

impl Block {
    pub fn new(position: u32, payload: impl Into<Bytes>) -> Self {
        Self { position, payload: payload.into() }
    }

    #[inline]
    pub fn position(&self) -> u32 {
        self.position
    }

    #[inline]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Swap in the output of a stage transition.
    pub fn replace_payload(&mut self, payload: impl Into<Bytes>) {
        self.payload = payload.into();
    }

    pub fn into_payload(self) -> Bytes {
        self.payload
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("position", &self.position)
            .field("len", &self.payload.len())
            .finish()
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl Eq for Block {}

impl PartialOrd for Block {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Block {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position.cmp(&other.position)
    }
}
