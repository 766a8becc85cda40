//! Owned string-storage buffers.
//!
//! A [`StringBuffer`] is the raw byte block that carries source text between
//! the stages of the loading pipeline: file reader, encoding converter,
//! source descriptor, and the reloadable string handle. Buffers are
//! move-only: a live buffer has exactly one owner at a time, and hand-off
//! across the reload seam is always a transfer, never a copy.
//!
//! Allocation is fallible: an exhausted allocator surfaces
//! [`AllocationFailure`](crate::SourceError::AllocationFailure) instead of
//! aborting the process.
//!
//! # Examples
//!
//! ```
//! use relsrc::buffer::StringBuffer;
//!
//! # fn main() -> relsrc::Result<()> {
//! let mut buffer = StringBuffer::allocate(4)?;
//! buffer.as_mut_vec().extend_from_slice(b"abcd");
//! assert_eq!(buffer.len(), 4);
//! assert_eq!(buffer.as_bytes(), b"abcd");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::ops::Deref;

use crate::{Result, SourceError};

/// An exclusively owned block of string storage.
///
/// `StringBuffer` does not implement `Clone`; payloads may be an entire
/// script file, and every transfer in the pipeline is a move.
#[derive(Default)]
pub struct StringBuffer {
    bytes: Vec<u8>,
}

impl StringBuffer {
    /// Creates an empty buffer. Does not allocate.
    pub fn empty() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Allocates a buffer with room for `capacity` bytes.
    ///
    /// The buffer starts out empty; fill it through [`as_mut_vec`](Self::as_mut_vec).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::AllocationFailure`] if the allocator cannot
    /// satisfy the request.
    pub fn allocate(capacity: usize) -> Result<Self> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(capacity)
            .map_err(|_| SourceError::allocation_failure(capacity))?;
        Ok(Self { bytes })
    }

    /// Wraps an already-filled byte vector without copying.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Number of bytes currently stored.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read-only view of the stored bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable access to the backing vector, for filling the buffer.
    pub fn as_mut_vec(&mut self) -> &mut Vec<u8> {
        &mut self.bytes
    }

    /// Consumes the buffer, returning the backing vector.
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}

impl Deref for StringBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for StringBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for StringBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringBuffer")
            .field("len", &self.bytes.len())
            .finish()
    }
}
