//! The reloadable string handle and its backing seam.
//!
//! A [`ReloadableString`] is an engine-visible string whose backing bytes
//! can be evicted under memory pressure and re-fetched later without the
//! string changing identity: the logical length in code units and the
//! character width reported by the handle are fixed at construction and
//! never vary across evict/materialize cycles. Only residency of the bytes
//! changes.
//!
//! The [`SourceBacking`] trait is the seam the embedding implements to
//! supply and release payload bytes. It replaces the raw load/unload
//! function-pointer pair of C embeddings with a capability object while
//! keeping the same contract: buffers obtained from `load` are returned
//! through exactly one `unload`, and the two strictly alternate for any
//! given handle.
//!
//! # Examples
//!
//! ```no_run
//! use relsrc::encoding::TextEncoding;
//! use relsrc::loader::create_reloadable_source_from_file;
//!
//! # fn main() -> relsrc::Result<()> {
//! let mut source = create_reloadable_source_from_file("app.js", TextEncoding::Unknown)?;
//! let length = source.length();
//!
//! // Drop the payload bytes, keep the handle.
//! source.evict();
//! assert!(!source.is_materialized());
//!
//! // Re-fetch on demand; length and width are unchanged.
//! source.materialize()?;
//! assert_eq!(source.length(), length);
//! # Ok(())
//! # }
//! ```

use crate::buffer::StringBuffer;
use crate::encoding::{TextEncoding, decode_payload_to_string};
use crate::source::ReloadableSourceDescriptor;
use crate::{Result, SourceError};

/// Maximum logical string length the engine accepts, in code units.
pub const MAX_STRING_LENGTH: usize = if usize::BITS == 32 {
    (1 << 28) - 16
} else {
    (1 << 29) - 24
};

/// Supplies and releases the backing bytes of a reloadable string.
///
/// Contract: every buffer returned by [`load`](Self::load) is released by
/// exactly one [`unload`](Self::unload) call, and for a given handle the
/// two strictly alternate. Implementations are driven from the single
/// thread that owns the handle; they do not need to be reentrant.
pub trait SourceBacking {
    /// Produces the full payload, exactly
    /// [`preloaded_data_length`](ReloadableSourceDescriptor::preloaded_data_length)
    /// bytes of it.
    fn load(&mut self) -> Result<StringBuffer>;

    /// Releases a buffer previously returned by [`load`](Self::load).
    fn unload(&mut self, buffer: StringBuffer);
}

/// An engine-visible string with evictable backing bytes.
///
/// Created from a descriptor and a backing via [`ReloadableString::new`];
/// fresh handles start materialized, holding the payload obtained through
/// the backing's first `load`. Dropping a materialized handle performs the
/// final `unload`.
pub struct ReloadableString<B: SourceBacking> {
    descriptor: ReloadableSourceDescriptor,
    backing: B,
    resident: Option<StringBuffer>,
}

impl<B: SourceBacking> ReloadableString<B> {
    /// Builds a reloadable string from a descriptor and a backing.
    ///
    /// Zero-length sources become trivially materialized empty handles and
    /// never invoke the backing. All other handles perform their first
    /// materialization here, through `backing.load()`.
    ///
    /// # Errors
    ///
    /// - [`SourceError::InvalidParameter`] if the logical length exceeds
    ///   [`MAX_STRING_LENGTH`]
    /// - [`SourceError::LengthMismatch`] if the first `load` produces a
    ///   buffer of the wrong length
    pub fn new(descriptor: ReloadableSourceDescriptor, mut backing: B) -> Result<Self> {
        if descriptor.string_length() > MAX_STRING_LENGTH {
            return Err(SourceError::invalid_parameter(format!(
                "Source length {} exceeds the maximum of {} code units",
                descriptor.string_length(),
                MAX_STRING_LENGTH
            )));
        }
        let resident = if descriptor.preloaded_data_length() == 0 {
            StringBuffer::empty()
        } else {
            Self::load_checked(&descriptor, &mut backing)?
        };
        Ok(Self {
            descriptor,
            backing,
            resident: Some(resident),
        })
    }

    /// Logical string length in code units. Constant for the handle's life.
    pub fn length(&self) -> usize {
        self.descriptor.string_length()
    }

    /// Character width: `true` for one byte per code unit. Constant for the
    /// handle's life.
    pub fn is_one_byte(&self) -> bool {
        self.descriptor.is_one_byte_string()
    }

    /// The resolved payload encoding.
    pub fn encoding(&self) -> TextEncoding {
        self.descriptor.encoding()
    }

    /// The source path this string was loaded from.
    pub fn path(&self) -> &std::path::Path {
        self.descriptor.path()
    }

    /// Returns `true` while the backing bytes are resident.
    pub fn is_materialized(&self) -> bool {
        self.resident.is_some()
    }

    /// The resident payload bytes, if currently materialized.
    pub fn resident_bytes(&self) -> Option<&[u8]> {
        self.resident.as_deref()
    }

    /// Read-only access to the backing, e.g. for reload statistics.
    pub fn backing(&self) -> &B {
        &self.backing
    }

    /// Ensures the backing bytes are resident and returns them.
    ///
    /// A no-op while materialized. After an eviction this re-fetches the
    /// payload through the backing; a buffer of the wrong length is handed
    /// straight back through `unload` and surfaces as
    /// [`SourceError::LengthMismatch`], leaving the handle evicted.
    pub fn materialize(&mut self) -> Result<&[u8]> {
        if self.resident.is_none() {
            let buffer = Self::load_checked(&self.descriptor, &mut self.backing)?;
            self.resident = Some(buffer);
        }
        Ok(self.resident.as_deref().unwrap_or_default())
    }

    /// Releases the backing bytes, keeping only descriptor metadata.
    ///
    /// Idempotent; a no-op for zero-length handles and for handles already
    /// evicted. The reported length and width are unaffected.
    pub fn evict(&mut self) {
        if self.descriptor.preloaded_data_length() == 0 {
            return;
        }
        if let Some(buffer) = self.resident.take() {
            self.backing.unload(buffer);
        }
    }

    /// Materializes and decodes the payload into a Rust string.
    pub fn materialized_text(&mut self) -> Result<String> {
        let encoding = self.descriptor.encoding();
        let bytes = self.materialize()?;
        decode_payload_to_string(bytes, encoding)
    }

    fn load_checked(
        descriptor: &ReloadableSourceDescriptor,
        backing: &mut B,
    ) -> Result<StringBuffer> {
        let buffer = backing.load()?;
        let expected = descriptor.preloaded_data_length();
        if buffer.len() != expected {
            let got = buffer.len();
            backing.unload(buffer);
            return Err(SourceError::length_mismatch(expected, got));
        }
        Ok(buffer)
    }
}

impl<B: SourceBacking> Drop for ReloadableString<B> {
    fn drop(&mut self) {
        self.evict();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::loader::RawFilePayload;

    struct TestBacking {
        bytes: Vec<u8>,
        preloaded: Option<StringBuffer>,
        loads: Rc<Cell<usize>>,
        unloads: Rc<Cell<usize>>,
        reload_override: Option<Vec<u8>>,
    }

    impl SourceBacking for TestBacking {
        fn load(&mut self) -> Result<StringBuffer> {
            self.loads.set(self.loads.get() + 1);
            if let Some(buffer) = self.preloaded.take() {
                return Ok(buffer);
            }
            let bytes = self
                .reload_override
                .clone()
                .unwrap_or_else(|| self.bytes.clone());
            Ok(StringBuffer::from_vec(bytes))
        }

        fn unload(&mut self, buffer: StringBuffer) {
            self.unloads.set(self.unloads.get() + 1);
            drop(buffer);
        }
    }

    type Counters = (Rc<Cell<usize>>, Rc<Cell<usize>>);

    fn build_handle(
        bytes: &[u8],
        encoding: TextEncoding,
        reload_override: Option<Vec<u8>>,
    ) -> (ReloadableString<TestBacking>, Counters) {
        let payload = RawFilePayload::new(
            StringBuffer::from_vec(bytes.to_vec()),
            encoding,
            "test.js".into(),
        );
        let mut descriptor = ReloadableSourceDescriptor::create(payload).unwrap();
        let loads = Rc::new(Cell::new(0));
        let unloads = Rc::new(Cell::new(0));
        let backing = TestBacking {
            bytes: bytes.to_vec(),
            preloaded: descriptor.take_preloaded(),
            loads: Rc::clone(&loads),
            unloads: Rc::clone(&unloads),
            reload_override,
        };
        let handle = ReloadableString::new(descriptor, backing).unwrap();
        (handle, (loads, unloads))
    }

    #[test]
    fn test_materialize_evict_cycle() {
        let (mut handle, (loads, unloads)) =
            build_handle(b"hello world", TextEncoding::Ascii, None);

        // fresh handles start materialized from the preload
        assert!(handle.is_materialized());
        assert_eq!(loads.get(), 1);
        assert_eq!(unloads.get(), 0);

        let length_before = handle.length();
        let width_before = handle.is_one_byte();

        assert_eq!(handle.materialize().unwrap(), b"hello world");
        assert_eq!(loads.get(), 1, "materialize while resident must not reload");

        handle.evict();
        assert!(!handle.is_materialized());
        handle.evict();
        assert_eq!(unloads.get(), 1, "evict is idempotent");

        assert_eq!(handle.materialize().unwrap(), b"hello world");
        handle.evict();
        assert_eq!(handle.materialize().unwrap(), b"hello world");

        assert!(unloads.get() <= loads.get());
        assert_eq!(handle.length(), length_before);
        assert_eq!(handle.is_one_byte(), width_before);
    }

    #[test]
    fn test_utf16_handle_reports_code_units() {
        // "cé" as UTF-16LE
        let bytes = [0x63, 0x00, 0xE9, 0x00];
        let (mut handle, _) = build_handle(&bytes, TextEncoding::Utf16, None);
        assert_eq!(handle.length(), 2);
        assert!(!handle.is_one_byte());
        assert_eq!(handle.materialized_text().unwrap(), "cé");

        handle.evict();
        handle.materialize().unwrap();
        assert_eq!(handle.length(), 2);
        assert!(!handle.is_one_byte());
    }

    #[test]
    fn test_drop_unloads_resident_buffer_once() {
        let (handle, (loads, unloads)) = build_handle(b"abc", TextEncoding::Ascii, None);
        drop(handle);
        assert_eq!(loads.get(), 1);
        assert_eq!(unloads.get(), 1);
    }

    #[test]
    fn test_drop_after_evict_does_not_double_unload() {
        let (mut handle, (loads, unloads)) = build_handle(b"abc", TextEncoding::Ascii, None);
        handle.evict();
        assert_eq!(unloads.get(), 1);
        drop(handle);
        assert_eq!(loads.get(), 1);
        assert_eq!(unloads.get(), 1);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let (mut handle, (loads, unloads)) =
            build_handle(b"abcdef", TextEncoding::Ascii, Some(b"abc".to_vec()));
        handle.evict();
        assert_eq!(unloads.get(), 1);

        let result = handle.materialize();
        assert!(matches!(result, Err(SourceError::LengthMismatch { .. })));
        // the bad buffer went back through unload, and the handle stayed evicted
        assert_eq!(loads.get(), 2);
        assert_eq!(unloads.get(), 2);
        assert!(!handle.is_materialized());
        assert_eq!(handle.length(), 6);
        assert!(handle.is_one_byte());
    }

    #[test]
    fn test_empty_source_never_touches_backing() {
        let (mut handle, (loads, unloads)) = build_handle(b"", TextEncoding::Ascii, None);
        assert_eq!(handle.length(), 0);
        assert!(handle.is_materialized());
        assert_eq!(handle.materialize().unwrap(), b"");
        handle.evict();
        assert_eq!(handle.materialize().unwrap(), b"");
        drop(handle);
        assert_eq!(loads.get(), 0);
        assert_eq!(unloads.get(), 0);
    }
}
