//! The reloadable source descriptor.
//!
//! A [`ReloadableSourceDescriptor`] is the one-time ticket produced from a
//! freshly read file payload. It owns a private copy of the source path, the
//! resolved encoding, and the byte length of the payload, plus the payload
//! itself as a one-shot preload that the factory path consumes for the
//! first materialization. After construction the descriptor's metadata
//! never changes; the logical string length and character width derived
//! from it stay valid for the whole life of the handle built on top.
//!
//! # Examples
//!
//! ```
//! use relsrc::buffer::StringBuffer;
//! use relsrc::encoding::TextEncoding;
//! use relsrc::loader::RawFilePayload;
//! use relsrc::source::ReloadableSourceDescriptor;
//!
//! # fn main() -> relsrc::Result<()> {
//! let payload = RawFilePayload::new(
//!     StringBuffer::from_vec(b"abcdefg".to_vec()),
//!     TextEncoding::Ascii,
//!     "script.js".into(),
//! );
//! let descriptor = ReloadableSourceDescriptor::create(payload)?;
//! assert_eq!(descriptor.string_length(), 7);
//! assert!(descriptor.is_one_byte_string());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use crate::buffer::StringBuffer;
use crate::encoding::TextEncoding;
use crate::loader::RawFilePayload;
use crate::{Result, SourceError};

/// Metadata ticket for a reloadable external source.
///
/// The descriptor owns its path independently of whatever string the caller
/// built it from, so it stays valid after the caller's path is gone. The
/// preloaded payload is held until the factory consumes it; everything else
/// is read-only.
pub struct ReloadableSourceDescriptor {
    path: PathBuf,
    preloaded: Option<StringBuffer>,
    preloaded_data_length: usize,
    encoding: TextEncoding,
}

impl ReloadableSourceDescriptor {
    /// Builds a descriptor by consuming a resolved file payload.
    ///
    /// # Errors
    ///
    /// - [`SourceError::InvalidParameter`] if the payload encoding is still
    ///   [`TextEncoding::Unknown`]
    /// - [`SourceError::MalformedPayload`] if the byte length is odd under
    ///   `Utf16`; the division into code units must be exact
    pub fn create(payload: RawFilePayload) -> Result<Self> {
        let (buffer, encoding, path) = payload.into_parts();
        if !encoding.is_resolved() {
            return Err(SourceError::invalid_parameter(
                "Descriptor requires a resolved encoding",
            ));
        }
        if encoding == TextEncoding::Utf16 && buffer.len() % 2 != 0 {
            return Err(SourceError::malformed_payload(format!(
                "UTF-16 payload for {} has odd byte length {}",
                path.display(),
                buffer.len()
            )));
        }
        Ok(Self {
            path,
            preloaded_data_length: buffer.len(),
            preloaded: Some(buffer),
            encoding,
        })
    }

    /// The source path, owned by the descriptor.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte length of the preloaded payload. Always in bytes, independent
    /// of the encoding's code-unit size.
    pub fn preloaded_data_length(&self) -> usize {
        self.preloaded_data_length
    }

    /// Logical string length in code units.
    pub fn string_length(&self) -> usize {
        if self.is_one_byte_string() {
            self.preloaded_data_length
        } else {
            self.preloaded_data_length / 2
        }
    }

    /// Returns `true` if the payload uses one byte per code unit.
    pub fn is_one_byte_string(&self) -> bool {
        self.encoding.is_one_byte()
    }

    /// The resolved payload encoding. Never [`TextEncoding::Unknown`].
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Returns `true` while the one-shot preload has not been consumed.
    pub fn has_preloaded_data(&self) -> bool {
        self.preloaded.is_some()
    }

    /// Takes the one-shot preloaded payload.
    ///
    /// Used by the backing that feeds the factory; returns `Some` exactly
    /// once. Metadata accessors are unaffected.
    pub fn take_preloaded(&mut self) -> Option<StringBuffer> {
        self.preloaded.take()
    }
}
