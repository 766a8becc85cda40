//! Whole-file reading into encoding-resolved payloads.
//!
//! The file reader produces a [`RawFilePayload`]: the complete file
//! contents in a freshly allocated buffer, normalized to one of the
//! engine's storage encodings. The payload is the move-only hand-off
//! object between the reader and the descriptor; it is consumed exactly
//! once.
//!
//! # Examples
//!
//! ```no_run
//! use relsrc::encoding::TextEncoding;
//! use relsrc::loader::read_file;
//!
//! # fn main() -> relsrc::Result<()> {
//! let payload = read_file("app.js", TextEncoding::Unknown)?;
//! println!("{} bytes as {:?}", payload.size(), payload.encoding());
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use log::debug;
use url::Url;

use crate::buffer::StringBuffer;
use crate::encoding::{TextEncoding, resolve_encoding};
use crate::{Result, SourceError};

/// The complete, encoding-resolved contents of a source file.
///
/// Owned exclusively by whichever stage currently holds it; ownership
/// transfers by move because the payload may be an entire script file.
pub struct RawFilePayload {
    buffer: StringBuffer,
    encoding: TextEncoding,
    path: PathBuf,
}

impl RawFilePayload {
    /// Assembles a payload from its parts.
    pub fn new(buffer: StringBuffer, encoding: TextEncoding, path: PathBuf) -> Self {
        Self { buffer, encoding, path }
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// The resolved encoding of the payload bytes.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// The path the payload was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read-only view of the payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Decomposes the payload, moving the buffer out.
    pub fn into_parts(self) -> (StringBuffer, TextEncoding, PathBuf) {
        (self.buffer, self.encoding, self.path)
    }
}

/// Reads a source file fully into memory and resolves its encoding.
///
/// The buffer is sized from file metadata before reading, the whole file is
/// read in one pass, and the bytes are then normalized per
/// [`resolve_encoding`]. The hint is passed through unchanged; the reader
/// itself never decides the final encoding.
///
/// # Errors
///
/// - [`SourceError::FileNotFound`] if `path` does not exist
/// - [`SourceError::Io`] on any other read failure
/// - [`SourceError::EncodingError`] / [`SourceError::AllocationFailure`]
///   from the conversion stage
pub fn read_file<P: AsRef<Path>>(path: P, hint: TextEncoding) -> Result<RawFilePayload> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|error| {
        if error.kind() == io::ErrorKind::NotFound {
            SourceError::file_not_found(path.to_string_lossy())
        } else {
            SourceError::from(error)
        }
    })?;

    let file_size = file.metadata()?.len() as usize;
    let mut buffer = StringBuffer::allocate(file_size)?;
    let mut reader = BufReader::new(file);
    reader.read_to_end(buffer.as_mut_vec())?;
    debug!("read {} bytes from {}", buffer.len(), path.display());

    let (buffer, encoding) = resolve_encoding(buffer, hint)?;
    Ok(RawFilePayload::new(buffer, encoding, path.to_path_buf()))
}

/// Reads a source file addressed by a `file://` URL.
///
/// # Errors
///
/// Returns [`SourceError::InvalidParameter`] for non-`file` schemes or URLs
/// that do not map to a local path; otherwise as [`read_file`].
pub fn read_file_from_url(url: &Url, hint: TextEncoding) -> Result<RawFilePayload> {
    if url.scheme() != "file" {
        return Err(SourceError::invalid_parameter(format!(
            "Unsupported scheme: {}",
            url.scheme()
        )));
    }
    let path = url
        .to_file_path()
        .map_err(|_| SourceError::invalid_path(url.as_str()))?;
    read_file(path, hint)
}
