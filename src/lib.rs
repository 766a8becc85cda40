//! # relsrc - Reloadable External Source Strings
//!
//! This crate provides the reloadable source-string subsystem for script
//! engine embeddings: it reads a script file from storage, resolves and
//! normalizes its text encoding, and produces a lazily-materializable
//! string whose backing bytes can be evicted under memory pressure and
//! re-fetched on demand, without the string ever changing its logical
//! length or character width.
//!
//! ## Features
//!
//! - **Encoding normalization**: UTF-8 input becomes ASCII, Latin-1, or
//!   UTF-16LE storage, chosen deterministically from the bytes and an
//!   optional caller hint
//! - **Move-only buffers**: payloads transfer by move through the whole
//!   pipeline, so a live buffer always has exactly one owner
//! - **Reloadable strings**: evict/materialize cycles with a strict
//!   load/unload pairing contract, backed by the filesystem or by a custom
//!   [`SourceBacking`] implementation
//! - **Stable identity**: length in code units and one-byte/two-byte width
//!   are fixed at descriptor construction and survive every reload
//!
//! ## Quick Start
//!
//! ### Loading a script source
//!
//! ```no_run
//! use relsrc::encoding::TextEncoding;
//! use relsrc::loader::create_reloadable_source_from_file;
//!
//! # fn main() -> relsrc::Result<()> {
//! // Read the file and build a reloadable string from it
//! let mut source = create_reloadable_source_from_file("app.js", TextEncoding::Unknown)?;
//! println!("{} code units, one-byte: {}", source.length(), source.is_one_byte());
//!
//! // Under memory pressure, drop the payload but keep the handle
//! source.evict();
//!
//! // Re-fetch the bytes when the engine touches the string again
//! let bytes = source.materialize()?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Resolving an encoding by hand
//!
//! ```
//! use relsrc::buffer::StringBuffer;
//! use relsrc::encoding::{resolve_encoding, TextEncoding};
//!
//! # fn main() -> relsrc::Result<()> {
//! let raw = StringBuffer::from_vec(b"abcdefg".to_vec());
//! let (buffer, encoding) = resolve_encoding(raw, TextEncoding::Unknown)?;
//! assert_eq!(encoding, TextEncoding::Ascii);
//! assert_eq!(buffer.len(), 7);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The crate is organized into several key modules:
//!
//! - **Loading**: [`loader`] for reading source files and the default
//!   file-backed reload seam
//! - **Encodings**: [`encoding`] for detection, conversion, and payload
//!   decoding
//! - **Source handles**: [`source`] for descriptors and reloadable string
//!   handles
//! - **Buffers**: [`buffer`] for the owned string-storage blocks handed
//!   across the pipeline
//!
//! ## Error Handling
//!
//! All fallible operations return a [`Result<T>`] type, where errors are
//! represented by [`SourceError`]. The crate uses the `snafu` library for
//! ergonomic error handling with context and backtraces.
//!
//! ```
//! use relsrc::{Result, SourceError};
//!
//! fn example() -> Result<String> {
//!     // Operations that may fail return Result<T>
//!     Ok("success".to_string())
//! }
//! ```

pub mod buffer;
pub mod encoding;
pub mod error;
pub mod loader;
pub mod source;

// Re-export commonly used types for convenience
pub use buffer::StringBuffer;
pub use encoding::{TextEncoding, resolve_encoding};
pub use loader::{
    RawFilePayload, FileBacking, read_file, create_reloadable_source_from_file,
};
pub use source::{ReloadableSourceDescriptor, ReloadableString, SourceBacking, MAX_STRING_LENGTH};

// Re-export error types for convenience
pub use error::{SourceError, Result, snafu};
