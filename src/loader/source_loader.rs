//! The default file-backed reload seam and the end-to-end entry points.
//!
//! [`FileBacking`] implements [`SourceBacking`] for sources that live on
//! the filesystem: the first load hands over the descriptor's one-shot
//! preload, and every later load re-reads the file with the already
//! resolved encoding as the hint. Load and unload transitions are counted
//! and logged, matching the residency of the string they back.
//!
//! [`create_reloadable_source_from_file`] wires the whole pipeline: read
//! the file, resolve its encoding, build the descriptor, attach a file
//! backing, and hand back the reloadable string.
//!
//! # Examples
//!
//! ```no_run
//! use relsrc::encoding::TextEncoding;
//! use relsrc::loader::create_reloadable_source_from_file;
//!
//! # fn main() -> relsrc::Result<()> {
//! let mut source = create_reloadable_source_from_file("app.js", TextEncoding::Unknown)?;
//! println!("{} code units, one-byte: {}", source.length(), source.is_one_byte());
//! source.evict();
//! let text = source.materialized_text()?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use log::info;
use url::Url;

use crate::buffer::StringBuffer;
use crate::encoding::TextEncoding;
use crate::loader::file_reader::{read_file, read_file_from_url};
use crate::source::{ReloadableSourceDescriptor, ReloadableString, SourceBacking};
use crate::{Result, SourceError};

/// File-backed payload supply for a reloadable string.
///
/// Holds its own copies of the path, resolved encoding, and expected byte
/// length, so it stays valid independent of the descriptor. The one-shot
/// preload taken from the descriptor serves the first load; reloads go back
/// to the file.
pub struct FileBacking {
    path: PathBuf,
    encoding: TextEncoding,
    expected_length: usize,
    preloaded: Option<StringBuffer>,
    loaded: i32,
    reloaded: u32,
}

impl FileBacking {
    /// Builds a backing from a descriptor, consuming its one-shot preload.
    pub fn from_descriptor(descriptor: &mut ReloadableSourceDescriptor) -> Self {
        Self {
            path: descriptor.path().to_path_buf(),
            encoding: descriptor.encoding(),
            expected_length: descriptor.preloaded_data_length(),
            preloaded: descriptor.take_preloaded(),
            loaded: 0,
            reloaded: 0,
        }
    }

    /// Number of currently loaded buffers (0 or 1 under the strict
    /// load/unload alternation).
    pub fn loaded(&self) -> i32 {
        self.loaded
    }

    /// Number of times the payload was re-read from the file, not counting
    /// the initial preload hand-off.
    pub fn reloaded(&self) -> u32 {
        self.reloaded
    }
}

impl SourceBacking for FileBacking {
    fn load(&mut self) -> Result<StringBuffer> {
        if let Some(buffer) = self.preloaded.take() {
            self.loaded += 1;
            info!(
                "  * Load: {} ({}) {} (+{:.2} kB)",
                self.loaded,
                self.reloaded,
                self.path.display(),
                self.expected_length as f64 / 1024.0
            );
            return Ok(buffer);
        }

        self.reloaded += 1;
        let payload = read_file(&self.path, self.encoding)?;
        let (buffer, encoding, _path) = payload.into_parts();
        if encoding != self.encoding {
            return Err(SourceError::encoding_error(format!(
                "{} resolved as {:?} on reload, was {:?}",
                self.path.display(),
                encoding,
                self.encoding
            )));
        }
        if buffer.len() != self.expected_length {
            return Err(SourceError::length_mismatch(self.expected_length, buffer.len()));
        }

        self.loaded += 1;
        info!(
            "  * Load: {} ({}) {} (+{:.2} kB)",
            self.loaded,
            self.reloaded,
            self.path.display(),
            self.expected_length as f64 / 1024.0
        );
        Ok(buffer)
    }

    fn unload(&mut self, buffer: StringBuffer) {
        self.loaded -= 1;
        info!(
            "* Unload: {} ({}) {} (-{:.2} kB)",
            self.loaded,
            self.reloaded,
            self.path.display(),
            buffer.len() as f64 / 1024.0
        );
        // a preload that was never handed out goes with the buffer
        if self.preloaded.is_some() {
            self.preloaded = None;
        }
        drop(buffer);
    }
}

/// Loads a script file and builds a reloadable string backed by it.
///
/// Wires the full pipeline: [`read_file`] → descriptor →
/// [`FileBacking`] → [`ReloadableString::new`]. The returned handle starts
/// materialized with the preloaded payload; after an eviction the backing
/// re-reads the file on demand.
pub fn create_reloadable_source_from_file<P: AsRef<Path>>(
    path: P,
    hint: TextEncoding,
) -> Result<ReloadableString<FileBacking>> {
    let payload = read_file(path, hint)?;
    let mut descriptor = ReloadableSourceDescriptor::create(payload)?;
    let backing = FileBacking::from_descriptor(&mut descriptor);
    ReloadableString::new(descriptor, backing)
}

/// [`create_reloadable_source_from_file`] for `file://` URLs.
pub fn create_reloadable_source_from_url(
    url: &Url,
    hint: TextEncoding,
) -> Result<ReloadableString<FileBacking>> {
    let payload = read_file_from_url(url, hint)?;
    let mut descriptor = ReloadableSourceDescriptor::create(payload)?;
    let backing = FileBacking::from_descriptor(&mut descriptor);
    ReloadableString::new(descriptor, backing)
}
