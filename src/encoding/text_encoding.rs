//! The text-encoding classification for source payloads.

use crate::{Result, SourceError};

/// Storage encoding of a source payload.
///
/// `Ascii` and `Latin1` are one-byte encodings (one code unit per byte);
/// `Utf16` stores UTF-16LE, two bytes per code unit. `Unknown` means
/// "not yet resolved" and is only valid as a detection hint; a payload
/// must be resolved before it can become a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum TextEncoding {
    #[default]
    Unknown = 0,
    Ascii = 1,
    Latin1 = 2,
    Utf16 = 3,
}

impl TextEncoding {
    /// Returns `true` for the one-byte encodings (`Ascii`, `Latin1`).
    pub fn is_one_byte(&self) -> bool {
        matches!(self, TextEncoding::Ascii | TextEncoding::Latin1)
    }

    /// Bytes per code unit: 2 for `Utf16`, 1 otherwise.
    pub fn code_unit_size(&self) -> usize {
        match self {
            TextEncoding::Utf16 => 2,
            _ => 1,
        }
    }

    /// Returns `true` once the encoding is no longer the `Unknown` sentinel.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, TextEncoding::Unknown)
    }
}

impl TryFrom<u8> for TextEncoding {
    type Error = SourceError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(TextEncoding::Unknown),
            1 => Ok(TextEncoding::Ascii),
            2 => Ok(TextEncoding::Latin1),
            3 => Ok(TextEncoding::Utf16),
            _ => Err(SourceError::invalid_parameter(format!("Invalid encoding tag:{}", value))),
        }
    }
}
