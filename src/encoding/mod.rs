// Text-encoding classification and conversion
//
// This module provides the encoding side of the loading pipeline: the
// TextEncoding classification used by descriptors and handles, and the
// detection/conversion routines that normalize raw file bytes into one of
// the engine's string representations (ASCII, Latin-1, or UTF-16LE).

pub mod text_encoding;
pub mod converter;

pub use text_encoding::TextEncoding;
pub use converter::{
    resolve_encoding, convert_utf8_to_utf16le, convert_utf8_to_latin1,
    decode_payload_to_string,
};
