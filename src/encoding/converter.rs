//! Encoding detection and conversion for raw source bytes.
//!
//! This module decides how a freshly read byte buffer is stored for the
//! engine and performs the necessary conversion:
//!
//! - Pure ASCII bytes are kept as-is (they are valid as both UTF-8 and
//!   Latin-1), regardless of the caller's hint.
//! - Under a `Latin1` hint, UTF-8 input whose code points all fit in a
//!   single byte is narrowed to one byte per code point.
//! - Everything else is treated as UTF-8 and re-encoded as UTF-16 Little
//!   Endian, with surrogate pairs for code points above U+FFFF.
//!
//! Resolution is deterministic: a fixed input buffer and hint always yield
//! the same resolved encoding and output length, so a reload of an
//! unchanged file reproduces the original payload exactly.
//!
//! # Examples
//!
//! ```
//! use relsrc::buffer::StringBuffer;
//! use relsrc::encoding::{resolve_encoding, TextEncoding};
//!
//! # fn main() -> relsrc::Result<()> {
//! let raw = StringBuffer::from_vec("café".as_bytes().to_vec());
//! let (buffer, encoding) = resolve_encoding(raw, TextEncoding::Unknown)?;
//! assert_eq!(encoding, TextEncoding::Utf16);
//! assert_eq!(buffer.len(), 8); // four UTF-16 code units
//! # Ok(())
//! # }
//! ```

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, warn};

use crate::buffer::StringBuffer;
use crate::encoding::TextEncoding;
use crate::{Result, SourceError};

/// Resolves the storage encoding for a raw byte buffer.
///
/// Takes ownership of `buffer` and returns either the same buffer (ASCII
/// fast path, or the verbatim Latin-1 policy below) or a freshly converted
/// one, together with the resolved encoding. The result is never
/// [`TextEncoding::Unknown`].
///
/// # Arguments
///
/// * `buffer` - The raw bytes as read from storage
/// * `hint` - The caller's encoding hint; `Unknown` means "detect"
///
/// # Errors
///
/// Returns [`SourceError::EncodingError`] for malformed UTF-8, unless the
/// hint is `Latin1`: a caller explicitly asserting Latin-1 gets the bytes
/// verbatim (every byte value is a valid Latin-1 code point).
pub fn resolve_encoding(
    buffer: StringBuffer,
    hint: TextEncoding,
) -> Result<(StringBuffer, TextEncoding)> {
    if buffer.as_bytes().is_ascii() {
        return Ok((buffer, TextEncoding::Ascii));
    }

    let utf8 = match std::str::from_utf8(buffer.as_bytes()) {
        Ok(utf8) => utf8,
        Err(error) => {
            if hint == TextEncoding::Latin1 {
                warn!(
                    "source is not valid UTF-8, keeping {} bytes verbatim as Latin-1",
                    buffer.len()
                );
                return Ok((buffer, TextEncoding::Latin1));
            }
            return Err(SourceError::encoding_error(format!(
                "Invalid UTF-8 after byte {}: {}",
                error.valid_up_to(),
                error
            )));
        }
    };

    if hint == TextEncoding::Latin1 {
        if let Some(narrowed) = convert_utf8_to_latin1(utf8)? {
            return Ok((narrowed, TextEncoding::Latin1));
        }
        debug!("Latin-1 hint inapplicable, code point above 0xFF; converting to UTF-16LE");
    }

    let converted = convert_utf8_to_utf16le(utf8)?;
    Ok((converted, TextEncoding::Utf16))
}

/// Re-encodes a UTF-8 string as UTF-16 Little Endian bytes.
///
/// Every code point becomes one or two 16-bit little-endian code units
/// (surrogate pairs for code points at or above U+10000), so the output
/// length is always even.
pub fn convert_utf8_to_utf16le(utf8: &str) -> Result<StringBuffer> {
    let unit_count = utf8.encode_utf16().count();
    let mut buffer = StringBuffer::allocate(unit_count * 2)?;
    let out = buffer.as_mut_vec();
    let mut unit_bytes = [0u8; 2];
    for unit in utf8.encode_utf16() {
        LittleEndian::write_u16(&mut unit_bytes, unit);
        out.extend_from_slice(&unit_bytes);
    }
    Ok(buffer)
}

/// Narrows a UTF-8 string to Latin-1, one byte per code point.
///
/// Returns `Ok(None)` when the narrowing is inapplicable, i.e. some code
/// point does not fit in the Latin-1 range (above 0xFF). The conversion is
/// lossless whenever it applies.
pub fn convert_utf8_to_latin1(utf8: &str) -> Result<Option<StringBuffer>> {
    let mut buffer = StringBuffer::allocate(utf8.chars().count())?;
    let out = buffer.as_mut_vec();
    for character in utf8.chars() {
        let code_point = u32::from(character);
        if code_point > 0xFF {
            return Ok(None);
        }
        out.push(code_point as u8);
    }
    Ok(Some(buffer))
}

/// Decodes a resolved payload back into a Rust string.
///
/// The payload must carry the encoding it was resolved to: `Utf16` decodes
/// as UTF-16LE, `Ascii` as UTF-8, and `Latin1` maps each byte straight to
/// the corresponding U+0000..=U+00FF code point.
///
/// # Errors
///
/// `Unknown` is rejected as [`SourceError::InvalidParameter`]; an odd byte
/// count under `Utf16` is [`SourceError::MalformedPayload`].
pub fn decode_payload_to_string(bytes: &[u8], encoding: TextEncoding) -> Result<String> {
    match encoding {
        TextEncoding::Ascii => Ok(std::str::from_utf8(bytes)?.to_owned()),
        TextEncoding::Latin1 => Ok(bytes.iter().map(|&byte| char::from(byte)).collect()),
        TextEncoding::Utf16 => {
            if bytes.len() % 2 != 0 {
                return Err(SourceError::malformed_payload(format!(
                    "UTF-16 payload has odd byte length {}",
                    bytes.len()
                )));
            }
            let (decoded, had_errors) = encoding_rs::UTF_16LE.decode_without_bom_handling(bytes);
            if had_errors {
                debug!("Decoding error with: {}", encoding_rs::UTF_16LE.name());
            }
            Ok(decoded.into_owned())
        }
        TextEncoding::Unknown => Err(SourceError::invalid_parameter(
            "Cannot decode payload with unresolved encoding",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(bytes: &[u8], hint: TextEncoding) -> (Vec<u8>, TextEncoding) {
        let (buffer, encoding) =
            resolve_encoding(StringBuffer::from_vec(bytes.to_vec()), hint).unwrap();
        (buffer.into_vec(), encoding)
    }

    #[test]
    fn test_ascii_passthrough_regardless_of_hint() {
        let hints = [
            TextEncoding::Unknown,
            TextEncoding::Ascii,
            TextEncoding::Latin1,
            TextEncoding::Utf16,
        ];
        for hint in hints {
            let (bytes, encoding) = resolve(b"abcdefg", hint);
            assert_eq!(encoding, TextEncoding::Ascii, "hint {:?}", hint);
            assert_eq!(bytes, b"abcdefg", "hint {:?}", hint);
        }
    }

    #[test]
    fn test_utf16le_conversion() {
        // (input, expected UTF-16LE bytes)
        let cases: [(&str, &[u8]); 3] = [
            ("café", &[0x63, 0x00, 0x61, 0x00, 0x66, 0x00, 0xE9, 0x00]),
            ("日", &[0xE5, 0x65]),
            // U+10348 needs a surrogate pair: D800 DF48
            ("\u{10348}", &[0x00, 0xD8, 0x48, 0xDF]),
        ];
        for (input, expected) in cases {
            let (bytes, encoding) = resolve(input.as_bytes(), TextEncoding::Unknown);
            assert_eq!(encoding, TextEncoding::Utf16, "input {:?}", input);
            assert_eq!(bytes, expected, "input {:?}", input);
            assert_eq!(bytes.len() % 2, 0, "input {:?}", input);
        }
    }

    #[test]
    fn test_utf16_length_counts_surrogate_pairs() {
        // 5 code points, one above U+FFFF: 6 UTF-16 code units
        let input = "ab\u{10348}cd";
        let converted = convert_utf8_to_utf16le(input).unwrap();
        assert_eq!(converted.len(), 12);
        assert_eq!(converted.len() / 2, input.encode_utf16().count());
    }

    #[test]
    fn test_latin1_narrowing() {
        // "café" has 5 bytes of UTF-8 but only 4 code points
        let (bytes, encoding) = resolve("café".as_bytes(), TextEncoding::Latin1);
        assert_eq!(encoding, TextEncoding::Latin1);
        assert_eq!(bytes, [0x63, 0x61, 0x66, 0xE9]);
    }

    #[test]
    fn test_latin1_round_trip() {
        let original: Vec<u8> = (0x80u8..=0xFF).collect();
        let text = decode_payload_to_string(&original, TextEncoding::Latin1).unwrap();
        let narrowed = convert_utf8_to_latin1(&text).unwrap().unwrap();
        assert_eq!(narrowed.as_bytes(), original.as_slice());
    }

    #[test]
    fn test_latin1_hint_falls_back_to_utf16_above_0xff() {
        let (bytes, encoding) = resolve("caf\u{0100}".as_bytes(), TextEncoding::Latin1);
        assert_eq!(encoding, TextEncoding::Utf16);
        assert_eq!(bytes.len(), 8);
    }

    #[test]
    fn test_malformed_utf8_is_rejected() {
        // stray continuation byte and overlong-style truncation
        let inputs: [&[u8]; 3] = [
            &[0x61, 0xFF, 0x62],
            &[0xC3],
            &[0xE2, 0x82],
        ];
        for input in inputs {
            let result = resolve_encoding(
                StringBuffer::from_vec(input.to_vec()),
                TextEncoding::Unknown,
            );
            assert!(
                matches!(result, Err(SourceError::EncodingError { .. })),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_latin1_hint_accepts_raw_bytes_verbatim() {
        // Not valid UTF-8, but the caller asserted Latin-1
        let raw: [u8; 4] = [0x61, 0xFF, 0xFE, 0x62];
        let (bytes, encoding) = resolve(&raw, TextEncoding::Latin1);
        assert_eq!(encoding, TextEncoding::Latin1);
        assert_eq!(bytes, raw);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let input = "mixed ascii and caf\u{00E9} text".as_bytes();
        let first = resolve(input, TextEncoding::Unknown);
        let second = resolve(input, TextEncoding::Unknown);
        assert_eq!(first, second);
    }

    #[test]
    fn test_decode_payload_to_string() {
        let cases: [(&[u8], TextEncoding, &str); 3] = [
            (b"abc", TextEncoding::Ascii, "abc"),
            (&[0x63, 0x61, 0x66, 0xE9], TextEncoding::Latin1, "café"),
            (&[0x63, 0x00, 0xE9, 0x00], TextEncoding::Utf16, "cé"),
        ];
        for (bytes, encoding, expected) in cases {
            let decoded = decode_payload_to_string(bytes, encoding).unwrap();
            assert_eq!(decoded, expected, "encoding {:?}", encoding);
        }

        let odd = decode_payload_to_string(&[0x63, 0x00, 0xE9], TextEncoding::Utf16);
        assert!(matches!(odd, Err(SourceError::MalformedPayload { .. })));
        let unresolved = decode_payload_to_string(b"abc", TextEncoding::Unknown);
        assert!(matches!(unresolved, Err(SourceError::InvalidParameter { .. })));
    }
}
