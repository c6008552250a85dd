//! Base64 transcoding for binary action payloads.
//!
//! Binary data crosses the connector boundary twice, in opposite directions:
//!
//! ```text
//! Host → Server:   Base64 string  →  decode_binary()  →  raw bytes
//! Server → Host:   raw bytes      →  encode_binary()  →  Base64 string
//! ```
//!
//! # The outbound transform is deliberately two-step
//!
//! `encode_binary` does **not** Base64-encode the raw bytes directly.  It
//! first decodes the bytes as UTF-8 text (lossily, so invalid sequences
//! become U+FFFD), then encodes each resulting character's code point as a
//! single byte, and Base64-encodes *those* bytes.  Characters above U+00FF
//! cannot be represented as one byte and are rejected — which means any
//! payload that is not single-byte-clean UTF-8 text is rejected too, because
//! the U+FFFD replacement character itself is above that range.
//!
//! Host pages have depended on this shape of the payload (a text decode
//! followed by a `btoa`-style encode) since the connector first shipped.
//! Do not replace it with a direct byte-to-Base64 encoding.
//!
//! The inbound transform has no such quirk: `decode_binary` is a plain
//! Base64 decode, since mapping each decoded character back to its code
//! point reproduces the raw bytes exactly.

use base64::Engine as _;
use thiserror::Error;

/// Errors produced while transcoding an action payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscodeError {
    /// The host supplied a string that is not valid standard Base64.
    #[error("invalid Base64 payload: {0}")]
    InvalidBase64(String),

    /// The server payload decodes to text containing a character above
    /// U+00FF, which cannot be re-encoded as a single byte.
    ///
    /// Invalid UTF-8 input always lands here: lossy decoding turns it into
    /// U+FFFD, which is above the representable range.
    #[error("payload decodes to text outside the single-byte range (U+{0:04X})")]
    UnencodableChar(u32),
}

/// Transcodes a raw server payload into the Base64 string carried by the
/// `Action` event.
///
/// Returns `Ok(None)` when no payload was present.
///
/// # Errors
///
/// Returns [`TranscodeError::UnencodableChar`] when the payload is not
/// single-byte-clean UTF-8 text (see the module docs for why this is the
/// preserved behavior).
///
/// # Examples
///
/// ```rust
/// use remoteapp_core::transcode::encode_binary;
///
/// // The UTF-8 text "AB" encodes to the Base64 of "AB" itself.
/// assert_eq!(encode_binary(Some(b"AB")).unwrap(), Some("QUI=".to_string()));
/// assert_eq!(encode_binary(None).unwrap(), None);
/// ```
pub fn encode_binary(data: Option<&[u8]>) -> Result<Option<String>, TranscodeError> {
    let Some(data) = data else {
        return Ok(None);
    };

    // Step 1: lossy UTF-8 decode.
    let text = String::from_utf8_lossy(data);

    // Step 2: re-encode each char as one byte; chars above U+00FF have no
    // single-byte form and fail the transcode.
    let mut narrowed = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let code_point = ch as u32;
        if code_point > 0xFF {
            return Err(TranscodeError::UnencodableChar(code_point));
        }
        narrowed.push(code_point as u8);
    }

    Ok(Some(
        base64::engine::general_purpose::STANDARD.encode(&narrowed),
    ))
}

/// Decodes the Base64 payload supplied with `perform_action` into the raw
/// byte sequence forwarded to the session.
///
/// Returns `Ok(None)` when no payload was present.
///
/// # Errors
///
/// Returns [`TranscodeError::InvalidBase64`] when the input is not valid
/// standard Base64.
///
/// # Examples
///
/// ```rust
/// use remoteapp_core::transcode::decode_binary;
///
/// assert_eq!(decode_binary(Some("QQ==")).unwrap(), Some(vec![0x41]));
/// assert_eq!(decode_binary(None).unwrap(), None);
/// ```
pub fn decode_binary(encoded: Option<&str>) -> Result<Option<Vec<u8>>, TranscodeError> {
    let Some(encoded) = encoded else {
        return Ok(None);
    };

    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map(Some)
        .map_err(|e| TranscodeError::InvalidBase64(e.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
