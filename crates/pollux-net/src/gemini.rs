//! Request framing and status-line parsing.
//!
//! The wire format is a single CRLF-terminated URL going out and
//! `<two digits><space><meta>\r\n[body]` coming back. Framing violations
//! never surface as remote errors: they collapse to the sentinel status
//! 0 with the partial metadata discarded.

use pollux_types::{Address, Response, Status};

/// Maximum length of the response meta field in bytes.
pub const MAX_META: usize = 1024;

/// Build the request line for an address: the canonical URL plus CRLF.
pub fn build_request(addr: &Address) -> Vec<u8> {
    format!("{addr}\r\n").into_bytes()
}

/// Parse a raw response into status, meta, and optional body.
///
/// Malformed framing — no CRLF, no separating space, or a status that is
/// not exactly two ASCII digits — yields [`Response::malformed`]. The
/// body is kept only for the 2x class; metas longer than [`MAX_META`]
/// are truncated.
pub fn parse_response(data: &[u8]) -> Response {
    let Some(pos) = data.windows(2).position(|w| w == b"\r\n") else {
        return Response::malformed();
    };
    let header = &data[..pos];

    if header.len() < 3
        || !header[0].is_ascii_digit()
        || !header[1].is_ascii_digit()
        || header[2] != b' '
    {
        return Response::malformed();
    }

    let code = (header[0] - b'0') * 10 + (header[1] - b'0');
    let status = Status(code);

    let meta_bytes = &header[3..];
    let meta_bytes = &meta_bytes[..meta_bytes.len().min(MAX_META)];
    let meta = String::from_utf8_lossy(meta_bytes).into_owned();

    let body = if status.is_success() && data.len() > pos + 2 {
        Some(String::from_utf8_lossy(&data[pos + 2..]).into_owned())
    } else {
        None
    };

    Response { status, meta, body }
}
