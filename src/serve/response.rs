//! HTTP response handlers for static-file requests.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::mime;

/// Respond with a static file.
///
/// Supports HEAD, `Range: bytes=` requests (streamed 206) and
/// `If-None-Match` revalidation against a weak size/mtime ETag.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = mime::from_path(path);
    let meta = fs::metadata(path).with_context(|| format!("Failed to stat {}", path.display()))?;
    let etag = file_etag(&meta);

    if let Some(tag) = get_header(&request, "if-none-match")
        && tag == etag
    {
        return respond_not_modified(request, &etag);
    }

    if is_head_request(&request) {
        return send_head(request, 200, content_type, &etag);
    }

    // Range header (wasm streaming, video/audio seeking); an unparseable
    // value is ignored and the whole file answered with a plain 200
    if meta.len() > 0
        && let Some(range) = get_header(&request, "range")
        && let Some((start, end)) =
            parse_range(range.strip_prefix("bytes=").unwrap_or(&range), meta.len())
    {
        return respond_range(request, path, content_type, start, end, meta.len());
    }

    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    send_body(request, 200, content_type, body, &etag)
}

/// Handle a Range request by streaming the requested byte window.
fn respond_range(
    request: Request,
    path: &Path,
    content_type: &'static str,
    start: u64,
    end: u64,
    file_size: u64,
) -> Result<()> {
    use std::io::{Read, Seek, SeekFrom};

    if start > end {
        let response = Response::empty(StatusCode(416))
            .with_header(make_header("Content-Range", &format!("bytes */{file_size}")));
        request.respond(response)?;
        return Ok(());
    }

    let length = end - start + 1;

    // Stream the requested range - no allocation for large windows
    let mut file = fs::File::open(path)?;
    file.seek(SeekFrom::Start(start))?;
    let reader = file.take(length);

    let content_range = format!("bytes {}-{}/{}", start, end, file_size);
    let response = Response::new(
        StatusCode(206),
        vec![
            make_header("Content-Type", content_type),
            make_header("Content-Range", &content_range),
            make_header("Accept-Ranges", "bytes"),
        ],
        reader,
        Some(length as usize),
        None,
    );

    request.respond(response)?;
    Ok(())
}

/// Parse a Range header value "start-end" into (start, end) bytes.
///
/// Returns None when the value cannot be parsed; unparseable ranges
/// are ignored and the whole file served with a plain 200.
fn parse_range(range: &str, file_size: u64) -> Option<(u64, u64)> {
    let range = range.trim();
    let parts: Vec<&str> = range.split('-').collect();

    match parts.as_slice() {
        // "0-499" - specific window
        [s, e] if !s.is_empty() && !e.is_empty() => {
            let start: u64 = s.trim().parse().ok()?;
            let end: u64 = e.trim().parse().ok()?;
            Some((start, end.min(file_size.saturating_sub(1))))
        }
        // "500-" - from offset to end
        [s, ""] if !s.is_empty() => {
            let start: u64 = s.trim().parse().ok()?;
            Some((start, file_size.saturating_sub(1)))
        }
        // "-500" - last 500 bytes
        ["", e] if !e.is_empty() => {
            let suffix: u64 = e.trim().parse().ok()?;
            Some((file_size.saturating_sub(suffix), file_size.saturating_sub(1)))
        }
        _ => None,
    }
}

/// Extract a header value from the request, case-insensitive on the name.
fn get_header(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|h| h.value.to_string())
}

/// Weak validator derived from file size and mtime.
fn file_etag(meta: &fs::Metadata) -> String {
    let mtime = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("\"{:x}-{:x}\"", meta.len(), mtime)
}

/// Respond with a plain 404.
pub fn respond_not_found(request: Request) -> Result<()> {
    use crate::mime::types::PLAIN;

    if is_head_request(&request) {
        let response =
            Response::empty(StatusCode(404)).with_header(make_header("Content-Type", PLAIN));
        return request.respond(response).map_err(Into::into);
    }

    let response = Response::from_data(b"404 Not Found".to_vec())
        .with_status_code(StatusCode(404))
        .with_header(make_header("Content-Type", PLAIN));
    request.respond(response)?;
    Ok(())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    use crate::mime::types::PLAIN;

    let response = Response::from_data(b"503 Service Unavailable".to_vec())
        .with_status_code(StatusCode(503))
        .with_header(make_header("Content-Type", PLAIN));
    request.respond(response)?;
    Ok(())
}

/// Respond with 405 for anything other than GET/HEAD.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let response = Response::empty(StatusCode(405)).with_header(make_header("Allow", "GET, HEAD"));
    request.respond(response)?;
    Ok(())
}

fn respond_not_modified(request: Request, etag: &str) -> Result<()> {
    let response = Response::empty(StatusCode(304)).with_header(make_header("ETag", etag));
    request.respond(response)?;
    Ok(())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str, etag: &str) -> Result<()> {
    let response = Response::empty(StatusCode(status))
        .with_header(make_header("Content-Type", content_type))
        .with_header(make_header("Accept-Ranges", "bytes"))
        .with_header(make_header("ETag", etag));
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
    etag: &str,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type))
        .with_header(make_header("Accept-Ranges", "bytes"))
        .with_header(make_header("ETag", etag));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &str, value: &str) -> Header {
    Header::from_bytes(key.as_bytes(), value.as_bytes()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range_specific() {
        assert_eq!(parse_range("0-499", 1000), Some((0, 499)));
        assert_eq!(parse_range("200-299", 1000), Some((200, 299)));
    }

    #[test]
    fn test_parse_range_open_ended() {
        assert_eq!(parse_range("500-", 1000), Some((500, 999)));
        assert_eq!(parse_range("0-", 1000), Some((0, 999)));
    }

    #[test]
    fn test_parse_range_suffix() {
        assert_eq!(parse_range("-500", 1000), Some((500, 999)));
        assert_eq!(parse_range("-2000", 1000), Some((0, 999)));
    }

    #[test]
    fn test_parse_range_clamps_end() {
        assert_eq!(parse_range("0-5000", 1000), Some((0, 999)));
    }

    #[test]
    fn test_parse_range_rejects_malformed() {
        assert_eq!(parse_range("garbage", 1000), None);
        assert_eq!(parse_range("-", 1000), None);
        assert_eq!(parse_range("a-b", 1000), None);
        assert_eq!(parse_range("", 1000), None);
    }

    #[test]
    fn test_file_etag_is_stable() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.txt");
        fs::write(&file, b"hello").unwrap();

        let meta = fs::metadata(&file).unwrap();
        assert_eq!(file_etag(&meta), file_etag(&meta));
        assert!(file_etag(&meta).starts_with('"'));
    }
}
