//! Development server for the local-directory provider.

mod lifecycle;
mod path;
mod response;

pub use lifecycle::{is_shutdown, setup_shutdown_handler};

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tiny_http::{Method, Request, Server};

use crate::log;
use crate::provider::LocalDir;

/// Request handler that maps a URL prefix onto a local directory.
///
/// Owns exactly one concern: strip the prefix from the request path and
/// serve the corresponding file from disk. The locator queries of
/// [`LocalDir`] never touch it.
pub struct PrefixServer {
    prefix: &'static str,
    root: PathBuf,
}

impl PrefixServer {
    pub fn new(prefix: &'static str, root: impl Into<PathBuf>) -> Self {
        Self {
            prefix,
            root: root.into(),
        }
    }

    /// Whether this handler is responsible for the given request URL.
    ///
    /// True only when the path carries the prefix as a whole segment, so
    /// `/website.png` is not claimed by a `/web` handler.
    pub fn handles(&self, url: &str) -> bool {
        match url.strip_prefix(self.prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
            None => false,
        }
    }

    /// Fulfill a request for a file under the prefix.
    ///
    /// Missing or unresolvable files get a plain 404; every failure is
    /// terminal to this one request.
    pub fn respond(&self, request: Request) -> Result<()> {
        if !matches!(request.method(), Method::Get | Method::Head) {
            return response::respond_method_not_allowed(request);
        }

        match path::resolve(request.url(), self.prefix, &self.root) {
            Some(file) => response::respond_file(request, &file),
            None => response::respond_not_found(request),
        }
    }
}

/// Bound server ready to accept requests.
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
}

/// Bind the HTTP server without starting the request loop.
///
/// Registers the server with the shutdown handler so Ctrl+C can unblock the
/// accept loop.
pub fn bind_server(interface: IpAddr, port: u16) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(interface, port)?;
    let server = Arc::new(server);
    lifecycle::register_server(Arc::clone(&server));

    log!("serve"; "http://{}", addr);

    Ok(BoundServer { server, addr })
}

impl BoundServer {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the request loop until shutdown (blocking).
    pub fn run(self, provider: LocalDir) -> Result<()> {
        let provider = Arc::new(provider);

        // Thread pool so a slow disk read cannot block other requests
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .context("failed to create request thread pool")?;

        for request in self.server.incoming_requests() {
            let provider = Arc::clone(&provider);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &provider) {
                    log!("serve"; "request error: {e}");
                }
            });
        }

        Ok(())
    }
}

/// Handle a single HTTP request.
fn handle_request(request: Request, provider: &LocalDir) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    let handler = provider.handler();
    if handler.handles(request.url()) {
        return handler.respond(request);
    }

    // Everything outside the reserved prefix belongs to the application's
    // own router, which this server does not emulate.
    response::respond_not_found(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpStream;

    /// Send one raw HTTP request and split the reply into status, header
    /// lines and body.
    fn raw_request(
        addr: SocketAddr,
        method: &str,
        path: &str,
        extra_headers: &str,
    ) -> (u16, Vec<String>, Vec<u8>) {
        let mut stream = TcpStream::connect(addr).unwrap();
        write!(
            stream,
            "{method} {path} HTTP/1.1\r\nHost: localhost\r\n{extra_headers}Connection: close\r\n\r\n"
        )
        .unwrap();

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).unwrap();

        let body_start = buf
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .map(|i| i + 4)
            .unwrap();
        let head = String::from_utf8_lossy(&buf[..body_start]).into_owned();
        let status: u16 = head.split_whitespace().nth(1).unwrap().parse().unwrap();
        let headers = head.lines().skip(1).map(str::to_string).collect();
        (status, headers, buf[body_start..].to_vec())
    }

    fn fetch(addr: SocketAddr, path: &str) -> (u16, Vec<u8>) {
        let (status, _, body) = raw_request(addr, "GET", path, "");
        (status, body)
    }

    fn header_value(headers: &[String], name: &str) -> Option<String> {
        headers.iter().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }

    /// Spin up a server that answers `count` requests through a `/web`
    /// handler rooted at `root`, then exits.
    fn serve_requests(root: &std::path::Path, count: usize) -> (SocketAddr, std::thread::JoinHandle<()>) {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handler = PrefixServer::new("/web", root);

        let worker = std::thread::spawn(move || {
            for _ in 0..count {
                let request = server.recv().unwrap();
                handler.respond(request).unwrap();
            }
        });
        (addr, worker)
    }

    #[test]
    fn test_prefix_server_serves_files_over_http() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("app.wasm"), b"\0asm wasm-bytes").unwrap();

        let (addr, worker) = serve_requests(tmp.path(), 2);

        let (status, body) = fetch(addr, "/web/app.wasm");
        assert_eq!(status, 200);
        assert_eq!(body, b"\0asm wasm-bytes");

        let (status, _) = fetch(addr, "/web/missing.txt");
        assert_eq!(status, 404);

        worker.join().unwrap();
    }

    #[test]
    fn test_conditional_head_and_method_semantics() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("app.wasm"), b"01234567").unwrap();

        let (addr, worker) = serve_requests(tmp.path(), 6);

        // Plain GET carries the validator
        let (status, headers, body) = raw_request(addr, "GET", "/web/app.wasm", "");
        assert_eq!(status, 200);
        assert_eq!(body, b"01234567");
        let etag = header_value(&headers, "etag").expect("200 carries an ETag");

        // Revalidation with the same tag is a bodyless 304
        let (status, headers, body) = raw_request(
            addr,
            "GET",
            "/web/app.wasm",
            &format!("If-None-Match: {etag}\r\n"),
        );
        assert_eq!(status, 304);
        assert!(body.is_empty());
        assert_eq!(header_value(&headers, "etag").as_deref(), Some(etag.as_str()));

        // HEAD answers headers only
        let (status, headers, body) = raw_request(addr, "HEAD", "/web/app.wasm", "");
        assert_eq!(status, 200);
        assert!(body.is_empty());
        assert!(header_value(&headers, "content-type").is_some());
        assert!(header_value(&headers, "etag").is_some());

        // Byte window is streamed as a 206
        let (status, headers, body) =
            raw_request(addr, "GET", "/web/app.wasm", "Range: bytes=2-4\r\n");
        assert_eq!(status, 206);
        assert_eq!(body, b"234");
        assert_eq!(
            header_value(&headers, "content-range").as_deref(),
            Some("bytes 2-4/8")
        );

        // Unparseable Range is ignored, not answered with a bogus 206
        let (status, _, body) =
            raw_request(addr, "GET", "/web/app.wasm", "Range: bytes=garbage\r\n");
        assert_eq!(status, 200);
        assert_eq!(body, b"01234567");

        // Anything other than GET/HEAD is refused
        let (status, headers, _) =
            raw_request(addr, "POST", "/web/app.wasm", "Content-Length: 0\r\n");
        assert_eq!(status, 405);
        assert_eq!(header_value(&headers, "allow").as_deref(), Some("GET, HEAD"));

        worker.join().unwrap();
    }

    #[test]
    fn test_handles_requires_whole_segment() {
        let server = PrefixServer::new("/web", "web");
        assert!(server.handles("/web"));
        assert!(server.handles("/web/"));
        assert!(server.handles("/web/app.wasm"));
        assert!(server.handles("/web?v=1"));
        assert!(!server.handles("/webapp"));
        assert!(!server.handles("/website.png"));
        assert!(!server.handles("/"));
        assert!(!server.handles("/app.wasm"));
    }
}
