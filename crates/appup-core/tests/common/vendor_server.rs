//! Minimal HTTP/1.1 server standing in for the vendor API and CDN.
//!
//! Routes:
//! - `GET /api/download` → `{"downloadUrl": "<base>/files/<name>"}` (or a custom body)
//! - `HEAD /files/<name>` → `Content-Length` and `ETag`
//!
//! `VendorOptions` can make the API or the HEAD stall, or make the HEAD
//! answer without headers.
//! - `GET /files/<name>` → the artifact body
//! - `GET /icon.png` → a few PNG bytes

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
pub struct VendorOptions {
    pub artifact_name: String,
    /// ETag header value (sent quoted); None omits the header.
    pub etag: Option<String>,
    /// Replaces the API JSON body when set.
    pub api_body: Option<String>,
    /// Advertise a larger Content-Length on GET than is sent (short transfer).
    pub truncate_get: bool,
    /// Hold `/api/download` open without answering for [`STALL`].
    pub stall_api: bool,
    /// Hold the artifact HEAD open without answering for [`STALL`].
    pub stall_head: bool,
    /// Answer the artifact HEAD with bytes that carry no status line or headers.
    pub head_without_headers: bool,
}

/// How long a stalled route keeps the client waiting.
pub const STALL: std::time::Duration = std::time::Duration::from_secs(4);

impl Default for VendorOptions {
    fn default() -> Self {
        Self {
            artifact_name: "Cursor-1.2.4-x86_64.AppImage".to_string(),
            etag: None,
            api_body: None,
            truncate_get: false,
            stall_api: false,
            stall_head: false,
            head_without_headers: false,
        }
    }
}

pub struct VendorServer {
    pub base: String,
    artifact_gets: Arc<AtomicUsize>,
}

impl VendorServer {
    pub fn api_url(&self) -> String {
        format!("{}api/download", self.base)
    }

    pub fn icon_url(&self) -> String {
        format!("{}icon.png", self.base)
    }

    /// Number of GET requests for the artifact body served so far.
    pub fn artifact_gets(&self) -> usize {
        self.artifact_gets.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start(body: Vec<u8>, opts: VendorOptions) -> VendorServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base = format!("http://127.0.0.1:{}/", port);
    let body = Arc::new(body);
    let artifact_gets = Arc::new(AtomicUsize::new(0));
    let gets = Arc::clone(&artifact_gets);
    let server_base = base.clone();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let gets = Arc::clone(&gets);
            let opts = opts.clone();
            let base = server_base.clone();
            thread::spawn(move || handle(stream, &body, &opts, &base, &gets));
        }
    });
    VendorServer {
        base,
        artifact_gets,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    body: &[u8],
    opts: &VendorOptions,
    base: &str,
    gets: &AtomicUsize,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");
    let artifact_path = format!("/files/{}", opts.artifact_name);

    let etag_header = opts
        .etag
        .as_ref()
        .map(|e| format!("ETag: \"{}\"\r\n", e))
        .unwrap_or_default();

    if path == "/api/download" && method.eq_ignore_ascii_case("GET") {
        if opts.stall_api {
            thread::sleep(STALL);
            return;
        }
        let json = opts.api_body.clone().unwrap_or_else(|| {
            format!(
                "{{\"downloadUrl\":\"{}files/{}\"}}",
                base, opts.artifact_name
            )
        });
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            json.len(),
            json
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if path == artifact_path && method.eq_ignore_ascii_case("HEAD") {
        if opts.stall_head {
            thread::sleep(STALL);
            return;
        }
        if opts.head_without_headers {
            let _ = stream.write_all(b"garbage\n");
            return;
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n{}\r\n",
            body.len(),
            etag_header
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if path == artifact_path && method.eq_ignore_ascii_case("GET") {
        gets.fetch_add(1, Ordering::SeqCst);
        let (advertised, slice) = if opts.truncate_get {
            (body.len(), &body[..body.len() / 2])
        } else {
            (body.len(), body)
        };
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
            advertised, etag_header
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.write_all(slice);
        return;
    }

    if path == "/icon.png" && method.eq_ignore_ascii_case("GET") {
        let png = b"\x89PNG\r\n\x1a\n";
        let response = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n", png.len());
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.write_all(png);
        return;
    }

    let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
}
