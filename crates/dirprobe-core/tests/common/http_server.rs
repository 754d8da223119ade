//! Minimal HTTP/1.1 server for integration tests.
//!
//! Answers each GET with a fixed status chosen by request path (404 for
//! unknown paths). Paths listed as slow are held for `delay` before the
//! response is written, to exercise client timeouts. Redirect routes answer
//! 302 with a `Location` header. Paths are matched as sent on the wire, so
//! percent-encoded entries are registered encoded (e.g. "/a%20b").

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// Path (e.g. "/admin") -> status code.
    pub routes: HashMap<String, u16>,
    /// Paths whose response is delayed by `delay`.
    pub slow: Vec<String>,
    pub delay: Duration,
    /// Path -> `Location` target for a 302.
    pub redirects: HashMap<String, String>,
}

impl ServerOptions {
    pub fn route(mut self, path: &str, status: u16) -> Self {
        self.routes.insert(path.to_string(), status);
        self
    }

    pub fn redirect(mut self, path: &str, location: &str) -> Self {
        self.redirects.insert(path.to_string(), location.to_string());
        self
    }

    pub fn slow(mut self, path: &str, delay: Duration) -> Self {
        self.slow.push(path.to_string());
        self.delay = delay;
        self
    }
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start(opts: ServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let opts = Arc::new(opts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let opts = Arc::clone(&opts);
            thread::spawn(move || handle(stream, &opts));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

/// Returns a base URL on a port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, opts: &ServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");

    if opts.slow.iter().any(|p| p == path) {
        thread::sleep(opts.delay);
    }
    if let Some(location) = opts.redirects.get(path) {
        let response = format!(
            "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            location
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }
    let status = opts.routes.get(path).copied().unwrap_or(404);
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
        status,
        reason(status)
    );
    let _ = stream.write_all(response.as_bytes());
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
