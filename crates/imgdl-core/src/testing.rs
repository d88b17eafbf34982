//! Minimal HTTP/1.1 server for tests.
//!
//! Serves canned responses per request path from a background thread. Unknown
//! paths get 404. A route can be delayed, redirect elsewhere, or drop the
//! connection without answering to simulate a transport fault.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MockResponse {
    status: u16,
    body: Vec<u8>,
    location: Option<String>,
    delay: Option<Duration>,
    drop_connection: bool,
}

impl MockResponse {
    pub fn ok(body: Vec<u8>) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            body,
            location: None,
            delay: None,
            drop_connection: false,
        }
    }

    /// 302 pointing at `location`.
    pub fn redirect(location: &str) -> Self {
        Self {
            location: Some(location.to_string()),
            ..Self::status(302, Vec::new())
        }
    }

    /// Close the socket without writing a response.
    pub fn drop_connection() -> Self {
        Self {
            drop_connection: true,
            ..Self::status(0, Vec::new())
        }
    }

    /// Wait before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Default)]
struct State {
    routes: HashMap<String, MockResponse>,
    hits: HashMap<String, usize>,
}

/// Handle to a running server. The listener thread lives until the process exits.
#[derive(Clone)]
pub struct MockServer {
    base: String,
    state: Arc<Mutex<State>>,
}

impl MockServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let state = Arc::new(Mutex::new(State::default()));
        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&shared);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self {
            base: format!("http://127.0.0.1:{port}"),
            state,
        }
    }

    /// Register (or replace) the response for `path`.
    pub fn route(self, path: &str, response: MockResponse) -> Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert(path.to_string(), response);
        self
    }

    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Number of requests received for `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.state.lock().unwrap().hits.get(path).copied().unwrap_or(0)
    }

    /// URL on a loopback port with nothing listening (connection refused).
    pub fn unreachable_url(path: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);
        format!("http://127.0.0.1:{port}{path}")
    }
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));

    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let Some(path) = request_path(&request) else {
        return;
    };

    let response = {
        let mut st = state.lock().unwrap();
        *st.hits.entry(path.clone()).or_insert(0) += 1;
        st.routes.get(&path).cloned()
    };
    let response = response.unwrap_or_else(|| MockResponse::status(404, b"not found".to_vec()));

    if let Some(delay) = response.delay {
        thread::sleep(delay);
    }
    if response.drop_connection {
        return;
    }

    let location = response
        .location
        .as_deref()
        .map(|l| format!("Location: {l}\r\n"))
        .unwrap_or_default();
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: image/jpeg\r\n{}Connection: close\r\n\r\n",
        response.status,
        reason(response.status),
        response.body.len(),
        location
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&response.body);
    let _ = stream.flush();
}

/// Path of the request line, e.g. `/a.jpg` from `GET /a.jpg HTTP/1.1`.
fn request_path(request: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(request).ok()?;
    let line = text.lines().next()?;
    let mut parts = line.split_whitespace();
    let _method = parts.next()?;
    let target = parts.next()?;
    Some(target.split('?').next().unwrap_or(target).to_string())
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        206 => "Partial Content",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
