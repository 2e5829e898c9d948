//! Fake notification watcher for HTTP-level tests.
//!
//! Serves a single canned HTTP response on an ephemeral TCP port and records
//! the request it received, so tests can assert on both sides of the exchange
//! without a real watcher.

use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};

const ACCEPT_WINDOW: Duration = Duration::from_secs(2);
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// How the fake watcher answers the first request.
#[derive(Debug, Clone)]
pub(in crate::tests) enum Reply {
    /// Answer with `status` and a JSON `body`.
    Respond { status: u16, body: String },
    /// Accept the connection but stay silent for the given duration.
    Stall(Duration),
}

impl Reply {
    pub(in crate::tests) fn ok(body: impl Into<String>) -> Self {
        Self::Respond {
            status: 200,
            body: body.into(),
        }
    }
}

/// A request line and body captured by the fake watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(in crate::tests) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl RecordedRequest {
    /// `METHOD /path` summary used by assertions.
    pub(in crate::tests) fn route(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// A one-shot HTTP server standing in for the notification watcher.
pub(in crate::tests) struct FakeWatcher {
    port: u16,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    result: Arc<Mutex<Option<Result<()>>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeWatcher {
    /// Spawns a fake watcher that answers one connection with `reply`.
    pub fn spawn(reply: Reply) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake watcher")?;
        listener
            .set_nonblocking(true)
            .context("fake watcher nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::new(Mutex::new(Vec::new()));
        let result: Arc<Mutex<Option<Result<()>>>> = Arc::new(Mutex::new(None));
        let requests_clone = Arc::clone(&requests);
        let result_clone = Arc::clone(&result);
        let handle = thread::spawn(move || {
            let outcome = Self::serve_client(&listener, &reply, &requests_clone);
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(outcome);
            }
        });
        Ok(Self {
            port,
            requests,
            result,
            handle: Some(handle),
        })
    }

    /// Base URL to configure as the watcher's server URL.
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Waits for the watcher thread and returns the recorded requests.
    pub fn take_requests(&mut self) -> Result<Vec<RecordedRequest>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake watcher thread panicked"))?;
        }
        if let Some(outcome) = self
            .result
            .lock()
            .map_err(|error| anyhow!("lock fake watcher result: {error}"))?
            .take()
        {
            outcome.context("fake watcher failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve_client(
        listener: &TcpListener,
        reply: &Reply,
        requests: &Arc<Mutex<Vec<RecordedRequest>>>,
    ) -> Result<()> {
        let deadline = Instant::now() + ACCEPT_WINDOW;
        loop {
            match listener.accept() {
                Ok((stream, _)) => {
                    stream
                        .set_nonblocking(false)
                        .context("blocking client stream")?;
                    stream
                        .set_read_timeout(Some(ACCEPT_WINDOW))
                        .context("client read timeout")?;
                    let request = read_request(&stream)?;
                    requests
                        .lock()
                        .map_err(|error| anyhow!("lock requests: {error}"))?
                        .push(request);
                    return respond(stream, reply);
                }
                Err(ref error)
                    if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
                {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => {
                    // Nobody connected; exit so tests that never reach the
                    // watcher do not hang.
                    return Ok(());
                }
                Err(error) => return Err(error).context("accept connection"),
            }
        }
    }
}

impl Drop for FakeWatcher {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Returns a URL on a port nothing listens on.
pub(in crate::tests) fn unreachable_url() -> Result<String> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind probe listener")?;
    let port = listener.local_addr().context("probe addr")?.port();
    drop(listener);
    Ok(format!("http://127.0.0.1:{port}"))
}

fn read_request(mut stream: &TcpStream) -> Result<RecordedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        if let Some(position) = find(&buffer, HEADER_TERMINATOR) {
            break position;
        }
        let read = stream.read(&mut chunk).context("read request head")?;
        if read == 0 {
            return Err(anyhow!("client closed before sending a full request"));
        }
        buffer.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_owned();
    let path = parts.next().unwrap_or_default().to_owned();
    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer[header_end + HEADER_TERMINATOR.len()..].to_vec();
    while body.len() < content_length {
        let read = stream.read(&mut chunk).context("read request body")?;
        if read == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..read]);
    }

    Ok(RecordedRequest {
        method,
        path,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn respond(mut stream: TcpStream, reply: &Reply) -> Result<()> {
    match reply {
        Reply::Respond { status, body } => {
            let response = format!(
                "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                reason_phrase(*status),
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .context("write response")?;
            stream.flush().context("flush response")
        }
        Reply::Stall(duration) => {
            thread::sleep(*duration);
            Ok(())
        }
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
