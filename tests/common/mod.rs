//! One-shot HTTP mock for driving the client and binary without the network.

#![allow(dead_code)]

use std::io::{ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread::{self, JoinHandle};

/// The request head captured by a [`MockServer`].
#[derive(Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    /// The decoded `input` query parameter.
    pub fn input(&self) -> Option<String> {
        let url = url::Url::parse(&format!("http://mock{}", self.target)).ok()?;
        url.query_pairs()
            .find(|(k, _)| k == "input")
            .map(|(_, v)| v.into_owned())
    }

    fn parse(head: &str) -> Self {
        let mut lines = head.split("\r\n");
        let mut request_line = lines.next().unwrap_or_default().split(' ');
        let method = request_line.next().unwrap_or_default().to_owned();
        let target = request_line.next().unwrap_or_default().to_owned();
        let headers = lines
            .take_while(|l| !l.is_empty())
            .filter_map(|l| l.split_once(':'))
            .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
            .collect();
        Self {
            method,
            target,
            headers,
        }
    }
}

/// Serves exactly one canned response, then records what it was sent.
pub struct MockServer {
    pub base_url: String,
    handle: JoinHandle<Option<String>>,
}

impl MockServer {
    pub fn respond(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
        let response = format!(
            "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            reason(status),
            body.len()
        );
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().ok()?;
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).ok()?;
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).ok()?;
            stream.flush().ok()?;
            Some(String::from_utf8_lossy(&head).into_owned())
        });
        Self { base_url, handle }
    }

    /// Wait for the served request and return its head.
    pub fn request(self) -> RecordedRequest {
        let head = self
            .handle
            .join()
            .expect("mock server panicked")
            .expect("mock server received no request");
        RecordedRequest::parse(&head)
    }
}

/// A listener that never answers, for asserting no request was attempted.
pub struct Sentinel {
    pub base_url: String,
    listener: TcpListener,
}

impl Sentinel {
    pub fn new() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind sentinel");
        listener
            .set_nonblocking(true)
            .expect("nonblocking sentinel");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
        Self { base_url, listener }
    }

    pub fn was_contacted(&self) -> bool {
        match self.listener.accept() {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::WouldBlock => false,
            Err(e) => panic!("sentinel accept failed: {e}"),
        }
    }
}

/// A base URL on which connections are refused.
pub fn refused_base_url() -> String {
    let addr: SocketAddr = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr")
    };
    format!("http://{addr}")
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

pub const AVAILABLE_ALICE: &str =
    r#"{"username":"alice","isReserved":false,"isDeleted":false,"categories":[]}"#;

pub const RESERVED_ADMIN: &str =
    r#"{"username":"admin","isReserved":true,"isDeleted":false,"categories":[{"category":"system"}]}"#;

pub const RESERVED_BERLIN: &str = r#"{"username":"berlin","isReserved":true,"isDeleted":false,"categories":[{"category":"city","metadata":{"country":"DE"}}]}"#;

pub fn problem(status: u16, title: &str, detail: &str, retry_after: Option<u64>) -> String {
    let mut doc = serde_json::json!({
        "type": "https://api.username.dev/problems/error",
        "title": title,
        "status": status,
        "detail": detail,
        "instance": "/check",
    });
    if let Some(secs) = retry_after {
        doc["retryAfter"] = serde_json::json!(secs);
    }
    doc.to_string()
}
