//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed table of routes keyed by request path. Each connection
//! handles one request and is closed after the response.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Route {
    /// Respond with `status` and `body`.
    Body { status: u16, body: Vec<u8> },
    /// Sleep before responding 200 with `body`.
    Delayed { delay: Duration, body: Vec<u8> },
    /// Announce `announced` bytes in Content-Length, send `body`, close.
    Truncated { announced: usize, body: Vec<u8> },
    /// First `failures` requests get 503, later ones 200 with `body`.
    FailFirst { failures: u32, body: Vec<u8> },
}

impl Route {
    pub fn ok(body: &[u8]) -> Self {
        Route::Body {
            status: 200,
            body: body.to_vec(),
        }
    }

    pub fn status(status: u16) -> Self {
        Route::Body {
            status,
            body: b"error".to_vec(),
        }
    }
}

struct Server {
    routes: HashMap<String, Route>,
    hits: HashMap<String, AtomicU32>,
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Unknown paths get 404.
pub fn start(routes: Vec<(&str, Route)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let server = Arc::new(Server {
        hits: routes
            .iter()
            .map(|(p, _)| (p.to_string(), AtomicU32::new(0)))
            .collect(),
        routes: routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    });
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let server = Arc::clone(&server);
            thread::spawn(move || handle(stream, &server));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

fn respond(stream: &mut TcpStream, status: u16, announced: usize, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        announced
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}

fn handle(mut stream: TcpStream, server: &Server) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let path = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    let Some(route) = server.routes.get(&path) else {
        respond(&mut stream, 404, 9, b"not found");
        return;
    };
    let hit = server.hits[&path].fetch_add(1, Ordering::SeqCst);
    match route {
        Route::Body { status, body } => respond(&mut stream, *status, body.len(), body),
        Route::Delayed { delay, body } => {
            thread::sleep(*delay);
            respond(&mut stream, 200, body.len(), body);
        }
        Route::Truncated { announced, body } => respond(&mut stream, 200, *announced, body),
        Route::FailFirst { failures, body } => {
            if hit < *failures {
                respond(&mut stream, 503, 4, b"busy");
            } else {
                respond(&mut stream, 200, body.len(), body);
            }
        }
    }
}
