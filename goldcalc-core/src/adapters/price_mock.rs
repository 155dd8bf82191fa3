//! Mock price quote server for testing
//!
//! Serves both quote shapes the built-in sources understand:
//! - GET /XAU/{currency} returns { price_gram_24k: N, ... } (Gold-API)
//! - GET /latest?... returns { success: true, base: "XAU", rates: {...} } (MetalPriceAPI)

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use serde::Serialize;

/// Mock quote server for testing
pub struct MockPriceServer {
    port: u16,
    running: Arc<AtomicBool>,
    requests: Arc<AtomicUsize>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

/// Configuration for the mock responses
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Gold-API gram price
    pub price_gram_24k: f64,
    /// MetalPriceAPI troy ounce price
    pub price_per_ounce: f64,
    /// Currency keyed in the MetalPriceAPI rates map
    pub currency: String,
    /// HTTP status to answer with
    pub status: u16,
    /// Raw body to send instead of the generated one
    pub body_override: Option<String>,
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
    /// Close the connection after reading the request, without answering
    pub drop_connection: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            price_gram_24k: 9400.0,
            price_per_ounce: 292372.9,
            currency: "PHP".to_string(),
            status: 200,
            body_override: None,
            delay_ms: 0,
            drop_connection: false,
        }
    }
}

#[derive(Serialize)]
struct GoldApiQuote {
    metal: &'static str,
    currency: String,
    price_gram_24k: f64,
}

#[derive(Serialize)]
struct LatestRates {
    success: bool,
    base: &'static str,
    rates: std::collections::HashMap<String, f64>,
}

impl MockPriceServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let actual_port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let requests = Arc::new(AtomicUsize::new(0));
        let running_clone = running.clone();
        let requests_clone = requests.clone();

        // Non-blocking accept so the server can shut down
        listener.set_nonblocking(true)?;

        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        requests_clone.fetch_add(1, Ordering::SeqCst);
                        let cfg = config.clone();
                        thread::spawn(move || {
                            handle_connection(stream, &cfg);
                        });
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port: actual_port,
            running,
            requests,
            thread_handle: Some(thread_handle),
        })
    }

    /// Get the base URL for this mock server
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Number of connections accepted so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockPriceServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(mut stream: TcpStream, config: &MockConfig) {
    // Accepted sockets may inherit non-blocking mode on some platforms
    let _ = stream.set_nonblocking(false);
    let mut buffer = [0; 4096];

    let Ok(n) = stream.read(&mut buffer) else {
        return;
    };
    let request = String::from_utf8_lossy(&buffer[..n]);

    if config.drop_connection {
        let _ = stream.shutdown(std::net::Shutdown::Both);
        return;
    }

    if config.delay_ms > 0 {
        thread::sleep(std::time::Duration::from_millis(config.delay_ms));
    }

    let first_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 || parts[0] != "GET" {
        send_response(&mut stream, 405, r#"{"error": "Method not allowed"}"#);
        return;
    }

    if !(200..300).contains(&config.status) {
        send_response(&mut stream, config.status, r#"{"error": "Mock failure"}"#);
        return;
    }

    let path = parts[1].split('?').next().unwrap_or(parts[1]);

    if let Some(currency) = path.strip_prefix("/XAU/") {
        let has_valid_auth = request.to_lowercase().contains("x-access-token: goldapi-");
        if !has_valid_auth {
            send_response(&mut stream, 403, r#"{"error": "No API Key provided"}"#);
            return;
        }

        let body = config.body_override.clone().unwrap_or_else(|| {
            serde_json::to_string(&GoldApiQuote {
                metal: "XAU",
                currency: currency.to_string(),
                price_gram_24k: config.price_gram_24k,
            })
            .unwrap_or_default()
        });
        send_response(&mut stream, config.status, &body);
    } else if path == "/latest" {
        let body = config.body_override.clone().unwrap_or_else(|| {
            let mut rates = std::collections::HashMap::new();
            rates.insert(config.currency.clone(), config.price_per_ounce);
            serde_json::to_string(&LatestRates {
                success: true,
                base: "XAU",
                rates,
            })
            .unwrap_or_default()
        });
        send_response(&mut stream, config.status, &body);
    } else {
        send_response(&mut stream, 404, r#"{"error": "Endpoint not found"}"#);
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        203 => "Non-Authoritative Information",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        429 => "Too Many Requests",
        _ => "Error",
    }
}

fn send_response(stream: &mut TcpStream, status: u16, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text(status),
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_server_starts() {
        let server = MockPriceServer::start(MockConfig::default()).unwrap();
        assert!(server.base_url().starts_with("http://127.0.0.1:"));
        assert_eq!(server.requests(), 0);
    }
}
