//! Blocking Gemini request/response cycle.
//!
//! One request in flight at a time; every request opens a fresh TCP +
//! TLS channel and tears it down after the response, including between
//! redirect hops. There is no mid-request cancellation — a stalled peer
//! is bounded by the socket read timeout.

use std::io::{ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use rustls::{ClientConnection, StreamOwned};
use rustls_pki_types::ServerName;

use pollux_types::{Address, PolluxError, Response, Result, Scheme};

use crate::gemini::{build_request, parse_response};
use crate::tls::{self, TofuVerifier};
use crate::trust::TrustStore;

/// Maximum response size (2 MB).
pub const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

/// TCP connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Socket read timeout.
const READ_TIMEOUT: Duration = Duration::from_secs(15);

/// Reusable Gemini client: one TLS configuration per process.
pub struct GeminiClient {
    config: Arc<rustls::ClientConfig>,
    verifier: Arc<TofuVerifier>,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl GeminiClient {
    /// Build a client around a trust store.
    pub fn new(store: TrustStore) -> Result<Self> {
        let (config, verifier) = tls::client_config(store)?;
        Ok(Self {
            config,
            verifier,
            connect_timeout: CONNECT_TIMEOUT,
            read_timeout: READ_TIMEOUT,
        })
    }

    /// Override the default transport timeouts.
    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }

    /// Run one full request cycle for a network address.
    pub fn fetch(&self, addr: &Address) -> Result<Response> {
        if addr.scheme != Scheme::Gemini {
            return Err(PolluxError::Address(format!("not a network address: {addr}")));
        }
        if addr.host.is_empty() {
            return Err(PolluxError::Address("missing host".into()));
        }

        log::debug!("fetching {addr}");
        let tcp = tcp_connect(
            &addr.host,
            addr.port_or_default(),
            self.connect_timeout,
            self.read_timeout,
        )?;

        let sni = ServerName::try_from(addr.host.clone())
            .map_err(|e| PolluxError::Transport(format!("invalid server name: {e}")))?;
        let conn = ClientConnection::new(Arc::clone(&self.config), sni)
            .map_err(|e| PolluxError::Transport(format!("TLS init: {e}")))?;
        let mut stream = StreamOwned::new(conn, tcp);

        let raw = match exchange(&mut stream, &build_request(addr)) {
            Ok(raw) => raw,
            Err(e) => {
                // The handshake runs lazily inside the first write; a
                // pin mismatch surfaces here as a generic TLS failure.
                if let Some(host) = self.verifier.take_mismatch() {
                    return Err(PolluxError::TrustMismatch { host });
                }
                return Err(e);
            },
        };

        stream.conn.send_close_notify();
        let _ = stream.conn.complete_io(&mut stream.sock);

        let resp = parse_response(&raw);
        log::debug!("{addr} -> status {}", resp.status.0);
        Ok(resp)
    }
}

/// Write the request line, then read the whole response.
///
/// Reads until EOF, growing the buffer up to [`MAX_BODY_SIZE`]. A read
/// timeout aborts the request as a transport error; a stalled peer must
/// never pass off what it sent so far as a complete response.
fn exchange<S: Read + Write>(stream: &mut S, request: &[u8]) -> Result<Vec<u8>> {
    stream
        .write_all(request)
        .map_err(|e| PolluxError::Transport(format!("send: {e}")))?;
    stream
        .flush()
        .map_err(|e| PolluxError::Transport(format!("send: {e}")))?;

    let mut buf = Vec::with_capacity(8192);
    let mut chunk = [0u8; 8192];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                if buf.len() + n > MAX_BODY_SIZE {
                    return Err(PolluxError::Protocol("response too large".into()));
                }
                buf.extend_from_slice(&chunk[..n]);
            },
            // Many Gemini servers close without a TLS close_notify,
            // which rustls reports as UnexpectedEof; treat that as a
            // normal end of stream.
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
            // The socket read timeout surfaces as WouldBlock or
            // TimedOut depending on the platform.
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return Err(PolluxError::Transport("read timed out".into()));
            },
            Err(e) => return Err(PolluxError::Transport(format!("receive: {e}"))),
        }
    }
    Ok(buf)
}

/// Open a TCP connection with a connect timeout and a read timeout.
fn tcp_connect(
    host: &str,
    port: u16,
    connect_timeout: Duration,
    read_timeout: Duration,
) -> Result<TcpStream> {
    let addr = format!("{host}:{port}")
        .to_socket_addrs()
        .map_err(|e| PolluxError::Transport(format!("DNS resolution failed: {e}")))?
        .next()
        .ok_or_else(|| PolluxError::Transport(format!("no addresses for {host}:{port}")))?;

    let stream = TcpStream::connect_timeout(&addr, connect_timeout)
        .map_err(|e| PolluxError::Transport(format!("TCP connect failed: {e}")))?;
    stream
        .set_read_timeout(Some(read_timeout))
        .map_err(|e| PolluxError::Transport(format!("set read timeout: {e}")))?;

    Ok(stream)
}
