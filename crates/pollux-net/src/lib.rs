//! Gemini networking for Pollux.
//!
//! Three layers: [`trust`] pins certificates per host (trust-on-first-use),
//! [`tls`] wires the trust store into a rustls client configuration, and
//! [`client`] runs one blocking request/response cycle over it. Pure
//! request framing and status-line parsing live in [`gemini`].

pub mod client;
pub mod gemini;
pub mod tls;
pub mod trust;

pub use client::{GeminiClient, MAX_BODY_SIZE};
pub use gemini::{build_request, parse_response};
pub use trust::{TrustDecision, TrustStore};
