//! Error types for Pollux.

use std::io;

/// Errors produced by the Pollux client.
#[derive(Debug, thiserror::Error)]
pub enum PolluxError {
    /// The user-supplied or link address is unusable (e.g. missing host).
    #[error("address error: {0}")]
    Address(String),

    /// TCP connect, TLS handshake, send, or receive failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// A pinned certificate for this host no longer matches the one the
    /// server presented. The connection is refused.
    #[error("certificate mismatch for {host}: presented certificate does not match pinned record")]
    TrustMismatch { host: String },

    /// Redirect chain exceeded the hop cap or revisited an address.
    #[error("redirect loop: {0}")]
    RedirectLoop(String),

    /// The remote broke protocol framing badly enough that no status
    /// line could be recovered.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("terminal error: {0}")]
    Terminal(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PolluxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_error_display() {
        let e = PolluxError::Address("empty host".into());
        assert_eq!(format!("{e}"), "address error: empty host");
    }

    #[test]
    fn transport_error_display() {
        let e = PolluxError::Transport("connect refused".into());
        assert_eq!(format!("{e}"), "transport error: connect refused");
    }

    #[test]
    fn trust_mismatch_names_host() {
        let e = PolluxError::TrustMismatch {
            host: "example.org".into(),
        };
        let msg = format!("{e}");
        assert!(msg.contains("example.org"));
        assert!(msg.contains("pinned"));
    }

    #[test]
    fn redirect_loop_display() {
        let e = PolluxError::RedirectLoop("gemini://a/ revisited".into());
        assert!(format!("{e}").starts_with("redirect loop"));
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: PolluxError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("not [[[ valid").unwrap_err();
        let e: PolluxError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn result_alias_round_trip() {
        let ok: Result<u8> = Ok(7);
        assert_eq!(ok.unwrap(), 7);
        let err: Result<u8> = Err(PolluxError::Config("missing key".into()));
        assert!(err.is_err());
    }
}
