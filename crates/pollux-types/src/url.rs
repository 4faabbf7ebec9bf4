//! Address parsing and relative-link resolution.
//!
//! A Pollux [`Address`] names one of three content sources: a remote
//! Gemini host, a local file, or a built-in page. Parsing is a small
//! hand-rolled splitter (scheme, authority, path, query); resolution
//! implements the single-level relative join the Gemini protocol needs.

use std::fmt;

use crate::error::{PolluxError, Result};

/// Standard Gemini port, used when the address carries none.
pub const DEFAULT_PORT: u16 = 1965;

/// Which content source an address names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Remote fetch over TLS (the default when no scheme is written).
    Gemini,
    /// Local filesystem read.
    File,
    /// Built-in bundled page.
    About,
}

/// A fully-qualified address.
///
/// `host` is meaningful only for [`Scheme::Gemini`]; for `File` the path
/// is a filesystem path and for `About` it is the page name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub scheme: Scheme,
    pub host: String,
    pub port: Option<u16>,
    /// Path component, normalized to start with `/` for Gemini addresses.
    pub path: String,
    /// Query string without the leading `?`.
    pub query: Option<String>,
}

impl Address {
    /// Parse a user-typed string or an absolute link target.
    ///
    /// `about:` and `file:` prefixes select the built-in and local-file
    /// schemes; anything else is treated as a Gemini address, with the
    /// `gemini://` separator synthesized when absent.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PolluxError::Address("empty address".into()));
        }

        if let Some(page) = input.strip_prefix("about:") {
            return Ok(Address {
                scheme: Scheme::About,
                host: String::new(),
                port: None,
                path: page.to_string(),
                query: None,
            });
        }

        if let Some(path) = input
            .strip_prefix("file://")
            .or_else(|| input.strip_prefix("file:"))
        {
            return Ok(Address {
                scheme: Scheme::File,
                host: String::new(),
                port: None,
                path: path.to_string(),
                query: None,
            });
        }

        // Bare network address: synthesize the scheme separator.
        let full = if input.contains("://") {
            input.to_string()
        } else {
            format!("gemini://{input}")
        };

        let (scheme, rest) = match full.find("://") {
            Some(i) => (&full[..i], &full[i + 3..]),
            None => return Err(PolluxError::Address(format!("unparseable address: {input}"))),
        };
        if scheme != "gemini" {
            return Err(PolluxError::Address(format!("unsupported scheme: {scheme}")));
        }

        Self::parse_authority_and_path(rest)
    }

    /// Parse `host[:port]/path?query` after the scheme has been stripped.
    fn parse_authority_and_path(rest: &str) -> Result<Self> {
        // Gemini has no fragments; discard one if present.
        let rest = rest.split('#').next().unwrap_or(rest);

        let (rest, query) = match rest.find('?') {
            Some(i) => (&rest[..i], Some(rest[i + 1..].to_string())),
            None => (rest, None),
        };

        let (authority, path) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, "/"),
        };

        let (host, port) = match authority.rfind(':') {
            Some(i) => {
                let port = authority[i + 1..]
                    .parse::<u16>()
                    .map_err(|_| PolluxError::Address(format!("bad port in: {authority}")))?;
                (&authority[..i], Some(port))
            },
            None => (authority, None),
        };

        if host.is_empty() {
            return Err(PolluxError::Address("missing host".into()));
        }

        Ok(Address {
            scheme: Scheme::Gemini,
            host: host.to_string(),
            port,
            path: path.to_string(),
            query,
        })
    }

    /// Resolve a link target against this address.
    ///
    /// Absolute targets (any scheme marker) parse directly. Targets
    /// starting with `/` replace the path. Anything else is appended
    /// after truncating the current path at its last `/`.
    pub fn resolve(&self, target: &str) -> Result<Self> {
        let target = target.trim();
        if target.is_empty() {
            return Ok(self.clone());
        }

        if target.contains("://")
            || target.starts_with("about:")
            || target.starts_with("file:")
        {
            return Self::parse(target);
        }

        let (path, query) = match target.find('?') {
            Some(i) => (&target[..i], Some(target[i + 1..].to_string())),
            None => (target, None),
        };

        let path = if let Some(abs) = path.strip_prefix('/') {
            format!("/{abs}")
        } else {
            format!("{}{}", self.directory(), path)
        };

        Ok(Address {
            scheme: self.scheme,
            host: self.host.clone(),
            port: self.port,
            path,
            query,
        })
    }

    /// Directory portion of the path, up to and including the last `/`.
    pub fn directory(&self) -> &str {
        match self.path.rfind('/') {
            Some(i) => &self.path[..=i],
            None => "/",
        }
    }

    /// Port to connect to, defaulting to the protocol's standard port.
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

impl fmt::Display for Address {
    /// Canonical form, identical to the wire request for Gemini
    /// addresses: `gemini://host[:port]/path[?query]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scheme {
            Scheme::About => write!(f, "about:{}", self.path),
            Scheme::File => write!(f, "file://{}", self.path),
            Scheme::Gemini => {
                write!(f, "gemini://{}", self.host)?;
                if let Some(port) = self.port {
                    write!(f, ":{port}")?;
                }
                write!(f, "{}", self.path)?;
                if let Some(ref q) = self.query {
                    if !q.is_empty() {
                        write!(f, "?{q}")?;
                    }
                }
                Ok(())
            },
        }
    }
}
