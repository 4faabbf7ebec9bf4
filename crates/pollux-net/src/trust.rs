//! Trust-on-first-use certificate store.
//!
//! One file per host under the certificate directory, holding the raw
//! DER bytes of the certificate that host presented on first contact.
//! Records are compared by exact byte equality and are never reparsed,
//! never expired, and never overwritten automatically: a later mismatch
//! is reported as [`TrustDecision::PinMismatch`] and the caller must
//! refuse the connection.

use std::fs;
use std::path::{Path, PathBuf};

use pollux_types::Result;

/// Outcome of evaluating a presented certificate for a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustDecision {
    /// The standard trust chain verified the certificate; no pinning.
    ChainVerified,
    /// No record existed; the certificate was pinned and accepted.
    FirstUse,
    /// A record existed and matched byte for byte.
    PinMatch,
    /// A record existed and did NOT match. The connection must fail.
    PinMismatch,
}

impl TrustDecision {
    /// Whether the connection may proceed.
    pub fn is_trusted(self) -> bool {
        self != TrustDecision::PinMismatch
    }
}

/// Filesystem-backed pin store.
#[derive(Debug, Clone)]
pub struct TrustStore {
    dir: PathBuf,
}

impl TrustStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the pin records.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Deterministic record file for a host.
    fn record_path(&self, host: &str) -> PathBuf {
        let safe: String = host
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.crt"))
    }

    /// Pinned certificate bytes for a host, if any.
    pub fn pinned(&self, host: &str) -> Option<Vec<u8>> {
        fs::read(self.record_path(host)).ok()
    }

    /// Apply the TOFU policy to a presented certificate.
    ///
    /// `chain_ok` is the result of standard chain verification; when it
    /// holds, the certificate is accepted without touching the store.
    /// Otherwise an existing pin decides, and an absent pin is created
    /// from the presented bytes.
    pub fn evaluate(&self, host: &str, presented: &[u8], chain_ok: bool) -> Result<TrustDecision> {
        if chain_ok {
            return Ok(TrustDecision::ChainVerified);
        }

        match self.pinned(host) {
            Some(stored) if stored == presented => {
                log::debug!("pinned certificate for {host} matches");
                Ok(TrustDecision::PinMatch)
            },
            Some(_) => {
                log::warn!("pinned certificate for {host} does NOT match; refusing");
                Ok(TrustDecision::PinMismatch)
            },
            None => {
                fs::write(self.record_path(host), presented)?;
                log::info!("pinned new certificate for {host}");
                Ok(TrustDecision::FirstUse)
            },
        }
    }
}
