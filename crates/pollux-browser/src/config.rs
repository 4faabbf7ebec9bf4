//! Browser configuration, loaded from an optional `pollux.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use pollux_types::Result;

/// Runtime configuration. Every field has a default, so an absent or
/// partial config file is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the per-host certificate pins.
    pub certs_dir: PathBuf,
    /// Extra directory searched for `about:` pages before the bundled
    /// ones.
    pub pages_dir: Option<PathBuf>,
    /// Address loaded when none is given on the command line.
    pub start_page: String,
    /// Redirect hops followed before giving up.
    pub max_redirects: usize,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Socket read timeout in seconds.
    pub read_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            certs_dir: PathBuf::from("./certs"),
            pages_dir: None,
            start_page: "about:newtab".to_string(),
            max_redirects: 5,
            connect_timeout_secs: 10,
            read_timeout_secs: 15,
        }
    }
}

impl Config {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Load `./pollux.toml` when present, otherwise the defaults.
    /// A malformed file is an error; a missing one is not.
    pub fn load_default() -> Result<Self> {
        let path = Path::new("pollux.toml");
        if path.is_file() {
            log::info!("loading configuration from {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
