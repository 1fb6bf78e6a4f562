//! Server settings: command line and environment over an optional TOML file.

use std::{collections::BTreeMap, fs, num::NonZeroUsize, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

#[derive(Debug, Parser)]
#[command(name = "smartroute-server", version, about = "Road routing HTTP server")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, env = "SMARTROUTE_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "SMARTROUTE_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "SMARTROUTE_PORT")]
    pub port: Option<u16>,

    /// Directory searched for `<place-slug>.osm.pbf` extracts
    #[arg(long, env = "SMARTROUTE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Explicit extract per place name, checked before `data_dir`
    pub places: BTreeMap<String, PathBuf>,
    pub request_timeout_secs: u64,
    /// Maximum number of cached places; unbounded when unset
    pub cache_capacity: Option<NonZeroUsize>,
    /// Places loaded before the server starts listening
    pub preload: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            data_dir: PathBuf::from("data"),
            places: BTreeMap::new(),
            request_timeout_secs: 30,
            cache_capacity: None,
            preload: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Reads the file named by `cli` (if any) and applies the flag overrides.
    ///
    /// # Errors
    ///
    /// Fails when the file can't be read or is not valid configuration TOML.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let config = match &cli.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                Self::from_toml_str(&text)
                    .with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => Self::default(),
        };
        Ok(config.with_overrides(cli))
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    #[must_use]
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(host) = &cli.host {
            self.host.clone_from(host);
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(data_dir) = &cli.data_dir {
            self.data_dir.clone_from(data_dir);
        }
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
