//! Instance configuration.
//!
//! A small TOML file supplies what the nameserver does not report about
//! the local installation: the configured site name, the primary master
//! endpoints per source site, and whether the deployment is
//! multi-tenant. A missing file is not an error; the report degrades to
//! whatever the nameserver knows.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use replistat_core::identity;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct InstanceConfig {
    #[serde(default)]
    pub system_replication: SystemReplicationSection,
    /// Primary master endpoints (`host:port`, space-separated) keyed by
    /// source site id.
    #[serde(default)]
    pub system_replication_site_masters: HashMap<String, String>,
    #[serde(default)]
    pub multidb: MultiDbSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct SystemReplicationSection {
    pub site_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MultiDbSection {
    pub mode: Option<String>,
}

impl InstanceConfig {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_path(),
        };

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            let config: InstanceConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(InstanceConfig::default())
        }
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("replistat")
            .join("config.toml")
    }

    pub fn site_name(&self) -> Option<&str> {
        self.system_replication.site_name.as_deref()
    }

    pub fn is_multidb(&self) -> bool {
        self.multidb.mode.as_deref() == Some("multidb")
    }

    /// Primary master hostnames for the given source site, port
    /// suffixes stripped and space-joined.
    pub fn primary_masters(&self, source_site_id: u32) -> Option<String> {
        self.system_replication_site_masters
            .get(&source_site_id.to_string())
            .map(|masters| identity::strip_ports(masters))
    }
}
