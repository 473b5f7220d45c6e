//! The nameserver boundary.
//!
//! Everything the tool knows about the deployment comes through
//! [`TopologyClient`]. The trait keeps the rest of the CLI testable and
//! makes every failure path explicit in the signature; callers absorb
//! errors into the status taxonomy instead of propagating them.

use std::time::Duration;

use replistat_core::ReplicationRow;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

const DEFAULT_URL: &str = "http://localhost:30001";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("nameserver request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("nameserver returned HTTP {status} for {path}")]
    Http { status: u16, path: String },
}

/// Replication role summary of the local system.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplicationInfo {
    pub mode: String,
    /// Number of secondary sites consuming from this one.
    #[serde(rename = "numConsumers")]
    pub consumer_count: u32,
}

/// One flat node of a config tree (`/datacenters/name`, `.../mode`,
/// `.../mappings`): a key, an optional display value, and child keys.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub children: Vec<String>,
}

/// Narrow interface to the per-process topology/nameserver client.
pub trait TopologyClient {
    /// Forces a real nameserver round-trip. Must be called before any
    /// other probe is trusted; prior calls say nothing about liveness.
    fn probe(&mut self) -> Result<(), ClientError>;

    /// Disaster-recovery mode of the local site, uppercased. Empty when
    /// system replication is not configured here.
    fn dr_mode(&self) -> Result<String, ClientError>;

    fn replication_info(&self) -> Result<ReplicationInfo, ClientError>;

    fn local_site_id(&self) -> Result<u32, ClientError>;

    /// Site id this system replicates from (secondaries only).
    fn source_site_id(&self) -> Result<u32, ClientError>;

    /// Hostname the local service endpoint binds to.
    fn service_host(&self) -> Result<String, ClientError>;

    /// Raw per-service replication rows. `secondary_active` engages the
    /// costlier probe of the secondary connection state; `host`
    /// restricts the result to one host's services.
    fn replication_rows(
        &self,
        secondary_active: bool,
        host: Option<&str>,
    ) -> Result<Vec<ReplicationRow>, ClientError>;

    /// Flat nodes of a config tree path.
    fn tree(&self, path: &str) -> Result<Vec<TreeEntry>, ClientError>;
}

#[derive(Debug, Deserialize)]
struct ModeResponse {
    mode: String,
}

#[derive(Debug, Deserialize)]
struct SiteIdResponse {
    #[serde(rename = "siteId")]
    site_id: u32,
}

#[derive(Debug, Deserialize)]
struct SourceSiteResponse {
    #[serde(rename = "sourceSiteId")]
    source_site_id: u32,
}

#[derive(Debug, Deserialize)]
struct ServiceHostResponse {
    host: String,
}

/// HTTP implementation talking to the nameserver's topology endpoint.
pub struct HttpTopologyClient {
    client: reqwest::blocking::Client,
    base_url: String,
    master_url: Option<String>,
}

impl HttpTopologyClient {
    pub fn new(url: Option<&str>, master_url: Option<&str>) -> Result<Self, ClientError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: url.unwrap_or(DEFAULT_URL).trim_end_matches('/').to_string(),
            master_url: master_url.map(|u| u.trim_end_matches('/').to_string()),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(ClientError::Http {
                status: response.status().as_u16(),
                path: path.to_string(),
            });
        }
        Ok(response.json()?)
    }

    fn ping(&self) -> Result<(), ClientError> {
        let url = format!("{}/topology/ping", self.base_url);
        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(ClientError::Http {
                status: response.status().as_u16(),
                path: "/topology/ping".to_string(),
            });
        }
        Ok(())
    }
}

impl TopologyClient for HttpTopologyClient {
    fn probe(&mut self) -> Result<(), ClientError> {
        match self.ping() {
            Ok(()) => Ok(()),
            Err(err) => {
                // One-shot fallback: the local endpoint may be a stopped
                // standby host while the master is still answering.
                let Some(master) = self.master_url.clone() else {
                    return Err(err);
                };
                if master == self.base_url {
                    return Err(err);
                }
                warn!(error = %err, master = %master, "nameserver unreachable, retrying against master");
                self.base_url = master;
                self.ping()
            }
        }
    }

    fn dr_mode(&self) -> Result<String, ClientError> {
        let response: ModeResponse = self.get_json("/topology/replication/mode")?;
        Ok(response.mode.to_uppercase())
    }

    fn replication_info(&self) -> Result<ReplicationInfo, ClientError> {
        self.get_json("/topology/replication/info")
    }

    fn local_site_id(&self) -> Result<u32, ClientError> {
        let response: SiteIdResponse = self.get_json("/topology/site/id")?;
        Ok(response.site_id)
    }

    fn source_site_id(&self) -> Result<u32, ClientError> {
        let response: SourceSiteResponse = self.get_json("/topology/site/source")?;
        Ok(response.source_site_id)
    }

    fn service_host(&self) -> Result<String, ClientError> {
        let response: ServiceHostResponse = self.get_json("/topology/service/host")?;
        Ok(response.host)
    }

    fn replication_rows(
        &self,
        secondary_active: bool,
        host: Option<&str>,
    ) -> Result<Vec<ReplicationRow>, ClientError> {
        let mut url = format!(
            "{}/topology/replication/status?secondaryActiveStatus={}",
            self.base_url,
            if secondary_active { "1" } else { "0" }
        );
        if let Some(host) = host {
            url.push_str("&host=");
            url.push_str(host);
        }
        debug!(%url, "fetching replication rows");
        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(ClientError::Http {
                status: response.status().as_u16(),
                path: "/topology/replication/status".to_string(),
            });
        }
        Ok(response.json()?)
    }

    fn tree(&self, path: &str) -> Result<Vec<TreeEntry>, ClientError> {
        let encoded = format!("/topology/tree?path={path}");
        self.get_json(&encoded)
    }
}
