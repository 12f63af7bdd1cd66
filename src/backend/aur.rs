//! Remote package index lookups over the AUR RPC interface
//!
//! Lookups are bulk `info` requests. Names are split into chunks so a
//! single request URL stays within what the server accepts.

use crate::config::schema::RemoteConfig;
use crate::error::{PkgCacheError, PkgCacheResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// A package record published in the remote index
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemotePackage {
    /// Package name
    #[serde(rename = "Name")]
    pub name: String,
    /// Base the package is built from
    #[serde(rename = "PackageBase")]
    pub package_base: String,
}

/// Bulk metadata lookup against a remote package index
#[async_trait]
pub trait RemoteIndex: Send + Sync {
    /// Look up every name; names unknown to the index are simply absent
    async fn query(&self, names: &[String]) -> PkgCacheResult<Vec<RemotePackage>>;
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    results: Vec<RemotePackage>,
}

/// Remote index client for the AUR RPC v5 interface
pub struct AurRpc {
    agent: ureq::Agent,
    url: String,
    batch_size: usize,
}

impl AurRpc {
    /// Create a client from config
    pub fn new(config: &RemoteConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();

        Self {
            agent,
            url: config.rpc_url.clone(),
            batch_size: config.batch_size.max(1),
        }
    }

    /// Fetch one chunk of names. ureq blocks, so this runs off the runtime.
    async fn fetch(&self, names: Vec<String>) -> PkgCacheResult<String> {
        let agent = self.agent.clone();
        let url = self.url.clone();

        tokio::task::spawn_blocking(move || {
            let mut request = agent.get(&url).query("v", "5").query("type", "info");
            for name in &names {
                request = request.query("arg[]", name);
            }

            let mut response = request
                .call()
                .map_err(|e| PkgCacheError::RemoteQuery(format!("{}: {}", url, e)))?;

            response
                .body_mut()
                .read_to_string()
                .map_err(|e| PkgCacheError::RemoteQuery(format!("reading response: {}", e)))
        })
        .await
        .map_err(|e| PkgCacheError::RemoteQuery(format!("query task failed: {}", e)))?
    }
}

impl Default for AurRpc {
    fn default() -> Self {
        Self::new(&RemoteConfig::default())
    }
}

#[async_trait]
impl RemoteIndex for AurRpc {
    async fn query(&self, names: &[String]) -> PkgCacheResult<Vec<RemotePackage>> {
        let mut packages = Vec::new();

        for chunk in names.chunks(self.batch_size) {
            debug!("Querying remote index for {} name(s)", chunk.len());
            let body = self.fetch(chunk.to_vec()).await?;
            packages.extend(parse_response(&body)?);
        }

        Ok(packages)
    }
}

/// Decode an RPC response body into package records
fn parse_response(body: &str) -> PkgCacheResult<Vec<RemotePackage>> {
    let response: RpcResponse = serde_json::from_str(body)
        .map_err(|e| PkgCacheError::RemoteQuery(format!("malformed response: {}", e)))?;

    if response.kind == "error" {
        return Err(PkgCacheError::RemoteQuery(
            response
                .error
                .unwrap_or_else(|| "unspecified RPC error".to_string()),
        ));
    }

    Ok(response.results)
}
