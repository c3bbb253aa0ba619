//! HTTP implementation of the graph client

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

use super::error::{RemoteQueryError, RemoteResult};
use super::wire;
use super::{GraphClient, Operation};
use crate::types::{Cid, DagNode, Listing, NodeStat};

/// Graph client talking to a node's `/api/v0` RPC endpoints
pub struct HttpGraphClient {
    client: Client,
    base_url: Url,
}

impl HttpGraphClient {
    /// Create a client for a `host:port` node address
    pub fn new(node_address: &str, timeout: Option<Duration>) -> RemoteResult<Self> {
        let base_url = Self::base_url(node_address)?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    /// Build the RPC base URL for a `host:port` node address
    pub fn base_url(node_address: &str) -> RemoteResult<Url> {
        let url = Url::parse(&format!("http://{}/api/v0/", node_address))
            .map_err(|e| RemoteQueryError::InvalidAddress(format!("{}: {}", node_address, e)))?;

        if url.host_str().map_or(true, str::is_empty) {
            return Err(RemoteQueryError::InvalidAddress(format!(
                "{}: missing host",
                node_address
            )));
        }

        Ok(url)
    }

    /// Issue one query and return the raw body of a successful response
    fn call(&self, operation: Operation, cid: &Cid) -> RemoteResult<Vec<u8>> {
        let url = self
            .base_url
            .join(operation.endpoint())
            .map_err(|e| RemoteQueryError::InvalidAddress(e.to_string()))?;

        debug!(%operation, %cid, "querying node");

        let response = self
            .client
            .post(url)
            .query(&[("arg", operation.argument(cid))])
            .send()?;

        // Check response status
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error message".to_string());

            return Err(RemoteQueryError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        Ok(response.bytes()?.to_vec())
    }
}

impl GraphClient for HttpGraphClient {
    fn list_children(&self, cid: &Cid) -> RemoteResult<Listing> {
        wire::parse_listing(&self.call(Operation::List, cid)?)
    }

    fn stat_node(&self, cid: &Cid) -> RemoteResult<NodeStat> {
        wire::parse_stat(&self.call(Operation::Stat, cid)?)
    }

    fn get_dag_node(&self, cid: &Cid) -> RemoteResult<DagNode> {
        wire::parse_dag_node(&self.call(Operation::DagGet, cid)?)
    }
}
