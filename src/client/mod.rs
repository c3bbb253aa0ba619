//! Remote graph client
//!
//! The crawler only sees the node through the [`GraphClient`] trait. The HTTP
//! implementation talks to the node's `/api/v0` RPC endpoints and validates
//! every body at the boundary, so the walkers never handle untyped JSON.

mod error;
mod http;
pub mod wire;

pub use error::{RemoteQueryError, RemoteResult};
pub use http::HttpGraphClient;

use strum::{Display, EnumProperty};

use crate::types::{Cid, DagNode, Listing, NodeStat};

/// Query operations supported by the remote node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumProperty)]
pub enum Operation {
    #[strum(to_string = "ls")]
    #[strum(props(endpoint = "ls", ipfs_path = "false"))]
    List,

    #[strum(to_string = "files/stat")]
    #[strum(props(endpoint = "files/stat", ipfs_path = "true"))]
    Stat,

    #[strum(to_string = "dag/get")]
    #[strum(props(endpoint = "dag/get", ipfs_path = "true"))]
    DagGet,
}

impl Operation {
    /// Endpoint path relative to `/api/v0/`
    pub fn endpoint(&self) -> &'static str {
        self.get_str("endpoint").unwrap_or_default()
    }

    /// Value of the `arg` query parameter for a CID
    pub fn argument(&self, cid: &Cid) -> String {
        if self.get_str("ipfs_path") == Some("true") {
            format!("/ipfs/{}", cid)
        } else {
            cid.to_string()
        }
    }
}

/// Trait for anything that can answer the three graph queries
pub trait GraphClient {
    /// List the named children of a directory-type node
    fn list_children(&self, cid: &Cid) -> RemoteResult<Listing>;

    /// Fetch cumulative size and block count of a node
    fn stat_node(&self, cid: &Cid) -> RemoteResult<NodeStat>;

    /// Fetch the raw DAG view of a node
    fn get_dag_node(&self, cid: &Cid) -> RemoteResult<DagNode>;
}

impl<C: GraphClient + ?Sized> GraphClient for &C {
    fn list_children(&self, cid: &Cid) -> RemoteResult<Listing> {
        (**self).list_children(cid)
    }

    fn stat_node(&self, cid: &Cid) -> RemoteResult<NodeStat> {
        (**self).stat_node(cid)
    }

    fn get_dag_node(&self, cid: &Cid) -> RemoteResult<DagNode> {
        (**self).get_dag_node(cid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_arguments() {
        let cid = Cid::from("bafyexample");
        assert_eq!(Operation::List.argument(&cid), "bafyexample");
        assert_eq!(Operation::Stat.argument(&cid), "/ipfs/bafyexample");
        assert_eq!(Operation::DagGet.argument(&cid), "/ipfs/bafyexample");
        assert_eq!(Operation::Stat.endpoint(), "files/stat");
        assert_eq!(Operation::DagGet.to_string(), "dag/get");
    }
}
