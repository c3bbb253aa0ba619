//! Response bodies of the node's RPC endpoints and their conversion into
//! the crawler's typed values.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::error::{RemoteQueryError, RemoteResult};
use crate::types::{Cid, DagLink, DagNode, EntryKind, Listing, ListingEntry, NodeStat};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LsResponse {
    objects: Option<Vec<LsObject>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LsObject {
    links: Option<Vec<LsLink>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LsLink {
    name: String,
    hash: String,
    #[serde(default)]
    size: u64,
    #[serde(rename = "Type")]
    kind: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StatResponse {
    cumulative_size: Option<u64>,
    blocks: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct DagGetLink {
    #[serde(rename = "Hash")]
    hash: CidLink,
    #[serde(rename = "Tsize", default)]
    tsize: u64,
}

#[derive(Debug, Deserialize)]
struct CidLink {
    #[serde(rename = "/")]
    cid: String,
}

/// Parse an `ls` body. A body without `Objects` is an empty listing.
pub fn parse_listing(body: &[u8]) -> RemoteResult<Listing> {
    let response: LsResponse = serde_json::from_slice(body)?;

    let Some(objects) = response.objects else {
        debug!("{}", RemoteQueryError::MissingField("Objects"));
        return Ok(Listing::default());
    };

    let entries = objects
        .into_iter()
        .flat_map(|object| object.links.unwrap_or_default())
        .map(|link| ListingEntry {
            name: link.name,
            cid: Cid::from(link.hash),
            size: link.size,
            kind: EntryKind::from_type_code(link.kind),
        })
        .collect();

    Ok(Listing { entries })
}

/// Parse a `files/stat` body. Both counters are required.
pub fn parse_stat(body: &[u8]) -> RemoteResult<NodeStat> {
    let response: StatResponse = serde_json::from_slice(body)?;

    Ok(NodeStat {
        cumulative_size: response
            .cumulative_size
            .ok_or(RemoteQueryError::MissingField("CumulativeSize"))?,
        blocks: response
            .blocks
            .ok_or(RemoteQueryError::MissingField("Blocks"))?,
    })
}

/// Parse a `dag/get` body. Anything without a non-empty `Links` array is a
/// terminal block.
pub fn parse_dag_node(body: &[u8]) -> RemoteResult<DagNode> {
    let value: Value = serde_json::from_slice(body)?;

    let links = match value.get("Links") {
        None | Some(Value::Null) => {
            debug!("{}", RemoteQueryError::MissingField("Links"));
            return Ok(DagNode::Terminal);
        }
        Some(links) => Vec::<DagGetLink>::deserialize(links)?,
    };

    Ok(DagNode::from_links(
        links
            .into_iter()
            .map(|link| DagLink {
                cid: Cid::from(link.hash.cid),
                tsize: link.tsize,
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing_flattens_objects() {
        let body = br#"{
            "Objects": [
                {"Hash": "R", "Links": [
                    {"Name": "docs", "Hash": "X", "Size": 100, "Type": 1, "Target": ""},
                    {"Name": "a.txt", "Hash": "Y", "Size": 50, "Type": 2, "Target": ""}
                ]},
                {"Hash": "R2", "Links": [
                    {"Name": "b.bin", "Hash": "Z", "Size": 7, "Type": 0}
                ]}
            ]
        }"#;

        let listing = parse_listing(body).unwrap();
        assert_eq!(listing.entries.len(), 3);
        assert_eq!(listing.entries[0].name, "docs");
        assert_eq!(listing.entries[0].kind, EntryKind::Directory);
        assert_eq!(listing.entries[1].cid, Cid::from("Y"));
        assert_eq!(listing.entries[1].kind, EntryKind::File);
        assert_eq!(listing.entries[2].size, 7);
        assert_eq!(listing.entries[2].kind, EntryKind::File);
    }

    #[test]
    fn test_parse_listing_without_objects_is_empty() {
        let listing = parse_listing(br#"{"Message": "nothing here"}"#).unwrap();
        assert!(listing.entries.is_empty());

        let listing = parse_listing(br#"{"Objects": [{"Hash": "R"}]}"#).unwrap();
        assert!(listing.entries.is_empty());
    }

    #[test]
    fn test_parse_listing_rejects_garbage() {
        assert!(matches!(
            parse_listing(b"<html>bad gateway</html>"),
            Err(RemoteQueryError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_stat() {
        let stat = parse_stat(
            br#"{"Hash": "X", "Size": 0, "CumulativeSize": 500, "Blocks": 3, "Type": "directory"}"#,
        )
        .unwrap();
        assert_eq!(
            stat,
            NodeStat {
                cumulative_size: 500,
                blocks: 3
            }
        );
    }

    #[test]
    fn test_parse_stat_missing_field() {
        assert!(matches!(
            parse_stat(br#"{"CumulativeSize": 500}"#),
            Err(RemoteQueryError::MissingField("Blocks"))
        ));
        assert!(matches!(
            parse_stat(br#"{"Blocks": 3}"#),
            Err(RemoteQueryError::MissingField("CumulativeSize"))
        ));
    }

    #[test]
    fn test_parse_dag_node_with_links() {
        let body = br#"{
            "Data": {"/": {"bytes": "CAE"}},
            "Links": [
                {"Hash": {"/": "B1"}, "Name": "", "Tsize": 262158},
                {"Hash": {"/": "B2"}, "Name": "", "Tsize": 1024}
            ]
        }"#;

        let node = parse_dag_node(body).unwrap();
        assert_eq!(
            node,
            DagNode::Internal {
                links: vec![
                    DagLink {
                        cid: Cid::from("B1"),
                        tsize: 262158
                    },
                    DagLink {
                        cid: Cid::from("B2"),
                        tsize: 1024
                    },
                ]
            }
        );
        assert_eq!(node.num_links(), 2);
    }

    #[test]
    fn test_parse_dag_node_terminal_shapes() {
        assert_eq!(
            parse_dag_node(br#"{"/": {"bytes": "aGVsbG8="}}"#).unwrap(),
            DagNode::Terminal
        );
        assert_eq!(
            parse_dag_node(br#"{"Data": {"/": {"bytes": "CAE"}}, "Links": []}"#).unwrap(),
            DagNode::Terminal
        );
        assert_eq!(
            parse_dag_node(br#"{"Links": null}"#).unwrap(),
            DagNode::Terminal
        );
        assert_eq!(parse_dag_node(br#""raw string""#).unwrap(), DagNode::Terminal);
    }

    #[test]
    fn test_parse_dag_node_malformed_links() {
        assert!(matches!(
            parse_dag_node(br#"{"Links": [{"Hash": "not-a-link-object"}]}"#),
            Err(RemoteQueryError::Malformed(_))
        ));
    }
}
