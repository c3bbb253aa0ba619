/*!
 * Core types and data structures for the dagdump crawler
 */

use std::fmt;

use serde::Serialize;

/// Content identifier naming a node of the remote graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Cid(String);

impl Cid {
    /// Wrap a raw CID string
    pub fn new(cid: impl Into<String>) -> Self {
        Self(cid.into())
    }

    /// Borrow the raw CID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cid {
    fn from(cid: &str) -> Self {
        Self::new(cid)
    }
}

impl From<String> for Cid {
    fn from(cid: String) -> Self {
        Self(cid)
    }
}

/// Kind of a named listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Directory that can itself be listed
    Directory,
    /// Anything else
    File,
}

impl EntryKind {
    /// Map the numeric `Type` tag used by the listing endpoint
    pub fn from_type_code(code: i64) -> Self {
        if code == 1 {
            Self::Directory
        } else {
            Self::File
        }
    }
}

/// One named child returned by a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Human-readable name within the parent directory
    pub name: String,
    /// CID of the child
    pub cid: Cid,
    /// Size declared by the listing
    pub size: u64,
    /// Directory or file
    pub kind: EntryKind,
}

/// Result of listing a directory-type node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Entries in response order
    pub entries: Vec<ListingEntry>,
}

/// Size statistics of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStat {
    /// Sum of all descendant block sizes
    pub cumulative_size: u64,
    /// Number of blocks
    pub blocks: u64,
}

/// Outgoing edge of an internal DAG node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DagLink {
    /// CID of the linked block
    pub cid: Cid,
    /// Transmission size declared for this edge
    pub tsize: u64,
}

/// Raw DAG view of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DagNode {
    /// Node with at least one outgoing link
    Internal { links: Vec<DagLink> },
    /// Leaf block with no links
    Terminal,
}

impl DagNode {
    /// Build a node from its links; no links means a terminal block
    pub fn from_links(links: Vec<DagLink>) -> Self {
        if links.is_empty() {
            Self::Terminal
        } else {
            Self::Internal { links }
        }
    }

    /// Number of outgoing links
    pub fn num_links(&self) -> usize {
        match self {
            Self::Internal { links } => links.len(),
            Self::Terminal => 0,
        }
    }
}

/// Row of the directories or files output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeRow {
    /// Own row index; used to resolve `index_of_parent`, not written out
    #[serde(skip)]
    pub index: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub cid: Cid,
    pub size: u64,
    pub cumulative_size: u64,
    pub blocks: u64,
    pub parent_cid: Cid,
    pub index_of_parent: u64,
}

impl TreeRow {
    /// Column header of the tree outputs
    pub const HEADERS: [&'static str; 8] = [
        "name",
        "type",
        "cid",
        "size",
        "cumulative_size",
        "blocks",
        "parent_cid",
        "index_of_parent",
    ];
}

/// Row of the blocks output, one per recorded DAG edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockRow {
    pub cid: Cid,
    pub parent_cid: Cid,
    pub final_block_hash: Cid,
    pub num_links: usize,
    pub size: u64,
}

impl BlockRow {
    /// Column header of the blocks output
    pub const HEADERS: [&'static str; 5] =
        ["cid", "parent_cid", "final_block_hash", "num_links", "size"];
}

/// Output stream a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Directories,
    Files,
    Blocks,
}

/// A classified row on its way to the sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Listing entry of directory kind
    Directory(TreeRow),
    /// Listing entry of file kind
    File(TreeRow),
    /// Edge (or terminal block) of the DAG view
    Block(BlockRow),
}

impl Record {
    /// Classify a tree row by its entry kind
    pub fn tree(row: TreeRow) -> Self {
        match row.kind {
            EntryKind::Directory => Self::Directory(row),
            EntryKind::File => Self::File(row),
        }
    }

    /// Destination stream of this record
    pub fn stream(&self) -> Stream {
        match self {
            Self::Directory(_) => Stream::Directories,
            Self::File(_) => Stream::Files,
            Self::Block(_) => Stream::Blocks,
        }
    }
}
