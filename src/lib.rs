/*!
 * dagdump - Crawl a content-addressed DAG and dump it as CSV tables
 *
 * Starting from a root CID on a remote node, this library walks both the
 * named directory/file listing view and the raw block DAG view, and emits
 * one flat row per visited entry or block edge.
 */

pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod sink;
pub mod types;
pub mod utils;
pub mod visited;
pub mod walker;
pub mod writer;


// Re-export main components for easier access
pub use client::{GraphClient, HttpGraphClient, RemoteQueryError};
pub use config::{Config, OutputPaths};
pub use error::{CrawlError, Result};
pub use report::{CrawlReport, ReportFormat, Reporter};
pub use sink::{MemorySink, RecordSink};
pub use types::{BlockRow, Cid, DagLink, DagNode, EntryKind, Listing, ListingEntry, NodeStat, Record, TreeRow};
pub use visited::{View, VisitScope, VisitedSet};
pub use walker::{CrawlStatistics, Crawler, RunContext};
pub use writer::CsvSink;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
