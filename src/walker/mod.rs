//! Graph traversal
//!
//! Two depth-first walkers share one [`RunContext`]:
//!
//! ```text
//! tree::visit(root)
//! │
//! ├── ls(dir) ──► for each entry:
//! │               files/stat(entry) ──► directories | files row
//! │               blocks::visit(entry, parent = dir) ──► blocks rows
//! │               entry is a directory ──► descend
//! ```
//!
//! Both walkers keep their pending work on an explicit stack instead of the
//! call stack, so deep graphs do not grow native recursion. Emission order is
//! the same pre-order a recursive walk would produce.

pub mod blocks;
pub mod tree;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::client::GraphClient;
use crate::error::{CrawlError, Result};
use crate::sink::RecordSink;
use crate::types::{Cid, Record};
use crate::utils::abbreviate_cid;
use crate::visited::{VisitScope, VisitedSet};

/// First row index handed out by the tree walker
pub const FIRST_ROW_INDEX: u64 = 1;

/// Counters collected during a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Rows written to the directories stream
    pub directories: u64,
    /// Rows written to the files stream
    pub files: u64,
    /// Rows written to the blocks stream
    pub blocks: u64,
    /// Remote queries issued
    pub queries: u64,
    /// Listings that failed (subtree skipped)
    pub listings_failed: u64,
    /// Stat queries that failed (entry skipped)
    pub stats_failed: u64,
    /// DAG fetches that failed (block expansion skipped)
    pub dag_failed: u64,
    /// Visits skipped because the CID was already seen
    pub duplicates_skipped: u64,
    /// Distinct visits recorded in the visited set
    pub visited: u64,
    /// Whether the run was stopped before completion
    pub interrupted: bool,
}

impl CrawlStatistics {
    /// Total number of remote failures
    pub fn failures(&self) -> u64 {
        self.listings_failed + self.stats_failed + self.dag_failed
    }

    /// Total number of rows across all streams
    pub fn rows(&self) -> u64 {
        self.directories + self.files + self.blocks
    }
}

/// State shared by both walkers for the duration of one run
pub struct RunContext<'a> {
    /// CIDs already processed
    pub visited: VisitedSet,
    /// Next row index the tree walker hands out
    pub next_index: u64,
    /// Run counters
    pub statistics: CrawlStatistics,
    sink: &'a mut dyn RecordSink,
    progress: Arc<ProgressBar>,
    shutdown: Arc<AtomicBool>,
}

impl<'a> RunContext<'a> {
    /// Create a fresh context writing to `sink`
    pub fn new(sink: &'a mut dyn RecordSink, scope: VisitScope) -> Self {
        Self {
            visited: VisitedSet::new(scope),
            next_index: FIRST_ROW_INDEX,
            statistics: CrawlStatistics::default(),
            sink,
            progress: Arc::new(ProgressBar::hidden()),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Report emitted rows on this progress bar
    pub fn with_progress(mut self, progress: Arc<ProgressBar>) -> Self {
        self.progress = progress;
        self
    }

    /// Stop walking once this flag is set
    pub fn with_shutdown(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Route a record to the sink and count it
    pub fn emit(&mut self, record: Record) -> Result<()> {
        let (counter, cid) = match &record {
            Record::Directory(row) => (&mut self.statistics.directories, &row.cid),
            Record::File(row) => (&mut self.statistics.files, &row.cid),
            Record::Block(row) => (&mut self.statistics.blocks, &row.cid),
        };
        *counter += 1;

        self.progress.inc(1);
        self.progress.set_message(format!(
            "{:?} {}",
            record.stream(),
            abbreviate_cid(cid.as_str(), 24)
        ));

        self.sink.emit(record)
    }

    /// Fail with [`CrawlError::Interrupted`] once shutdown was requested
    pub fn check_shutdown(&self) -> Result<()> {
        if self.shutdown.load(Ordering::SeqCst) {
            return Err(CrawlError::Interrupted);
        }
        Ok(())
    }

    /// Count a remote query about to be issued
    fn record_query(&mut self) {
        self.statistics.queries += 1;
    }
}

/// Drives a full crawl from a root CID
pub struct Crawler<C> {
    client: C,
    scope: VisitScope,
    progress: Arc<ProgressBar>,
    shutdown: Arc<AtomicBool>,
}

impl<C: GraphClient> Crawler<C> {
    /// Create a crawler over `client`
    pub fn new(client: C, scope: VisitScope) -> Self {
        Self {
            client,
            scope,
            progress: Arc::new(ProgressBar::hidden()),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Show progress on this bar
    pub fn with_progress(mut self, progress: Arc<ProgressBar>) -> Self {
        self.progress = progress;
        self
    }

    /// Flag that stops the crawl when set
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Crawl everything reachable from `root` into `sink`.
    ///
    /// Remote failures never abort the run; they are logged and counted.
    /// The sink is flushed even when the run is interrupted.
    pub fn crawl(&self, root: &Cid, sink: &mut dyn RecordSink) -> Result<CrawlStatistics> {
        info!(%root, scope = ?self.scope, "starting crawl");

        let mut context = RunContext::new(sink, self.scope)
            .with_progress(Arc::clone(&self.progress))
            .with_shutdown(Arc::clone(&self.shutdown));

        let outcome = tree::visit(&self.client, &mut context, root, root, 0);

        context.statistics.visited = context.visited.len() as u64;
        let mut statistics = context.statistics.clone();
        match outcome {
            Ok(_) => {}
            Err(CrawlError::Interrupted) => {
                warn!(rows = statistics.rows(), "crawl interrupted; output is partial");
                statistics.interrupted = true;
            }
            Err(e) => return Err(e),
        }

        context.sink.finish()?;

        info!(
            directories = statistics.directories,
            files = statistics.files,
            blocks = statistics.blocks,
            failures = statistics.failures(),
            "crawl finished"
        );

        Ok(statistics)
    }
}
