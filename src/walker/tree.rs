//! Directory/file tree walker over the named listing view

use std::vec;

use tracing::{debug, warn};

use super::{blocks, RunContext};
use crate::client::{GraphClient, Operation};
use crate::error::Result;
use crate::types::{Cid, EntryKind, ListingEntry, Record, TreeRow};
use crate::visited::View;

/// A listed directory whose entries are still being processed
struct ListingFrame {
    cid: Cid,
    parent_index: u64,
    entries: vec::IntoIter<ListingEntry>,
}

/// Walk the listing view below `cid`.
///
/// Rows for the entries of a directory carry the directory's CID as
/// `parent_cid` and `parent_index` as `index_of_parent`. Returns the row
/// index counter after the walk; an already visited `cid` returns it
/// unchanged without querying the node.
pub fn visit<C: GraphClient + ?Sized>(
    client: &C,
    context: &mut RunContext<'_>,
    cid: &Cid,
    parent_cid: &Cid,
    parent_index: u64,
) -> Result<u64> {
    let mut stack = Vec::new();
    if let Some(frame) = open(client, context, cid, parent_cid, parent_index)? {
        stack.push(frame);
    }

    while let Some(frame) = stack.last_mut() {
        let Some(entry) = frame.entries.next() else {
            stack.pop();
            continue;
        };
        let directory = frame.cid.clone();
        let parent_index = frame.parent_index;

        context.check_shutdown()?;
        context.record_query();
        let stat = match client.stat_node(&entry.cid) {
            Ok(stat) => stat,
            Err(e) => {
                warn!(
                    operation = %Operation::Stat,
                    cid = %entry.cid,
                    name = %entry.name,
                    error = %e,
                    "stat failed; skipping entry"
                );
                context.statistics.stats_failed += 1;
                continue;
            }
        };

        let index = context.next_index;
        context.next_index += 1;

        let kind = entry.kind;
        let child = entry.cid;
        context.emit(Record::tree(TreeRow {
            index,
            name: entry.name,
            kind,
            cid: child.clone(),
            size: entry.size,
            cumulative_size: stat.cumulative_size,
            blocks: stat.blocks,
            parent_cid: directory.clone(),
            index_of_parent: parent_index,
        }))?;

        // Block provenance is the directory being listed, not the entry
        blocks::visit(client, context, &child, &directory)?;

        if kind == EntryKind::Directory {
            if let Some(frame) = open(client, context, &child, &directory, index)? {
                stack.push(frame);
            }
        }
    }

    Ok(context.next_index)
}

/// Claim and list a directory. `None` when it was already visited or the
/// listing failed.
fn open<C: GraphClient + ?Sized>(
    client: &C,
    context: &mut RunContext<'_>,
    cid: &Cid,
    parent_cid: &Cid,
    parent_index: u64,
) -> Result<Option<ListingFrame>> {
    context.check_shutdown()?;

    if !context.visited.claim(View::Listing, cid) {
        debug!(%cid, "already visited; not listing");
        context.statistics.duplicates_skipped += 1;
        return Ok(None);
    }

    context.record_query();
    match client.list_children(cid) {
        Ok(listing) => {
            debug!(
                %cid,
                %parent_cid,
                parent_index,
                entries = listing.entries.len(),
                "listed directory"
            );
            Ok(Some(ListingFrame {
                cid: cid.clone(),
                parent_index,
                entries: listing.entries.into_iter(),
            }))
        }
        Err(e) => {
            warn!(
                operation = %Operation::List,
                %cid,
                error = %e,
                "listing failed; skipping subtree"
            );
            context.statistics.listings_failed += 1;
            Ok(None)
        }
    }
}
