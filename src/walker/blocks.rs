//! Block DAG walker over the raw link view

use std::vec;

use tracing::{debug, warn};

use super::RunContext;
use crate::client::{GraphClient, Operation};
use crate::error::Result;
use crate::types::{BlockRow, Cid, DagLink, DagNode, Record};
use crate::visited::View;

/// An internal node whose links are still being recorded
struct BlockFrame {
    cid: Cid,
    parent_cid: Cid,
    final_block_hash: Cid,
    num_links: usize,
    links: vec::IntoIter<DagLink>,
}

/// Walk the DAG below `cid`, attributing it to `parent_cid`.
///
/// An internal node with N links produces N rows, one per edge, each
/// followed by the walk of that edge's target. A terminal block produces a
/// single row.
pub fn visit<C: GraphClient + ?Sized>(
    client: &C,
    context: &mut RunContext<'_>,
    cid: &Cid,
    parent_cid: &Cid,
) -> Result<()> {
    let mut stack = Vec::new();
    if let Some(frame) = expand(client, context, cid, parent_cid)? {
        stack.push(frame);
    }

    while let Some(frame) = stack.last_mut() {
        let Some(link) = frame.links.next() else {
            stack.pop();
            continue;
        };
        let node = frame.cid.clone();

        context.emit(Record::Block(BlockRow {
            cid: node.clone(),
            parent_cid: frame.parent_cid.clone(),
            final_block_hash: frame.final_block_hash.clone(),
            num_links: frame.num_links,
            size: link.tsize,
        }))?;

        if let Some(frame) = expand(client, context, &link.cid, &node)? {
            stack.push(frame);
        }
    }

    Ok(())
}

/// Claim and fetch one block. Terminal blocks are emitted right away;
/// internal nodes come back as a frame for their links.
fn expand<C: GraphClient + ?Sized>(
    client: &C,
    context: &mut RunContext<'_>,
    cid: &Cid,
    parent_cid: &Cid,
) -> Result<Option<BlockFrame>> {
    context.check_shutdown()?;

    if !context.visited.claim(View::Blocks, cid) {
        debug!(%cid, "block already visited");
        context.statistics.duplicates_skipped += 1;
        return Ok(None);
    }

    context.record_query();
    let node = match client.get_dag_node(cid) {
        Ok(node) => node,
        Err(e) => {
            warn!(
                operation = %Operation::DagGet,
                %cid,
                %parent_cid,
                error = %e,
                "dag fetch failed; skipping block"
            );
            context.statistics.dag_failed += 1;
            return Ok(None);
        }
    };

    match node {
        DagNode::Terminal => {
            context.emit(Record::Block(BlockRow {
                cid: cid.clone(),
                parent_cid: parent_cid.clone(),
                final_block_hash: cid.clone(),
                num_links: 0,
                size: 0,
            }))?;
            Ok(None)
        }
        DagNode::Internal { links } => {
            let final_block_hash = links
                .last()
                .map_or_else(|| cid.clone(), |link| link.cid.clone());

            Ok(Some(BlockFrame {
                cid: cid.clone(),
                parent_cid: parent_cid.clone(),
                final_block_hash,
                num_links: links.len(),
                links: links.into_iter(),
            }))
        }
    }
}
