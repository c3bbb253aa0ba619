/*!
 * Run-scoped set of already processed CIDs
 */

use std::collections::HashSet;

use clap::ValueEnum;

use crate::types::Cid;

/// Which walker is touching a CID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Named directory/file listing view
    Listing,
    /// Raw block DAG view
    Blocks,
}

/// How the two walkers share visited CIDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VisitScope {
    /// One key space for both walkers; the first touch wins, so a
    /// directory claimed by the block walk is never listed
    Shared,
    /// Each walker deduplicates on its own
    PerView,
}

impl Default for VisitScope {
    fn default() -> Self {
        Self::PerView
    }
}

/// Set of CIDs already processed during a run
#[derive(Debug, Default)]
pub struct VisitedSet {
    scope: VisitScope,
    seen: HashSet<(Option<View>, Cid)>,
}

impl VisitedSet {
    /// Create an empty set with the given scope
    pub fn new(scope: VisitScope) -> Self {
        Self {
            scope,
            seen: HashSet::new(),
        }
    }

    fn key(&self, view: View, cid: &Cid) -> (Option<View>, Cid) {
        match self.scope {
            VisitScope::Shared => (None, cid.clone()),
            VisitScope::PerView => (Some(view), cid.clone()),
        }
    }

    /// Whether `cid` was already processed in `view`
    pub fn contains(&self, view: View, cid: &Cid) -> bool {
        self.seen.contains(&self.key(view, cid))
    }

    /// Mark `cid` as processed in `view`
    pub fn insert(&mut self, view: View, cid: &Cid) {
        let key = self.key(view, cid);
        self.seen.insert(key);
    }

    /// Check and mark in one step. Returns true if `cid` was not yet visited.
    pub fn claim(&mut self, view: View, cid: &Cid) -> bool {
        let key = self.key(view, cid);
        self.seen.insert(key)
    }

    /// Number of recorded visits
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing was visited yet
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Configured scope
    pub fn scope(&self) -> VisitScope {
        self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_scope_first_touch_wins() {
        let mut visited = VisitedSet::new(VisitScope::Shared);
        let cid = Cid::from("X");

        assert!(visited.claim(View::Blocks, &cid));
        assert!(visited.contains(View::Listing, &cid));
        assert!(!visited.claim(View::Listing, &cid));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_per_view_scope_is_independent() {
        let mut visited = VisitedSet::new(VisitScope::PerView);
        let cid = Cid::from("X");

        assert!(visited.claim(View::Blocks, &cid));
        assert!(!visited.contains(View::Listing, &cid));
        assert!(visited.claim(View::Listing, &cid));
        assert!(!visited.claim(View::Blocks, &cid));
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn test_default_scope_keeps_views_apart() {
        let mut visited = VisitedSet::new(VisitScope::default());
        let cid = Cid::from("D");

        assert!(visited.claim(View::Blocks, &cid));
        assert!(visited.claim(View::Listing, &cid));
    }

    #[test]
    fn test_insert_then_contains() {
        let mut visited = VisitedSet::default();
        assert!(visited.is_empty());
        visited.insert(View::Listing, &Cid::from("R"));
        assert!(visited.contains(View::Listing, &Cid::from("R")));
        assert!(!visited.contains(View::Listing, &Cid::from("r")));
    }
}
