// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Summary functions computed for calls already fully analyzed (§4.3).
//!
//! Keyed by the callee's own entry and exit node, not by call site or
//! return site: a summary is a fact about the callee's body alone, reached
//! through `(entry, d1) -> (exit, d2)`, with no dependency on which call
//! triggered the tabulation. This is what lets a summary computed while
//! exploring one call site serve any other call site of the same callee
//! (§3 Invariant 3) — `return_flow`, which does depend on the call site, is
//! applied on top of a looked-up summary fact, never baked into it.

use std::collections::HashMap;

use crate::fact_set::{Fact, FactSet};
use crate::supergraph::NodeId;

#[derive(Default)]
pub struct LocalSummaryEdges {
    summaries: HashMap<(NodeId, NodeId), HashMap<Fact, FactSet>>,
}

impl LocalSummaryEdges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that, given `d_entry` at `entry`, `d_exit` holds at `exit` —
    /// the same procedure's own entry and exit. Returns whether this is new
    /// information.
    pub fn insert(&mut self, entry: NodeId, exit: NodeId, d_entry: Fact, d_exit: Fact) -> bool {
        self.summaries.entry((entry, exit)).or_default().entry(d_entry).or_default().insert(d_exit)
    }

    /// The already-known summary targets for `d_entry`, or an empty set if
    /// no summary has been computed for this entry/exit/fact yet.
    pub fn get(&self, entry: NodeId, exit: NodeId, d_entry: Fact) -> FactSet {
        self.summaries
            .get(&(entry, exit))
            .and_then(|by_fact| by_fact.get(&d_entry))
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_summary_for(&self, entry: NodeId, exit: NodeId, d_entry: Fact) -> bool {
        self.summaries.get(&(entry, exit)).is_some_and(|by_fact| by_fact.contains_key(&d_entry))
    }

    /// A deep copy of every recorded summary, for handing to a [`crate::result::Result`]
    /// that must outlive the solver's own mutable tables.
    pub(crate) fn snapshot(&self) -> HashMap<(NodeId, NodeId), HashMap<Fact, FactSet>> {
        self.summaries.clone()
    }
}
