// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The record of which call sites have already produced a call-to-start
//! edge into which callee fact (§4.4).
//!
//! When a summary is first computed for `(call_node, d_call)`, the solver
//! needs to find every `(call_node, d_call)` pair that already triggered a
//! call-to-start edge into the callee's entry with `d_callee`, so it can
//! replay the summary into all of them. This table is exactly that index,
//! keyed by the callee side since that's what `process_exit` has in hand.

use std::collections::{HashMap, HashSet};

use crate::fact_set::Fact;
use crate::supergraph::NodeId;

#[derive(Default)]
pub struct CallFlowEdges {
    incoming: HashMap<(NodeId, Fact), HashSet<(NodeId, Fact)>>,
}

impl CallFlowEdges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `call_node` produced a call-to-start edge into
    /// `callee_entry` with `d_callee`, carrying `d_call` at the call site.
    /// Returns whether this pairing was new.
    pub fn insert(&mut self, callee_entry: NodeId, d_callee: Fact, call_node: NodeId, d_call: Fact) -> bool {
        self.incoming
            .entry((callee_entry, d_callee))
            .or_default()
            .insert((call_node, d_call))
    }

    /// All `(call_node, d_call)` pairs recorded for `(callee_entry, d_callee)`.
    pub fn callers_of(&self, callee_entry: NodeId, d_callee: Fact) -> impl Iterator<Item = (NodeId, Fact)> + '_ {
        self.incoming.get(&(callee_entry, d_callee)).into_iter().flatten().copied()
    }
}
