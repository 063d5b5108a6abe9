// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The solver's output: which facts hold at which nodes.
//!
//! `Solver::solve` hands back a [`Result`] that owns its own deep copies of
//! the relevant [`FactSet`]s rather than borrowing from the solver's memo
//! tables (§9): the tables keep mutating across later seeds, and a borrowed
//! view would tie the result's lifetime to a solver the caller may want to
//! keep driving.

use std::collections::HashMap;

use crate::error::{SolverError, SolverResult};
use crate::fact_set::{Fact, FactSet};
use crate::problem::Seeds;
use crate::supergraph::NodeId;

/// Facts reachable at each node, derived from the path edges whose `entry`
/// is one of the problem's seeds.
#[derive(Clone, Debug, Default)]
pub struct Result {
    facts_at: HashMap<NodeId, FactSet>,
    summaries: HashMap<(NodeId, NodeId), HashMap<Fact, FactSet>>,
    seeds: Seeds,
}

impl Result {
    pub(crate) fn new(
        facts_at: HashMap<NodeId, FactSet>,
        summaries: HashMap<(NodeId, NodeId), HashMap<Fact, FactSet>>,
        seeds: Seeds,
    ) -> Self {
        Result { facts_at, summaries, seeds }
    }

    /// The facts known to hold at `node`. Empty (not missing) if the node was
    /// never reached.
    pub fn facts_at(&self, node: NodeId) -> FactSet {
        self.facts_at.get(&node).cloned().unwrap_or_default()
    }

    pub fn holds(&self, node: NodeId, fact: Fact) -> bool {
        self.facts_at.get(&node).is_some_and(|facts| facts.contains(fact))
    }

    /// All nodes this result has any facts recorded for.
    pub fn reached_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.facts_at.keys().copied()
    }

    /// The facts a recorded procedure summary maps `d1` at a procedure's own
    /// entry `n1` to at its own exit `n2` (§4.3) — `n1`/`n2` are the same
    /// procedure's entry/exit, not a call node and its return site; a
    /// call-site-specific `return_flow` result is never itself summarized.
    /// Empty if no summary was ever computed for this entry/exit/fact triple.
    pub fn summary_targets(&self, n1: NodeId, d1: Fact, n2: NodeId) -> FactSet {
        self.summaries.get(&(n1, n2)).and_then(|by_fact| by_fact.get(&d1)).cloned().unwrap_or_default()
    }

    /// The inverse query — which entry-side facts a summary target at exit
    /// `n2` with `d2` originated from at entry `n1`. Computing this would
    /// mean indexing every summary by its target side as well as its source
    /// side for a query this crate has no caller for; left unimplemented
    /// rather than carrying a second index nothing exercises.
    pub fn summary_sources(&self, n1: NodeId, d2: Fact, n2: NodeId) -> SolverResult<FactSet> {
        let _ = (n1, d2, n2);
        Err(SolverError::Unsupported("summary_sources"))
    }

    /// The seeds this result was computed from.
    pub fn seeds(&self) -> &Seeds {
        &self.seeds
    }
}

/// The same view as [`Result`], produced when a solve is cancelled partway
/// through. Carries no guarantee of having reached a fixed point.
pub type PartialResult = Result;
