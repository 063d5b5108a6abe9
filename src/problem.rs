// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The `TabulationProblem` collaborator interface (§6) and the seed set a
//! problem starts the solver with.

use crate::fact_set::Fact;
use crate::flow_function::{FlowFunctionMap, MergeFunction};
use crate::supergraph::{NodeId, Supergraph};

/// The bottom/zero fact every IFDS formulation needs: "no information",
/// always reachable, never itself interesting in a final result.
pub const ZERO_FACT: Fact = 0;

/// One seed: fact `fact` holds at `node` before the solve begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seed {
    pub node: NodeId,
    pub fact: Fact,
}

impl Seed {
    pub fn new(node: NodeId, fact: Fact) -> Self {
        Seed { node, fact }
    }
}

/// An insertion-ordered collection of seeds. A plain `Vec` would do, but a
/// named wrapper keeps `TabulationProblem::initial_seeds` self-documenting
/// and gives room to dedupe without disturbing iteration order — reproducing
/// a solve's trace depends on not silently reordering seeds (§9).
#[derive(Clone, Debug, Default)]
pub struct Seeds {
    seeds: Vec<Seed>,
}

impl Seeds {
    pub fn new() -> Self {
        Seeds { seeds: Vec::new() }
    }

    pub fn push(&mut self, seed: Seed) {
        if !self.seeds.contains(&seed) {
            self.seeds.push(seed);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Seed> {
        self.seeds.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}

impl FromIterator<Seed> for Seeds {
    fn from_iter<I: IntoIterator<Item = Seed>>(iter: I) -> Self {
        let mut seeds = Seeds::new();
        for seed in iter {
            seeds.push(seed);
        }
        seeds
    }
}

impl<'a> IntoIterator for &'a Seeds {
    type Item = &'a Seed;
    type IntoIter = std::slice::Iter<'a, Seed>;

    fn into_iter(self) -> Self::IntoIter {
        self.seeds.iter()
    }
}

/// Everything the solver needs from the problem it is tabulating: the graph
/// to walk, the flow functions to apply, how facts merge, the seeds to start
/// from, and the tie-breaking order for the worklist.
pub trait TabulationProblem {
    type Graph: Supergraph;
    type Functions: FlowFunctionMap;

    fn supergraph(&self) -> &Self::Graph;

    fn function_map(&self) -> &Self::Functions;

    /// The problem's merge function, if it has one. Most problems don't:
    /// plain union of facts reaching the same node is the solver's default
    /// behavior and needs no collaborator. A problem whose facts form a
    /// lattice needing real collapsing (e.g. constant propagation keeping at
    /// most one value per node) overrides this.
    fn merge_function(&self) -> Option<&dyn MergeFunction> {
        None
    }

    fn initial_seeds(&self) -> Seeds;

    /// Worklist tie-break: does `(node_a, fact_a)` deserve to be processed
    /// before `(node_b, fact_b)`? Most problems have no preference and
    /// return `false` unconditionally, leaving FIFO-by-insertion as the
    /// only order (§9, Open Question 1).
    fn has_priority_over(&self, node_a: NodeId, fact_a: Fact, node_b: NodeId, fact_b: Fact) -> bool {
        let _ = (node_a, fact_a, node_b, fact_b);
        false
    }

    /// Whether `fact` belongs to this problem's declared domain. Defaults to
    /// accepting everything; a problem with a bounded domain (e.g. facts
    /// indexing a fixed variable table) can override this so
    /// `Solver::add_seed` rejects out-of-range ids instead of silently
    /// accepting them.
    fn is_valid_fact(&self, fact: Fact) -> bool {
        let _ = fact;
        true
    }
}
