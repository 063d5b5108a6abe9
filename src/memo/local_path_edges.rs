// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The table of path edges discovered so far, kept both forward and
//! inverted (§4.2).
//!
//! Forward (`entry, d1 -> target, d2`) answers "has this exact edge already
//! been propagated" so the solver never reprocesses the same pair twice.
//! Inverse (`target, d2 -> entry, d1`) answers the question `process_exit`
//! needs when a summary is first computed: which already-known path edges
//! end at this call node with this fact, so the summary can replay into all
//! of them immediately instead of waiting for them to be rediscovered.

use std::collections::{HashMap, HashSet};

use crate::edge::PathEdge;
use crate::fact_set::{Fact, FactSet};
use crate::supergraph::NodeId;

#[derive(Default)]
pub struct LocalPathEdges {
    forward: HashMap<(NodeId, Fact), HashMap<NodeId, FactSet>>,
    inverse: HashMap<(NodeId, Fact), HashSet<(NodeId, Fact)>>,
}

impl LocalPathEdges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `edge`. Returns whether it was new.
    pub fn insert(&mut self, edge: PathEdge) -> bool {
        let targets = self.forward.entry((edge.entry, edge.d1)).or_default();
        let changed = targets.entry(edge.target).or_default().insert(edge.d2);
        if changed {
            self.inverse
                .entry((edge.target, edge.d2))
                .or_default()
                .insert((edge.entry, edge.d1));
        }
        changed
    }

    /// The `d2` facts already recorded for `<entry, d1> -> <target, _>`.
    pub fn facts(&self, entry: NodeId, d1: Fact, target: NodeId) -> FactSet {
        self.forward
            .get(&(entry, d1))
            .and_then(|targets| targets.get(&target))
            .cloned()
            .unwrap_or_default()
    }

    /// Collapses `(edge.entry, edge.d1, edge.target)` down to the single fact
    /// `edge.d2`, discarding whatever else was recorded there — used when a
    /// merge function is configured, so the bucket never holds more than one
    /// fact at a time. Returns whether this changes what's stored.
    pub fn replace(&mut self, edge: PathEdge) -> bool {
        let key = (edge.entry, edge.d1);
        let already_only = self
            .forward
            .get(&key)
            .and_then(|targets| targets.get(&edge.target))
            .is_some_and(|facts| facts.len() == 1 && facts.contains(edge.d2));
        if already_only {
            return false;
        }

        if let Some(targets) = self.forward.get_mut(&key) {
            if let Some(old_facts) = targets.remove(&edge.target) {
                for old_d2 in old_facts.iter() {
                    if let Some(sources) = self.inverse.get_mut(&(edge.target, old_d2)) {
                        sources.remove(&key);
                        if sources.is_empty() {
                            self.inverse.remove(&(edge.target, old_d2));
                        }
                    }
                }
            }
        }

        self.forward.entry(key).or_default().insert(edge.target, FactSet::singleton(edge.d2));
        self.inverse.entry((edge.target, edge.d2)).or_default().insert(key);
        true
    }

    pub fn contains(&self, edge: &PathEdge) -> bool {
        self.forward
            .get(&(edge.entry, edge.d1))
            .and_then(|targets| targets.get(&edge.target))
            .is_some_and(|facts| facts.contains(edge.d2))
    }

    /// `(entry, d1)` pairs for which a path edge `<entry, d1> -> <target, d2>`
    /// is already known, for the given `target, d2`.
    pub fn sources_of(&self, target: NodeId, d2: Fact) -> impl Iterator<Item = (NodeId, Fact)> + '_ {
        self.inverse.get(&(target, d2)).into_iter().flatten().copied()
    }

    /// All recorded path edges, in no particular order. Used to build the
    /// final [`crate::result::Result`].
    pub fn iter(&self) -> impl Iterator<Item = PathEdge> + '_ {
        self.forward.iter().flat_map(|(&(entry, d1), targets)| {
            targets.iter().flat_map(move |(&target, facts)| {
                facts.iter().map(move |d2| PathEdge::new(entry, d1, target, d2))
            })
        })
    }
}
