// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! A small in-memory `Supergraph` fixture, built on `petgraph` the way the
//! teacher's call graph (`graph/call_graph.rs`) is — a `DiGraph` plus side
//! tables for the relations petgraph's edge list doesn't capture directly
//! (which nodes are a call's callees vs. its return sites, entries/exits per
//! procedure).
//!
//! This is a test/demo fixture, not a general-purpose CFG builder: real
//! supergraph construction from bytecode or a call graph is out of scope
//! (§1).

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use super::{NodeId, NodeKind, ProcId, Supergraph};

struct NodeData {
    proc: ProcId,
    kind: NodeKind,
    local_number: u32,
}

/// An in-memory supergraph assembled procedure by procedure, node by node.
#[derive(Default)]
pub struct InMemorySupergraph {
    graph: DiGraph<NodeData, ()>,
    proc_count: u32,
    proc_local_counters: HashMap<ProcId, u32>,
    proc_entries: HashMap<ProcId, Vec<NodeId>>,
    proc_exits: HashMap<ProcId, Vec<NodeId>>,
    local_to_node: HashMap<(ProcId, u32), NodeId>,
    call_callees: HashMap<NodeId, Vec<NodeId>>,
    call_return_sites: HashMap<NodeId, Vec<NodeId>>,
    call_normal_successors: HashMap<NodeId, Vec<NodeId>>,
}

impl InMemorySupergraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_proc(&mut self) -> ProcId {
        let proc = ProcId(self.proc_count);
        self.proc_count += 1;
        proc
    }

    /// Adds a node to `proc` with the given kind, assigning it the next free
    /// local number for that procedure. Entry/exit kinds are tracked so
    /// `entries_of`/`exits_of` find them.
    pub fn add_node(&mut self, proc: ProcId, kind: NodeKind) -> NodeId {
        let local_number = *self.proc_local_counters.entry(proc).or_insert(0);
        self.proc_local_counters.insert(proc, local_number + 1);

        let idx = self.graph.add_node(NodeData { proc, kind, local_number });
        let node = NodeId(idx.index() as u32);

        self.local_to_node.insert((proc, local_number), node);
        match kind {
            NodeKind::Entry => self.proc_entries.entry(proc).or_default().push(node),
            NodeKind::Exit => self.proc_exits.entry(proc).or_default().push(node),
            _ => {}
        }
        node
    }

    /// Adds a plain successor edge. Used both for ordinary control flow and
    /// for exit -> return-site edges (distinct exits may target disjoint
    /// return sites, e.g. normal vs. exceptional).
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.graph.add_edge(self.index_of(from), self.index_of(to), ());
    }

    /// Wires a call node to its possible callee entries and the return sites
    /// a caller-side fact may flow back to.
    pub fn add_call(&mut self, call_node: NodeId, callees: &[NodeId], return_sites: &[NodeId]) {
        self.call_callees.entry(call_node).or_default().extend(callees);
        self.call_return_sites.entry(call_node).or_default().extend(return_sites);
    }

    /// Records a normal-flow successor of a call node, distinct from its
    /// callees' entries — only needed by problems (typically backward ones)
    /// where a call block also fans out normally.
    pub fn add_normal_successor(&mut self, call_node: NodeId, to: NodeId) {
        self.call_normal_successors.entry(call_node).or_default().push(to);
    }

    fn index_of(&self, node: NodeId) -> NodeIndex {
        NodeIndex::new(node.0 as usize)
    }
}

impl Supergraph for InMemorySupergraph {
    fn kind(&self, node: NodeId) -> NodeKind {
        self.graph[self.index_of(node)].kind
    }

    fn succ_nodes(&self, node: NodeId) -> Vec<NodeId> {
        self.graph
            .neighbors_directed(self.index_of(node), Direction::Outgoing)
            .map(|idx| NodeId(idx.index() as u32))
            .collect()
    }

    fn pred_nodes(&self, node: NodeId) -> Vec<NodeId> {
        self.graph
            .neighbors_directed(self.index_of(node), Direction::Incoming)
            .map(|idx| NodeId(idx.index() as u32))
            .collect()
    }

    fn called_procs(&self, call_node: NodeId) -> Vec<NodeId> {
        self.call_callees.get(&call_node).cloned().unwrap_or_default()
    }

    fn normal_successors(&self, call_node: NodeId) -> Vec<NodeId> {
        self.call_normal_successors.get(&call_node).cloned().unwrap_or_default()
    }

    fn return_sites(&self, call_node: NodeId) -> Vec<NodeId> {
        self.call_return_sites.get(&call_node).cloned().unwrap_or_default()
    }

    fn entries_of(&self, proc: ProcId) -> Vec<NodeId> {
        self.proc_entries.get(&proc).cloned().unwrap_or_default()
    }

    fn exits_of(&self, proc: ProcId) -> Vec<NodeId> {
        self.proc_exits.get(&proc).cloned().unwrap_or_default()
    }

    fn global_number(&self, node: NodeId) -> u32 {
        node.0
    }

    fn local_number(&self, node: NodeId) -> u32 {
        self.graph[self.index_of(node)].local_number
    }

    fn node_by_local(&self, proc: ProcId, local_number: u32) -> NodeId {
        *self.local_to_node.get(&(proc, local_number)).unwrap_or_else(|| {
            panic!("no node at local number {local_number} in {proc:?}")
        })
    }

    fn proc_of(&self, node: NodeId) -> ProcId {
        self.graph[self.index_of(node)].proc
    }

    fn contains_node(&self, node: NodeId) -> bool {
        (node.0 as usize) < self.graph.node_count()
    }

    fn nodes(&self) -> Vec<NodeId> {
        (0..self.graph.node_count() as u32).map(NodeId).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_procedure_wiring() {
        let mut g = InMemorySupergraph::new();
        let p = g.add_proc();
        let s = g.add_node(p, NodeKind::Entry);
        let n = g.add_node(p, NodeKind::Normal);
        let x = g.add_node(p, NodeKind::Exit);
        g.add_edge(s, n);
        g.add_edge(n, x);

        assert_eq!(g.entries_of(p), vec![s]);
        assert_eq!(g.exits_of(p), vec![x]);
        assert_eq!(g.succ_nodes(s), vec![n]);
        assert_eq!(g.pred_nodes(x), vec![n]);
        assert_eq!(g.local_number(s), 0);
        assert_eq!(g.local_number(x), 2);
        assert_eq!(g.node_by_local(p, 1), n);
        assert!(!g.is_call(n));
        assert!(g.is_exit(x));
    }

    #[test]
    fn call_wiring_and_callee_detection() {
        let mut g = InMemorySupergraph::new();
        let caller = g.add_proc();
        let callee = g.add_proc();

        let s_caller = g.add_node(caller, NodeKind::Entry);
        let call = g.add_node(caller, NodeKind::Call);
        let rs = g.add_node(caller, NodeKind::ReturnSite);
        let x_caller = g.add_node(caller, NodeKind::Exit);
        g.add_edge(s_caller, call);
        g.add_edge(call, rs);
        g.add_edge(rs, x_caller);

        let s_callee = g.add_node(callee, NodeKind::Entry);
        let x_callee = g.add_node(callee, NodeKind::Exit);
        g.add_edge(s_callee, x_callee);
        g.add_edge(x_callee, rs);

        g.add_call(call, &[s_callee], &[rs]);

        assert_eq!(g.called_procs(call), vec![s_callee]);
        assert_eq!(g.return_sites(call), vec![rs]);
        assert!(g.return_site_has_callee(rs));
        assert!(!g.return_site_has_callee(call));
        assert!(g.succ_numbers(x_callee).contains(&g.global_number(rs)));
    }
}
