// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The `Supergraph` collaborator interface (§6).
//!
//! Supergraph construction — building an ICFG from bytecode, a call graph,
//! class hierarchy analysis — is explicitly out of scope for this crate (§1).
//! The solver only ever sees this trait. [`builder`] provides a small
//! in-memory implementation used by the test suite and the `tabsolve` demo
//! binary; it is a fixture, not a general-purpose CFG builder.

pub mod builder;

use std::fmt;

/// Opaque handle to a basic block in the exploded ICFG.
///
/// Modeled as an integer handle into a host-owned arena rather than a generic
/// type parameter, per the REDESIGN FLAGS: this sidesteps node-identity
/// ownership questions and gives cache-friendly keys for the memo tables.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Opaque handle to a procedure.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcId(pub u32);

impl fmt::Debug for ProcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcId({})", self.0)
    }
}

/// The structural role of a node in the supergraph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Entry,
    Exit,
    Call,
    ReturnSite,
    Normal,
}

/// The abstract supergraph the solver is tabulated over.
///
/// All queries are expected to be cheap (backed by arenas/maps built ahead of
/// time by the host) — the solver calls most of them once per worklist pop.
pub trait Supergraph {
    fn kind(&self, node: NodeId) -> NodeKind;

    fn is_call(&self, node: NodeId) -> bool {
        self.kind(node) == NodeKind::Call
    }

    fn is_exit(&self, node: NodeId) -> bool {
        self.kind(node) == NodeKind::Exit
    }

    fn is_entry(&self, node: NodeId) -> bool {
        self.kind(node) == NodeKind::Entry
    }

    /// Successors of `node` in the supergraph (normal control flow, or
    /// exit→return-site edges for an exit node).
    fn succ_nodes(&self, node: NodeId) -> Vec<NodeId>;

    /// Predecessors of `node` (callers' call nodes, for an entry node).
    fn pred_nodes(&self, node: NodeId) -> Vec<NodeId>;

    /// Entry nodes of the callees of a call node (there may be more than one
    /// when the call is resolved to multiple possible targets).
    fn called_procs(&self, call_node: NodeId) -> Vec<NodeId>;

    /// Normal-flow successors of a call node (distinct from its callees'
    /// entries) — supports problems where a call block also fans out
    /// normally, e.g. backward analyses.
    fn normal_successors(&self, call_node: NodeId) -> Vec<NodeId>;

    /// Return sites associated with a call node.
    fn return_sites(&self, call_node: NodeId) -> Vec<NodeId>;

    /// All entry nodes of a procedure (there may be more than one, modeling
    /// e.g. multiple possible starting points).
    fn entries_of(&self, proc: ProcId) -> Vec<NodeId>;

    /// All exit nodes of a procedure (more than one models exceptional exits).
    fn exits_of(&self, proc: ProcId) -> Vec<NodeId>;

    /// The global (whole-supergraph) numbering of a node.
    fn global_number(&self, node: NodeId) -> u32;

    /// The per-procedure local numbering of a node.
    fn local_number(&self, node: NodeId) -> u32;

    /// Reverse of `local_number`: look a node back up by procedure + local
    /// number.
    fn node_by_local(&self, proc: ProcId, local_number: u32) -> NodeId;

    /// Global numbers of `node`'s successors, as a plain set — used by
    /// `process_exit`'s return-site reachability filter (§4.1.a).
    fn succ_numbers(&self, node: NodeId) -> std::collections::HashSet<u32> {
        self.succ_nodes(node)
            .into_iter()
            .map(|n| self.global_number(n))
            .collect()
    }

    fn proc_of(&self, node: NodeId) -> ProcId;

    fn contains_node(&self, node: NodeId) -> bool;

    /// All nodes in the supergraph, in an unspecified but stable order.
    fn nodes(&self) -> Vec<NodeId>;

    /// True if `return_site` has any callee, determined by inspecting its
    /// predecessors for one belonging to a different procedure than the
    /// return site itself (§4.1, "has any callee").
    fn return_site_has_callee(&self, return_site: NodeId) -> bool {
        let this_proc = self.proc_of(return_site);
        self.pred_nodes(return_site)
            .into_iter()
            .any(|pred| self.proc_of(pred) != this_proc)
    }
}
