// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The flow-function collaborator interface (§6).
//!
//! Constructing these per problem (e.g. alias-aware flow functions over a
//! points-to domain, the way `pta::context_sensitivity` builds propagation
//! rules) is out of scope (§1) — the solver only ever calls through these
//! traits.

use crate::fact_set::{Fact, FactSet};
use crate::supergraph::NodeId;

/// A flow function with one source fact in scope, producing the target
/// facts it maps to. The zero fact is passed through like any other.
pub trait UnaryFlowFunction {
    fn targets(&self, d: Fact) -> FactSet;
}

/// A return flow function either ignores the caller-side fact entirely
/// (`Unary`, common for context-insensitive problems) or needs it alongside
/// the exit-side fact to compute targets (`Binary`, needed for
/// context-sensitive value propagation such as passing a return value back
/// through the call-site's left-hand side).
pub enum ReturnFlowFunction {
    Unary(Box<dyn UnaryFlowFunction>),
    Binary(Box<dyn BinaryReturnFlowFunction>),
}

impl ReturnFlowFunction {
    pub fn targets(&self, call_d: Fact, exit_d: Fact) -> FactSet {
        match self {
            ReturnFlowFunction::Unary(f) => f.targets(exit_d),
            ReturnFlowFunction::Binary(f) => f.targets(call_d, exit_d),
        }
    }
}

/// A return flow function that needs both the fact that held at the call
/// site and the fact that held at the callee's exit.
pub trait BinaryReturnFlowFunction {
    fn targets(&self, call_d: Fact, exit_d: Fact) -> FactSet;
}

/// How two facts reaching the same node are combined. `None` means "keep
/// only the pre-existing fact" (the new one contributes nothing); `Some(d)`
/// replaces/extends the existing fact with the merged one `d`.
///
/// Most problems merge by simple union (handled by the solver tracking a
/// `FactSet` per node directly); this trait exists for problems where facts
/// themselves need combining, e.g. interval or constant-propagation lattices
/// riding on top of the IFDS fact domain.
pub trait MergeFunction {
    fn merge(&self, pre_existing: &FactSet, new_fact: Fact) -> Option<Fact>;
}

/// The full set of flow functions a [`crate::problem::TabulationProblem`]
/// supplies, one family per supergraph edge kind (§6).
pub trait FlowFunctionMap {
    /// Flow along an intraprocedural edge (including entry -> first
    /// statement, and return-site -> successor).
    fn normal_flow(&self, from: NodeId, to: NodeId) -> Box<dyn UnaryFlowFunction>;

    /// Flow from a call node into a callee's entry.
    fn call_flow(&self, call_node: NodeId, callee_entry: NodeId) -> Box<dyn UnaryFlowFunction>;

    /// Flow from a callee's exit back to one of the call's return sites.
    fn return_flow(&self, call_node: NodeId, exit_node: NodeId, return_site: NodeId) -> ReturnFlowFunction;

    /// Flow from a call node directly to one of its return sites, bypassing
    /// the callee entirely (the call-to-return edge every IFDS formulation
    /// needs for facts the call doesn't touch, e.g. locals other than the
    /// receiver/arguments).
    fn call_to_return_flow(&self, call_node: NodeId, return_site: NodeId) -> Box<dyn UnaryFlowFunction>;

    /// Flow from a call node to a return site when the call has no known
    /// callee at all (an unresolved virtual call, an external function).
    /// Defaults to the same treatment as `call_to_return_flow`.
    fn call_none_to_return_flow(&self, call_node: NodeId, return_site: NodeId) -> Box<dyn UnaryFlowFunction> {
        self.call_to_return_flow(call_node, return_site)
    }
}
