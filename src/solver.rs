// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The tabulation solver (§4).
//!
//! The worklist loop and its changed-flag propagation follow the shape of
//! the teacher's `Propagator::propagate` loop in `pta/propagator/propagator.rs`
//! (pop a work item, dispatch on what kind of node it targets, push whatever
//! newly changes); what differs is that every domain-specific decision —
//! the graph, the flow functions, how two facts merge — comes from a
//! [`TabulationProblem`] instead of being hardwired to a points-to lattice.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};

use crate::cancellation::CancellationToken;
use crate::diagnostics::{Diagnostics, SOFT_EVICT_INTERVAL};
use crate::edge::PathEdge;
use crate::error::{SolverError, SolverResult};
use crate::fact_set::Fact;
use crate::flow_function::FlowFunctionMap;
use crate::memo::{CallFlowEdges, LocalPathEdges, LocalSummaryEdges};
use crate::problem::{Seed, Seeds, TabulationProblem};
use crate::result::Result;
use crate::supergraph::{NodeId, NodeKind, Supergraph};
use crate::worklist::Worklist;

/// `warn!` if a soft-eviction hook runs longer than this — it runs inline on
/// the solve loop, so a slow hook directly stalls convergence.
const SLOW_HOOK_THRESHOLD: Duration = Duration::from_millis(50);

/// Tabulates a [`TabulationProblem`] to a fixed point.
///
/// Owns all three memo tables and the worklist. `Send` as long as `P` is
/// `Sync` (nothing here is thread-local); not `Sync` itself, since every
/// public method but the read-only accessors takes `&mut self`.
pub struct Solver<'p, P: TabulationProblem> {
    problem: &'p P,
    worklist: Worklist<'p, P>,
    path_edges: LocalPathEdges,
    summary_edges: LocalSummaryEdges,
    call_flow_edges: CallFlowEdges,
    diagnostics: Diagnostics,
    cancellation: CancellationToken,
    on_soft_evict: Option<Box<dyn FnMut() + Send>>,
    seeds: Seeds,
}

impl<'p, P: TabulationProblem> Solver<'p, P> {
    pub fn new(problem: &'p P) -> Self {
        Solver {
            problem,
            worklist: Worklist::new(problem),
            path_edges: LocalPathEdges::new(),
            summary_edges: LocalSummaryEdges::new(),
            call_flow_edges: CallFlowEdges::new(),
            diagnostics: Diagnostics::new(),
            cancellation: CancellationToken::new(),
            on_soft_evict: None,
            seeds: Seeds::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Installs a hook invoked every [`SOFT_EVICT_INTERVAL`] worklist pops.
    /// The hook never touches this solver's own memo tables — it exists for
    /// callers who want to release unrelated memory (e.g. a bytecode cache)
    /// under pressure from a long-running solve.
    pub fn on_soft_evict(mut self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_soft_evict = Some(Box::new(hook));
        self
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Adds a seed fact after construction, e.g. for incremental or demand
    /// driven use. Most callers instead rely on
    /// `TabulationProblem::initial_seeds`, applied automatically by `solve`.
    pub fn add_seed(&mut self, seed: Seed) -> SolverResult<()> {
        if !self.problem.is_valid_fact(seed.fact) {
            return Err(SolverError::InvalidDomainFact { fact: seed.fact });
        }
        self.seeds.push(seed);
        self.propagate(PathEdge::new(seed.node, seed.fact, seed.node, seed.fact));
        Ok(())
    }

    /// Runs to a fixed point (or until cancelled) and returns the computed
    /// facts.
    pub fn solve(&mut self) -> SolverResult<Result> {
        let started = Instant::now();
        self.seed_from_problem();

        loop {
            if self.cancellation.is_cancelled() {
                return Err(SolverError::Cancelled(self.build_result()));
            }

            let Some(edge) = self.worklist.pop() else { break };
            self.diagnostics.record_worklist_pop();

            if self.diagnostics.worklist_pops() % SOFT_EVICT_INTERVAL == 0 {
                self.run_soft_evict_hook();
            }

            match self.problem.supergraph().kind(edge.target) {
                NodeKind::Call => self.process_call(edge),
                NodeKind::Exit => self.process_exit(edge),
                NodeKind::Entry | NodeKind::Normal | NodeKind::ReturnSite => self.process_normal(edge),
            }
        }

        debug!(
            "solve completed in {}, {} worklist pops, {} summaries",
            humantime::format_duration(started.elapsed()),
            self.diagnostics.worklist_pops(),
            self.diagnostics.summaries_recorded(),
        );
        Ok(self.build_result())
    }

    fn seed_from_problem(&mut self) {
        let seeds = self.problem.initial_seeds();
        for &seed in seeds.iter() {
            self.seeds.push(seed);
            self.propagate(PathEdge::new(seed.node, seed.fact, seed.node, seed.fact));
        }
    }

    fn run_soft_evict_hook(&mut self) {
        let Some(hook) = self.on_soft_evict.as_mut() else { return };
        let started = Instant::now();
        hook();
        let elapsed = started.elapsed();
        if elapsed > SLOW_HOOK_THRESHOLD {
            warn!("soft-eviction hook took {elapsed:?}, longer than the {SLOW_HOOK_THRESHOLD:?} budget");
        }
    }

    /// Flow along an intraprocedural edge out of `edge.target`, or the
    /// call-to-return/call-to-callee flows when `edge.target` is a call
    /// node, or summary replay when it's an exit node.
    fn process_normal(&mut self, edge: PathEdge) {
        let graph = self.problem.supergraph();
        let functions = self.problem.function_map();
        for succ in graph.succ_nodes(edge.target) {
            let flow = functions.normal_flow(edge.target, succ);
            self.diagnostics.record_flow_function_invocation();
            for d3 in flow.targets(edge.d2).iter() {
                self.propagate(PathEdge::new(edge.entry, edge.d1, succ, d3));
            }
        }
    }

    fn process_call(&mut self, edge: PathEdge) {
        let call_node = edge.target;
        let call_d = edge.d2;
        let graph = self.problem.supergraph();
        let functions = self.problem.function_map();

        let return_sites = graph.return_sites(call_node);
        let callees = graph.called_procs(call_node);

        for &return_site in &return_sites {
            let bypass = if graph.return_site_has_callee(return_site) {
                functions.call_to_return_flow(call_node, return_site)
            } else {
                functions.call_none_to_return_flow(call_node, return_site)
            };
            self.diagnostics.record_flow_function_invocation();
            for d5 in bypass.targets(call_d).iter() {
                self.propagate(PathEdge::new(edge.entry, edge.d1, return_site, d5));
            }
        }

        for &callee_entry in &callees {
            let flow = functions.call_flow(call_node, callee_entry);
            self.diagnostics.record_flow_function_invocation();
            for d_callee in flow.targets(call_d).iter() {
                let is_new = self.call_flow_edges.insert(callee_entry, d_callee, call_node, call_d);
                if is_new {
                    self.propagate(PathEdge::new(callee_entry, d_callee, callee_entry, d_callee));
                }

                // The callee may already have a summary for `d_callee` from
                // an earlier call site — in that case `process_exit` already
                // ran for it and will never run again, so replay the
                // existing summary into this newly discovered call site
                // instead of waiting for an exit that isn't coming.
                let callee_proc = graph.proc_of(callee_entry);
                for exit_node in graph.exits_of(callee_proc) {
                    let known_at_exit = self.summary_edges.get(callee_entry, exit_node, d_callee);
                    for d_exit in known_at_exit.iter() {
                        self.diagnostics.record_summary_replay();
                        trace!(
                            "replaying summary for callee {callee_entry:?} -> exit {exit_node:?} \
                             at newly discovered call {call_node:?}"
                        );
                        self.deliver_summary(call_node, call_d, exit_node, d_exit);
                    }
                }
            }
        }
    }

    /// A path edge reaching a procedure's exit records the callee-indexed
    /// summary edge `(entry, exit, d1) -> d2` (§4.3) and delivers it to every
    /// call site already known to reach this procedure's entry with `d1` —
    /// a summary computed once here serves any call site of this callee,
    /// present or future (the future ones catch up from `process_call`).
    fn process_exit(&mut self, edge: PathEdge) {
        let exit_node = edge.target;

        let is_new_summary = self.summary_edges.insert(edge.entry, exit_node, edge.d1, edge.d2);
        if is_new_summary {
            self.diagnostics.record_summary();
            debug!("recorded summary for {:?} -> {exit_node:?}: {} -> {}", edge.entry, edge.d1, edge.d2);
        }

        let callers: Vec<(NodeId, Fact)> =
            self.call_flow_edges.callers_of(edge.entry, edge.d1).collect();
        for (call_node, call_d) in callers {
            self.deliver_summary(call_node, call_d, exit_node, edge.d2);
        }
    }

    /// Applies the return flow for one call site reaching one fact at one
    /// of its callee's exits and propagates the result into every path edge
    /// already known to reach this call. Never touches the summary table —
    /// callers decide whether this delivery is the summary's first recording
    /// (`process_exit`) or a replay into a call site discovered afterwards
    /// (`process_call`).
    fn deliver_summary(&mut self, call_node: NodeId, call_d: Fact, exit_node: NodeId, d_exit: Fact) {
        let graph = self.problem.supergraph();
        let functions = self.problem.function_map();
        let exit_succ_numbers = graph.succ_numbers(exit_node);

        for return_site in graph.return_sites(call_node) {
            if !exit_succ_numbers.contains(&graph.global_number(return_site)) {
                continue;
            }

            let return_flow = functions.return_flow(call_node, exit_node, return_site);
            self.diagnostics.record_flow_function_invocation();

            for d5 in return_flow.targets(call_d, d_exit).iter() {
                let sources: Vec<(NodeId, Fact)> =
                    self.path_edges.sources_of(call_node, call_d).collect();
                for (caller_entry, caller_d1) in sources {
                    self.propagate(PathEdge::new(caller_entry, caller_d1, return_site, d5));
                }
            }
        }
    }

    /// Records `edge`, and if it carries new information, enqueues it. With
    /// no merge function configured, facts reaching the same node simply
    /// accumulate (plain IFDS union). With one configured, the existing
    /// facts for `(edge.entry, edge.d1, edge.target)` and the incoming fact
    /// are run through it; `None` drops the edge, `Some(d)` collapses the
    /// bucket down to `{d}` (§8 property 6).
    fn propagate(&mut self, edge: PathEdge) {
        let (edge, changed) = match self.problem.merge_function() {
            Some(merge_fn) => {
                let existing = self.path_edges.facts(edge.entry, edge.d1, edge.target);
                let Some(d2) = merge_fn.merge(&existing, edge.d2) else { return };
                let edge = PathEdge { d2, ..edge };
                let changed = self.path_edges.replace(edge);
                (edge, changed)
            }
            None => {
                let changed = self.path_edges.insert(edge);
                (edge, changed)
            }
        };
        if changed {
            self.diagnostics.record_path_edge();
            trace!("propagated {edge:?}");
            self.worklist.push(edge);
        }
    }

    fn build_result(&self) -> Result {
        let mut facts_at: HashMap<NodeId, crate::fact_set::FactSet> = HashMap::new();
        for edge in self.path_edges.iter() {
            facts_at.entry(edge.target).or_default().insert(edge.d2);
        }
        Result::new(facts_at, self.summary_edges.snapshot(), self.seeds.clone())
    }
}
