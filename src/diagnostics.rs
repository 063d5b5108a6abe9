// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Per-solve counters and an optional soft-eviction hook (§4.8).
//!
//! Unlike the teacher's statistics types (`util::pta_statistics`, dropped —
//! they print to a global report at the end of a whole-program run),
//! `Diagnostics` is an explicit field owned by each `Solver`: nothing here is
//! global or static, so running two solvers side by side never cross-counts.

/// Counters describing one solver's work. Cheap to read at any point during
/// or after a solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    path_edges_propagated: u64,
    summaries_recorded: u64,
    summary_replays: u64,
    flow_function_invocations: u64,
    worklist_pops: u64,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path_edges_propagated(&self) -> u64 {
        self.path_edges_propagated
    }

    pub fn summaries_recorded(&self) -> u64 {
        self.summaries_recorded
    }

    pub fn summary_replays(&self) -> u64 {
        self.summary_replays
    }

    pub fn flow_function_invocations(&self) -> u64 {
        self.flow_function_invocations
    }

    pub fn worklist_pops(&self) -> u64 {
        self.worklist_pops
    }

    pub(crate) fn record_path_edge(&mut self) {
        self.path_edges_propagated += 1;
    }

    pub(crate) fn record_summary(&mut self) {
        self.summaries_recorded += 1;
    }

    pub(crate) fn record_summary_replay(&mut self) {
        self.summary_replays += 1;
    }

    pub(crate) fn record_flow_function_invocation(&mut self) {
        self.flow_function_invocations += 1;
    }

    pub(crate) fn record_worklist_pop(&mut self) {
        self.worklist_pops += 1;
    }
}

/// How often the solver offers callers a chance to soft-evict memory, in
/// worklist pops. Matches the default cadence §4.8 specifies.
pub const SOFT_EVICT_INTERVAL: u64 = 1024;
