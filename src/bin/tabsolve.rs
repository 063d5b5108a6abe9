// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! A toy driver for the tabulation solver: builds one of a few small
//! in-memory supergraphs, runs a trivial "reachability" problem over it, and
//! prints which facts reach which nodes. Exists to exercise the crate
//! end-to-end, not as a real static-analysis frontend.

use std::process::ExitCode;

use clap::{Arg, Command};
use itertools::Itertools;

use tabsolve::fact_set::{Fact, FactSet};
use tabsolve::flow_function::{FlowFunctionMap, ReturnFlowFunction, UnaryFlowFunction};
use tabsolve::problem::{Seed, Seeds, TabulationProblem, ZERO_FACT};
use tabsolve::solver::Solver;
use tabsolve::supergraph::builder::InMemorySupergraph;
use tabsolve::supergraph::{NodeKind, Supergraph};

fn make_options_parser() -> Command<'static> {
    Command::new("tabsolve").about("Run the tabulation solver over a toy supergraph").arg(
        Arg::new("scenario")
            .long("scenario")
            .takes_value(true)
            .value_parser(["single", "call", "shared-callee"])
            .default_value("single")
            .help("Which toy supergraph to solve."),
    )
}

/// The interesting fact: "reachable". Everything that can reach a node
/// carries this fact; there is no richer domain to speak of.
const REACHABLE: Fact = 1;

struct Identity;
impl UnaryFlowFunction for Identity {
    fn targets(&self, d: Fact) -> FactSet {
        FactSet::singleton(d)
    }
}

struct KillZero;
impl UnaryFlowFunction for KillZero {
    fn targets(&self, d: Fact) -> FactSet {
        if d == ZERO_FACT { FactSet::new() } else { FactSet::singleton(d) }
    }
}

struct ReachabilityFunctions;
impl FlowFunctionMap for ReachabilityFunctions {
    fn normal_flow(&self, _from: tabsolve::supergraph::NodeId, _to: tabsolve::supergraph::NodeId) -> Box<dyn UnaryFlowFunction> {
        Box::new(Identity)
    }
    fn call_flow(&self, _call_node: tabsolve::supergraph::NodeId, _callee_entry: tabsolve::supergraph::NodeId) -> Box<dyn UnaryFlowFunction> {
        Box::new(Identity)
    }
    fn return_flow(&self, _call_node: tabsolve::supergraph::NodeId, _exit_node: tabsolve::supergraph::NodeId, _return_site: tabsolve::supergraph::NodeId) -> ReturnFlowFunction {
        ReturnFlowFunction::Unary(Box::new(Identity))
    }
    fn call_to_return_flow(&self, _call_node: tabsolve::supergraph::NodeId, _return_site: tabsolve::supergraph::NodeId) -> Box<dyn UnaryFlowFunction> {
        Box::new(KillZero)
    }
}

struct ReachabilityProblem {
    graph: InMemorySupergraph,
    functions: ReachabilityFunctions,
    seeds: Seeds,
}

impl TabulationProblem for ReachabilityProblem {
    type Graph = InMemorySupergraph;
    type Functions = ReachabilityFunctions;

    fn supergraph(&self) -> &Self::Graph {
        &self.graph
    }
    fn function_map(&self) -> &Self::Functions {
        &self.functions
    }
    fn initial_seeds(&self) -> Seeds {
        self.seeds.clone()
    }
}

fn build_single() -> ReachabilityProblem {
    let mut graph = InMemorySupergraph::new();
    let p = graph.add_proc();
    let entry = graph.add_node(p, NodeKind::Entry);
    let mid = graph.add_node(p, NodeKind::Normal);
    let exit = graph.add_node(p, NodeKind::Exit);
    graph.add_edge(entry, mid);
    graph.add_edge(mid, exit);

    let mut seeds = Seeds::new();
    seeds.push(Seed::new(entry, REACHABLE));
    ReachabilityProblem { graph, functions: ReachabilityFunctions, seeds }
}

fn build_call() -> ReachabilityProblem {
    let mut graph = InMemorySupergraph::new();
    let caller = graph.add_proc();
    let callee = graph.add_proc();

    let s_caller = graph.add_node(caller, NodeKind::Entry);
    let call = graph.add_node(caller, NodeKind::Call);
    let rs = graph.add_node(caller, NodeKind::ReturnSite);
    let x_caller = graph.add_node(caller, NodeKind::Exit);
    graph.add_edge(s_caller, call);
    graph.add_edge(call, rs);
    graph.add_edge(rs, x_caller);

    let s_callee = graph.add_node(callee, NodeKind::Entry);
    let x_callee = graph.add_node(callee, NodeKind::Exit);
    graph.add_edge(s_callee, x_callee);
    graph.add_edge(x_callee, rs);

    graph.add_call(call, &[s_callee], &[rs]);

    let mut seeds = Seeds::new();
    seeds.push(Seed::new(s_caller, REACHABLE));
    ReachabilityProblem { graph, functions: ReachabilityFunctions, seeds }
}

fn build_shared_callee() -> ReachabilityProblem {
    let mut graph = InMemorySupergraph::new();
    let caller_a = graph.add_proc();
    let caller_b = graph.add_proc();
    let callee = graph.add_proc();

    let s_callee = graph.add_node(callee, NodeKind::Entry);
    let x_callee = graph.add_node(callee, NodeKind::Exit);
    graph.add_edge(s_callee, x_callee);

    let s_a = graph.add_node(caller_a, NodeKind::Entry);
    let call_a = graph.add_node(caller_a, NodeKind::Call);
    let rs_a = graph.add_node(caller_a, NodeKind::ReturnSite);
    graph.add_edge(s_a, call_a);
    graph.add_edge(call_a, rs_a);
    graph.add_edge(x_callee, rs_a);
    graph.add_call(call_a, &[s_callee], &[rs_a]);

    let s_b = graph.add_node(caller_b, NodeKind::Entry);
    let call_b = graph.add_node(caller_b, NodeKind::Call);
    let rs_b = graph.add_node(caller_b, NodeKind::ReturnSite);
    graph.add_edge(s_b, call_b);
    graph.add_edge(call_b, rs_b);
    graph.add_edge(x_callee, rs_b);
    graph.add_call(call_b, &[s_callee], &[rs_b]);

    let mut seeds = Seeds::new();
    seeds.push(Seed::new(s_a, REACHABLE));
    seeds.push(Seed::new(s_b, REACHABLE));
    ReachabilityProblem { graph, functions: ReachabilityFunctions, seeds }
}

fn main() -> ExitCode {
    env_logger::init();
    let matches = make_options_parser().get_matches();
    let scenario = matches.value_of("scenario").expect("has a default value");

    let problem = match scenario {
        "single" => build_single(),
        "call" => build_call(),
        "shared-callee" => build_shared_callee(),
        other => {
            eprintln!("unknown scenario: {other}");
            return ExitCode::FAILURE;
        }
    };

    let mut solver = Solver::new(&problem);
    let result = match solver.solve() {
        Ok(result) => result,
        Err(err) => {
            eprintln!("solve failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    for node in problem.supergraph().nodes().into_iter().sorted_by_key(|n| n.0).collect_vec() {
        let facts = result.facts_at(node);
        if !facts.is_empty() {
            println!("{node:?}: {facts:?}");
        }
    }

    let diag = solver.diagnostics();
    println!(
        "worklist pops: {}, path edges: {}, summaries: {}, summary replays: {}",
        diag.worklist_pops(),
        diag.path_edges_propagated(),
        diag.summaries_recorded(),
        diag.summary_replays(),
    );

    ExitCode::SUCCESS
}
