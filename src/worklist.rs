// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The solver's worklist (§4.5, §9 Open Question 1).
//!
//! `std::collections::BinaryHeap<T: Ord>`, with the ordering expressed by a
//! newtype wrapper (`HeapEntry`) that carries a reference to the problem and
//! implements `Ord` purely in terms of `TabulationProblem::has_priority_over`
//! — ties (including the common case of a problem with no preference at all)
//! fall back to insertion sequence number, so a problem that never overrides
//! the default behaves as a plain FIFO queue.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::edge::PathEdge;
use crate::problem::TabulationProblem;

struct HeapEntry<'p, P: TabulationProblem> {
    problem: &'p P,
    edge: PathEdge,
    seq: u64,
}

impl<'p, P: TabulationProblem> PartialEq for HeapEntry<'p, P> {
    fn eq(&self, other: &Self) -> bool {
        self.edge == other.edge && self.seq == other.seq
    }
}

impl<'p, P: TabulationProblem> Eq for HeapEntry<'p, P> {}

impl<'p, P: TabulationProblem> PartialOrd for HeapEntry<'p, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'p, P: TabulationProblem> Ord for HeapEntry<'p, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.problem.has_priority_over(self.edge.target, self.edge.d2, other.edge.target, other.edge.d2) {
            Ordering::Greater
        } else if self.problem.has_priority_over(other.edge.target, other.edge.d2, self.edge.target, self.edge.d2) {
            Ordering::Less
        } else {
            // Earlier insertions sort greater, so a `BinaryHeap` (a max-heap)
            // pops them first when neither edge has priority over the other.
            other.seq.cmp(&self.seq)
        }
    }
}

pub struct Worklist<'p, P: TabulationProblem> {
    problem: &'p P,
    heap: BinaryHeap<HeapEntry<'p, P>>,
    next_seq: u64,
}

impl<'p, P: TabulationProblem> Worklist<'p, P> {
    pub fn new(problem: &'p P) -> Self {
        Worklist { problem, heap: BinaryHeap::new(), next_seq: 0 }
    }

    pub fn push(&mut self, edge: PathEdge) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(HeapEntry { problem: self.problem, edge, seq });
    }

    pub fn pop(&mut self) -> Option<PathEdge> {
        self.heap.pop().map(|entry| entry.edge)
    }

    /// The edge that would be returned by the next `pop`, without removing
    /// it. A proper non-mutating peek, replacing the pop-then-reinsert the
    /// source used for the same query.
    pub fn peek(&self) -> Option<&PathEdge> {
        self.heap.peek().map(|entry| &entry.edge)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
