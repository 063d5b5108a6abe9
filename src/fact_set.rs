// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The `IntSet` façade over non-negative dataflow-fact ids.
//!
//! Grounded on the teacher's `HybridPointsToSet`: an explicit array below a
//! small-set threshold, a dense bit vector above it. Every memo table in
//! `memo` is keyed by these sets, and `union`'s changed-or-not return value is
//! what drives every "is this a newly discovered fact" check in `solver`.

use std::fmt;
use std::slice;

use crate::util::bit_vec::{BitIter, BitVec, Idx};

const SMALL_SET_CAPACITY: usize = 16;

/// A dataflow fact: a stable, non-negative integer id. Fact `0` is
/// conventionally the zero/bottom fact (see `problem::ZERO_FACT`).
pub type Fact = u32;

impl Idx for Fact {
    #[inline]
    fn new(idx: usize) -> Self {
        assert!(idx <= Fact::MAX as usize);
        idx as Fact
    }
    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// A set of [`Fact`]s. Cheap to clone: cloning a small set clones a short
/// `Vec`, cloning a large set clones its word array.
#[derive(Clone, PartialEq, Eq)]
pub struct FactSet {
    repr: Repr,
}

#[derive(Clone, PartialEq, Eq)]
enum Repr {
    Small(Vec<Fact>),
    Large(BitVec<Fact>),
}

impl fmt::Debug for FactSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Default for FactSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FactSet {
    pub fn new() -> Self {
        FactSet { repr: Repr::Small(Vec::new()) }
    }

    pub fn singleton(fact: Fact) -> Self {
        let mut set = Self::new();
        set.insert(fact);
        set
    }

    pub fn from_iter(facts: impl IntoIterator<Item = Fact>) -> Self {
        let mut set = Self::new();
        for fact in facts {
            set.insert(fact);
        }
        set
    }

    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Small(small) => small.len(),
            Repr::Large(large) => large.count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.repr {
            Repr::Small(small) => small.is_empty(),
            Repr::Large(large) => large.is_empty(),
        }
    }

    pub fn contains(&self, fact: Fact) -> bool {
        match &self.repr {
            Repr::Small(small) => small.contains(&fact),
            Repr::Large(large) => large.contains(fact),
        }
    }

    /// Adds `fact`. Returns whether the set changed.
    pub fn insert(&mut self, fact: Fact) -> bool {
        match &mut self.repr {
            Repr::Small(small) if small.contains(&fact) => false,
            Repr::Small(small) if small.len() < SMALL_SET_CAPACITY => {
                small.push(fact);
                true
            }
            Repr::Small(small) => {
                let mut large = BitVec::new_empty();
                for &f in small.iter() {
                    large.insert(f);
                }
                let changed = large.insert(fact);
                self.repr = Repr::Large(large);
                changed
            }
            Repr::Large(large) => large.insert(fact),
        }
    }

    /// Unions `other` into `self`. Returns whether `self` changed — this is
    /// the signal the solver uses to decide whether an edge is newly
    /// discovered and must be enqueued.
    pub fn union(&mut self, other: &FactSet) -> bool {
        match (&mut self.repr, &other.repr) {
            (Repr::Large(self_large), Repr::Large(other_large)) => self_large.union(other_large),
            (Repr::Large(self_large), Repr::Small(other_small)) => {
                let mut changed = false;
                for &fact in other_small {
                    changed |= self_large.insert(fact);
                }
                changed
            }
            (Repr::Small(self_small), Repr::Large(other_large)) => {
                let mut large = BitVec::new_empty();
                for &f in self_small.iter() {
                    large.insert(f);
                }
                let changed = large.union(other_large);
                self.repr = Repr::Large(large);
                changed
            }
            (Repr::Small(_), Repr::Small(other_small)) => {
                let mut changed = false;
                for &fact in other_small {
                    changed |= self.insert(fact);
                }
                changed
            }
        }
    }

    pub fn superset(&self, other: &FactSet) -> bool {
        other.iter().all(|fact| self.contains(fact))
    }

    pub fn iter(&self) -> FactSetIter<'_> {
        match &self.repr {
            Repr::Small(small) => FactSetIter::Small(small.iter()),
            Repr::Large(large) => FactSetIter::Large(large.iter()),
        }
    }
}

impl FromIterator<Fact> for FactSet {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self {
        FactSet::from_iter(iter)
    }
}

impl<'a> IntoIterator for &'a FactSet {
    type Item = Fact;
    type IntoIter = FactSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub enum FactSetIter<'a> {
    Small(slice::Iter<'a, Fact>),
    Large(BitIter<'a, Fact>),
}

impl<'a> Iterator for FactSetIter<'a> {
    type Item = Fact;

    fn next(&mut self) -> Option<Fact> {
        match self {
            FactSetIter::Small(it) => it.next().copied(),
            FactSetIter::Large(it) => it.next(),
        }
    }
}
