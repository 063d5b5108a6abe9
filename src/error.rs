// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The solver's error taxonomy (§7).
//!
//! Grounded on the `kirin-interpreter` error-enum pattern: the teacher's own
//! core loop barely surfaces `Result`s (collaborator failures are expected to
//! panic, same as here), so there is no analogous enum to adapt directly.

use crate::fact_set::Fact;
use crate::result::PartialResult;

/// Errors the solver's public API can return.
///
/// Internal invariant violations (a negative-equivalent local block number, a
/// malformed `Supergraph`/`FlowFunctionMap` implementation) are programming
/// errors and surface as panics, not as variants here — retrying a broken
/// collaborator is meaningless.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// A fact outside the domain the problem declared was passed to a public
    /// entry point (currently only `Solver::add_seed`).
    #[error("fact {fact} is outside the declared domain")]
    InvalidDomainFact { fact: Fact },

    /// The solve was cancelled cooperatively. Carries the partial result
    /// computed up to the point of cancellation.
    #[error("solve cancelled after propagating a partial result")]
    Cancelled(PartialResult),

    /// An operation this crate intentionally never implements.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl SolverError {
    /// Recovers the partial result carried by a `Cancelled` error.
    ///
    /// Panics if called on any other variant; callers that might be handed a
    /// non-cancellation error should match on the variant first.
    pub fn into_partial_result(self) -> PartialResult {
        match self {
            SolverError::Cancelled(partial) => partial,
            other => panic!("into_partial_result called on non-cancellation error: {other}"),
        }
    }
}

pub type SolverResult<T> = Result<T, SolverError>;
