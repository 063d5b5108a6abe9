// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The path-edge record at the center of the tabulation algorithm (§4).

use crate::fact_set::Fact;
use crate::supergraph::NodeId;

/// A path edge `<entry, d1> -> <target, d2>`: fact `d1` holds at `entry`
/// implies fact `d2` holds at `target`, within the same procedure (or at a
/// procedure's own entry, for the self-edge every entry node starts with).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PathEdge {
    pub entry: NodeId,
    pub d1: Fact,
    pub target: NodeId,
    pub d2: Fact,
}

impl PathEdge {
    pub fn new(entry: NodeId, d1: Fact, target: NodeId, d2: Fact) -> Self {
        PathEdge { entry, d1, target, d2 }
    }
}
