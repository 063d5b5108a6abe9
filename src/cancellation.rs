// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Cooperative cancellation (§5).
//!
//! The solver is single-threaded and never blocks, so there is nothing to
//! interrupt in the usual sense — `CancellationToken` is polled once per
//! worklist iteration instead. A clone can be handed to another thread (a
//! UI thread, a timeout watchdog) that calls `cancel()` while the solve
//! runs elsewhere.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
