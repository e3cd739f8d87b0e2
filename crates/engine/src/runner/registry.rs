// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Process-wide registry of live agent subprocesses.
//!
//! The CLI's interrupt path terminates everything registered here: SIGTERM
//! first, SIGKILL for whatever survives the grace window. Runners register
//! on spawn and deregister when the child is reaped.

use fm_core::RunId;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Default)]
pub struct AgentRegistry {
    inner: Arc<Mutex<HashMap<RunId, u32>>>,
}

impl AgentRegistry {
    pub fn register(&self, run_id: &RunId, pid: u32) {
        self.inner.lock().insert(run_id.clone(), pid);
    }

    pub fn deregister(&self, run_id: &RunId) {
        self.inner.lock().remove(run_id);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Ask every live subprocess to terminate.
    pub fn terminate_all(&self) {
        self.signal_all(Signal::SIGTERM);
    }

    /// Terminate, wait out the grace window, then force-kill survivors.
    pub async fn shutdown(&self, grace: Duration) {
        if self.is_empty() {
            return;
        }
        tracing::info!(count = self.len(), "terminating agent subprocesses");
        self.terminate_all();

        let deadline = tokio::time::Instant::now() + grace;
        while !self.is_empty() && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        if !self.is_empty() {
            tracing::warn!(count = self.len(), "force-killing agent subprocesses");
            self.signal_all(Signal::SIGKILL);
        }
    }

    fn signal_all(&self, signal: Signal) {
        let pids: Vec<u32> = self.inner.lock().values().copied().collect();
        for pid in pids {
            // Already-gone processes are fine.
            let _ = kill(Pid::from_raw(pid as i32), signal);
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
