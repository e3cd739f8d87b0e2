// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Scheduler host.

use fm_engine::{Broadcaster, EngineContext, EngineError, ListenerRegistrar, TriggerProcessor};
use fm_store::Db;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Grace window between SIGTERM and SIGKILL for live agents on shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Running scheduler loops plus the handle external accept paths use to
/// attach event listeners.
pub struct Schedulers {
    pub registrar: ListenerRegistrar,
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl Schedulers {
    /// Run migrations and start the trigger processor and broadcaster.
    pub fn start(ctx: &EngineContext) -> Result<Self, EngineError> {
        Db::init(&ctx.config.db_path)?;

        let cancel = CancellationToken::new();
        let trigger = TriggerProcessor::new(ctx.clone())?;
        let (broadcaster, registrar) = Broadcaster::new(ctx)?;

        let handles = vec![
            tokio::spawn(trigger.run(cancel.child_token())),
            tokio::spawn(broadcaster.run(cancel.child_token())),
        ];
        tracing::info!(
            db = %ctx.config.db_path.display(),
            max_parallel_agents = ctx.config.max_parallel_agents,
            "schedulers started"
        );
        Ok(Self {
            registrar,
            cancel,
            handles,
        })
    }

    /// Cancel the loops, terminate registered agents, and wait everything
    /// out.
    pub async fn shutdown(self, ctx: &EngineContext) {
        self.cancel.cancel();
        ctx.registry.shutdown(SHUTDOWN_GRACE).await;
        for handle in self.handles {
            let _ = handle.await;
        }
        tracing::info!("schedulers stopped");
    }
}

/// Run the schedulers until interrupted, then shut down in order.
pub async fn serve(ctx: EngineContext) -> Result<(), EngineError> {
    let schedulers = Schedulers::start(&ctx)?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for interrupt");
    }
    tracing::info!("interrupt received, shutting down");

    schedulers.shutdown(&ctx).await;
    Ok(())
}

#[cfg(test)]
#[path = "serve_tests.rs"]
mod tests;
