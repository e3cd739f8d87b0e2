// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Explicit engine context threaded through schedulers and runners.
//!
//! Everything that would otherwise be process-global state (configuration,
//! the store path, the live-subprocess registry) travels in one cloneable
//! value.

use crate::runner::AgentRegistry;
use fm_core::Config;
use fm_store::{Db, StoreError};
use std::sync::Arc;

#[derive(Clone)]
pub struct EngineContext {
    pub config: Arc<Config>,
    pub registry: AgentRegistry,
}

impl EngineContext {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            registry: AgentRegistry::default(),
        }
    }

    /// Open a fresh store handle for one subsystem. Each scheduler loop and
    /// each runner owns its own connection; WAL keeps readers concurrent.
    pub fn open_db(&self) -> Result<Db, StoreError> {
        Db::open(&self.config.db_path)
    }
}
