//! Composition root: wires the availability cache, the model service and the invoker.
//!
//! ```text
//! EngineConfig
//!   ↓
//! Arc<AvailabilityCache> ──▶ Arc<InMemoryModelService> (initializes the cache from its rooms)
//!                                  ↓ (SnapshotSupport, when enabled)
//!                            Mutex<CommandInvoker>
//! ```
//!
//! Callers build commands against [`Engine::model_service`] and hand them to
//! [`Engine::execute`]. The invoker mutex serializes command execution; cache and model
//! reads do not take it.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Context;
use thiserror::Error;

use innkeep_commands::{Command, CommandInvoker, InvokerError};
use innkeep_hotel::{ModelService, SnapshotSupport};

use crate::availability::AvailabilityCache;
use crate::config::EngineConfig;
use crate::model_service::InMemoryModelService;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Invoker(#[from] InvokerError),
    /// A thread panicked while holding the invoker.
    #[error("command invoker lock poisoned")]
    Poisoned,
}

pub struct Engine {
    config: EngineConfig,
    cache: Arc<AvailabilityCache>,
    model: Arc<InMemoryModelService>,
    invoker: Mutex<CommandInvoker>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let cache = Arc::new(AvailabilityCache::new());
        let model = Arc::new(if config.seed_catalog {
            InMemoryModelService::with_catalog(cache.clone())
        } else {
            InMemoryModelService::new(cache.clone())
        });

        let invoker = if config.snapshots {
            let snapshots: Arc<dyn SnapshotSupport> = model.clone();
            CommandInvoker::with_snapshots(config.max_history, snapshots)
        } else {
            CommandInvoker::new(config.max_history)
        };

        tracing::info!(
            max_history = config.max_history,
            snapshots = config.snapshots,
            rooms = cache.total_count(),
            "engine ready"
        );

        Self {
            config,
            cache,
            model,
            invoker: Mutex::new(invoker),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let config = EngineConfig::from_env().context("loading engine configuration")?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn model(&self) -> &Arc<InMemoryModelService> {
        &self.model
    }

    /// The model as commands take it.
    pub fn model_service(&self) -> Arc<dyn ModelService> {
        self.model.clone()
    }

    pub fn availability(&self) -> &Arc<AvailabilityCache> {
        &self.cache
    }

    pub fn execute(&self, command: Box<dyn Command>) -> Result<(), EngineError> {
        self.invoker()?.execute_command(command)?;
        Ok(())
    }

    pub fn undo(&self) -> Result<bool, EngineError> {
        Ok(self.invoker()?.undo()?)
    }

    pub fn redo(&self) -> Result<bool, EngineError> {
        Ok(self.invoker()?.redo()?)
    }

    pub fn can_undo(&self) -> bool {
        self.invoker().is_ok_and(|i| i.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.invoker().is_ok_and(|i| i.can_redo())
    }

    pub fn next_undo_description(&self) -> Option<String> {
        self.invoker().ok()?.next_undo_description()
    }

    pub fn next_redo_description(&self) -> Option<String> {
        self.invoker().ok()?.next_redo_description()
    }

    /// Executed command descriptions, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.invoker()
            .map(|i| i.command_history())
            .unwrap_or_default()
    }

    pub fn clear_history(&self) -> Result<(), EngineError> {
        self.invoker()?.clear_history();
        Ok(())
    }

    fn invoker(&self) -> Result<MutexGuard<'_, CommandInvoker>, EngineError> {
        self.invoker.lock().map_err(|_| EngineError::Poisoned)
    }
}
