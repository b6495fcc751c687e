//! Infrastructure layer: availability cache, in-memory model service, config and the
//! engine that wires them to the command invoker.

pub mod availability;
pub mod config;
pub mod engine;
pub mod model_service;


pub use availability::AvailabilityCache;
pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, EngineError};
pub use model_service::InMemoryModelService;
