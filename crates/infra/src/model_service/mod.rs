//! Model service implementations.
//!
//! The contracts live in `innkeep-hotel` ([`ModelService`](innkeep_hotel::ModelService),
//! [`SnapshotSupport`](innkeep_hotel::SnapshotSupport)); this module provides the
//! in-process store used by the engine, tests and benches.

pub mod in_memory;

pub use in_memory::InMemoryModelService;
