//! Public director API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, workers, or ingestion.

pub mod errors;
pub mod handle;
pub mod snapshot;

pub use errors::{ConfigError, Result, RuntimeError};
pub use handle::DirectorHandle;
pub use snapshot::SessionSnapshot;
