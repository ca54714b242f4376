//! Survivor client: spectates recorded sessions through the session director.
//!
//! # Architecture
//!
//! ```text
//! survivor (binary)
//!   ├─→ RecordedLedger (GameLedger over a JSON recording)
//!   └─→ Director (runtime) ──signals──→ spectate() logging observer
//! ```

pub mod config;
pub mod logging;
pub mod recording;
pub mod spectate;

pub use config::ClientConfig;
pub use recording::{RecordedLedger, Recording};
pub use spectate::{SpectateSummary, spectate};
