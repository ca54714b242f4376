//! Worker tasks that back the director orchestration.
//!
//! The director worker owns the session and its ingestion pipeline, while the
//! submission worker offloads ledger calls so ingestion never waits on them.

mod director;
mod submitter;

pub use director::{Command, DirectorWorker};
pub use submitter::SubmissionWorker;
