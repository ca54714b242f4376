//! Unified error types surfaced by the director API.
//!
//! Wraps failures from worker coordination, the ledger transport, and
//! configuration so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use client_blockchain_core::TransportError;
use game_core::IntentKind;

pub use crate::config::ConfigError;
use crate::mode::SessionMode;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no session attached")]
    NotAttached,

    #[error("{intent} rejected while {mode}")]
    IntentRejected {
        intent: IntentKind,
        mode: SessionMode,
    },

    #[error("loadout changes rejected while {mode}")]
    LoadoutRejected { mode: SessionMode },

    #[error("replay controls require a finished-session replay (current mode: {mode})")]
    NoReplay { mode: SessionMode },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("director requires a ledger to be configured before building")]
    MissingLedger,

    #[error("director worker command channel closed")]
    CommandChannelClosed,

    #[error("director worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("submission worker channel closed")]
    SubmissionChannelClosed,

    #[error("submission backlog full")]
    SubmissionBacklogFull,

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
