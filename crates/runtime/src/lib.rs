//! Session director keeping a local game session consistent with the ledger.
//!
//! This crate wires together event classification, ordered ingestion, state
//! processing, and batched action submission into a cohesive director API.
//! Consumers build a [`Director`] over a [`GameLedger`](client_blockchain_core::GameLedger),
//! attach to sessions, and observe the outcome through [`DirectorHandle`].
//!
//! Modules are organized by responsibility:
//! - [`director`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based signal bus
//! - [`catalog`], [`queue`], [`processor`], [`resolver`] and [`composer`]
//!   form the ingestion and action pipelines
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod catalog;
pub mod composer;
pub mod config;
pub mod cues;
pub mod director;
pub mod events;
pub mod mode;
pub mod processor;
pub mod queue;
pub mod replay;
pub mod resolver;

mod workers;

pub use api::{ConfigError, DirectorHandle, Result, RuntimeError, SessionSnapshot};
pub use catalog::{CatalogConfig, EventTypeCatalog, PacingMode, PacingTable, Surface};
pub use composer::{ActionBatch, ActionComposer, ComposeContext, compose};
pub use config::DirectorConfig;
pub use cues::{Cue, CueQueue, Presentation};
pub use director::{Director, DirectorBuilder};
pub use events::{
    ActionEvent, BatchOrigin, Event, EventBus, PresentationEvent, StateEvent, Topic,
};
pub use mode::SessionMode;
pub use processor::{EventProcessor, ProcessOptions, Processed, Routing};
pub use queue::EventQueue;
pub use replay::{Replay, ReplayControl, ReplayStatus};
pub use resolver::{AttachRequest, RandomnessGate, Resolution, SessionResolver};
