//! Topic-based signal bus for director output.
//!
//! The director never hands out its state; consumers learn about changes
//! through signals published to specific topics, and subscribe only to the
//! topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{ActionEvent, BatchOrigin, PresentationEvent, StateEvent};
