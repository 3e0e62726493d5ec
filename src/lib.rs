//! Pace Panel - pace and height steppers with press-and-hold repeat
//!
//! This library provides the steppable values, the panel state container
//! and the repeat driver that turns a held control into a stream of steps.

pub mod config;
pub mod state;
pub mod console;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{Height, Pace, PanelState, SteppableValue};
pub use tasks::{RepeatPolicy, RepeatPressController};
pub use utils::signals::shutdown_signal;
