//! Timer-driven tasks module
//!
//! This module contains the press-and-hold repeat driver and the background
//! render task.

pub mod repeat_press;
pub mod render;

// Re-export main types
pub use repeat_press::{
    PressPhase, RepeatPolicy, RepeatPressController, StepAction, DEFAULT_REPEAT_DELAY,
    DEFAULT_REPEAT_INTERVAL,
};
pub use render::render_task;
