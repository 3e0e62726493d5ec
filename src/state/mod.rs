//! State management module
//!
//! This module contains the steppable values and the panel state container
//! that owns them.

pub mod pace;
pub mod height;
pub mod panel_snapshot;
pub mod panel_state;

// Re-export main types
pub use pace::{Pace, ParsePaceError};
pub use height::Height;
pub use panel_snapshot::{PanelSnapshot, RunningState};
pub use panel_state::PanelState;

/// A value that moves by exactly one unit per step
pub trait SteppableValue: Copy {
    /// Value one step up
    fn increment(&self) -> Self;
    /// Value one step down, clamped where the quantity has a floor
    fn decrement(&self) -> Self;
}

/// Direction a stepper control moves its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Increment,
    Decrement,
}

impl Step {
    /// Apply this step to a value
    pub fn apply<V: SteppableValue>(self, value: &V) -> V {
        match self {
            Step::Increment => value.increment(),
            Step::Decrement => value.decrement(),
        }
    }
}
