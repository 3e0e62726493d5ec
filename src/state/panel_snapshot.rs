//! Displayed panel state

use std::fmt;

use serde::Serialize;

use super::{Height, Pace};

/// Running/paused mode shown on the panel. No timer is attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunningState {
    Running,
    #[default]
    Paused,
}

impl RunningState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunningState::Running)
    }

    /// The opposite mode
    pub fn toggled(&self) -> Self {
        match self {
            RunningState::Running => RunningState::Paused,
            RunningState::Paused => RunningState::Running,
        }
    }
}

impl fmt::Display for RunningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunningState::Running => write!(f, "running"),
            RunningState::Paused => write!(f, "paused"),
        }
    }
}

/// Everything the renderer needs to draw the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelSnapshot {
    pub pace: Pace,
    pub height: Height,
    pub running: RunningState,
}

impl PanelSnapshot {
    pub fn new(pace: Pace, height: Height) -> Self {
        Self {
            pace,
            height,
            running: RunningState::default(),
        }
    }
}

impl Default for PanelSnapshot {
    fn default() -> Self {
        Self::new(Pace::default(), Height::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_mode() {
        assert_eq!(RunningState::Paused.toggled(), RunningState::Running);
        assert_eq!(RunningState::Running.toggled(), RunningState::Paused);
        assert!(RunningState::Running.is_running());
    }

    #[test]
    fn serializes_for_json_render() {
        let snapshot = PanelSnapshot::new(Pace::new(5, 7), Height::new(181));
        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(json["height"], 181);
        assert_eq!(json["running"], "paused");
        assert_eq!(json["pace"]["minutes"], 5);
        assert_eq!(json["pace"]["seconds"], 7);
    }
}
