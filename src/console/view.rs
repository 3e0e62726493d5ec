//! Panel rendering

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::{PanelSnapshot, PanelState, RunningState};

/// Output format for rendered snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Text,
    Json,
}

/// Rendered panel, as emitted in JSON mode
#[derive(Debug, Clone, Serialize)]
pub struct PanelView {
    pub state: PanelSnapshot,
    pub pace: String,
    pub height: String,
    pub running: bool,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

impl PanelView {
    pub fn new(snapshot: PanelSnapshot, panel: &PanelState) -> Self {
        let (last_action, last_action_time) = panel.get_last_action();
        Self {
            state: snapshot,
            pace: format!("{} /km", snapshot.pace),
            height: snapshot.height.to_string(),
            running: snapshot.running.is_running(),
            uptime: panel.get_uptime(),
            last_action,
            last_action_time,
        }
    }
}

/// Single-line text rendering, e.g. `[> running]  pace 5:07 /km  height 172 cm`
pub fn render_text(snapshot: &PanelSnapshot) -> String {
    let icon = match snapshot.running {
        RunningState::Running => ">",
        RunningState::Paused => "||",
    };
    format!(
        "[{} {}]  pace {} /km  height {}",
        icon, snapshot.running, snapshot.pace, snapshot.height
    )
}

pub fn render(mode: RenderMode, snapshot: PanelSnapshot, panel: &PanelState) -> String {
    match mode {
        RenderMode::Text => render_text(&snapshot),
        RenderMode::Json => match serde_json::to_string(&PanelView::new(snapshot, panel)) {
            Ok(json) => json,
            Err(e) => format!("{{\"error\":\"{}\"}}", e),
        },
    }
}
