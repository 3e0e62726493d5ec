//! Panel state container

use std::{sync::Mutex, time::Instant};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{Height, Pace, PanelSnapshot, Step};

/// Owns the pace, height and running mode, and publishes a snapshot to the
/// renderer after every transition.
#[derive(Debug)]
pub struct PanelState {
    /// Latest committed values; only `update_state` writes here
    snapshot: Mutex<PanelSnapshot>,
    opened_at: Instant,
    last_action: Mutex<Option<LastAction>>,
    snapshot_tx: watch::Sender<PanelSnapshot>,
    /// Held so sends never fail for lack of subscribers
    _snapshot_rx: watch::Receiver<PanelSnapshot>,
}

/// Name and time of the most recent committed transition
#[derive(Debug, Clone)]
struct LastAction {
    name: String,
    at: DateTime<Utc>,
}

impl PanelState {
    /// Create a new panel with the given starting values, paused
    pub fn new(pace: Pace, height: Height) -> Self {
        let initial = PanelSnapshot::new(pace, height);
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);

        Self {
            snapshot: Mutex::new(initial),
            opened_at: Instant::now(),
            last_action: Mutex::new(None),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Apply a functional update to the latest committed snapshot and notify
    /// the renderer.
    ///
    /// The updater always sees the value as it is at the moment of the call,
    /// so repeated updates accumulate.
    pub fn update_state<F>(&self, action: &str, updater: F) -> Result<PanelSnapshot, String>
    where
        F: FnOnce(&mut PanelSnapshot),
    {
        let mut snapshot = self.snapshot.lock()
            .map_err(|e| format!("Failed to lock panel state: {}", e))?;

        updater(&mut *snapshot);
        let new_snapshot = *snapshot;
        drop(snapshot);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(LastAction {
                name: action.to_string(),
                at: Utc::now(),
            });
        }

        if let Err(e) = self.snapshot_tx.send(new_snapshot) {
            warn!("Failed to send panel update: {}", e);
        }

        Ok(new_snapshot)
    }

    /// Move the pace one second in the given direction
    pub fn step_pace(&self, step: Step) -> Result<Pace, String> {
        let snapshot = self.update_state(
            match step {
                Step::Increment => "pace+",
                Step::Decrement => "pace-",
            },
            |state| state.pace = step.apply(&state.pace),
        )?;
        debug!("Pace stepped to {}", snapshot.pace);
        Ok(snapshot.pace)
    }

    /// Move the height one centimeter in the given direction
    pub fn step_height(&self, step: Step) -> Result<Height, String> {
        let snapshot = self.update_state(
            match step {
                Step::Increment => "height+",
                Step::Decrement => "height-",
            },
            |state| state.height = step.apply(&state.height),
        )?;
        debug!("Height stepped to {}", snapshot.height);
        Ok(snapshot.height)
    }

    /// Flip between running and paused
    pub fn toggle_running(&self) -> Result<PanelSnapshot, String> {
        let snapshot =
            self.update_state("toggle", |state| state.running = state.running.toggled())?;
        info!("Panel is now {}", snapshot.running);
        Ok(snapshot)
    }

    /// Get current panel snapshot
    pub fn get_snapshot(&self) -> Result<PanelSnapshot, String> {
        self.snapshot.lock()
            .map(|snapshot| *snapshot)
            .map_err(|e| format!("Failed to lock panel state: {}", e))
    }

    /// Watch for snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<PanelSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Time since the panel was opened, e.g. `1h 2m 3s`, `4m 5s` or `6s`
    pub fn get_uptime(&self) -> String {
        let total = self.opened_at.elapsed().as_secs();
        match (total / 3600, total % 3600 / 60, total % 60) {
            (0, 0, s) => format!("{}s", s),
            (0, m, s) => format!("{}m {}s", m, s),
            (h, m, s) => format!("{}h {}m {}s", h, m, s),
        }
    }

    /// Name and UTC time of the most recent transition, if any
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock().ok().and_then(|last| last.clone()) {
            Some(LastAction { name, at }) => (Some(name), Some(at)),
            None => (None, None),
        }
    }
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new(Pace::default(), Height::default())
    }
}
