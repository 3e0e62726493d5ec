//! Console front end
//!
//! Reads stepper commands from stdin and drives one repeat controller per
//! panel control. Rendering happens in [`crate::tasks::render_task`].

pub mod commands;
pub mod view;

use std::{collections::HashMap, sync::Arc};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    time::sleep,
};
use tracing::{debug, info, warn};

use crate::{
    state::PanelState,
    tasks::{PressPhase, RepeatPolicy, RepeatPressController},
};
use commands::{parse_command, Command, Control, HELP};
use view::{render, RenderMode};

/// The four stepper buttons and the panel they act on
#[derive(Debug)]
pub struct ControlPad {
    panel: Arc<PanelState>,
    controllers: HashMap<Control, RepeatPressController>,
    mode: RenderMode,
}

impl ControlPad {
    pub fn new(panel: Arc<PanelState>, policy: RepeatPolicy, mode: RenderMode) -> Self {
        let controllers = Control::ALL
            .into_iter()
            .map(|control| (control, RepeatPressController::new(control.label(), policy)))
            .collect();

        Self {
            panel,
            controllers,
            mode,
        }
    }

    pub fn panel(&self) -> &Arc<PanelState> {
        &self.panel
    }

    pub fn phase(&self, control: Control) -> PressPhase {
        self.controllers
            .get(&control)
            .map_or(PressPhase::Idle, RepeatPressController::phase)
    }

    pub fn press(&mut self, control: Control) {
        let action = control.action(Arc::clone(&self.panel));
        if let Some(controller) = self.controllers.get_mut(&control) {
            controller.on_press_start(action);
        }
    }

    pub fn release(&mut self, control: Control) {
        if let Some(controller) = self.controllers.get_mut(&control) {
            controller.on_press_end();
        }
    }

    /// Release every held control
    pub fn release_all(&mut self) {
        for controller in self.controllers.values_mut() {
            controller.on_press_end();
        }
    }

    /// Apply one command. Returns `false` when the console should exit.
    pub async fn handle(&mut self, command: Command) -> bool {
        debug!("Handling {:?}", command);
        match command {
            Command::Press(control) => self.press(control),
            Command::Release(Some(control)) => self.release(control),
            Command::Release(None) => self.release_all(),
            Command::Hold(control, duration) => {
                self.press(control);
                sleep(duration).await;
                self.release(control);
            }
            Command::Toggle => {
                if let Err(e) = self.panel.toggle_running() {
                    warn!("Failed to toggle running state: {}", e);
                }
            }
            Command::Show => match self.panel.get_snapshot() {
                Ok(snapshot) => println!("{}", render(self.mode, snapshot, &self.panel)),
                Err(e) => warn!("Failed to read panel: {}", e),
            },
            Command::Help => println!("{}", HELP),
            Command::Quit => return false,
        }
        true
    }
}

/// Read commands line by line until `quit` or end of input.
///
/// Every control is released before returning.
pub async fn run_console<R>(pad: &mut ControlPad, input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Some(command)) => {
                if !pad.handle(command).await {
                    info!("Quit requested");
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => eprintln!("{}", e),
        }
    }

    pad.release_all();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::state::{Height, Pace, RunningState};

    fn pad(policy: RepeatPolicy) -> ControlPad {
        let panel = Arc::new(PanelState::new(Pace::new(5, 0), Height::new(170)));
        ControlPad::new(panel, policy, RenderMode::Text)
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_session_steps_the_panel() {
        let mut pad = pad(RepeatPolicy::delayed());
        let script: &[u8] =
            b"hold pace- 1000\nhold height+ 300\n\ntoggle\nquit\nhold height+ 5000\n";

        run_console(&mut pad, script).await.unwrap();

        let snapshot = pad.panel().get_snapshot().unwrap();
        assert_eq!(snapshot.pace, Pace::new(4, 54));
        assert_eq!(snapshot.height, Height::new(171));
        assert_eq!(snapshot.running, RunningState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn hold_ending_on_a_tick_includes_it() {
        let mut pad = pad(RepeatPolicy::immediate());

        run_console(&mut pad, &b"hold height- 300
"[..]).await.unwrap();
        sleep(Duration::from_secs(1)).await;

        assert_eq!(pad.panel().get_snapshot().unwrap().height, Height::new(166));
    }

    #[tokio::test(start_paused = true)]
    async fn controls_repeat_independently() {
        let mut pad = pad(RepeatPolicy::immediate());

        pad.press(Control::PaceUp);
        pad.press(Control::HeightDown);
        sleep(Duration::from_millis(250)).await;
        pad.release(Control::PaceUp);
        assert_eq!(pad.phase(Control::PaceUp), PressPhase::Idle);
        assert_eq!(pad.phase(Control::HeightDown), PressPhase::Repeating);

        sleep(Duration::from_millis(200)).await;
        pad.release_all();
        sleep(Duration::from_secs(1)).await;

        let snapshot = pad.panel().get_snapshot().unwrap();
        assert_eq!(snapshot.pace, Pace::new(5, 3));
        assert_eq!(snapshot.height, Height::new(165));
    }

    #[tokio::test(start_paused = true)]
    async fn end_of_input_releases_held_controls() {
        let mut pad = pad(RepeatPolicy::immediate());

        run_console(&mut pad, &b"press height+\n"[..]).await.unwrap();
        sleep(Duration::from_secs(1)).await;

        assert_eq!(pad.phase(Control::HeightUp), PressPhase::Idle);
        assert_eq!(pad.panel().get_snapshot().unwrap().height, Height::new(171));
    }

    #[tokio::test(start_paused = true)]
    async fn bad_lines_are_skipped() {
        let mut pad = pad(RepeatPolicy::delayed());

        run_console(&mut pad, &b"jump\npress\nhold pace+ 10\n"[..]).await.unwrap();

        assert_eq!(pad.panel().get_snapshot().unwrap().pace, Pace::new(5, 1));
    }
}
