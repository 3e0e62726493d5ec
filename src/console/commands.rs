//! Console command parsing and control bindings

use std::{fmt, str::FromStr, sync::Arc, time::Duration};
use tracing::error;

use crate::{
    state::{PanelState, Step},
    tasks::StepAction,
};

/// One of the four stepper buttons on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    PaceUp,
    PaceDown,
    HeightUp,
    HeightDown,
}

impl Control {
    pub const ALL: [Control; 4] = [
        Control::PaceUp,
        Control::PaceDown,
        Control::HeightUp,
        Control::HeightDown,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Control::PaceUp => "pace+",
            Control::PaceDown => "pace-",
            Control::HeightUp => "height+",
            Control::HeightDown => "height-",
        }
    }

    pub fn step(&self) -> Step {
        match self {
            Control::PaceUp | Control::HeightUp => Step::Increment,
            Control::PaceDown | Control::HeightDown => Step::Decrement,
        }
    }

    /// Bind this control to the panel. Each invocation steps the latest value.
    pub fn action(&self, panel: Arc<PanelState>) -> StepAction {
        let control = *self;
        let step = control.step();
        Arc::new(move || {
            let result = match control {
                Control::PaceUp | Control::PaceDown => panel.step_pace(step).map(|_| ()),
                Control::HeightUp | Control::HeightDown => panel.step_height(step).map(|_| ()),
            };
            if let Err(e) = result {
                error!("Failed to apply {}: {}", control, e);
            }
        })
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Control {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Control::ALL
            .into_iter()
            .find(|control| control.label() == s)
            .ok_or_else(|| {
                format!("unknown control '{}' (expected pace+, pace-, height+ or height-)", s)
            })
    }
}

/// A line of input from the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Press(Control),
    /// Release one control, or every held control
    Release(Option<Control>),
    Hold(Control, Duration),
    Toggle,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  press <control>         start holding a control
  release [<control>]     let go of a control (all controls if omitted)
  hold <control> <ms>     press, wait, release
  toggle                  switch between running and paused
  show                    print the panel
  help                    this text
  quit                    exit
controls: pace+ pace- height+ height-";

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb {
        "press" => Command::Press(required_control(words.next())?),
        "release" => Command::Release(words.next().map(str::parse).transpose()?),
        "hold" => {
            let control = required_control(words.next())?;
            let ms = words
                .next()
                .ok_or_else(|| "hold needs a duration in milliseconds".to_string())?;
            let ms: u64 = ms
                .parse()
                .map_err(|_| format!("invalid duration '{}'", ms))?;
            Command::Hold(control, Duration::from_millis(ms))
        }
        "toggle" => Command::Toggle,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };

    if let Some(extra) = words.next() {
        return Err(format!("unexpected argument '{}'", extra));
    }

    Ok(Some(command))
}

fn required_control(word: Option<&str>) -> Result<Control, String> {
    word.ok_or_else(|| "missing control".to_string())?.parse()
}
