//! Configuration and CLI argument handling

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::{
    console::view::RenderMode,
    state::{Height, Pace},
    tasks::RepeatPolicy,
};

/// How a held stepper starts repeating
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    /// Repeat right away at the fixed interval
    Immediate,
    /// Wait for the initial delay before repeating
    Delayed,
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "pace-panel")]
#[command(about = "Adjust a running pace and a height with press-and-hold steppers")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Repeat policy for held controls
    #[arg(long, value_enum, default_value_t = PolicyKind::Delayed)]
    pub policy: PolicyKind,

    /// Delay in milliseconds before a held control starts repeating (delayed policy)
    #[arg(long, default_value = "500")]
    pub delay_ms: u64,

    /// Milliseconds between repeats while a control is held
    #[arg(short, long, default_value = "100", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: u64,

    /// Starting pace, as M:SS
    #[arg(long, default_value = "5:30")]
    pub pace: Pace,

    /// Starting height in centimeters
    #[arg(long, default_value = "170", allow_negative_numbers = true)]
    pub height: i64,

    /// Render the panel as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Build the repeat policy shared by every control
    pub fn repeat_policy(&self) -> RepeatPolicy {
        let interval = Duration::from_millis(self.interval_ms);
        match self.policy {
            PolicyKind::Immediate => RepeatPolicy::Immediate { interval },
            PolicyKind::Delayed => RepeatPolicy::Delayed {
                delay: Duration::from_millis(self.delay_ms),
                interval,
            },
        }
    }

    pub fn initial_height(&self) -> Height {
        Height::new(self.height)
    }

    pub fn render_mode(&self) -> RenderMode {
        if self.json { RenderMode::Json } else { RenderMode::Text }
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
