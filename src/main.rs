//! Pace Panel - pace and height steppers with press-and-hold repeat
//!
//! This is the main entry point: a console renderer for the panel.

use std::sync::Arc;
use tokio::io::{stdin, BufReader};
use tracing::info;

use pace_panel::{
    config::Config,
    console::{run_console, ControlPad},
    state::PanelState,
    tasks::render_task,
    utils::shutdown_signal,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so stdout carries only the rendered panel
    tracing_subscriber::fmt()
        .with_env_filter(format!("pace_panel={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    let policy = config.repeat_policy();
    info!("Starting pace-panel v1.0.0");
    info!(
        "Configuration: policy={:?}, pace={}, height={}",
        policy,
        config.pace,
        config.initial_height()
    );

    let panel = Arc::new(PanelState::new(config.pace, config.initial_height()));

    // Re-render after every committed transition
    let render_panel = Arc::clone(&panel);
    let mode = config.render_mode();
    let renderer = tokio::spawn(async move {
        render_task(render_panel, mode).await;
    });

    let mut pad = ControlPad::new(Arc::clone(&panel), policy, mode);
    info!("Type 'help' for commands");

    tokio::select! {
        result = run_console(&mut pad, BufReader::new(stdin())) => {
            if let Err(e) = result {
                tracing::error!("Console error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    pad.release_all();
    renderer.abort();

    info!("Panel shutdown complete");
    Ok(())
}
