//! Background render task

use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    console::view::{render, RenderMode},
    state::PanelState,
};

/// Print the panel once, then again after every committed transition
pub async fn render_task(panel: Arc<PanelState>, mode: RenderMode) {
    info!("Starting render task");

    let mut snapshot_rx = panel.subscribe();
    let initial = *snapshot_rx.borrow_and_update();
    println!("{}", render(mode, initial, &panel));

    // Repeats can commit faster than we print; the watch channel hands us
    // the latest snapshot and skips intermediate ones.
    while snapshot_rx.changed().await.is_ok() {
        let snapshot = *snapshot_rx.borrow_and_update();
        debug!("Rendering {:?}", snapshot);
        println!("{}", render(mode, snapshot, &panel));
    }

    info!("Panel closed, render task exiting");
}
