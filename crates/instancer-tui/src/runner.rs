//! Main TUI runner - entry point and event loop

use std::time::Duration;

use instancer_api::InstancerApi;
use instancer_app::{CaptchaSolver, Engine};
use instancer_core::prelude::*;

use crate::{event, render, terminal};

/// Run the TUI until the user quits or a shutdown signal arrives.
///
/// The engine must already be started on its first route.
pub async fn run<A, C>(mut engine: Engine<A, C>, tick_rate: Duration) -> Result<()>
where
    A: InstancerApi + Send + Sync + 'static,
    C: CaptchaSolver + Send + Sync + 'static,
{
    terminal::install_panic_hook();
    let mut term = ratatui::init();
    info!("Terminal initialized");

    let result = run_loop(&mut term, &mut engine, tick_rate);

    engine.shutdown();
    ratatui::restore();
    result
}

/// Main event loop
fn run_loop<A, C>(
    terminal: &mut ratatui::DefaultTerminal,
    engine: &mut Engine<A, C>,
    tick_rate: Duration,
) -> Result<()>
where
    A: InstancerApi + Send + Sync + 'static,
    C: CaptchaSolver + Send + Sync + 'static,
{
    while !engine.should_quit() {
        // Completions, countdown ticks and signals
        engine.drain_pending_messages();
        if engine.should_quit() {
            break;
        }

        terminal.draw(|frame| render::view(frame, &engine.state))?;

        if let Some(message) = event::poll(tick_rate)? {
            engine.process_message(message);
        }
    }

    Ok(())
}
