//! Terminal management and main run loop

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use crate::app::App;
use crate::event::{key_press, poll_event};
use crate::ui;

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Run the batches list until the user quits. Needs a multi-threaded Tokio
/// runtime: screens spawn their service calls and the key poll blocks in place.
pub fn run(mut app: App, tick: Duration) -> Result<()> {
    let mut terminal = init_terminal()?;

    app.mount();
    let result = run_loop(&mut terminal, &mut app, tick);

    app.shutdown();
    info!("batches list closed");

    // Restore terminal (even if loop failed)
    let restored = restore_terminal(&mut terminal);
    first_error(result, restored)
}

/// The loop's error wins over a restore failure, which is still logged
fn first_error(result: Result<()>, restored: Result<()>) -> Result<()> {
    if let Err(err) = restored {
        error!(error = %err, "failed to restore terminal");
        result?;
        return Err(err);
    }
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    tick: Duration,
) -> Result<()> {
    loop {
        app.on_tick(Instant::now());

        terminal.draw(|frame| ui::render(frame, app))?;

        // Blocking poll; the tick keeps it short enough for fetch results to show promptly
        let event = tokio::task::block_in_place(|| poll_event(tick))?;
        if let Some(key) = event.and_then(key_press) {
            app.handle_key(key);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_error_wins_over_restore_error() {
        let err = first_error(
            Err(anyhow::anyhow!("draw failed")),
            Err(anyhow::anyhow!("raw mode")),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "draw failed");

        let err = first_error(Ok(()), Err(anyhow::anyhow!("raw mode"))).unwrap_err();
        assert_eq!(err.to_string(), "raw mode");

        assert!(first_error(Ok(()), Ok(())).is_ok());
    }
}
