//! Terminal setup and the interactive event loop.

use std::io::{self, stdout};
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::selection::Pointer;

/// Poll timeout; also how often a pending feed load is checked.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Input relevant to the app.
#[derive(Debug)]
enum Event {
    Key(KeyEvent),
    Pointer(Pointer),
    Tick,
}

/// Wait up to one tick for the next input.
fn next_event() -> io::Result<Event> {
    if !event::poll(TICK_RATE)? {
        return Ok(Event::Tick);
    }

    Ok(match event::read()? {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
        CrosstermEvent::Mouse(mouse) => pointer_of(mouse).map_or(Event::Tick, Event::Pointer),
        _ => Event::Tick,
    })
}

fn pointer_of(mouse: MouseEvent) -> Option<Pointer> {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            Some(Pointer::moved(mouse.column, mouse.row))
        }
        MouseEventKind::Down(MouseButton::Left) => Some(Pointer::clicked(mouse.column, mouse.row)),
        _ => None,
    }
}

/// Run the app until the user quits.
///
/// The terminal is restored even when drawing fails.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up, drawn, or restored.
pub fn run(app: &mut App) -> io::Result<()> {
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    info!(policy = ?app.selection().policy(), "interactive view started");

    while !app.should_quit {
        app.poll_load();
        terminal.draw(|frame| app.render(frame))?;

        match next_event()? {
            Event::Key(key) => app.handle_key(key),
            Event::Pointer(pointer) => app.handle_pointer(pointer),
            Event::Tick => {}
        }
    }

    info!("interactive view closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::selection::PointerKind;

    fn mouse(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 7,
            row: 3,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_mouse_mapping() {
        assert_eq!(pointer_of(mouse(MouseEventKind::Moved)).map(|p| p.kind), Some(PointerKind::Move));
        assert_eq!(
            pointer_of(mouse(MouseEventKind::Down(MouseButton::Left))),
            Some(Pointer::clicked(7, 3))
        );
        assert!(pointer_of(mouse(MouseEventKind::ScrollUp)).is_none());
        assert!(pointer_of(mouse(MouseEventKind::Down(MouseButton::Right))).is_none());
    }
}
