//! Terminal front end: crossterm event loop plus ratatui rendering of a
//! [`Session`]. Nothing in here changes session state except through
//! [`Session::handle`].

pub mod render;
pub mod theme;

use std::io::{self, Stdout};

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;

use crate::error::{Error, Result};
use crate::keys::{map_key, Action};
use crate::state::{Flow, Session};

pub use theme::Theme;

type Term = Terminal<CrosstermBackend<Stdout>>;

fn body_height(terminal_height: u16) -> u16 {
    // the tree body is framed by a border on top and bottom
    terminal_height.saturating_sub(render::CHROME_HEIGHT + 2).max(1)
}

/// Take over the terminal and run until the user quits.
pub fn run(session: &mut Session, theme: &Theme) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err.into());
    }
    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(err) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(err.into());
        }
    };

    let result = event_loop(&mut terminal, session, theme);

    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result
}

fn event_loop(terminal: &mut Term, session: &mut Session, theme: &Theme) -> Result<()> {
    let size = terminal.size().map_err(|e| Error::Terminal(e.to_string()))?;
    session.handle(Action::Resize(body_height(size.height)));

    loop {
        terminal.draw(|frame| render::draw(frame, session, theme))?;

        let action = match event::read()? {
            Event::Key(key) => map_key(session.mode(), key),
            Event::Resize(_, height) => Some(Action::Resize(body_height(height))),
            _ => None,
        };
        let Some(action) = action else { continue };
        debug!(?action, mode = ?session.mode(), "event");
        if session.handle(action) == Flow::Quit {
            return Ok(());
        }
    }
}
