use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::types::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Home,
    End,
    CollapseOrParent,
    Toggle,
    ExpandAll,
    CollapseAll,
    EnterFilter,
    EnterQuery,
    EnterSearch,
    EnterGoto,
    NextMatch,
    PrevMatch,
    CopyValue,
    CopyPath,
    CopyKey,
    Reset,
    ToggleHelp,
    Quit,
    // input modes
    Input(char),
    Backspace,
    Commit,
    Cancel,
    /// Terminal resized; carries the height of the tree body in rows.
    Resize(u16),
}

/// Help table shown by the UI, grouped the way the overlay lists them.
pub const HELP: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("↑/k ↓/j", "move up / down"),
            ("←/h", "collapse or go to parent"),
            ("PgUp/Ctrl+U PgDn/Ctrl+D", "half page up / down"),
            ("Home/g End/G", "go to top / bottom"),
        ],
    ),
    (
        "Tree",
        &[
            ("Enter/Space →/l", "expand / collapse"),
            ("E C", "expand all / collapse all"),
        ],
    ),
    (
        "Search & filter",
        &[
            ("/", "text filter"),
            ("$", "JSONPath query"),
            ("s/Ctrl+F", "search"),
            (":/Ctrl+G", "goto path"),
            ("n N", "next / prev match"),
        ],
    ),
    ("Clipboard", &[("c p y", "copy value / path / key")]),
    (
        "Utility",
        &[
            ("r/Ctrl+R", "reset view"),
            ("?", "toggle help"),
            ("q/Esc", "quit"),
        ],
    ),
];

pub fn map_key(mode: Mode, key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if mode.is_input() {
        map_input_key(key)
    } else {
        map_normal_key(key)
    }
}

fn map_input_key(key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Some(Action::Commit),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Char('c') if ctrl => Some(Action::Cancel),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) if !ctrl => Some(Action::Input(c)),
        _ => None,
    }
}

fn map_normal_key(key: KeyEvent) -> Option<Action> {
    let action = if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('u') => Action::PageUp,
            KeyCode::Char('d') => Action::PageDown,
            KeyCode::Char('r') => Action::Reset,
            KeyCode::Char('g') => Action::EnterGoto,
            KeyCode::Char('f') => Action::EnterSearch,
            _ => return None,
        }
    } else {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
            KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
            KeyCode::Left | KeyCode::Char('h') => Action::CollapseOrParent,
            KeyCode::Right | KeyCode::Enter | KeyCode::Char('l') | KeyCode::Char(' ') => {
                Action::Toggle
            }
            KeyCode::PageUp => Action::PageUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::Home | KeyCode::Char('g') => Action::Home,
            KeyCode::End | KeyCode::Char('G') => Action::End,
            KeyCode::Char('E') => Action::ExpandAll,
            KeyCode::Char('C') => Action::CollapseAll,
            KeyCode::Char('/') => Action::EnterFilter,
            KeyCode::Char('$') => Action::EnterQuery,
            KeyCode::Char('s') => Action::EnterSearch,
            KeyCode::Char(':') => Action::EnterGoto,
            KeyCode::Char('n') => Action::NextMatch,
            KeyCode::Char('N') => Action::PrevMatch,
            KeyCode::Char('c') => Action::CopyValue,
            KeyCode::Char('p') => Action::CopyPath,
            KeyCode::Char('y') => Action::CopyKey,
            KeyCode::Char('r') => Action::Reset,
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            _ => return None,
        }
    };
    Some(action)
}
