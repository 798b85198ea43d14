use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeName;
use crate::types::NodeKind;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub header: Style,
    pub status: Style,
    pub key: Style,
    pub string: Style,
    pub number: Style,
    pub boolean: Style,
    pub null: Style,
    pub cursor: Style,
    pub filter: Style,
    pub query: Style,
    pub search: Style,
    pub goto: Style,
    pub breadcrumb: Style,
    pub matched: Style,
    pub border: Style,
}

fn fg(index: u8) -> Style {
    Style::default().fg(Color::Indexed(index))
}

fn bold(index: u8) -> Style {
    fg(index).add_modifier(Modifier::BOLD)
}

fn bg(index: u8) -> Style {
    Style::default().bg(Color::Indexed(index))
}

impl Theme {
    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self::dark(),
            ThemeName::Light => Self::light(),
            ThemeName::Monochrome => Self::monochrome(),
        }
    }

    pub fn dark() -> Self {
        Self {
            header: bold(86),
            status: fg(240),
            key: fg(86),
            string: fg(220),
            number: fg(208),
            boolean: fg(196),
            null: fg(240),
            cursor: bg(240),
            filter: bold(212),
            query: bold(171),
            search: bold(82),
            goto: bold(214),
            breadcrumb: fg(244),
            matched: bg(220).fg(Color::Indexed(16)),
            border: fg(62),
        }
    }

    pub fn light() -> Self {
        Self {
            header: bold(28),
            status: fg(240),
            key: fg(28),
            string: fg(130),
            number: fg(166),
            boolean: fg(160),
            null: fg(245),
            cursor: bg(254),
            filter: bold(161),
            query: bold(133),
            search: bold(34),
            goto: bold(172),
            breadcrumb: fg(242),
            matched: bg(226).fg(Color::Indexed(16)),
            border: fg(240),
        }
    }

    pub fn monochrome() -> Self {
        Self {
            header: bold(255),
            status: fg(240),
            key: fg(255),
            string: fg(250),
            number: fg(248),
            boolean: fg(246),
            null: fg(240),
            cursor: bg(240),
            filter: bold(255),
            query: bold(255),
            search: bold(255),
            goto: bold(255),
            breadcrumb: fg(244),
            matched: bg(255).fg(Color::Indexed(16)),
            border: fg(240),
        }
    }

    pub fn value_style(&self, kind: NodeKind) -> Style {
        match kind {
            NodeKind::Object | NodeKind::Array => Style::default(),
            NodeKind::String => self.string,
            NodeKind::Number => self.number,
            NodeKind::Boolean => self.boolean,
            NodeKind::Null => self.null,
        }
    }
}
