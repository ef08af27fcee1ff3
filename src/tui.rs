//! TUI utilities shared by the `anime-album-tui` binary.
//!
//! Grid navigation state plus formatting helpers that turn the library's
//! view models ([`CardSlot`], [`ModalContent`], [`QuoteWidget`]) into
//! styled `ratatui` lines.
//!
//! # Features
//!
//! This module is only available when the `tui` feature is enabled.
//!
//! # Examples
//!
//! ```rust
//! use anime_album::tui::{GridState, Move};
//!
//! let mut grid = GridState::new(4);
//! grid.set_len(6);
//!
//! assert_eq!(grid.move_to(Move::Down), false);
//! assert_eq!(grid.selected(), 4);
//! // Already on the last row: the caller should load more.
//! assert_eq!(grid.move_to(Move::Down), true);
//! ```

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::{
    detail::ModalContent, quote::QuoteWidget, reconcile::CardSlot, types::TopFilter,
};

/// Direction of a cursor move in the card grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Up,
    Down,
}

/// Cursor over a grid of cards laid out `columns` wide.
#[derive(Debug, Clone)]
pub struct GridState {
    selected: usize,
    columns: usize,
    len: usize,
}

impl GridState {
    pub fn new(columns: usize) -> Self {
        Self {
            selected: 0,
            columns: columns.max(1),
            len: 0,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adapts to a new terminal width, keeping the selected card.
    pub fn set_columns(&mut self, columns: usize) {
        self.columns = columns.max(1);
    }

    /// Updates the card count, clamping the cursor into range.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Puts the cursor back on the first card.
    pub fn reset(&mut self) {
        self.selected = 0;
    }

    /// Row of the selected card.
    pub fn row(&self) -> usize {
        self.selected / self.columns
    }

    pub fn rows(&self) -> usize {
        self.len.div_ceil(self.columns)
    }

    /// Moves the cursor and returns `true` when the move ran off the end of
    /// the grid, which is the cue to load more.
    pub fn move_to(&mut self, direction: Move) -> bool {
        if self.len == 0 {
            return direction == Move::Down;
        }

        let last = self.len - 1;
        match direction {
            Move::Left => {
                self.selected = self.selected.saturating_sub(1);
                false
            }
            Move::Right => {
                if self.selected == last {
                    return true;
                }
                self.selected += 1;
                false
            }
            Move::Up => {
                self.selected = self.selected.saturating_sub(self.columns);
                false
            }
            Move::Down => {
                if self.row() + 1 >= self.rows() {
                    return true;
                }
                self.selected = (self.selected + self.columns).min(last);
                false
            }
        }
    }
}

impl Default for GridState {
    fn default() -> Self {
        Self::new(4)
    }
}

/// Tab titles in display order, numbered for their hotkeys.
pub fn tab_titles() -> Vec<Line<'static>> {
    TopFilter::ALL
        .iter()
        .enumerate()
        .map(|(i, filter)| {
            Line::from(vec![
                Span::styled(format!("{} ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(filter.label()),
            ])
        })
        .collect()
}

/// Lines shown inside one card.
pub fn format_card(slot: &CardSlot, selected: bool) -> Vec<Line<'static>> {
    let title_style = if selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![Line::from(Span::styled(slot.caption.clone(), title_style))];

    if let Some(anime) = slot.item() {
        let mut meta = Vec::new();
        if let Some(kind) = &anime.kind {
            meta.push(Span::styled(kind.clone(), Style::default().fg(Color::Green)));
        }
        if let Some(score) = anime.score {
            if !meta.is_empty() {
                meta.push(Span::raw(" "));
            }
            meta.push(Span::styled(
                format!("★ {:.2}", score),
                Style::default().fg(Color::Yellow),
            ));
        }
        lines.push(Line::from(meta));
    }

    lines
}

/// Formats genres as a bulleted list.
pub fn format_genres(genres: &[String]) -> Vec<Line<'static>> {
    if genres.is_empty() {
        vec![Line::from(Span::styled(
            "None",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        genres
            .iter()
            .map(|genre| {
                Line::from(vec![
                    Span::raw("• "),
                    Span::styled(genre.clone(), Style::default().fg(Color::Magenta)),
                ])
            })
            .collect()
    }
}

/// Word-wraps `text` to `width` columns.
///
/// ```rust
/// use anime_album::tui::wrap_text;
///
/// let lines = wrap_text("Spike and Jet hunt bounties across the solar system", 20);
/// assert_eq!(lines.len(), 3);
/// ```
pub fn wrap_text(text: &str, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + word.chars().count() + 1 > width {
            lines.push(Line::from(std::mem::take(&mut current)));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(Line::from(current));
    }

    lines
}

fn labelled(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::Yellow)),
        Span::styled(value.to_string(), Style::default().fg(Color::White)),
    ])
}

/// Full body of the detail modal.
pub fn format_modal(content: &ModalContent, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            content.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        labelled("Rank", &content.rank),
        labelled("Score", &content.score),
        labelled("Rating", &content.rating),
        labelled("Status", &content.status),
        Line::default(),
        Line::from(Span::styled("Genres", Style::default().fg(Color::Yellow))),
    ];

    lines.extend(format_genres(&content.genres));
    lines.push(Line::default());
    lines.extend(wrap_text(&content.synopsis, width));

    if !content.streaming.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Streaming",
            Style::default().fg(Color::Yellow),
        )));
        for link in &content.streaming {
            lines.push(Line::from(vec![
                Span::styled(link.name.clone(), Style::default().fg(Color::Green)),
                Span::raw(" "),
                Span::styled(link.url.clone(), Style::default().fg(Color::DarkGray)),
            ]));
        }
    }

    lines
}

/// Quote text followed by its attribution.
pub fn format_quote(widget: &QuoteWidget, width: usize) -> Vec<Line<'static>> {
    let (Some(text), Some(headline)) = (widget.text(), widget.headline()) else {
        return vec![Line::from(Span::styled(
            "Press r for a quote",
            Style::default().fg(Color::DarkGray),
        ))];
    };

    let mut lines = wrap_text(&format!("\"{}\"", text), width);
    lines.push(Line::from(Span::styled(
        format!("- {}", headline),
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::ITALIC),
    )));
    lines
}

/// Creates a styled status message for TUI display.
pub fn create_status_message(prefix: &str, message: &str, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{}:", prefix),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(message.to_string(), Style::default().fg(color)),
    ])
}

pub fn info_message(message: &str) -> Line<'static> {
    create_status_message("Info", message, Color::Blue)
}

pub fn warning_message(message: &str) -> Line<'static> {
    create_status_message("Warning", message, Color::Yellow)
}

pub fn error_message(message: &str) -> Line<'static> {
    create_status_message("Error", message, Color::Red)
}
