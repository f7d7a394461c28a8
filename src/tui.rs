//! Shared pieces of the terminal user interface.
//!
//! Formatting helpers that turn results, favorites and status lines into
//! styled ratatui [`Line`]s, plus [`AccountForm`], the input state behind the
//! register/login screen. The `moviefinder-tui` binary is built on these.
//!
//! This module is only available when the `tui` feature is enabled.
//!
//! # Examples
//!
//! ```rust,no_run
//! use moviefinder::tui::format_favorite;
//! use moviefinder::types::FavoriteEntry;
//!
//! let favorite = FavoriteEntry {
//!     imdb_id: "tt0078748".to_string(),
//!     title: "Alien".to_string(),
//!     year: "1979".to_string(),
//!     poster_url: "N/A".to_string(),
//! };
//!
//! let line = format_favorite(&favorite);
//! ```

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::{
    app::{Status, StatusKind},
    types::{FavoriteEntry, SearchResult},
};

/// Color used for a status kind.
pub fn status_color(kind: StatusKind) -> Color {
    match kind {
        StatusKind::Info => Color::Blue,
        StatusKind::Success => Color::Green,
        StatusKind::Warning => Color::Yellow,
        StatusKind::Error => Color::Red,
    }
}

/// Formats a search result row; `favorite` adds a star marker.
pub fn format_result(result: &SearchResult, favorite: bool) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            if favorite { "★ " } else { "  " },
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            result.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(format!("({})", result.year), Style::default().fg(Color::Green)),
        Span::raw(" "),
        Span::styled(result.imdb_id.clone(), Style::default().fg(Color::DarkGray)),
    ];

    if !result.has_poster() {
        spans.push(Span::styled(
            " [no poster]",
            Style::default().fg(Color::DarkGray),
        ));
    }

    Line::from(spans)
}

/// Formats a favorites row.
pub fn format_favorite(favorite: &FavoriteEntry) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            favorite.title.clone(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!("({})", favorite.year),
            Style::default().fg(Color::Green),
        ),
        Span::raw(" "),
        Span::styled(
            favorite.imdb_id.clone(),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Creates a styled status line with a prefix matching its kind.
///
/// # Examples
///
/// ```rust,no_run
/// use moviefinder::app::Status;
/// use moviefinder::tui::format_status;
///
/// let line = format_status(&Status::info("No results found."));
/// ```
pub fn format_status(status: &Status) -> Line<'static> {
    let prefix = match status.kind {
        StatusKind::Info => "Info",
        StatusKind::Success => "Success",
        StatusKind::Warning => "Warning",
        StatusKind::Error => "Error",
    };
    let color = status_color(status.kind);

    Line::from(vec![
        Span::styled(
            format!("{}:", prefix),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(status.message.clone(), Style::default().fg(color)),
    ])
}

/// Fields of the account form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Username,
    Email,
    Password,
}

impl AccountField {
    pub fn all() -> [AccountField; 3] {
        [
            AccountField::Username,
            AccountField::Email,
            AccountField::Password,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountField::Username => "Username",
            AccountField::Email => "Email",
            AccountField::Password => "Password",
        }
    }

    fn next(self) -> Self {
        match self {
            AccountField::Username => AccountField::Email,
            AccountField::Email => AccountField::Password,
            AccountField::Password => AccountField::Username,
        }
    }

    fn previous(self) -> Self {
        match self {
            AccountField::Username => AccountField::Password,
            AccountField::Email => AccountField::Username,
            AccountField::Password => AccountField::Email,
        }
    }
}

/// Input state of the register/login form.
#[derive(Debug, Clone)]
pub struct AccountForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub focus: AccountField,
}

impl Default for AccountForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            focus: AccountField::Email,
        }
    }
}

impl AccountForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn field_mut(&mut self, field: AccountField) -> &mut String {
        match field {
            AccountField::Username => &mut self.username,
            AccountField::Email => &mut self.email,
            AccountField::Password => &mut self.password,
        }
    }

    /// The value of `field` as it should be displayed (password masked).
    pub fn display_value(&self, field: AccountField) -> String {
        match field {
            AccountField::Username => self.username.clone(),
            AccountField::Email => self.email.clone(),
            AccountField::Password => "•".repeat(self.password.chars().count()),
        }
    }

    pub fn push(&mut self, c: char) {
        let focus = self.focus;
        self.field_mut(focus).push(c);
    }

    pub fn pop(&mut self) {
        let focus = self.focus;
        self.field_mut(focus).pop();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Forgets the password, keeping username and email for the next attempt.
    pub fn clear_password(&mut self) {
        self.password.clear();
    }
}
