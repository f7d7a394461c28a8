//! Movie Finder TUI - terminal front-end for searching movies and keeping favorites
//!
//! Sidebar navigation between search, favorites, account and help screens.
//! Searches run in spawned tasks and report back over a channel; everything
//! else is awaited inside the event loop.

use color_eyre::{eyre::Result, install};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use moviefinder::{
    config::{self, Config},
    logging::{self, LogTarget},
    prelude::*,
    tui::{AccountField, AccountForm, format_favorite, format_result, format_status},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::{io, time::Duration};
use tokio::sync::mpsc;

// Application events
#[derive(Debug)]
enum AppEvent {
    SearchFinished(SearchOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AppMode {
    Search,
    Favorites,
    Account,
    Help,
}

impl AppMode {
    fn all() -> [AppMode; 4] {
        [
            AppMode::Search,
            AppMode::Favorites,
            AppMode::Account,
            AppMode::Help,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            AppMode::Search => "Search",
            AppMode::Favorites => "Favorites",
            AppMode::Account => "Account",
            AppMode::Help => "Help",
        }
    }
}

mod theme {
    use ratatui::style::Color;

    pub const PRIMARY: Color = Color::Rgb(75, 85, 255);
    pub const ACCENT: Color = Color::Rgb(255, 152, 0);
    pub const TEXT_PRIMARY: Color = Color::Rgb(255, 255, 255);
    pub const TEXT_SECONDARY: Color = Color::Rgb(189, 189, 189);
    pub const TEXT_MUTED: Color = Color::Rgb(117, 117, 117);
    pub const BORDER: Color = Color::Rgb(66, 66, 66);
    pub const BORDER_FOCUS: Color = PRIMARY;
}

struct App {
    mode: AppMode,
    should_quit: bool,

    search_input: String,
    search_input_active: bool,
    results_state: ListState,

    favorites_state: ListState,

    form: AccountForm,

    event_sender: mpsc::UnboundedSender<AppEvent>,
    event_receiver: mpsc::UnboundedReceiver<AppEvent>,

    finder: MovieFinder,
}

impl App {
    fn new(finder: MovieFinder) -> Self {
        let (event_sender, event_receiver) = mpsc::unbounded_channel();

        Self {
            mode: AppMode::Search,
            should_quit: false,
            search_input: String::new(),
            search_input_active: true,
            results_state: ListState::default(),
            favorites_state: ListState::default(),
            form: AccountForm::new(),
            event_sender,
            event_receiver,
            finder,
        }
    }

    fn is_typing(&self) -> bool {
        (self.mode == AppMode::Search && self.search_input_active)
            || (self.mode == AppMode::Account && !self.finder.is_logged_in())
    }

    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        match key.code {
            KeyCode::Tab => self.cycle_mode(1),
            KeyCode::BackTab => self.cycle_mode(AppMode::all().len() - 1),
            KeyCode::F(1) => self.mode = AppMode::Help,
            KeyCode::Char('q') if !self.is_typing() => self.should_quit = true,
            KeyCode::Esc if !self.is_typing() => self.finder.clear_status(),
            _ => match self.mode {
                AppMode::Search => self.handle_search_keys(key.code).await,
                AppMode::Favorites => self.handle_favorites_keys(key.code).await,
                AppMode::Account => self.handle_account_keys(key.code).await,
                AppMode::Help => {}
            },
        }
        Ok(())
    }

    fn cycle_mode(&mut self, step: usize) {
        let modes = AppMode::all();
        let current = modes.iter().position(|m| *m == self.mode).unwrap_or(0);
        self.mode = modes[(current + step) % modes.len()];
    }

    async fn handle_search_keys(&mut self, key: KeyCode) {
        if self.search_input_active {
            match key {
                KeyCode::Enter => {
                    self.search_input_active = false;
                    self.start_search();
                }
                KeyCode::Esc => self.search_input_active = false,
                KeyCode::Backspace => {
                    self.search_input.pop();
                }
                KeyCode::Char(c) => self.search_input.push(c),
                _ => {}
            }
            return;
        }

        let len = self.finder.state().results.len();
        match key {
            KeyCode::Char('s') | KeyCode::Char('/') => self.search_input_active = true,
            KeyCode::Up => select_previous(&mut self.results_state),
            KeyCode::Down => select_next(&mut self.results_state, len),
            KeyCode::Char('f') | KeyCode::Enter => {
                if let Some(selected) = self.results_state.selected() {
                    self.finder.add_result(selected).await;
                    clamp_selection(&mut self.favorites_state, self.finder.state().favorites.len());
                }
            }
            _ => {}
        }
    }

    /// Starts a search in the background; an empty query does nothing.
    fn start_search(&mut self) {
        let title = self.search_input.clone();
        let Some(ticket) = self.finder.begin_search(&title) else {
            return;
        };

        let flow = self.finder.search_flow();
        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            let outcome = flow.run(ticket, &title).await;
            let _ = sender.send(AppEvent::SearchFinished(outcome));
        });
    }

    async fn handle_favorites_keys(&mut self, key: KeyCode) {
        let len = self.finder.state().favorites.len();
        match key {
            KeyCode::Up => select_previous(&mut self.favorites_state),
            KeyCode::Down => select_next(&mut self.favorites_state, len),
            KeyCode::Char('d') | KeyCode::Delete => {
                let selected = self
                    .favorites_state
                    .selected()
                    .and_then(|i| self.finder.state().favorites.get(i))
                    .map(|f| f.imdb_id.clone());
                if let Some(imdb_id) = selected {
                    self.finder.remove_favorite(&imdb_id).await;
                }
            }
            KeyCode::Char('r') => {
                self.finder.refresh_favorites().await;
            }
            _ => {}
        }
        clamp_selection(&mut self.favorites_state, self.finder.state().favorites.len());
    }

    async fn handle_account_keys(&mut self, key: KeyCode) {
        if self.finder.is_logged_in() {
            if key == KeyCode::Char('l') {
                self.finder.logout();
                self.favorites_state.select(None);
            }
            return;
        }

        match key {
            KeyCode::Up => self.form.focus_previous(),
            KeyCode::Down => self.form.focus_next(),
            KeyCode::Backspace => self.form.pop(),
            KeyCode::Char(c) => self.form.push(c),
            KeyCode::Enter => {
                let outcome = self.finder.login(&self.form.email, &self.form.password).await;
                self.after_auth(outcome);
            }
            KeyCode::F(2) => {
                let outcome = self
                    .finder
                    .register(&self.form.username, &self.form.email, &self.form.password)
                    .await;
                self.after_auth(outcome);
            }
            _ => {}
        }
    }

    fn after_auth(&mut self, outcome: AuthOutcome) {
        if outcome.is_success() {
            self.form.clear_password();
            clamp_selection(&mut self.favorites_state, self.finder.state().favorites.len());
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchFinished(outcome) => {
                if outcome.replaces_results() {
                    self.finder.apply_search(outcome);
                    let len = self.finder.state().results.len();
                    self.results_state
                        .select(if len == 0 { None } else { Some(0) });
                }
            }
        }
    }
}

fn select_previous(state: &mut ListState) {
    if let Some(selected) = state.selected() {
        state.select(Some(selected.saturating_sub(1)));
    }
}

fn select_next(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let next = state.selected().map_or(0, |s| (s + 1).min(len - 1));
    state.select(Some(next));
}

fn clamp_selection(state: &mut ListState, len: usize) {
    state.select(match (state.selected(), len) {
        (_, 0) => None,
        (Some(selected), len) => Some(selected.min(len - 1)),
        (None, _) => Some(0),
    });
}

// Rendering implementation
impl App {
    fn render(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(18), Constraint::Min(0)])
            .split(size);

        self.render_sidebar(f, chunks[0]);

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status bar
            ])
            .split(chunks[1]);

        self.render_header(f, main_chunks[0]);
        match self.mode {
            AppMode::Search => self.render_search(f, main_chunks[1]),
            AppMode::Favorites => self.render_favorites(f, main_chunks[1]),
            AppMode::Account => self.render_account(f, main_chunks[1]),
            AppMode::Help => self.render_help(f, main_chunks[1]),
        }
        self.render_status_bar(f, main_chunks[2]);
    }

    fn render_sidebar(&self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = AppMode::all()
            .iter()
            .map(|mode| {
                let style = if *mode == self.mode {
                    Style::default()
                        .fg(theme::PRIMARY)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme::TEXT_SECONDARY)
                };
                ListItem::new(Line::from(mode.label())).style(style)
            })
            .collect();

        let sidebar = List::new(items).block(
            Block::default()
                .title("Movie Finder")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::BORDER))
                .title_style(
                    Style::default()
                        .fg(theme::PRIMARY)
                        .add_modifier(Modifier::BOLD),
                ),
        );

        f.render_widget(sidebar, area);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let account = if self.finder.is_logged_in() {
            "logged in"
        } else {
            "logged out"
        };
        let title = format!("{}  ·  {}", self.finder.state().title(), account);

        let header = Paragraph::new(title)
            .style(
                Style::default()
                    .fg(theme::TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme::BORDER)),
            )
            .alignment(Alignment::Center);

        f.render_widget(header, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let state = self.finder.state();
        let line = if state.loading {
            Line::from("Searching...")
        } else if let Some(status) = &state.status {
            format_status(status)
        } else {
            Line::styled(self.hint(), Style::default().fg(theme::TEXT_MUTED))
        };

        let status = Paragraph::new(line)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme::BORDER)),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(status, area);
    }

    fn hint(&self) -> &'static str {
        match self.mode {
            AppMode::Search if self.search_input_active => "Type a title, Enter to search, Esc to browse results",
            AppMode::Search => "s or / to search · ↑↓ select · f add to favorites · Tab switch · q quit",
            AppMode::Favorites => "↑↓ select · d remove · r refresh · Tab switch · q quit",
            AppMode::Account if self.finder.is_logged_in() => "l log out · Tab switch · q quit",
            AppMode::Account => "↑↓ field · Enter login · F2 register · Tab switch",
            AppMode::Help => "Tab switch · q quit",
        }
    }

    fn render_search(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .margin(1)
            .split(area);

        let border = if self.search_input_active {
            theme::BORDER_FOCUS
        } else {
            theme::BORDER
        };
        let input = Paragraph::new(self.search_input.as_str())
            .style(Style::default().fg(theme::TEXT_PRIMARY))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .title("Movie title"),
            );
        f.render_widget(input, chunks[0]);

        let state = self.finder.state();
        let items: Vec<ListItem> = state
            .results
            .iter()
            .map(|r| ListItem::new(format_result(r, state.is_favorite(&r.imdb_id))))
            .collect();

        let results = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme::BORDER))
                    .title(format!("Search Results ({})", state.results.len())),
            )
            .highlight_style(
                Style::default()
                    .bg(theme::PRIMARY)
                    .fg(theme::TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_stateful_widget(results, chunks[1], &mut self.results_state);
    }

    fn render_favorites(&mut self, f: &mut Frame, area: Rect) {
        let state = self.finder.state();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER))
            .title(format!("Your Favorites ({})", state.favorites.len()));

        if state.favorites.is_empty() {
            let text = if self.finder.is_logged_in() {
                "No favorites yet."
            } else {
                "Log in on the Account screen to see your favorites."
            };
            let empty = Paragraph::new(text)
                .style(Style::default().fg(theme::TEXT_MUTED))
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = state
            .favorites
            .iter()
            .map(|fav| ListItem::new(format_favorite(fav)))
            .collect();

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(theme::PRIMARY)
                .fg(theme::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        );
        f.render_stateful_widget(list, area, &mut self.favorites_state);
    }

    fn render_account(&self, f: &mut Frame, area: Rect) {
        if self.finder.is_logged_in() {
            let text = vec![
                Line::from("You are logged in."),
                Line::from(""),
                Line::from("Press 'l' to log out."),
            ];
            let panel = Paragraph::new(text)
                .style(Style::default().fg(theme::TEXT_PRIMARY))
                .block(
                    Block::default()
                        .title("Account")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(theme::BORDER)),
                );
            f.render_widget(panel, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .margin(1)
            .split(area);

        for (i, field) in AccountField::all().into_iter().enumerate() {
            let focused = self.form.focus == field;
            let input = Paragraph::new(self.form.display_value(field))
                .style(Style::default().fg(theme::TEXT_PRIMARY))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(if focused {
                            theme::BORDER_FOCUS
                        } else {
                            theme::BORDER
                        }))
                        .title(field.label()),
                );
            f.render_widget(input, chunks[i]);
        }

        let help = Paragraph::new(vec![
            Line::from("Enter logs in with email and password."),
            Line::from("F2 registers a new account with all three fields."),
        ])
        .style(Style::default().fg(theme::TEXT_SECONDARY));
        f.render_widget(help, chunks[3]);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let lines = vec![
            Line::styled(
                "Global",
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::from("  Tab / Shift-Tab   switch screen"),
            Line::from("  F1                this help"),
            Line::from("  q / Ctrl-C        quit"),
            Line::from(""),
            Line::styled(
                "Search",
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::from("  s or /            edit the title"),
            Line::from("  Enter             search (in the input) / add to favorites"),
            Line::from("  f                 add highlighted result to favorites"),
            Line::from(""),
            Line::styled(
                "Favorites",
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::from("  d / Delete        remove highlighted favorite"),
            Line::from("  r                 reload from the server"),
        ];

        let help = Paragraph::new(lines).block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::BORDER)),
        );
        f.render_widget(help, area);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    install()?;

    let config = Config::load(None)?;
    logging::init(
        &config.log_level,
        LogTarget::File(config::data_dir().join("tui.log")),
    )?;

    let mut finder = MovieFinder::from_config(&config)?;
    finder.startup().await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(finder);

    loop {
        terminal.draw(|f| app.render(f))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key_event(key).await?;
                }
            }
        }

        while let Ok(app_event) = app.event_receiver.try_recv() {
            app.handle_app_event(app_event);
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

