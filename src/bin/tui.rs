//! anime-album TUI - Browse top anime lists from the terminal
//!
//! Tabs for each top-list category, a card grid with infinite scroll, name
//! search, a detail modal with streaming links and a random quote panel.

use anime_album::prelude::*;
use anime_album::sources::{AnimechanSource, JikanSource};
use anime_album::tui::{
    GridState, Move, error_message, format_card, format_modal, format_quote, info_message,
    tab_titles, warning_message,
};
use color_eyre::{eyre::Result, install};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs, Wrap},
};
use std::{fs, io, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const CARD_WIDTH: u16 = 26;
const CARD_HEIGHT: u16 = 4;
const QUOTE_WIDTH: u16 = 34;

// Results of background work, each carrying what it belongs to
#[derive(Debug)]
enum AppEvent {
    Loaded(BucketSnapshot),
    Extended(Expansion),
    SearchResults { query: String, items: Vec<Anime> },
    Details(Anime),
    Quote(AnimeQuote),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum StatusType {
    Info,
    Warning,
    Error,
}

mod theme {
    use ratatui::style::Color;

    pub const PRIMARY: Color = Color::Rgb(75, 85, 255);
    pub const ACCENT: Color = Color::Rgb(255, 152, 0);
    pub const TEXT_SECONDARY: Color = Color::Rgb(189, 189, 189);
    pub const BORDER: Color = Color::Rgb(66, 66, 66);
    pub const BORDER_FOCUS: Color = PRIMARY;
}

struct App {
    album: Album,
    modal: Arc<DetailModal>,
    quotes: QuoteWidget,
    catalog: Arc<dyn CatalogSource>,
    quote_source: Arc<dyn QuoteSource>,

    grid: GridState,
    search_input: String,
    editing_search: bool,
    should_quit: bool,

    status: Option<(String, StatusType)>,

    event_sender: mpsc::UnboundedSender<AppEvent>,
    event_receiver: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    fn new(config: &AlbumConfig) -> Result<Self> {
        let (event_sender, event_receiver) = mpsc::unbounded_channel();

        let catalog: Arc<dyn CatalogSource> = Arc::new(JikanSource::with_config(config)?);
        let quote_source: Arc<dyn QuoteSource> = Arc::new(AnimechanSource::with_config(config)?);
        let modal = Arc::new(DetailModal::new());

        Ok(Self {
            album: Album::new(catalog.clone(), modal.clone(), config),
            modal,
            quotes: QuoteWidget::new(quote_source.clone()),
            catalog,
            quote_source,

            grid: GridState::default(),
            search_input: String::new(),
            editing_search: false,
            should_quit: false,

            status: None,

            event_sender,
            event_receiver,
        })
    }

    fn set_status(&mut self, message: impl Into<String>, status_type: StatusType) {
        self.status = Some((message.into(), status_type));
    }

    fn sync_grid(&mut self) {
        self.grid.set_len(self.album.pool().len());
    }

    fn start(&mut self) {
        if let ActiveView::Filter(filter) = self.album.active().clone() {
            self.switch_filter(filter);
        }
        self.refresh_quote();
    }

    fn switch_filter(&mut self, filter: TopFilter) {
        if !self.album.request_filter(filter) {
            self.grid.reset();
            self.sync_grid();
            return;
        }

        self.set_status(format!("Loading {}...", filter.label()), StatusType::Info);
        let cache = self.album.cache();
        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            let event = match cache.ensure_loaded(filter).await {
                Ok(snapshot) => AppEvent::Loaded(snapshot),
                Err(e) => AppEvent::Error(format!("Failed to load {}: {}", filter.label(), e)),
            };
            let _ = sender.send(event);
        });
    }

    fn load_more(&mut self) {
        let ActiveView::Filter(filter) = self.album.active().clone() else {
            return;
        };

        let cache = self.album.cache();
        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            let event = match cache.extend(filter).await {
                Ok(expansion) => AppEvent::Extended(expansion),
                Err(e) => AppEvent::Error(format!("Failed to load more: {}", e)),
            };
            let _ = sender.send(event);
        });
    }

    fn submit_search(&mut self) {
        self.editing_search = false;
        if self.search_input.trim().is_empty() {
            self.clear_search();
            return;
        }

        let query = self.album.request_search(&self.search_input);
        self.set_status(format!("Searching \"{}\"...", query), StatusType::Info);

        let search = self.album.search_cache();
        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            let event = match search.search(&query).await {
                Ok(items) => AppEvent::SearchResults { query, items },
                Err(e) => AppEvent::Error(format!("Search failed: {}", e)),
            };
            let _ = sender.send(event);
        });
    }

    fn clear_search(&mut self) {
        self.search_input.clear();
        self.editing_search = false;
        let searching = matches!(self.album.active(), ActiveView::Search(_))
            || matches!(self.album.pending(), Some(ActiveView::Search(_)));
        if searching {
            self.switch_filter(self.album.last_filter());
        }
    }

    fn open_selected(&mut self) {
        let index = self.grid.selected();
        if !self.album.select_card(index) {
            return;
        }
        let Some(id) = self.modal.current_id() else {
            return;
        };

        let catalog = self.catalog.clone();
        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            let event = match catalog.details(id).await {
                Ok(anime) => AppEvent::Details(anime),
                Err(e) => AppEvent::Error(format!("Failed to load streaming links: {}", e)),
            };
            let _ = sender.send(event);
        });
    }

    fn refresh_quote(&self) {
        let source = self.quote_source.clone();
        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            let event = match source.random_quote().await {
                Ok(quote) => AppEvent::Quote(quote),
                Err(e) => AppEvent::Error(format!("Failed to load quote: {}", e)),
            };
            let _ = sender.send(event);
        });
    }

    fn handle_key_event(&mut self, key: KeyCode) {
        if self.modal.is_open() {
            if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.modal.close();
            }
            return;
        }

        if self.editing_search {
            self.handle_search_keys(key);
            return;
        }

        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                if let Some(&filter) = TopFilter::ALL.get(index) {
                    self.search_input.clear();
                    self.switch_filter(filter);
                }
            }
            KeyCode::Char('/') => self.editing_search = true,
            KeyCode::Char('m') => self.load_more(),
            KeyCode::Char('r') => self.refresh_quote(),
            KeyCode::Esc => self.clear_search(),
            KeyCode::Enter => self.open_selected(),
            KeyCode::Left => self.move_cursor(Move::Left),
            KeyCode::Right => self.move_cursor(Move::Right),
            KeyCode::Up => self.move_cursor(Move::Up),
            KeyCode::Down => self.move_cursor(Move::Down),
            _ => {}
        }
    }

    fn handle_search_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => self.submit_search(),
            KeyCode::Esc => {
                if self.search_input.is_empty() {
                    self.clear_search();
                } else {
                    self.editing_search = false;
                }
            }
            KeyCode::Backspace => {
                self.search_input.pop();
            }
            KeyCode::Char(c) => self.search_input.push(c),
            _ => {}
        }
    }

    fn move_cursor(&mut self, direction: Move) {
        if self.grid.move_to(direction) {
            self.load_more();
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Loaded(snapshot) => {
                let switching =
                    self.album.pending() == Some(&ActiveView::Filter(snapshot.filter));
                if self.album.show_bucket(&snapshot) {
                    if switching {
                        self.grid.reset();
                    }
                    self.sync_grid();
                    self.status = None;
                }
            }
            AppEvent::Extended(Expansion::Appended(snapshot)) => {
                let added = snapshot.new_items().len();
                if self.album.show_bucket(&snapshot) {
                    self.sync_grid();
                    self.set_status(format!("Loaded {} more", added), StatusType::Info);
                }
            }
            AppEvent::Extended(Expansion::Exhausted(snapshot)) => {
                self.set_status(
                    format!("No more {} titles", snapshot.filter.label()),
                    StatusType::Warning,
                );
            }
            AppEvent::Extended(Expansion::InFlight) => {}
            AppEvent::SearchResults { query, items } => {
                if self.album.show_search_results(&query, &items) {
                    self.grid.reset();
                    self.sync_grid();
                    self.set_status(
                        format!("{} results for \"{}\"", items.len(), query),
                        StatusType::Info,
                    );
                }
            }
            AppEvent::Details(anime) => {
                self.modal.attach_streaming(anime.id, anime.streaming);
            }
            AppEvent::Quote(quote) => self.quotes.set(quote),
            AppEvent::Error(message) => {
                error!("{}", message);
                self.set_status(message, StatusType::Error);
            }
        }
    }
}

// Rendering implementation
impl App {
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Length(3), // Search bar
                Constraint::Min(0),    // Cards and quote
                Constraint::Length(3), // Status bar
            ])
            .split(f.size());

        self.render_tabs(f, chunks[0]);
        self.render_search_bar(f, chunks[1]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(QUOTE_WIDTH)])
            .split(chunks[2]);

        self.render_cards(f, body[0]);
        self.render_quote(f, body[1]);
        self.render_status_bar(f, chunks[3]);

        if let Some(content) = self.modal.content() {
            let area = centered_rect(70, 80, f.size());
            f.render_widget(Clear, area);
            let width = area.width.saturating_sub(4) as usize;
            let modal = Paragraph::new(format_modal(&content, width))
                .block(
                    Block::default()
                        .title("Details")
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(theme::BORDER_FOCUS)),
                )
                .wrap(Wrap { trim: false });
            f.render_widget(modal, area);
        }
    }

    fn render_tabs(&self, f: &mut Frame, area: Rect) {
        let selected = match self.album.active() {
            ActiveView::Filter(filter) => TopFilter::ALL.iter().position(|candidate| candidate == filter),
            ActiveView::Search(_) => None,
        };

        let mut tabs = Tabs::new(tab_titles())
            .block(
                Block::default()
                    .title("anime-album")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme::BORDER)),
            )
            .style(Style::default().fg(theme::TEXT_SECONDARY))
            .highlight_style(
                Style::default()
                    .fg(theme::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            );
        if let Some(index) = selected {
            tabs = tabs.select(index);
        }

        f.render_widget(tabs, area);
    }

    fn render_search_bar(&self, f: &mut Frame, area: Rect) {
        let border = if self.editing_search {
            theme::BORDER_FOCUS
        } else {
            theme::BORDER
        };
        let text = if self.search_input.is_empty() && !self.editing_search {
            Line::styled("Press / to search", Style::default().fg(theme::TEXT_SECONDARY))
        } else {
            Line::from(self.search_input.clone())
        };

        let bar = Paragraph::new(text).block(
            Block::default()
                .title("Search")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
        f.render_widget(bar, area);
    }

    fn render_cards(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(self.album.active().to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let columns = (inner.width / CARD_WIDTH).max(1);
        let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
        self.grid.set_columns(columns as usize);

        let slots = self.album.pool().slots();
        if slots.is_empty() {
            f.render_widget(
                Paragraph::new(Line::styled(
                    "Nothing to show yet",
                    Style::default().fg(theme::TEXT_SECONDARY),
                )),
                inner,
            );
            return;
        }

        // Keep the selected row on screen.
        let first_row = self.grid.row().saturating_sub(visible_rows - 1);
        let per_row = self.grid.columns();

        for (offset, (index, slot)) in slots
            .iter()
            .enumerate()
            .skip(first_row * per_row)
            .take(visible_rows * per_row)
            .enumerate()
        {
            let col = (offset % per_row) as u16;
            let row = (offset / per_row) as u16;
            let cell = Rect::new(
                inner.x + col * CARD_WIDTH,
                inner.y + row * CARD_HEIGHT,
                CARD_WIDTH.min(inner.width),
                CARD_HEIGHT,
            );

            let selected = index == self.grid.selected();
            let border = if selected {
                theme::ACCENT
            } else {
                theme::BORDER
            };
            let card = Paragraph::new(format_card(slot, selected)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(border)),
            );
            f.render_widget(card, cell);
        }
    }

    fn render_quote(&self, f: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(2) as usize;
        let quote = Paragraph::new(format_quote(&self.quotes, width)).block(
            Block::default()
                .title("Quote")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::BORDER)),
        );
        f.render_widget(quote, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let line = match &self.status {
            Some((message, StatusType::Info)) => info_message(message),
            Some((message, StatusType::Warning)) => warning_message(message),
            Some((message, StatusType::Error)) => error_message(message),
            None => Line::styled(
                "1-4 tabs  arrows move  m more  / search  Enter details  r quote  q quit",
                Style::default().fg(theme::TEXT_SECONDARY),
            ),
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
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

// The terminal belongs to the UI, so logs go to a file in the cache dir.
fn init_logging() -> Result<()> {
    let Some(dir) = dirs::cache_dir().map(|d| d.join("anime-album")) else {
        return Ok(());
    };
    fs::create_dir_all(&dir)?;
    let file = fs::File::create(dir.join("anime-album.log"))?;

    let filter =
        EnvFilter::try_from_env("ANIME_ALBUM_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    install()?;
    init_logging()?;

    let config = AlbumConfig::from_env()?;
    info!(api = %config.api_base, page_size = config.page_size, "starting anime-album-tui");
    let mut app = App::new(&config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start();

    loop {
        terminal.draw(|f| app.render(f))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key_event(key.code);
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
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
