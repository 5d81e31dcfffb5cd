//! ratatui-based UI: the preview-card list, the search overlay, the detail
//! overlay, and the day/night theme toggle.

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Context as _;
use bookbrowse_application::Session;
use bookbrowse_catalog::Catalog;
use bookbrowse_core::{
    AuthorFilter, AuthorId, BookDetail, FilterCriteria, GenreFilter, GenreId, Preview, Theme,
};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{event, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, Borders, Clear, HighlightSpacing, List, ListItem, ListState, Paragraph, Wrap,
};
use unicode_width::UnicodeWidthStr;

pub struct Ui {
    session: Session,
    /// Cards rendered so far: page 1 of the working set plus every page
    /// appended by show-more. Replaced wholesale on each search.
    cards: Vec<Preview>,
    remaining: usize,
    empty_state: bool,
    selected: usize,
    search_panel: SearchPanel,
    detail: Option<BookDetail>,
}

impl Ui {
    pub fn new(session: Session) -> Self {
        let mut ui = Self {
            session,
            cards: Vec::new(),
            remaining: 0,
            empty_state: false,
            selected: 0,
            search_panel: SearchPanel::default(),
            detail: None,
        };
        // Initial load: the whole catalog, paged.
        let outcome = ui.session.submit_search(FilterCriteria::default());
        ui.apply_search(outcome);
        ui
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut terminal = setup_terminal()?;
        terminal.clear().ok();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.event_loop(&mut terminal)
        }));
        let restore_result = restore_terminal(&mut terminal);

        match (result, restore_result) {
            (Ok(Ok(())), Ok(())) => Ok(()),
            (Ok(Ok(())), Err(err)) => Err(err),
            (Ok(Err(err)), _) => Err(err),
            (Err(panic), Ok(())) => Err(anyhow::anyhow!(panic_to_string(panic))),
            (Err(panic), Err(err)) => Err(anyhow::anyhow!(
                "{}\n(additionally failed to restore terminal: {err})",
                panic_to_string(panic)
            )),
        }
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if !event::poll(Duration::from_millis(250)).context("poll events")? {
                continue;
            }
            let Event::Key(key) = event::read().context("read event")? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if self.detail.is_some() {
                self.handle_detail_key(key);
                continue;
            }
            if self.search_panel.open {
                self.handle_search_key(key);
                continue;
            }
            if self.handle_library_key(key) {
                return Ok(());
            }
        }
    }

    fn handle_library_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.cards.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.cards.len().saturating_sub(1);
            }
            KeyCode::Enter => {
                // Re-resolve against the current catalog; a stale card id
                // simply opens nothing.
                if let Some(card) = self.cards.get(self.selected) {
                    self.detail = self.session.select(&card.id);
                }
            }
            KeyCode::Char('m') | KeyCode::Char(' ') => {
                // Inert at remaining == 0, mirroring a disabled affordance.
                if self.remaining > 0 {
                    let more = self.session.show_more();
                    self.cards.extend(more.previews);
                    self.remaining = more.remaining;
                }
            }
            KeyCode::Char('/') | KeyCode::Char('s') => {
                self.search_panel
                    .open_with(self.session.catalog(), self.session.criteria());
            }
            KeyCode::Char('t') => self.session.cycle_theme(),
            _ => {}
        }
        false
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.detail = None,
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.search_panel.open = false,
            KeyCode::Enter => {
                let criteria = self.search_panel.criteria();
                self.search_panel.open = false;
                let outcome = self.session.submit_search(criteria);
                self.apply_search(outcome);
            }
            KeyCode::Tab => self.search_panel.focus = self.search_panel.focus.next(),
            KeyCode::BackTab => self.search_panel.focus = self.search_panel.focus.prev(),
            KeyCode::Down => self.search_panel.move_cursor(1),
            KeyCode::Up => self.search_panel.move_cursor(-1),
            KeyCode::Backspace => {
                if self.search_panel.focus == SearchFocus::Title {
                    self.search_panel.query.pop();
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search_panel.query.clear();
            }
            KeyCode::Char(ch) => {
                if self.search_panel.focus == SearchFocus::Title {
                    self.search_panel.query.push(ch);
                }
            }
            _ => {}
        }
    }

    fn apply_search(&mut self, outcome: bookbrowse_application::SearchOutcome) {
        self.cards = outcome.previews;
        self.remaining = outcome.remaining;
        self.empty_state = outcome.empty;
        self.selected = 0;
    }

    fn accent_color(&self) -> Color {
        match self.session.theme() {
            Theme::Day => Color::Blue,
            Theme::Night => Color::Yellow,
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(2),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_cards(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        if self.search_panel.open {
            self.draw_search_panel(frame);
        }
        if let Some(detail) = &self.detail {
            self.draw_detail(frame, detail);
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame, area: Rect) {
        let criteria = self.session.criteria();
        let mut spans = vec![Span::styled(
            "Bookbrowse",
            Style::default()
                .fg(self.accent_color())
                .add_modifier(Modifier::BOLD),
        )];
        if !criteria.is_unfiltered() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                filter_summary(criteria, self.session.catalog()),
                Style::default().add_modifier(Modifier::ITALIC),
            ));
        }
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("[{}]", self.session.theme()),
            Style::default().add_modifier(Modifier::DIM),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_cards(&self, frame: &mut ratatui::Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Books — {} shown", self.cards.len()));

        if self.empty_state {
            let paragraph = Paragraph::new(Text::from(vec![
                Line::raw("No results found. Your filters might be too narrow."),
                Line::raw(""),
                Line::raw("Press / to adjust the search."),
            ]))
            .block(block)
            .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        let max_width = area.width.saturating_sub(6) as usize;
        let items: Vec<ListItem> = self
            .cards
            .iter()
            .map(|card| {
                let mut lines = Vec::new();
                for part in wrap_text(&card.title, max_width.max(8)) {
                    lines.push(Line::styled(part, Style::default().add_modifier(Modifier::BOLD)));
                }
                let author = card.author_name.clone().unwrap_or_default();
                lines.push(Line::styled(
                    author,
                    Style::default().add_modifier(Modifier::DIM),
                ));
                ListItem::new(Text::from(lines))
            })
            .collect();

        let highlight_style = Style::default()
            .fg(Color::Black)
            .bg(self.accent_color())
            .add_modifier(Modifier::BOLD);

        let list = List::new(items)
            .block(block)
            .highlight_style(highlight_style)
            .highlight_symbol("> ")
            .highlight_spacing(HighlightSpacing::Always);

        let mut state = ListState::default();
        if !self.cards.is_empty() {
            state.select(Some(self.selected.min(self.cards.len() - 1)));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame, area: Rect) {
        let more_style = if self.remaining > 0 {
            Style::default()
                .fg(self.accent_color())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let lines = vec![
            Line::from(Span::styled(
                format!("Show more ({})", self.remaining),
                more_style,
            )),
            Line::styled(
                "j/k move  Enter detail  m show more  / search  t theme  q quit",
                Style::default().add_modifier(Modifier::DIM),
            ),
        ];
        frame.render_widget(Paragraph::new(Text::from(lines)), area);
    }

    fn draw_search_panel(&self, frame: &mut ratatui::Frame) {
        let area = centered_rect(70, 80, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Search — Tab to switch field, Enter to apply, Esc to cancel");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Percentage(50),
                Constraint::Percentage(50),
            ])
            .split(inner);

        let focus = self.search_panel.focus;
        let focus_style = Style::default().fg(self.accent_color());

        let query_block = Block::default().borders(Borders::ALL).title("Title");
        let query_block = if focus == SearchFocus::Title {
            query_block.border_style(focus_style)
        } else {
            query_block
        };
        let cursor = if focus == SearchFocus::Title { "_" } else { "" };
        frame.render_widget(
            Paragraph::new(format!("{}{cursor}", self.search_panel.query)).block(query_block),
            chunks[0],
        );

        self.draw_option_list(
            frame,
            chunks[1],
            "Author",
            "All Authors",
            &self.search_panel.author_names(),
            self.search_panel.author_cursor,
            focus == SearchFocus::Authors,
        );
        self.draw_option_list(
            frame,
            chunks[2],
            "Genre",
            "All Genres",
            &self.search_panel.genre_names(),
            self.search_panel.genre_cursor,
            focus == SearchFocus::Genres,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_option_list(
        &self,
        frame: &mut ratatui::Frame,
        area: Rect,
        title: &str,
        any_label: &str,
        names: &[String],
        cursor: usize,
        focused: bool,
    ) {
        let block = Block::default().borders(Borders::ALL).title(title.to_string());
        let block = if focused {
            block.border_style(Style::default().fg(self.accent_color()))
        } else {
            block
        };

        let mut items = vec![ListItem::new(Line::styled(
            any_label.to_string(),
            Style::default().add_modifier(Modifier::ITALIC),
        ))];
        items.extend(names.iter().map(|name| ListItem::new(Line::raw(name.clone()))));

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(self.accent_color()),
            )
            .highlight_symbol("> ")
            .highlight_spacing(HighlightSpacing::Always);

        let mut state = ListState::default();
        state.select(Some(cursor));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_detail(&self, frame: &mut ratatui::Frame, detail: &BookDetail) {
        let area = centered_rect(70, 80, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(detail.title.clone());

        let author = detail.author_name.as_deref().unwrap_or("");
        let subtitle = format!("{author} ({})", detail.published_year);

        let mut lines = vec![
            Line::styled(subtitle, Style::default().add_modifier(Modifier::BOLD)),
            Line::styled(
                detail.image.clone(),
                Style::default().add_modifier(Modifier::DIM),
            ),
            Line::raw(""),
        ];
        for part in detail.description.lines() {
            lines.push(Line::raw(part.to_string()));
        }

        let paragraph = Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Left);
        frame.render_widget(paragraph, area);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchFocus {
    Title,
    Authors,
    Genres,
}

impl SearchFocus {
    fn next(self) -> Self {
        match self {
            SearchFocus::Title => SearchFocus::Authors,
            SearchFocus::Authors => SearchFocus::Genres,
            SearchFocus::Genres => SearchFocus::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            SearchFocus::Title => SearchFocus::Genres,
            SearchFocus::Authors => SearchFocus::Title,
            SearchFocus::Genres => SearchFocus::Authors,
        }
    }
}

/// Form state for the search overlay. Option cursors are offset by one:
/// index 0 is the "All ..." sentinel, index n is option n - 1.
#[derive(Debug, Clone, Default)]
struct SearchPanel {
    open: bool,
    focus: SearchFocus,
    query: String,
    author_cursor: usize,
    genre_cursor: usize,
    authors: Vec<(AuthorId, String)>,
    genres: Vec<(GenreId, String)>,
}

impl Default for SearchFocus {
    fn default() -> Self {
        Self::Title
    }
}

impl SearchPanel {
    /// Opens the panel seeded from the active criteria, so cancelling
    /// leaves the session exactly as it was.
    fn open_with(&mut self, catalog: &Catalog, criteria: &FilterCriteria) {
        self.open = true;
        self.focus = SearchFocus::Title;
        self.query = criteria.title_query.clone();
        self.authors = catalog.authors_sorted();
        self.genres = catalog.genres_sorted();
        self.author_cursor = option_cursor(&self.authors, match &criteria.author {
            AuthorFilter::Any => None,
            AuthorFilter::Selected(id) => Some(id),
        });
        self.genre_cursor = option_cursor(&self.genres, match &criteria.genre {
            GenreFilter::Any => None,
            GenreFilter::Selected(id) => Some(id),
        });
    }

    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            title_query: self.query.clone(),
            author: match self.author_cursor.checked_sub(1) {
                None => AuthorFilter::Any,
                Some(idx) => self
                    .authors
                    .get(idx)
                    .map(|(id, _)| AuthorFilter::Selected(id.clone()))
                    .unwrap_or(AuthorFilter::Any),
            },
            genre: match self.genre_cursor.checked_sub(1) {
                None => GenreFilter::Any,
                Some(idx) => self
                    .genres
                    .get(idx)
                    .map(|(id, _)| GenreFilter::Selected(id.clone()))
                    .unwrap_or(GenreFilter::Any),
            },
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let (cursor, len) = match self.focus {
            SearchFocus::Title => return,
            SearchFocus::Authors => (&mut self.author_cursor, self.authors.len()),
            SearchFocus::Genres => (&mut self.genre_cursor, self.genres.len()),
        };
        // One extra slot for the "All ..." sentinel at the top.
        let max = len;
        if delta > 0 {
            *cursor = (*cursor + 1).min(max);
        } else {
            *cursor = cursor.saturating_sub(1);
        }
    }

    fn author_names(&self) -> Vec<String> {
        self.authors.iter().map(|(_, name)| name.clone()).collect()
    }

    fn genre_names(&self) -> Vec<String> {
        self.genres.iter().map(|(_, name)| name.clone()).collect()
    }
}

/// Cursor position for a previously selected id: 0 for the sentinel, the
/// option's index + 1 otherwise.
fn option_cursor<K: PartialEq>(options: &[(K, String)], selected: Option<&K>) -> usize {
    match selected {
        None => 0,
        Some(id) => options
            .iter()
            .position(|(candidate, _)| candidate == id)
            .map(|idx| idx + 1)
            .unwrap_or(0),
    }
}

fn filter_summary(criteria: &FilterCriteria, catalog: &Catalog) -> String {
    let mut parts = Vec::new();
    let query = criteria.title_query.trim();
    if !query.is_empty() {
        parts.push(format!("title:\"{query}\""));
    }
    if let AuthorFilter::Selected(id) = &criteria.author {
        let name = catalog.author_name(id).unwrap_or(id.0.as_str());
        parts.push(format!("author:{name}"));
    }
    if let GenreFilter::Selected(id) = &criteria.genre {
        let name = catalog.genre_name(id).unwrap_or(id.0.as_str());
        parts.push(format!("genre:{name}"));
    }
    parts.join("  ")
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    terminal::enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen).context("enter alt screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("create terminal")
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    terminal::disable_raw_mode().context("disable raw mode")?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("leave alt screen")?;
    Ok(())
}

fn panic_to_string(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic: (unknown payload)".to_string()
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

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = UnicodeWidthStr::width(word);
        let sep_width = if current.is_empty() { 0 } else { 1 };

        if current_width + sep_width + word_width <= max_width {
            if !current.is_empty() {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= max_width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        let mut chunk = String::new();
        let mut chunk_width = 0usize;
        for ch in word.chars() {
            let mut buf = [0u8; 4];
            let s = ch.encode_utf8(&mut buf);
            let w = UnicodeWidthStr::width(s);
            if chunk_width + w > max_width && !chunk.is_empty() {
                lines.push(std::mem::take(&mut chunk));
                chunk_width = 0;
            }
            chunk.push(ch);
            chunk_width += w;
        }
        if !chunk.is_empty() {
            lines.push(std::mem::take(&mut chunk));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}
