//! Page controller for the interactive view.
//!
//! Owns the loading state, the intro splash, the axis selection, the table
//! state and the single [`SelectionStore`] shared by the chart and table.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, List, ListItem, Paragraph};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, error, info};

use crate::chart::ChartView;
use crate::client::{FeedSource, UsgsClient};
use crate::errors::SeismoviewError;
use crate::models::{Earthquake, NumericField};
use crate::selection::{HoverTracker, Pointer, SelectionPolicy, SelectionStore};
use crate::table::{Column, DEFAULT_PAGE_SIZE, TableLayout, TableView};

/// Outcome of the one feed load.
pub type LoadResult = Result<Vec<Earthquake>, SeismoviewError>;

/// Start the feed load on a background thread.
///
/// The result arrives once on the returned receiver. If the receiver is
/// dropped first the result is discarded.
#[must_use]
pub fn spawn_load(client: UsgsClient, source: FeedSource) -> oneshot::Receiver<LoadResult> {
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        let result = client.fetch_quakes(&source);
        if tx.send(result).is_err() {
            debug!("view closed before the feed arrived, discarding it");
        }
    });
    rx
}

/// Data readiness.
#[derive(Debug)]
pub enum Phase {
    Loading,
    Ready(Vec<Earthquake>),
}

/// Intro splash or the main chart/table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Splash,
    Main,
}

/// Where key presses go on the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Columns,
}

/// Settings for one interactive session.
#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    pub page_size: usize,
    pub policy: SelectionPolicy,
    pub x_axis: NumericField,
    pub y_axis: NumericField,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            policy: SelectionPolicy::default(),
            x_axis: NumericField::Longitude,
            y_axis: NumericField::Latitude,
        }
    }
}

/// Screen regions of the main view.
#[derive(Debug, Clone, Copy)]
pub struct MainLayout {
    pub header: Rect,
    pub chart: Rect,
    pub table: Rect,
    pub help: Rect,
}

impl MainLayout {
    #[must_use]
    pub fn new(area: Rect) -> Self {
        let [header, body, help] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .areas(area);
        let [chart, table] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .spacing(1)
                .areas(body);
        Self {
            header,
            chart,
            table,
            help,
        }
    }
}

/// Interactive application state.
pub struct App {
    phase: Phase,
    pending: Option<oneshot::Receiver<LoadResult>>,
    screen: Screen,
    mode: InputMode,
    x_axis: NumericField,
    y_axis: NumericField,
    selection: SelectionStore,
    table: TableView,
    chart_hover: HoverTracker,
    table_hover: HoverTracker,
    last_pointer: Option<Pointer>,
    area: Rect,
    pub should_quit: bool,
}

impl App {
    /// Create the app waiting on a pending load.
    #[must_use]
    pub fn new(config: AppConfig, pending: oneshot::Receiver<LoadResult>) -> Self {
        Self {
            phase: Phase::Loading,
            pending: Some(pending),
            screen: Screen::Splash,
            mode: InputMode::Normal,
            x_axis: config.x_axis,
            y_axis: config.y_axis,
            selection: SelectionStore::new(config.policy),
            table: TableView::new(config.page_size),
            chart_hover: HoverTracker::default(),
            table_hover: HoverTracker::default(),
            last_pointer: None,
            area: Rect::default(),
            should_quit: false,
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[cfg(test)]
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[cfg(test)]
    #[must_use]
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    #[cfg(test)]
    #[must_use]
    pub fn table(&self) -> &TableView {
        &self.table
    }

    /// Records once loaded; empty while loading.
    #[cfg(test)]
    #[must_use]
    pub fn records(&self) -> &[Earthquake] {
        match &self.phase {
            Phase::Ready(records) => records,
            Phase::Loading => &[],
        }
    }

    /// Chart configured with the current axes.
    #[must_use]
    pub fn chart(&self) -> ChartView {
        ChartView::new(self.x_axis, self.y_axis)
    }

    /// Layout of the main view for the last drawn frame size.
    #[must_use]
    pub fn layout(&self) -> MainLayout {
        MainLayout::new(self.area)
    }

    /// Remember the frame size used for hit-testing pointer input, and fit
    /// table pages to the rows that frame can show.
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        let rows = TableLayout::new(self.layout().table).rows();
        self.table.fit_rows(rows.height);
    }

    /// Check the pending load without blocking.
    ///
    /// A failed load is logged and leaves the view ready with no records.
    pub fn poll_load(&mut self) {
        let Some(rx) = self.pending.as_mut() else {
            return;
        };

        let records = match rx.try_recv() {
            Err(TryRecvError::Empty) => return,
            Ok(Ok(records)) => {
                info!("loaded {} earthquakes", records.len());
                records
            }
            Ok(Err(e)) => {
                error!("error fetching earthquake feed: {e}");
                Vec::new()
            }
            Err(TryRecvError::Closed) => {
                error!("feed loader exited without a result");
                Vec::new()
            }
        };

        self.pending = None;
        self.phase = Phase::Ready(records);
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if matches!(self.phase, Phase::Loading) || self.screen == Screen::Splash {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Enter | KeyCode::Char(' ') if matches!(self.phase, Phase::Ready(_)) => {
                    self.screen = Screen::Main;
                }
                _ => {}
            }
            return;
        }

        let table_before = self.table.clone();
        let chart_before = self.chart();

        match self.mode {
            InputMode::Normal => self.handle_normal_key(key.code),
            InputMode::Filter => match key.code {
                KeyCode::Enter | KeyCode::Esc => self.mode = InputMode::Normal,
                KeyCode::Backspace => self.table.pop_filter_char(),
                KeyCode::Char(c) => self.table.push_filter_char(c),
                _ => {}
            },
            InputMode::Columns => match key.code {
                KeyCode::Char(c @ '1'..='6') => {
                    if let Some(column) = digit_column(c) {
                        self.table.toggle_column(column);
                    }
                }
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char('c') => {
                    self.mode = InputMode::Normal;
                }
                _ => {}
            },
        }

        // Rows or points may have moved under a still pointer
        if self.table != table_before || self.chart() != chart_before {
            self.rehover();
        }
    }

    /// Hit-test the last pointer position again.
    fn rehover(&mut self) {
        if let Some(pointer) = self.last_pointer {
            self.handle_pointer(Pointer::moved(pointer.column, pointer.row));
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => self.selection.clear(),
            KeyCode::Char('x') => {
                self.x_axis = self.x_axis.next();
                debug!(axis = self.x_axis.as_str(), "x axis changed");
            }
            KeyCode::Char('y') => {
                self.y_axis = self.y_axis.next();
                debug!(axis = self.y_axis.as_str(), "y axis changed");
            }
            KeyCode::Char(c @ '1'..='5') => {
                if let Some(column) = digit_column(c) {
                    self.table.toggle_sort(column);
                }
            }
            KeyCode::Char('/') => self.mode = InputMode::Filter,
            KeyCode::Char('c') => self.mode = InputMode::Columns,
            KeyCode::Left | KeyCode::Char('p') => self.table.previous_page(),
            KeyCode::Right | KeyCode::Char('n') => {
                if let Phase::Ready(records) = &self.phase {
                    let total = self.table.sorted_rows(records).len();
                    self.table.next_page(total);
                }
            }
            _ => {}
        }
    }

    /// Route pointer input to both views.
    ///
    /// The view the pointer is not over goes first, so its leave is applied
    /// before the other view's enter.
    pub fn handle_pointer(&mut self, pointer: Pointer) {
        if self.screen != Screen::Main {
            return;
        }
        self.last_pointer = Some(pointer);
        let Phase::Ready(records) = &self.phase else {
            return;
        };

        let layout = self.layout();
        let chart = self.chart();
        let over_chart = layout
            .chart
            .contains(Position::new(pointer.column, pointer.row));

        let mut to_chart = |selection: &mut SelectionStore| {
            chart.handle_pointer(records, layout.chart, pointer, &mut self.chart_hover, selection);
        };
        let table = &self.table;
        let table_hover = &mut self.table_hover;
        let mut to_table = |selection: &mut SelectionStore| {
            table.handle_pointer(records, layout.table, pointer, table_hover, selection);
        };

        if over_chart {
            to_table(&mut self.selection);
            to_chart(&mut self.selection);
        } else {
            to_chart(&mut self.selection);
            to_table(&mut self.selection);
        }
    }

    /// Draw the current screen.
    pub fn render(&mut self, frame: &mut Frame) {
        self.resize(frame.area());

        match (&self.phase, self.screen) {
            (Phase::Loading, _) => render_loading(frame, self.area),
            (Phase::Ready(_), Screen::Splash) => render_splash(frame, self.area),
            (Phase::Ready(records), Screen::Main) => self.render_main(frame, records),
        }
    }

    fn render_main(&self, frame: &mut Frame, records: &[Earthquake]) {
        let layout = self.layout();
        let dim = Style::default().add_modifier(Modifier::DIM);
        let key = Style::default().fg(Color::Cyan);

        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "Earthquake Visualization",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(vec![
                    Span::raw("X-Axis: "),
                    Span::styled(self.x_axis.label(), key),
                    Span::styled(" (x)", dim),
                    Span::raw("   Y-Axis: "),
                    Span::styled(self.y_axis.label(), key),
                    Span::styled(" (y)", dim),
                    Span::raw("   Selected: "),
                    match self.selection.selected() {
                        Some(id) if self.selection.is_pinned() => {
                            Span::styled(format!("{id} (pinned)"), key)
                        }
                        Some(id) => Span::styled(id.to_string(), key),
                        None => Span::styled("none", dim),
                    },
                ]),
            ]),
            layout.header,
        );

        self.chart()
            .render(frame, layout.chart, records, &self.selection);
        self.table
            .render(frame, layout.table, records, &self.selection);

        let hints = match self.mode {
            InputMode::Normal => {
                "q quit │ Esc deselect │ x/y axes │ 1-5 sort │ / filter │ c columns │ ←/→ page"
            }
            InputMode::Filter => "type a date (YYYY-MM-DD) │ Backspace delete │ Enter/Esc done",
            InputMode::Columns => "1-6 toggle column │ Enter/Esc done",
        };
        frame.render_widget(Paragraph::new(Span::styled(hints, dim)), layout.help);

        match self.mode {
            InputMode::Filter => {
                let filter_area = TableLayout::new(layout.table).filter;
                let offset = u16::try_from("Time filter: ".len() + self.table.filter().chars().count())
                    .unwrap_or(u16::MAX);
                frame.set_cursor_position(Position::new(
                    filter_area.x.saturating_add(offset).min(filter_area.right().saturating_sub(1)),
                    filter_area.y,
                ));
            }
            InputMode::Columns => self.render_columns_menu(frame, layout.table),
            InputMode::Normal => {}
        }
    }

    fn render_columns_menu(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = Column::ALL
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let mark = if self.table.is_visible(*column) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{} {mark} {}", i + 1, column.header()))
            })
            .collect();

        let popup = Rect::new(
            area.x + area.width.saturating_sub(22),
            area.y + 1,
            22.min(area.width),
            8.min(area.height),
        );
        frame.render_widget(Clear, popup);
        frame.render_widget(List::new(items).block(Block::bordered().title(" Columns ")), popup);
    }
}

/// Table column bound to a digit key.
fn digit_column(c: char) -> Option<Column> {
    let index = c.to_digit(10)?.checked_sub(1)?;
    Column::ALL.get(usize::try_from(index).ok()?).copied()
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);
    frame.render_widget(Paragraph::new("Loading...").centered(), middle);
}

fn render_splash(frame: &mut Frame, area: Rect) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Fill(1),
    ])
    .areas(area);

    let accent = Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from("Start your journey with"),
            Line::from(Span::styled("Earthquake Visualization", accent)),
            Line::default(),
            Line::from(vec![
                Span::styled(" Let's go → ", Style::default().add_modifier(Modifier::REVERSED)),
                Span::styled("  (Enter)", Style::default().add_modifier(Modifier::DIM)),
            ]),
        ])
        .centered(),
        middle,
    );
}
