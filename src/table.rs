//! Sortable, filterable, paginated table view.
//!
//! Rows go through filter, then sort, then pagination. Sorting is
//! single-column and stable. Missing values (NaN numbers, unparseable times)
//! sort after every real value in both directions.

use std::cmp::Ordering;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, HighlightSpacing, Paragraph, Row, Table, TableState};

use crate::filters::DayFilter;
use crate::models::{Earthquake, RecordId};
use crate::selection::{HoverTracker, Pointer, SelectionStore};

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Marker drawn in front of the selected row.
pub const SELECTED_MARKER: &str = "▶ ";

const COLUMN_COUNT: usize = 6;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SELECTED_ROW_BG: Color = Color::Rgb(0xfe, 0xf9, 0xc3);

/// Table columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Time,
    Latitude,
    Longitude,
    Depth,
    Magnitude,
    Place,
}

impl Column {
    pub const ALL: [Self; COLUMN_COUNT] = [
        Self::Time,
        Self::Latitude,
        Self::Longitude,
        Self::Depth,
        Self::Magnitude,
        Self::Place,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Time => "Time",
            Self::Latitude => "Latitude",
            Self::Longitude => "Longitude",
            Self::Depth => "Depth",
            Self::Magnitude => "Magnitude",
            Self::Place => "Place",
        }
    }

    /// Place is free text and is not sortable.
    #[must_use]
    pub const fn is_sortable(self) -> bool {
        !matches!(self, Self::Place)
    }

    const fn width(self) -> Constraint {
        match self {
            Self::Time => Constraint::Length(19),
            Self::Place => Constraint::Min(12),
            _ => Constraint::Length(10),
        }
    }

    /// Sort key; `None` for missing values.
    #[allow(clippy::cast_precision_loss)]
    fn sort_key(self, quake: &Earthquake) -> Option<f64> {
        let value = match self {
            Self::Time => return quake.local_time().map(|t| t.timestamp_millis() as f64),
            Self::Latitude => quake.latitude,
            Self::Longitude => quake.longitude,
            Self::Depth => quake.depth,
            Self::Magnitude => quake.mag,
            Self::Place => return None,
        };
        (!value.is_nan()).then_some(value)
    }

    /// Rendered cell text.
    #[must_use]
    pub fn cell(self, quake: &Earthquake) -> String {
        match self {
            Self::Time => quake.local_time().map_or_else(
                || quake.time.clone(),
                |t| t.format(TIME_FORMAT).to_string(),
            ),
            Self::Latitude => quake.latitude.to_string(),
            Self::Longitude => quake.longitude.to_string(),
            Self::Depth => quake.depth.to_string(),
            Self::Magnitude => quake.mag.to_string(),
            Self::Place => quake.place.clone().unwrap_or_default(),
        }
    }
}

impl std::str::FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "time" => Ok(Self::Time),
            "latitude" | "lat" => Ok(Self::Latitude),
            "longitude" | "lon" => Ok(Self::Longitude),
            "depth" => Ok(Self::Depth),
            "mag" | "magnitude" => Ok(Self::Magnitude),
            "place" => Ok(Self::Place),
            _ => Err(format!(
                "unknown column: {s} (expected: time, latitude, longitude, depth, mag, place)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: Column,
    pub direction: SortDirection,
}

impl std::str::FromStr for Sort {
    type Err = String;

    /// `column` or `column:asc` / `column:desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, dir) = s.split_once(':').unwrap_or((s, "asc"));
        let column: Column = name.parse()?;
        if !column.is_sortable() {
            return Err(format!("column {} is not sortable", column.header()));
        }
        let direction = match dir.to_lowercase().as_str() {
            "asc" => SortDirection::Ascending,
            "desc" => SortDirection::Descending,
            _ => return Err(format!("unknown sort direction: {dir} (expected: asc, desc)")),
        };
        Ok(Self { column, direction })
    }
}

/// Missing keys compare greater than any value, so they land last.
fn compare_keys(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Screen regions of the table.
#[derive(Debug, Clone, Copy)]
pub struct TableLayout {
    pub filter: Rect,
    pub body: Rect,
    pub footer: Rect,
}

impl TableLayout {
    #[must_use]
    pub fn new(area: Rect) -> Self {
        let [filter, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);
        Self {
            filter,
            body,
            footer,
        }
    }

    /// Rows available for data, below the header row.
    #[must_use]
    pub fn rows(&self) -> Rect {
        let inner = Block::bordered().inner(self.body);
        Rect::new(
            inner.x,
            inner.y.saturating_add(1),
            inner.width,
            inner.height.saturating_sub(1),
        )
    }
}

/// View state of the table: sort, filter, visible columns and page.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    sort: Option<Sort>,
    filter: String,
    hidden: [bool; COLUMN_COUNT],
    page_index: usize,
    page_size: usize,
    /// Data rows the last drawn table had room for
    viewport: Option<usize>,
}

impl Default for TableView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl TableView {
    /// Create a table with a fixed page size (at least one row).
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            sort: None,
            filter: String::new(),
            hidden: [false; COLUMN_COUNT],
            page_index: 0,
            page_size: page_size.max(1),
            viewport: None,
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn sort(&self) -> Option<Sort> {
        self.sort
    }

    /// Set the sort directly (resets to the first page).
    pub fn set_sort(&mut self, sort: Option<Sort>) {
        self.sort = sort;
        self.page_index = 0;
    }

    /// Cycle a column through unsorted, ascending, descending.
    ///
    /// A different column replaces the current sort, starting at ascending.
    pub fn toggle_sort(&mut self, column: Column) {
        if !column.is_sortable() {
            return;
        }
        let next = match self.sort {
            Some(Sort {
                column: current,
                direction,
            }) if current == column => match direction {
                SortDirection::Ascending => Some(SortDirection::Descending),
                SortDirection::Descending => None,
            },
            _ => Some(SortDirection::Ascending),
        };
        self.set_sort(next.map(|direction| Sort { column, direction }));
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Replace the time filter text (resets to the first page).
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
        self.page_index = 0;
    }

    pub fn push_filter_char(&mut self, c: char) {
        let mut text = std::mem::take(&mut self.filter);
        text.push(c);
        self.set_filter(text);
    }

    pub fn pop_filter_char(&mut self) {
        let mut text = std::mem::take(&mut self.filter);
        text.pop();
        self.set_filter(text);
    }

    #[must_use]
    pub fn is_visible(&self, column: Column) -> bool {
        !self.hidden[column.index()]
    }

    pub fn toggle_column(&mut self, column: Column) {
        self.hidden[column.index()] = !self.hidden[column.index()];
    }

    /// Visible columns in display order.
    #[must_use]
    pub fn visible_columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|c| self.is_visible(*c))
            .collect()
    }

    #[cfg(test)]
    #[must_use]
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Rows per page: the configured page size, capped to what fits on screen.
    #[must_use]
    pub fn rows_per_page(&self) -> usize {
        self.viewport
            .map_or(self.page_size, |rows| self.page_size.min(rows.max(1)))
    }

    /// Cap pages to the rows a table of this height can draw.
    ///
    /// The first row of the current page stays on screen.
    pub fn fit_rows(&mut self, rows: u16) {
        let first = self.page_index * self.rows_per_page();
        self.viewport = Some(usize::from(rows));
        self.page_index = first / self.rows_per_page();
    }

    /// All rows passing the filter, in sort order.
    #[must_use]
    pub fn sorted_rows<'a>(&self, records: &'a [Earthquake]) -> Vec<&'a Earthquake> {
        let day = DayFilter::from_input(&self.filter);
        let filtered = records
            .iter()
            .filter(|q| day.is_none_or(|f| f.matches(q)));

        let Some(sort) = self.sort else {
            return filtered.collect();
        };

        let mut keyed: Vec<(Option<f64>, &Earthquake)> = filtered
            .map(|q| (sort.column.sort_key(q), q))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| compare_keys(*a, *b, sort.direction));
        keyed.into_iter().map(|(_, q)| q).collect()
    }

    /// Number of pages for `total` filtered rows (zero when nothing matches).
    #[must_use]
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.rows_per_page())
    }

    #[must_use]
    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    #[must_use]
    pub fn can_next(&self, total: usize) -> bool {
        self.page_index + 1 < self.page_count(total)
    }

    pub fn previous_page(&mut self) {
        if self.can_previous() {
            self.page_index -= 1;
        }
    }

    pub fn next_page(&mut self, total: usize) {
        if self.can_next(total) {
            self.page_index += 1;
        }
    }

    /// The current page of already filtered and sorted rows.
    #[must_use]
    pub fn page<'r, 'a>(&self, rows: &'r [&'a Earthquake]) -> &'r [&'a Earthquake] {
        let size = self.rows_per_page();
        let start = (self.page_index * size).min(rows.len());
        let end = (start + size).min(rows.len());
        &rows[start..end]
    }

    /// Rows on the current page.
    #[must_use]
    pub fn visible_rows<'a>(&self, records: &'a [Earthquake]) -> Vec<&'a Earthquake> {
        self.page(&self.sorted_rows(records)).to_vec()
    }

    /// Record drawn on a screen row, if any.
    #[must_use]
    pub fn hit_test<'a>(
        &self,
        records: &'a [Earthquake],
        area: Rect,
        column: u16,
        row: u16,
    ) -> Option<&'a RecordId> {
        let rows = TableLayout::new(area).rows();
        if !rows.contains(Position::new(column, row)) {
            return None;
        }
        let index = usize::from(row - rows.y);
        self.visible_rows(records).get(index).map(|q| &q.id)
    }

    /// Route pointer input through the hover tracker into the store.
    pub fn handle_pointer(
        &self,
        records: &[Earthquake],
        area: Rect,
        pointer: Pointer,
        hover: &mut HoverTracker,
        selection: &mut SelectionStore,
    ) {
        let target = self.hit_test(records, area, pointer.column, pointer.row);
        hover.track(pointer.kind, target, selection);
    }

    fn header_cell(&self, column: Column) -> String {
        let indicator = match self.sort {
            Some(sort) if sort.column == column => match sort.direction {
                SortDirection::Ascending => " ▲",
                SortDirection::Descending => " ▼",
            },
            _ if column.is_sortable() => " ↕",
            _ => "",
        };
        format!("{}{indicator}", column.header())
    }

    /// Draw the filter line, the table and the pagination footer.
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        records: &[Earthquake],
        selection: &SelectionStore,
    ) {
        let layout = TableLayout::new(area);
        let dim = Style::default().add_modifier(Modifier::DIM);

        let filter_text = if self.filter.is_empty() {
            Span::styled("Filter by time... (/)", dim)
        } else {
            Span::raw(self.filter.clone())
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![Span::raw("Time filter: "), filter_text])),
            layout.filter,
        );

        let columns = self.visible_columns();
        let sorted = self.sorted_rows(records);
        let total = sorted.len();
        let page = self.page(&sorted);

        let block = Block::bordered().title(format!(" Earthquakes ({total}) "));

        if page.is_empty() {
            frame.render_widget(
                Paragraph::new("No results.").centered().block(block),
                layout.body,
            );
        } else {
            let header = Row::new(columns.iter().map(|c| self.header_cell(*c)))
                .style(Style::default().add_modifier(Modifier::BOLD));
            let rows = page
                .iter()
                .map(|q| Row::new(columns.iter().map(|c| c.cell(q))));

            let table = Table::new(rows, columns.iter().map(|c| c.width()))
                .header(header)
                .block(block)
                .column_spacing(1)
                .highlight_symbol(SELECTED_MARKER)
                .highlight_spacing(HighlightSpacing::Always)
                .row_highlight_style(
                    Style::default()
                        .bg(SELECTED_ROW_BG)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                );

            let mut state = TableState::default()
                .with_selected(page.iter().position(|q| selection.is_selected(&q.id)));
            frame.render_stateful_widget(table, layout.body, &mut state);
        }

        let enabled = Style::default();
        let prev = Span::styled("◀ Prev", if self.can_previous() { enabled } else { dim });
        let next = Span::styled("Next ▶", if self.can_next(total) { enabled } else { dim });
        let pages = self.page_count(total).max(1);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                prev,
                Span::raw(format!("  Page {}/{pages}  ", self.page_index + 1)),
                next,
            ]))
            .right_aligned(),
            layout.footer,
        );
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::models::quake;

    fn mags(rows: &[&Earthquake]) -> Vec<f64> {
        rows.iter().map(|q| q.mag).collect()
    }

    fn numbered(n: usize) -> Vec<Earthquake> {
        (0..n)
            .map(|i| quake(&format!("q{i}"), "2024-01-05T10:00", f64::from(u32::try_from(i).unwrap())))
            .collect()
    }

    #[test]
    fn test_sort_cycle() {
        let mut table = TableView::default();
        table.toggle_sort(Column::Magnitude);
        assert_eq!(table.sort().map(|s| s.direction), Some(SortDirection::Ascending));
        table.toggle_sort(Column::Magnitude);
        assert_eq!(table.sort().map(|s| s.direction), Some(SortDirection::Descending));
        table.toggle_sort(Column::Magnitude);
        assert_eq!(table.sort(), None);
    }

    #[test]
    fn test_other_column_restarts_at_ascending() {
        let mut table = TableView::default();
        table.toggle_sort(Column::Magnitude);
        table.toggle_sort(Column::Magnitude);
        table.toggle_sort(Column::Depth);
        assert_eq!(
            table.sort(),
            Some(Sort { column: Column::Depth, direction: SortDirection::Ascending })
        );
    }

    #[test]
    fn test_place_is_not_sortable() {
        let mut table = TableView::default();
        table.toggle_sort(Column::Place);
        assert_eq!(table.sort(), None);
    }

    #[test]
    fn test_magnitude_ascending_puts_nan_last() {
        let records = vec![
            quake("a", "2024-01-05T10:00", 3.2),
            quake("b", "2024-01-05T10:00", f64::NAN),
            quake("c", "2024-01-05T10:00", 1.1),
            quake("d", "2024-01-05T10:00", 2.5),
        ];
        let mut table = TableView::default();
        table.toggle_sort(Column::Magnitude);

        let sorted = mags(&table.sorted_rows(&records));
        assert_eq!(&sorted[..3], &[1.1, 2.5, 3.2]);
        assert!(sorted[3].is_nan());
    }

    #[test]
    fn test_magnitude_descending_still_puts_nan_last() {
        let records = vec![
            quake("a", "2024-01-05T10:00", f64::NAN),
            quake("b", "2024-01-05T10:00", 1.0),
            quake("c", "2024-01-05T10:00", 4.0),
        ];
        let mut table = TableView::default();
        table.toggle_sort(Column::Magnitude);
        table.toggle_sort(Column::Magnitude);

        let sorted = mags(&table.sorted_rows(&records));
        assert_eq!(&sorted[..2], &[4.0, 1.0]);
        assert!(sorted[2].is_nan());
    }

    #[test]
    fn test_sort_is_stable() {
        let records = vec![
            quake("a", "2024-01-05T10:00", 1.0),
            quake("b", "2024-01-05T10:00", 1.0),
            quake("c", "2024-01-05T10:00", 0.5),
        ];
        let mut table = TableView::default();
        table.toggle_sort(Column::Magnitude);
        let ids: Vec<&str> = table
            .sorted_rows(&records)
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(ids, ["c-2024-01-05T10:00", "a-2024-01-05T10:00", "b-2024-01-05T10:00"]);
    }

    #[test]
    fn test_time_sort_uses_instant() {
        let records = vec![
            quake("late", "2024-01-05T23:59", 1.0),
            quake("early", "2024-01-05T01:00", 1.0),
            quake("bad", "whenever", 1.0),
        ];
        let mut table = TableView::default();
        table.toggle_sort(Column::Time);
        let times: Vec<&str> = table
            .sorted_rows(&records)
            .iter()
            .map(|q| q.time.as_str())
            .collect();
        assert_eq!(times, ["2024-01-05T01:00", "2024-01-05T23:59", "whenever"]);
    }

    #[test]
    fn test_filter_by_day() {
        let records = vec![
            quake("a", "2024-01-05T10:00", 1.0),
            quake("b", "2024-01-05T23:59", 1.0),
            quake("c", "2024-01-07T08:00", 1.0),
        ];
        let mut table = TableView::default();

        table.set_filter("2024-01-05");
        assert_eq!(table.sorted_rows(&records).len(), 2);

        table.set_filter("2024-01-06");
        assert!(table.sorted_rows(&records).is_empty());

        table.set_filter("not-a-date");
        assert!(table.sorted_rows(&records).is_empty());

        table.set_filter("");
        assert_eq!(table.sorted_rows(&records).len(), 3);
    }

    #[test]
    fn test_hidden_column_keeps_sort_and_filter() {
        let records = vec![
            quake("a", "2024-01-05T10:00", 2.0),
            quake("b", "2024-01-06T10:00", 1.0),
        ];
        let mut table = TableView::default();
        table.toggle_sort(Column::Time);
        table.set_filter("2024-01-05");
        table.toggle_column(Column::Time);

        assert!(!table.is_visible(Column::Time));
        assert_eq!(table.visible_columns().len(), 5);
        assert_eq!(table.sort().map(|s| s.column), Some(Column::Time));
        assert_eq!(table.sorted_rows(&records).len(), 1);

        table.toggle_column(Column::Time);
        assert!(table.is_visible(Column::Time));
    }

    #[test]
    fn test_pagination() {
        let records = numbered(25);
        let mut table = TableView::new(10);

        assert_eq!(table.page_count(records.len()), 3);
        assert!(!table.can_previous());
        assert!(table.can_next(records.len()));
        assert_eq!(table.visible_rows(&records)[0].mag, 0.0);
        assert_eq!(table.visible_rows(&records).len(), 10);

        table.next_page(records.len());
        assert!(table.can_previous());
        assert!(table.can_next(records.len()));

        table.next_page(records.len());
        assert!(!table.can_next(records.len()));
        assert_eq!(table.visible_rows(&records).len(), 5);

        // Stays on the last page
        table.next_page(records.len());
        assert_eq!(table.page_index(), 2);

        table.previous_page();
        table.previous_page();
        table.previous_page();
        assert_eq!(table.page_index(), 0);
    }

    #[test]
    fn test_first_page_follows_sort_order() {
        let records = numbered(15);
        let mut table = TableView::new(10);
        table.next_page(records.len());
        table.toggle_sort(Column::Magnitude);
        table.toggle_sort(Column::Magnitude);

        // Sorting resets to the first page
        assert_eq!(table.page_index(), 0);
        assert_eq!(mags(&table.visible_rows(&records))[..2], [14.0, 13.0]);
    }

    #[test]
    fn test_no_rows_disables_both_buttons() {
        let table = TableView::default();
        assert_eq!(table.page_count(0), 0);
        assert!(!table.can_previous());
        assert!(!table.can_next(0));
    }

    #[test]
    fn test_sort_parse() {
        let sort: Sort = "mag:desc".parse().unwrap();
        assert_eq!(sort.column, Column::Magnitude);
        assert_eq!(sort.direction, SortDirection::Descending);
        assert!("place".parse::<Sort>().is_err());
        assert!("depth:sideways".parse::<Sort>().is_err());
    }

    #[test]
    fn test_row_hover_and_leave() {
        let records = numbered(3);
        let table = TableView::default();
        let area = Rect::new(0, 0, 100, 20);
        let rows = TableLayout::new(area).rows();
        let mut store = SelectionStore::default();
        let mut hover = HoverTracker::default();

        table.handle_pointer(&records, area, Pointer::moved(5, rows.y + 1), &mut hover, &mut store);
        assert!(store.is_selected(&records[1].id));

        // Past the last row
        table.handle_pointer(&records, area, Pointer::moved(5, rows.y + 5), &mut hover, &mut store);
        assert!(store.selected().is_none());

        table.handle_pointer(&records, area, Pointer::clicked(5, rows.y), &mut hover, &mut store);
        assert!(store.is_selected(&records[0].id));
    }

    #[test]
    fn test_selected_row_carries_marker() {
        let records = numbered(3);
        let table = TableView::default();
        let area = Rect::new(0, 0, 100, 20);
        let rows = TableLayout::new(area).rows();
        let mut store = SelectionStore::default();
        store.set(Some(records[2].id.clone()));

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|frame| table.render(frame, area, &records, &store))
            .unwrap();

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(rows.x, rows.y + 2)].symbol(), "▶");
        assert_eq!(buffer[(rows.x, rows.y)].symbol(), " ");
        assert_eq!(buffer[(rows.x + 3, rows.y + 2)].bg, SELECTED_ROW_BG);
    }

    fn row_text(buffer: &ratatui::buffer::Buffer, rows: Rect, y: u16) -> String {
        (rows.left()..rows.right())
            .map(|x| buffer[(x, y)].symbol())
            .collect()
    }

    #[test]
    fn test_short_pane_pages_through_every_row() {
        let records = numbered(20);
        let area = Rect::new(0, 0, 100, 10);
        let rows = TableLayout::new(area).rows();
        let mut table = TableView::new(10);
        table.fit_rows(rows.height);
        assert_eq!(table.rows_per_page(), 5);

        let mut seen = Vec::new();
        loop {
            seen.extend(mags(&table.visible_rows(&records)));
            if !table.can_next(records.len()) {
                break;
            }
            table.next_page(records.len());
        }
        let expected: Vec<f64> = (0..20).map(f64::from).collect();
        assert_eq!(seen, expected);

        // The last row of a page is drawn
        let mut table = TableView::new(10);
        table.fit_rows(rows.height);
        table.next_page(records.len());
        let mut terminal = Terminal::new(TestBackend::new(100, 10)).unwrap();
        terminal
            .draw(|frame| table.render(frame, area, &records, &SelectionStore::default()))
            .unwrap();
        let last = row_text(terminal.backend().buffer(), rows, rows.y + 4);
        assert!(last.contains('9'), "row was {last:?}");
    }

    #[test]
    fn test_fit_rows_keeps_first_row_on_screen() {
        let records = numbered(25);
        let mut table = TableView::new(10);
        table.next_page(records.len());
        table.next_page(records.len());
        assert_eq!(table.visible_rows(&records)[0].mag, 20.0);

        table.fit_rows(5);
        assert_eq!(table.page_index(), 4);
        assert_eq!(table.visible_rows(&records)[0].mag, 20.0);

        // A taller pane goes back to the configured page size
        table.fit_rows(40);
        assert_eq!(table.rows_per_page(), 10);
        assert_eq!(table.visible_rows(&records)[0].mag, 20.0);
    }
}
