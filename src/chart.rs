//! Scatter chart view.
//!
//! One point per record, placed by two chosen numeric fields. Axis domains
//! follow the data extent. The same [`PlotGeometry`] is used for drawing and
//! for hit-testing pointer input, so what is under the cursor is exactly what
//! was drawn there.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::models::{Earthquake, NumericField, RecordId};
use crate::selection::{HoverTracker, Pointer, SelectionStore};

/// Width of the y-axis label gutter, including the axis line.
const Y_GUTTER: u16 = 9;

const POINT_GLYPH: char = '•';
const SELECTED_GLYPH: char = '●';
const POINT_COLOR: Color = Color::Rgb(0x88, 0x84, 0xd8);
const SELECTED_COLOR: Color = Color::Rgb(0xff, 0x73, 0x00);

/// Closed numeric range of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    /// Fit the finite values. A single value is widened by one unit each way;
    /// no finite values gives `[0, 1]`.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        if min > max {
            return Self { min: 0.0, max: 1.0 };
        }
        if max - min < f64::EPSILON {
            return Self {
                min: min - 1.0,
                max: max + 1.0,
            };
        }
        Self { min, max }
    }

    fn span(self) -> f64 {
        self.max - self.min
    }

    /// Position of `v` within the domain, in `[0, 1]` when inside.
    fn fraction(self, v: f64) -> f64 {
        (v - self.min) / self.span()
    }
}

/// Mapping between data space and the terminal cells of the plot area.
#[derive(Debug, Clone, Copy)]
pub struct PlotGeometry {
    pub area: Rect,
    pub x: Domain,
    pub y: Domain,
}

impl PlotGeometry {
    /// Cell for a data point, or `None` if either coordinate is not finite or
    /// the plot has no room.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn project(&self, x: f64, y: f64) -> Option<Position> {
        if self.area.is_empty() || !x.is_finite() || !y.is_finite() {
            return None;
        }

        let fx = self.x.fraction(x);
        let fy = self.y.fraction(y);
        if !(0.0..=1.0).contains(&fx) || !(0.0..=1.0).contains(&fy) {
            return None;
        }

        let col = (fx * f64::from(self.area.width - 1)).round() as u16;
        let row = (fy * f64::from(self.area.height - 1)).round() as u16;

        Some(Position::new(
            self.area.x + col,
            self.area.bottom() - 1 - row,
        ))
    }
}

/// Screen regions of the chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartLayout {
    pub block: Rect,
    pub plot: Rect,
    pub y_labels: Rect,
    pub x_labels: Rect,
}

impl ChartLayout {
    #[must_use]
    pub fn new(area: Rect) -> Self {
        let inner = Block::bordered().inner(area);
        let body_height = inner.height.saturating_sub(1);
        let gutter = Y_GUTTER.min(inner.width);

        Self {
            block: area,
            y_labels: Rect::new(inner.x, inner.y, gutter, body_height),
            plot: Rect::new(
                inner.x + gutter,
                inner.y,
                inner.width - gutter,
                body_height,
            ),
            x_labels: Rect::new(
                inner.x + gutter,
                inner.y + body_height,
                inner.width - gutter,
                inner.height.min(1),
            ),
        }
    }
}

/// Scatter chart of records on two numeric axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartView {
    pub x: NumericField,
    pub y: NumericField,
}

impl Default for ChartView {
    fn default() -> Self {
        Self {
            x: NumericField::Longitude,
            y: NumericField::Latitude,
        }
    }
}

impl ChartView {
    #[must_use]
    pub const fn new(x: NumericField, y: NumericField) -> Self {
        Self { x, y }
    }

    /// Geometry for the chart drawn into `area`.
    #[must_use]
    pub fn geometry(&self, records: &[Earthquake], area: Rect) -> PlotGeometry {
        PlotGeometry {
            area: ChartLayout::new(area).plot,
            x: Domain::from_values(records.iter().map(|q| self.x.value(q))),
            y: Domain::from_values(records.iter().map(|q| self.y.value(q))),
        }
    }

    /// Record drawn at a cell, if any.
    ///
    /// The selected record is drawn on top, so it wins ties; otherwise the
    /// last record in sequence order does.
    #[must_use]
    pub fn hit_test<'a>(
        &self,
        records: &'a [Earthquake],
        area: Rect,
        column: u16,
        row: u16,
        selection: &SelectionStore,
    ) -> Option<&'a RecordId> {
        let geometry = self.geometry(records, area);
        let target = Position::new(column, row);
        if !geometry.area.contains(target) {
            return None;
        }

        let at_target = |q: &&Earthquake| {
            geometry.project(self.x.value(q), self.y.value(q)) == Some(target)
        };

        records
            .iter()
            .filter(|q| selection.is_selected(&q.id))
            .find(at_target)
            .or_else(|| records.iter().rev().find(at_target))
            .map(|q| &q.id)
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
        let target = self
            .hit_test(records, area, pointer.column, pointer.row, selection)
            .cloned();
        hover.track(pointer.kind, target.as_ref(), selection);
    }

    /// Draw the chart.
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        records: &[Earthquake],
        selection: &SelectionStore,
    ) {
        let layout = ChartLayout::new(area);
        let geometry = self.geometry(records, area);

        let title = format!(" {} vs {} ", self.y.label(), self.x.label());
        frame.render_widget(Block::bordered().title(title), layout.block);

        frame.render_widget(
            AxisLabels {
                layout,
                geometry,
                x_name: self.x.label(),
            },
            area,
        );
        frame.render_widget(
            ScatterPoints {
                records,
                view: *self,
                geometry,
                selection,
            },
            layout.plot,
        );

        let selected = records
            .iter()
            .filter(|q| selection.is_selected(&q.id))
            .find_map(|q| {
                geometry
                    .project(self.x.value(q), self.y.value(q))
                    .map(|pos| (q, pos))
            });
        if let Some((quake, anchor)) = selected {
            self.render_tooltip(frame, layout.plot, anchor, quake);
        }
    }

    /// Text of the hover tooltip: place, both axis values and magnitude.
    #[must_use]
    pub fn tooltip_lines(&self, quake: &Earthquake) -> Vec<String> {
        let mut fields = vec![self.x, self.y];
        if !fields.contains(&NumericField::Mag) {
            fields.push(NumericField::Mag);
        }

        let mut lines = vec![
            quake
                .place
                .clone()
                .unwrap_or_else(|| "Unknown location".to_string()),
        ];
        lines.extend(
            fields
                .into_iter()
                .map(|field| format!("{}: {}", field.label(), value_text(field.value(quake)))),
        );
        lines
    }

    /// Box beside the selected point, kept inside the plot.
    fn render_tooltip(&self, frame: &mut Frame, plot: Rect, anchor: Position, quake: &Earthquake) {
        let lines = self.tooltip_lines(quake);
        let text_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = u16::try_from(text_width + 2)
            .unwrap_or(u16::MAX)
            .min(plot.width);
        let height = u16::try_from(lines.len() + 2)
            .unwrap_or(u16::MAX)
            .min(plot.height);

        let area = Rect::new(
            tooltip_x(anchor.x, width, plot),
            tooltip_y(anchor.y, height, plot),
            width,
            height,
        );
        if area.is_empty() {
            return;
        }

        let mut text: Vec<Line> = lines.into_iter().map(Line::from).collect();
        if let Some(first) = text.first_mut() {
            *first = first.clone().style(Style::default().add_modifier(Modifier::BOLD));
        }

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(text).block(Block::bordered().border_style(Style::default().fg(SELECTED_COLOR))),
            area,
        );
    }
}

fn value_text(v: f64) -> String {
    if v.is_nan() { "?".to_string() } else { v.to_string() }
}

/// Right of the point when it fits, else left of it.
fn tooltip_x(anchor: u16, width: u16, plot: Rect) -> u16 {
    let right = anchor.saturating_add(2);
    if right.saturating_add(width) <= plot.right() {
        right
    } else {
        anchor.saturating_sub(width + 1).max(plot.x)
    }
}

/// Level with the point when it fits, else flush with the plot bottom.
fn tooltip_y(anchor: u16, height: u16, plot: Rect) -> u16 {
    if anchor.saturating_add(height) <= plot.bottom() {
        anchor
    } else {
        plot.bottom().saturating_sub(height).max(plot.y)
    }
}

/// Domain bounds and axis lines around the plot.
struct AxisLabels {
    layout: ChartLayout,
    geometry: PlotGeometry,
    x_name: &'static str,
}

impl Widget for AxisLabels {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let dim = Style::default().add_modifier(Modifier::DIM);
        let ChartLayout {
            y_labels, x_labels, ..
        } = self.layout;

        if y_labels.width >= 2 && !y_labels.is_empty() {
            let label_width = usize::from(y_labels.width - 1);
            let axis_x = y_labels.right() - 1;
            for row in y_labels.top()..y_labels.bottom() {
                buf.set_string(axis_x, row, "│", dim);
            }
            let top = format!("{:>label_width$.1}", self.geometry.y.max);
            let bottom = format!("{:>label_width$.1}", self.geometry.y.min);
            buf.set_stringn(y_labels.x, y_labels.top(), top, label_width, dim);
            buf.set_stringn(y_labels.x, y_labels.bottom() - 1, bottom, label_width, dim);
        }

        if !x_labels.is_empty() {
            let width = usize::from(x_labels.width);
            let min = format!("{:.1}", self.geometry.x.min);
            let max = format!("{:.1}", self.geometry.x.max);
            let line = format!(
                "{min:<left$}{name:^mid$}{max:>right$}",
                name = self.x_name,
                left = min.len(),
                mid = width.saturating_sub(min.len() + max.len()),
                right = max.len(),
            );
            buf.set_stringn(x_labels.x, x_labels.y, line, width, dim);
        }
    }
}

/// The points themselves.
struct ScatterPoints<'a> {
    records: &'a [Earthquake],
    view: ChartView,
    geometry: PlotGeometry,
    selection: &'a SelectionStore,
}

impl Widget for ScatterPoints<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let normal = Style::default().fg(POINT_COLOR);
        let highlighted = Style::default()
            .fg(SELECTED_COLOR)
            .add_modifier(Modifier::BOLD);

        let mut selected = None;
        for quake in self.records {
            let Some(pos) = self
                .geometry
                .project(self.view.x.value(quake), self.view.y.value(quake))
            else {
                continue;
            };
            if self.selection.is_selected(&quake.id) {
                selected = Some(pos);
                continue;
            }
            if let Some(cell) = buf.cell_mut(pos) {
                cell.set_char(POINT_GLYPH).set_style(normal);
            }
        }

        if let Some(cell) = selected.and_then(|pos| buf.cell_mut(pos)) {
            cell.set_char(SELECTED_GLYPH).set_style(highlighted);
        }
    }
}
