//! Terminal rendering of the chart widget.
use ratatui::prelude::*;
use ratatui::widgets::Axis;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Chart;
use ratatui::widgets::Dataset;
use ratatui::widgets::GraphType;
use ratatui::widgets::Paragraph;
use time::UtcOffset;

use crate::chart::ChartView;
use crate::chart::DATASET_LABEL;
use crate::range::Range;
use crate::state::ChartState;
use crate::style::change_line;
use crate::style::usd;
use crate::style::Rgba;
use crate::style::GRID;

const BANNER_FG: Color = Color::Rgb(211, 47, 47);
const BANNER_BG: Color = Color::Rgb(255, 205, 210);
const HELP: &str = " 1-7/Tab: range  ←/→: inspect  r: reload  q: quit";

/// Screen regions of the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Areas {
    pub banner: Rect,
    pub info: Rect,
    pub buttons: Rect,
    pub chart: Rect,
    pub footer: Rect,
}

impl Areas {
    pub fn new(area: Rect, has_error: bool) -> Self {
        let [banner, header, chart, footer] = Layout::vertical([
            Constraint::Length(if has_error { 3 } else { 0 }),
            Constraint::Length(5),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .areas(area);
        let [info, buttons] =
            Layout::horizontal([Constraint::Min(20), Constraint::Length(buttons_width())])
                .areas(header);
        Self {
            banner,
            info,
            buttons,
            chart,
            footer,
        }
    }

    /// Row holding the range buttons, inside their border.
    fn button_row(&self) -> Rect {
        Rect {
            x: self.buttons.x + 1,
            y: self.buttons.y + 1,
            width: self.buttons.width.saturating_sub(2),
            height: 1.min(self.buttons.height.saturating_sub(2)),
        }
    }
}

/// What's under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Button(Range),
    /// Index of the nearest sample
    Sample(usize),
    Outside,
}

/// Resolves the pointer position for a frame of size `area`.
pub fn hit(area: Rect, state: &ChartState, offset: UtcOffset, column: u16, row: u16) -> Target {
    let areas = Areas::new(area, state.error.is_some());
    let position = Position::new(column, row);
    if let Some(range) = button_at(areas.button_row(), position) {
        return Target::Button(range);
    }
    match &state.committed {
        Some(committed) => {
            let view = ChartView::new(committed, state.readout, offset);
            let plot = plot_area(areas.chart, &view);
            match sample_at(plot, position, committed.series.len()) {
                Some(index) => Target::Sample(index),
                None => Target::Outside,
            }
        }
        None => Target::Outside,
    }
}

fn button_label(range: Range) -> String {
    format!(" {} ", range.label())
}

fn buttons_width() -> u16 {
    let labels: usize = Range::ALL.iter().map(|r| button_label(*r).len()).sum();
    // Separators between buttons plus border
    (labels + Range::ALL.len() - 1 + 2) as u16
}

fn button_at(row: Rect, position: Position) -> Option<Range> {
    if !row.contains(position) {
        return None;
    }
    let mut x = row.x;
    for range in Range::ALL {
        let width = button_label(range).len() as u16;
        if position.x >= x && position.x < x + width {
            return Some(range);
        }
        x += width + 1;
    }
    None
}

/// Region of the chart where samples are plotted.
///
/// Leaves out the border, the x-axis rows and the columns left of the y axis.
/// The latter fit the widest y label and the overhang of the first x label,
/// up to a third of the width, as laid out by [`Chart`].
pub fn plot_area(chart: Rect, view: &ChartView) -> Rect {
    let inner = Block::default().borders(Borders::ALL).inner(chart);
    let width = |t: &String| Line::from(t.as_str()).width() as u16;
    let y_labels = view.y_ticks.iter().map(width).max().unwrap_or(0);
    let x_overhang = view.x_ticks.first().map(width).unwrap_or(0).saturating_sub(1);
    let mut x = inner.x + y_labels.max(x_overhang).min(inner.width / 3);
    // y axis line
    if x + 1 < inner.right() {
        x += 1;
    }
    Rect {
        x,
        y: inner.y,
        width: inner.right().saturating_sub(x),
        height: inner.height.saturating_sub(2),
    }
}

/// Index of the sample nearest to `position` within `plot`.
pub fn sample_at(plot: Rect, position: Position, len: usize) -> Option<usize> {
    if len == 0 || !plot.contains(position) {
        return None;
    }
    if plot.width <= 1 || len == 1 {
        return Some(0);
    }
    let offset = (position.x - plot.x) as f64;
    let span = (plot.width - 1) as f64;
    let index = (offset / span * (len - 1) as f64).round() as usize;
    Some(index.min(len - 1))
}

fn color(c: Rgba) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

fn blended(c: Rgba) -> Color {
    let (r, g, b) = c.over_black();
    Color::Rgb(r, g, b)
}

pub fn draw(frame: &mut Frame, state: &ChartState, offset: UtcOffset) {
    let areas = Areas::new(frame.area(), state.error.is_some());
    let view = state
        .committed
        .as_ref()
        .map(|c| ChartView::new(c, state.readout, offset));

    if let Some(message) = &state.error {
        render_banner(frame, areas.banner, message);
    }
    render_info(frame, areas.info, state, view.as_ref());
    render_buttons(frame, areas.buttons, state.range);
    match &view {
        Some(view) => render_chart(frame, areas.chart, state, view),
        None => render_placeholder(frame, areas.chart),
    }
    frame.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        areas.footer,
    );
}

fn render_banner(frame: &mut Frame, area: Rect, message: &str) {
    let banner = Paragraph::new(format!("⚠️ {message}"))
        .style(
            Style::default()
                .fg(BANNER_FG)
                .bg(BANNER_BG)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(banner, area);
}

fn render_info(frame: &mut Frame, area: Rect, state: &ChartState, view: Option<&ChartView>) {
    let mut lines = vec![Line::from(Span::styled(
        "Bitcoin (BTC)",
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    let price = match state.displayed_price() {
        Some(p) => usd(p, 2),
        None => String::from("$-"),
    };
    let mut price_line = vec![Span::styled(
        price,
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(label) = view.and_then(|v| v.hovered_label()) {
        price_line.push(Span::styled(
            format!("  {label}"),
            Style::default().fg(Color::Gray),
        ));
    }
    if state.is_loading() {
        price_line.push(Span::styled(
            "  loading…",
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines.push(Line::from(price_line));

    if let (Some(summary), Some(trend)) = (state.summary(), state.trend()) {
        lines.push(Line::from(Span::styled(
            change_line(summary),
            Style::default().fg(color(trend.palette().line)),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines),
        area.inner(Margin::new(1, 0)),
    );
}

fn render_buttons(frame: &mut Frame, area: Rect, selected: Range) {
    let mut spans = vec![];
    for (i, range) in Range::ALL.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if range == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(button_label(range), style));
    }
    let buttons = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(buttons, area);
}

fn render_placeholder(frame: &mut Frame, area: Rect) {
    let placeholder = Paragraph::new("Loading chart data...")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(placeholder, area);
}

fn render_chart(frame: &mut Frame, area: Rect, state: &ChartState, view: &ChartView) {
    let cursor: Vec<(f64, f64)> = match view.hovered {
        Some(i) => vec![(i as f64, view.y_bounds[0]), (i as f64, view.y_bounds[1])],
        None => vec![],
    };
    let mut datasets = vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color(view.palette.line)))
        .data(&view.data)];
    if !cursor.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(blended(GRID)))
                .data(&cursor),
        );
    }

    let title = match view.hovered_label() {
        Some(label) => format!(" {DATASET_LABEL} · {} · {label} ", state.range),
        None => format!(" {DATASET_LABEL} · {} ", state.range),
    };
    let axis_style = Style::default().fg(Color::Gray);
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(blended(GRID)))
                .style(Style::default().bg(blended(view.palette.fill))),
        )
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds(view.x_bounds)
                .labels(view.x_ticks.clone()),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds(view.y_bounds)
                .labels(view.y_ticks.clone()),
        );
    frame.render_widget(chart, area);
}
