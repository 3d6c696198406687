//! Display utilities for drawing pickers in the terminal.
//!
//! This module provides the text rendering used by the CLI to show month
//! grids and picker state.
//!
//! # Functions
//!
//! - [`weekday_label`] - Two-letter weekday column header
//! - [`format_cell`] - Draw one day cell with its selection markers
//! - [`render_grid`] - Draw a month panel as text lines
//! - [`render_panel`] / [`render_panels`] - Draw picker panels
//! - [`side_by_side`] - Join two panels horizontally
//! - [`navigation_line`] - Month label framed by the prev/next arrows
//! - [`print_section_simple`] - Print section headers

use chrono::Weekday;

use crate::calendar::{DayView, Navigation, PanelView};
use crate::grid::DAYS_PER_WEEK;
use crate::range::RangeCell;

/// Width of a drawn day cell.
pub const CELL_WIDTH: usize = 4;

/// Width of a drawn month panel.
pub const PANEL_WIDTH: usize = CELL_WIDTH * DAYS_PER_WEEK;

/// Two-letter column header for `day`.
#[must_use]
pub const fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Tu",
        Weekday::Wed => "We",
        Weekday::Thu => "Th",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "Su",
    }
}

/// Draw one cell, always [`CELL_WIDTH`] characters wide.
///
/// Selected days are bracketed: `[09]` for a lone day, `[01-`, `-03-` and
/// `-05]` along a range. Days that cannot be picked are shown in
/// parentheses, hidden days are blank.
///
/// # Examples
///
/// ```
/// use calendar_engine::calendar::DayView;
/// use calendar_engine::display::format_cell;
///
/// let view = DayView {
///     date: "2021-11-09".parse().unwrap(),
///     in_current_month: true,
///     visible: true,
///     selectable: true,
///     selected: true,
///     range_cell: None,
/// };
/// assert_eq!(format_cell(&view), "[09]");
/// ```
#[must_use]
pub fn format_cell(view: &DayView) -> String {
    if !view.visible {
        return " ".repeat(CELL_WIDTH);
    }
    let day = view.date.day();
    match view.range_cell {
        Some(RangeCell::Single) => format!("[{day:02}]"),
        Some(RangeCell::Start) => format!("[{day:02}-"),
        Some(RangeCell::End) => format!("-{day:02}]"),
        Some(RangeCell::Middle) => format!("-{day:02}-"),
        None if view.selected => format!("[{day:02}]"),
        None if !view.selectable => format!("({day:02})"),
        None => format!(" {day:02} "),
    }
}

/// Draw a month panel: centered title, weekday header, six week rows.
#[must_use]
pub fn render_grid(title: &str, header: &[Weekday], views: &[DayView]) -> Vec<String> {
    let mut lines = Vec::with_capacity(2 + views.len() / DAYS_PER_WEEK);
    lines.push(format!("{title:^PANEL_WIDTH$}"));
    lines.push(
        header
            .iter()
            .map(|day| format!(" {} ", weekday_label(*day)))
            .collect(),
    );
    lines.extend(
        views
            .chunks(DAYS_PER_WEEK)
            .map(|week| week.iter().map(format_cell).collect::<String>()),
    );
    lines
}

/// Draw a picker panel under its default month label.
#[must_use]
pub fn render_panel(panel: &PanelView) -> Vec<String> {
    render_grid(&panel.month.default_text(), &panel.header, &panel.days)
}

/// Draw every panel of a picker, left to right.
#[must_use]
pub fn render_panels(panels: &[PanelView]) -> Vec<String> {
    panels
        .iter()
        .map(render_panel)
        .reduce(|left, right| side_by_side(&left, &right, 2))
        .unwrap_or_default()
}

/// Place two panels next to each other, `gap` spaces apart.
#[must_use]
pub fn side_by_side(left: &[String], right: &[String], gap: usize) -> Vec<String> {
    let rows = left.len().max(right.len());
    (0..rows)
        .map(|i| {
            let l = left.get(i).map_or("", String::as_str);
            let r = right.get(i).map_or("", String::as_str);
            format!("{l:<PANEL_WIDTH$}{}{r}", " ".repeat(gap))
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Month label between arrows; an unavailable direction shows a blank.
#[must_use]
pub fn navigation_line(nav: &Navigation) -> String {
    let prev = if nav.can_go_prev { '<' } else { ' ' };
    let next = if nav.can_go_next { '>' } else { ' ' };
    format!("{prev} {} {next}", nav.current_month.default_text())
}

/// Print a simple section header with dashes.
pub fn print_section_simple(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(PANEL_WIDTH));
}
