//! Plain-text rendering of the selected day.

use client_core::{DayView, SelectionSnapshot, ViewEntry};

pub const EMPTY_DAY_MESSAGE: &str = "No appointments on the selected date";

pub fn heading(selection: &SelectionSnapshot) -> String {
    let date = selection.selected.format("%-d %B %Y");
    if selection.is_today {
        format!("Today, {date}")
    } else {
        date.to_string()
    }
}

fn entry_line(entry: &ViewEntry) -> String {
    let mark = if entry.is_highlighted() { "x" } else { " " };
    match entry {
        ViewEntry::Client(entry) => format!("[{mark}] {}", entry.label),
        ViewEntry::Provider(entry) => format!(
            "[{mark}] {}-{}  {}",
            entry.start_time, entry.end_time, entry.label
        ),
    }
}

pub fn render_day(selection: &SelectionSnapshot, view: &DayView) -> Vec<String> {
    let mut lines = vec![heading(selection)];
    match view {
        DayView::Empty { .. } => lines.push(format!("  {EMPTY_DAY_MESSAGE}")),
        DayView::Entries { entries, .. } => {
            lines.extend(entries.iter().map(|entry| format!("  {}", entry_line(entry))));
        }
    }
    lines
}
