//! Some utility functions, mostly to display the events as text

use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::event::EventFields;
use crate::list_view::{RowView, View};

const HEADERS: [&str; 8] = ["ID", "Name", "Date", "Venue ID", "Starred", "Private", "Cancelled", "Actions"];

pub fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

fn checkbox(value: bool) -> &'static str {
    if value { "[x]" } else { "[ ]" }
}

fn row_cells(row: &RowView) -> Vec<String> {
    let ev = &row.shown;
    if row.editing {
        vec![
            format!("*{}", row.key),
            format!("[{}]", ev.name()),
            format!("[{}]", ev.date()),
            format!("[{}]", ev.venue_id()),
            checkbox(ev.is_starred()).to_string(),
            checkbox(ev.is_private()).to_string(),
            checkbox(ev.is_cancelled()).to_string(),
            "Save Delete".to_string(),
        ]
    } else {
        vec![
            row.key.to_string(),
            ev.name().to_string(),
            ev.date().to_string(),
            ev.venue_id().to_string(),
            yes_no(ev.is_starred()).to_string(),
            yes_no(ev.is_private()).to_string(),
            yes_no(ev.is_cancelled()).to_string(),
            "Edit Delete".to_string(),
        ]
    }
}

/// Pad a cell with spaces, up to `width` terminal columns
fn pad(cell: &str, width: usize) -> String {
    let missing = width.saturating_sub(UnicodeWidthStr::width(cell));
    format!("{}{}", cell, " ".repeat(missing))
}

/// Lay out cells in aligned columns. Widths are measured in terminal columns, so that wide characters (CJK, emoji...) stay aligned
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(UnicodeWidthStr::width(cell.as_str()));
            }
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    for line in std::iter::once(&header_cells).chain(rows.iter()) {
        let padded: Vec<String> = line.iter()
            .zip(widths.iter())
            .map(|(cell, width)| pad(cell, *width))
            .collect();
        let _ = writeln!(out, "{}", padded.join("  ").trim_end());
    }
    out
}

/// Render the "new event" form
pub fn format_form(form: &EventFields) -> String {
    let mut out = String::from("Add New Event\n");
    let _ = writeln!(out, "  name:       [{}]", form.name);
    let _ = writeln!(out, "  date:       [{}]", form.date);
    let _ = writeln!(out, "  venue_id:   [{}]", form.venue_id);
    let _ = writeln!(out, "  is_starred: {}", checkbox(form.is_starred));
    let _ = writeln!(out, "  private:    {}", checkbox(form.is_private));
    let _ = writeln!(out, "  cancelled:  {}", checkbox(form.is_cancelled));
    out
}

/// Render a view as text
pub fn format_view(view: &View) -> String {
    match view {
        View::Loading => "Loading...\n".to_string(),
        View::Error => "Error loading events\n".to_string(),
        View::Table { rows, form } => {
            let cells: Vec<Vec<String>> = rows.iter().map(row_cells).collect();
            let mut out = String::from("Events\n");
            out.push_str(&format_table(&HEADERS, &cells));
            out.push('\n');
            out.push_str(&format_form(form));
            out
        },
    }
}

/// A debug utility that pretty-prints a view
pub fn print_view(view: &View) {
    print!("{}", format_view(view));
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::event::{EventId, EventRecord, VenueId};

    #[test]
    fn test_placeholders() {
        assert_eq!(format_view(&View::Loading), "Loading...\n");
        assert_eq!(format_view(&View::Error), "Error loading events\n");
    }

    #[test]
    fn test_table() {
        let gala = EventRecord::new(EventId::from(1), EventFields {
            name: "Gala".to_string(),
            date: "2024-05-01".to_string(),
            venue_id: VenueId::from(3),
            is_starred: true,
            ..EventFields::default()
        });
        let view = View::Table {
            rows: vec![
                RowView { key: EventId::from(1), editing: false, shown: gala.clone() },
                RowView { key: EventId::from(2), editing: true, shown: gala },
            ],
            form: EventFields::default(),
        };
        let text = format_view(&view);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Events");
        assert!(lines[1].starts_with("ID  Name    Date"));
        assert_eq!(lines[2], "1   Gala    2024-05-01    3         Yes      No       No         Edit Delete");
        assert_eq!(lines[3], "*2  [Gala]  [2024-05-01]  [3]       [x]      [ ]      [ ]        Save Delete");
        assert!(text.contains("Add New Event"));
    }

    #[test]
    fn test_wide_characters_stay_aligned() {
        let rows = vec![
            vec!["音楽祭".to_string(), "x".to_string()],
            vec!["Gala".to_string(), "x".to_string()],
            vec!["🎉 party".to_string(), "x".to_string()],
        ];
        let text = format_table(&["Name", "Col"], &rows);

        let columns: Vec<usize> = text.lines()
            .map(|line| {
                let last = line.rfind(|c: char| c != ' ').unwrap();
                let start = line[..last].rfind(' ').unwrap() + 1;
                UnicodeWidthStr::width(&line[..start])
            })
            .collect();
        assert_eq!(columns, vec![10, 10, 10, 10]);
        assert_eq!(text.lines().nth(1), Some("音楽祭    x"));
    }
}
