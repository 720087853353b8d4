//! Plain-text rendering of a table view.

use std::fmt::Write;

use colored::Colorize;

use rentdesk_core::{CheckState, Column, TableView};

fn checkbox(state: CheckState) -> &'static str {
    match state {
        CheckState::Unchecked => "[ ]",
        CheckState::Checked => "[x]",
        CheckState::Indeterminate => "[-]",
    }
}

/// Render the rows of `view` as an aligned text table with a status line.
pub fn table(view: &TableView) -> String {
    let selection = view.capabilities.selection;
    let header: Vec<String> = Column::ALL
        .iter()
        .map(|column| {
            let mut title = column.header().to_string();
            if let Some(sort) = view.sort.filter(|s| s.column == *column) {
                title.push_str(match sort.direction {
                    rentdesk_core::table::SortDirection::Ascending => " ^",
                    rentdesk_core::table::SortDirection::Descending => " v",
                });
            }
            title
        })
        .collect();

    let body: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| {
            Column::ALL
                .iter()
                .map(|column| {
                    let text = column.text(&row.record);
                    match column {
                        Column::Id if row.depth > 0 => {
                            format!("{}└ {}", "  ".repeat(row.depth - 1), text)
                        }
                        _ => text,
                    }
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..Column::ALL.len())
        .map(|i| {
            body.iter()
                .map(|cells| cells[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    let header_line = line(&header);
    if selection {
        let _ = writeln!(out, "{} {}", checkbox(view.header_check), header_line.bold());
    } else {
        let _ = writeln!(out, "{}", header_line.bold());
    }

    for (row, cells) in view.rows.iter().zip(&body) {
        if selection {
            let _ = writeln!(out, "{} {}", checkbox(row.check), line(cells));
        } else {
            let _ = writeln!(out, "{}", line(cells));
        }
    }

    if view.rows.is_empty() {
        let _ = writeln!(out, "{}", "No products.".dimmed());
    }

    let _ = write!(out, "{}", status(view));
    out
}

/// One-line summary below the table.
pub fn status(view: &TableView) -> String {
    let mut parts = vec![view.page_label()];
    if let Some(total) = view.total_count {
        parts.push(format!("{} products", total));
    }
    parts.push(format!("{} per page", view.page_size));
    if view.capabilities.selection {
        parts.push(format!("{} selected", view.selected_count));
    }
    if !view.global_filter.is_empty() {
        parts.push(format!("filter \"{}\"", view.global_filter));
    }
    if let Some(sort) = view.sort {
        parts.push(format!("sort {}", sort));
    }
    if view.loading {
        parts.push("loading...".to_string());
    }

    let mut line = parts.join(" | ");
    if let Some(error) = &view.error {
        line.push('\n');
        line.push_str(&format!("{} {}", "✗".red(), error));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentdesk_core::table::RowView;
    use rentdesk_core::{Capabilities, Record};

    fn view() -> TableView {
        let mut parent = Record::new(1, "Bike set").with_price(20.0);
        parent.sub_rows.push(Record::new(2, "Bike"));
        let rows = vec![
            RowView {
                record: parent.clone(),
                check: CheckState::Indeterminate,
                depth: 0,
                rank: None,
            },
            RowView {
                record: parent.sub_rows[0].clone(),
                check: CheckState::Checked,
                depth: 1,
                rank: None,
            },
        ];
        TableView {
            rows,
            page_count: Some(4),
            total_count: Some(35),
            selected_count: 1,
            capabilities: Capabilities::all(),
            ..TableView::default()
        }
    }

    #[test]
    fn renders_checkboxes_and_nesting() {
        colored::control::set_override(false);
        let text = table(&view());
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("[ ] Id"));
        assert!(lines[1].starts_with("[-] 1"));
        assert!(lines[1].contains("Bike set"));
        assert!(lines[2].starts_with("[x] └ 2"));
        assert_eq!(
            lines[3],
            "Page 1 of 4 | 35 products | 10 per page | 1 selected"
        );
    }

    #[test]
    fn without_selection_there_are_no_checkboxes() {
        colored::control::set_override(false);
        let mut view = view();
        view.capabilities = Capabilities::none();
        let text = table(&view);
        assert!(text.lines().next().unwrap().starts_with("Id"));
        assert!(!text.contains("selected"));
    }
}
