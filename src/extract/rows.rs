// src/extract/rows.rs

use ego_tree::NodeRef;
use scraper::Node;
use tracing::trace;

use super::tree::{attr, is_element, text_of};
use super::ClassEntry;

/// Classify the `td` cells of one row against the running column count.
///
/// A cell whose `colspan` reads exactly `column_count` opens a new entry;
/// every other cell is written to the last entry at the row cursor. The
/// comparison is on the attribute text, so `colspan="08"` is not a header
/// for a width of 8.
pub fn process_row(row: NodeRef<'_, Node>, column_count: usize, entries: &mut Vec<ClassEntry>) {
    let header_span = column_count.to_string();
    let mut cursor = 0usize;

    for cell in row.children().filter(|c| is_element(*c, "td")) {
        if attr(cell, "colspan") == header_span {
            open_entry(cell, column_count, entries);
        } else if push_value(cell, cursor, entries) {
            cursor += 1;
        }
    }
}

fn open_entry(cell: NodeRef<'_, Node>, column_count: usize, entries: &mut Vec<ClassEntry>) {
    let name = cell.first_child().map(text_of).unwrap_or_default();
    trace!(%name, column_count, "new class entry");
    entries.push(ClassEntry {
        name,
        periods: vec![Vec::new(); column_count],
    });
}

/// Returns false when there is no entry to attach the cell to.
fn push_value(cell: NodeRef<'_, Node>, slot: usize, entries: &mut [ClassEntry]) -> bool {
    let Some(entry) = entries.last_mut() else {
        return false;
    };
    if entry.periods.len() <= slot {
        entry.periods.resize_with(slot + 1, Vec::new);
    }
    entry.periods[slot].push(text_of(cell));
    true
}
