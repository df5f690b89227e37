// src/extract/walker.rs

use ego_tree::{iter::Edge, NodeRef};
use scraper::Node;
use tracing::debug;

use super::rows::process_row;
use super::shape::{column_count, table_column_count};
use super::tree::{attr, is_element, text_of};
use super::ClassEntry;

/// State of one walk over one document. Built fresh for every extraction.
#[derive(Debug, Default)]
pub struct Walk<'m> {
    title_class: &'m str,
    tables: usize,
    columns: usize,
    pub title: String,
    pub entries: Vec<ClassEntry>,
}

impl<'m> Walk<'m> {
    pub fn new(title_class: &'m str) -> Self {
        Self {
            title_class,
            ..Self::default()
        }
    }

    /// Pre-order, depth-first, left-to-right over everything under `root`.
    pub fn run(&mut self, root: NodeRef<'_, Node>) {
        for edge in root.traverse() {
            if let Edge::Open(node) = edge {
                self.visit(node);
            }
        }
        debug!(
            tables = self.tables,
            columns = self.columns,
            entries = self.entries.len(),
            "walk finished"
        );
    }

    fn visit(&mut self, node: NodeRef<'_, Node>) {
        let is_table = is_element(node, "table");
        if is_table {
            self.tables += 1;
        }
        if is_element(node, "div") && attr(node, "class") == self.title_class {
            self.title = node.first_child().map(text_of).unwrap_or_default();
        }

        // the first table is the page header, never data
        if self.tables <= 1 {
            return;
        }
        if is_table {
            self.columns = self.columns.max(table_column_count(node));
        }
        self.columns = self.columns.max(column_count(node));
        if is_element(node, "tr") {
            process_row(node, self.columns, &mut self.entries);
        }
    }
}
