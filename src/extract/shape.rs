// src/extract/shape.rs

use ego_tree::NodeRef;
use scraper::Node;

use super::tree::is_element;

/// Number of `td`/`th` children directly under `node`. Zero for anything
/// that is not a row.
pub fn column_count(node: NodeRef<'_, Node>) -> usize {
    node.children()
        .filter(|c| is_element(*c, "td") || is_element(*c, "th"))
        .count()
}

/// Widest row owned by `table`. Rows of nested tables are not looked at.
pub fn table_column_count(table: NodeRef<'_, Node>) -> usize {
    let mut widest = 0;
    let mut stack: Vec<NodeRef<'_, Node>> = table.children().collect();
    while let Some(node) = stack.pop() {
        if is_element(node, "table") {
            continue;
        }
        if is_element(node, "tr") {
            widest = widest.max(column_count(node));
        }
        stack.extend(node.children());
    }
    widest
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(doc: &'a Html, css: &str) -> NodeRef<'a, Node> {
        let sel = Selector::parse(css).unwrap();
        let el = doc.select(&sel).next().unwrap();
        *el
    }

    #[test]
    fn counts_td_and_th_alike() {
        let doc = Html::parse_document(
            "<table><tr id=r><th>a</th><td>b</td><td>c</td></tr></table>",
        );
        assert_eq!(column_count(first(&doc, "#r")), 3);
    }

    #[test]
    fn non_row_nodes_count_zero() {
        let doc = Html::parse_document("<table id=t><tr><td>a</td></tr></table>");
        assert_eq!(column_count(first(&doc, "#t")), 0);
        assert_eq!(column_count(first(&doc, "body")), 0);
    }

    #[test]
    fn table_width_is_widest_row() {
        let doc = Html::parse_document(
            "<table id=t>\
               <tr><td colspan=3>head</td></tr>\
               <tr><td>1</td><td>2</td><td>3</td></tr>\
               <tr><td>1</td></tr>\
             </table>",
        );
        assert_eq!(table_column_count(first(&doc, "#t")), 3);
    }

    #[test]
    fn nested_tables_do_not_widen_outer() {
        let doc = Html::parse_document(
            "<table id=outer><tr><td>\
               <table><tr><td>1</td><td>2</td><td>3</td><td>4</td></tr></table>\
             </td></tr></table>",
        );
        assert_eq!(table_column_count(first(&doc, "#outer")), 1);
    }
}
