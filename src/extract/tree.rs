// src/extract/tree.rs

use ego_tree::NodeRef;
use scraper::Node;

/// Concatenated text of every text node under `node`, depth-first.
/// Only the final string is trimmed; inner whitespace is kept as-is.
pub fn text_of(node: NodeRef<'_, Node>) -> String {
    let mut out = String::new();
    for n in node.descendants() {
        if let Node::Text(text) = n.value() {
            out.push_str(text);
        }
    }
    out.trim().to_string()
}

/// Value of the first attribute named `key`, or `""`.
pub fn attr<'a>(node: NodeRef<'a, Node>, key: &str) -> &'a str {
    match node.value() {
        Node::Element(el) => el
            .attrs()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
            .unwrap_or(""),
        _ => "",
    }
}

pub fn is_element(node: NodeRef<'_, Node>, tag: &str) -> bool {
    matches!(node.value(), Node::Element(el) if el.name() == tag)
}

pub fn is_text(node: NodeRef<'_, Node>) -> bool {
    node.value().is_text()
}
