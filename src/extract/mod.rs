// src/extract/mod.rs

//! Table-to-record extraction for substitution plan pages.
//!
//! A plan page holds a leading header table followed by one or more data
//! tables. Inside the data tables a cell spanning the full table width names
//! a class; the cells of the rows below it fill that class's period slots
//! left to right.

use scraper::Html;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod rows;
pub mod shape;
pub mod tree;
pub mod walker;

use walker::Walk;

/// `class` of the `div` holding the plan date.
pub const DEFAULT_TITLE_CLASS: &str = "mon_title";

/// One class and the text found in each of its period slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub name: String,
    pub periods: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub title: String,
    pub entries: Vec<ClassEntry>,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document is not valid UTF-8: {0}")]
    Parse(#[from] std::str::Utf8Error),
}

#[derive(Debug, Clone)]
pub struct Extractor {
    title_class: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE_CLASS)
    }
}

impl Extractor {
    pub fn new(title_class: impl Into<String>) -> Self {
        Self {
            title_class: title_class.into(),
        }
    }

    /// Parse leniently and extract. Broken markup is recovered the way a
    /// browser would, so this cannot fail.
    pub fn extract(&self, html: &str) -> Extraction {
        let doc = Html::parse_document(html);
        if !doc.errors.is_empty() {
            debug!(errors = doc.errors.len(), "recovered from markup errors");
        }
        self.extract_document(&doc)
    }

    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<Extraction, ExtractError> {
        let html = std::str::from_utf8(bytes)?;
        Ok(self.extract(html))
    }

    pub fn extract_document(&self, doc: &Html) -> Extraction {
        let mut walk = Walk::new(&self.title_class);
        walk.run(doc.tree.root());
        Extraction {
            title: walk.title,
            entries: walk.entries,
        }
    }
}

pub fn extract(html: &str) -> Extraction {
    Extractor::default().extract(html)
}

pub fn extract_bytes(bytes: &[u8]) -> Result<Extraction, ExtractError> {
    Extractor::default().extract_bytes(bytes)
}

pub fn extract_document(doc: &Html) -> Extraction {
    Extractor::default().extract_document(doc)
}
