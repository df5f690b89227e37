pub mod config;
pub mod extract;
pub mod fetch;
pub mod output;
pub mod poll;
pub mod records;

#[cfg(test)]
mod testutil;

pub use extract::{extract, extract_bytes, extract_document, ClassEntry, Extraction, Extractor};
