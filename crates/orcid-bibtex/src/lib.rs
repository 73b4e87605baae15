//! BibTeX entries for work citations
//!
//! A small BibTeX model and formatter. The registry accepts a citation as a
//! BibTeX string, so this crate only has to produce entries, never read them.
//!
//! Features:
//! - The `@data` entry type the registry citations use
//! - Brace-delimited values, bare numeric values
//! - Escaping of unbalanced braces so every entry stays parseable

mod entry;
mod formatter;

pub use entry::{BibTeXEntry, BibTeXEntryType, BibTeXField};
pub use formatter::{escape_value, format_entry};
