//! Single-line BibTeX citations for work records

use lazy_static::lazy_static;
use orcid_bibtex::{format_entry, BibTeXEntry, BibTeXEntryType};
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Resolver prefix used for citation keys and URLs
pub const DOI_RESOLVER: &str = "https://doi.org/";

/// Values that go into a citation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CitationFields<'a> {
    /// Authors already joined with " and "
    pub author: &'a str,
    pub title: &'a str,
    /// Container title, cited as the publisher
    pub publisher: &'a str,
    pub doi: &'a str,
    pub year: i32,
}

/// `@data` entry keyed by the DOI URL
pub fn bibtex_entry(fields: &CitationFields<'_>) -> BibTeXEntry {
    let url = format!("{}{}", DOI_RESOLVER, fields.doi);
    BibTeXEntry::new(url.clone(), BibTeXEntryType::Data)
        .with_field("author", fields.author)
        .with_field("title", fields.title)
        .with_field("publisher", fields.publisher)
        .with_field("doi", fields.doi)
        .with_field("url", url)
        .with_field("year", fields.year.to_string())
}

/// The formatted entry on one line
pub fn format_citation(fields: &CitationFields<'_>) -> String {
    single_line(&format_entry(&bibtex_entry(fields)))
}

/// Drop line breaks outright, then squeeze every remaining whitespace run
/// to one space
pub fn single_line(text: &str) -> String {
    let joined = text.replace('\n', "");
    WHITESPACE_RUN.replace_all(&joined, " ").into_owned()
}
