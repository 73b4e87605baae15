//! DOI and ORCID iD normalization and validation

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, WorkError};

lazy_static! {
    // DOI validation regex
    static ref DOI_PATTERN: Regex = Regex::new(r"^10\.\d{4,}/\S+$").unwrap();

    // Four groups of four, last character may be the X check digit
    static ref ORCID_PATTERN: Regex = Regex::new(r"^\d{4}-\d{4}-\d{4}-\d{3}[\dX]$").unwrap();
}

/// Registry host written into contributor records
pub const ORCID_HOST: &str = "orcid.org";

const DOI_PREFIXES: [&str; 6] = [
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi:",
    "DOI:",
];

const ORCID_PREFIXES: [&str; 4] = [
    "https://orcid.org/",
    "http://orcid.org/",
    "https://sandbox.orcid.org/",
    "http://sandbox.orcid.org/",
];

/// Strip resolver prefixes and trailing punctuation from a DOI
pub fn normalize_doi(doi: &str) -> String {
    let mut result = doi.trim();

    for prefix in DOI_PREFIXES {
        if let Some(stripped) = result.strip_prefix(prefix) {
            result = stripped;
            break;
        }
    }

    result.trim_end_matches(&['.', ',', ';'][..]).to_string()
}

pub fn is_valid_doi(doi: &str) -> bool {
    DOI_PATTERN.is_match(doi)
}

/// Normalize and validate a DOI in one step
pub fn parse_doi(doi: &str) -> Result<String> {
    let normalized = normalize_doi(doi);
    if is_valid_doi(&normalized) {
        Ok(normalized)
    } else {
        Err(WorkError::InvalidDoi(doi.to_string()))
    }
}

/// The iD part of an ORCID URI; other input is returned trimmed.
///
/// `https://orcid.org/0000-0001-2345-6789` gives `0000-0001-2345-6789`.
pub fn orcid_path(orcid: &str) -> &str {
    let orcid = orcid.trim();
    ORCID_PREFIXES
        .iter()
        .find_map(|prefix| orcid.strip_prefix(prefix))
        .unwrap_or(orcid)
}

/// A contributor URI: URIs are kept as given, bare iDs are expanded.
pub fn orcid_uri(orcid: &str) -> String {
    let orcid = orcid.trim();
    if orcid.starts_with("http://") || orcid.starts_with("https://") {
        orcid.to_string()
    } else {
        format!("https://{}/{}", ORCID_HOST, orcid)
    }
}

/// Shape and ISO 7064 MOD 11-2 check digit
pub fn is_valid_orcid(orcid: &str) -> bool {
    if !ORCID_PATTERN.is_match(orcid) {
        return false;
    }

    let digits: Vec<char> = orcid.chars().filter(|c| *c != '-').collect();
    let (body, check) = digits.split_at(15);

    let total = body.iter().fold(0u32, |total, c| {
        let digit = c.to_digit(10).unwrap_or(0);
        (total + digit) * 2
    });
    let remainder = total % 11;
    let expected = (12 - remainder) % 11;
    let expected = if expected == 10 {
        'X'
    } else {
        char::from_digit(expected, 10).unwrap_or('?')
    };

    check[0] == expected
}

/// Bare iD from a bare or URI-form ORCID, validated
pub fn parse_orcid(orcid: &str) -> Result<String> {
    let path = orcid_path(orcid).to_ascii_uppercase();
    if is_valid_orcid(&path) {
        Ok(path)
    } else {
        Err(WorkError::InvalidOrcid(orcid.to_string()))
    }
}
