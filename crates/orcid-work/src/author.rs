//! Contributor names and identifiers

use crate::identifiers::{orcid_path, orcid_uri};
use crate::metadata::RawAuthor;

/// A contributor as written into a work record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contributor {
    /// ORCID URI, when the metadata carries one
    pub orcid: Option<String>,
    /// Best available display name; may be empty
    pub credit_name: String,
    /// Contributor role (`author`, `editor`, ...). Not derived from metadata.
    pub role: Option<String>,
}

impl Contributor {
    pub fn new(credit_name: impl Into<String>) -> Self {
        Self {
            orcid: None,
            credit_name: credit_name.into(),
            role: None,
        }
    }

    pub fn with_orcid(mut self, orcid: &str) -> Self {
        self.orcid = Some(orcid_uri(orcid));
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// The bare iD of the contributor's ORCID URI
    pub fn orcid_path(&self) -> Option<&str> {
        self.orcid.as_deref().map(orcid_path)
    }
}

/// Derives display names and contributor records from raw authors.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameResolver;

impl NameResolver {
    pub fn new() -> Self {
        Self
    }

    /// Display name: the literal name, else "Given Family", else whichever
    /// fragment is present. Empty when the author has no name at all.
    pub fn credit_name(&self, author: &RawAuthor) -> String {
        if let Some(literal) = text(&author.literal) {
            return literal.to_string();
        }
        match (text(&author.given), text(&author.family)) {
            (Some(given), Some(family)) => format!("{} {}", given, family),
            (None, Some(family)) => family.to_string(),
            (Some(given), None) => given.to_string(),
            (None, None) => text(&author.name).unwrap_or_default().to_string(),
        }
    }

    /// Citation form: "Family, Given", with the same fallbacks as the credit name
    pub fn full_name(&self, author: &RawAuthor) -> String {
        if text(&author.literal).is_none() {
            if let (Some(given), Some(family)) = (text(&author.given), text(&author.family)) {
                return format!("{}, {}", family, given);
            }
        }
        self.credit_name(author)
    }

    pub fn contributor(&self, author: &RawAuthor) -> Contributor {
        let contributor = Contributor::new(self.credit_name(author));
        match text(&author.orcid) {
            Some(orcid) => contributor.with_orcid(orcid),
            None => contributor,
        }
    }

    pub fn contributors(&self, authors: &[RawAuthor]) -> Vec<Contributor> {
        authors.iter().map(|a| self.contributor(a)).collect()
    }

    /// BibTeX author list: full names joined with " and "
    pub fn author_string(&self, authors: &[RawAuthor]) -> String {
        authors
            .iter()
            .map(|a| self.full_name(a))
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(" and ")
    }
}

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
