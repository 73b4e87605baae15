//! BibTeX entry data structures

/// BibTeX entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BibTeXEntryType {
    /// `@data`, used for registry citations keyed by resolver URL
    Data,
}

impl BibTeXEntryType {
    /// Canonical lowercase name as written after `@`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "data",
        }
    }
}

/// A single BibTeX field (key-value pair)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXField {
    pub key: String,
    pub value: String,
}

/// A BibTeX entry; fields keep insertion order when formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXEntry {
    pub cite_key: String,
    pub entry_type: BibTeXEntryType,
    pub fields: Vec<BibTeXField>,
}

impl BibTeXEntry {
    pub fn new(cite_key: impl Into<String>, entry_type: BibTeXEntryType) -> Self {
        Self {
            cite_key: cite_key.into(),
            entry_type,
            fields: Vec::new(),
        }
    }

    /// Add a field, replacing an existing one with the same key (case-insensitive)
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self
            .fields
            .iter_mut()
            .find(|f| f.key.eq_ignore_ascii_case(&key))
        {
            Some(existing) => existing.value = value,
            None => self.fields.push(BibTeXField { key, value }),
        }
    }

    /// Builder form of [`add_field`](Self::add_field)
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_field(key, value);
        self
    }
}
