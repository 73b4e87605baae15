//! Bibliographic metadata as returned by the DOI resolver (CSL-JSON)
//!
//! Field names follow CSL-JSON. Registries are loose about cardinality, so
//! text fields accept either a single string or a list of strings.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Metadata for one DOI
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Metadata {
    #[serde(rename = "DOI", default)]
    pub doi: Option<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub title: Vec<String>,

    #[serde(rename = "container-title", default, deserialize_with = "one_or_many")]
    pub container_title: Vec<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub publisher: Vec<String>,

    /// Source type, e.g. `article-journal` or DataCite `Text`
    #[serde(rename = "type", default)]
    pub work_type: Option<String>,

    /// Free-text source subtype, e.g. DataCite `resourceType`
    #[serde(default)]
    pub subtype: Option<String>,

    /// Publication date in any of the shapes `DateResolver` understands
    #[serde(default)]
    pub published: Option<Value>,

    /// CSL name for the publication date
    #[serde(default)]
    pub issued: Option<Value>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub description: Vec<String>,

    #[serde(rename = "abstract", default, deserialize_with = "one_or_many")]
    pub abstract_text: Vec<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: Vec<RawAuthor>,
}

/// A contributor as it appears in the metadata
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawAuthor {
    #[serde(default)]
    pub given: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    /// Institutional or otherwise unsplit name
    #[serde(default)]
    pub literal: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "ORCID", alias = "orcid", default)]
    pub orcid: Option<String>,
}

impl RawAuthor {
    pub fn new(given: &str, family: &str) -> Self {
        Self {
            given: Some(given.to_string()),
            family: Some(family.to_string()),
            ..Default::default()
        }
    }

    pub fn literal(name: &str) -> Self {
        Self {
            literal: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn with_orcid(mut self, orcid: &str) -> Self {
        self.orcid = Some(orcid.to_string());
        self
    }
}

impl Metadata {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn title(&self) -> Option<&str> {
        first_text(&self.title)
    }

    /// Journal or container name, falling back to the publisher
    pub fn container_title(&self) -> Option<&str> {
        first_text(&self.container_title).or_else(|| first_text(&self.publisher))
    }

    pub fn description(&self) -> Option<&str> {
        first_text(&self.description).or_else(|| first_text(&self.abstract_text))
    }

    pub fn published(&self) -> Option<&Value> {
        self.published
            .as_ref()
            .filter(|v| !v.is_null())
            .or_else(|| self.issued.as_ref().filter(|v| !v.is_null()))
    }

    pub fn work_type(&self) -> Option<&str> {
        non_blank(self.work_type.as_deref())
    }

    pub fn subtype(&self) -> Option<&str> {
        non_blank(self.subtype.as_deref())
    }
}

fn first_text(values: &[String]) -> Option<&str> {
    values.iter().map(|v| v.trim()).find(|v| !v.is_empty())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<Option<String>>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values.into_iter().flatten().collect(),
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
