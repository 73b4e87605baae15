//! The work record: metadata for one DOI, rendered for one ORCID iD

use std::cell::OnceCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::author::{Contributor, NameResolver};
use crate::citation::{format_citation, CitationFields};
use crate::config::{default_schema_dir, WorkConfig};
use crate::date::{DateResolver, PublicationDate};
use crate::error::Result;
use crate::identifiers::parse_doi;
use crate::lookup::{DoiLookup, MetadataLookup};
use crate::metadata::Metadata;
use crate::schema::WorkSchema;
use crate::work_type::{WorkType, WorkTypeMapper};
use crate::xml::WorkDocument;

/// A work to be added to an ORCID record.
///
/// Metadata is fetched on first use and kept for the lifetime of the
/// record, as are the parsed schema and the validation result.
pub struct WorkRecord {
    doi: String,
    orcid: String,
    access_token: String,
    lookup: Arc<dyn MetadataLookup>,
    names: NameResolver,
    dates: DateResolver,
    types: WorkTypeMapper,
    schema_dir: PathBuf,
    metadata: OnceCell<Metadata>,
    schema: OnceCell<WorkSchema>,
    validation_errors: OnceCell<Vec<String>>,
}

impl WorkRecord {
    /// The DOI is normalized and must look like a DOI.
    pub fn new(
        doi: &str,
        orcid: impl Into<String>,
        access_token: impl Into<String>,
        lookup: Arc<dyn MetadataLookup>,
    ) -> Result<Self> {
        Ok(Self {
            doi: parse_doi(doi)?,
            orcid: orcid.into(),
            access_token: access_token.into(),
            lookup,
            names: NameResolver::new(),
            dates: DateResolver::new(),
            types: WorkTypeMapper::new(),
            schema_dir: default_schema_dir(),
            metadata: OnceCell::new(),
            schema: OnceCell::new(),
            validation_errors: OnceCell::new(),
        })
    }

    /// Record backed by the DOI resolver and schema directory in `config`
    pub fn from_config(
        doi: &str,
        orcid: impl Into<String>,
        access_token: impl Into<String>,
        config: &WorkConfig,
    ) -> Result<Self> {
        let lookup = Arc::new(DoiLookup::from_config(config)?);
        Ok(Self::new(doi, orcid, access_token, lookup)?.with_schema_dir(&config.schema_dir))
    }

    pub fn with_schema_dir(mut self, schema_dir: &Path) -> Self {
        self.schema_dir = schema_dir.to_path_buf();
        self
    }

    pub fn with_work_type_mapper(mut self, mapper: WorkTypeMapper) -> Self {
        self.types = mapper;
        self
    }

    /// Use already known metadata instead of fetching it
    pub fn with_metadata(self, metadata: Metadata) -> Self {
        let _ = self.metadata.set(metadata);
        self
    }

    pub fn doi(&self) -> &str {
        &self.doi
    }

    pub fn orcid(&self) -> &str {
        &self.orcid
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Metadata for the DOI, fetched at most once
    pub fn metadata(&self) -> Result<&Metadata> {
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata);
        }
        let fetched = self.lookup.fetch(&self.doi)?;
        tracing::info!(doi = %self.doi, "fetched metadata");
        Ok(self.metadata.get_or_init(|| fetched))
    }

    pub fn contributors(&self) -> Result<Vec<Contributor>> {
        Ok(self.names.contributors(&self.metadata()?.author))
    }

    pub fn author_string(&self) -> Result<String> {
        Ok(self.names.author_string(&self.metadata()?.author))
    }

    pub fn title(&self) -> Result<Option<&str>> {
        Ok(self.metadata()?.title())
    }

    pub fn container_title(&self) -> Result<Option<&str>> {
        Ok(self.metadata()?.container_title())
    }

    pub fn description(&self) -> Result<Option<&str>> {
        Ok(self.metadata()?.description())
    }

    pub fn publication_date(&self) -> Result<PublicationDate> {
        Ok(self.dates.resolve(self.metadata()?.published()))
    }

    pub fn work_type(&self) -> Result<WorkType> {
        let metadata = self.metadata()?;
        self.types.map(metadata.work_type(), metadata.subtype())
    }

    /// DOI, at least one contributor, title, container title and a
    /// publication year are all present.
    pub fn has_required_elements(&self) -> Result<bool> {
        let metadata = self.metadata()?;
        Ok(!self.doi.is_empty()
            && !metadata.author.is_empty()
            && metadata.title().is_some()
            && metadata.container_title().is_some()
            && self.publication_date()?.is_present())
    }

    /// BibTeX citation on a single line; `None` without the required elements
    pub fn citation(&self) -> Result<Option<String>> {
        if !self.has_required_elements()? {
            return Ok(None);
        }
        let metadata = self.metadata()?;
        let (Some(title), Some(publisher), Some(year)) = (
            metadata.title(),
            metadata.container_title(),
            self.publication_date()?.year,
        ) else {
            return Ok(None);
        };
        let author = self.author_string()?;
        Ok(Some(format_citation(&CitationFields {
            author: &author,
            title,
            publisher,
            doi: &self.doi,
            year,
        })))
    }

    /// The work as registry XML; `None` without the required elements
    pub fn data(&self) -> Result<Option<String>> {
        if !self.has_required_elements()? {
            return Ok(None);
        }
        let metadata = self.metadata()?;
        let Some(title) = metadata.title() else {
            return Ok(None);
        };
        let citation = self.citation()?;
        let contributors = self.contributors()?;

        let document = WorkDocument {
            title,
            journal_title: metadata.container_title(),
            short_description: metadata.description(),
            citation: citation.as_deref(),
            work_type: self.work_type()?,
            publication_date: self.publication_date()?,
            doi: &self.doi,
            contributors: &contributors,
        };
        document.to_xml().map(Some)
    }

    /// The work schema, loaded at most once
    pub fn schema(&self) -> Result<&WorkSchema> {
        if let Some(schema) = self.schema.get() {
            return Ok(schema);
        }
        let schema = WorkSchema::load(&self.schema_dir)?;
        Ok(self.schema.get_or_init(|| schema))
    }

    /// Schema validation errors for [`data`](Self::data); empty when valid.
    ///
    /// Without data the empty document is validated, which yields a single
    /// "Document is empty" error.
    pub fn validation_errors(&self) -> Result<&[String]> {
        if let Some(errors) = self.validation_errors.get() {
            return Ok(errors);
        }
        let schema = self.schema()?;
        let data = self.data()?.unwrap_or_default();
        let errors = schema.validate(&data);
        if errors.is_empty() {
            tracing::debug!(doi = %self.doi, "work validates");
        } else {
            tracing::warn!(doi = %self.doi, errors = errors.len(), "work fails validation");
        }
        Ok(self.validation_errors.get_or_init(|| errors))
    }
}

impl fmt::Debug for WorkRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkRecord")
            .field("doi", &self.doi)
            .field("orcid", &self.orcid)
            .field("schema_dir", &self.schema_dir)
            .field("metadata", &self.metadata.get())
            .finish_non_exhaustive()
    }
}
