//! orcid-work: ORCID work records from DOI metadata
//!
//! Given a DOI and an ORCID iD this crate fetches the DOI's citation
//! metadata, derives the fields of a registry work record (contributors,
//! publication date, work type and a BibTeX citation), renders the record as
//! version 2.0 XML, validates it against the bundled schema and can submit it
//! through the member API.
//!
//! # Example
//!
//! ```rust,ignore
//! use orcid_work::{WorkConfig, WorkRecord};
//!
//! let config = WorkConfig::load(None)?;
//! let work = WorkRecord::from_config("10.5061/dryad.8515", "0000-0002-1825-0097", token, &config)?;
//! if let Some(xml) = work.data()? {
//!     assert!(work.validation_errors()?.is_empty());
//!     println!("{}", xml);
//! }
//! ```

pub mod api;
pub mod author;
pub mod citation;
pub mod config;
pub mod date;
pub mod error;
pub mod http;
pub mod identifiers;
pub mod lookup;
pub mod metadata;
pub mod schema;
pub mod work;
pub mod work_type;
pub mod xml;

pub use api::OrcidApi;
pub use author::{Contributor, NameResolver};
pub use config::{load_environment, WorkConfig};
pub use date::{DateResolver, PublicationDate};
pub use error::{ApiError, ConfigError, LookupError, Result, SchemaError, WorkError};
pub use lookup::{DoiLookup, MetadataLookup};
pub use metadata::{Metadata, RawAuthor};
pub use schema::{WorkSchema, API_VERSION};
pub use work::WorkRecord;
pub use work_type::{WorkType, WorkTypeMapper, WORK_TYPE_TABLE};
