//! Metadata lookup through DOI content negotiation

use url::Url;

use crate::config::WorkConfig;
use crate::error::LookupError;
use crate::http::{block_on, HttpClient, HttpError};
use crate::identifiers::normalize_doi;
use crate::metadata::Metadata;

/// Media type requested from the resolver
pub const CSL_JSON: &str = "application/vnd.citationstyles.csl+json";

/// Source of metadata for a DOI
pub trait MetadataLookup: Send + Sync {
    fn fetch(&self, doi: &str) -> Result<Metadata, LookupError>;
}

/// Resolves metadata with `GET {base}/{doi}` and CSL-JSON content negotiation.
#[derive(Clone, Debug)]
pub struct DoiLookup {
    client: HttpClient,
    base: Url,
}

impl DoiLookup {
    pub fn new(client: HttpClient, base: Url) -> Self {
        Self { client, base }
    }

    pub fn from_config(config: &WorkConfig) -> crate::Result<Self> {
        let base = config.metadata_url()?;
        let client = config.http_client().map_err(LookupError::from)?;
        Ok(Self::new(client, base))
    }

    /// Resolver URL for a DOI; each DOI path segment is percent-encoded.
    pub fn url_for(&self, doi: &str) -> Result<Url, LookupError> {
        let doi = normalize_doi(doi);
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| HttpError::InvalidUrl {
                url: self.base.to_string(),
            })?
            .pop_if_empty()
            .extend(doi.split('/'));
        Ok(url)
    }

    pub async fn fetch_async(&self, doi: &str) -> Result<Metadata, LookupError> {
        let url = self.url_for(doi)?;
        tracing::debug!(doi, url = %url, "fetching metadata");

        let response = self.client.get(url.as_str(), CSL_JSON, None).await?;
        match response.status {
            404 => {
                return Err(LookupError::NotFound {
                    doi: doi.to_string(),
                })
            }
            status if !response.is_success() => {
                tracing::warn!(doi, status, "metadata lookup failed");
                return Err(LookupError::Status {
                    doi: doi.to_string(),
                    status,
                });
            }
            _ => {}
        }

        Metadata::from_json(&response.body).map_err(|e| LookupError::Malformed {
            doi: doi.to_string(),
            message: e.to_string(),
        })
    }
}

impl MetadataLookup for DoiLookup {
    fn fetch(&self, doi: &str) -> Result<Metadata, LookupError> {
        block_on(self.fetch_async(doi))?
    }
}
