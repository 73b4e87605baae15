//! Client for the registry member API work endpoints
//!
//! Async methods take the XML payload directly; the blocking methods take a
//! [`WorkRecord`] and build the payload first.

use url::Url;

use crate::config::WorkConfig;
use crate::error::{ApiError, Result, WorkError};
use crate::http::{block_on, HttpClient, HttpError, HttpResponse, Payload};
use crate::identifiers::parse_orcid;
use crate::schema::API_VERSION;
use crate::work::WorkRecord;

/// Media type of registry XML payloads
pub const ORCID_XML: &str = "application/vnd.orcid+xml";

#[derive(Clone, Debug)]
pub struct OrcidApi {
    client: HttpClient,
    base: Url,
}

impl OrcidApi {
    pub fn new(client: HttpClient, base: Url) -> Self {
        Self { client, base }
    }

    pub fn from_config(config: &WorkConfig) -> Result<Self> {
        let base = config.orcid_api_url()?;
        let client = config.http_client().map_err(ApiError::from)?;
        Ok(Self::new(client, base))
    }

    /// `{base}/v2.0/{orcid}/{segments...}`
    pub fn url(&self, orcid: &str, segments: &[&str]) -> Result<Url> {
        let orcid = parse_orcid(orcid)?;
        let version = format!("v{}", API_VERSION);
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::from(HttpError::InvalidUrl {
                    url: self.base.to_string(),
                })
            })?
            .pop_if_empty()
            .push(&version)
            .push(&orcid)
            .extend(segments);
        Ok(url)
    }

    /// Add a work; returns its put-code
    pub async fn post_work(&self, orcid: &str, token: &str, xml: &str) -> Result<String> {
        let url = self.url(orcid, &["work"])?;
        let payload = Payload {
            content_type: ORCID_XML,
            body: xml,
        };
        let response = self
            .client
            .post(url.as_str(), ORCID_XML, Some(token), payload)
            .await
            .map_err(ApiError::from)?;
        let response = check(response)?;

        let put_code = response
            .header("location")
            .and_then(|location| location.trim_end_matches('/').rsplit('/').next())
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .ok_or(ApiError::MissingPutCode)?;
        tracing::info!(orcid, put_code = %put_code, "created work");
        Ok(put_code)
    }

    /// Replace the work stored under `put_code`
    pub async fn put_work(&self, orcid: &str, token: &str, put_code: &str, xml: &str) -> Result<()> {
        let url = self.url(orcid, &["work", put_code])?;
        let payload = Payload {
            content_type: ORCID_XML,
            body: xml,
        };
        let response = self
            .client
            .put(url.as_str(), ORCID_XML, Some(token), payload)
            .await
            .map_err(ApiError::from)?;
        check(response)?;
        tracing::info!(orcid, put_code, "updated work");
        Ok(())
    }

    pub async fn delete_work_async(&self, orcid: &str, token: &str, put_code: &str) -> Result<()> {
        let url = self.url(orcid, &["work", put_code])?;
        let response = self
            .client
            .delete(url.as_str(), ORCID_XML, Some(token))
            .await
            .map_err(ApiError::from)?;
        check(response)?;
        tracing::info!(orcid, put_code, "deleted work");
        Ok(())
    }

    /// Work summaries of a record, as registry XML
    pub async fn get_works_async(&self, orcid: &str, token: &str) -> Result<String> {
        let url = self.url(orcid, &["works"])?;
        let response = self
            .client
            .get(url.as_str(), ORCID_XML, Some(token))
            .await
            .map_err(ApiError::from)?;
        Ok(check(response)?.body)
    }

    pub fn create_work(&self, record: &WorkRecord) -> Result<String> {
        let xml = payload(record)?;
        run(self.post_work(record.orcid(), record.access_token(), &xml))
    }

    pub fn update_work(&self, record: &WorkRecord, put_code: &str) -> Result<()> {
        let xml = payload(record)?;
        run(self.put_work(record.orcid(), record.access_token(), put_code, &xml))
    }

    pub fn delete_work(&self, orcid: &str, token: &str, put_code: &str) -> Result<()> {
        run(self.delete_work_async(orcid, token, put_code))
    }

    pub fn get_works(&self, orcid: &str, token: &str) -> Result<String> {
        run(self.get_works_async(orcid, token))
    }
}

fn payload(record: &WorkRecord) -> Result<String> {
    record.data()?.ok_or_else(|| WorkError::IncompleteMetadata {
        doi: record.doi().to_string(),
    })
}

fn run<T>(future: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    block_on(future).map_err(ApiError::from)?
}

fn check(response: HttpResponse) -> std::result::Result<HttpResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    tracing::warn!(status = response.status, "registry rejected request");
    Err(ApiError::Rejected {
        status: response.status,
        body: response.body,
    })
}
