//! Native HTTP client using reqwest

use super::{HttpError, HttpResponse};
use reqwest::{Client, Method, RequestBuilder};
use std::time::Duration;

/// Thin async client shared by the metadata lookup and the write API.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

/// Body and content type of a write request
#[derive(Clone, Copy, Debug)]
pub struct Payload<'a> {
    pub content_type: &'a str,
    pub body: &'a str,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::RequestFailed {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }

    /// GET with content negotiation
    pub async fn get(
        &self,
        url: &str,
        accept: &str,
        bearer: Option<&str>,
    ) -> Result<HttpResponse, HttpError> {
        self.send(Method::GET, url, accept, bearer, None).await
    }

    pub async fn post(
        &self,
        url: &str,
        accept: &str,
        bearer: Option<&str>,
        payload: Payload<'_>,
    ) -> Result<HttpResponse, HttpError> {
        self.send(Method::POST, url, accept, bearer, Some(payload))
            .await
    }

    pub async fn put(
        &self,
        url: &str,
        accept: &str,
        bearer: Option<&str>,
        payload: Payload<'_>,
    ) -> Result<HttpResponse, HttpError> {
        self.send(Method::PUT, url, accept, bearer, Some(payload))
            .await
    }

    pub async fn delete(
        &self,
        url: &str,
        accept: &str,
        bearer: Option<&str>,
    ) -> Result<HttpResponse, HttpError> {
        self.send(Method::DELETE, url, accept, bearer, None).await
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        accept: &str,
        bearer: Option<&str>,
        payload: Option<Payload<'_>>,
    ) -> Result<HttpResponse, HttpError> {
        let url = reqwest::Url::parse(url).map_err(|_| HttpError::InvalidUrl {
            url: url.to_string(),
        })?;

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(payload) = payload {
            request = request
                .header("Content-Type", payload.content_type)
                .body(payload.body.to_string());
        }

        tracing::debug!(method = %method, url = %url, "sending request");
        let response = execute(request).await?;
        tracing::debug!(method = %method, url = %url, status = response.status, "received response");
        Ok(response)
    }
}

async fn execute(request: RequestBuilder) -> Result<HttpResponse, HttpError> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::RequestFailed {
                message: e.to_string(),
            }
        }
    })?;

    let status = response.status().as_u16();

    if status == 429 {
        return Err(HttpError::RateLimited);
    }

    let headers = response
        .headers()
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
        .collect();

    let body = response.text().await.map_err(|e| HttpError::ParseError {
        message: e.to_string(),
    })?;

    Ok(HttpResponse {
        status,
        body,
        headers,
    })
}

impl Default for HttpClient {
    fn default() -> Self {
        Self {
            client: Client::new(),
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
        }
    }
}
