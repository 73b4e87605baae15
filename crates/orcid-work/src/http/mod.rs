//! HTTP client abstraction for the metadata registry and the write API

pub mod native;

pub use native::*;

use std::collections::HashMap;
use std::future::Future;
use std::sync::OnceLock;

use thiserror::Error;
use tokio::runtime::Runtime;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {message}")]
    RequestFailed { message: String },
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },
    #[error("Timeout")]
    Timeout,
    #[error("Rate limited")]
    RateLimited,
    #[error("Parse error: {message}")]
    ParseError { message: String },
    #[error("Runtime unavailable: {message}")]
    Runtime { message: String },
}

#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    /// Header names are lowercase
    pub headers: HashMap<String, String>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Header value, name matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Shared runtime behind the blocking API
fn runtime() -> Result<&'static Runtime, HttpError> {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| HttpError::Runtime {
            message: e.to_string(),
        })?;
    Ok(RUNTIME.get_or_init(|| runtime))
}

/// Drive a request future to completion from synchronous code.
///
/// Must not be called from inside an async context; use the `_async`
/// variants there.
pub fn block_on<F: Future>(future: F) -> Result<F::Output, HttpError> {
    Ok(runtime()?.block_on(future))
}
