//! HTTP transport for the Anura API.
//!
//! The [`Transport`] trait is the seam between the client and the network:
//! [`HttpTransport`] implements it over reqwest, and tests substitute their
//! own implementations.

use std::io;
use std::pin::Pin;
use std::time::{Duration, Instant};

use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response};
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS, CLIENT_STATUS_ERRORS,
};

/// A response body delivered incrementally.
pub type ByteStream = Pin<Box<dyn Stream<Item = std::result::Result<Bytes, io::Error>> + Send>>;

/// The open body of a successful completion request.
///
/// Dropping the value releases the underlying connection.
pub struct CompletionBody {
    status: u16,
    body: ByteStream,
}

impl CompletionBody {
    /// Wraps a status code and body stream.
    pub fn new(status: u16, body: ByteStream) -> Self {
        Self { status, body }
    }

    /// The HTTP status code of the response.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Takes the body stream.
    pub fn into_stream(self) -> ByteStream {
        self.body
    }
}

impl std::fmt::Debug for CompletionBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionBody")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Authenticated HTTP calls used by the client.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// POST `payload` as JSON and return the streaming body.
    ///
    /// A non-success status is returned as [`Error::HttpStatus`].
    async fn post_completion(
        &self,
        url: &Url,
        payload: Bytes,
        api_key: &str,
    ) -> Result<CompletionBody>;

    /// GET `url` and return the whole body.
    async fn get_models(&self, url: &Url, api_key: &str) -> Result<Bytes>;
}

/// [`Transport`] implementation backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport bounded by `timeout`.
    ///
    /// Connecting is bounded for every request. Model listings are bounded
    /// end to end, but a completion body may keep streaming past `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = ReqwestClient::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {e}"),
                    Some(Box::new(e)),
                )
            })?;
        Ok(Self { client, timeout })
    }

    fn headers(api_key: &str, accept: &'static str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static(accept));
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| Error::config("API key contains characters not allowed in a header"))?;
        headers.insert(header::AUTHORIZATION, bearer);
        Ok(headers)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = request.send().await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        let response = result.map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            tracing::warn!(error = %e, "request failed");
            Error::from_reqwest(e, Some(self.timeout.as_secs_f64()))
        })?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::status_error(response).await)
        }
    }

    async fn status_error(response: Response) -> Error {
        CLIENT_STATUS_ERRORS.click();
        let status_code = response.status().as_u16();
        Self::rejected(status_code, response.text().await)
    }

    /// A rejected request keeps its status even if the body cannot be read.
    fn rejected(status_code: u16, body: reqwest::Result<String>) -> Error {
        match body {
            Ok(body) => {
                tracing::warn!(status_code, body = %body, "request rejected");
                Error::http_status(status_code, body)
            }
            Err(e) => {
                tracing::warn!(status_code, error = %e, "request rejected, body unreadable");
                Error::http_status(status_code, String::new())
            }
        }
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn post_completion(
        &self,
        url: &Url,
        payload: Bytes,
        api_key: &str,
    ) -> Result<CompletionBody> {
        tracing::debug!(%url, bytes = payload.len(), "posting completion");
        let request = self
            .client
            .post(url.clone())
            .headers(Self::headers(api_key, "text/event-stream")?)
            .body(payload);
        let response = self.send(request).await?;
        let status = response.status().as_u16();
        let body = response.bytes_stream().map(|chunk| chunk.map_err(io::Error::other));
        Ok(CompletionBody::new(status, Box::pin(body)))
    }

    async fn get_models(&self, url: &Url, api_key: &str) -> Result<Bytes> {
        tracing::debug!(%url, "fetching models");
        let request = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .headers(Self::headers(api_key, "application/json")?);
        let response = self.send(request).await?;
        response
            .bytes()
            .await
            .map_err(|e| Error::from_reqwest(e, Some(self.timeout.as_secs_f64())))
    }
}
