use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use soa_odata::url::encode_component;

use crate::descriptor::RequestDescriptor;
use crate::error::{BoxError, HttpTransportError};

/// Delivers a [`RequestDescriptor`] and yields the decoded response body.
///
/// Single attempt: implementations must not retry on their own.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, descriptor: RequestDescriptor) -> Result<serde_json::Value, BoxError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, descriptor: RequestDescriptor) -> Result<serde_json::Value, BoxError> {
        (**self).send(descriptor).await
    }
}

const BODY_PREVIEW_CHARS: usize = 256;

/// Plain-HTTP JSON transport over a pooled hyper client.
///
/// Request bodies are sent as `application/json`. Responses outside `2xx`
/// become [`HttpTransportError::HttpStatus`]; an empty body decodes to `null`.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client<HttpConnector, Full<Bytes>>,
    timeout: Option<Duration>,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    #[must_use]
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .build::<_, Full<Bytes>>(HttpConnector::new());
        Self {
            client,
            timeout: None,
        }
    }

    /// Bound each request (connect, send and body read) by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send `descriptor` and decode the JSON response.
    ///
    /// # Errors
    /// Returns [`HttpTransportError`] when the URL cannot be formed, the
    /// connection fails, the deadline passes, the status is not `2xx`, or the
    /// body is not valid JSON.
    pub async fn execute(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<serde_json::Value, HttpTransportError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.execute_once(descriptor))
                .await
                .map_err(|_| HttpTransportError::Timeout(limit))?,
            None => self.execute_once(descriptor).await,
        }
    }

    async fn execute_once(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<serde_json::Value, HttpTransportError> {
        if !descriptor.protocol.eq_ignore_ascii_case("http") {
            return Err(HttpTransportError::UnsupportedScheme(
                descriptor.protocol.clone(),
            ));
        }

        let url = wire_url(&descriptor.url()).into_owned();
        let uri: http::Uri = url.parse().map_err(|e: http::uri::InvalidUri| {
            HttpTransportError::InvalidUri {
                url: url.clone(),
                reason: e.to_string(),
            }
        })?;

        let mut builder = http::Request::builder()
            .method(http::Method::from(descriptor.method))
            .uri(uri)
            .header(http::header::ACCEPT, "application/json");
        for (name, value) in &descriptor.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = match &descriptor.data {
            Some(data) => {
                builder = builder.header(http::header::CONTENT_TYPE, "application/json");
                Bytes::from(serde_json::to_vec(data)?)
            }
            None => Bytes::new(),
        };
        let request = builder.body(Full::new(body))?;

        tracing::debug!(method = %descriptor.method, url = %url, "sending request");

        let response = self.client.request(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();

        if !status.is_success() {
            let body_preview: String = String::from_utf8_lossy(&bytes)
                .chars()
                .take(BODY_PREVIEW_CHARS)
                .collect();
            tracing::debug!(status = %status, url = %url, "request failed");
            return Err(HttpTransportError::HttpStatus {
                status,
                body_preview,
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Percent-encode the characters a request target may not carry raw (space,
/// controls, non-ASCII and the URI-excluded punctuation). Existing escapes and
/// every other character pass through unchanged.
fn wire_url(url: &str) -> Cow<'_, str> {
    if !url.chars().any(needs_escape) {
        return Cow::Borrowed(url);
    }
    let mut out = String::with_capacity(url.len());
    let mut buf = [0u8; 4];
    for c in url.chars() {
        if needs_escape(c) {
            out.push_str(&encode_component(c.encode_utf8(&mut buf)));
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

fn needs_escape(c: char) -> bool {
    !c.is_ascii_graphic() || matches!(c, '"' | '<' | '>' | '\\' | '^' | '`' | '{' | '|' | '}')
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, descriptor: RequestDescriptor) -> Result<serde_json::Value, BoxError> {
        Ok(self.execute(&descriptor).await?)
    }
}
