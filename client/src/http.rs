//! Blocking HTTP transport built on `reqwest`.

use docket_engine::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use std::time::Duration;

/// A [`Transport`] that performs real HTTP requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let inner = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::new(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Wrap an already configured `reqwest` client.
    pub fn from_client(inner: reqwest::blocking::Client) -> Self {
        Self { inner }
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let mut builder = self
            .inner
            .request(Self::method(request.method), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().map_err(|e| {
            tracing::warn!(url = %request.url, "request failed: {}", e);
            TransportError::new(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError::new(format!("failed to read response body: {}", e)))?;

        tracing::debug!(status, bytes = body.len(), "received response");
        Ok(HttpResponse::new(status, body))
    }
}
