//! Client handle: credentials plus a transport.
//!
//! A [`Client`] is built once and passed by reference to every entity
//! operation. It owns URL construction, header injection, JSON encoding and
//! the mapping of HTTP statuses onto [`Error`]s.

use crate::protocol::{
    HttpRequest, Method, RemoteErrorBody, CONTENT_TYPE_JSON, HEADER_API_KEY,
    HEADER_APPLICATION_ID,
};
use crate::record::JsonMap;
use crate::{error::Result, Error, Transport};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Base URL of the hosted REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.parse.com/1";

/// Bytes escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Credentials and endpoint of a remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Sent as `X-Parse-Application-Id`
    pub application_id: String,
    /// Sent as `X-Parse-REST-API-Key`
    pub api_key: String,
    /// API root, without trailing slash
    pub base_url: String,
}

impl ClientConfig {
    /// Config for the hosted API.
    pub fn new(application_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the config at another API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// A configured connection to a remote store.
#[derive(Debug, Clone)]
pub struct Client<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// URL of a collection, the target of creates.
    pub fn collection_url(&self, collection: &str) -> Result<String> {
        Ok(format!(
            "{}/classes/{}",
            self.config.base_url.trim_end_matches('/'),
            path_segment(collection)?
        ))
    }

    /// URL of a single object.
    pub fn object_url(&self, collection: &str, id: &str) -> Result<String> {
        Ok(format!(
            "{}/{}",
            self.collection_url(collection)?,
            path_segment(id)?
        ))
    }

    /// Send one request and decode the response body.
    ///
    /// Any non-2xx status becomes [`Error::Remote`]. A 2xx body must be a
    /// JSON object; an empty body decodes as an empty map.
    pub fn send(&self, method: Method, url: String, body: Option<JsonMap>) -> Result<JsonMap> {
        let mut request = HttpRequest::new(method, url)
            .with_header(HEADER_APPLICATION_ID, self.config.application_id.as_str())
            .with_header(HEADER_API_KEY, self.config.api_key.as_str());

        if let Some(body) = body {
            request = request
                .with_header("Content-Type", CONTENT_TYPE_JSON)
                .with_body(serde_json::Value::Object(body).to_string());
        }

        let response = self.transport.execute(request)?;

        if !response.is_success() {
            return Err(Error::Remote {
                status: response.status,
                body: RemoteErrorBody::decode(&response.body),
            });
        }

        let trimmed = response.body.trim();
        if trimmed.is_empty() {
            return Ok(JsonMap::new());
        }

        match serde_json::from_str(trimmed) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(other) => Err(Error::InvalidResponse(format!(
                "expected a JSON object, got {}",
                other
            ))),
            Err(e) => Err(Error::InvalidResponse(e.to_string())),
        }
    }
}

/// Escape one path segment. Empty and dot segments would change the target
/// resource once the URL is normalized, so they are rejected.
fn path_segment(segment: &str) -> Result<String> {
    if matches!(segment, "" | "." | "..") {
        return Err(Error::InvalidPath(segment.to_string()));
    }
    Ok(utf8_percent_encode(segment, PATH_SEGMENT).to_string())
}
