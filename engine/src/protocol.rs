//! Wire-level types for the REST protocol.
//!
//! Requests and responses are plain data so that any HTTP stack can carry
//! them through a [`Transport`](crate::Transport).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Header carrying the application identifier.
pub const HEADER_APPLICATION_ID: &str = "X-Parse-Application-Id";
/// Header carrying the REST API key.
pub const HEADER_API_KEY: &str = "X-Parse-REST-API-Key";
/// Content type of every request body.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Field holding the server-assigned identity.
pub const FIELD_OBJECT_ID: &str = "objectId";
/// Server-managed creation timestamp.
pub const FIELD_CREATED_AT: &str = "createdAt";
/// Server-managed update timestamp.
pub const FIELD_UPDATED_AT: &str = "updatedAt";
/// Internal type marker.
pub const FIELD_TYPE_MARKER: &str = "__type";

/// Fields owned by the server, never sent in a payload.
pub const RESERVED_FIELDS: [&str; 4] = [
    FIELD_OBJECT_ID,
    FIELD_CREATED_AT,
    FIELD_UPDATED_AT,
    FIELD_TYPE_MARKER,
];

/// Whether `key` is owned by the server.
pub fn is_reserved(key: &str) -> bool {
    RESERVED_FIELDS.contains(&key)
}

/// The instruction that deletes a field in an update payload.
pub fn delete_op() -> serde_json::Value {
    serde_json::json!({ "__op": "Delete" })
}

/// Whether `status` is a success (2xx).
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// HTTP methods used by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built request, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Encoded JSON body
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response as returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        is_success(self.status)
    }
}

/// Error document returned by the server on failure.
///
/// The server answers with `{"code": 101, "error": "..."}`. Bodies that do
/// not decode keep their raw text in `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RemoteErrorBody {
    /// Decode a failure body.
    pub fn decode(body: &str) -> Self {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        serde_json::from_str(trimmed).unwrap_or_else(|_| Self {
            code: None,
            error: Some(trimmed.to_string()),
        })
    }
}

impl fmt::Display for RemoteErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error, self.code) {
            (Some(error), Some(code)) => write!(f, "{} (code {})", error, code),
            (Some(error), None) => f.write_str(error),
            (None, Some(code)) => write!(f, "code {}", code),
            (None, None) => f.write_str("no error details"),
        }
    }
}
