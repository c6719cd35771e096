//! The transport seam.
//!
//! The engine never opens sockets. Every request goes through a
//! [`Transport`], which performs one blocking HTTP exchange. HTTP-level
//! failures (4xx/5xx) are ordinary responses; only connectivity or protocol
//! failures are [`TransportError`]s.

use crate::protocol::{HttpRequest, HttpResponse};
use thiserror::Error;

/// Connectivity or protocol failure reported by a transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("transport error: {message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Synchronous HTTP capability.
pub trait Transport {
    /// Perform one request and wait for its response.
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

