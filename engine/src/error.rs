//! Error types for the Docket engine.

use crate::protocol::RemoteErrorBody;
use crate::transport::TransportError;
use crate::{CollectionName, ObjectId};
use thiserror::Error;

/// All possible errors from the Docket engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Local errors, never sent over the wire
    #[error("entity has no objectId")]
    MissingIdentity,

    #[error("field '{key}' already holds a {found} value, not an object")]
    TypeConflict { key: String, found: String },

    #[error("type mismatch for field '{field}': expected {expected}, got {got}")]
    TypeMismatch {
        field: String,
        expected: String,
        got: String,
    },

    #[error("entity {collection}/{id} has been deleted")]
    Deleted {
        collection: CollectionName,
        id: ObjectId,
    },

    // Remote errors
    #[error("remote error (status {status}): {body}")]
    Remote { status: u16, body: RemoteErrorBody },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid path segment: '{0}'")]
    InvalidPath(String),
}

impl Error {
    /// HTTP status of a remote error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::MissingIdentity;
        assert_eq!(err.to_string(), "entity has no objectId");

        let err = Error::TypeConflict {
            key: "locInfos".into(),
            found: "string".into(),
        };
        assert_eq!(
            err.to_string(),
            "field 'locInfos' already holds a string value, not an object"
        );

        let err = Error::TypeMismatch {
            field: "images".into(),
            expected: "array".into(),
            got: "int".into(),
        };
        assert_eq!(
            err.to_string(),
            "type mismatch for field 'images': expected array, got int"
        );

        let err = Error::Remote {
            status: 404,
            body: RemoteErrorBody {
                code: Some(101),
                error: Some("object not found for get".into()),
            },
        };
        assert_eq!(
            err.to_string(),
            "remote error (status 404): object not found for get (code 101)"
        );

        let err = Error::InvalidPath("..".into());
        assert_eq!(err.to_string(), "invalid path segment: '..'");
    }

    #[test]
    fn status_only_for_remote() {
        let err = Error::Remote {
            status: 400,
            body: RemoteErrorBody::default(),
        };
        assert_eq!(err.status(), Some(400));
        assert_eq!(Error::MissingIdentity.status(), None);
    }

    #[test]
    fn transport_error_is_transparent() {
        let err: Error = TransportError::new("connection refused").into();
        assert_eq!(err.to_string(), "transport error: connection refused");
    }
}
