//! # Docket Engine
//!
//! A dirty-tracking object model for Parse-style document stores.
//!
//! Records mirror schemaless documents held by a remote store reachable over
//! HTTP. Every mutation is tracked per key, recursively through nested
//! records, so that saving an entity sends only what changed.
//!
//! ## Design Principles
//!
//! - **No IO of its own**: all network traffic goes through the [`Transport`] trait
//! - **Server is authoritative**: data loaded from the store is clean by definition
//! - **Failures change nothing**: a failed save keeps every pending change
//! - **No panics**: wrong-type access reports `None` or an [`Error`]
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`Record`] maps string keys to [`Value`]s (scalars, arrays or nested
//! records) and remembers which keys were set, pushed to or removed since
//! it was last loaded.
//!
//! ### Entities
//!
//! An [`Entity`] binds a record to a remote collection. The `objectId` field
//! decides between create (`POST /classes/{collection}`) and update
//! (`PUT /classes/{collection}/{objectId}`):
//! - create sends every field except the server-owned ones
//! - update sends directly changed fields, whole nested records that changed
//!   inside, and `{"__op": "Delete"}` for removed fields
//!
//! ### Models
//!
//! The [`Model`] trait turns an entity into a typed facade with domain
//! setters for one collection.
//!
//! ## Quick Start
//!
//! ```rust
//! use docket_engine::{
//!     Client, ClientConfig, Entity, EntityState, HttpRequest, HttpResponse, Transport,
//!     TransportError,
//! };
//!
//! // A transport that always answers like the server after a create.
//! struct Stub;
//!
//! impl Transport for Stub {
//!     fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
//!         Ok(HttpResponse::new(201, r#"{"objectId":"abc123","createdAt":"2024-01-01T00:00:00.000Z"}"#))
//!     }
//! }
//!
//! let client = Client::new(ClientConfig::new("app-id", "rest-key"), Stub);
//!
//! let mut address = Entity::new("Address");
//! address.set("name", "Test name");
//! address.set("price", 350000);
//! assert_eq!(address.state(), EntityState::New);
//!
//! address.save(&client).unwrap();
//! assert_eq!(address.id(), Some("abc123"));
//! assert_eq!(address.state(), EntityState::Clean);
//!
//! address.set("price", 300000);
//! let payload = serde_json::Value::Object(address.update_payload());
//! assert_eq!(payload, serde_json::json!({"price": 300000}));
//! ```

pub mod client;
pub mod entity;
pub mod error;
pub mod protocol;
pub mod record;
pub mod transport;
pub mod value;

// Re-export main types at crate root
pub use client::{Client, ClientConfig, DEFAULT_BASE_URL};
pub use entity::{Entity, EntityState, Model};
pub use error::{Error, Result};
pub use protocol::{HttpRequest, HttpResponse, Method, RemoteErrorBody, RESERVED_FIELDS};
pub use record::{JsonMap, Record};
pub use transport::{Transport, TransportError};
pub use value::Value;

/// Type aliases for clarity
pub type CollectionName = String;
pub type ObjectId = String;
