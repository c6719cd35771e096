//! Persistent entities: records bound to a remote collection.
//!
//! An [`Entity`] owns a [`Record`] and knows which collection it lives in.
//! Whether a save creates or updates is decided by the presence of the
//! `objectId` field, and only the fields changed since the last clean state
//! are sent on update.

use crate::protocol::{
    delete_op, is_reserved, Method, FIELD_CREATED_AT, FIELD_OBJECT_ID, FIELD_UPDATED_AT,
};
use crate::record::JsonMap;
use crate::{error::Result, Client, CollectionName, Error, ObjectId, Record, Transport, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an entity, derived from its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    /// Never saved, no identity yet
    New,
    /// In sync with the last server response
    Clean,
    /// Has local changes not yet saved
    Dirty,
    /// Removed from the remote store
    Deleted,
}

/// A record stored in a remote collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    collection: CollectionName,
    record: Record,
    deleted: bool,
}

impl Entity {
    /// Create a new, unsaved entity.
    pub fn new(collection: impl Into<CollectionName>) -> Self {
        Self {
            collection: collection.into(),
            record: Record::new(),
            deleted: false,
        }
    }

    /// Handle to an existing remote object, without fetching it.
    pub fn with_id(collection: impl Into<CollectionName>, id: impl Into<ObjectId>) -> Self {
        let mut entity = Self::new(collection);
        entity.record.set(FIELD_OBJECT_ID, id.into());
        entity.record.clear_changes();
        entity
    }

    /// Load an existing object from the remote store.
    pub fn fetch<T: Transport>(
        client: &Client<T>,
        collection: impl Into<CollectionName>,
        id: impl Into<ObjectId>,
    ) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::MissingIdentity);
        }

        let mut entity = Self::with_id(collection, id);
        let url = client.object_url(&entity.collection, entity.require_id()?)?;
        let data = client.send(Method::Get, url, None)?;
        entity.record.set_from_map(data);
        Ok(entity)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Server-assigned identity, if the entity exists remotely.
    pub fn id(&self) -> Option<&str> {
        self.record
            .get_str(FIELD_OBJECT_ID)
            .filter(|id| !id.is_empty())
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp(FIELD_CREATED_AT)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp(FIELD_UPDATED_AT)
    }

    fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.record
            .get_str(key)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn state(&self) -> EntityState {
        if self.deleted {
            EntityState::Deleted
        } else if self.id().is_none() {
            EntityState::New
        } else if self.record.has_changes_deep() {
            EntityState::Dirty
        } else {
            EntityState::Clean
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Whether anything in the record tree changed since the last save.
    pub fn has_changes(&self) -> bool {
        self.record.has_changes_deep()
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.record.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.record.set(key, value);
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        self.record.push(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.record.remove(key)
    }

    pub fn assert_object(&mut self, key: &str) -> Result<&mut Record> {
        self.record.assert_object(key)
    }

    /// Payload of a create request: every field the server does not own.
    pub fn create_payload(&self) -> JsonMap {
        self.record.to_filtered_map(|_, key| !is_reserved(key))
    }

    /// Payload of an update request.
    ///
    /// Top-level fields are sent when set since the last clean state. A
    /// nested record is sent in full as soon as anything inside it changed.
    /// Removed fields are sent as delete instructions.
    pub fn update_payload(&self) -> JsonMap {
        let mut payload = self.record.to_filtered_map(|node, key| {
            !is_reserved(key)
                && (node.is_dirty(key)
                    || node.get_object(key).is_some_and(Record::has_changes_deep))
        });

        for key in self.record.changed_keys() {
            if !is_reserved(key) && !self.record.contains_key(key) {
                payload.insert(key.to_string(), delete_op());
            }
        }
        payload
    }

    /// Create or update the remote object.
    ///
    /// On failure the entity is left exactly as it was, so the call can be
    /// retried.
    pub fn save<T: Transport>(&mut self, client: &Client<T>) -> Result<()> {
        self.ensure_live()?;
        if self.id().is_some() {
            self.update(client)
        } else {
            self.create(client)
        }
    }

    fn create<T: Transport>(&mut self, client: &Client<T>) -> Result<()> {
        let payload = self.create_payload();
        let url = client.collection_url(&self.collection)?;
        let response = client.send(Method::Post, url, Some(payload))?;

        match response.get(FIELD_OBJECT_ID) {
            Some(serde_json::Value::String(id)) if !id.is_empty() => {}
            _ => {
                return Err(Error::InvalidResponse(
                    "create response has no objectId".into(),
                ))
            }
        }

        self.record.set_from_map(response);
        Ok(())
    }

    fn update<T: Transport>(&mut self, client: &Client<T>) -> Result<()> {
        let payload = self.update_payload();
        let url = client.object_url(&self.collection, self.require_id()?)?;
        let response = client.send(Method::Put, url, Some(payload))?;
        self.record.set_from_map(response);
        Ok(())
    }

    /// Delete the remote object. The entity is unusable afterwards.
    pub fn delete<T: Transport>(&mut self, client: &Client<T>) -> Result<()> {
        self.ensure_live()?;
        let url = client.object_url(&self.collection, self.require_id()?)?;
        client.send(Method::Delete, url, None)?;
        self.deleted = true;
        Ok(())
    }

    fn require_id(&self) -> Result<&str> {
        self.id().ok_or(Error::MissingIdentity)
    }

    fn ensure_live(&self) -> Result<()> {
        if self.deleted {
            return Err(Error::Deleted {
                collection: self.collection.clone(),
                id: self.id().unwrap_or_default().to_string(),
            });
        }
        Ok(())
    }
}

/// A typed facade over an [`Entity`] of a fixed collection.
///
/// Implementors add domain setters that forward to the generic ones.
pub trait Model: Sized {
    /// Remote collection holding this kind of object.
    const COLLECTION: &'static str;

    fn from_entity(entity: Entity) -> Self;

    fn entity(&self) -> &Entity;

    fn entity_mut(&mut self) -> &mut Entity;

    /// A new, unsaved object.
    fn create() -> Self {
        Self::from_entity(Entity::new(Self::COLLECTION))
    }

    fn fetch<T: Transport>(client: &Client<T>, id: impl Into<ObjectId>) -> Result<Self> {
        Entity::fetch(client, Self::COLLECTION, id).map(Self::from_entity)
    }

    fn save<T: Transport>(&mut self, client: &Client<T>) -> Result<()> {
        self.entity_mut().save(client)
    }

    fn delete<T: Transport>(&mut self, client: &Client<T>) -> Result<()> {
        self.entity_mut().delete(client)
    }

    fn id(&self) -> Option<&str> {
        self.entity().id()
    }
}
