//! Address listings stored in the `Address` collection.

use docket_engine::{Entity, Model, Result, Value};

/// Typed facade over an `Address` entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    entity: Entity,
}

impl Model for Address {
    const COLLECTION: &'static str = "Address";

    fn from_entity(entity: Entity) -> Self {
        Self { entity }
    }

    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

impl Address {
    pub fn new() -> Self {
        Self::create()
    }

    pub fn name(&self) -> Option<&str> {
        self.entity.record().get_str("name")
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.entity.set("name", name.into());
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.entity.set("description", description.into());
    }

    pub fn push_image(&mut self, image: impl Into<String>) -> Result<()> {
        self.entity.push("images", image.into())
    }

    /// Set a field of the nested `locInfos` object.
    pub fn set_loc_info(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.entity.assert_object("locInfos")?.set(key, value);
        Ok(())
    }

    pub fn push_metro(&mut self, station: impl Into<String>) -> Result<()> {
        self.entity
            .assert_object("locInfos")?
            .push("metro", station.into())
    }

    /// Set a field of the nested `details` object.
    pub fn set_detail(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.entity.assert_object("details")?.set(key, value);
        Ok(())
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::new()
    }
}
