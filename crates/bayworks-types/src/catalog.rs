//! Catalog value types: resources, skills, and quantified amounts.
//!
//! These are plain data loaded from configuration. They carry no runtime
//! state of their own; banks and recipes hold them by value.

use serde::{Deserialize, Serialize};

use crate::ids::{ResourceId, SkillId};

/// A kind of material that can be stored in a resource bank.
///
/// `volume` is the space one unit occupies in a bank. `mass` is carried
/// for the construction layer and does not affect the core economy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    /// Catalog identifier. Banks merge entries by this value.
    pub id: ResourceId,
    /// Human-readable name.
    pub name: String,
    /// Volume occupied by one unit.
    #[serde(default)]
    pub volume: u32,
    /// Mass of one unit.
    #[serde(default)]
    pub mass: u32,
}

impl Resource {
    /// Create a resource with the given identifier, name, and per-unit volume.
    pub fn new(id: impl Into<ResourceId>, name: impl Into<String>, volume: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            volume,
            mass: 0,
        }
    }
}

/// A capability a citizen can hold, unlocked by research.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Skill {
    /// Catalog identifier.
    pub id: SkillId,
    /// Human-readable name.
    pub name: String,
    /// Free-form description shown to players.
    #[serde(default)]
    pub description: String,
}

/// An amount of some item: `quantity` units of `item`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quantified<T> {
    /// The item being counted.
    pub item: T,
    /// How many units.
    pub quantity: u32,
}

impl<T> Quantified<T> {
    /// Pair an item with a quantity.
    pub const fn new(item: T, quantity: u32) -> Self {
        Self { item, quantity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_roundtrips_through_json_with_defaults() {
        let parsed: Result<Resource, _> = serde_json::from_str(r#"{"id": 3, "name": "Scrap"}"#);
        assert!(parsed.is_ok());
        let scrap = parsed.ok();
        assert_eq!(scrap.as_ref().map(|r| r.volume), Some(0));
        assert_eq!(scrap.map(|r| r.id), Some(ResourceId(3)));
    }

    #[test]
    fn quantified_pairs_item_and_amount() {
        let q = Quantified::new(Resource::new(1, "Scrap", 1), 4);
        assert_eq!(q.quantity, 4);
        assert_eq!(q.item.name, "Scrap");
    }
}
