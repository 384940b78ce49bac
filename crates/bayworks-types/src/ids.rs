//! Type-safe identifier wrappers.
//!
//! Runtime entities (citizens, power sources) get UUID v7 identifiers so
//! they can be minted anywhere without coordination. Catalog entries
//! (resources, skills, recipes, knowledge) are defined up front by
//! configuration and use small numeric identifiers instead.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

/// Generates a newtype wrapper around a `u32` catalog number.
macro_rules! define_catalog_id {
    (
        $(#[$meta:meta])*
        $name:ident, $prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Return the raw catalog number.
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }
    };
}

define_id! {
    /// Unique identifier for a citizen (worker or researcher).
    CitizenId
}

define_id! {
    /// Unique identifier for a power source registered on the grid.
    PowerSourceId
}

define_catalog_id! {
    /// Catalog identifier of a resource kind. Two resources with the same
    /// identifier are the same kind and merge inside a resource bank.
    ResourceId, "resource"
}

define_catalog_id! {
    /// Catalog identifier of a skill a citizen can hold.
    SkillId, "skill"
}

define_catalog_id! {
    /// Catalog identifier of a recipe template.
    RecipeId, "recipe"
}

define_catalog_id! {
    /// Catalog identifier of a piece of researchable knowledge.
    KnowledgeId, "knowledge"
}
