//! # Resource Definitions
//!
//! What a harvestable resource is: the tags and tool strength needed to
//! damage it, its per-instance durability and what it yields.
//!
//! ## Configuration
//!
//! ```toml
//! [[resources]]
//! id = "oak_tree"
//! display_name = "Oak Tree"
//! required_tags = ["Ability.Chop"]
//! tool_strength = 2.0
//! durability = 10.0
//! yield_item = "oak_log"
//! yield_quantity = 3
//! render_tag = 1.0
//! ```
//!
//! Definitions are shared read-only via `Arc`; pools never mutate them.

use castaway_core::{Reportable, Severity};
use castaway_shared::TagContainer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// A harvestable resource type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Unique id.
    pub id: String,
    /// Name shown to players.
    #[serde(default)]
    pub display_name: String,
    /// Tags the damaging effect must carry.
    #[serde(default)]
    pub required_tags: TagContainer,
    /// Minimum instigator tool strength.
    #[serde(default)]
    pub tool_strength: f32,
    /// Health of each instance.
    pub durability: f32,
    /// Item produced when an instance is depleted.
    #[serde(default)]
    pub yield_item: Option<String>,
    /// How many of `yield_item` are produced.
    #[serde(default)]
    pub yield_quantity: u32,
    /// Custom float 0 written to every render instance.
    #[serde(default)]
    pub render_tag: f32,
}

impl ResourceDefinition {
    /// A definition with `durability` and no requirements.
    #[must_use]
    pub fn new(id: impl Into<String>, durability: f32) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            required_tags: TagContainer::new(),
            tool_strength: 0.0,
            durability,
            yield_item: None,
            yield_quantity: 0,
            render_tag: 0.0,
        }
    }

    /// Sets the required tags.
    #[must_use]
    pub fn with_required_tags(mut self, tags: TagContainer) -> Self {
        self.required_tags = tags;
        self
    }

    /// Sets the minimum tool strength.
    #[must_use]
    pub fn with_tool_strength(mut self, tool_strength: f32) -> Self {
        self.tool_strength = tool_strength;
        self
    }

    /// Sets the yield.
    #[must_use]
    pub fn with_yield(mut self, item: impl Into<String>, quantity: u32) -> Self {
        self.yield_item = Some(item.into());
        self.yield_quantity = quantity;
        self
    }

    /// Sets the render tag.
    #[must_use]
    pub fn with_render_tag(mut self, render_tag: f32) -> Self {
        self.render_tag = render_tag;
        self
    }

    /// Checks the numeric fields.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] for a negative or non-finite tool strength or
    /// a non-positive durability.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !self.tool_strength.is_finite() || self.tool_strength < 0.0 {
            return Err(CatalogError::InvalidToolStrength {
                id: self.id.clone(),
                value: self.tool_strength,
            });
        }
        if !self.durability.is_finite() || self.durability <= 0.0 {
            return Err(CatalogError::InvalidDurability {
                id: self.id.clone(),
                value: self.durability,
            });
        }
        Ok(())
    }
}

/// Errors raised while building a [`ResourceCatalog`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Two definitions share an id.
    #[error("duplicate resource id '{0}'")]
    DuplicateId(String),

    /// Tool strength is negative or not finite.
    #[error("resource '{id}': invalid tool strength {value}")]
    InvalidToolStrength {
        /// Resource id.
        id: String,
        /// Offending value.
        value: f32,
    },

    /// Durability is not positive.
    #[error("resource '{id}': durability must be positive, got {value}")]
    InvalidDurability {
        /// Resource id.
        id: String,
        /// Offending value.
        value: f32,
    },

    /// Lookup of an id the catalog does not have.
    #[error("unknown resource '{0}'")]
    UnknownResource(String),
}

impl Reportable for CatalogError {
    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn code(&self) -> &'static str {
        match self {
            Self::DuplicateId(_) => "catalog.duplicate_id",
            Self::InvalidToolStrength { .. } => "catalog.invalid_tool_strength",
            Self::InvalidDurability { .. } => "catalog.invalid_durability",
            Self::UnknownResource(_) => "catalog.unknown_resource",
        }
    }
}

/// Validated, id-keyed set of resource definitions.
#[derive(Clone, Debug, Default)]
pub struct ResourceCatalog {
    definitions: BTreeMap<String, Arc<ResourceDefinition>>,
}

impl ResourceCatalog {
    /// Validates and indexes `definitions`.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] found.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = ResourceDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for definition in definitions {
            definition.validate()?;
            if catalog.definitions.contains_key(&definition.id) {
                return Err(CatalogError::DuplicateId(definition.id));
            }
            catalog
                .definitions
                .insert(definition.id.clone(), Arc::new(definition));
        }
        tracing::info!(resources = catalog.len(), "resource catalog loaded");
        Ok(catalog)
    }

    /// The definition with `id`, if any.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<ResourceDefinition>> {
        self.definitions.get(id).cloned()
    }

    /// The definition with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownResource`] if it is missing.
    pub fn require(&self, id: &str) -> Result<Arc<ResourceDefinition>, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::UnknownResource(id.to_owned()))
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ResourceDefinition>> {
        self.definitions.values()
    }
}
