//! # World Configuration
//!
//! Container topology and resource definitions, loaded once at startup from
//! TOML.
//!
//! ```toml
//! [container]
//! num_resource_components = 10
//! max_instances_per_component = 2048
//! num_custom_data_floats = 1
//!
//! [[resources]]
//! id = "oak_tree"
//! durability = 10.0
//!
//! [[spawns]]
//! container = 1
//! component = 0
//! resource = "oak_tree"
//! count = 64
//! seed = 7
//! extent = 40.0
//! ```

use crate::definition::{CatalogError, ResourceCatalog, ResourceDefinition};
use castaway_core::{Reportable, Severity};
use castaway_shared::{
    MAX_INSTANCES_PER_COMPONENT, NUM_CUSTOM_DATA_FLOATS, NUM_RESOURCE_COMPONENTS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The TOML did not parse.
    #[error("invalid world config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Component count outside `1..=255`.
    #[error("num_resource_components must be in 1..=255, got {0}")]
    InvalidComponentCount(usize),

    /// Zero per-component capacity.
    #[error("max_instances_per_component must be positive")]
    InvalidCapacity,

    /// Zero custom floats per instance.
    #[error("num_custom_data_floats must be at least 1")]
    InvalidCustomDataFloats,

    /// A spawn group names a component the container does not have.
    #[error("spawn group for container {container} uses component {component}, container has {count}")]
    SpawnComponentOutOfRange {
        /// Container id.
        container: u64,
        /// Offending component.
        component: u8,
        /// Configured component count.
        count: usize,
    },

    /// The resource list is invalid.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl Reportable for ConfigError {
    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "config.io",
            Self::Parse(_) => "config.parse",
            Self::InvalidComponentCount(_) => "config.component_count",
            Self::InvalidCapacity => "config.capacity",
            Self::InvalidCustomDataFloats => "config.custom_data_floats",
            Self::SpawnComponentOutOfRange { .. } => "config.spawn_component",
            Self::Catalog(inner) => inner.code(),
        }
    }
}

/// Static topology of every resource container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Pool components per container.
    pub num_resource_components: usize,
    /// Instance capacity of each pool component.
    pub max_instances_per_component: usize,
    /// Custom floats per render instance.
    pub num_custom_data_floats: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            num_resource_components: NUM_RESOURCE_COMPONENTS,
            max_instances_per_component: MAX_INSTANCES_PER_COMPONENT,
            num_custom_data_floats: NUM_CUSTOM_DATA_FLOATS,
        }
    }
}

impl ContainerConfig {
    /// Checks the topology.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any count is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Component indices cross the wire as one byte.
        if !(1..=usize::from(u8::MAX)).contains(&self.num_resource_components) {
            return Err(ConfigError::InvalidComponentCount(
                self.num_resource_components,
            ));
        }
        if self.max_instances_per_component == 0 {
            return Err(ConfigError::InvalidCapacity);
        }
        if self.num_custom_data_floats == 0 {
            return Err(ConfigError::InvalidCustomDataFloats);
        }
        Ok(())
    }
}

/// A batch of instances to place at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnGroupConfig {
    /// Container entity id.
    pub container: u64,
    /// Pool component within the container.
    pub component: u8,
    /// Resource id from `[[resources]]`.
    pub resource: String,
    /// Instances to place.
    pub count: usize,
    /// Placement seed.
    #[serde(default)]
    pub seed: u64,
    /// Half-width of the square placement area.
    #[serde(default = "SpawnGroupConfig::default_extent")]
    pub extent: f32,
}

impl SpawnGroupConfig {
    const fn default_extent() -> f32 {
        50.0
    }
}

/// Top-level world configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Container topology.
    #[serde(default)]
    pub container: ContainerConfig,
    /// Resource definitions.
    #[serde(default)]
    pub resources: Vec<ResourceDefinition>,
    /// Startup spawn groups.
    #[serde(default)]
    pub spawns: Vec<SpawnGroupConfig>,
}

impl WorldConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on parse or validation failure.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), "world config loaded");
        Ok(config)
    }

    /// Checks topology, resources and spawn groups.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.container.validate()?;
        let catalog = self.catalog()?;
        for spawn in &self.spawns {
            if usize::from(spawn.component) >= self.container.num_resource_components {
                return Err(ConfigError::SpawnComponentOutOfRange {
                    container: spawn.container,
                    component: spawn.component,
                    count: self.container.num_resource_components,
                });
            }
            catalog.require(&spawn.resource)?;
        }
        Ok(())
    }

    /// Builds the resource catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Catalog`] if a definition is invalid.
    pub fn catalog(&self) -> Result<ResourceCatalog, ConfigError> {
        Ok(ResourceCatalog::from_definitions(self.resources.iter().cloned())?)
    }
}
