//! Which side of the connection a simulation runs on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Network role of the local simulation.
///
/// Ordered so that every mode below `Client` holds authority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetMode {
    /// Single-player, no remote observers.
    #[default]
    Standalone,
    /// Headless server.
    DedicatedServer,
    /// Server with a local player.
    ListenServer,
    /// Remote client holding replicas only.
    Client,
}

impl NetMode {
    /// Returns true if this side may originate health mutations.
    #[must_use]
    pub fn has_authority(self) -> bool {
        self < Self::Client
    }

    /// Short label used in diagnostics.
    #[must_use]
    pub const fn side(self) -> &'static str {
        match self {
            Self::Standalone => "standalone",
            Self::DedicatedServer | Self::ListenServer => "server",
            Self::Client => "remote client",
        }
    }
}

impl fmt::Display for NetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.side())
    }
}
