//! # Castaway Networking
//!
//! Replication of resource damage from the authoritative server to every
//! observer.
//!
//! ## Authority Model
//!
//! ```text
//! SERVER                                   CLIENT(S)
//!   |                                         |
//!   | on_damage_received (validated)          |
//!   |--- TakeDamage (reliable, ordered) ----->| on_broadcast_received
//!   | on_broadcast_received (local apply)     |
//! ```
//!
//! Clients never originate damage. The server validates, then everyone
//! (the server included) applies the same message through the same path.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod inbox;
pub mod multicast;
pub mod protocol;

pub use inbox::ObserverInbox;
pub use multicast::{DamageMulticast, MulticastHub, MulticastStats, NullMulticast, ObserverId};
pub use protocol::{PacketError, PacketType, TakeDamage, TakeDamagePacket};
