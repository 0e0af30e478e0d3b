//! # Network Protocol
//!
//! ## Packet Structure
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Type (1 byte) │ Payload (fixed size per type)                │
//! ├──────────────────────────────────────────────────────────────┤
//! │ 0x01 TakeDamage │ TakeDamagePacket (64 bytes)                │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Payloads are `Pod` and read with `try_pod_read_unaligned`, so a buffer
//! never needs to be aligned.

mod packets;

pub use packets::{PacketError, PacketType, TakeDamage, TakeDamagePacket};
