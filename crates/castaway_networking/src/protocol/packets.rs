//! # Packet Definitions
//!
//! All packet payloads are `Copy` and fixed-size so they can be decoded
//! straight out of a receive buffer.

use bytemuck::{Pod, Zeroable};
use castaway_core::{Reportable, Severity};
use castaway_shared::{
    ComponentHandle, ComponentIndex, ComponentKind, EntityId, HitResult, Vec3,
};
use thiserror::Error;

/// Types of packets in the protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketType {
    /// Server -> Observers: damage applied to one resource instance.
    TakeDamage = 1,
}

impl PacketType {
    /// Parses a packet type byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Self::TakeDamage),
            _ => None,
        }
    }
}

/// Errors produced while decoding a packet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    /// Zero-length buffer.
    #[error("empty packet")]
    Empty,

    /// Unrecognized packet type byte.
    #[error("unknown packet type {0:#04x}")]
    UnknownType(u8),

    /// Payload length does not match the packet type.
    #[error("bad payload length: expected {expected} bytes, got {actual}")]
    BadLength {
        /// Length the packet type requires.
        expected: usize,
        /// Length received.
        actual: usize,
    },

    /// Component kind code out of range.
    #[error("invalid component kind code {0}")]
    InvalidComponentKind(u8),
}

impl Reportable for PacketError {
    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Empty => "net.packet_empty",
            Self::UnknownType(_) => "net.packet_unknown_type",
            Self::BadLength { .. } => "net.packet_bad_length",
            Self::InvalidComponentKind(_) => "net.packet_bad_component_kind",
        }
    }
}

/// Reliable multicast: damage applied to one instance of one pool component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TakeDamage {
    /// Container that owns the struck pool component.
    pub container: EntityId,
    /// Per-container broadcast sequence, starting at 0.
    pub sequence: u32,
    /// Struck instance (the hit's `item`, may be `-1`).
    pub instance_index: i32,
    /// Struck pool component.
    pub component_index: ComponentIndex,
    /// Validated magnitude; 0 when the requirement check rejected the hit.
    pub magnitude: f32,
    /// Original hit result, for cosmetic effects on observers.
    pub hit: HitResult,
}

impl TakeDamage {
    /// Encodes as a type-prefixed packet.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let packet = TakeDamagePacket::from_message(self);
        let mut out = Vec::with_capacity(1 + TakeDamagePacket::SIZE);
        out.push(PacketType::TakeDamage as u8);
        out.extend_from_slice(bytemuck::bytes_of(&packet));
        out
    }

    /// Decodes a type-prefixed packet.
    ///
    /// # Errors
    ///
    /// Returns [`PacketError`] if the type byte or length is wrong or a
    /// field does not decode.
    pub fn decode(bytes: &[u8]) -> Result<Self, PacketError> {
        let (&type_byte, payload) = bytes.split_first().ok_or(PacketError::Empty)?;
        match PacketType::from_byte(type_byte) {
            Some(PacketType::TakeDamage) => {}
            None => return Err(PacketError::UnknownType(type_byte)),
        }
        if payload.len() != TakeDamagePacket::SIZE {
            return Err(PacketError::BadLength {
                expected: TakeDamagePacket::SIZE,
                actual: payload.len(),
            });
        }
        let packet: TakeDamagePacket = bytemuck::try_pod_read_unaligned(payload).map_err(|_| {
            PacketError::BadLength {
                expected: TakeDamagePacket::SIZE,
                actual: payload.len(),
            }
        })?;
        packet.to_message()
    }
}

/// Wire layout of [`TakeDamage`].
///
/// Size: 64 bytes
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
#[repr(C)]
pub struct TakeDamagePacket {
    /// Container entity id.
    pub container_id: u64,
    /// Owner of the hit's component handle.
    pub hit_component_owner: u64,
    /// Broadcast sequence.
    pub sequence: u32,
    /// Struck instance.
    pub instance_index: i32,
    /// Validated magnitude.
    pub magnitude: f32,
    /// The hit's `item`.
    pub hit_item: i32,
    /// Impact point.
    pub impact_point: [f32; 3],
    /// Impact normal.
    pub impact_normal: [f32; 3],
    /// Trace distance.
    pub hit_distance: f32,
    /// Struck pool component.
    pub component_index: u8,
    /// Hit component kind code, [`Self::NO_COMPONENT`] if the hit had none.
    pub hit_component_kind: u8,
    /// Pool index of the hit's component handle.
    pub hit_component_index: u8,
    /// Padding for alignment.
    pub _padding: u8,
}

impl TakeDamagePacket {
    /// Size in bytes.
    pub const SIZE: usize = 64;

    /// Kind code used when the hit carried no component handle.
    pub const NO_COMPONENT: u8 = u8::MAX;

    /// Packs a message.
    #[must_use]
    pub fn from_message(message: &TakeDamage) -> Self {
        let hit = &message.hit;
        let (owner, kind, index) = match hit.component {
            Some(handle) => {
                let index = match handle.kind {
                    ComponentKind::ResourceInstances { index } => index.0,
                    ComponentKind::Root | ComponentKind::Collision => 0,
                };
                (handle.owner.0, handle.kind.code(), index)
            }
            None => (0, Self::NO_COMPONENT, 0),
        };
        Self {
            container_id: message.container.0,
            hit_component_owner: owner,
            sequence: message.sequence,
            instance_index: message.instance_index,
            magnitude: message.magnitude,
            hit_item: hit.item,
            impact_point: hit.impact_point.to_array(),
            impact_normal: hit.impact_normal.to_array(),
            hit_distance: hit.distance,
            component_index: message.component_index.0,
            hit_component_kind: kind,
            hit_component_index: index,
            _padding: 0,
        }
    }

    /// Unpacks into a message.
    ///
    /// # Errors
    ///
    /// Returns [`PacketError::InvalidComponentKind`] for an unknown kind code.
    pub fn to_message(&self) -> Result<TakeDamage, PacketError> {
        let component = if self.hit_component_kind == Self::NO_COMPONENT {
            None
        } else {
            let kind = ComponentKind::from_code(self.hit_component_kind, self.hit_component_index)
                .ok_or(PacketError::InvalidComponentKind(self.hit_component_kind))?;
            Some(ComponentHandle {
                owner: EntityId(self.hit_component_owner),
                kind,
            })
        };
        Ok(TakeDamage {
            container: EntityId(self.container_id),
            sequence: self.sequence,
            instance_index: self.instance_index,
            component_index: ComponentIndex(self.component_index),
            magnitude: self.magnitude,
            hit: HitResult {
                component,
                item: self.hit_item,
                impact_point: Vec3::from_array(self.impact_point),
                impact_normal: Vec3::from_array(self.impact_normal),
                distance: self.hit_distance,
            },
        })
    }
}
