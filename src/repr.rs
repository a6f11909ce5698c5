use std::{fmt, mem::size_of};

use zerocopy::{
    byteorder::little_endian::U64, FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
};

use crate::utils::EscapedBytes;

/// Logical node slot index into the backing stream. Slot 0 holds the root.
pub type NodeOffset = u64;
/// User key. Key 0 is reserved as the invalid sentinel.
pub type Key = u64;

/// Width of a record value in bytes.
pub const VALUE_LEN: usize = 8;
/// Fixed-width opaque record value.
pub type Value = [u8; VALUE_LEN];

/// The reserved key marking unused slots; never a valid user key.
pub const NIL_KEY: Key = 0;
/// The root node always lives at offset 0.
pub const ROOT_OFFSET: NodeOffset = 0;

pub(crate) const ENTRY_SIZE: usize = size_of::<NodeEntry>();

/// Eight payload bytes with two views over the same storage: a separator
/// key in branch nodes, an opaque value in leaves. Which view is valid is
/// decided by tree depth alone; nothing in the bytes discriminates.
#[derive(
    Default, Copy, Clone, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
#[repr(transparent)]
pub struct Payload(pub [u8; VALUE_LEN]);

impl Payload {
    #[inline]
    pub fn from_key(key: Key) -> Self {
        Self(key.to_le_bytes())
    }

    #[inline]
    pub fn key(&self) -> Key {
        Key::from_le_bytes(self.0)
    }

    #[inline]
    pub fn value(&self) -> Value {
        self.0
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", EscapedBytes(&self.0))
    }
}

/// One node slot. Branch nodes store `(left child, separator key)`; leaves
/// store `(user key, value)`.
#[derive(
    Default, Copy, Clone, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
#[repr(C)]
pub struct NodeEntry {
    pub offset: U64,
    pub payload: Payload,
}

impl NodeEntry {
    #[inline]
    pub fn leaf(key: Key, value: Value) -> Self {
        Self {
            offset: U64::new(key),
            payload: Payload(value),
        }
    }

    #[inline]
    pub fn branch(child: NodeOffset, separator: Key) -> Self {
        Self {
            offset: U64::new(child),
            payload: Payload::from_key(separator),
        }
    }

    /// The key this entry sorts by: the stored user key in a leaf, the
    /// separator in a branch.
    #[inline]
    pub fn discriminant(&self, leaf: bool) -> Key {
        if leaf {
            self.offset.get()
        } else {
            self.payload.key()
        }
    }
}

impl fmt::Debug for NodeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeEntry")
            .field(&self.offset.get())
            .field(&self.payload)
            .finish()
    }
}
