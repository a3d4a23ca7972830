//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and for
//! the deterministic tie-break in corridor negotiation.  The inner integer is
//! `pub` so tests and loaders can build ids directly.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// The id following `self`, used by allocators.
            #[inline]
            pub fn next(self) -> $name {
                $name(self.0 + 1)
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Stable identity of a registered mover.  Also the tie-break key for
    /// corridor negotiation, so it must never be reused while the mover lives.
    pub struct MoverId(u32);
}

typed_id! {
    /// Identity of one path request.  Monotonically allocated by the request
    /// queue; a newer query from the same requester always has a larger id.
    pub struct PathQueryId(u64);
}

typed_id! {
    /// Slot in an entity pool.  Valid only while checked out.
    pub struct EntityHandle(u32);
}

typed_id! {
    /// Designer-assigned prefab category for pooled entities.
    pub struct PrefabKind(u16);
}
