//! Typed identifier wrappers.
//!
//! Ids are dense `u32` indices into the owning `Vec`s (`StreetGraph` node and
//! edge arrays, the batch's per-entity output).  `Copy + Ord + Hash` so they
//! sort and key maps without ceremony.

use std::fmt;

/// Generate a typed index wrapper.  `$tag` is the short prefix used by
/// `Display` (`n12`, `e40`, `ue3`).
macro_rules! index_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) => $tag:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel for "unset".
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Build from a `Vec` position.  Graphs and batches stay well
            /// below `u32::MAX` elements.
            #[inline]
            pub fn from_index(i: usize) -> $name {
                debug_assert!(i < <$inner>::MAX as usize);
                $name(i as $inner)
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "{}"), self.0)
            }
        }
    };
}

index_id! {
    /// Index of a street-graph node.
    pub struct NodeId(u32) => "n";
}

index_id! {
    /// Index of a directed street-graph edge.  Parallel edges between the same
    /// node pair have distinct ids.
    pub struct EdgeId(u32) => "e";
}

index_id! {
    /// Index of a simulated mobile entity; one trajectory per entity.
    pub struct EntityId(u32) => "ue";
}
