use core::fmt;
use core::num::NonZeroU32;

/// Declare a compact, copyable identifier backed by `NonZeroU32`.
///
/// Storing `index + 1` keeps `Option<Id>` the same size as the id itself,
/// which matters for the per-port `Option<JunctionId>` slot.
macro_rules! compact_id {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Create an id from a 0-based index.
            pub fn from_index(index: usize) -> Self {
                let raw = u32::try_from(index + 1).unwrap_or(u32::MAX);
                Self(NonZeroU32::new(raw).unwrap_or(NonZeroU32::MAX))
            }

            /// Recover the 0-based index.
            pub fn index(self) -> usize {
                (self.0.get() - 1) as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "({})"), self.index())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "{}"), self.index())
            }
        }
    };
}

compact_id!(
    /// Terminal on a component: one potential and one flow variable.
    PortId,
    "port"
);

compact_id!(
    /// Conservation scope grouping transitively connected ports.
    JunctionId,
    "junction"
);

compact_id!(
    /// Component registered with a simulation.
    ComponentId,
    "comp"
);
