//! Strongly typed, zero-cost identifier wrappers.
//!
//! Two id spaces exist side by side:
//!
//! - **Global** ids (`SwitchId`, `HostId`) are handed out by the shared index
//!   allocator and are unique across every worker of a batch.  They name the
//!   emulated devices (`s17`, `hs17`).
//! - **Local** indices (`NodeIndex`) address rows and columns of one
//!   topology's adjacency and latency matrices, `0..node_count`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Batch-wide unique switch number.  Displays as the device name `s{n}`.
    pub struct SwitchId(u32);
}

typed_id! {
    /// Batch-wide unique host number.  Displays as the device name `hs{n}`.
    pub struct HostId(u32);
}

typed_id! {
    /// Position of a node inside one topology's matrices.
    pub struct NodeIndex(u32);
}

impl fmt::Display for SwitchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hs{}", self.0)
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl NodeIndex {
    /// Build from a `usize` position.  Topologies are far below `u32::MAX`
    /// nodes, so the cast never truncates in practice.
    #[inline]
    pub fn at(i: usize) -> NodeIndex {
        NodeIndex(i as u32)
    }
}
