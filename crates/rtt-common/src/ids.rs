//! Dense identities shared by compile-time tables and the runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, dense identity of a reachable class.
///
/// Identities are assigned once per whole program in `0..N` and are the key
/// for every per-class table (category bytes, ancestor lists, names).
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct ClassId(pub u32);

impl ClassId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn from_index(index: usize) -> Self {
        ClassId(index as u32)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
