//! Lattice flattening.
//!
//! Turns the lattice into two index-aligned per-class arrays: ancestor ids
//! sorted ascending, and the substitution vectors in the same order. Sorting
//! makes the materialized tables reproducible and binary-searchable.

use crate::lattice::SubtypeLattice;
use crate::types::TypeId;
use rtt_common::ClassId;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FlattenedLattice {
    /// `supers[c]`: proper non-top ancestors of class `c`, ascending.
    pub supers: Vec<Vec<ClassId>>,
    /// `substitutions[c][i]`: vector viewing `c` as `supers[c][i]`.
    pub substitutions: Vec<Vec<Vec<TypeId>>>,
}

impl FlattenedLattice {
    pub fn from_lattice(lattice: &SubtypeLattice) -> Self {
        let count = lattice.class_count();
        let mut supers = Vec::with_capacity(count);
        let mut substitutions = Vec::with_capacity(count);

        for index in 0..count {
            let mut row: Vec<(ClassId, &[TypeId])> =
                lattice.ancestors_of(ClassId::from_index(index)).collect();
            row.sort_unstable_by_key(|&(ancestor, _)| ancestor);
            supers.push(row.iter().map(|&(ancestor, _)| ancestor).collect());
            substitutions.push(row.iter().map(|&(_, s)| s.to_vec()).collect());
        }

        FlattenedLattice {
            supers,
            substitutions,
        }
    }

    /// Position of `ancestor` within `supers[sub]`.
    pub fn position(&self, sub: ClassId, ancestor: ClassId) -> Option<usize> {
        self.supers.get(sub.index())?.binary_search(&ancestor).ok()
    }

    pub fn substitution(&self, sub: ClassId, ancestor: ClassId) -> Option<&[TypeId]> {
        let position = self.position(sub, ancestor)?;
        Some(&self.substitutions[sub.index()][position])
    }
}

#[cfg(test)]
#[path = "../tests/flatten_tests.rs"]
mod tests;
