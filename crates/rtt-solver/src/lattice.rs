//! Subtype lattice.
//!
//! For every class `B` other than the universal top class, and every class
//! `A` transitively implementing `B`, records the substitution vector that
//! rewrites `A`'s own type arguments into `B`'s: entry `i` is the type of
//! `B`'s parameter `i`, written over `A`'s class type parameters.
//!
//! The universal top class is never materialized; the type-check fast path
//! answers it directly.

use crate::class_hierarchy::ClassRegistry;
use crate::intern::TypeInterner;
use crate::normalize::TypeNormalizer;
use crate::type_env::InterfaceTypeEnvironment;
use crate::types::TypeId;
use rtt_common::{ClassId, ice};
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct SubtypeLattice {
    /// Indexed by subclass id: ancestor id -> substitution vector.
    entries: Vec<FxHashMap<ClassId, Vec<TypeId>>>,
}

impl SubtypeLattice {
    /// Build the lattice and the interface type environment over every
    /// class of `registry`.
    #[tracing::instrument(level = "debug", skip_all, fields(classes = registry.class_count()))]
    pub fn build(
        db: &TypeInterner,
        registry: &dyn ClassRegistry,
    ) -> (SubtypeLattice, InterfaceTypeEnvironment) {
        let class_count = registry.class_count();
        let object = registry.well_known().object;
        let normalizer = TypeNormalizer::new(db, object);
        let mut env = InterfaceTypeEnvironment::new();
        let mut lattice = SubtypeLattice {
            entries: vec![FxHashMap::default(); class_count],
        };

        for index in 0..class_count {
            let ancestor = ClassId::from_index(index);
            if registry.class(ancestor).id != ancestor {
                ice!("class at position {} reports identity {}", index, registry.class(ancestor).id);
            }
            env.register_class(registry, ancestor);
            if ancestor == object {
                continue;
            }

            for sub in registry.subtypes_of(ancestor) {
                if sub == ancestor {
                    continue;
                }
                if sub.index() >= class_count {
                    ice!("missing class identity {} below {}", sub, ancestor);
                }
                env.register_class(registry, sub);

                let own_args: Vec<TypeId> = registry
                    .class(sub)
                    .type_params
                    .iter()
                    .map(|&p| db.class_param(p, false))
                    .collect();
                let Some(viewed) = registry.type_arguments_as_instance_of(db, sub, &own_args, ancestor)
                else {
                    ice!("{} implements {} but has no type arguments for it", sub, ancestor);
                };
                let substitution: Vec<TypeId> =
                    viewed.into_iter().map(|t| normalizer.normalize(t)).collect();
                lattice.insert(sub, ancestor, substitution);
            }
        }

        tracing::debug!(
            entries = lattice.entries.iter().map(FxHashMap::len).sum::<usize>(),
            "subtype lattice built"
        );
        (lattice, env)
    }

    fn insert(&mut self, sub: ClassId, ancestor: ClassId, substitution: Vec<TypeId>) {
        if self.entries[sub.index()]
            .insert(ancestor, substitution)
            .is_some()
        {
            ice!("duplicate lattice entry for ({}, {})", sub, ancestor);
        }
    }

    pub fn class_count(&self) -> usize {
        self.entries.len()
    }

    /// Substitution vector viewing `sub` as `ancestor`, if `ancestor` is a
    /// proper non-top ancestor of `sub`.
    pub fn substitution(&self, sub: ClassId, ancestor: ClassId) -> Option<&[TypeId]> {
        self.entries
            .get(sub.index())
            .and_then(|m| m.get(&ancestor))
            .map(Vec::as_slice)
    }

    pub fn ancestors_of(&self, sub: ClassId) -> impl Iterator<Item = (ClassId, &[TypeId])> + '_ {
        self.entries
            .get(sub.index())
            .into_iter()
            .flat_map(|m| m.iter().map(|(&a, s)| (a, s.as_slice())))
    }

    pub fn is_proper_ancestor(&self, sub: ClassId, ancestor: ClassId) -> bool {
        self.substitution(sub, ancestor).is_some()
    }
}

#[cfg(test)]
#[path = "../tests/lattice_tests.rs"]
mod tests;
