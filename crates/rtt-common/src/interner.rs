//! Name interning for classes, type parameters and record fields.
//!
//! Every name a type mentions is stored once and referred to by an [`Atom`].
//! Shapes that carry names (named parameters, record fields) hash and compare
//! atoms instead of strings.

use crate::ice;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use std::sync::{Arc, RwLock};

/// Handle to an interned name. `Atom::NONE` is the empty name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    pub const NONE: Atom = Atom(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Atom::NONE
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Core class names and conventional parameter names.
const PRELUDE: &[&str] = &[
    "Object", "Function", "_Closure", "Record", "Future", "Null", "Never", "dynamic", "void",
    "int", "double", "bool", "String", "List", "Map", "Iterable", "T", "E", "K", "V", "R", "X",
];

/// Name interner shared by every thread working on one program.
///
/// Lookups of known names only touch the map; a new name additionally takes
/// the write lock on the name list while its map entry is held, so two threads
/// interning the same name agree on one atom.
pub struct NameInterner {
    atoms: DashMap<Arc<str>, Atom, FxBuildHasher>,
    names: RwLock<Vec<Arc<str>>>,
}

impl NameInterner {
    /// An interner holding only the empty name.
    pub fn new() -> Self {
        let empty: Arc<str> = Arc::from("");
        let atoms = DashMap::with_hasher(FxBuildHasher);
        atoms.insert(empty.clone(), Atom::NONE);
        NameInterner {
            atoms,
            names: RwLock::new(vec![empty]),
        }
    }

    /// An interner with the [`PRELUDE`] names already present.
    pub fn with_prelude() -> Self {
        let interner = Self::new();
        for name in PRELUDE {
            interner.intern(name);
        }
        interner
    }

    pub fn intern(&self, name: &str) -> Atom {
        if let Some(atom) = self.atoms.get(name) {
            return *atom;
        }
        match self.atoms.entry(Arc::from(name)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let mut names = self.names.write().expect("name list lock poisoned");
                let Ok(index) = u32::try_from(names.len()) else {
                    ice!("more than {} distinct names", u32::MAX);
                };
                names.push(entry.key().clone());
                *entry.insert(Atom(index))
            }
        }
    }

    /// The name behind `atom`. Atoms from another interner are a defect.
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        match self.try_resolve(atom) {
            Some(name) => name,
            None => ice!("unknown name atom {}", atom.0),
        }
    }

    pub fn try_resolve(&self, atom: Atom) -> Option<Arc<str>> {
        let names = self.names.read().expect("name list lock poisoned");
        names.get(atom.index()).cloned()
    }

    /// Number of distinct names, the empty name included.
    pub fn len(&self) -> usize {
        self.names.read().expect("name list lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for NameInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
