//! Whole-program runtime-type state.
//!
//! `TypeUniverse` owns the memoized whole-program artifacts: the lattice and
//! interface type environment, the flattened lattice, the category table, the
//! display names and the function-type offsets. Each is built on first access
//! through a one-time initializer, so a universe can be shared by worker
//! threads synthesizing checks for different call sites.

use crate::categories::{TypeCategoryTable, type_names};
use crate::class_hierarchy::{ClassRegistry, WellKnownClasses};
use crate::flatten::FlattenedLattice;
use crate::format::TypeFormatter;
use crate::function_params::FunctionTypeIndexer;
use crate::intern::TypeInterner;
use crate::lattice::SubtypeLattice;
use crate::normalize::TypeNormalizer;
use crate::type_env::InterfaceTypeEnvironment;
use crate::types::TypeId;
use rtt_common::RttOptions;
use std::sync::{Arc, OnceLock};

pub struct TypeUniverse<'a> {
    db: &'a TypeInterner,
    registry: &'a dyn ClassRegistry,
    options: RttOptions,
    well_known: WellKnownClasses,
    lattice: OnceLock<(SubtypeLattice, InterfaceTypeEnvironment)>,
    flattened: OnceLock<FlattenedLattice>,
    categories: OnceLock<TypeCategoryTable>,
    names: OnceLock<Vec<Arc<str>>>,
    function_types: FunctionTypeIndexer,
}

impl<'a> TypeUniverse<'a> {
    pub fn new(db: &'a TypeInterner, registry: &'a dyn ClassRegistry, options: RttOptions) -> Self {
        TypeUniverse {
            db,
            registry,
            options,
            well_known: registry.well_known(),
            lattice: OnceLock::new(),
            flattened: OnceLock::new(),
            categories: OnceLock::new(),
            names: OnceLock::new(),
            function_types: FunctionTypeIndexer::new(),
        }
    }

    pub fn db(&self) -> &'a TypeInterner {
        self.db
    }

    pub fn registry(&self) -> &'a dyn ClassRegistry {
        self.registry
    }

    pub fn options(&self) -> RttOptions {
        self.options
    }

    pub fn well_known(&self) -> WellKnownClasses {
        self.well_known
    }

    pub fn normalizer(&self) -> TypeNormalizer<'a> {
        TypeNormalizer::new(self.db, self.well_known.object)
    }

    pub fn normalize(&self, type_id: TypeId) -> TypeId {
        self.normalizer().normalize(type_id)
    }

    pub fn formatter(&self) -> TypeFormatter<'a> {
        TypeFormatter::new(self.db, self.registry)
    }

    pub fn lattice(&self) -> &SubtypeLattice {
        &self.lattice_and_env().0
    }

    pub fn type_environment(&self) -> &InterfaceTypeEnvironment {
        &self.lattice_and_env().1
    }

    fn lattice_and_env(&self) -> &(SubtypeLattice, InterfaceTypeEnvironment) {
        self.lattice
            .get_or_init(|| SubtypeLattice::build(self.db, self.registry))
    }

    pub fn flattened(&self) -> &FlattenedLattice {
        self.flattened
            .get_or_init(|| FlattenedLattice::from_lattice(self.lattice()))
    }

    pub fn categories(&self) -> &TypeCategoryTable {
        self.categories
            .get_or_init(|| TypeCategoryTable::build(self.registry))
    }

    pub fn type_names(&self) -> &[Arc<str>] {
        self.names
            .get_or_init(|| type_names(self.db, self.registry, self.options.minify))
    }

    pub fn function_types(&self) -> &FunctionTypeIndexer {
        &self.function_types
    }
}
