//! Compile-time runtime-type model
//!
//! This crate owns the source-type side of the runtime-type passes:
//!
//! - **Interned source types**: `TypeData` behind `TypeId` handles
//! - **Normalization**: the canonical form every later pass relies on
//! - **Class registry**: identities, abstractness, masquerades, subtype graph
//! - **Subtype lattice**: subclass -> ancestor -> substitution vector, built
//!   once per program and flattened into sorted per-class tables
//! - **Type categories and display names**: one entry per class id
//! - **Function-type parameter indexing**: non-overlapping index ranges for
//!   nested generic function types
//!
//! `TypeUniverse` memoizes the whole-program artifacts behind one-time
//! initializers so synthesis for independent call sites can run in parallel.
mod categories;
mod class_hierarchy;
pub mod fixtures;
mod flatten;
mod format;
mod function_params;
mod intern;
mod lattice;
mod normalize;
pub mod substitute;
mod type_env;
pub mod type_queries;
pub mod types;
mod universe;

pub use categories::{TypeCategoryTable, type_names};
pub use class_hierarchy::{
    ClassDecl, ClassHierarchy, ClassRegistry, TypeParamDecl, WellKnownClasses,
};
pub use flatten::FlattenedLattice;
pub use format::TypeFormatter;
pub use function_params::FunctionTypeIndexer;
pub use intern::TypeInterner;
pub use lattice::SubtypeLattice;
pub use normalize::TypeNormalizer;
pub use type_env::InterfaceTypeEnvironment;
pub use types::*;
pub use universe::TypeUniverse;
