//! Reference runtime for emitted type checks.
//!
//! Provides what compiled code calls into at run time:
//!
//! - `RuntimeType` values produced by reified type literals
//! - `TypeTables`, the decoded per-class category, ancestor and name tables
//! - `SubtypeChecker`, the general subtype algorithm (the slow path)
//! - the normalized-union builder, the nullable-wrap helper and the
//!   verification comparison used under verification mode
pub mod subtype;
pub mod tables;
pub mod types;
pub mod value;
pub mod verify;

pub use subtype::SubtypeChecker;
pub use tables::{RuntimeWellKnown, TypeTables};
pub use types::{
    FunctionRuntimeType, NamedParameter, RuntimeType, TopKind, create_normalized_async_union,
};
pub use value::{Object, ObjectPayload, Value};
pub use verify::{TypeCheckMismatch, verify_type_check};
