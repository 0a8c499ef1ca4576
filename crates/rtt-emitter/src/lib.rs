//! Runtime type emission
//!
//! Produces the code and constants compiled programs use for run-time types:
//!
//! - **Instruction IR** and a push-based [`CodeBuilder`]
//! - **Constant pool** with structural deduplication
//! - **Reifier**: source type to constant or constructed run-time type
//! - **Type-check synthesizer**: fast paths over class identities with a
//!   general-algorithm fallback and optional verification
//! - **Table materialization**: categories, ancestors, substitutions, names
//! - **Machine**: a reference evaluator for the emitted code
mod builder;
mod constants;
mod eval;
mod instr;
mod reify;
mod tables;
mod type_check;

pub use builder::CodeBuilder;
pub use constants::{ConstId, Constant, ConstantPool};
pub use eval::{Frame, Machine, Trap};
pub use instr::{Code, Instr, LocalId, RuntimeHelper, StructKind};
pub use reify::{ParamMode, Reifier};
pub use tables::{MaterializedTables, TableDecodeError, decode_tables, materialize_tables};
pub use type_check::{SourceLocation, TypeCheckPlan, TypeCheckStrategy, TypeCheckSynthesizer};
