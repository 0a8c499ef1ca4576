//! Common types and utilities for the rtt runtime-type passes.
//!
//! This crate provides foundational types used across all rtt crates:
//! - Name interning (`Atom`, `NameInterner`)
//! - Dense class identities (`ClassId`)
//! - Type-category codes and the reserved masquerade band
//! - Internal-compiler-error reporting (`ice!`)
//! - Pass configuration (`RttOptions`)

// String interning for class, parameter and field names
pub mod interner;
pub use interner::{Atom, NameInterner};

// Dense identities shared by the compile-time and run-time halves
pub mod ids;
pub use ids::ClassId;

// Centralized limits, bands and category codes
pub mod limits;

// Fatal internal error reporting
pub mod ice;

// Pass configuration
pub mod options;
pub use options::RttOptions;

#[doc(hidden)]
pub use tracing;
