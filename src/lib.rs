//! Runtime types for an ahead-of-time compiler.
//!
//! Facade over the workspace crates:
//!
//! - [`common`]: class identities, interning, limits, `ice!`, options
//! - [`solver`]: source types, normalization, the class registry, the subtype
//!   lattice and its flattened tables, categories, function-type offsets
//! - [`runtime`]: run-time types and the general subtype algorithm
//! - [`emitter`]: reification, type-check synthesis, table materialization
//!   and the reference evaluator
//!
//! Plus options loading ([`load_options`]) and tracing setup
//! ([`init_tracing`]).

pub use rtt_common as common;
pub use rtt_emitter as emitter;
pub use rtt_runtime as runtime;
pub use rtt_solver as solver;

pub use rtt_common::{ClassId, RttOptions};

// Options loading from JSON configuration files
pub mod config;
pub use config::{load_options, load_options_or_default, parse_options};

// Subscriber setup driven by RTT_LOG / RTT_LOG_FORMAT
pub mod tracing_config;
pub use tracing_config::{LogFormat, init_tracing};
