//! Verification of fast-path type checks.
//!
//! Under verification mode every fast-path check is followed by a call to
//! [`verify_type_check`], which reruns the general algorithm and reports a
//! disagreement. A mismatch is always a compiler defect.

use crate::subtype::SubtypeChecker;
use crate::types::RuntimeType;
use crate::value::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "type check mismatch for `{type_description}`{}: fast path returned {fast_result}, general algorithm returned {general_result}",
    at(.location)
)]
pub struct TypeCheckMismatch {
    pub type_description: String,
    pub location: Option<String>,
    pub fast_result: bool,
    pub general_result: bool,
}

fn at(location: &Option<String>) -> String {
    location
        .as_deref()
        .map(|l| format!(" at {l}"))
        .unwrap_or_default()
}

/// Rerun `value is ty` with the general algorithm and compare with `fast_result`.
pub fn verify_type_check(
    checker: &SubtypeChecker<'_>,
    value: &Value,
    ty: &RuntimeType,
    fast_result: bool,
    location: Option<&str>,
) -> Result<(), TypeCheckMismatch> {
    let general_result = checker.is_instance(value, ty);
    if general_result == fast_result {
        return Ok(());
    }
    let mismatch = TypeCheckMismatch {
        type_description: checker.tables().describe(ty),
        location: location.map(str::to_owned),
        fast_result,
        general_result,
    };
    tracing::error!(
        ty = %mismatch.type_description,
        location = mismatch.location.as_deref().unwrap_or("<unknown>"),
        fast_result,
        general_result,
        "type check verification failed"
    );
    Err(mismatch)
}
