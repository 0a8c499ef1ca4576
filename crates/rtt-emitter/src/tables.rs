//! Runtime table materialization.
//!
//! Emits the whole-program tables the runtime reads as constants:
//!
//! - category bytes, one per class
//! - per class, its ascending ancestor ids (nested `i32` arrays)
//! - per class, one substitution vector per ancestor (nested type arrays),
//!   with class type parameters as references to the subclass's arguments
//! - per class display names
//! - the well-known class ids: object, function, closure, record, future
//!
//! [`decode_tables`] reads them back into [`TypeTables`].

use crate::constants::{ConstId, Constant, ConstantPool};
use crate::reify::Reifier;
use rtt_common::ClassId;
use rtt_runtime::{RuntimeType, RuntimeWellKnown, TypeTables};
use rtt_solver::TypeUniverse;
use std::sync::Arc;
use thiserror::Error;

/// Constant ids of the materialized tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MaterializedTables {
    pub categories: ConstId,
    pub supers: ConstId,
    pub substitutions: ConstId,
    pub names: ConstId,
    pub well_known: ConstId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableDecodeError {
    #[error("unknown table constant {0}")]
    UnknownConstant(u32),

    #[error("table constant {id} is not {expected}")]
    Malformed { id: u32, expected: &'static str },

    #[error("ancestor and substitution tables disagree for class {0}")]
    Misaligned(u32),
}

#[tracing::instrument(level = "debug", skip_all)]
pub fn materialize_tables(universe: &TypeUniverse<'_>, pool: &mut ConstantPool) -> MaterializedTables {
    let flattened = universe.flattened();
    let mut reifier = Reifier::new(universe);

    let categories = pool.bytes(universe.categories().as_bytes());

    let supers = flattened
        .supers
        .iter()
        .map(|row| {
            let ids = row.iter().map(|ancestor| pool.i32(ancestor.0 as i32)).collect();
            pool.array(ids)
        })
        .collect();
    let supers = pool.array(supers);

    let substitutions = flattened
        .substitutions
        .iter()
        .map(|row| {
            let vectors = row
                .iter()
                .map(|vector| {
                    let types = vector.iter().map(|&t| reifier.table_type(t)).collect();
                    pool.type_array(types)
                })
                .collect();
            pool.array(vectors)
        })
        .collect();
    let substitutions = pool.array(substitutions);

    let names = pool.string_array(universe.type_names());

    let wk = universe.well_known();
    let well_known = [wk.object, wk.function, wk.closure, wk.record, wk.future]
        .iter()
        .map(|class| pool.i32(class.0 as i32))
        .collect();
    let well_known = pool.array(well_known);

    tracing::debug!(
        classes = flattened.supers.len(),
        constants = pool.len(),
        "materialized runtime tables"
    );
    MaterializedTables {
        categories,
        supers,
        substitutions,
        names,
        well_known,
    }
}

/// Read materialized tables back out of `pool`.
pub fn decode_tables(pool: &ConstantPool, tables: &MaterializedTables) -> Result<TypeTables, TableDecodeError> {
    let decoder = Decoder { pool };

    let categories = match decoder.get(tables.categories)? {
        Constant::Bytes(bytes) => bytes.to_vec(),
        _ => return Err(decoder.malformed(tables.categories, "a byte array")),
    };

    let supers = decoder
        .array(tables.supers)?
        .iter()
        .map(|&row| {
            decoder
                .array(row)?
                .iter()
                .map(|&id| decoder.i32(id).map(|v| ClassId(v as u32)))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let substitutions = decoder
        .array(tables.substitutions)?
        .iter()
        .map(|&row| {
            decoder
                .array(row)?
                .iter()
                .map(|&vector| {
                    decoder
                        .array(vector)?
                        .iter()
                        .map(|&t| decoder.ty(t))
                        .collect::<Result<Vec<_>, _>>()
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (class, (ancestors, vectors)) in supers.iter().zip(&substitutions).enumerate() {
        if ancestors.len() != vectors.len() {
            return Err(TableDecodeError::Misaligned(class as u32));
        }
    }
    if supers.len() != substitutions.len() {
        return Err(TableDecodeError::Misaligned(supers.len().min(substitutions.len()) as u32));
    }

    let names = decoder
        .array(tables.names)?
        .iter()
        .map(|&name| match decoder.get(name)? {
            Constant::Str(s) => Ok(s.clone()),
            _ => Err(decoder.malformed(name, "a string")),
        })
        .collect::<Result<Vec<Arc<str>>, _>>()?;

    let well_known = decoder
        .array(tables.well_known)?
        .iter()
        .map(|&id| decoder.i32(id).map(|v| ClassId(v as u32)))
        .collect::<Result<Vec<_>, _>>()?;
    let [object, function, closure, record, future] = well_known[..] else {
        return Err(decoder.malformed(tables.well_known, "five class ids"));
    };

    Ok(TypeTables {
        categories,
        supers,
        substitutions,
        names,
        well_known: RuntimeWellKnown {
            object,
            function,
            closure,
            record,
            future,
        },
    })
}

struct Decoder<'p> {
    pool: &'p ConstantPool,
}

impl<'p> Decoder<'p> {
    fn get(&self, id: ConstId) -> Result<&'p Constant, TableDecodeError> {
        self.pool
            .try_get(id)
            .ok_or(TableDecodeError::UnknownConstant(id.0))
    }

    fn malformed(&self, id: ConstId, expected: &'static str) -> TableDecodeError {
        TableDecodeError::Malformed { id: id.0, expected }
    }

    fn array(&self, id: ConstId) -> Result<&'p [ConstId], TableDecodeError> {
        match self.get(id)? {
            Constant::Array(elements) => Ok(elements),
            _ => Err(self.malformed(id, "an array")),
        }
    }

    fn i32(&self, id: ConstId) -> Result<i32, TableDecodeError> {
        match self.get(id)? {
            Constant::I32(v) => Ok(*v),
            _ => Err(self.malformed(id, "an i32")),
        }
    }

    fn ty(&self, id: ConstId) -> Result<RuntimeType, TableDecodeError> {
        match self.get(id)? {
            Constant::Type(t) => Ok(t.clone()),
            _ => Err(self.malformed(id, "a type")),
        }
    }
}

#[cfg(test)]
#[path = "../tests/tables_tests.rs"]
mod tests;
