//! Type normalization.
//!
//! Canonicalizes a type before the lattice builder, reifier or synthesizer
//! sees it. Only two shapes are rewritten:
//!
//! - nullable bottom becomes the canonical null type
//! - the absorbing union `AsyncOr<S>` collapses or absorbs nullability
//!
//! Every other variant is already canonical after resolution and is returned
//! as is. The union rule deliberately ORs the argument's nullability into the
//! union; [`TypeFormatter`](crate::TypeFormatter) undoes that when printing.

use crate::intern::TypeInterner;
use crate::type_queries::{is_nullable, is_object, is_top, make_nullable};
use crate::types::{TypeData, TypeId};
use rtt_common::ClassId;

pub struct TypeNormalizer<'a> {
    db: &'a TypeInterner,
    object: ClassId,
}

impl<'a> TypeNormalizer<'a> {
    pub fn new(db: &'a TypeInterner, object: ClassId) -> Self {
        TypeNormalizer { db, object }
    }

    /// Normalize `type_id`. Pure, total and idempotent.
    pub fn normalize(&self, type_id: TypeId) -> TypeId {
        match self.db.data(type_id) {
            TypeData::Never { nullable: true } => TypeId::NULL,
            TypeData::AsyncUnion { arg, nullable } => self.normalize_async_union(arg, nullable),
            TypeData::Top(_)
            | TypeData::Never { nullable: false }
            | TypeData::Null
            | TypeData::Interface { .. }
            | TypeData::Function(_)
            | TypeData::Record(_)
            | TypeData::Erased { .. }
            | TypeData::ClassParam { .. }
            | TypeData::FunctionParam { .. } => type_id,
        }
    }

    fn normalize_async_union(&self, arg: TypeId, nullable: bool) -> TypeId {
        let db = self.db;
        let s = self.normalize(arg);

        if is_top(db, self.object, s) || is_object(db, self.object, s) {
            return if nullable { make_nullable(db, s) } else { s };
        }
        match db.data(s) {
            TypeData::Never { .. } => db.async_union(TypeId::NEVER, false),
            TypeData::Null => db.async_union(TypeId::NULL, true),
            _ => db.async_union(s, nullable || is_nullable(db, s)),
        }
    }
}

#[cfg(test)]
#[path = "../tests/normalize_tests.rs"]
mod tests;
