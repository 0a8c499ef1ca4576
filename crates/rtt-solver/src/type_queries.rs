//! Structural queries over interned source types.
//!
//! These are plain functions over `&TypeInterner` so every pass (normalizer,
//! lattice builder, reifier, synthesizer) classifies types the same way
//! without owning any state.

use crate::intern::TypeInterner;
use crate::types::{Binder, TypeData, TypeId};
use rtt_common::ClassId;

/// Whether `type_id` admits `null` as declared (no type-parameter reasoning).
pub fn is_nullable(db: &TypeInterner, type_id: TypeId) -> bool {
    match db.data(type_id) {
        TypeData::Top(_) | TypeData::Null => true,
        TypeData::Never { nullable }
        | TypeData::Interface { nullable, .. }
        | TypeData::ClassParam { nullable, .. }
        | TypeData::FunctionParam { nullable, .. } => nullable,
        TypeData::Function(shape) => db.function_shape(shape).nullable,
        TypeData::Record(shape) => db.record_shape(shape).nullable,
        TypeData::AsyncUnion { arg, nullable } => nullable || is_nullable(db, arg),
        TypeData::Erased {
            representation,
            nullable,
            ..
        } => nullable || is_nullable(db, representation),
    }
}

/// Whether a value whose static type is `type_id` may be `null` at run time.
///
/// Unlike [`is_nullable`], a type-parameter reference is potentially nullable
/// because it may be instantiated with a nullable type.
pub fn is_potentially_nullable(db: &TypeInterner, type_id: TypeId) -> bool {
    match db.data(type_id) {
        TypeData::ClassParam { .. } | TypeData::FunctionParam { .. } => true,
        TypeData::AsyncUnion { arg, nullable } => nullable || is_potentially_nullable(db, arg),
        TypeData::Erased {
            representation,
            nullable,
            ..
        } => nullable || is_potentially_nullable(db, representation),
        _ => is_nullable(db, type_id),
    }
}

/// Top types: the three top variants and the nullable universal object type.
pub fn is_top(db: &TypeInterner, object: ClassId, type_id: TypeId) -> bool {
    match db.data(type_id) {
        TypeData::Top(_) => true,
        TypeData::Interface {
            class, nullable, ..
        } => class == object && nullable,
        _ => false,
    }
}

/// The non-nullable universal object type.
pub fn is_object(db: &TypeInterner, object: ClassId, type_id: TypeId) -> bool {
    matches!(
        db.data(type_id),
        TypeData::Interface { class, nullable: false, .. } if class == object
    )
}

/// `type_id` with nullability added. Nullable bottom becomes the null type.
pub fn make_nullable(db: &TypeInterner, type_id: TypeId) -> TypeId {
    match db.data(type_id) {
        TypeData::Top(_) | TypeData::Null => type_id,
        TypeData::Never { .. } => TypeId::NULL,
        TypeData::Interface {
            class,
            args,
            nullable,
        } => {
            if nullable {
                return type_id;
            }
            db.intern(TypeData::Interface {
                class,
                args,
                nullable: true,
            })
        }
        TypeData::Function(shape) => db.function_with_nullability(shape, true),
        TypeData::Record(shape) => db.record_with_nullability(shape, true),
        TypeData::AsyncUnion { arg, .. } => db.async_union(arg, true),
        TypeData::Erased {
            name,
            representation,
            ..
        } => db.intern(TypeData::Erased {
            name,
            representation,
            nullable: true,
        }),
        TypeData::ClassParam { param, .. } => db.class_param(param, true),
        TypeData::FunctionParam { binder, index, .. } => db.function_param(binder, index, true),
    }
}

/// Strip transparent erasure wrappers, keeping the declared nullability.
pub fn erase(db: &TypeInterner, type_id: TypeId) -> TypeId {
    match db.data(type_id) {
        TypeData::Erased {
            representation,
            nullable,
            ..
        } => {
            let inner = erase(db, representation);
            if nullable {
                make_nullable(db, inner)
            } else {
                inner
            }
        }
        _ => type_id,
    }
}

/// Call `f` on each type directly nested in `type_id`.
pub fn for_each_child<F: FnMut(TypeId)>(db: &TypeInterner, type_id: TypeId, mut f: F) {
    match db.data(type_id) {
        TypeData::Interface { args, .. } => {
            for &arg in db.type_list(args).iter() {
                f(arg);
            }
        }
        TypeData::Function(shape) => {
            for child in db.function_shape(shape).child_types() {
                f(child);
            }
        }
        TypeData::Record(shape) => {
            for child in db.record_shape(shape).field_types() {
                f(child);
            }
        }
        TypeData::AsyncUnion { arg, .. } => f(arg),
        TypeData::Erased { representation, .. } => f(representation),
        TypeData::Top(_)
        | TypeData::Never { .. }
        | TypeData::Null
        | TypeData::ClassParam { .. }
        | TypeData::FunctionParam { .. } => {}
    }
}

/// Whether `type_id` mentions a class type parameter or the current frame's
/// function type parameters anywhere inside it.
///
/// References bound by an enclosing function type do not count: they are
/// resolved relative to that function type and need no run-time environment.
pub fn contains_environment_parameter(db: &TypeInterner, type_id: TypeId) -> bool {
    let mut stack = vec![type_id];
    while let Some(current) = stack.pop() {
        match db.data(current) {
            TypeData::ClassParam { .. }
            | TypeData::FunctionParam {
                binder: Binder::Frame,
                ..
            } => return true,
            _ => for_each_child(db, current, |child| stack.push(child)),
        }
    }
    false
}

#[cfg(test)]
#[path = "../tests/type_queries_tests.rs"]
mod tests;
