//! Class type-parameter substitution.

use crate::intern::TypeInterner;
use crate::type_queries::make_nullable;
use crate::types::{FunctionShape, NamedParam, RecordShape, TypeData, TypeId, TypeParamId, TypeParamInfo};
use rustc_hash::FxHashMap;

/// Mapping from class type parameters to the types replacing them.
pub type Substitution = FxHashMap<TypeParamId, TypeId>;

/// Replace every class type-parameter reference in `type_id` that `subst`
/// maps. A nullable reference becomes the nullable replacement.
///
/// Replacement types are closed with respect to function-type binders, so no
/// binder depths need shifting when substituting under a function type.
pub fn substitute(db: &TypeInterner, type_id: TypeId, subst: &Substitution) -> TypeId {
    if subst.is_empty() {
        return type_id;
    }
    match db.data(type_id) {
        TypeData::ClassParam { param, nullable } => match subst.get(&param) {
            Some(&replacement) if nullable => make_nullable(db, replacement),
            Some(&replacement) => replacement,
            None => type_id,
        },
        TypeData::Interface {
            class,
            args,
            nullable,
        } => {
            let list = db.type_list(args);
            let new_args: Vec<TypeId> = list.iter().map(|&a| substitute(db, a, subst)).collect();
            if new_args.as_slice() == &*list {
                return type_id;
            }
            db.interface(class, new_args, nullable)
        }
        TypeData::Function(shape_id) => {
            let shape = db.function_shape(shape_id);
            let new_shape = FunctionShape {
                type_params: shape
                    .type_params
                    .iter()
                    .map(|p| TypeParamInfo {
                        name: p.name,
                        bound: substitute(db, p.bound, subst),
                        default: substitute(db, p.default, subst),
                    })
                    .collect(),
                positional: shape
                    .positional
                    .iter()
                    .map(|&t| substitute(db, t, subst))
                    .collect(),
                required_positional: shape.required_positional,
                named: shape
                    .named
                    .iter()
                    .map(|n| NamedParam {
                        name: n.name,
                        type_id: substitute(db, n.type_id, subst),
                        required: n.required,
                    })
                    .collect(),
                return_type: substitute(db, shape.return_type, subst),
                nullable: shape.nullable,
            };
            if new_shape == *shape {
                return type_id;
            }
            db.function_from_shape(new_shape)
        }
        TypeData::Record(shape_id) => {
            let shape = db.record_shape(shape_id);
            let new_shape = RecordShape {
                positional: shape
                    .positional
                    .iter()
                    .map(|&t| substitute(db, t, subst))
                    .collect(),
                named: shape
                    .named
                    .iter()
                    .map(|&(name, t)| (name, substitute(db, t, subst)))
                    .collect(),
                nullable: shape.nullable,
            };
            if new_shape == *shape {
                return type_id;
            }
            db.record_from_shape(new_shape)
        }
        TypeData::AsyncUnion { arg, nullable } => {
            let new_arg = substitute(db, arg, subst);
            if new_arg == arg {
                return type_id;
            }
            db.async_union(new_arg, nullable)
        }
        TypeData::Erased {
            name,
            representation,
            nullable,
        } => {
            let new_repr = substitute(db, representation, subst);
            if new_repr == representation {
                return type_id;
            }
            db.intern(TypeData::Erased {
                name,
                representation: new_repr,
                nullable,
            })
        }
        TypeData::Top(_)
        | TypeData::Never { .. }
        | TypeData::Null
        | TypeData::FunctionParam { .. } => type_id,
    }
}

/// Build a substitution mapping `params[i]` to `args[i]`.
pub fn substitution_from(params: &[TypeParamId], args: &[TypeId]) -> Substitution {
    params.iter().copied().zip(args.iter().copied()).collect()
}
