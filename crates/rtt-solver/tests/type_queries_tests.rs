use super::*;
use crate::class_hierarchy::ClassRegistry;
use crate::fixtures::SampleProgram;
use crate::types::{Binder, FunctionShape, TypeParamId};

#[test]
fn test_nullability_queries() {
    let p = SampleProgram::new();
    let db = &p.db;
    let int = p.int_type();
    assert!(!is_nullable(db, int));
    assert!(is_nullable(db, make_nullable(db, int)));
    assert!(is_nullable(db, TypeId::DYNAMIC));
    assert!(is_nullable(db, TypeId::NULL));
    assert!(!is_nullable(db, TypeId::NEVER));

    let union_over_nullable = db.async_union(make_nullable(db, int), false);
    assert!(is_nullable(db, union_over_nullable));
}

#[test]
fn test_type_parameters_are_potentially_nullable() {
    let db = TypeInterner::new();
    let t = db.class_param(TypeParamId(0), false);
    assert!(!is_nullable(&db, t));
    assert!(is_potentially_nullable(&db, t));
    let x = db.function_param(Binder::Frame, 0, false);
    assert!(is_potentially_nullable(&db, x));
}

#[test]
fn test_top_and_object() {
    let p = SampleProgram::new();
    let object = p.hierarchy.well_known().object;
    let db = &p.db;
    assert!(is_top(db, object, TypeId::VOID));
    assert!(is_top(db, object, p.object_type(true)));
    assert!(!is_top(db, object, p.object_type(false)));
    assert!(is_object(db, object, p.object_type(false)));
    assert!(!is_object(db, object, p.int_type()));
}

#[test]
fn test_make_nullable_never_is_null() {
    let db = TypeInterner::new();
    assert_eq!(make_nullable(&db, TypeId::NEVER), TypeId::NULL);
    assert_eq!(make_nullable(&db, TypeId::DYNAMIC), TypeId::DYNAMIC);
}

#[test]
fn test_make_nullable_function_keeps_shape() {
    let db = TypeInterner::new();
    let f = db.function(FunctionShape::simple(vec![TypeId::DYNAMIC], TypeId::VOID));
    let nf = make_nullable(&db, f);
    assert_ne!(f, nf);
    assert!(is_nullable(&db, nf));
    assert_eq!(make_nullable(&db, nf), nf);
}

#[test]
fn test_erase_strips_wrappers() {
    let p = SampleProgram::new();
    let db = &p.db;
    let int = p.int_type();
    let id = db.erased("UserId", int, false);
    assert_eq!(erase(db, id), int);
    let nullable_id = db.erased("UserId", int, true);
    assert_eq!(erase(db, nullable_id), make_nullable(db, int));
}

#[test]
fn test_environment_parameter_detection() {
    let p = SampleProgram::new();
    let db = &p.db;
    let e = db.class_param(p.hierarchy.type_param_of(p.list, 0), false);
    let list_e = p.instance(p.list, vec![e]);
    assert!(contains_environment_parameter(db, list_e));
    assert!(!contains_environment_parameter(db, p.instance(p.list, vec![p.int_type()])));

    let bound = db.function_param(Binder::FunctionType(0), 0, false);
    let generic = db.function(FunctionShape {
        type_params: vec![crate::types::TypeParamInfo {
            name: db.intern_string("X"),
            bound: TypeId::DYNAMIC,
            default: TypeId::DYNAMIC,
        }],
        ..FunctionShape::simple(vec![bound], bound)
    });
    assert!(!contains_environment_parameter(db, generic));
}
