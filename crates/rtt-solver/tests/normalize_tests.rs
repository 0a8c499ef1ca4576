use super::*;
use crate::class_hierarchy::ClassRegistry;
use crate::fixtures::SampleProgram;
use crate::types::{Binder, FunctionShape};

fn normalizer(p: &SampleProgram) -> TypeNormalizer<'_> {
    TypeNormalizer::new(&p.db, p.hierarchy.well_known().object)
}

#[test]
fn test_nullable_never_becomes_null() {
    let p = SampleProgram::new();
    let n = normalizer(&p);
    assert_eq!(n.normalize(p.db.never(true)), TypeId::NULL);
    assert_eq!(n.normalize(TypeId::NEVER), TypeId::NEVER);
}

#[test]
fn test_union_of_never_is_fixed_point() {
    let p = SampleProgram::new();
    let n = normalizer(&p);
    let union = p.db.async_union(TypeId::NEVER, false);
    assert_eq!(n.normalize(union), union);
}

#[test]
fn test_union_of_nullable_never_becomes_nullable_union_of_null() {
    let p = SampleProgram::new();
    let n = normalizer(&p);
    let union = p.db.async_union(p.db.never(true), false);
    assert_eq!(n.normalize(union), p.db.async_union(TypeId::NULL, true));
}

#[test]
fn test_union_collapses_over_top_and_object() {
    let p = SampleProgram::new();
    let n = normalizer(&p);
    let db = &p.db;
    assert_eq!(n.normalize(db.async_union(TypeId::DYNAMIC, false)), TypeId::DYNAMIC);
    assert_eq!(n.normalize(db.async_union(TypeId::VOID, true)), TypeId::VOID);

    let object = p.object_type(false);
    assert_eq!(n.normalize(db.async_union(object, false)), object);
    assert_eq!(n.normalize(db.async_union(object, true)), p.object_type(true));
    assert_eq!(n.normalize(db.async_union(p.object_type(true), false)), p.object_type(true));
}

#[test]
fn test_union_absorbs_argument_nullability() {
    let p = SampleProgram::new();
    let n = normalizer(&p);
    let db = &p.db;
    let int = p.int_type();
    let int_q = make_nullable(db, int);

    assert_eq!(n.normalize(db.async_union(int, false)), db.async_union(int, false));
    assert_eq!(n.normalize(db.async_union(int, true)), db.async_union(int, true));
    assert_eq!(n.normalize(db.async_union(int_q, false)), db.async_union(int_q, true));
}

#[test]
fn test_nested_unions_normalize_inside_out() {
    let p = SampleProgram::new();
    let n = normalizer(&p);
    let db = &p.db;
    let inner = db.async_union(TypeId::DYNAMIC, false);
    let outer = db.async_union(inner, false);
    assert_eq!(n.normalize(outer), TypeId::DYNAMIC);

    let inner = db.async_union(db.never(true), false);
    let outer = db.async_union(inner, false);
    let expected = db.async_union(db.async_union(TypeId::NULL, true), true);
    assert_eq!(n.normalize(outer), expected);
}

#[test]
fn test_other_variants_are_unchanged() {
    let p = SampleProgram::new();
    let n = normalizer(&p);
    let db = &p.db;
    let samples = [
        p.int_type(),
        p.instance(p.list, vec![db.never(true)]),
        db.function(FunctionShape::simple(vec![p.int_type()], TypeId::VOID)),
        db.record(vec![p.int_type()], Vec::new(), true),
        db.erased("Id", p.int_type(), false),
        db.function_param(Binder::Frame, 0, true),
        TypeId::NULL,
        TypeId::INVALID,
    ];
    for t in samples {
        assert_eq!(n.normalize(t), t);
    }
}

#[test]
fn test_normalization_is_idempotent() {
    let p = SampleProgram::new();
    let n = normalizer(&p);
    let db = &p.db;
    let int = p.int_type();
    let int_q = make_nullable(db, int);
    let future_int = p.instance(p.hierarchy.well_known().future, vec![int]);
    let bases = [
        TypeId::DYNAMIC,
        TypeId::VOID,
        TypeId::NEVER,
        db.never(true),
        TypeId::NULL,
        int,
        int_q,
        future_int,
        p.object_type(false),
        p.object_type(true),
    ];

    let mut samples = Vec::new();
    for &base in &bases {
        samples.push(base);
        for nullable in [false, true] {
            let once = db.async_union(base, nullable);
            samples.push(once);
            samples.push(db.async_union(once, nullable));
            samples.push(db.async_union(once, !nullable));
        }
    }

    for t in samples {
        let once = n.normalize(t);
        assert_eq!(n.normalize(once), once, "not idempotent for {:?}", db.data(t));
    }
}
