use super::*;
use crate::fixtures::SampleProgram;
use crate::normalize::TypeNormalizer;
use crate::type_queries::make_nullable;
use crate::types::{FunctionShape, NamedParam, TypeParamInfo};

#[test]
fn test_format_interfaces() {
    let p = SampleProgram::new();
    let f = TypeFormatter::new(&p.db, &p.hierarchy);
    let int = p.int_type();
    let map = p.db.interface(p.map, vec![p.string_type(), int], true);
    assert_eq!(f.format(int), "int");
    assert_eq!(f.format(map), "Map<String, int>?");
    assert_eq!(f.format(TypeId::DYNAMIC), "dynamic");
    assert_eq!(f.format(TypeId::NULL), "Null");
}

#[test]
fn test_format_union_compensates_absorbed_nullability() {
    let p = SampleProgram::new();
    let db = &p.db;
    let f = TypeFormatter::new(db, &p.hierarchy);
    let n = TypeNormalizer::new(db, p.hierarchy.well_known().object);
    let int = p.int_type();
    let int_q = make_nullable(db, int);

    let written = db.async_union(int_q, false);
    let normalized = n.normalize(written);
    assert_ne!(written, normalized);
    assert_eq!(f.format(written), "AsyncOr<int?>");
    assert_eq!(f.format(normalized), "AsyncOr<int?>");
    assert_eq!(f.format(n.normalize(db.async_union(int, true))), "AsyncOr<int>?");
}

#[test]
fn test_format_functions_and_records() {
    let p = SampleProgram::new();
    let db = &p.db;
    let f = TypeFormatter::new(db, &p.hierarchy);
    let int = p.int_type();
    let string = p.string_type();

    let x = db.function_param(Binder::FunctionType(0), 0, false);
    let generic = db.function(FunctionShape {
        type_params: vec![TypeParamInfo { name: db.intern_string("X"), bound: int, default: int }],
        positional: vec![x, string],
        required_positional: 1,
        named: vec![NamedParam { name: db.intern_string("flag"), type_id: int, required: true }],
        return_type: x,
        nullable: false,
    });
    assert_eq!(f.format(generic), "<X extends int>(X0@0, [String], {required int flag}) => X0@0");

    let record = db.record(vec![int], vec![(db.intern_string("name"), string)], true);
    assert_eq!(f.format(record), "(int, {String name})?");
}

#[test]
fn test_format_erased_and_parameters() {
    let p = SampleProgram::new();
    let db = &p.db;
    let f = TypeFormatter::new(db, &p.hierarchy);
    let e = db.class_param(p.hierarchy.type_param_of(p.list, 0), true);
    assert_eq!(f.format(e), "E?");
    assert_eq!(f.format(db.erased("UserId", p.int_type(), false)), "UserId");
    assert_eq!(f.format(db.function_param(Binder::Frame, 2, false)), "T2");
}
