//! End-to-end scenarios for the runtime-type passes.
//!
//! Each test builds a small program, runs the compile-time passes and, where
//! code is emitted, executes it with the reference evaluator.

use rtt::common::limits::type_category;
use rtt::emitter::{
    CodeBuilder, ConstantPool, Frame, Instr, Machine, TypeCheckStrategy, TypeCheckSynthesizer,
    decode_tables, materialize_tables,
};
use rtt::runtime::{RuntimeType, Value};
use rtt::solver::fixtures::SampleProgram;
use rtt::solver::{ClassHierarchy, ClassRegistry, TypeId, TypeInterner, TypeUniverse};
use rtt::{ClassId, RttOptions};

#[test]
fn normalizing_union_over_never_is_a_fixed_point() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let union = p.db.async_union(TypeId::NEVER, false);
    let normalized = universe.normalize(union);
    assert_eq!(normalized, union);
    assert_eq!(universe.normalize(normalized), normalized);
}

#[test]
fn normalizing_nullable_never_gives_null() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    assert_eq!(universe.normalize(p.db.never(true)), TypeId::NULL);
}

#[test]
fn list_test_against_iterable_skips_argument_reification() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let list_int = p.instance(p.list, vec![p.int_type()]);
    let iterable_int = p.instance(p.iterable, vec![p.int_type()]);

    let mut pool = ConstantPool::new();
    let mut code = CodeBuilder::new();
    let plan = TypeCheckSynthesizer::new(&universe).emit_check(
        &mut pool,
        &mut code,
        list_int,
        iterable_int,
        None,
    );
    let code = code.finish();

    assert!(matches!(plan.strategy, TypeCheckStrategy::ClassSet(_)));
    assert!(!code.contains(|i| matches!(i, Instr::Const(_) | Instr::Call(_))));

    let materialized = materialize_tables(&universe, &mut pool);
    let tables = decode_tables(&pool, &materialized).expect("tables decode");
    let machine = Machine::new(&pool, &tables);
    let int = RuntimeType::interface(p.int, Vec::new());
    for class in [p.growable_list, p.fixed_list] {
        let value = Value::object(class, vec![int.clone()]);
        assert_eq!(machine.run_type_check(&code, &Frame::default(), value), Ok(true));
    }
    let int_list = Value::object(p.int_list, Vec::new());
    assert_eq!(machine.run_type_check(&code, &Frame::default(), int_list), Ok(true));
}

/// `Shape` (abstract) with a single concrete implementation at class id 42.
fn single_implementation_program() -> (TypeInterner, ClassHierarchy, ClassId, ClassId) {
    let db = TypeInterner::new();
    let mut h = ClassHierarchy::with_core(&db);
    let shape = h.declare_class(&db, "Shape", &[]);
    h.set_abstract(shape, true);
    let shape_type = db.interface(shape, Vec::new(), false);
    while h.class_count() < 42 {
        let name = format!("Filler{}", h.class_count());
        h.declare_class(&db, &name, &[]);
    }
    let circle = h.declare_class(&db, "Circle", &[]);
    h.add_supertype(&db, circle, shape_type);
    (db, h, shape, circle)
}

#[test]
fn single_concrete_subclass_is_one_identity_comparison() {
    let (db, h, shape, circle) = single_implementation_program();
    assert_eq!(circle, ClassId(42));
    let universe = TypeUniverse::new(&db, &h, RttOptions::default());
    let shape_type = db.interface(shape, Vec::new(), false);
    let object = db.interface(h.well_known().object, Vec::new(), false);

    let mut pool = ConstantPool::new();
    let mut code = CodeBuilder::new();
    let plan =
        TypeCheckSynthesizer::new(&universe).emit_check(&mut pool, &mut code, shape_type, object, None);
    let code = code.finish();

    assert_eq!(plan.strategy, TypeCheckStrategy::SingleClass(ClassId(42)));
    assert_eq!(
        &code.instrs[1..],
        &[Instr::LocalGet(rtt::emitter::LocalId(0)), Instr::ClassId, Instr::I32Const(42), Instr::I32Eq]
    );

    let materialized = materialize_tables(&universe, &mut pool);
    let tables = decode_tables(&pool, &materialized).expect("tables decode");
    let machine = Machine::new(&pool, &tables);
    let circle_value = Value::object(circle, Vec::new());
    let filler = Value::object(ClassId(41), Vec::new());
    assert_eq!(machine.run_type_check(&code, &Frame::default(), circle_value), Ok(true));
    assert_eq!(machine.run_type_check(&code, &Frame::default(), filler), Ok(false));
}

#[test]
fn uninstantiable_class_test_is_constant_false() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let uninstantiable = p.instance(p.uninstantiable, Vec::new());

    let mut pool = ConstantPool::new();
    let mut code = CodeBuilder::new();
    let plan = TypeCheckSynthesizer::new(&universe).emit_check(
        &mut pool,
        &mut code,
        uninstantiable,
        p.object_type(false),
        None,
    );
    let code = code.finish();
    assert_eq!(plan.strategy, TypeCheckStrategy::AlwaysFalse);
    assert!(!code.contains(|i| *i == Instr::ClassId));

    let materialized = materialize_tables(&universe, &mut pool);
    let tables = decode_tables(&pool, &materialized).expect("tables decode");
    let machine = Machine::new(&pool, &tables);
    let int = RuntimeType::interface(p.int, Vec::new());
    let operands = [
        Value::object(p.int, Vec::new()),
        Value::object(p.string, Vec::new()),
        Value::object(p.growable_list, vec![int.clone()]),
        Value::object(p.hash_map, vec![int.clone(), int]),
    ];
    for operand in operands {
        assert_eq!(machine.run_type_check(&code, &Frame::default(), operand), Ok(false));
    }
}

#[test]
fn masquerading_pair_category_table() {
    let db = TypeInterner::new();
    let mut h = ClassHierarchy::with_core(&db);
    h.declare_class(&db, "A", &[]);
    h.declare_class(&db, "B", &[]);
    let canonical = h.declare_class(&db, "Canonical", &[]);
    let boxed = h.declare_class(&db, "Boxed", &[]);
    let canonical_type = db.interface(canonical, Vec::new(), false);
    h.add_supertype(&db, boxed, canonical_type);
    h.set_masquerade(boxed, canonical);
    assert_eq!(canonical, ClassId(7));

    let universe = TypeUniverse::new(&db, &h, RttOptions::default());
    let categories = universe.categories();
    assert_eq!(categories.category(boxed), 7);
    assert_eq!(categories.category(canonical), type_category::NOT_MASQUERADED);

    // A boxed instance reports the canonical class at run time.
    let mut pool = ConstantPool::new();
    let materialized = materialize_tables(&universe, &mut pool);
    let tables = decode_tables(&pool, &materialized).expect("tables decode");
    assert_eq!(
        tables.runtime_type_of(&Value::object(boxed, Vec::new())),
        RuntimeType::interface(canonical, Vec::new())
    );
}
