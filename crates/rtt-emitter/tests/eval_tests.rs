use super::*;
use crate::builder::CodeBuilder;
use crate::instr::LocalId;
use crate::reify::Reifier;
use crate::tables::{decode_tables, materialize_tables};
use rtt_common::RttOptions;
use rtt_runtime::RuntimeWellKnown;
use rtt_solver::fixtures::SampleProgram;
use rtt_solver::{Binder, ClassRegistry, TypeUniverse};

fn empty_tables() -> TypeTables {
    TypeTables {
        categories: Vec::new(),
        supers: Vec::new(),
        substitutions: Vec::new(),
        names: Vec::new(),
        well_known: RuntimeWellKnown {
            object: ClassId(0),
            function: ClassId(1),
            closure: ClassId(2),
            record: ClassId(3),
            future: ClassId(4),
        },
    }
}

fn code(instrs: Vec<Instr>, local_count: u32) -> Code {
    Code { instrs, local_count }
}

fn run(instrs: Vec<Instr>) -> Result<Vec<Value>, Trap> {
    let pool = ConstantPool::new();
    let tables = empty_tables();
    Machine::new(&pool, &tables).run(&code(instrs, 1), &Frame::default(), Vec::new())
}

#[test]
fn test_block_result_is_carried_by_branch() {
    let result = run(vec![
        Instr::I32Const(9),
        Instr::Block {
            result: true,
            body: vec![
                Instr::I32Const(1),
                Instr::I32Const(2),
                Instr::Br(0),
                Instr::I32Const(3),
            ],
        },
    ]);
    assert_eq!(result, Ok(vec![Value::I32(9), Value::I32(2)]));
}

#[test]
fn test_branch_leaves_nested_blocks() {
    let result = run(vec![Instr::Block {
        result: true,
        body: vec![
            Instr::Block {
                result: false,
                body: vec![Instr::I32Const(5), Instr::Br(1)],
            },
            Instr::I32Const(6),
        ],
    }]);
    assert_eq!(result, Ok(vec![Value::I32(5)]));
}

#[test]
fn test_br_if_and_br_on_null() {
    let taken = run(vec![Instr::Block {
        result: false,
        body: vec![Instr::I32Const(1), Instr::BrIf(0), Instr::I32Const(7)],
    }]);
    assert_eq!(taken, Ok(Vec::new()));

    let null = run(vec![Instr::Block {
        result: false,
        body: vec![Instr::RefNull, Instr::BrOnNull(0), Instr::I32Const(7)],
    }]);
    assert_eq!(null, Ok(Vec::new()));

    let non_null = run(vec![
        Instr::I32Const(4),
        Instr::BrOnNull(0),
        Instr::LocalTee(LocalId(0)),
    ]);
    assert_eq!(non_null, Ok(vec![Value::I32(4)]));
}

#[test]
fn test_traps() {
    assert_eq!(run(vec![Instr::Drop]), Err(Trap::StackUnderflow));
    assert_eq!(run(vec![Instr::Br(0)]), Err(Trap::BranchOutOfRange(0)));
    assert_eq!(run(vec![Instr::RefNull, Instr::ClassId]), Err(Trap::NullDereference));
    assert_eq!(run(vec![Instr::LocalGet(LocalId(4))]), Err(Trap::UnknownLocal(4)));
    assert_eq!(
        run(vec![Instr::Const(crate::constants::ConstId(0))]),
        Err(Trap::UnknownConstant(0))
    );
    assert_eq!(
        run(vec![Instr::ReceiverTypeArgument(0)]),
        Err(Trap::MissingTypeArgument(0))
    );
    assert_eq!(
        run(vec![Instr::I32Const(0), Instr::ClassId]),
        Err(Trap::TypeMismatch {
            expected: "object",
            found: "i32",
        })
    );
}

#[test]
fn test_constructed_type_uses_receiver_arguments() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let mut pool = ConstantPool::new();
    let materialized = materialize_tables(&universe, &mut pool);
    let tables = decode_tables(&pool, &materialized).expect("tables decode");

    // AsyncOr<Map<V?, int>> inside _HashMap<K, V>.
    let v = p.db.class_param(p.hierarchy.type_param_of(p.hash_map, 1), true);
    let map = p.instance(p.map, vec![v, p.int_type()]);
    let union = p.db.async_union(map, false);
    let mut builder = CodeBuilder::new();
    Reifier::new(&universe).make_type(&mut pool, &mut builder, union);
    let emitted = builder.finish();

    let string = RuntimeType::interface(p.string, Vec::new());
    let frame = Frame::new(vec![RuntimeType::DYNAMIC, string.clone()], Vec::new());
    let machine = Machine::new(&pool, &tables);
    let ty = machine.run_type(&emitted, &frame).expect("type evaluates");
    assert_eq!(
        ty,
        RuntimeType::AsyncUnion {
            nullable: false,
            arg: Box::new(RuntimeType::interface(
                p.map,
                vec![string.as_nullable(), RuntimeType::interface(p.int, Vec::new())]
            )),
        }
    );
}

#[test]
fn test_constructed_union_collapses_at_run_time() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let mut pool = ConstantPool::new();
    let materialized = materialize_tables(&universe, &mut pool);
    let tables = decode_tables(&pool, &materialized).expect("tables decode");

    let t = p.db.function_param(Binder::Frame, 0, false);
    let union = p.db.async_union(t, true);
    let mut builder = CodeBuilder::new();
    Reifier::new(&universe).make_type(&mut pool, &mut builder, union);
    let emitted = builder.finish();

    let object = p.hierarchy.well_known().object;
    let frame = Frame::new(Vec::new(), vec![RuntimeType::interface(object, Vec::new())]);
    let ty = Machine::new(&pool, &tables)
        .run_type(&emitted, &frame)
        .expect("type evaluates");
    assert_eq!(ty, RuntimeType::interface(object, Vec::new()).as_nullable());
}

#[test]
fn test_verification_mismatch_traps_with_location() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let mut pool = ConstantPool::new();
    let materialized = materialize_tables(&universe, &mut pool);
    let tables = decode_tables(&pool, &materialized).expect("tables decode");

    let string = pool.type_constant(RuntimeType::interface(p.string, Vec::new()));
    let location = pool.string("lib/main.dart:3:9");
    let instrs = vec![
        Instr::Const(string),
        Instr::I32Const(1),
        Instr::Const(location),
        Instr::Call(RuntimeHelper::VerifyTypeCheck),
    ];
    let operand = Value::object(p.int, Vec::new());
    let result = Machine::new(&pool, &tables).run_type_check(&code(instrs, 0), &Frame::default(), operand);

    let Err(Trap::Verification(mismatch)) = result else {
        panic!("expected a verification trap, got {result:?}");
    };
    assert_eq!(mismatch.location.as_deref(), Some("lib/main.dart:3:9"));
    assert!(mismatch.fast_result);
    assert!(!mismatch.general_result);
    assert_eq!(mismatch.type_description, "String");
}

#[test]
fn test_is_subtype_helper() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let mut pool = ConstantPool::new();
    let materialized = materialize_tables(&universe, &mut pool);
    let tables = decode_tables(&pool, &materialized).expect("tables decode");

    let mut builder = CodeBuilder::new();
    let list_int = p.instance(p.list, vec![p.int_type()]);
    Reifier::new(&universe).make_type(&mut pool, &mut builder, list_int);
    builder.call(RuntimeHelper::IsSubtype);
    let emitted = builder.finish();

    let machine = Machine::new(&pool, &tables);
    let int = RuntimeType::interface(p.int, Vec::new());
    let ints = Value::object(p.growable_list, vec![int]);
    let strings = Value::object(p.growable_list, vec![RuntimeType::interface(p.string, Vec::new())]);
    assert_eq!(machine.run_type_check(&emitted, &Frame::default(), ints), Ok(true));
    assert_eq!(machine.run_type_check(&emitted, &Frame::default(), strings), Ok(false));
    assert_eq!(machine.run_type_check(&emitted, &Frame::default(), Value::Null), Ok(false));
}
