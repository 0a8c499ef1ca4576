use super::*;
use crate::instr::Code;
use rtt_common::RttOptions;
use rtt_solver::fixtures::SampleProgram;
use rtt_solver::{FunctionShape, TypeParamInfo};

fn reify(universe: &TypeUniverse<'_>, type_id: TypeId) -> (ConstantPool, Code) {
    let mut pool = ConstantPool::new();
    let mut code = CodeBuilder::new();
    Reifier::new(universe).make_type(&mut pool, &mut code, type_id);
    (pool, code.finish())
}

/// The constant a single-constant reification refers to.
fn single_constant(pool: &ConstantPool, code: &Code) -> RuntimeType {
    match code.instrs.as_slice() {
        [Instr::Const(id)] => match pool.get(*id) {
            crate::constants::Constant::Type(ty) => ty.clone(),
            other => panic!("not a type constant: {other:?}"),
        },
        other => panic!("expected a single constant, got {other:?}"),
    }
}

fn type_param(p: &SampleProgram, name: &str) -> TypeParamInfo {
    TypeParamInfo {
        name: p.db.intern_string(name),
        bound: TypeId::DYNAMIC,
        default: TypeId::DYNAMIC,
    }
}

#[test]
fn test_constant_interface_is_one_constant() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let list_int = p.instance(p.list, vec![p.int_type()]);

    let (pool, code) = reify(&universe, list_int);
    let ty = single_constant(&pool, &code);
    assert_eq!(
        ty,
        RuntimeType::interface(p.list, vec![RuntimeType::interface(p.int, Vec::new())])
    );
}

#[test]
fn test_intrinsics_are_constants() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let mut reifier = Reifier::new(&universe);
    assert_eq!(reifier.constant_type(TypeId::VOID), RuntimeType::Top(RuntimeTopKind::Void));
    assert_eq!(reifier.constant_type(TypeId::NEVER), RuntimeType::Never);
    assert_eq!(reifier.constant_type(p.db.never(true)), RuntimeType::Null);
}

#[test]
fn test_erased_type_reifies_as_representation() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let meters = p.db.erased("Meters", p.int_type(), true);
    let list_meters = p.instance(p.list, vec![meters]);

    let mut reifier = Reifier::new(&universe);
    let int = RuntimeType::interface(p.int, Vec::new());
    assert_eq!(reifier.constant_type(meters), int.as_nullable());
    assert_eq!(
        reifier.constant_type(list_meters),
        RuntimeType::interface(p.list, vec![int.as_nullable()])
    );
}

#[test]
fn test_union_constants_are_normalized() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let mut reifier = Reifier::new(&universe);

    let over_object = p.db.async_union(p.object_type(false), true);
    assert_eq!(
        reifier.constant_type(over_object),
        RuntimeType::Interface {
            class: universe.well_known().object,
            nullable: true,
            args: Vec::new(),
        }
    );

    let nullable_int = p.db.interface(p.int, Vec::new(), true);
    let over_nullable = p.db.async_union(nullable_int, false);
    assert_eq!(
        reifier.constant_type(over_nullable),
        RuntimeType::AsyncUnion {
            nullable: true,
            arg: Box::new(RuntimeType::interface(p.int, Vec::new()).as_nullable()),
        }
    );
}

#[test]
fn test_class_parameter_reads_receiver() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let e = p.db.class_param(p.hierarchy.type_param_of(p.growable_list, 0), false);
    let list_e = p.instance(p.list, vec![e]);
    universe.lattice();

    let (_, code) = reify(&universe, list_e);
    assert_eq!(
        code.instrs,
        vec![
            Instr::I32Const(p.list.0 as i32),
            Instr::I32Const(0),
            Instr::ReceiverTypeArgument(0),
            Instr::ArrayNewFixed { len: 1 },
            Instr::StructNew(StructKind::InterfaceType),
        ]
    );
}

#[test]
fn test_nullable_class_parameter_wraps() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let v = p.db.class_param(p.hierarchy.type_param_of(p.hash_map, 1), true);

    let (_, code) = reify(&universe, v);
    assert_eq!(
        code.instrs,
        vec![
            Instr::ReceiverTypeArgument(1),
            Instr::Call(RuntimeHelper::AsNullable),
        ]
    );
}

#[test]
fn test_frame_parameter_reads_frame() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let t = p.db.function_param(Binder::Frame, 2, false);
    let union = p.db.async_union(t, false);

    let (_, code) = reify(&universe, union);
    assert_eq!(
        code.instrs,
        vec![
            Instr::I32Const(0),
            Instr::FrameTypeParameter(2),
            Instr::Call(RuntimeHelper::CreateNormalizedAsyncUnion),
        ]
    );
}

#[test]
fn test_generic_function_type_uses_offsets() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());

    // <X>() => <Y>(X) => Y
    let inner = p.db.function(FunctionShape {
        type_params: vec![type_param(&p, "Y")],
        positional: vec![p.db.function_param(Binder::FunctionType(1), 0, false)],
        required_positional: 1,
        named: Vec::new(),
        return_type: p.db.function_param(Binder::FunctionType(0), 0, false),
        nullable: false,
    });
    let outer = p.db.function(FunctionShape {
        type_params: vec![type_param(&p, "X")],
        positional: Vec::new(),
        required_positional: 0,
        named: Vec::new(),
        return_type: inner,
        nullable: false,
    });

    let (pool, code) = reify(&universe, outer);
    let RuntimeType::Function(outer) = single_constant(&pool, &code) else {
        panic!("expected a function type");
    };
    assert_eq!(outer.type_param_offset, 1);
    let RuntimeType::Function(inner) = &outer.return_type else {
        panic!("expected a function return type");
    };
    assert_eq!(inner.type_param_offset, 0);
    assert_eq!(
        inner.positional,
        vec![RuntimeType::FunctionParam { index: 1, nullable: false }]
    );
    assert_eq!(
        inner.return_type,
        RuntimeType::FunctionParam { index: 0, nullable: false }
    );
}

#[test]
fn test_function_with_environment_is_constructed() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let t = p.db.class_param(p.hierarchy.type_param_of(p.future_impl, 0), false);
    let flag = p.db.intern_string("flag");
    let function = p.db.function(FunctionShape {
        type_params: Vec::new(),
        positional: vec![t],
        required_positional: 1,
        named: vec![rtt_solver::NamedParam {
            name: flag,
            type_id: p.int_type(),
            required: false,
        }],
        return_type: TypeId::VOID,
        nullable: false,
    });

    let (_, code) = reify(&universe, function);
    assert_eq!(code.instrs.last(), Some(&Instr::StructNew(StructKind::FunctionType)));
    assert!(code.contains(|i| *i == Instr::ReceiverTypeArgument(0)));
    // Constant named parameters are pooled whole.
    assert!(!code.contains(|i| *i == Instr::StructNew(StructKind::NamedParameter)));
}

#[test]
fn test_table_type_maps_class_parameters() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    universe.lattice();
    let k = p.db.class_param(p.hierarchy.type_param_of(p.swapped_map, 0), false);
    let v = p.db.class_param(p.hierarchy.type_param_of(p.swapped_map, 1), true);
    let map_vk = p.instance(p.map, vec![v, k]);

    let mut reifier = Reifier::new(&universe);
    assert_eq!(
        reifier.table_type(map_vk),
        RuntimeType::interface(
            p.map,
            vec![
                RuntimeType::InterfaceParam { index: 1, nullable: true },
                RuntimeType::InterfaceParam { index: 0, nullable: false },
            ]
        )
    );
}

#[test]
#[should_panic(expected = "free function type parameter")]
fn test_free_function_parameter_is_fatal() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let free = p.db.function_param(Binder::FunctionType(0), 0, false);
    Reifier::new(&universe).constant_type(free);
}
