//! Sharing one `TypeUniverse` between worker threads.
//!
//! Workers synthesize checks for different call sites against the same
//! memoized lattice, tables and function-type offsets; the results must match
//! a sequential run.

use rayon::prelude::*;
use rtt::emitter::{Code, CodeBuilder, ConstantPool, Reifier, TypeCheckPlan, TypeCheckSynthesizer};
use rtt::runtime::RuntimeType;
use rtt::solver::fixtures::SampleProgram;
use rtt::solver::{
    Binder, ClassRegistry, FunctionShape, FunctionTypeIndexer, TypeId, TypeInterner,
    TypeParamInfo, TypeUniverse,
};
use rtt::RttOptions;

fn generic(db: &TypeInterner, params: &[&str], positional: Vec<TypeId>, ret: TypeId) -> TypeId {
    let type_params = params
        .iter()
        .map(|name| TypeParamInfo {
            name: db.intern_string(name),
            bound: TypeId::DYNAMIC,
            default: TypeId::DYNAMIC,
        })
        .collect();
    db.function(FunctionShape {
        type_params,
        ..FunctionShape::simple(positional, ret)
    })
}

/// `F0<T0>(F1<T1>(... Fn<Tn>(T0, ..., Tn) => Tn ...) => void) => void`,
/// innermost first.
fn nested_chain(db: &TypeInterner, depth: u32) -> Vec<TypeId> {
    let innermost_params = (0..=depth)
        .map(|d| db.function_param(Binder::FunctionType(d), 0, false))
        .collect();
    let mut chain = vec![generic(
        db,
        &["T"],
        innermost_params,
        db.function_param(Binder::FunctionType(0), 0, false),
    )];
    for _ in 0..depth {
        let inner = *chain.last().expect("chain is non-empty");
        chain.push(generic(db, &["T"], vec![inner], TypeId::VOID));
    }
    chain
}

/// Outermost member of a chain; the only one with no free references.
fn closed_chain(db: &TypeInterner, depth: u32) -> TypeId {
    *nested_chain(db, depth).last().expect("chain is non-empty")
}

fn call_sites(p: &SampleProgram) -> Vec<(TypeId, TypeId)> {
    let db = &p.db;
    let wk = p.hierarchy.well_known();
    let any = p.object_type(true);
    let int = p.int_type();
    let string = p.string_type();
    let mut sites = vec![
        (p.object_type(false), any),
        (p.instance(wk.function, Vec::new()), any),
        (p.instance(p.uninstantiable, Vec::new()), any),
        (db.interface(p.hash_map, vec![TypeId::DYNAMIC, TypeId::DYNAMIC], true), any),
        (p.instance(p.list, vec![int]), db.interface(p.iterable, vec![int], true)),
        (p.instance(p.list, vec![int]), any),
        (p.instance(p.map, vec![int, string]), any),
        (db.async_union(p.instance(p.list, vec![string]), true), any),
        (db.record(vec![int, string], Vec::new(), false), any),
    ];
    for depth in 0..6 {
        sites.push((closed_chain(db, depth), any));
    }
    sites
}

fn synthesize(universe: &TypeUniverse<'_>, tested: TypeId, operand_static: TypeId) -> (TypeCheckPlan, Code, usize) {
    let mut pool = ConstantPool::new();
    let mut code = CodeBuilder::new();
    let plan = TypeCheckSynthesizer::new(universe).emit_check(&mut pool, &mut code, tested, operand_static, None);
    (plan, code.finish(), pool.len())
}

#[test]
fn parallel_type_checks_match_sequential_synthesis() {
    let p = SampleProgram::new();
    let options = RttOptions::default().with_verify_type_checks(true);
    let sites = call_sites(&p);

    let sequential_universe = TypeUniverse::new(&p.db, &p.hierarchy, options);
    let sequential: Vec<_> = sites
        .iter()
        .map(|&(tested, operand_static)| synthesize(&sequential_universe, tested, operand_static))
        .collect();

    // Fresh universe: the shared artifacts are first built under contention.
    let shared = TypeUniverse::new(&p.db, &p.hierarchy, options);
    let parallel: Vec<_> = (0..8)
        .into_par_iter()
        .flat_map_iter(|_| sites.iter())
        .map(|&(tested, operand_static)| synthesize(&shared, tested, operand_static))
        .collect();

    for (round, chunk) in parallel.chunks(sites.len()).enumerate() {
        assert_eq!(chunk, sequential.as_slice(), "round {round} diverged");
    }
    assert_eq!(shared.flattened(), sequential_universe.flattened());
    assert_eq!(shared.categories(), sequential_universe.categories());
}

#[test]
fn parallel_function_offsets_match_sequential_indexer() {
    let p = SampleProgram::new();
    let chain = nested_chain(&p.db, 32);

    let sequential = FunctionTypeIndexer::new();
    let expected: Vec<u32> = chain
        .iter()
        .map(|&f| sequential.offset_of_type(&p.db, f))
        .collect();
    // Each level mentions its own parameter from the innermost body.
    for (level, &offset) in expected.iter().enumerate() {
        assert_eq!(offset, level as u32);
    }

    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    // Outermost first, so most workers start from an unmemoized root.
    let mut actual: Vec<u32> = chain
        .par_iter()
        .rev()
        .map(|&f| universe.function_types().offset_of_type(&p.db, f))
        .collect();
    actual.reverse();
    assert_eq!(actual, expected);
    assert_eq!(universe.function_types().memoized_count(), chain.len());
}

#[test]
fn parallel_reification_of_generic_function_types() {
    let p = SampleProgram::new();
    let universe = TypeUniverse::new(&p.db, &p.hierarchy, RttOptions::default());
    let closed: Vec<TypeId> = (0..=12).map(|depth| closed_chain(&p.db, depth)).collect();

    let sequential: Vec<RuntimeType> = {
        let mut reifier = Reifier::new(&universe);
        closed.iter().map(|&f| reifier.constant_type(f)).collect()
    };
    let parallel: Vec<RuntimeType> = closed
        .par_iter()
        .map(|&f| Reifier::new(&universe).constant_type(f))
        .collect();
    assert_eq!(parallel, sequential);

    let RuntimeType::Function(outer) = sequential.last().expect("types were reified") else {
        panic!("expected a function type");
    };
    assert_eq!(outer.type_param_offset, 12);
}
