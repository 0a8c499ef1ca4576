//! Type-check synthesis.
//!
//! Emits code for `operand is T`. The operand is on the stack; the emitted
//! sequence replaces it with an `i32` boolean.
//!
//! A check is first classified into a [`TypeCheckStrategy`]:
//!
//! - `T` is not an interface type, or its type arguments may matter: reify
//!   `T` and call the general subtype algorithm
//! - `T` is `Object`: always true for non-null operands
//! - `T` is `Function`: a closure tag test
//! - otherwise compare the operand's class identity with the concrete
//!   subclasses of `T`'s class (none, one, or several)
//!
//! Fast paths branch around a null operand when the static type admits null
//! and produce `T`'s nullability directly there. Under verification mode each
//! fast-path result is rechecked against the general algorithm at run time.

use crate::builder::CodeBuilder;
use crate::constants::ConstantPool;
use crate::instr::{Instr, RuntimeHelper};
use crate::reify::Reifier;
use rtt_common::{ClassId, ice};
use rtt_solver::substitute::{substitute, substitution_from};
use rtt_solver::type_queries::{erase, is_potentially_nullable, is_top};
use rtt_solver::{TypeData, TypeId, TypeUniverse};
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeCheckStrategy {
    /// Reify the tested type and run the general algorithm.
    General,
    AlwaysTrue,
    /// Test for the closure representation.
    ClosureTag,
    /// No concrete class can satisfy the test.
    AlwaysFalse,
    SingleClass(ClassId),
    /// Ascending class identities; any match succeeds.
    ClassSet(Vec<ClassId>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeCheckPlan {
    pub strategy: TypeCheckStrategy,
    /// Result for a null operand, when the operand may be null and the
    /// strategy needs a separate null branch.
    pub null_result: Option<bool>,
}

impl TypeCheckPlan {
    fn general() -> Self {
        TypeCheckPlan {
            strategy: TypeCheckStrategy::General,
            null_result: None,
        }
    }

    pub fn is_fast_path(&self) -> bool {
        self.strategy != TypeCheckStrategy::General
    }
}

/// Where a type test appears in source, reported on verification failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: Arc<str>,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: &str, line: u32, column: u32) -> Self {
        SourceLocation {
            file: Arc::from(file),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

pub struct TypeCheckSynthesizer<'u, 'a> {
    universe: &'u TypeUniverse<'a>,
}

impl<'u, 'a> TypeCheckSynthesizer<'u, 'a> {
    pub fn new(universe: &'u TypeUniverse<'a>) -> Self {
        TypeCheckSynthesizer { universe }
    }

    fn canonical(&self, type_id: TypeId) -> TypeId {
        self.universe.normalize(erase(self.universe.db(), type_id))
    }

    /// Decide how `operand is tested` is checked when the operand has static
    /// type `operand_static`.
    pub fn classify(&self, tested: TypeId, operand_static: TypeId) -> TypeCheckPlan {
        let db = self.universe.db();
        let registry = self.universe.registry();
        let tested = self.canonical(tested);
        let operand_static = self.canonical(operand_static);

        let TypeData::Interface {
            class,
            args,
            nullable,
        } = db.data(tested)
        else {
            return TypeCheckPlan::general();
        };
        let args = db.type_list(args);
        if !args.is_empty() && !self.arguments_irrelevant(class, &args, operand_static) {
            return TypeCheckPlan::general();
        }

        let well_known = self.universe.well_known();
        let strategy = if class == well_known.object {
            TypeCheckStrategy::AlwaysTrue
        } else if class == well_known.function {
            TypeCheckStrategy::ClosureTag
        } else {
            match registry.concrete_subclasses(class).as_slice() {
                [] => TypeCheckStrategy::AlwaysFalse,
                [only] => TypeCheckStrategy::SingleClass(*only),
                many => TypeCheckStrategy::ClassSet(many.to_vec()),
            }
        };
        TypeCheckPlan {
            strategy,
            null_result: is_potentially_nullable(db, operand_static).then_some(nullable),
        }
    }

    /// Whether every value of `operand_static` that is an instance of
    /// `class` is an instance of `class<args>`.
    fn arguments_irrelevant(&self, class: ClassId, args: &[TypeId], operand_static: TypeId) -> bool {
        let db = self.universe.db();
        let object = self.universe.well_known().object;
        if args.iter().all(|&arg| is_top(db, object, self.canonical(arg))) {
            return true;
        }

        let TypeData::Interface {
            class: static_class,
            args: static_args,
            ..
        } = db.data(operand_static)
        else {
            return false;
        };
        let static_args = db.type_list(static_args);
        let lattice = self.universe.lattice();

        if static_class == class {
            return self.same_arguments(args, &static_args);
        }
        // The static type already is a `class<args>`.
        if let Some(vector) = lattice.substitution(static_class, class) {
            let params = &self.universe.registry().class(static_class).type_params;
            let subst = substitution_from(params, &static_args);
            let viewed: Vec<TypeId> = vector.iter().map(|&t| substitute(db, t, &subst)).collect();
            return self.same_arguments(args, &viewed);
        }
        // `class` passes its parameters straight through to the static class,
        // so the static arguments pin down the tested ones. Relies on class
        // type parameters being covariant; argument equality is required.
        if let Some(vector) = lattice.substitution(class, static_class) {
            let params = &self.universe.registry().class(class).type_params;
            let passthrough = vector.len() == params.len()
                && vector
                    .iter()
                    .zip(params)
                    .all(|(&t, &p)| t == db.class_param(p, false));
            return passthrough && self.same_arguments(args, &static_args);
        }
        false
    }

    fn same_arguments(&self, left: &[TypeId], right: &[TypeId]) -> bool {
        left.len() == right.len()
            && left
                .iter()
                .zip(right)
                .all(|(&l, &r)| self.canonical(l) == self.canonical(r))
    }

    /// Emit `operand is tested` and return the plan that was used.
    pub fn emit_check(
        &self,
        pool: &mut ConstantPool,
        code: &mut CodeBuilder,
        tested: TypeId,
        operand_static: TypeId,
        location: Option<&SourceLocation>,
    ) -> TypeCheckPlan {
        let plan = self.classify(tested, operand_static);
        tracing::debug!(
            tested = %self.universe.formatter().format(tested),
            strategy = ?plan.strategy,
            null_result = ?plan.null_result,
            "synthesizing type check"
        );

        if !plan.is_fast_path() {
            Reifier::new(self.universe).make_type(pool, code, tested);
            code.call(RuntimeHelper::IsSubtype);
            return plan;
        }

        let operand = code.new_local();
        code.local_set(operand);
        match plan.null_result {
            Some(null_result) => code.block(true, |code| {
                code.block(false, |code| {
                    code.local_get(operand);
                    code.emit(Instr::BrOnNull(0));
                    emit_fast_test(code, &plan.strategy);
                    code.emit(Instr::Br(1));
                });
                code.bool_const(null_result);
            }),
            None => {
                code.local_get(operand);
                emit_fast_test(code, &plan.strategy);
            }
        }

        if self.universe.options().verify_type_checks {
            let result = code.new_local();
            code.local_set(result);
            code.local_get(operand);
            Reifier::new(self.universe).make_type(pool, code, tested);
            code.local_get(result);
            match location {
                Some(location) => code.constant(pool.string(&location.to_string())),
                None => code.emit(Instr::RefNull),
            }
            code.call(RuntimeHelper::VerifyTypeCheck);
        }
        plan
    }
}

/// Replace a non-null operand with the fast-path answer.
fn emit_fast_test(code: &mut CodeBuilder, strategy: &TypeCheckStrategy) {
    match strategy {
        TypeCheckStrategy::AlwaysTrue => {
            code.emit(Instr::Drop);
            code.i32_const(1);
        }
        TypeCheckStrategy::AlwaysFalse => {
            code.emit(Instr::Drop);
            code.i32_const(0);
        }
        TypeCheckStrategy::ClosureTag => code.emit(Instr::RefTestClosure),
        TypeCheckStrategy::SingleClass(class) => {
            code.emit(Instr::ClassId);
            code.i32_const(class.0 as i32);
            code.emit(Instr::I32Eq);
        }
        TypeCheckStrategy::ClassSet(classes) => {
            code.emit(Instr::ClassId);
            let class_id = code.new_local();
            code.local_set(class_id);
            code.block(true, |code| {
                code.i32_const(1);
                for class in classes {
                    code.local_get(class_id);
                    code.i32_const(class.0 as i32);
                    code.emit(Instr::I32Eq);
                    code.emit(Instr::BrIf(0));
                }
                code.emit(Instr::Drop);
                code.i32_const(0);
            });
        }
        TypeCheckStrategy::General => ice!("general check has no fast path"),
    }
}

#[cfg(test)]
#[path = "../tests/type_check_tests.rs"]
mod tests;
