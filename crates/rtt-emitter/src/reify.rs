//! Runtime type reification.
//!
//! Turns a source type into code that leaves its run-time representation on
//! the stack. A type that needs no run-time environment becomes one pooled
//! constant. Anything else is built piece by piece, reading class type
//! arguments from the receiver and function type parameters from the frame.
//!
//! Erasure is invisible at run time: every level is erased and normalized
//! before it is inspected.

use crate::builder::CodeBuilder;
use crate::constants::ConstantPool;
use crate::instr::{Instr, RuntimeHelper, StructKind};
use rtt_common::ice;
use rtt_runtime::{
    FunctionRuntimeType, NamedParameter, RuntimeType, TopKind as RuntimeTopKind,
    create_normalized_async_union,
};
use rtt_solver::type_queries::{contains_environment_parameter, erase};
use rtt_solver::{Binder, FunctionShapeId, TopKind, TypeData, TypeId, TypeUniverse};
use smallvec::SmallVec;
use std::sync::Arc;

/// How class type-parameter references are materialized in constants.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParamMode {
    /// A type literal at a use site. Class parameters need the receiver, so
    /// a type mentioning one is never constant here.
    Site,
    /// A substitution-table entry. Class parameters become references to the
    /// subclass's type arguments.
    Table,
}

pub struct Reifier<'u, 'a> {
    universe: &'u TypeUniverse<'a>,
    /// Function types enclosing the current position, innermost last.
    binders: SmallVec<[FunctionShapeId; 4]>,
}

impl<'u, 'a> Reifier<'u, 'a> {
    pub fn new(universe: &'u TypeUniverse<'a>) -> Self {
        Reifier {
            universe,
            binders: SmallVec::new(),
        }
    }

    /// The form of `type_id` the run time sees at this level.
    fn canonical(&self, type_id: TypeId) -> TypeId {
        self.universe.normalize(erase(self.universe.db(), type_id))
    }

    /// Whether `type_id` can be emitted as a single constant.
    pub fn is_constant(&self, type_id: TypeId) -> bool {
        !contains_environment_parameter(self.universe.db(), type_id)
    }

    /// Emit code leaving the run-time representation of `type_id` on the stack.
    pub fn make_type(&mut self, pool: &mut ConstantPool, code: &mut CodeBuilder, type_id: TypeId) {
        let type_id = self.canonical(type_id);
        if self.is_constant(type_id) {
            let ty = self.to_runtime(type_id, ParamMode::Site);
            code.constant(pool.type_constant(ty));
        } else {
            tracing::trace!(type_id = type_id.0, "constructing run-time type");
            self.emit_constructed(pool, code, type_id);
        }
    }

    /// Run-time value of a type without environment parameters.
    pub fn constant_type(&mut self, type_id: TypeId) -> RuntimeType {
        self.to_runtime(type_id, ParamMode::Site)
    }

    /// Run-time value of a substitution-table entry.
    pub fn table_type(&mut self, type_id: TypeId) -> RuntimeType {
        self.to_runtime(type_id, ParamMode::Table)
    }

    fn to_runtime(&mut self, type_id: TypeId, mode: ParamMode) -> RuntimeType {
        let db = self.universe.db();
        let type_id = self.canonical(type_id);
        match db.data(type_id) {
            TypeData::Top(kind) => RuntimeType::Top(runtime_top_kind(kind)),
            TypeData::Never { nullable: false } => RuntimeType::Never,
            TypeData::Never { nullable: true } | TypeData::Null => RuntimeType::Null,
            TypeData::Interface {
                class,
                args,
                nullable,
            } => RuntimeType::Interface {
                class,
                nullable,
                args: db
                    .type_list(args)
                    .iter()
                    .map(|&arg| self.to_runtime(arg, mode))
                    .collect(),
            },
            TypeData::Function(shape) => {
                RuntimeType::Function(Box::new(self.function_to_runtime(shape, mode)))
            }
            TypeData::Record(shape) => {
                let shape = db.record_shape(shape);
                RuntimeType::Record {
                    nullable: shape.nullable,
                    names: shape.named.iter().map(|(n, _)| db.resolve_atom(*n)).collect(),
                    fields: shape
                        .field_types()
                        .map(|field| self.to_runtime(field, mode))
                        .collect(),
                }
            }
            TypeData::AsyncUnion { arg, nullable } => {
                let arg = self.to_runtime(arg, mode);
                create_normalized_async_union(arg, nullable, self.universe.well_known().object)
            }
            TypeData::ClassParam { param, nullable } => match mode {
                ParamMode::Table => RuntimeType::InterfaceParam {
                    index: self.universe.type_environment().lookup(param),
                    nullable,
                },
                ParamMode::Site => ice!("class type parameter {} in a constant type", param.0),
            },
            TypeData::FunctionParam {
                binder: Binder::FunctionType(depth),
                index,
                nullable,
            } => RuntimeType::FunctionParam {
                index: self.bound_parameter_index(depth, index),
                nullable,
            },
            TypeData::FunctionParam {
                binder: Binder::Frame,
                index,
                ..
            } => ice!("frame type parameter {} in a constant type", index),
            TypeData::Erased { .. } => ice!("erased type survived erasure"),
        }
    }

    fn function_to_runtime(&mut self, shape_id: FunctionShapeId, mode: ParamMode) -> FunctionRuntimeType {
        let db = self.universe.db();
        let shape = db.function_shape(shape_id);
        let type_param_offset = self.universe.function_types().offset(db, shape_id);

        self.binders.push(shape_id);
        let function = FunctionRuntimeType {
            nullable: shape.nullable,
            type_param_offset,
            bounds: shape
                .type_params
                .iter()
                .map(|p| self.to_runtime(p.bound, mode))
                .collect(),
            defaults: shape
                .type_params
                .iter()
                .map(|p| self.to_runtime(p.default, mode))
                .collect(),
            return_type: self.to_runtime(shape.return_type, mode),
            positional: shape
                .positional
                .iter()
                .map(|&p| self.to_runtime(p, mode))
                .collect(),
            required_positional: shape.required_positional,
            named: shape
                .named
                .iter()
                .map(|n| NamedParameter {
                    name: db.resolve_atom(n.name),
                    ty: self.to_runtime(n.type_id, mode),
                    required: n.required,
                })
                .collect(),
        };
        self.binders.pop();
        function
    }

    /// Global index of parameter `index` of the function type `depth` binders out.
    fn bound_parameter_index(&self, depth: u32, index: u32) -> u32 {
        let Some(position) = self.binders.len().checked_sub(depth as usize + 1) else {
            ice!("free function type parameter at binder depth {}", depth);
        };
        self.universe
            .function_types()
            .parameter_index(self.universe.db(), self.binders[position], index)
    }

    fn emit_constructed(&mut self, pool: &mut ConstantPool, code: &mut CodeBuilder, type_id: TypeId) {
        let db = self.universe.db();
        match db.data(type_id) {
            TypeData::Interface {
                class,
                args,
                nullable,
            } => {
                let args = db.type_list(args);
                code.i32_const(class.0 as i32);
                code.bool_const(nullable);
                for &arg in args.iter() {
                    self.make_type(pool, code, arg);
                }
                code.array_new_fixed(args.len());
                code.struct_new(StructKind::InterfaceType);
            }
            TypeData::Function(shape) => self.emit_function(pool, code, shape),
            TypeData::Record(shape) => {
                let shape = db.record_shape(shape);
                let names: Vec<Arc<str>> = shape.named.iter().map(|(n, _)| db.resolve_atom(*n)).collect();
                code.bool_const(shape.nullable);
                code.constant(pool.string_array(&names));
                let fields: Vec<TypeId> = shape.field_types().collect();
                for &field in &fields {
                    self.make_type(pool, code, field);
                }
                code.array_new_fixed(fields.len());
                code.struct_new(StructKind::RecordType);
            }
            TypeData::AsyncUnion { arg, nullable } => {
                code.bool_const(nullable);
                self.make_type(pool, code, arg);
                code.call(RuntimeHelper::CreateNormalizedAsyncUnion);
            }
            TypeData::ClassParam { param, nullable } => {
                let index = self.universe.type_environment().lookup(param);
                code.emit(Instr::ReceiverTypeArgument(index));
                if nullable {
                    code.call(RuntimeHelper::AsNullable);
                }
            }
            TypeData::FunctionParam {
                binder: Binder::Frame,
                index,
                nullable,
            } => {
                code.emit(Instr::FrameTypeParameter(index));
                if nullable {
                    code.call(RuntimeHelper::AsNullable);
                }
            }
            other @ (TypeData::Top(_)
            | TypeData::Never { .. }
            | TypeData::Null
            | TypeData::Erased { .. }
            | TypeData::FunctionParam {
                binder: Binder::FunctionType(_),
                ..
            }) => ice!("{:?} cannot need a run-time environment", other),
        }
    }

    fn emit_function(&mut self, pool: &mut ConstantPool, code: &mut CodeBuilder, shape_id: FunctionShapeId) {
        let db = self.universe.db();
        let shape = db.function_shape(shape_id);
        let offset = self.universe.function_types().offset(db, shape_id);

        code.bool_const(shape.nullable);
        code.i32_const(offset as i32);

        self.binders.push(shape_id);
        for param in &shape.type_params {
            self.make_type(pool, code, param.bound);
        }
        code.array_new_fixed(shape.type_params.len());
        for param in &shape.type_params {
            self.make_type(pool, code, param.default);
        }
        code.array_new_fixed(shape.type_params.len());

        self.make_type(pool, code, shape.return_type);

        for &positional in &shape.positional {
            self.make_type(pool, code, positional);
        }
        code.array_new_fixed(shape.positional.len());

        for named in &shape.named {
            let name = db.resolve_atom(named.name);
            if self.is_constant(named.type_id) {
                let ty = self.to_runtime(named.type_id, ParamMode::Site);
                code.constant(pool.named_parameter(NamedParameter {
                    name,
                    ty,
                    required: named.required,
                }));
            } else {
                code.constant(pool.string(&name));
                self.make_type(pool, code, named.type_id);
                code.bool_const(named.required);
                code.struct_new(StructKind::NamedParameter);
            }
        }
        code.array_new_fixed(shape.named.len());
        self.binders.pop();

        code.i32_const(shape.required_positional as i32);
        code.struct_new(StructKind::FunctionType);
    }
}

fn runtime_top_kind(kind: TopKind) -> RuntimeTopKind {
    match kind {
        TopKind::Dynamic => RuntimeTopKind::Dynamic,
        TopKind::Void => RuntimeTopKind::Void,
        TopKind::Invalid => RuntimeTopKind::Invalid,
    }
}

#[cfg(test)]
#[path = "../tests/reify_tests.rs"]
mod tests;
