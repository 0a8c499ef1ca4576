//! Reference evaluator for emitted code.
//!
//! Executes an instruction sequence against the runtime crate: a value stack,
//! locals, structured blocks and runtime-helper calls. Used to check emitted
//! type tests and reified types end to end.

use crate::constants::ConstantPool;
use crate::instr::{Code, Instr, RuntimeHelper, StructKind};
use rtt_common::ClassId;
use rtt_runtime::{
    FunctionRuntimeType, NamedParameter, ObjectPayload, RuntimeType, SubtypeChecker,
    TypeCheckMismatch, TypeTables, Value, create_normalized_async_union, verify_type_check,
};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Trap {
    #[error(transparent)]
    Verification(#[from] TypeCheckMismatch),

    #[error("null dereference")]
    NullDereference,

    #[error("stack underflow")]
    StackUnderflow,

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("unknown constant {0}")]
    UnknownConstant(u32),

    #[error("unknown local {0}")]
    UnknownLocal(u32),

    #[error("missing type argument {0}")]
    MissingTypeArgument(u32),

    #[error("branch depth {0} leaves the function")]
    BranchOutOfRange(u32),

    #[error("expected {expected} results, found {found}")]
    ResultCount { expected: usize, found: usize },
}

/// Type environment of the executing function.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    /// Type arguments of the receiver instance.
    pub receiver_type_args: Vec<RuntimeType>,
    /// Indexed type-parameter slots of the current generic function.
    pub type_params: Vec<RuntimeType>,
}

impl Frame {
    pub fn new(receiver_type_args: Vec<RuntimeType>, type_params: Vec<RuntimeType>) -> Self {
        Frame {
            receiver_type_args,
            type_params,
        }
    }
}

enum Flow {
    Normal,
    /// Leaving `n` more enclosing blocks.
    Branch(u32),
}

struct State<'f> {
    frame: &'f Frame,
    stack: Vec<Value>,
    locals: Vec<Value>,
}

impl State<'_> {
    fn pop(&mut self) -> Result<Value, Trap> {
        self.stack.pop().ok_or(Trap::StackUnderflow)
    }

    fn pop_i32(&mut self) -> Result<i32, Trap> {
        match self.pop()? {
            Value::I32(v) => Ok(v),
            other => Err(mismatch("i32", &other)),
        }
    }

    fn pop_bool(&mut self) -> Result<bool, Trap> {
        Ok(self.pop_i32()? != 0)
    }

    fn pop_type(&mut self) -> Result<RuntimeType, Trap> {
        match self.pop()? {
            Value::Type(t) => Ok(Arc::unwrap_or_clone(t)),
            other => Err(mismatch("type", &other)),
        }
    }

    fn pop_array(&mut self) -> Result<Arc<[Value]>, Trap> {
        match self.pop()? {
            Value::Array(elements) => Ok(elements),
            other => Err(mismatch("array", &other)),
        }
    }

    fn pop_types(&mut self) -> Result<Vec<RuntimeType>, Trap> {
        self.pop_array()?
            .iter()
            .map(|v| match v {
                Value::Type(t) => Ok(RuntimeType::clone(t)),
                other => Err(mismatch("type", other)),
            })
            .collect()
    }

    fn local(&mut self, index: u32) -> Result<&mut Value, Trap> {
        self.locals
            .get_mut(index as usize)
            .ok_or(Trap::UnknownLocal(index))
    }
}

fn mismatch(expected: &'static str, found: &Value) -> Trap {
    Trap::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

pub struct Machine<'a> {
    pool: &'a ConstantPool,
    checker: SubtypeChecker<'a>,
}

impl<'a> Machine<'a> {
    pub fn new(pool: &'a ConstantPool, tables: &'a TypeTables) -> Self {
        Machine {
            pool,
            checker: SubtypeChecker::new(tables),
        }
    }

    /// Run `code` with `inputs` on the stack; returns the final stack.
    pub fn run(&self, code: &Code, frame: &Frame, inputs: Vec<Value>) -> Result<Vec<Value>, Trap> {
        let mut state = State {
            frame,
            stack: inputs,
            locals: vec![Value::Null; code.local_count as usize],
        };
        match self.exec(&code.instrs, &mut state)? {
            Flow::Normal => Ok(state.stack),
            Flow::Branch(depth) => Err(Trap::BranchOutOfRange(depth)),
        }
    }

    /// Run an emitted type check on `operand`.
    pub fn run_type_check(&self, code: &Code, frame: &Frame, operand: Value) -> Result<bool, Trap> {
        match self.single_result(code, frame, vec![operand])? {
            Value::I32(v) => Ok(v != 0),
            other => Err(mismatch("i32", &other)),
        }
    }

    /// Run an emitted type expression.
    pub fn run_type(&self, code: &Code, frame: &Frame) -> Result<RuntimeType, Trap> {
        match self.single_result(code, frame, Vec::new())? {
            Value::Type(t) => Ok(Arc::unwrap_or_clone(t)),
            other => Err(mismatch("type", &other)),
        }
    }

    fn single_result(&self, code: &Code, frame: &Frame, inputs: Vec<Value>) -> Result<Value, Trap> {
        let mut stack = self.run(code, frame, inputs)?;
        if stack.len() != 1 {
            return Err(Trap::ResultCount {
                expected: 1,
                found: stack.len(),
            });
        }
        stack.pop().ok_or(Trap::StackUnderflow)
    }

    fn exec(&self, instrs: &[Instr], state: &mut State<'_>) -> Result<Flow, Trap> {
        for instr in instrs {
            match instr {
                Instr::I32Const(v) => state.stack.push(Value::I32(*v)),
                Instr::Const(id) => {
                    let value = self.pool.value(*id).ok_or(Trap::UnknownConstant(id.0))?;
                    state.stack.push(value);
                }
                Instr::RefNull => state.stack.push(Value::Null),
                Instr::LocalGet(local) => {
                    let value = state.local(local.0)?.clone();
                    state.stack.push(value);
                }
                Instr::LocalSet(local) => {
                    let value = state.pop()?;
                    *state.local(local.0)? = value;
                }
                Instr::LocalTee(local) => {
                    let value = state.stack.last().cloned().ok_or(Trap::StackUnderflow)?;
                    *state.local(local.0)? = value;
                }
                Instr::Drop => {
                    state.pop()?;
                }
                Instr::StructNew(kind) => {
                    let value = self.struct_new(*kind, state)?;
                    state.stack.push(value);
                }
                Instr::ArrayNewFixed { len } => {
                    let len = *len as usize;
                    if state.stack.len() < len {
                        return Err(Trap::StackUnderflow);
                    }
                    let elements = state.stack.split_off(state.stack.len() - len);
                    state.stack.push(Value::Array(elements.into()));
                }
                Instr::ReceiverTypeArgument(index) => {
                    let ty = state
                        .frame
                        .receiver_type_args
                        .get(*index as usize)
                        .ok_or(Trap::MissingTypeArgument(*index))?;
                    state.stack.push(Value::ty(ty.clone()));
                }
                Instr::FrameTypeParameter(index) => {
                    let ty = state
                        .frame
                        .type_params
                        .get(*index as usize)
                        .ok_or(Trap::MissingTypeArgument(*index))?;
                    state.stack.push(Value::ty(ty.clone()));
                }
                Instr::ClassId => {
                    let class = match state.pop()? {
                        Value::Object(object) => object.class,
                        Value::Null => return Err(Trap::NullDereference),
                        other => return Err(mismatch("object", &other)),
                    };
                    state.stack.push(Value::I32(class.0 as i32));
                }
                Instr::RefTestClosure => {
                    let is_closure = match state.pop()? {
                        Value::Object(object) => matches!(object.payload, ObjectPayload::Closure(_)),
                        Value::Null => return Err(Trap::NullDereference),
                        _ => false,
                    };
                    state.stack.push(Value::I32(i32::from(is_closure)));
                }
                Instr::I32Eq => {
                    let right = state.pop_i32()?;
                    let left = state.pop_i32()?;
                    state.stack.push(Value::I32(i32::from(left == right)));
                }
                Instr::Block { result, body } => {
                    let height = state.stack.len();
                    match self.exec(body, state)? {
                        Flow::Normal => {}
                        Flow::Branch(0) => {
                            let carried = if *result { Some(state.pop()?) } else { None };
                            state.stack.truncate(height);
                            state.stack.extend(carried);
                        }
                        Flow::Branch(depth) => return Ok(Flow::Branch(depth - 1)),
                    }
                }
                Instr::Br(depth) => return Ok(Flow::Branch(*depth)),
                Instr::BrIf(depth) => {
                    if state.pop_bool()? {
                        return Ok(Flow::Branch(*depth));
                    }
                }
                Instr::BrOnNull(depth) => {
                    if state.stack.last().ok_or(Trap::StackUnderflow)?.is_null() {
                        state.pop()?;
                        return Ok(Flow::Branch(*depth));
                    }
                }
                Instr::Call(helper) => {
                    let value = self.call(*helper, state)?;
                    state.stack.push(value);
                }
            }
        }
        Ok(Flow::Normal)
    }

    fn struct_new(&self, kind: StructKind, state: &mut State<'_>) -> Result<Value, Trap> {
        let ty = match kind {
            StructKind::InterfaceType => {
                let args = state.pop_types()?;
                let nullable = state.pop_bool()?;
                let class = ClassId(state.pop_i32()? as u32);
                RuntimeType::Interface {
                    class,
                    nullable,
                    args,
                }
            }
            StructKind::FunctionType => {
                let required_positional = state.pop_i32()? as u32;
                let named = state
                    .pop_array()?
                    .iter()
                    .map(|v| match v {
                        Value::NamedParameter(p) => Ok(NamedParameter::clone(p)),
                        other => Err(mismatch("named parameter", other)),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let positional = state.pop_types()?;
                let return_type = state.pop_type()?;
                let defaults = state.pop_types()?;
                let bounds = state.pop_types()?;
                let type_param_offset = state.pop_i32()? as u32;
                let nullable = state.pop_bool()?;
                RuntimeType::Function(Box::new(FunctionRuntimeType {
                    nullable,
                    type_param_offset,
                    bounds,
                    defaults,
                    return_type,
                    positional,
                    required_positional,
                    named,
                }))
            }
            StructKind::RecordType => {
                let fields = state.pop_types()?;
                let names = state
                    .pop_array()?
                    .iter()
                    .map(|v| match v {
                        Value::Str(s) => Ok(s.clone()),
                        other => Err(mismatch("string", other)),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let nullable = state.pop_bool()?;
                RuntimeType::Record {
                    nullable,
                    names,
                    fields,
                }
            }
            StructKind::NamedParameter => {
                let required = state.pop_bool()?;
                let ty = state.pop_type()?;
                let name = match state.pop()? {
                    Value::Str(s) => s,
                    other => return Err(mismatch("string", &other)),
                };
                return Ok(Value::NamedParameter(Arc::new(NamedParameter {
                    name,
                    ty,
                    required,
                })));
            }
        };
        Ok(Value::ty(ty))
    }

    fn call(&self, helper: RuntimeHelper, state: &mut State<'_>) -> Result<Value, Trap> {
        match helper {
            RuntimeHelper::IsSubtype => {
                let ty = state.pop_type()?;
                let operand = state.pop()?;
                let result = self.checker.is_instance(&operand, &ty);
                Ok(Value::I32(i32::from(result)))
            }
            RuntimeHelper::CreateNormalizedAsyncUnion => {
                let arg = state.pop_type()?;
                let nullable = state.pop_bool()?;
                let object = self.checker.tables().well_known.object;
                Ok(Value::ty(create_normalized_async_union(arg, nullable, object)))
            }
            RuntimeHelper::AsNullable => {
                let ty = state.pop_type()?;
                Ok(Value::ty(ty.as_nullable()))
            }
            RuntimeHelper::VerifyTypeCheck => {
                let location = match state.pop()? {
                    Value::Str(s) => Some(s),
                    Value::Null => None,
                    other => return Err(mismatch("string", &other)),
                };
                let fast_result = state.pop_bool()?;
                let ty = state.pop_type()?;
                let operand = state.pop()?;
                verify_type_check(&self.checker, &operand, &ty, fast_result, location.as_deref())?;
                Ok(Value::I32(i32::from(fast_result)))
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/eval_tests.rs"]
mod tests;
