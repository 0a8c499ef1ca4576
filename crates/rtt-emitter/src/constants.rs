//! Constant pool.
//!
//! Structurally deduplicated constants: equal constants share one id, so a
//! type literal used at many sites is materialized once.

use rtt_common::ice;
use rtt_runtime::{NamedParameter, RuntimeType, Value};
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Constant {
    I32(i32),
    Str(Arc<str>),
    Bytes(Arc<[u8]>),
    Type(RuntimeType),
    Array(Vec<ConstId>),
    NamedParameter {
        name: Arc<str>,
        ty: RuntimeType,
        required: bool,
    },
}

#[derive(Default)]
pub struct ConstantPool {
    constants: Vec<Constant>,
    index: FxHashMap<Constant, ConstId>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, constant: Constant) -> ConstId {
        if let Some(&id) = self.index.get(&constant) {
            return id;
        }
        let id = ConstId(self.constants.len() as u32);
        self.constants.push(constant.clone());
        self.index.insert(constant, id);
        id
    }

    pub fn type_constant(&mut self, ty: RuntimeType) -> ConstId {
        self.intern(Constant::Type(ty))
    }

    pub fn string(&mut self, s: &str) -> ConstId {
        self.intern(Constant::Str(Arc::from(s)))
    }

    pub fn i32(&mut self, value: i32) -> ConstId {
        self.intern(Constant::I32(value))
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> ConstId {
        self.intern(Constant::Bytes(Arc::from(bytes)))
    }

    pub fn array(&mut self, elements: Vec<ConstId>) -> ConstId {
        self.intern(Constant::Array(elements))
    }

    /// Array of type constants.
    pub fn type_array(&mut self, types: Vec<RuntimeType>) -> ConstId {
        let elements = types.into_iter().map(|t| self.type_constant(t)).collect();
        self.array(elements)
    }

    /// Array of string constants.
    pub fn string_array<S: AsRef<str>>(&mut self, strings: &[S]) -> ConstId {
        let elements = strings.iter().map(|s| self.string(s.as_ref())).collect();
        self.array(elements)
    }

    pub fn named_parameter(&mut self, param: NamedParameter) -> ConstId {
        self.intern(Constant::NamedParameter {
            name: param.name,
            ty: param.ty,
            required: param.required,
        })
    }

    pub fn get(&self, id: ConstId) -> &Constant {
        match self.constants.get(id.0 as usize) {
            Some(constant) => constant,
            None => ice!("unknown constant {}", id.0),
        }
    }

    pub fn try_get(&self, id: ConstId) -> Option<&Constant> {
        self.constants.get(id.0 as usize)
    }

    /// Instantiate constant `id` as a run-time value.
    pub fn value(&self, id: ConstId) -> Option<Value> {
        Some(match self.try_get(id)? {
            Constant::I32(v) => Value::I32(*v),
            Constant::Str(s) => Value::Str(s.clone()),
            Constant::Bytes(b) => Value::Bytes(b.clone()),
            Constant::Type(t) => Value::ty(t.clone()),
            Constant::Array(elements) => {
                let values: Option<Vec<Value>> = elements.iter().map(|&e| self.value(e)).collect();
                Value::Array(values?.into())
            }
            Constant::NamedParameter { name, ty, required } => {
                Value::NamedParameter(Arc::new(NamedParameter {
                    name: name.clone(),
                    ty: ty.clone(),
                    required: *required,
                }))
            }
        })
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/constants_tests.rs"]
mod tests;
