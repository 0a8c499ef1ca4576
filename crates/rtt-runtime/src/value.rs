//! Run-time values seen by emitted code.

use crate::types::{FunctionRuntimeType, NamedParameter, RuntimeType};
use rtt_common::ClassId;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    I32(i32),
    Str(Arc<str>),
    Bytes(Arc<[u8]>),
    Type(Arc<RuntimeType>),
    Array(Arc<[Value]>),
    NamedParameter(Arc<NamedParameter>),
    Object(Arc<Object>),
}

/// Heap object with its class identity and reified type arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub class: ClassId,
    pub type_args: Vec<RuntimeType>,
    pub payload: ObjectPayload,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ObjectPayload {
    Plain,
    /// A closure instance and its function type.
    Closure(Box<FunctionRuntimeType>),
    /// A record instance: named-field names (sorted) and positional then
    /// named field values.
    Record {
        names: Vec<Arc<str>>,
        fields: Vec<Value>,
    },
}

impl Value {
    pub fn object(class: ClassId, type_args: Vec<RuntimeType>) -> Self {
        Value::Object(Arc::new(Object {
            class,
            type_args,
            payload: ObjectPayload::Plain,
        }))
    }

    pub fn closure(class: ClassId, function_type: FunctionRuntimeType) -> Self {
        Value::Object(Arc::new(Object {
            class,
            type_args: Vec::new(),
            payload: ObjectPayload::Closure(Box::new(function_type)),
        }))
    }

    pub fn record(class: ClassId, names: Vec<Arc<str>>, fields: Vec<Value>) -> Self {
        Value::Object(Arc::new(Object {
            class,
            type_args: Vec::new(),
            payload: ObjectPayload::Record { names, fields },
        }))
    }

    pub fn ty(ty: RuntimeType) -> Self {
        Value::Type(Arc::new(ty))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::I32(_) => "i32",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Type(_) => "type",
            Value::Array(_) => "array",
            Value::NamedParameter(_) => "named parameter",
            Value::Object(_) => "object",
        }
    }
}
