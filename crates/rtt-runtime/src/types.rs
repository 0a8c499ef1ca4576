//! Run-time type values.
//!
//! These are what reified type literals evaluate to and what the general
//! subtype algorithm consumes. They mirror the normalized source types, minus
//! erasure (erased types are their representation at run time) and with
//! type-parameter references resolved to indices:
//!
//! - `FunctionParam(i)`: parameter `i` of some enclosing generic function
//!   type, using the offsets assigned at compile time
//! - `InterfaceParam(i)`: type argument `i` of the subclass, only inside
//!   substitution-table entries

use rtt_common::ClassId;
use std::sync::Arc;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TopKind {
    Dynamic,
    Void,
    Invalid,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RuntimeType {
    Top(TopKind),
    /// Always non-nullable; nullable bottom is `Null`.
    Never,
    Null,
    Interface {
        class: ClassId,
        nullable: bool,
        args: Vec<RuntimeType>,
    },
    AsyncUnion {
        nullable: bool,
        arg: Box<RuntimeType>,
    },
    Function(Box<FunctionRuntimeType>),
    Record {
        nullable: bool,
        /// Names of the named fields, sorted.
        names: Vec<Arc<str>>,
        /// Positional field types followed by named field types.
        fields: Vec<RuntimeType>,
    },
    FunctionParam {
        index: u32,
        nullable: bool,
    },
    InterfaceParam {
        index: u32,
        nullable: bool,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionRuntimeType {
    pub nullable: bool,
    /// Index of the first own generic parameter.
    pub type_param_offset: u32,
    pub bounds: Vec<RuntimeType>,
    pub defaults: Vec<RuntimeType>,
    pub return_type: RuntimeType,
    pub positional: Vec<RuntimeType>,
    pub required_positional: u32,
    /// Sorted by name.
    pub named: Vec<NamedParameter>,
}

impl FunctionRuntimeType {
    pub fn type_param_count(&self) -> u32 {
        self.bounds.len() as u32
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamedParameter {
    pub name: Arc<str>,
    pub ty: RuntimeType,
    pub required: bool,
}

impl RuntimeType {
    pub const DYNAMIC: RuntimeType = RuntimeType::Top(TopKind::Dynamic);

    pub fn interface(class: ClassId, args: Vec<RuntimeType>) -> Self {
        RuntimeType::Interface {
            class,
            nullable: false,
            args,
        }
    }

    pub fn is_top(&self, object: ClassId) -> bool {
        match self {
            RuntimeType::Top(_) => true,
            RuntimeType::Interface {
                class, nullable, ..
            } => *class == object && *nullable,
            _ => false,
        }
    }

    pub fn is_object(&self, object: ClassId) -> bool {
        matches!(
            self,
            RuntimeType::Interface { class, nullable: false, .. } if *class == object
        )
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            RuntimeType::Top(_) | RuntimeType::Null => true,
            RuntimeType::Never => false,
            RuntimeType::Interface { nullable, .. }
            | RuntimeType::Record { nullable, .. }
            | RuntimeType::FunctionParam { nullable, .. }
            | RuntimeType::InterfaceParam { nullable, .. } => *nullable,
            RuntimeType::AsyncUnion { nullable, arg } => *nullable || arg.is_nullable(),
            RuntimeType::Function(f) => f.nullable,
        }
    }

    /// The nullable form of this type.
    pub fn as_nullable(&self) -> RuntimeType {
        let mut result = self.clone();
        match &mut result {
            RuntimeType::Top(_) | RuntimeType::Null => {}
            RuntimeType::Never => return RuntimeType::Null,
            RuntimeType::Interface { nullable, .. }
            | RuntimeType::AsyncUnion { nullable, .. }
            | RuntimeType::Record { nullable, .. }
            | RuntimeType::FunctionParam { nullable, .. }
            | RuntimeType::InterfaceParam { nullable, .. } => *nullable = true,
            RuntimeType::Function(f) => f.nullable = true,
        }
        result
    }

    /// This type with its own `?` dropped. `Null` becomes `Never`; top types
    /// and unions over a nullable argument stay nullable.
    pub fn as_non_nullable(&self) -> RuntimeType {
        let mut result = self.clone();
        match &mut result {
            RuntimeType::Top(_) | RuntimeType::Never => {}
            RuntimeType::Null => return RuntimeType::Never,
            RuntimeType::Interface { nullable, .. }
            | RuntimeType::AsyncUnion { nullable, .. }
            | RuntimeType::Record { nullable, .. }
            | RuntimeType::FunctionParam { nullable, .. }
            | RuntimeType::InterfaceParam { nullable, .. } => *nullable = false,
            RuntimeType::Function(f) => f.nullable = false,
        }
        result
    }

    /// Replace every `InterfaceParam(i)` with `args[i]`.
    pub fn substitute(&self, args: &[RuntimeType]) -> Option<RuntimeType> {
        Some(match self {
            RuntimeType::InterfaceParam { index, nullable } => {
                let arg = args.get(*index as usize)?;
                if *nullable { arg.as_nullable() } else { arg.clone() }
            }
            RuntimeType::Interface {
                class,
                nullable,
                args: inner,
            } => RuntimeType::Interface {
                class: *class,
                nullable: *nullable,
                args: substitute_all(inner, args)?,
            },
            RuntimeType::AsyncUnion { nullable, arg } => RuntimeType::AsyncUnion {
                nullable: *nullable,
                arg: Box::new(arg.substitute(args)?),
            },
            RuntimeType::Function(f) => RuntimeType::Function(Box::new(FunctionRuntimeType {
                nullable: f.nullable,
                type_param_offset: f.type_param_offset,
                bounds: substitute_all(&f.bounds, args)?,
                defaults: substitute_all(&f.defaults, args)?,
                return_type: f.return_type.substitute(args)?,
                positional: substitute_all(&f.positional, args)?,
                required_positional: f.required_positional,
                named: f
                    .named
                    .iter()
                    .map(|n| {
                        Some(NamedParameter {
                            name: n.name.clone(),
                            ty: n.ty.substitute(args)?,
                            required: n.required,
                        })
                    })
                    .collect::<Option<_>>()?,
            })),
            RuntimeType::Record {
                nullable,
                names,
                fields,
            } => RuntimeType::Record {
                nullable: *nullable,
                names: names.clone(),
                fields: substitute_all(fields, args)?,
            },
            RuntimeType::Top(_)
            | RuntimeType::Never
            | RuntimeType::Null
            | RuntimeType::FunctionParam { .. } => self.clone(),
        })
    }
}

fn substitute_all(types: &[RuntimeType], args: &[RuntimeType]) -> Option<Vec<RuntimeType>> {
    types.iter().map(|t| t.substitute(args)).collect()
}

/// Build `AsyncOr<arg>` (nullable if `nullable`) in normalized form.
///
/// Applies the same rules as the compile-time normalizer so reified and
/// constant types agree.
pub fn create_normalized_async_union(
    arg: RuntimeType,
    nullable: bool,
    object: ClassId,
) -> RuntimeType {
    if arg.is_top(object) || arg.is_object(object) {
        return if nullable { arg.as_nullable() } else { arg };
    }
    match arg {
        RuntimeType::Never => RuntimeType::AsyncUnion {
            nullable: false,
            arg: Box::new(RuntimeType::Never),
        },
        RuntimeType::Null => RuntimeType::AsyncUnion {
            nullable: true,
            arg: Box::new(RuntimeType::Null),
        },
        arg => RuntimeType::AsyncUnion {
            nullable: nullable || arg.is_nullable(),
            arg: Box::new(arg),
        },
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
