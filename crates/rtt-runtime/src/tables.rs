//! Decoded runtime type tables.
//!
//! The compiled program carries a category byte per class, per-class sorted
//! ancestor ids with parallel substitution vectors, per-class display names
//! and the identities of the well-known classes. `TypeTables` is that data in
//! directly usable form.

use crate::types::{RuntimeType, TopKind};
use crate::value::{ObjectPayload, Value};
use rtt_common::limits::{FIRST_MASQUERADE_CLASS_ID, type_category};
use rtt_common::{ClassId, ice};
use std::fmt::Write;
use std::sync::Arc;

/// Identities of the classes the runtime treats specially.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RuntimeWellKnown {
    pub object: ClassId,
    pub function: ClassId,
    pub closure: ClassId,
    pub record: ClassId,
    pub future: ClassId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeTables {
    pub categories: Vec<u8>,
    /// Per class: proper non-top ancestors, ascending.
    pub supers: Vec<Vec<ClassId>>,
    /// Per class, parallel to `supers`: substitution vectors over
    /// `InterfaceParam` references to the subclass's type arguments.
    pub substitutions: Vec<Vec<Vec<RuntimeType>>>,
    pub names: Vec<Arc<str>>,
    pub well_known: RuntimeWellKnown,
}

impl TypeTables {
    pub fn class_count(&self) -> usize {
        self.categories.len()
    }

    /// Substitution vector viewing `sub` as `ancestor`.
    pub fn substitution(&self, sub: ClassId, ancestor: ClassId) -> Option<&[RuntimeType]> {
        let supers = self.supers.get(sub.index())?;
        let position = supers.binary_search(&ancestor).ok()?;
        self.substitutions
            .get(sub.index())?
            .get(position)
            .map(Vec::as_slice)
    }

    /// The type a value reports at run time. Masquerading classes report the
    /// class they masquerade as; closures and records report structural types.
    pub fn runtime_type_of(&self, value: &Value) -> RuntimeType {
        let object = match value {
            Value::Null => return RuntimeType::Null,
            Value::Object(object) => object,
            other => ice!("{} value has no run-time type", other.kind()),
        };
        let category = match self.categories.get(object.class.index()) {
            Some(&category) => category,
            None => ice!("missing class identity {}", object.class),
        };
        match (category, &object.payload) {
            (type_category::ABSTRACT, _) => {
                ice!("instance of abstract class {}", object.class)
            }
            (type_category::OBJECT, _) => RuntimeType::interface(self.well_known.object, Vec::new()),
            (type_category::FUNCTION, ObjectPayload::Closure(function_type)) => {
                RuntimeType::Function(function_type.clone())
            }
            (type_category::RECORD, ObjectPayload::Record { names, fields }) => RuntimeType::Record {
                nullable: false,
                names: names.clone(),
                fields: fields.iter().map(|f| self.runtime_type_of(f)).collect(),
            },
            (type_category::FUNCTION | type_category::RECORD, _) => {
                ice!("{} instance without its structural payload", object.class)
            }
            (type_category::NOT_MASQUERADED, _) => {
                RuntimeType::interface(object.class, object.type_args.clone())
            }
            (reported, _) if u32::from(reported) >= FIRST_MASQUERADE_CLASS_ID => {
                RuntimeType::interface(ClassId(u32::from(reported)), object.type_args.clone())
            }
            (unknown, _) => ice!("unknown type category {}", unknown),
        }
    }

    /// Human-readable rendering, using display names where present.
    pub fn describe(&self, ty: &RuntimeType) -> String {
        let mut out = String::new();
        self.write_type(&mut out, ty);
        out
    }

    fn class_name(&self, class: ClassId) -> String {
        match self.names.get(class.index()) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => class.to_string(),
        }
    }

    fn write_type(&self, out: &mut String, ty: &RuntimeType) {
        match ty {
            RuntimeType::Top(TopKind::Dynamic) => out.push_str("dynamic"),
            RuntimeType::Top(TopKind::Void) => out.push_str("void"),
            RuntimeType::Top(TopKind::Invalid) => out.push_str("<invalid>"),
            RuntimeType::Never => out.push_str("Never"),
            RuntimeType::Null => out.push_str("Null"),
            RuntimeType::Interface {
                class,
                nullable,
                args,
            } => {
                out.push_str(&self.class_name(*class));
                if !args.is_empty() {
                    out.push('<');
                    self.write_list(out, args);
                    out.push('>');
                }
                question(out, *nullable);
            }
            RuntimeType::AsyncUnion { nullable, arg } => {
                out.push_str("AsyncOr<");
                self.write_type(out, arg);
                out.push('>');
                question(out, *nullable && !arg.is_nullable());
            }
            RuntimeType::Function(f) => {
                if f.nullable {
                    out.push('(');
                }
                if !f.bounds.is_empty() {
                    out.push('<');
                    for (i, bound) in f.bounds.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        let _ = write!(out, "X{} extends ", f.type_param_offset + i as u32);
                        self.write_type(out, bound);
                    }
                    out.push('>');
                }
                out.push('(');
                self.write_list(out, &f.positional);
                if !f.named.is_empty() {
                    if !f.positional.is_empty() {
                        out.push_str(", ");
                    }
                    out.push('{');
                    for (i, named) in f.named.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        if named.required {
                            out.push_str("required ");
                        }
                        self.write_type(out, &named.ty);
                        let _ = write!(out, " {}", named.name);
                    }
                    out.push('}');
                }
                out.push_str(") => ");
                self.write_type(out, &f.return_type);
                if f.nullable {
                    out.push_str(")?");
                }
            }
            RuntimeType::Record {
                nullable,
                names,
                fields,
            } => {
                let positional = fields.len().saturating_sub(names.len());
                out.push('(');
                self.write_list(out, &fields[..positional]);
                if !names.is_empty() {
                    if positional > 0 {
                        out.push_str(", ");
                    }
                    out.push('{');
                    for (i, (name, field)) in names.iter().zip(&fields[positional..]).enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        self.write_type(out, field);
                        let _ = write!(out, " {name}");
                    }
                    out.push('}');
                }
                out.push(')');
                question(out, *nullable);
            }
            RuntimeType::FunctionParam { index, nullable } => {
                let _ = write!(out, "X{index}");
                question(out, *nullable);
            }
            RuntimeType::InterfaceParam { index, nullable } => {
                let _ = write!(out, "#{index}");
                question(out, *nullable);
            }
        }
    }

    fn write_list(&self, out: &mut String, types: &[RuntimeType]) {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_type(out, ty);
        }
    }
}

fn question(out: &mut String, nullable: bool) {
    if nullable {
        out.push('?');
    }
}
