//! Human-readable rendering of source types.
//!
//! Used for verification diagnostics and debugging output. A normalized
//! absorbing union carries the nullability of its argument; when the argument
//! already prints its own `?`, the union's is omitted so the display matches
//! the type as written.

use crate::class_hierarchy::ClassRegistry;
use crate::intern::TypeInterner;
use crate::type_queries::is_nullable;
use crate::types::{Binder, TopKind, TypeData, TypeId};
use std::fmt::Write;

pub struct TypeFormatter<'a> {
    db: &'a TypeInterner,
    registry: &'a dyn ClassRegistry,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a TypeInterner, registry: &'a dyn ClassRegistry) -> Self {
        TypeFormatter { db, registry }
    }

    pub fn format(&self, type_id: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, type_id);
        out
    }

    fn write_type(&self, out: &mut String, type_id: TypeId) {
        let db = self.db;
        match db.data(type_id) {
            TypeData::Top(TopKind::Dynamic) => out.push_str("dynamic"),
            TypeData::Top(TopKind::Void) => out.push_str("void"),
            TypeData::Top(TopKind::Invalid) => out.push_str("<invalid>"),
            TypeData::Never { nullable } => {
                out.push_str("Never");
                question(out, nullable);
            }
            TypeData::Null => out.push_str("Null"),
            TypeData::Interface {
                class,
                args,
                nullable,
            } => {
                out.push_str(&db.resolve_atom(self.registry.class(class).name));
                self.write_list(out, "<", &db.type_list(args), ">");
                question(out, nullable);
            }
            TypeData::Function(shape_id) => {
                let shape = db.function_shape(shape_id);
                if shape.nullable {
                    out.push('(');
                }
                if !shape.type_params.is_empty() {
                    out.push('<');
                    for (i, param) in shape.type_params.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        out.push_str(&db.resolve_atom(param.name));
                        if param.bound != TypeId::DYNAMIC {
                            out.push_str(" extends ");
                            self.write_type(out, param.bound);
                        }
                    }
                    out.push('>');
                }
                out.push('(');
                let required = shape.required_positional as usize;
                let mut first = true;
                for (i, &param) in shape.positional.iter().enumerate() {
                    if !first {
                        out.push_str(", ");
                    }
                    if i == required {
                        out.push('[');
                    }
                    self.write_type(out, param);
                    first = false;
                }
                if shape.positional.len() > required {
                    out.push(']');
                }
                if !shape.named.is_empty() {
                    if !first {
                        out.push_str(", ");
                    }
                    out.push('{');
                    for (i, named) in shape.named.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        if named.required {
                            out.push_str("required ");
                        }
                        self.write_type(out, named.type_id);
                        let _ = write!(out, " {}", db.resolve_atom(named.name));
                    }
                    out.push('}');
                }
                out.push_str(") => ");
                self.write_type(out, shape.return_type);
                if shape.nullable {
                    out.push_str(")?");
                }
            }
            TypeData::Record(shape_id) => {
                let shape = db.record_shape(shape_id);
                out.push('(');
                self.write_list(out, "", &shape.positional, "");
                if !shape.named.is_empty() {
                    if !shape.positional.is_empty() {
                        out.push_str(", ");
                    }
                    out.push('{');
                    for (i, &(name, field)) in shape.named.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        self.write_type(out, field);
                        let _ = write!(out, " {}", db.resolve_atom(name));
                    }
                    out.push('}');
                }
                out.push(')');
                question(out, shape.nullable);
            }
            TypeData::AsyncUnion { arg, nullable } => {
                out.push_str("AsyncOr<");
                self.write_type(out, arg);
                out.push('>');
                question(out, nullable && !is_nullable(db, arg));
            }
            TypeData::Erased { name, nullable, .. } => {
                out.push_str(&db.resolve_atom(name));
                question(out, nullable);
            }
            TypeData::ClassParam { param, nullable } => {
                out.push_str(&db.resolve_atom(self.registry.type_param(param).name));
                question(out, nullable);
            }
            TypeData::FunctionParam {
                binder,
                index,
                nullable,
            } => {
                match binder {
                    Binder::FunctionType(depth) => {
                        let _ = write!(out, "X{index}@{depth}");
                    }
                    Binder::Frame => {
                        let _ = write!(out, "T{index}");
                    }
                }
                question(out, nullable);
            }
        }
    }

    fn write_list(&self, out: &mut String, open: &str, items: &[TypeId], close: &str) {
        if items.is_empty() {
            return;
        }
        out.push_str(open);
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_type(out, item);
        }
        out.push_str(close);
    }
}

fn question(out: &mut String, nullable: bool) {
    if nullable {
        out.push('?');
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
