//! General run-time subtype algorithm.
//!
//! This is the slow path emitted type checks fall back to, and the reference
//! the fast paths are verified against. Interfaces are related through the
//! decoded ancestor tables; generic function types are related by pairing
//! their parameters positionally through the offsets assigned at compile time.

use crate::tables::TypeTables;
use crate::types::{FunctionRuntimeType, NamedParameter, RuntimeType};
use crate::value::Value;
use smallvec::SmallVec;

/// One function type's generic parameters within a comparison.
struct ScopeSide {
    offset: u32,
    bounds: Vec<RuntimeType>,
}

impl ScopeSide {
    fn position(&self, index: u32) -> Option<usize> {
        let position = index.checked_sub(self.offset)? as usize;
        (position < self.bounds.len()).then_some(position)
    }
}

/// Generic parameters of a pair of function types being compared.
///
/// `sides[0]` belongs to the operand that was on the left of the outermost
/// comparison. Contravariant positions swap operands, so lookups pick the
/// side from the current orientation.
struct FunctionScope {
    sides: [ScopeSide; 2],
}

type Scopes = SmallVec<[FunctionScope; 4]>;

pub struct SubtypeChecker<'a> {
    tables: &'a TypeTables,
}

impl<'a> SubtypeChecker<'a> {
    pub fn new(tables: &'a TypeTables) -> Self {
        SubtypeChecker { tables }
    }

    pub fn tables(&self) -> &'a TypeTables {
        self.tables
    }

    /// Whether `value` is an instance of `ty`.
    pub fn is_instance(&self, value: &Value, ty: &RuntimeType) -> bool {
        let value_type = self.tables.runtime_type_of(value);
        self.is_subtype(&value_type, ty)
    }

    pub fn is_subtype(&self, s: &RuntimeType, t: &RuntimeType) -> bool {
        let mut scopes = Scopes::new();
        let result = self.is_subtype_in(s, t, false, &mut scopes);
        tracing::trace!(
            s = %self.tables.describe(s),
            t = %self.tables.describe(t),
            result,
            "is_subtype"
        );
        result
    }

    /// `flipped` is set when `s` comes from the right-hand side of the
    /// outermost comparison.
    fn is_subtype_in(
        &self,
        s: &RuntimeType,
        t: &RuntimeType,
        flipped: bool,
        scopes: &mut Scopes,
    ) -> bool {
        let object = self.tables.well_known.object;

        if t.is_top(object) {
            return true;
        }
        match s {
            RuntimeType::Top(_) => return false,
            RuntimeType::Never => return true,
            RuntimeType::Null => return t.is_nullable(),
            _ => {}
        }
        // Left nullable: `s?` needs `Null <: t` and `s <: t`.
        if s.is_nullable() {
            if !t.is_nullable() {
                return false;
            }
            let non_null = s.as_non_nullable();
            if non_null != *s {
                return self.is_subtype_in(&non_null, t, flipped, scopes);
            }
        }

        // Type variable of a function type on the left.
        if let RuntimeType::FunctionParam { index, .. } = s {
            let left = usize::from(flipped);
            let owner = scopes.iter().rev().find_map(|scope| {
                scope.sides[left]
                    .position(*index)
                    .map(|position| (scope, position))
            });
            let Some((scope, position)) = owner else {
                return matches!(t, RuntimeType::FunctionParam { index: t_index, .. } if t_index == index);
            };
            if let RuntimeType::FunctionParam { index: t_index, .. } = t
                && scope.sides[1 - left].position(*t_index) == Some(position)
            {
                return true;
            }
            let bound = scope.sides[left].bounds[position].clone();
            return self.is_subtype_in(&bound, t, flipped, scopes);
        }

        // Left absorbing union: both alternatives must be subtypes.
        if let RuntimeType::AsyncUnion { arg, .. } = s {
            let future = self.future_of(arg);
            return self.is_subtype_in(arg, t, flipped, scopes)
                && self.is_subtype_in(&future, t, flipped, scopes);
        }

        // Right absorbing union: either alternative suffices.
        if let RuntimeType::AsyncUnion { arg, .. } = t {
            if self.is_subtype_in(s, arg, flipped, scopes) {
                return true;
            }
            let future = self.future_of(arg);
            return self.is_subtype_in(s, &future, flipped, scopes);
        }

        if t.is_object(object) {
            return true;
        }

        match (s, t) {
            (
                RuntimeType::Interface {
                    class: s_class,
                    args: s_args,
                    ..
                },
                RuntimeType::Interface {
                    class: t_class,
                    args: t_args,
                    ..
                },
            ) => {
                if s_class == t_class {
                    return self.all_subtypes(s_args, t_args, flipped, scopes);
                }
                let Some(substitution) = self.tables.substitution(*s_class, *t_class) else {
                    return false;
                };
                let viewed: Option<Vec<RuntimeType>> =
                    substitution.iter().map(|ty| ty.substitute(s_args)).collect();
                match viewed {
                    Some(viewed) => self.all_subtypes(&viewed, t_args, flipped, scopes),
                    None => false,
                }
            }
            (RuntimeType::Function(_), RuntimeType::Interface { class, .. }) => {
                *class == self.tables.well_known.function
            }
            (RuntimeType::Record { .. }, RuntimeType::Interface { class, .. }) => {
                *class == self.tables.well_known.record
            }
            (RuntimeType::Function(s_fn), RuntimeType::Function(t_fn)) => {
                self.is_function_subtype(s_fn, t_fn, flipped, scopes)
            }
            (
                RuntimeType::Record {
                    names: s_names,
                    fields: s_fields,
                    ..
                },
                RuntimeType::Record {
                    names: t_names,
                    fields: t_fields,
                    ..
                },
            ) => s_names == t_names && self.all_subtypes(s_fields, t_fields, flipped, scopes),
            _ => false,
        }
    }

    fn future_of(&self, arg: &RuntimeType) -> RuntimeType {
        RuntimeType::interface(self.tables.well_known.future, vec![arg.clone()])
    }

    fn is_function_subtype(
        &self,
        s: &FunctionRuntimeType,
        t: &FunctionRuntimeType,
        flipped: bool,
        scopes: &mut Scopes,
    ) -> bool {
        if s.type_param_count() != t.type_param_count() {
            return false;
        }
        let generic = s.type_param_count() > 0;
        if generic {
            let left = ScopeSide {
                offset: s.type_param_offset,
                bounds: s.bounds.clone(),
            };
            let right = ScopeSide {
                offset: t.type_param_offset,
                bounds: t.bounds.clone(),
            };
            let sides = if flipped { [right, left] } else { [left, right] };
            scopes.push(FunctionScope { sides });
        }
        let result = self.function_signatures_related(s, t, flipped, scopes);
        if generic {
            scopes.pop();
        }
        result
    }

    fn function_signatures_related(
        &self,
        s: &FunctionRuntimeType,
        t: &FunctionRuntimeType,
        flipped: bool,
        scopes: &mut Scopes,
    ) -> bool {
        // Bounds must be mutual subtypes with parameters paired up.
        for (s_bound, t_bound) in s.bounds.iter().zip(&t.bounds) {
            if !self.is_subtype_in(s_bound, t_bound, flipped, scopes)
                || !self.is_subtype_in(t_bound, s_bound, !flipped, scopes)
            {
                return false;
            }
        }

        if !self.is_subtype_in(&s.return_type, &t.return_type, flipped, scopes) {
            return false;
        }

        if s.required_positional > t.required_positional || s.positional.len() < t.positional.len()
        {
            return false;
        }
        for (s_param, t_param) in s.positional.iter().zip(&t.positional) {
            if !self.is_subtype_in(t_param, s_param, !flipped, scopes) {
                return false;
            }
        }

        self.named_parameters_related(&s.named, &t.named, flipped, scopes)
    }

    /// Every named parameter `t` accepts must be accepted by `s` with a
    /// supertype; every parameter `s` requires must be required by `t`.
    fn named_parameters_related(
        &self,
        s_named: &[NamedParameter],
        t_named: &[NamedParameter],
        flipped: bool,
        scopes: &mut Scopes,
    ) -> bool {
        let mut s_iter = s_named.iter().peekable();
        for t_param in t_named {
            loop {
                let Some(s_param) = s_iter.peek() else {
                    return false;
                };
                match s_param.name.cmp(&t_param.name) {
                    std::cmp::Ordering::Less => {
                        if s_param.required {
                            return false;
                        }
                        s_iter.next();
                    }
                    std::cmp::Ordering::Equal => {
                        if s_param.required && !t_param.required {
                            return false;
                        }
                        if !self.is_subtype_in(&t_param.ty, &s_param.ty, !flipped, scopes) {
                            return false;
                        }
                        s_iter.next();
                        break;
                    }
                    std::cmp::Ordering::Greater => return false,
                }
            }
        }
        s_iter.all(|s_param| !s_param.required)
    }

    fn all_subtypes(
        &self,
        s: &[RuntimeType],
        t: &[RuntimeType],
        flipped: bool,
        scopes: &mut Scopes,
    ) -> bool {
        s.len() == t.len()
            && s.iter()
                .zip(t)
                .all(|(s_arg, t_arg)| self.is_subtype_in(s_arg, t_arg, flipped, scopes))
    }
}

#[cfg(test)]
#[path = "../tests/subtype_tests.rs"]
mod tests;
