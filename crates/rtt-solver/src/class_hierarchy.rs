//! Class registry.
//!
//! The runtime-type passes never see class bodies. They consume a registry
//! that answers identity, abstractness, masquerade, declared type parameters
//! and subtype-graph questions. [`ClassRegistry`] is that seam;
//! [`ClassHierarchy`] is the in-memory implementation the driver fills in
//! dense identity order.
//!
//! Supertypes are recorded as interface types written over the declaring
//! class's own type parameters, e.g. `class GrowableList<E> implements List<E>`
//! records `List<ClassParam(E)>`. Viewing an instantiation as an ancestor is
//! then substitution along supertype edges.

use crate::intern::TypeInterner;
use crate::substitute::{substitute, substitution_from};
use crate::types::{TypeData, TypeId, TypeParamId};
use rtt_common::{Atom, ClassId, ice};
use rustc_hash::FxHashSet;

/// Declaration of a class type parameter.
#[derive(Clone, Debug)]
pub struct TypeParamDecl {
    pub name: Atom,
    pub owner: ClassId,
    /// Position within the owner's parameter list.
    pub index: u32,
    pub bound: TypeId,
}

/// Registry entry for one class.
#[derive(Clone, Debug)]
pub struct ClassDecl {
    pub id: ClassId,
    pub name: Atom,
    pub is_abstract: bool,
    pub type_params: Vec<TypeParamId>,
    /// Direct supertypes as interface types over `type_params`.
    pub supertypes: Vec<TypeId>,
    /// Class whose identity this class reports in subtype tables.
    pub masquerade: Option<ClassId>,
}

/// Classes the runtime-type passes treat specially.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WellKnownClasses {
    /// Universal top class.
    pub object: ClassId,
    /// Universal function supertype.
    pub function: ClassId,
    /// Run-time representation of closures.
    pub closure: ClassId,
    /// Run-time representation of records.
    pub record: ClassId,
    /// Asynchronous wrapper class, one type parameter.
    pub future: ClassId,
}

/// Class registry queried by the lattice builder, reifier and synthesizer.
pub trait ClassRegistry: Send + Sync {
    /// Number of classes; identities are `0..class_count()`.
    fn class_count(&self) -> usize;

    fn class(&self, id: ClassId) -> &ClassDecl;

    fn type_param(&self, id: TypeParamId) -> &TypeParamDecl;

    /// Every class transitively implementing `class`, including `class` itself.
    fn subtypes_of(&self, class: ClassId) -> Vec<ClassId>;

    /// Type arguments of `ancestor` when an instance of `class<args>` is
    /// viewed as an `ancestor`, or `None` if `class` does not implement it.
    fn type_arguments_as_instance_of(
        &self,
        db: &TypeInterner,
        class: ClassId,
        args: &[TypeId],
        ancestor: ClassId,
    ) -> Option<Vec<TypeId>>;

    fn well_known(&self) -> WellKnownClasses;

    fn masquerade_of(&self, class: ClassId) -> Option<ClassId> {
        self.class(class).masquerade
    }

    /// Non-abstract classes implementing `class`, ascending, `class` included
    /// when it is concrete.
    fn concrete_subclasses(&self, class: ClassId) -> Vec<ClassId> {
        let mut concrete: Vec<ClassId> = self
            .subtypes_of(class)
            .into_iter()
            .filter(|&c| !self.class(c).is_abstract)
            .collect();
        concrete.sort_unstable();
        concrete.dedup();
        concrete
    }

    /// The instance type of `class` over its own type parameters.
    fn this_type(&self, db: &TypeInterner, class: ClassId) -> TypeId {
        let args = self
            .class(class)
            .type_params
            .iter()
            .map(|&p| db.class_param(p, false))
            .collect();
        db.interface(class, args, false)
    }
}

/// In-memory class registry.
pub struct ClassHierarchy {
    classes: Vec<ClassDecl>,
    params: Vec<TypeParamDecl>,
    /// Reverse supertype edges: `direct_subclasses[c]` implement `c` directly.
    direct_subclasses: Vec<Vec<ClassId>>,
    well_known: WellKnownClasses,
}

impl ClassHierarchy {
    /// Create a registry holding the core classes, in identity order:
    /// `Object`, `Function` (abstract), `_Closure`, `Record`, `Future<T>` (abstract).
    pub fn with_core(db: &TypeInterner) -> Self {
        let placeholder = ClassId(0);
        let mut hierarchy = ClassHierarchy {
            classes: Vec::new(),
            params: Vec::new(),
            direct_subclasses: Vec::new(),
            well_known: WellKnownClasses {
                object: placeholder,
                function: placeholder,
                closure: placeholder,
                record: placeholder,
                future: placeholder,
            },
        };

        let object = hierarchy.declare_class(db, "Object", &[]);
        let function = hierarchy.declare_class(db, "Function", &[]);
        hierarchy.set_abstract(function, true);
        let closure = hierarchy.declare_class(db, "_Closure", &[]);
        let function_type = db.interface(function, Vec::new(), false);
        hierarchy.add_supertype(db, closure, function_type);
        let record = hierarchy.declare_class(db, "Record", &[]);
        let future = hierarchy.declare_class(db, "Future", &["T"]);
        hierarchy.set_abstract(future, true);

        hierarchy.well_known = WellKnownClasses {
            object,
            function,
            closure,
            record,
            future,
        };
        hierarchy
    }

    /// Declare the next class. Every class other than the first implicitly
    /// implements `Object` until it is given explicit supertypes.
    pub fn declare_class(&mut self, db: &TypeInterner, name: &str, type_params: &[&str]) -> ClassId {
        let id = ClassId::from_index(self.classes.len());
        let params = type_params
            .iter()
            .enumerate()
            .map(|(index, param_name)| {
                let param = TypeParamId(self.params.len() as u32);
                self.params.push(TypeParamDecl {
                    name: db.intern_string(param_name),
                    owner: id,
                    index: index as u32,
                    bound: TypeId::DYNAMIC,
                });
                param
            })
            .collect();
        self.classes.push(ClassDecl {
            id,
            name: db.intern_string(name),
            is_abstract: false,
            type_params: params,
            supertypes: Vec::new(),
            masquerade: None,
        });
        self.direct_subclasses.push(Vec::new());

        if id.0 != 0 {
            let object = self.classes[0].id;
            let object_type = db.interface(object, Vec::new(), false);
            self.classes[id.index()].supertypes.push(object_type);
            self.direct_subclasses[object.index()].push(id);
        }
        tracing::trace!(class = %id, name, "declared class");
        id
    }

    pub fn set_abstract(&mut self, class: ClassId, is_abstract: bool) {
        self.class_mut(class).is_abstract = is_abstract;
    }

    /// Record `supertype` (an interface type over `class`'s own parameters)
    /// as a direct supertype. Replaces the implicit `Object` edge.
    pub fn add_supertype(&mut self, db: &TypeInterner, class: ClassId, supertype: TypeId) {
        let TypeData::Interface { class: target, .. } = db.data(supertype) else {
            ice!("supertype of {} is not an interface type", class);
        };
        if target.index() >= self.classes.len() {
            ice!("supertype {} of {} is not declared", target, class);
        }
        let object = self.classes[0].id;
        if target != object {
            let implicit = db.interface(object, Vec::new(), false);
            let decl = self.class_mut(class);
            if decl.supertypes.len() == 1 && decl.supertypes[0] == implicit {
                decl.supertypes.clear();
                self.direct_subclasses[object.index()].retain(|&c| c != class);
            }
        }
        self.class_mut(class).supertypes.push(supertype);
        self.direct_subclasses[target.index()].push(class);
    }

    pub fn set_masquerade(&mut self, class: ClassId, target: ClassId) {
        self.class_mut(class).masquerade = Some(target);
    }

    pub fn set_type_param_bound(&mut self, param: TypeParamId, bound: TypeId) {
        match self.params.get_mut(param.0 as usize) {
            Some(decl) => decl.bound = bound,
            None => ice!("unknown type parameter {}", param.0),
        }
    }

    /// Type parameter `index` of `class`.
    pub fn type_param_of(&self, class: ClassId, index: usize) -> TypeParamId {
        match self.class(class).type_params.get(index) {
            Some(&param) => param,
            None => ice!("{} has no type parameter {}", class, index),
        }
    }

    fn class_mut(&mut self, class: ClassId) -> &mut ClassDecl {
        match self.classes.get_mut(class.index()) {
            Some(decl) => decl,
            None => ice!("missing class identity {}", class),
        }
    }
}

impl ClassRegistry for ClassHierarchy {
    fn class_count(&self) -> usize {
        self.classes.len()
    }

    fn class(&self, id: ClassId) -> &ClassDecl {
        match self.classes.get(id.index()) {
            Some(decl) => decl,
            None => ice!("missing class identity {}", id),
        }
    }

    fn type_param(&self, id: TypeParamId) -> &TypeParamDecl {
        match self.params.get(id.0 as usize) {
            Some(decl) => decl,
            None => ice!("unknown type parameter {}", id.0),
        }
    }

    fn subtypes_of(&self, class: ClassId) -> Vec<ClassId> {
        let mut seen = FxHashSet::default();
        let mut result = Vec::new();
        let mut stack = vec![class];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            result.push(current);
            if let Some(subs) = self.direct_subclasses.get(current.index()) {
                stack.extend(subs.iter().copied());
            }
        }
        result
    }

    fn type_arguments_as_instance_of(
        &self,
        db: &TypeInterner,
        class: ClassId,
        args: &[TypeId],
        ancestor: ClassId,
    ) -> Option<Vec<TypeId>> {
        let mut visited = FxHashSet::default();
        let mut stack = vec![(class, args.to_vec())];
        while let Some((current, current_args)) = stack.pop() {
            if current == ancestor {
                return Some(current_args);
            }
            if !visited.insert(current) {
                continue;
            }
            let decl = self.class(current);
            let subst = substitution_from(&decl.type_params, &current_args);
            for &supertype in decl.supertypes.iter().rev() {
                let TypeData::Interface {
                    class: super_class,
                    args: super_args,
                    ..
                } = db.data(supertype)
                else {
                    ice!("supertype of {} is not an interface type", current);
                };
                let viewed = db
                    .type_list(super_args)
                    .iter()
                    .map(|&arg| substitute(db, arg, &subst))
                    .collect();
                stack.push((super_class, viewed));
            }
        }
        None
    }

    fn well_known(&self) -> WellKnownClasses {
        self.well_known
    }
}

#[cfg(test)]
#[path = "../tests/class_hierarchy_tests.rs"]
mod tests;
