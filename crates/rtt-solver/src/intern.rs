//! Type interning for structural deduplication.
//!
//! Converts `TypeData` structures into lightweight `TypeId` handles.
//!
//! Benefits:
//! - O(1) type equality (just compare `TypeId` values)
//! - Stable integer keys for memoized side tables (function-type offsets,
//!   lattice substitution vectors)
//! - Each unique structure stored once

use crate::types::*;
use rtt_common::{Atom, ClassId, NameInterner, ice};
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

struct SliceInterner<T> {
    items: Vec<Arc<[T]>>,
    map: FxHashMap<Arc<[T]>, u32>,
}

impl<T> SliceInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        let empty: Arc<[T]> = Arc::from(Vec::new());
        let mut map = FxHashMap::default();
        map.insert(empty.clone(), 0);
        SliceInterner {
            items: vec![empty],
            map,
        }
    }

    fn intern(&mut self, items: Vec<T>) -> u32 {
        if items.is_empty() {
            return 0;
        }
        if let Some(&id) = self.map.get(items.as_slice()) {
            return id;
        }
        let arc: Arc<[T]> = items.into();
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<[T]>> {
        self.items.get(id as usize).cloned()
    }
}

struct ValueInterner<T> {
    items: Vec<Arc<T>>,
    map: FxHashMap<Arc<T>, u32>,
}

impl<T> ValueInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        ValueInterner {
            items: Vec::new(),
            map: FxHashMap::default(),
        }
    }

    fn intern(&mut self, value: T) -> u32 {
        if let Some(&id) = self.map.get(&value) {
            return id;
        }
        let arc = Arc::new(value);
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<T>> {
        self.items.get(id as usize).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Type interning table.
/// Thread-safe via `RwLock` so tables built from it can be shared across
/// worker threads that synthesize checks for different call sites.
pub struct TypeInterner {
    /// String interner for class, parameter and field names.
    pub string_interner: NameInterner,
    types: RwLock<ValueInterner<TypeData>>,
    type_lists: RwLock<SliceInterner<TypeId>>,
    function_shapes: RwLock<ValueInterner<FunctionShape>>,
    record_shapes: RwLock<ValueInterner<RecordShape>>,
}

impl TypeInterner {
    /// Create a new type interner with pre-registered intrinsics.
    pub fn new() -> Self {
        let interner = TypeInterner {
            string_interner: NameInterner::with_prelude(),
            types: RwLock::new(ValueInterner::new()),
            type_lists: RwLock::new(SliceInterner::new()),
            function_shapes: RwLock::new(ValueInterner::new()),
            record_shapes: RwLock::new(ValueInterner::new()),
        };

        let intrinsics = [
            (TypeId::DYNAMIC, TypeData::Top(TopKind::Dynamic)),
            (TypeId::VOID, TypeData::Top(TopKind::Void)),
            (TypeId::INVALID, TypeData::Top(TopKind::Invalid)),
            (TypeId::NEVER, TypeData::Never { nullable: false }),
            (TypeId::NULL, TypeData::Null),
        ];
        for (expected, data) in intrinsics {
            let id = interner.intern(data);
            debug_assert_eq!(id, expected, "intrinsic registered out of order");
        }
        interner
    }

    pub fn intern_string(&self, s: &str) -> Atom {
        self.string_interner.intern(s)
    }

    pub fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        self.string_interner.resolve(atom)
    }

    /// Intern a type and return its `TypeId`.
    pub fn intern(&self, data: TypeData) -> TypeId {
        let mut types = self.types.write().expect("types lock poisoned");
        TypeId(types.intern(data))
    }

    /// Look up the `TypeData` for a given `TypeId`.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        self.types
            .read()
            .expect("types lock poisoned")
            .get(id.0)
            .map(|data| *data)
    }

    /// Look up a `TypeId` this interner produced.
    pub fn data(&self, id: TypeId) -> TypeData {
        match self.lookup(id) {
            Some(data) => data,
            None => ice!("type id {} was not produced by this interner", id.0),
        }
    }

    /// Number of distinct types interned so far, intrinsics included.
    pub fn len(&self) -> usize {
        self.types.read().expect("types lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        match self
            .type_lists
            .read()
            .expect("type_lists lock poisoned")
            .get(id.0)
        {
            Some(list) => list,
            None => ice!("unknown type list {}", id.0),
        }
    }

    pub fn function_shape(&self, id: FunctionShapeId) -> Arc<FunctionShape> {
        match self
            .function_shapes
            .read()
            .expect("function_shapes lock poisoned")
            .get(id.0)
        {
            Some(shape) => shape,
            None => ice!("unknown function shape {}", id.0),
        }
    }

    pub fn record_shape(&self, id: RecordShapeId) -> Arc<RecordShape> {
        match self
            .record_shapes
            .read()
            .expect("record_shapes lock poisoned")
            .get(id.0)
        {
            Some(shape) => shape,
            None => ice!("unknown record shape {}", id.0),
        }
    }

    fn intern_type_list(&self, members: Vec<TypeId>) -> TypeListId {
        let mut lists = self.type_lists.write().expect("type_lists lock poisoned");
        TypeListId(lists.intern(members))
    }

    fn intern_function_shape(&self, shape: FunctionShape) -> FunctionShapeId {
        let mut shapes = self
            .function_shapes
            .write()
            .expect("function_shapes lock poisoned");
        FunctionShapeId(shapes.intern(shape))
    }

    fn intern_record_shape(&self, shape: RecordShape) -> RecordShapeId {
        let mut shapes = self
            .record_shapes
            .write()
            .expect("record_shapes lock poisoned");
        RecordShapeId(shapes.intern(shape))
    }

    // =========================================================================
    // Type constructors
    // =========================================================================

    pub fn never(&self, nullable: bool) -> TypeId {
        if nullable {
            self.intern(TypeData::Never { nullable: true })
        } else {
            TypeId::NEVER
        }
    }

    pub fn interface(&self, class: ClassId, args: Vec<TypeId>, nullable: bool) -> TypeId {
        let args = self.intern_type_list(args);
        self.intern(TypeData::Interface {
            class,
            args,
            nullable,
        })
    }

    /// Intern a function type. Named parameters are sorted by name.
    pub fn function(&self, mut shape: FunctionShape) -> TypeId {
        if shape.required_positional as usize > shape.positional.len() {
            ice!(
                "function type requires {} of {} positional parameters",
                shape.required_positional,
                shape.positional.len()
            );
        }
        shape
            .named
            .sort_by(|a, b| self.resolve_atom(a.name).cmp(&self.resolve_atom(b.name)));
        let shape_id = self.intern_function_shape(shape);
        self.intern(TypeData::Function(shape_id))
    }

    /// Intern a record type. Named fields are sorted by name.
    pub fn record(&self, positional: Vec<TypeId>, named: Vec<(Atom, TypeId)>, nullable: bool) -> TypeId {
        let mut named = named;
        named.sort_by(|a, b| self.resolve_atom(a.0).cmp(&self.resolve_atom(b.0)));
        let shape_id = self.intern_record_shape(RecordShape {
            positional,
            named,
            nullable,
        });
        self.intern(TypeData::Record(shape_id))
    }

    pub fn async_union(&self, arg: TypeId, nullable: bool) -> TypeId {
        self.intern(TypeData::AsyncUnion { arg, nullable })
    }

    pub fn erased(&self, name: &str, representation: TypeId, nullable: bool) -> TypeId {
        let name = self.intern_string(name);
        self.intern(TypeData::Erased {
            name,
            representation,
            nullable,
        })
    }

    pub fn class_param(&self, param: TypeParamId, nullable: bool) -> TypeId {
        self.intern(TypeData::ClassParam { param, nullable })
    }

    pub fn function_param(&self, binder: Binder, index: u32, nullable: bool) -> TypeId {
        self.intern(TypeData::FunctionParam {
            binder,
            index,
            nullable,
        })
    }

    /// Re-intern `shape` with a different nullability.
    pub(crate) fn function_with_nullability(&self, shape_id: FunctionShapeId, nullable: bool) -> TypeId {
        let shape = self.function_shape(shape_id);
        if shape.nullable == nullable {
            return self.intern(TypeData::Function(shape_id));
        }
        let mut shape = (*shape).clone();
        shape.nullable = nullable;
        let shape_id = self.intern_function_shape(shape);
        self.intern(TypeData::Function(shape_id))
    }

    pub(crate) fn record_with_nullability(&self, shape_id: RecordShapeId, nullable: bool) -> TypeId {
        let shape = self.record_shape(shape_id);
        if shape.nullable == nullable {
            return self.intern(TypeData::Record(shape_id));
        }
        let mut shape = (*shape).clone();
        shape.nullable = nullable;
        let shape_id = self.intern_record_shape(shape);
        self.intern(TypeData::Record(shape_id))
    }

    /// Intern an already-sorted function shape without re-sorting.
    pub(crate) fn function_from_shape(&self, shape: FunctionShape) -> TypeId {
        let shape_id = self.intern_function_shape(shape);
        self.intern(TypeData::Function(shape_id))
    }

    /// Intern an already-sorted record shape without re-sorting.
    pub(crate) fn record_from_shape(&self, shape: RecordShape) -> TypeId {
        let shape_id = self.intern_record_shape(shape);
        self.intern(TypeData::Record(shape_id))
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
