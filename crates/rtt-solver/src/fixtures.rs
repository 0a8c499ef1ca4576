//! A small but representative program used by tests and benchmarks.
//!
//! ```text
//! 0 Object            1 Function (abstract)   2 _Closure
//! 3 Record            4 Future<T> (abstract)
//! 5 int               6 _BoxedInt implements int, masquerades as int
//! 7 String            8 _OneByteString implements String, masquerades as String
//! 9 Iterable<E> (abstract)
//! 10 List<E> (abstract) implements Iterable<E>
//! 11 _GrowableList<E> implements List<E>
//! 12 _FixedList<E> implements List<E>
//! 13 Map<K, V> (abstract)
//! 14 _HashMap<K, V> implements Map<K, V>
//! 15 _SwappedMap<K, V> implements Map<V, K>
//! 16 Comparable<T> (abstract)
//! 17 Uninstantiable (abstract)
//! 18 _FutureImpl<T> implements Future<T>
//! 19 _IntList implements List<int>
//! ```

use crate::class_hierarchy::{ClassHierarchy, ClassRegistry};
use crate::intern::TypeInterner;
use crate::types::TypeId;
use rtt_common::ClassId;

pub struct SampleProgram {
    pub db: TypeInterner,
    pub hierarchy: ClassHierarchy,
    pub int: ClassId,
    pub boxed_int: ClassId,
    pub string: ClassId,
    pub one_byte_string: ClassId,
    pub iterable: ClassId,
    pub list: ClassId,
    pub growable_list: ClassId,
    pub fixed_list: ClassId,
    pub map: ClassId,
    pub hash_map: ClassId,
    pub swapped_map: ClassId,
    pub comparable: ClassId,
    pub uninstantiable: ClassId,
    pub future_impl: ClassId,
    pub int_list: ClassId,
}

impl SampleProgram {
    pub fn new() -> Self {
        let db = TypeInterner::new();
        let mut h = ClassHierarchy::with_core(&db);

        let int = h.declare_class(&db, "int", &[]);
        let boxed_int = h.declare_class(&db, "_BoxedInt", &[]);
        let int_type = db.interface(int, Vec::new(), false);
        h.add_supertype(&db, boxed_int, int_type);
        h.set_masquerade(boxed_int, int);
        let string = h.declare_class(&db, "String", &[]);
        let one_byte_string = h.declare_class(&db, "_OneByteString", &[]);
        let string_type = db.interface(string, Vec::new(), false);
        h.add_supertype(&db, one_byte_string, string_type);
        h.set_masquerade(one_byte_string, string);

        let iterable = h.declare_class(&db, "Iterable", &["E"]);
        h.set_abstract(iterable, true);

        let list = h.declare_class(&db, "List", &["E"]);
        h.set_abstract(list, true);
        let e = db.class_param(h.type_param_of(list, 0), false);
        let iterable_e = db.interface(iterable, vec![e], false);
        h.add_supertype(&db, list, iterable_e);

        let growable_list = h.declare_class(&db, "_GrowableList", &["E"]);
        let e = db.class_param(h.type_param_of(growable_list, 0), false);
        let list_e = db.interface(list, vec![e], false);
        h.add_supertype(&db, growable_list, list_e);

        let fixed_list = h.declare_class(&db, "_FixedList", &["E"]);
        let e = db.class_param(h.type_param_of(fixed_list, 0), false);
        let list_e = db.interface(list, vec![e], false);
        h.add_supertype(&db, fixed_list, list_e);

        let map = h.declare_class(&db, "Map", &["K", "V"]);
        h.set_abstract(map, true);

        let hash_map = h.declare_class(&db, "_HashMap", &["K", "V"]);
        let k = db.class_param(h.type_param_of(hash_map, 0), false);
        let v = db.class_param(h.type_param_of(hash_map, 1), false);
        let map_kv = db.interface(map, vec![k, v], false);
        h.add_supertype(&db, hash_map, map_kv);

        let swapped_map = h.declare_class(&db, "_SwappedMap", &["K", "V"]);
        let k = db.class_param(h.type_param_of(swapped_map, 0), false);
        let v = db.class_param(h.type_param_of(swapped_map, 1), false);
        let map_vk = db.interface(map, vec![v, k], false);
        h.add_supertype(&db, swapped_map, map_vk);

        let comparable = h.declare_class(&db, "Comparable", &["T"]);
        h.set_abstract(comparable, true);

        let uninstantiable = h.declare_class(&db, "Uninstantiable", &[]);
        h.set_abstract(uninstantiable, true);

        let future = h.well_known().future;
        let future_impl = h.declare_class(&db, "_FutureImpl", &["T"]);
        let t = db.class_param(h.type_param_of(future_impl, 0), false);
        let future_t = db.interface(future, vec![t], false);
        h.add_supertype(&db, future_impl, future_t);

        let int_list = h.declare_class(&db, "_IntList", &[]);
        let list_int = db.interface(list, vec![int_type], false);
        h.add_supertype(&db, int_list, list_int);

        SampleProgram {
            db,
            hierarchy: h,
            int,
            boxed_int,
            string,
            one_byte_string,
            iterable,
            list,
            growable_list,
            fixed_list,
            map,
            hash_map,
            swapped_map,
            comparable,
            uninstantiable,
            future_impl,
            int_list,
        }
    }

    /// `class<args>`, non-nullable.
    pub fn instance(&self, class: ClassId, args: Vec<TypeId>) -> TypeId {
        self.db.interface(class, args, false)
    }

    pub fn int_type(&self) -> TypeId {
        self.instance(self.int, Vec::new())
    }

    pub fn string_type(&self) -> TypeId {
        self.instance(self.string, Vec::new())
    }

    pub fn object_type(&self, nullable: bool) -> TypeId {
        self.db
            .interface(self.hierarchy.well_known().object, Vec::new(), nullable)
    }
}

impl Default for SampleProgram {
    fn default() -> Self {
        Self::new()
    }
}
