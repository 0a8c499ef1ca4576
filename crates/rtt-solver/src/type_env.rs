//! Interface type environment.
//!
//! Records, per generic class visited by the lattice builder, the positional
//! index of each declared type parameter. The reifier and the substitution
//! table materializer use it to turn a class type-parameter reference into
//! "type argument `i` of the receiver".

use crate::class_hierarchy::ClassRegistry;
use crate::types::TypeParamId;
use rtt_common::{ClassId, ice};
use rustc_hash::FxHashMap;

#[derive(Default, Debug)]
pub struct InterfaceTypeEnvironment {
    indices: FxHashMap<TypeParamId, u32>,
}

impl InterfaceTypeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the parameters of `class`. Registering a class twice is a no-op.
    pub fn register_class(&mut self, registry: &dyn ClassRegistry, class: ClassId) {
        for (index, &param) in registry.class(class).type_params.iter().enumerate() {
            self.indices.entry(param).or_insert(index as u32);
        }
    }

    /// Positional index of `param` within its owning class.
    pub fn lookup(&self, param: TypeParamId) -> u32 {
        match self.indices.get(&param) {
            Some(&index) => index,
            None => ice!("type parameter {} was never registered", param.0),
        }
    }

    pub fn try_lookup(&self, param: TypeParamId) -> Option<u32> {
        self.indices.get(&param).copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
