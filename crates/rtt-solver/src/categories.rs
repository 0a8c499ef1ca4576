//! Type category table and per-class display names.

use crate::class_hierarchy::ClassRegistry;
use crate::intern::TypeInterner;
use rtt_common::limits::{is_masquerade_band, type_category};
use rtt_common::{ClassId, ice};
use std::sync::Arc;

/// One category byte per class id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCategoryTable {
    bytes: Vec<u8>,
}

impl TypeCategoryTable {
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn build(registry: &dyn ClassRegistry) -> Self {
        let well_known = registry.well_known();
        let count = registry.class_count();

        let base_category = |class: ClassId| -> u8 {
            let decl = registry.class(class);
            if class == well_known.object {
                type_category::OBJECT
            } else if class == well_known.closure {
                type_category::FUNCTION
            } else if class == well_known.record {
                type_category::RECORD
            } else if decl.is_abstract {
                type_category::ABSTRACT
            } else {
                type_category::NOT_MASQUERADED
            }
        };

        let mut bytes = Vec::with_capacity(count);
        for index in 0..count {
            let class = ClassId::from_index(index);
            let mut category = base_category(class);
            if category == type_category::NOT_MASQUERADED
                && let Some(target) = registry.masquerade_of(class)
            {
                if !is_masquerade_band(target.0) {
                    ice!(
                        "{} masquerades as {} outside the reserved band",
                        class,
                        target
                    );
                }
                if target.index() >= count
                    || base_category(target) != type_category::NOT_MASQUERADED
                    || registry.masquerade_of(target).is_some()
                {
                    ice!("{} masquerades as {} which is not an ordinary class", class, target);
                }
                category = target.0 as u8;
            }
            bytes.push(category);
        }
        TypeCategoryTable { bytes }
    }

    pub fn category(&self, class: ClassId) -> u8 {
        match self.bytes.get(class.index()) {
            Some(&byte) => byte,
            None => ice!("missing class identity {}", class),
        }
    }

    /// Identity `class` reports in subtype tables, or `None` for the special
    /// categories.
    pub fn reported_class(&self, class: ClassId) -> Option<ClassId> {
        match self.category(class) {
            type_category::NOT_MASQUERADED => Some(class),
            byte if u32::from(byte) >= rtt_common::limits::FIRST_MASQUERADE_CLASS_ID => {
                Some(ClassId(u32::from(byte)))
            }
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Per-class display names, empty strings when `minify` is set.
pub fn type_names(db: &TypeInterner, registry: &dyn ClassRegistry, minify: bool) -> Vec<Arc<str>> {
    (0..registry.class_count())
        .map(|index| {
            if minify {
                Arc::from("")
            } else {
                db.resolve_atom(registry.class(ClassId::from_index(index)).name)
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/categories_tests.rs"]
mod tests;
