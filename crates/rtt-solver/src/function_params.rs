//! Function-type parameter indexing.
//!
//! Every function type gets an offset; its own generic parameters occupy
//! `[offset, offset + count)`. When a function type `G` nested inside `F`
//! mentions one of `F`'s parameters, `F`'s range must start at or above the
//! end of `G`'s, so inside `G` the two sets of parameters never share an
//! index. Sibling function types may reuse ranges freely.
//!
//! Offsets depend only on a function type's own subtree, so they are memoized
//! per interned [`FunctionShapeId`]. The walk uses an explicit stack and never
//! recurses, whatever the nesting depth.

use crate::intern::TypeInterner;
use crate::types::{Binder, FunctionShapeId, TypeData, TypeId};
use dashmap::DashMap;
use rtt_common::ice;
use smallvec::SmallVec;
use std::ops::Range;

enum Step {
    Visit(TypeId),
    Exit,
}

/// An open function type during the walk.
struct OpenScope {
    shape: FunctionShapeId,
    /// Function types nested inside this one that mention its parameters.
    containing: SmallVec<[FunctionShapeId; 4]>,
}

/// Memoizing function-type parameter indexer. Shareable across threads.
#[derive(Default)]
pub struct FunctionTypeIndexer {
    offsets: DashMap<FunctionShapeId, u32>,
}

impl FunctionTypeIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset of the function type `shape`, computing it (and the offsets of
    /// every function type nested inside it) on first use.
    pub fn offset(&self, db: &TypeInterner, shape: FunctionShapeId) -> u32 {
        if let Some(offset) = self.offsets.get(&shape) {
            return *offset;
        }
        self.compute(db, shape)
    }

    /// Offset of a type that must be a function type.
    pub fn offset_of_type(&self, db: &TypeInterner, type_id: TypeId) -> u32 {
        match db.data(type_id) {
            TypeData::Function(shape) => self.offset(db, shape),
            other => ice!("offset requested for non-function type {:?}", other),
        }
    }

    /// Global index of `shape`'s generic parameter at position `index`.
    pub fn parameter_index(&self, db: &TypeInterner, shape: FunctionShapeId, index: u32) -> u32 {
        let count = db.function_shape(shape).type_params.len() as u32;
        if index >= count {
            ice!("function type has {} type parameters, index {} requested", count, index);
        }
        self.offset(db, shape) + index
    }

    /// The index range of `shape`'s own generic parameters.
    pub fn parameter_range(&self, db: &TypeInterner, shape: FunctionShapeId) -> Range<u32> {
        let offset = self.offset(db, shape);
        offset..offset + db.function_shape(shape).type_params.len() as u32
    }

    pub fn memoized_count(&self) -> usize {
        self.offsets.len()
    }

    fn compute(&self, db: &TypeInterner, root: FunctionShapeId) -> u32 {
        let mut open: Vec<OpenScope> = Vec::new();
        let mut work: Vec<Step> = Vec::new();
        self.enter(db, root, &mut open, &mut work);

        while let Some(step) = work.pop() {
            match step {
                Step::Visit(type_id) => match db.data(type_id) {
                    TypeData::Function(shape) => self.enter(db, shape, &mut open, &mut work),
                    TypeData::FunctionParam {
                        binder: Binder::FunctionType(depth),
                        ..
                    } => {
                        let depth = depth as usize;
                        // References to function types enclosing the root are free here.
                        if depth < open.len() {
                            let owner = open.len() - 1 - depth;
                            let nested: SmallVec<[FunctionShapeId; 4]> =
                                open[owner + 1..].iter().map(|s| s.shape).collect();
                            open[owner].containing.extend(nested);
                        }
                    }
                    TypeData::Interface { args, .. } => {
                        work.extend(db.type_list(args).iter().rev().map(|&t| Step::Visit(t)));
                    }
                    TypeData::Record(shape) => {
                        let fields: SmallVec<[TypeId; 8]> =
                            db.record_shape(shape).field_types().collect();
                        work.extend(fields.into_iter().rev().map(Step::Visit));
                    }
                    TypeData::AsyncUnion { arg, .. } => work.push(Step::Visit(arg)),
                    TypeData::Erased { representation, .. } => {
                        work.push(Step::Visit(representation));
                    }
                    TypeData::Top(_)
                    | TypeData::Never { .. }
                    | TypeData::Null
                    | TypeData::ClassParam { .. }
                    | TypeData::FunctionParam {
                        binder: Binder::Frame,
                        ..
                    } => {}
                },
                Step::Exit => {
                    let Some(scope) = open.pop() else {
                        ice!("function type walk exited more scopes than it entered");
                    };
                    let offset = scope
                        .containing
                        .iter()
                        .map(|&g| self.memoized(g) + db.function_shape(g).type_params.len() as u32)
                        .max()
                        .unwrap_or(0);
                    self.offsets.entry(scope.shape).or_insert(offset);
                    tracing::trace!(shape = scope.shape.0, offset, "function type offset");
                }
            }
        }

        self.memoized(root)
    }

    fn enter(
        &self,
        db: &TypeInterner,
        shape: FunctionShapeId,
        open: &mut Vec<OpenScope>,
        work: &mut Vec<Step>,
    ) {
        open.push(OpenScope {
            shape,
            containing: SmallVec::new(),
        });
        work.push(Step::Exit);
        let children: SmallVec<[TypeId; 8]> = db.function_shape(shape).child_types().collect();
        work.extend(children.into_iter().rev().map(Step::Visit));
    }

    fn memoized(&self, shape: FunctionShapeId) -> u32 {
        match self.offsets.get(&shape) {
            Some(offset) => *offset,
            None => ice!("function type offset used before it was computed"),
        }
    }
}

#[cfg(test)]
#[path = "../tests/function_params_tests.rs"]
mod tests;
