//! Source type representation.
//!
//! Source types are interned: every structurally distinct type is stored once
//! in the [`TypeInterner`](crate::TypeInterner) and referred to by a `TypeId`.
//! Function-scoped type parameters bound by a function *type* are referenced
//! with a binder depth (De Bruijn style) rather than by identity, so two
//! alpha-equivalent function types intern to the same `TypeId` and their
//! parameter-index offsets can be memoized per shape.

use rtt_common::{Atom, ClassId};

/// Interned handle of a source type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// `dynamic`: top type.
    pub const DYNAMIC: TypeId = TypeId(0);
    /// `void`: top type.
    pub const VOID: TypeId = TypeId(1);
    /// Unresolvable type from an erroneous program: top type.
    pub const INVALID: TypeId = TypeId(2);
    /// Non-nullable bottom type.
    pub const NEVER: TypeId = TypeId(3);
    /// The canonical null type.
    pub const NULL: TypeId = TypeId(4);

    /// First id handed out for non-intrinsic types.
    pub const FIRST_USER: u32 = 5;

    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }
}

/// The three display variants of the top type. They behave identically.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TopKind {
    Dynamic,
    Void,
    Invalid,
}

/// Identity of a class-scoped type parameter declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParamId(pub u32);

/// Interned list of type ids (type arguments, positional fields).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeListId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionShapeId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordShapeId(pub u32);

/// What binds a function-scoped type parameter reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Binder {
    /// A generic function *type* enclosing the reference. `0` is the innermost
    /// enclosing function type, `1` the one around it, and so on.
    FunctionType(u32),
    /// The generic function whose call frame is executing; the parameter is
    /// read from the frame's indexed type-parameter slots.
    Frame,
}

/// A source type.
///
/// This is a closed sum: every consumer matches it exhaustively.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Top(TopKind),
    /// Bottom type. The nullable form normalizes to [`TypeData::Null`].
    Never {
        nullable: bool,
    },
    Null,
    /// Nominal class type with type arguments.
    Interface {
        class: ClassId,
        args: TypeListId,
        nullable: bool,
    },
    Function(FunctionShapeId),
    /// Anonymous tuple type.
    Record(RecordShapeId),
    /// "`arg` or an asynchronous wrapper of `arg`".
    AsyncUnion {
        arg: TypeId,
        nullable: bool,
    },
    /// Source-level type that is its representation type at run time.
    Erased {
        name: Atom,
        representation: TypeId,
        nullable: bool,
    },
    /// Reference to a type parameter declared by a class.
    ClassParam {
        param: TypeParamId,
        nullable: bool,
    },
    /// Reference to a type parameter declared by a generic function type or
    /// by the generic function of the current frame.
    FunctionParam {
        binder: Binder,
        index: u32,
        nullable: bool,
    },
}

/// Generic parameter of a function type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamInfo {
    pub name: Atom,
    pub bound: TypeId,
    pub default: TypeId,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamedParam {
    pub name: Atom,
    pub type_id: TypeId,
    pub required: bool,
}

/// Signature of a function type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub type_params: Vec<TypeParamInfo>,
    pub positional: Vec<TypeId>,
    /// Number of leading positional parameters that are required.
    pub required_positional: u32,
    /// Sorted by name.
    pub named: Vec<NamedParam>,
    pub return_type: TypeId,
    pub nullable: bool,
}

impl FunctionShape {
    /// A non-generic function type with only required positional parameters.
    pub fn simple(positional: Vec<TypeId>, return_type: TypeId) -> Self {
        let required_positional = positional.len() as u32;
        FunctionShape {
            type_params: Vec::new(),
            positional,
            required_positional,
            named: Vec::new(),
            return_type,
            nullable: false,
        }
    }

    /// Every type directly nested in this shape, in declaration order.
    pub fn child_types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.type_params
            .iter()
            .flat_map(|p| [p.bound, p.default])
            .chain(self.positional.iter().copied())
            .chain(self.named.iter().map(|n| n.type_id))
            .chain(std::iter::once(self.return_type))
    }
}

/// Shape of a record type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordShape {
    pub positional: Vec<TypeId>,
    /// Sorted by name.
    pub named: Vec<(Atom, TypeId)>,
    pub nullable: bool,
}

impl RecordShape {
    /// Field types: positional followed by named.
    pub fn field_types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.positional
            .iter()
            .copied()
            .chain(self.named.iter().map(|(_, t)| *t))
    }
}
