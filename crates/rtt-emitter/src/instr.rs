//! Instruction IR for emitted type checks and reified types.
//!
//! A small structured stack-machine IR. Reifier and synthesizer output is a
//! `Vec<Instr>`; the back end lowers it to target code and the reference
//! [`Machine`](crate::Machine) executes it directly.
//!
//! Blocks are structured: `Br(n)` exits the `n`-th enclosing block, carrying
//! the top of the stack when that block produces a result.

use crate::constants::ConstId;

/// Local variable slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LocalId(pub u32);

/// Object kinds the IR can construct. Fields are listed in push order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StructKind {
    /// Class id, nullable, type-argument array.
    InterfaceType,
    /// Nullable, parameter offset, bounds array, defaults array, return type,
    /// positional array, named-parameter array, required count.
    FunctionType,
    /// Nullable, names array, field-type array.
    RecordType,
    /// Name, type, required flag.
    NamedParameter,
}

/// Helpers supplied by the runtime. Arguments are listed in push order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RuntimeHelper {
    /// Operand, type. Pushes the general algorithm's answer.
    IsSubtype,
    /// Nullable flag, argument type. Pushes the normalized union.
    CreateNormalizedAsyncUnion,
    /// A type. Pushes its nullable form.
    AsNullable,
    /// Operand, type, fast-path result, location (string or null). Pushes the
    /// fast-path result back, or traps on disagreement.
    VerifyTypeCheck,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instr {
    // =========================================================================
    // Constants and locals
    // =========================================================================
    I32Const(i32),
    /// Push a constant-pool entry.
    Const(ConstId),
    RefNull,
    LocalGet(LocalId),
    LocalSet(LocalId),
    LocalTee(LocalId),
    Drop,

    // =========================================================================
    // Construction
    // =========================================================================
    StructNew(StructKind),
    /// Pop `len` values into a fresh array.
    ArrayNewFixed { len: u32 },

    // =========================================================================
    // Type environment
    // =========================================================================
    /// Push type argument `i` of the enclosing instance.
    ReceiverTypeArgument(u32),
    /// Push type parameter slot `i` of the current call frame.
    FrameTypeParameter(u32),

    // =========================================================================
    // Tests
    // =========================================================================
    /// Pop a non-null object, push its class identity.
    ClassId,
    /// Pop a non-null value, push whether it is a closure.
    RefTestClosure,
    I32Eq,

    // =========================================================================
    // Control
    // =========================================================================
    Block { result: bool, body: Vec<Instr> },
    Br(u32),
    /// Pop a condition; branch if non-zero.
    BrIf(u32),
    /// Branch if the top of the stack is null (consuming it); otherwise leave
    /// it in place.
    BrOnNull(u32),

    // =========================================================================
    // Calls
    // =========================================================================
    Call(RuntimeHelper),
}

/// A finished instruction sequence and the number of locals it uses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Code {
    pub instrs: Vec<Instr>,
    pub local_count: u32,
}

impl Code {
    /// Total instruction count, including nested block bodies.
    pub fn len(&self) -> usize {
        fn count(instrs: &[Instr]) -> usize {
            instrs
                .iter()
                .map(|i| match i {
                    Instr::Block { body, .. } => 1 + count(body),
                    _ => 1,
                })
                .sum()
        }
        count(&self.instrs)
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    /// Whether any instruction, at any depth, satisfies `pred`.
    pub fn contains(&self, pred: impl Fn(&Instr) -> bool + Copy) -> bool {
        fn walk(instrs: &[Instr], pred: impl Fn(&Instr) -> bool + Copy) -> bool {
            instrs.iter().any(|i| {
                pred(i)
                    || matches!(i, Instr::Block { body, .. } if walk(body, pred))
            })
        }
        walk(&self.instrs, pred)
    }
}
