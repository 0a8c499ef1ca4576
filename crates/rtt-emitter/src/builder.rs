//! Push-based code builder.

use crate::constants::ConstId;
use crate::instr::{Code, Instr, LocalId, RuntimeHelper, StructKind};

/// Appends instructions to the innermost open block.
pub struct CodeBuilder {
    /// Open block bodies; the last one receives new instructions.
    bodies: Vec<Vec<Instr>>,
    local_count: u32,
}

impl CodeBuilder {
    pub fn new() -> Self {
        CodeBuilder {
            bodies: vec![Vec::new()],
            local_count: 0,
        }
    }

    /// Continue emitting after `locals` slots already in use.
    pub fn with_locals(locals: u32) -> Self {
        CodeBuilder {
            bodies: vec![Vec::new()],
            local_count: locals,
        }
    }

    pub fn emit(&mut self, instr: Instr) {
        if let Some(body) = self.bodies.last_mut() {
            body.push(instr);
        }
    }

    pub fn new_local(&mut self) -> LocalId {
        let local = LocalId(self.local_count);
        self.local_count += 1;
        local
    }

    pub fn i32_const(&mut self, value: i32) {
        self.emit(Instr::I32Const(value));
    }

    pub fn bool_const(&mut self, value: bool) {
        self.emit(Instr::I32Const(i32::from(value)));
    }

    pub fn constant(&mut self, id: ConstId) {
        self.emit(Instr::Const(id));
    }

    pub fn local_get(&mut self, local: LocalId) {
        self.emit(Instr::LocalGet(local));
    }

    pub fn local_set(&mut self, local: LocalId) {
        self.emit(Instr::LocalSet(local));
    }

    pub fn struct_new(&mut self, kind: StructKind) {
        self.emit(Instr::StructNew(kind));
    }

    pub fn array_new_fixed(&mut self, len: usize) {
        self.emit(Instr::ArrayNewFixed { len: len as u32 });
    }

    pub fn call(&mut self, helper: RuntimeHelper) {
        self.emit(Instr::Call(helper));
    }

    /// Emit a block whose body is produced by `body`.
    pub fn block(&mut self, result: bool, body: impl FnOnce(&mut Self)) {
        self.bodies.push(Vec::new());
        body(self);
        let body = self.bodies.pop().unwrap_or_default();
        self.emit(Instr::Block { result, body });
    }

    pub fn finish(mut self) -> Code {
        Code {
            instrs: self.bodies.swap_remove(0),
            local_count: self.local_count,
        }
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
