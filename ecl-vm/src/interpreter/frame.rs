//! Frame management and variable-reference resolution (spec.md §4.2's
//! `param_mask` rules, and the `STACKALLOC` instruction from §4.3).

use ecl_asm::{Builtin, Slot, Value};

use crate::context::ExecutionContext;
use crate::error::EclError;
use crate::interpreter::{StackValue, Task};

impl Task {
    /// Push a value, failing with [`EclError::StackOverflow`] past the end
    /// of the data stack.
    pub fn push(&mut self, value: StackValue) -> Result<(), EclError> {
        if self.sp >= self.stack.len() {
            return Err(EclError::StackOverflow(self.sp as i64 + 1));
        }
        self.stack[self.sp] = value;
        self.sp += 1;
        Ok(())
    }

    /// Pop the top of the data stack, failing with
    /// [`EclError::StackUnderflow`] on an empty stack.
    pub fn pop(&mut self) -> Result<StackValue, EclError> {
        if self.sp == 0 {
            return Err(EclError::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    /// Read the top of the data stack without removing it.
    pub fn peek(&self) -> Result<StackValue, EclError> {
        if self.sp == 0 {
            return Err(EclError::StackUnderflow);
        }
        Ok(self.stack[self.sp - 1])
    }

    /// Replace the top of the data stack in place.
    pub fn set_top(&mut self, value: StackValue) -> Result<(), EclError> {
        if self.sp == 0 {
            return Err(EclError::StackUnderflow);
        }
        self.stack[self.sp - 1] = value;
        Ok(())
    }

    /// `STACKALLOC(n_words)`: push the current `bp`, set `bp ← sp`, then
    /// advance `sp` by `n_words` zero-initialized slots (`n_words` is a byte
    /// count, so `n_words >> 2` slots are allocated, per spec.md §4.3).
    pub fn stackalloc(&mut self, byte_count: u32) -> Result<(), EclError> {
        self.push(StackValue::U32(self.bp as u32))?;
        self.bp = self.sp;
        let words = (byte_count >> 2) as usize;
        for _ in 0..words {
            self.push(StackValue::I32(0))?;
        }
        Ok(())
    }

    /// Push a return address and fail with [`EclError::CallStackOverflow`]
    /// past the call stack's capacity.
    pub fn push_call(&mut self, return_to: usize) -> Result<(), EclError> {
        if self.csp >= self.callstack.len() {
            return Err(EclError::CallStackOverflow);
        }
        self.callstack[self.csp] = return_to;
        self.csp += 1;
        Ok(())
    }

    /// Pop a return address, if any (`None` means the call stack was
    /// already empty — the task is finishing).
    pub fn pop_call(&mut self) -> Option<usize> {
        if self.csp == 0 {
            None
        } else {
            self.csp -= 1;
            Some(self.callstack[self.csp])
        }
    }

    /// Resolve a decoded parameter that `param_mask` marks as a variable
    /// reference, reading its current value.
    ///
    /// `SET`/`SETF`/`DECI`'s own destination parameter is never routed
    /// through this path — those opcodes always treat their parameter as a
    /// literal slot id, matching the original interpreter's direct
    /// `stack[basep + var]` indexing with no `param_mask` check on that
    /// particular parameter.
    pub fn resolve_read(&mut self, raw: Value, ctx: &mut ExecutionContext) -> StackValue {
        let slot_id = ecl_asm::slot_bits(&raw);
        match Slot::classify(slot_id) {
            Slot::Tos => self.pop().unwrap_or(StackValue::Invalid),
            Slot::Local(_) => {
                let idx = Slot::local_index(slot_id, self.bp);
                self.stack.get(idx).copied().unwrap_or(StackValue::Invalid)
            }
            Slot::Builtin(id) => self.read_builtin(id, ctx),
        }
    }

    /// Resolve the built-in named by a negative slot id into its current
    /// value (spec.md §4.2's built-in table).
    fn read_builtin(&self, id: i32, ctx: &mut ExecutionContext) -> StackValue {
        let Some(builtin) = Builtin::from_id(id) else {
            return StackValue::Invalid;
        };
        match builtin {
            Builtin::Tos => StackValue::Invalid,
            Builtin::Rand => StackValue::I32(ctx.rand_i32()),
            Builtin::RandF => StackValue::F32(ctx.rand_f32()),
            Builtin::Time => StackValue::U32(self.time),
            Builtin::Diff => StackValue::I32(ctx.difficulty.ordinal()),
            Builtin::Easy => StackValue::I32((ctx.difficulty as i32 == 0b0001) as i32),
            Builtin::Normal => StackValue::I32((ctx.difficulty as i32 == 0b0010) as i32),
            Builtin::Hard => StackValue::I32((ctx.difficulty as i32 == 0b0100) as i32),
            Builtin::Lunatic => StackValue::I32((ctx.difficulty as i32 == 0b1000) as i32),
            Builtin::SpellId => StackValue::I32(0),
            Builtin::Geometry(_) => StackValue::F32(0.0),
        }
    }

    /// Write `value` into a literal slot id, per spec.md §4.3's `SET`/
    /// `SETF`/`DECI`. Writes to negative (global/built-in) slots are a
    /// silent no-op — spec.md §9's mandated resolution.
    pub fn write_slot(&mut self, raw_slot: i32, value: StackValue) {
        if let Slot::Local(_) = Slot::classify(raw_slot) {
            let idx = Slot::local_index(raw_slot, self.bp);
            if idx < self.stack.len() {
                self.stack[idx] = value;
            }
        }
    }

    /// Read a literal slot's current value, for `DECI`'s "push, then
    /// decrement" semantics. Reading an out-of-range or global slot yields
    /// `Invalid`.
    pub fn read_slot(&self, raw_slot: i32) -> StackValue {
        if let Slot::Local(_) = Slot::classify(raw_slot) {
            let idx = Slot::local_index(raw_slot, self.bp);
            self.stack.get(idx).copied().unwrap_or(StackValue::Invalid)
        } else {
            StackValue::Invalid
        }
    }
}
