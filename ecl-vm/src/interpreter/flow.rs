//! Control flow: `RET`, `CALL`, `CALLASYNC`, `JMP`/`JMPEQ`/`JMPNEQ`, `WAIT`
//! (spec.md §4.3 "System / control flow").

use crate::container::EclImage;
use crate::error::EclError;
use crate::interpreter::{StackValue, Task};

/// Outcome of stepping `RET`.
pub enum FlowResult {
    /// Execution continues at the updated `ip`.
    Continue,
    /// The task has returned from its entry subroutine with an empty call
    /// stack.
    Done,
}

impl Task {
    /// `RET`: restore `(sp, bp)`, and either finish the task or resume the
    /// caller.
    ///
    /// A subroutine that never ran `STACKALLOC` (the hello-world scenario:
    /// just `PRINTSTR`; `RET`) has `bp == sp == 0`; popping its "saved bp"
    /// then underflows. The original interpreter reads whatever garbage
    /// byte follows via an unchecked decrement; since the call stack is
    /// also empty in that case the task is finishing regardless, so the
    /// bogus `bp` never gets used for anything — we reproduce that by
    /// treating the underflow as reading `0` rather than failing the task.
    pub fn op_ret(&mut self) -> Result<FlowResult, EclError> {
        self.sp = self.bp;
        let saved_bp = self.pop().unwrap_or(StackValue::U32(0));
        self.bp = saved_bp.as_u32().unwrap_or(0) as usize;
        match self.pop_call() {
            None => Ok(FlowResult::Done),
            Some(return_to) => {
                self.ip = return_to;
                Ok(FlowResult::Continue)
            }
        }
    }

    /// `CALL(name)`: push the successor address, jump into the named
    /// subroutine.
    pub fn op_call(&mut self, image: &EclImage, name: &str, successor: usize) -> Result<(), EclError> {
        let start = image
            .sub_start(name)
            .ok_or_else(|| EclError::MissingSub(name.to_string()))?;
        self.push_call(successor)?;
        self.ip = start;
        Ok(())
    }

    /// `CALLASYNC(name)`: spawn a fresh sibling task at the named
    /// subroutine's entry point; the caller falls through to `successor`.
    pub fn op_callasync(
        &mut self,
        image: &EclImage,
        name: &str,
        successor: usize,
    ) -> Result<Task, EclError> {
        let start = image
            .sub_start(name)
            .ok_or_else(|| EclError::MissingSub(name.to_string()))?;
        self.ip = successor;
        Ok(Task::new(name.to_string(), start))
    }

    /// `JMP(offset)`: unconditional relative jump from the instruction's own
    /// start.
    pub fn op_jmp(&mut self, ins_at: usize, offset: i32) {
        self.ip = (ins_at as i64 + offset as i64) as usize;
    }

    /// `JMPEQ(offset)`: pop; jump if the popped value is zero (as an
    /// integer).
    pub fn op_jmpeq(&mut self, ins_at: usize, offset: i32, successor: usize) -> Result<(), EclError> {
        let v = self.pop()?;
        self.ip = if v.bits() == 0 {
            (ins_at as i64 + offset as i64) as usize
        } else {
            successor
        };
        Ok(())
    }

    /// `JMPNEQ(offset)`: pop; jump if the popped value is nonzero.
    pub fn op_jmpneq(&mut self, ins_at: usize, offset: i32, successor: usize) -> Result<(), EclError> {
        let v = self.pop()?;
        self.ip = if v.bits() != 0 {
            (ins_at as i64 + offset as i64) as usize
        } else {
            successor
        };
        Ok(())
    }

    /// `WAIT(n)`: `wait ← max(wait, n)`.
    pub fn op_wait(&mut self, n: u32) {
        self.wait = self.wait.max(n);
    }
}
