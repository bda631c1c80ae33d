//! Arithmetic and comparison (spec.md §4.3 "Arithmetic / compare"):
//! pop `rhs`, peek `lhs`, replace the top with the tagged result.

use crate::error::EclError;
use crate::interpreter::{StackValue, Task};

impl Task {
    /// `ADDI`: `top ← pop() + peek()`, both read as signed integers.
    pub fn op_addi(&mut self) -> Result<(), EclError> {
        self.binop_i32(|lhs, rhs| lhs.wrapping_add(rhs))
    }

    /// `ADDF`: float add.
    pub fn op_addf(&mut self) -> Result<(), EclError> {
        self.binop_f32(|lhs, rhs| lhs + rhs)
    }

    /// `MULI`: integer multiply.
    pub fn op_muli(&mut self) -> Result<(), EclError> {
        self.binop_i32(|lhs, rhs| lhs.wrapping_mul(rhs))
    }

    /// `MODI`: integer modulo.
    pub fn op_modi(&mut self) -> Result<(), EclError> {
        self.binop_i32(|lhs, rhs| if rhs == 0 { 0 } else { lhs.wrapping_rem(rhs) })
    }

    /// `EQI`: integer equality, result `0`/`1`.
    pub fn op_eqi(&mut self) -> Result<(), EclError> {
        self.binop_i32(|lhs, rhs| (lhs == rhs) as i32)
    }

    /// `LESSI`: integer less-than, result `0`/`1`.
    pub fn op_lessi(&mut self) -> Result<(), EclError> {
        self.binop_i32(|lhs, rhs| (lhs < rhs) as i32)
    }

    fn binop_i32(&mut self, f: impl Fn(i32, i32) -> i32) -> Result<(), EclError> {
        let rhs = self.pop()?.bits();
        let lhs = self.peek()?.bits();
        self.set_top(StackValue::I32(f(lhs, rhs)))
    }

    fn binop_f32(&mut self, f: impl Fn(f32, f32) -> f32) -> Result<(), EclError> {
        let rhs = self.pop()?.as_f32().unwrap_or(0.0);
        let lhs = self.peek()?.as_f32().unwrap_or(0.0);
        self.set_top(StackValue::F32(f(lhs, rhs)))
    }
}
