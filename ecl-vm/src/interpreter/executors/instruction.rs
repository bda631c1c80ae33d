//! The instruction dispatch table: decode one instruction's parameters,
//! apply `param_mask` resolution, and execute it against a task (spec.md
//! §4.3).

use std::io::Write;

use ecl_asm::{decode_params, Opcode, Value};
use tracing::trace;

use crate::container::EclImage;
use crate::context::ExecutionContext;
use crate::disasm::disassemble;
use crate::error::EclError;
use crate::instruction::RawInstruction;
use crate::interpreter::flow::FlowResult;
use crate::interpreter::{StackValue, Task};

/// What happened after stepping one instruction.
pub enum StepOutcome {
    /// Execution should continue with this task on its next step.
    Proceed,
    /// The instruction's difficulty gate excluded it; `ip` already advanced.
    Skipped,
    /// A new sibling task must be appended to the scheduler's task list.
    Spawned(Task),
    /// The task returned from its entry subroutine with an empty call
    /// stack.
    Done,
}

/// Decode and execute the instruction at `task.ip`, writing any program
/// output to `out`.
///
/// Callers are responsible for the scheduler-level time gate (`task.time >=
/// ins.time`); this function always executes (or difficulty-skips) whatever
/// instruction is at `ip`.
#[tracing::instrument(level = "trace", skip(task, image, ctx, out), fields(ip = task.ip))]
pub fn step(
    task: &mut Task,
    image: &EclImage,
    ctx: &mut ExecutionContext,
    out: &mut dyn Write,
) -> Result<StepOutcome, EclError> {
    let ins = RawInstruction::decode(image.buf(), task.ip)?;

    if !ins.runs_under(ctx.difficulty.mask()) {
        task.ip = ins.next();
        return Ok(StepOutcome::Skipped);
    }

    let opcode = Opcode::from_id(ins.id).map_err(|_| EclError::UnknownOpcode(ins.id))?;
    if ctx.verbose {
        trace!(text = %disassemble(&ins, opcode), "exec");
    }

    let values = decode_params(opcode.format(), ins.data)?;
    let successor = ins.next();

    use Opcode::*;
    match opcode {
        Nop | Delete => {
            task.ip = successor;
        }
        Ret => {
            return Ok(match task.op_ret()? {
                FlowResult::Done => StepOutcome::Done,
                FlowResult::Continue => StepOutcome::Proceed,
            });
        }
        Call => {
            let name = string_param(&values, 0)?;
            task.op_call(image, name, successor)?;
        }
        Callasync => {
            let name = string_param(&values, 0)?;
            let child = task.op_callasync(image, name, successor)?;
            return Ok(StepOutcome::Spawned(child));
        }
        Jmp => {
            let offset = param(&values, &ins, 0, task, ctx).bits();
            task.op_jmp(ins.at, offset);
        }
        Jmpeq => {
            let offset = param(&values, &ins, 0, task, ctx).bits();
            task.op_jmpeq(ins.at, offset, successor)?;
        }
        Jmpneq => {
            let offset = param(&values, &ins, 0, task, ctx).bits();
            task.op_jmpneq(ins.at, offset, successor)?;
        }
        Printtop => {
            let v = task.pop()?;
            write_value(out, v);
            writeln!(out).ok();
            task.ip = successor;
        }
        Wait => {
            let n = param(&values, &ins, 0, task, ctx).bits();
            task.op_wait(n.max(0) as u32);
            task.ip = successor;
        }
        Printstr => {
            let s = string_param(&values, 0)?;
            writeln!(out, "{s}").ok();
            task.ip = successor;
        }
        Stackalloc => {
            let n = param(&values, &ins, 0, task, ctx).as_u32().unwrap_or(0);
            task.stackalloc(n)?;
            task.ip = successor;
        }
        Push => {
            let v = param(&values, &ins, 0, task, ctx);
            task.push(v)?;
            task.ip = successor;
        }
        Pushf => {
            let v = param(&values, &ins, 0, task, ctx);
            task.push(v)?;
            task.ip = successor;
        }
        Set => {
            let slot = literal_slot(&values, 0)?;
            let v = task.pop()?;
            task.write_slot(slot, v);
            task.ip = successor;
        }
        Setf => {
            let slot = literal_slot(&values, 0)?;
            let v = task.pop()?;
            task.write_slot(slot, v);
            task.ip = successor;
        }
        Deci => {
            // Decrement first, then push the new value: with the loop idiom
            // `PRINTSTR; DECI $A; JMPEQ +end,0; JMP @L`, a counter seeded to
            // N must exit after exactly N iterations, which only holds if
            // the pushed (and compared) value is the post-decrement one.
            let slot = literal_slot(&values, 0)?;
            let current = task.read_slot(slot).as_i32().unwrap_or(0);
            let next = StackValue::I32(current - 1);
            task.write_slot(slot, next);
            task.push(next)?;
            task.ip = successor;
        }
        Addi => {
            task.op_addi()?;
            task.ip = successor;
        }
        Addf => {
            task.op_addf()?;
            task.ip = successor;
        }
        Muli => {
            task.op_muli()?;
            task.ip = successor;
        }
        Modi => {
            task.op_modi()?;
            task.ip = successor;
        }
        Eqi => {
            task.op_eqi()?;
            task.ip = successor;
        }
        Lessi => {
            task.op_lessi()?;
            task.ip = successor;
        }
        Puts => {
            let s = string_param(&values, 0)?;
            write!(out, "{s}").ok();
            task.ip = successor;
        }
        Puti => {
            let v = task.pop()?;
            write_value(out, v);
            task.ip = successor;
        }
        Putf => {
            let v = task.pop()?;
            write_value(out, v);
            task.ip = successor;
        }
        Endl => {
            writeln!(out).ok();
            task.ip = successor;
        }
        Flagset => {
            let v = param(&values, &ins, 0, task, ctx).bits();
            task.flags = v as u32;
            task.ip = successor;
        }
        Setchapter => {
            let v = param(&values, &ins, 0, task, ctx).bits();
            ctx.chapter = v as u32;
            task.ip = successor;
        }
    }

    Ok(StepOutcome::Proceed)
}

/// Resolve parameter `i`, applying the generic `param_mask` variable
/// reference rule if its bit is set.
fn param(
    values: &[Value],
    ins: &RawInstruction,
    i: usize,
    task: &mut Task,
    ctx: &mut ExecutionContext,
) -> StackValue {
    let raw = values[i];
    if ins.param_mask & (1 << i) != 0 {
        task.resolve_read(raw, ctx)
    } else {
        StackValue::from(raw)
    }
}

/// `SET`/`SETF`/`DECI`'s own slot parameter: always a literal slot id, never
/// routed through `param_mask` resolution.
fn literal_slot(values: &[Value], i: usize) -> Result<i32, EclError> {
    Ok(ecl_asm::slot_bits(&values[i]))
}

fn string_param<'a>(values: &[Value<'a>], i: usize) -> Result<&'a str, EclError> {
    match values[i] {
        Value::Str(bytes) => Ok(std::str::from_utf8(bytes).unwrap_or("")),
        _ => Ok(""),
    }
}

fn write_value(out: &mut dyn Write, v: StackValue) {
    match v {
        StackValue::I32(i) => {
            write!(out, "{i}").ok();
        }
        StackValue::U32(u) => {
            write!(out, "{u}").ok();
        }
        StackValue::F32(f) => {
            write!(out, "{f}").ok();
        }
        StackValue::Invalid => {}
    }
}
