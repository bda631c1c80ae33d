//! Cooperative task scheduler (C7, spec.md §4.4).
//!
//! Tasks live in a `VecDeque` rather than an intrusive linked list (spec.md
//! §9 explicitly permits either; a deque gives O(1) append with none of a
//! linked list's lifetime bookkeeping).

use std::collections::VecDeque;
use std::io::Write;

use tracing::{debug, warn};

use crate::container::EclImage;
use crate::context::ExecutionContext;
use crate::error::EclError;
use crate::instruction::RawInstruction;
use crate::interpreter::executors::{step, StepOutcome};
use crate::interpreter::Task;

/// Drives every live task to completion, tick by tick.
pub struct Scheduler<'a> {
    image: &'a EclImage,
    tasks: VecDeque<Task>,
}

impl<'a> Scheduler<'a> {
    /// Start a scheduler with one task running `main`.
    pub fn new(image: &'a EclImage) -> Result<Self, EclError> {
        let start = image
            .sub_start("main")
            .ok_or(EclError::NoMainSub)?;
        let mut tasks = VecDeque::new();
        tasks.push_back(Task::new("main", start));
        Ok(Scheduler { image, tasks })
    }

    /// Run every task to completion, writing program output to `out`.
    ///
    /// Returns once the task list is empty or a task fails; failures
    /// terminate the whole run (spec.md §7's "one transaction" policy).
    pub fn run(&mut self, ctx: &mut ExecutionContext, out: &mut dyn Write) -> Result<(), EclError> {
        while !self.tasks.is_empty() {
            self.tick(ctx, out)?;
        }
        Ok(())
    }

    /// Advance every currently-live task by one tick (spec.md §4.4's
    /// four-step algorithm).
    fn tick(&mut self, ctx: &mut ExecutionContext, out: &mut dyn Write) -> Result<(), EclError> {
        let image = self.image;
        let mut spawned = Vec::new();
        let mut i = 0;
        while i < self.tasks.len() {
            let done = {
                let task = &mut self.tasks[i];
                Self::run_task_to_quiescence(image, task, ctx, out, &mut spawned)?
            };
            if done {
                self.tasks.remove(i);
            } else {
                i += 1;
            }
        }
        for child in spawned {
            debug!(name = %child.name, "spawned task appended for next tick");
            self.tasks.push_back(child);
        }

        for task in &mut self.tasks {
            task.wait = task.wait.saturating_sub(1);
            if task.wait == 0 {
                task.time += 1;
            }
        }
        Ok(())
    }

    /// Run one task's instructions until it waits, finishes, or the next
    /// instruction isn't due yet (spec.md §4.4 step 1).
    fn run_task_to_quiescence(
        image: &EclImage,
        task: &mut Task,
        ctx: &mut ExecutionContext,
        out: &mut dyn Write,
        spawned: &mut Vec<Task>,
    ) -> Result<bool, EclError> {
        loop {
            if task.wait != 0 {
                return Ok(false);
            }
            let header = RawInstruction::decode(image.buf(), task.ip)?;
            if task.time < header.time {
                return Ok(false);
            }
            match step(task, image, ctx, out) {
                Ok(StepOutcome::Proceed) | Ok(StepOutcome::Skipped) => continue,
                Ok(StepOutcome::Spawned(child)) => {
                    spawned.push(child);
                    continue;
                }
                Ok(StepOutcome::Done) => return Ok(true),
                Err(e) => {
                    warn!(error = %e, task = %task.name, "task failed");
                    return Err(e);
                }
            }
        }
    }
}
