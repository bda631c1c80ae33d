//! Per-instruction dispatch (the rest of C6), split out the way `fuel-vm`
//! keeps its `execute` method in `interpreter/executors/instruction.rs`
//! alongside the smaller per-concern modules in `interpreter/`.

mod instruction;

pub use instruction::{step, StepOutcome};
