//! Loader, disassembler and cooperative-scheduled VM for ECL bytecode.
//!
//! This crate builds the container loader (C2), disassembler (C4), per-task
//! VM state and interpreter core (C5/C6), and the scheduler (C7) on top of
//! `ecl-asm`'s opcode table and value model (C1/C3), the way `fuel-vm`
//! builds its interpreter on top of `fuel-asm`.
#![warn(missing_docs)]

pub mod container;
pub mod context;
pub mod disasm;
pub mod error;
pub mod instruction;
pub mod interpreter;
pub mod scheduler;

pub use container::EclImage;
pub use context::{Difficulty, ExecutionContext};
pub use error::{EclError, Result};
pub use scheduler::Scheduler;
