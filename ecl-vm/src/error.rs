//! Errors surfaced by the loader, decoder and interpreter (spec.md §7).
//!
//! One `thiserror` enum covers every failure kind in the spec's error
//! table, the way this corpus's simpler crates (`fuel-types::Error`, the
//! pre-split `fuel-vm::InterpreterError`) wrap a handful of named variants
//! rather than a single opaque string. All of these are non-retryable: the
//! scheduler prints the diagnostic and tears the whole interpretation down
//! (spec.md §7's policy).

use ecl_asm::DecodeError;
use thiserror::Error;

/// Every way loading or interpreting an ECL file can fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EclError {
    /// Read/seek failure, or a structural truncation discovered while
    /// walking the container.
    #[error("I/O error: {0}")]
    Io(String),
    /// The file header's magic did not match `SCPT`.
    #[error("invalid file magic (expected 'SCPT')")]
    InvalidMagic,
    /// An include-region tag was neither `ANIM` nor `ECLI`.
    #[error("unknown include tag {0:?}")]
    UnknownInclude([u8; 4]),
    /// A subroutine table entry's target did not start with `ECLH`.
    #[error("subroutine '{0}' has an invalid header")]
    InvalidSub(String),
    /// A parameter format string contained an unrecognized character, or
    /// its payload didn't hold enough bytes.
    #[error("parameter decode error: {0}")]
    BadFormat(#[from] DecodeError),
    /// `CALL`/`CALLASYNC` named a subroutine that doesn't exist.
    #[error("call to undefined subroutine '{0}'")]
    MissingSub(String),
    /// An instruction id has no registered handler.
    #[error("unknown opcode id {0}")]
    UnknownOpcode(u16),
    /// The data stack pointer moved above `stack_size` or below zero.
    #[error("data stack overflow (sp would be {0})")]
    StackOverflow(i64),
    /// A pop was attempted on an empty data stack.
    #[error("data stack underflow")]
    StackUnderflow,
    /// The call stack overflowed.
    #[error("call stack overflow")]
    CallStackOverflow,
    /// A file has no `main` subroutine.
    #[error("ECL file has no 'main' subroutine")]
    NoMainSub,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EclError>;
