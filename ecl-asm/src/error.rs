use thiserror::Error;

/// Errors raised while decoding an opcode's parameter list.
///
/// These are purely format-level: they know nothing about subroutines, call
/// stacks or file offsets, which is why `ecl-vm::EclError` wraps this type
/// rather than re-deriving it.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The opcode id has no registered parameter format.
    #[error("unknown opcode id {0}")]
    UnknownOpcode(u16),
    /// A parameter format string contained a character outside `{i,u,f,s}`.
    #[error("unrecognized format char '{0}'")]
    BadFormatChar(char),
    /// The parameter payload ended before the format string was satisfied.
    #[error("instruction parameter payload truncated")]
    Truncated,
    /// A string parameter's length prefix claims more bytes than remain in
    /// the payload.
    #[error("string parameter length out of bounds")]
    StringOutOfBounds,
}
