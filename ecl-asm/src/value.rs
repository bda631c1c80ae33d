/// A tagged ECL value.
///
/// The tag always determines which payload is meaningful; arithmetic
/// instructions never reinterpret a value across tags. [`Value::Str`]
/// borrows directly from whatever buffer the decoded bytes came from (the
/// loaded file image, in practice), so it carries no allocation of its own.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value<'a> {
    /// Default / error sentinel.
    #[default]
    Invalid,
    /// Signed 32-bit integer.
    I32(i32),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// IEEE-754 single precision float.
    F32(f32),
    /// Reference to a null-terminated byte string living in the caller's
    /// buffer, stored here without its terminator.
    Str(&'a [u8]),
}

impl<'a> Value<'a> {
    /// View this value as a signed integer, reinterpreting `U32` payloads by
    /// bit pattern. Used by opcodes documented to operate on "the integer
    /// value of a slot" regardless of how it was last written.
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Value::I32(v) => Some(v),
            Value::U32(v) => Some(v as i32),
            _ => None,
        }
    }

    /// View this value as an unsigned integer.
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Value::I32(v) => Some(v as u32),
            Value::U32(v) => Some(v),
            _ => None,
        }
    }

    /// View this value as a float.
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Value::F32(v) => Some(v),
            _ => None,
        }
    }

    /// True if this value's tag is `Invalid`.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Value::Invalid)
    }
}

