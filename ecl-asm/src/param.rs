use crate::error::DecodeError;
use crate::value::Value;

/// Decode an instruction's parameter payload according to a format string
/// over the alphabet `{i, u, f, s}`.
///
/// This produces the *literal* reading of each parameter; whether a given
/// parameter is actually a variable reference is a property of the
/// instruction's `param_mask`, applied by the caller via [`Slot::classify`]
/// — `ecl-asm` only knows how to lay bytes out, not how to resolve a slot
/// against a running task's stack.
pub fn decode_params<'a>(format: &str, mut data: &'a [u8]) -> Result<Vec<Value<'a>>, DecodeError> {
    let mut values = Vec::with_capacity(format.len());
    for c in format.chars() {
        let value = match c {
            'i' => {
                let bytes = take(&mut data, 4)?;
                Value::I32(i32::from_le_bytes(bytes.try_into().unwrap()))
            }
            'u' => {
                let bytes = take(&mut data, 4)?;
                Value::U32(u32::from_le_bytes(bytes.try_into().unwrap()))
            }
            'f' => {
                let bytes = take(&mut data, 4)?;
                Value::F32(f32::from_le_bytes(bytes.try_into().unwrap()))
            }
            's' => {
                let len_bytes = take(&mut data, 4)?;
                let len = u32::from_le_bytes(len_bytes.try_into().unwrap()) as usize;
                let raw = take(&mut data, len)?;
                let trimmed = match raw.iter().position(|&b| b == 0) {
                    Some(nul) => &raw[..nul],
                    None => raw,
                };
                Value::Str(trimmed)
            }
            other => return Err(DecodeError::BadFormatChar(other)),
        };
        values.push(value);
    }
    Ok(values)
}

fn take<'a>(data: &mut &'a [u8], len: usize) -> Result<&'a [u8], DecodeError> {
    if data.len() < len {
        return Err(DecodeError::Truncated);
    }
    let (head, tail) = data.split_at(len);
    *data = tail;
    Ok(head)
}

/// What a decoded parameter's raw numeric value means once the
/// corresponding `param_mask` bit marks it as a variable reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A non-negative slot: frame-local at byte offset `slot`, i.e. index
    /// `bp + (slot >> 2)` in the data stack.
    Local(i32),
    /// The special `-1` slot: pop the data-stack top.
    Tos,
    /// A negative slot other than `-1`: a built-in (global) variable, keyed
    /// by the literal id.
    Builtin(i32),
}

impl Slot {
    /// Classify a raw slot id per spec.md §4.2's variable reference rules.
    pub const fn classify(raw: i32) -> Self {
        match raw {
            -1 => Slot::Tos,
            n if n < 0 => Slot::Builtin(n),
            n => Slot::Local(n),
        }
    }

    /// The frame-local data stack index, for `Local` slots: `bp + (slot >>
    /// 2)`.
    pub const fn local_index(raw: i32, bp: usize) -> usize {
        bp + (raw >> 2) as usize
    }
}

/// Reinterpret a decoded value's bit pattern as a raw `i32` slot id, the way
/// the VM does when a parameter marked as a variable reference was decoded
/// as a float (its bits are reinterpreted, not numerically converted).
pub fn slot_bits(value: &Value) -> i32 {
    match *value {
        Value::I32(v) => v,
        Value::U32(v) => v as i32,
        Value::F32(v) => v.to_bits() as i32,
        Value::Str(_) | Value::Invalid => 0,
    }
}
