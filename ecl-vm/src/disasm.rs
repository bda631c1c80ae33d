//! Disassembler (C4) — human-readable instruction dump, consumed by
//! `-v`/`--verbose` tracing and exposed as a library function so tests can
//! assert on it directly (spec.md §6's grammar).

use ecl_asm::{decode_params, Builtin, Opcode, RankMask, Slot, Value};

use crate::instruction::RawInstruction;

/// Render one decoded instruction as `!LHNE time: mnemonic(params...)`, per
/// spec.md §6's disassembly grammar.
pub fn disassemble(ins: &RawInstruction, opcode: Opcode) -> String {
    let mut out = String::new();
    out.push('!');
    out.push_str(&rank_mask_letters(ins.rank_mask));
    out.push(' ');
    out.push_str(&ins.time.to_string());
    out.push_str(": ");
    out.push_str(&opcode.to_string());
    out.push('(');

    if let Ok(values) = decode_params(opcode.format(), ins.data) {
        let rendered: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, v)| render_param(*v, ins.param_mask & (1 << i) != 0))
            .collect();
        out.push_str(&rendered.join(", "));
    }
    out.push(')');
    out
}

fn rank_mask_letters(mask: RankMask) -> String {
    const LETTERS: [(RankMask, char); 4] = [
        (RankMask::LUNATIC, 'L'),
        (RankMask::HARD, 'H'),
        (RankMask::NORMAL, 'N'),
        (RankMask::EASY, 'E'),
    ];
    if mask == RankMask::all() {
        return "*".to_string();
    }
    LETTERS
        .iter()
        .filter(|(bit, _)| mask.contains(*bit))
        .map(|(_, c)| *c)
        .collect()
}

fn render_param(value: Value, is_var_ref: bool) -> String {
    if !is_var_ref {
        return match value {
            Value::I32(v) => format!("${v}"),
            Value::U32(v) => format!("${v}"),
            Value::F32(v) => format!("%{v}"),
            Value::Str(s) => format!("{:?}", String::from_utf8_lossy(s)),
            Value::Invalid => "?".to_string(),
        };
    }

    let slot_id = ecl_asm::slot_bits(&value);
    match Slot::classify(slot_id) {
        Slot::Tos => "TOS".to_string(),
        Slot::Local(n) => format!("${}", (b'A' + (n >> 2) as u8) as char),
        Slot::Builtin(id) => Builtin::from_id(id).map(Builtin::name).unwrap_or("?").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(time: u32, id: u16, mask: u16, rank: u8, data: &[u8]) -> Vec<u8> {
        let size = (crate::instruction::HEADER_SIZE + data.len()) as u16;
        let mut buf = Vec::new();
        buf.extend_from_slice(&time.to_le_bytes());
        buf.extend_from_slice(&id.to_le_bytes());
        buf.extend_from_slice(&size.to_le_bytes());
        buf.extend_from_slice(&mask.to_le_bytes());
        buf.push(rank);
        buf.push(0);
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(data);
        buf
    }

    #[test]
    fn renders_literal_push() {
        let buf = encode(3, Opcode::Push.id(), 0, 0b1111, &5i32.to_le_bytes());
        let ins = RawInstruction::decode(&buf, 0).unwrap();
        let text = disassemble(&ins, Opcode::Push);
        assert_eq!(text, "!* 3: push($5)");
    }

    #[test]
    fn renders_variable_reference_as_local_slot() {
        let buf = encode(0, Opcode::Set.id(), 0b1, 0b0001, &0i32.to_le_bytes());
        let ins = RawInstruction::decode(&buf, 0).unwrap();
        let text = disassemble(&ins, Opcode::Set);
        assert_eq!(text, "!E 0: set($A)");
    }

    #[test]
    fn renders_builtin_variable_reference() {
        let buf = encode(0, Opcode::Push.id(), 0b1, 0b1111, &(-9959i32).to_le_bytes());
        let ins = RawInstruction::decode(&buf, 0).unwrap();
        let text = disassemble(&ins, Opcode::Push);
        assert_eq!(text, "!* 0: push(DIFF)");
    }
}
