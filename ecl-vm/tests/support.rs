//! Shared byte-level assembler for the integration tests in this directory.
//!
//! Builds minimal in-memory ECL images instruction-by-instruction, the way
//! `ecl-vm`'s own unit tests do (see `scheduler.rs`/`disasm.rs`), but factored
//! out so each scenario test in spec §8 can describe a subroutine as a list
//! of ops instead of hand-rolling header bytes.

use ecl_vm::EclImage;

/// One instruction before its jump targets (if any) are resolved to byte
/// offsets.
///
/// Not every variant is used by every test binary that includes this module
/// (each integration test file compiles it separately) — that's fine, it's
/// shared scaffolding, not a single scenario's code.
#[allow(dead_code)]
pub enum Op<'a> {
    Printstr(&'a str),
    /// `Printstr` with an explicit `rank_mask` instead of "all difficulties",
    /// for the difficulty-gating scenario.
    PrintstrRank(&'a str, u8),
    Printtop,
    Ret,
    Stackalloc(u32),
    Push(i32),
    Set(i32),
    Deci(i32),
    Addi,
    /// Jump to the instruction at this index in the same subroutine's op
    /// list, unconditionally.
    Jmp(usize),
    /// Jump to the instruction at this index if the popped value is zero.
    Jmpeq(usize),
    Callasync(&'a str),
    Wait(i32),
}

const OPCODE_PRINTSTR: u16 = 30;
const OPCODE_PRINTTOP: u16 = 21;
const OPCODE_RET: u16 = 10;
const OPCODE_STACKALLOC: u16 = 40;
const OPCODE_PUSH: u16 = 42;
const OPCODE_SET: u16 = 43;
const OPCODE_DECI: u16 = 78;
const OPCODE_ADDI: u16 = 50;
const OPCODE_JMP: u16 = 12;
const OPCODE_JMPEQ: u16 = 13;
const OPCODE_CALLASYNC: u16 = 15;
const OPCODE_WAIT: u16 = 23;

const HEADER_SIZE: usize = 16;

struct Encoded {
    id: u16,
    param_mask: u16,
    /// `0xF` ("all difficulties") unless a scenario overrides it.
    rank_mask: u8,
    data: Vec<u8>,
    /// Index of the op this jump instruction targets, if any.
    jump_target: Option<usize>,
}

fn encode_header(time: u32, id: u16, size: u16, param_mask: u16, rank_mask: u8) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE);
    buf.extend_from_slice(&time.to_le_bytes());
    buf.extend_from_slice(&id.to_le_bytes());
    buf.extend_from_slice(&size.to_le_bytes());
    buf.extend_from_slice(&param_mask.to_le_bytes());
    buf.push(rank_mask);
    buf.push(0); // param_count, not load-bearing for decode
    buf.extend_from_slice(&0u32.to_le_bytes()); // reserved
    buf
}

fn string_param(s: &str) -> Vec<u8> {
    let mut data = Vec::new();
    let bytes = s.as_bytes();
    data.extend_from_slice(&((bytes.len() + 1) as u32).to_le_bytes());
    data.extend_from_slice(bytes);
    data.push(0);
    data
}

/// Assemble a subroutine body (header + instructions) from a list of ops,
/// resolving `Jmp`/`Jmpeq` targets to the byte offsets their instruction
/// sizes work out to.
pub fn build_sub(ops: Vec<Op>) -> Vec<u8> {
    let descs: Vec<Encoded> = ops
        .into_iter()
        .map(|op| match op {
            Op::Printstr(s) => Encoded {
                id: OPCODE_PRINTSTR,
                param_mask: 0,
                rank_mask: 0xF,
                data: string_param(s),
                jump_target: None,
            },
            Op::PrintstrRank(s, rank_mask) => Encoded {
                id: OPCODE_PRINTSTR,
                param_mask: 0,
                rank_mask,
                data: string_param(s),
                jump_target: None,
            },
            Op::Printtop => Encoded {
                id: OPCODE_PRINTTOP,
                param_mask: 0,
                rank_mask: 0xF,
                data: Vec::new(),
                jump_target: None,
            },
            Op::Ret => Encoded {
                id: OPCODE_RET,
                param_mask: 0,
                rank_mask: 0xF,
                data: Vec::new(),
                jump_target: None,
            },
            Op::Stackalloc(n) => Encoded {
                id: OPCODE_STACKALLOC,
                param_mask: 0,
                rank_mask: 0xF,
                data: n.to_le_bytes().to_vec(),
                jump_target: None,
            },
            Op::Push(v) => Encoded {
                id: OPCODE_PUSH,
                param_mask: 0,
                rank_mask: 0xF,
                data: v.to_le_bytes().to_vec(),
                jump_target: None,
            },
            Op::Set(slot) => Encoded {
                id: OPCODE_SET,
                param_mask: 0,
                rank_mask: 0xF,
                data: slot.to_le_bytes().to_vec(),
                jump_target: None,
            },
            Op::Deci(slot) => Encoded {
                id: OPCODE_DECI,
                param_mask: 0,
                rank_mask: 0xF,
                data: slot.to_le_bytes().to_vec(),
                jump_target: None,
            },
            Op::Addi => Encoded {
                id: OPCODE_ADDI,
                param_mask: 0,
                rank_mask: 0xF,
                data: Vec::new(),
                jump_target: None,
            },
            Op::Jmp(target) => Encoded {
                id: OPCODE_JMP,
                param_mask: 0,
                rank_mask: 0xF,
                data: {
                    let mut d = 0i32.to_le_bytes().to_vec();
                    d.extend_from_slice(&0u32.to_le_bytes());
                    d
                },
                jump_target: Some(target),
            },
            Op::Jmpeq(target) => Encoded {
                id: OPCODE_JMPEQ,
                param_mask: 0,
                rank_mask: 0xF,
                data: {
                    let mut d = 0i32.to_le_bytes().to_vec();
                    d.extend_from_slice(&0u32.to_le_bytes());
                    d
                },
                jump_target: Some(target),
            },
            Op::Callasync(name) => Encoded {
                id: OPCODE_CALLASYNC,
                param_mask: 0,
                rank_mask: 0xF,
                data: string_param(name),
                jump_target: None,
            },
            Op::Wait(n) => Encoded {
                id: OPCODE_WAIT,
                param_mask: 0,
                rank_mask: 0xF,
                data: n.to_le_bytes().to_vec(),
                jump_target: None,
            },
        })
        .collect();

    let sizes: Vec<usize> = descs.iter().map(|d| HEADER_SIZE + d.data.len()).collect();
    let mut offsets = Vec::with_capacity(sizes.len());
    let mut running = 0usize;
    for &size in &sizes {
        offsets.push(running);
        running += size;
    }

    let mut body = Vec::new();
    body.extend_from_slice(b"ECLH");
    body.extend_from_slice(&16u32.to_le_bytes());
    body.extend_from_slice(&[0u8; 8]);

    for (i, desc) in descs.iter().enumerate() {
        let mut data = desc.data.clone();
        if let Some(target) = desc.jump_target {
            let offset = offsets[target] as i64 - offsets[i] as i64;
            data[0..4].copy_from_slice(&(offset as i32).to_le_bytes());
        }
        let header = encode_header(0, desc.id, sizes[i] as u16, desc.param_mask, desc.rank_mask);
        body.extend_from_slice(&header);
        body.extend_from_slice(&data);
    }
    body
}

/// Assemble a whole ECL image from named subroutine bodies (as produced by
/// [`build_sub`]).
pub fn build_image(subs: Vec<(&str, Vec<u8>)>) -> EclImage {
    let mut buf = vec![0u8; 36];
    buf[0..4].copy_from_slice(b"SCPT");
    buf[4..6].copy_from_slice(&1u16.to_le_bytes());
    buf[6..8].copy_from_slice(&16u16.to_le_bytes());
    buf[8..12].copy_from_slice(&36u32.to_le_bytes());
    buf[20..24].copy_from_slice(&(subs.len() as u32).to_le_bytes());
    buf.extend_from_slice(b"ANIM");
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(b"ECLI");
    buf.extend_from_slice(&0u32.to_le_bytes());

    let offsets_at = buf.len();
    buf.extend_from_slice(&vec![0u8; subs.len() * 4]);
    for (name, _) in &subs {
        buf.extend_from_slice(name.as_bytes());
        buf.push(0);
    }

    let mut offsets = Vec::new();
    for (_, body) in &subs {
        offsets.push(buf.len() as u32);
        buf.extend_from_slice(body);
    }
    for (i, off) in offsets.into_iter().enumerate() {
        buf[offsets_at + i * 4..offsets_at + i * 4 + 4].copy_from_slice(&off.to_le_bytes());
    }

    EclImage::load(buf).unwrap()
}
