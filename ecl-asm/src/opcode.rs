use crate::error::DecodeError;

/// Raw opcode id constants, as they appear in the `id` field of an
/// instruction header. Exact numeric assignment for the arithmetic/compare
/// opcodes is not fixed by the container format itself — only that each id
/// maps to exactly one parameter format — so these follow the ids the
/// original `anomalocarid/ECLI` implementation uses for the opcodes it
/// implements, extended with disjoint ids for the rest of spec's table.
pub mod consts {
    pub const OP_NOP: u16 = 0;
    pub const OP_DELETE: u16 = 1;
    pub const OP_RET: u16 = 10;
    pub const OP_CALL: u16 = 11;
    pub const OP_JMP: u16 = 12;
    pub const OP_JMPEQ: u16 = 13;
    pub const OP_JMPNEQ: u16 = 14;
    pub const OP_CALLASYNC: u16 = 15;
    pub const OP_PRINTTOP: u16 = 21;
    pub const OP_WAIT: u16 = 23;
    pub const OP_PRINTSTR: u16 = 30;
    pub const OP_STACKALLOC: u16 = 40;
    pub const OP_PUSH: u16 = 42;
    pub const OP_SET: u16 = 43;
    pub const OP_PUSHF: u16 = 44;
    pub const OP_SETF: u16 = 45;
    pub const OP_ADDI: u16 = 50;
    pub const OP_ADDF: u16 = 51;
    pub const OP_MULI: u16 = 52;
    pub const OP_MODI: u16 = 55;
    pub const OP_EQI: u16 = 60;
    pub const OP_LESSI: u16 = 65;
    pub const OP_DECI: u16 = 78;
    pub const OP_PUTS: u16 = 80;
    pub const OP_PUTI: u16 = 81;
    pub const OP_PUTF: u16 = 82;
    pub const OP_ENDL: u16 = 83;
    pub const OP_FLAGSET: u16 = 502;
    pub const OP_SETCHAPTER: u16 = 524;
}

use consts::*;

/// An ECL opcode, decoded from an instruction header's `id` field.
///
/// Each variant documents its parameter format string (the alphabet is
/// `{i, u, f, s}`, see [`Opcode::format`]) and its stack effect. The
/// numeric discriminant is the on-disk `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[repr(u16)]
#[strum(serialize_all = "lowercase")]
pub enum Opcode {
    /// No effect.
    Nop = OP_NOP,
    /// No effect in this implementation (game-side entity delete).
    Delete = OP_DELETE,
    /// Pop the saved base pointer, restore `sp`/`bp`, and return to the
    /// caller (or mark the task `Done` if the call stack is empty).
    Ret = OP_RET,
    /// `(s)` — push the successor address and jump to the named
    /// subroutine's first instruction.
    Call = OP_CALL,
    /// `(iu)` — unconditional relative jump; the `u` is an advisory target
    /// time, not additionally gated by the VM.
    Jmp = OP_JMP,
    /// `(iu)` — pop; jump if the popped value is zero.
    Jmpeq = OP_JMPEQ,
    /// `(iu)` — pop; jump if the popped value is nonzero.
    Jmpneq = OP_JMPNEQ,
    /// `(s)` — spawn a sibling task starting at the named subroutine; the
    /// caller continues without waiting.
    Callasync = OP_CALLASYNC,
    /// `()` — pop and print the top of the data stack.
    Printtop = OP_PRINTTOP,
    /// `(i)` — set `wait ← max(wait, n)`.
    Wait = OP_WAIT,
    /// `(s)` — print the string parameter followed by a newline.
    Printstr = OP_PRINTSTR,
    /// `(u)` — push the current `bp`, set `bp ← sp`, advance `sp` by
    /// `n_words` zero-initialized slots.
    Stackalloc = OP_STACKALLOC,
    /// `(i)` — push an integer literal.
    Push = OP_PUSH,
    /// `(i)` — pop and store into a slot.
    Set = OP_SET,
    /// `(f)` — push a float literal.
    Pushf = OP_PUSHF,
    /// `(f)` — pop and store into a slot, tagged as a float.
    Setf = OP_SETF,
    /// `()` — integer add: `top ← pop() + peek()`.
    Addi = OP_ADDI,
    /// `()` — float add.
    Addf = OP_ADDF,
    /// `()` — integer multiply.
    Muli = OP_MULI,
    /// `()` — integer modulo.
    Modi = OP_MODI,
    /// `()` — integer equality, result is `0`/`1`.
    Eqi = OP_EQI,
    /// `()` — integer less-than, result is `0`/`1`.
    Lessi = OP_LESSI,
    /// `(i)` — push the current integer value of a slot, then decrement it.
    Deci = OP_DECI,
    /// `(s)` — print a string with no trailing newline.
    Puts = OP_PUTS,
    /// `()` — pop and print an integer with no trailing newline.
    Puti = OP_PUTI,
    /// `()` — pop and print a float with no trailing newline.
    Putf = OP_PUTF,
    /// `()` — print a newline.
    Endl = OP_ENDL,
    /// `(i)` — pop and store into the task's `flags`.
    Flagset = OP_FLAGSET,
    /// `(i)` — pop and store into the global `chapter`.
    Setchapter = OP_SETCHAPTER,
}

impl Opcode {
    /// Resolve an opcode from its on-disk id.
    pub fn from_id(id: u16) -> Result<Self, DecodeError> {
        use Opcode::*;
        Ok(match id {
            OP_NOP => Nop,
            OP_DELETE => Delete,
            OP_RET => Ret,
            OP_CALL => Call,
            OP_JMP => Jmp,
            OP_JMPEQ => Jmpeq,
            OP_JMPNEQ => Jmpneq,
            OP_CALLASYNC => Callasync,
            OP_PRINTTOP => Printtop,
            OP_WAIT => Wait,
            OP_PRINTSTR => Printstr,
            OP_STACKALLOC => Stackalloc,
            OP_PUSH => Push,
            OP_SET => Set,
            OP_PUSHF => Pushf,
            OP_SETF => Setf,
            OP_ADDI => Addi,
            OP_ADDF => Addf,
            OP_MULI => Muli,
            OP_MODI => Modi,
            OP_EQI => Eqi,
            OP_LESSI => Lessi,
            OP_DECI => Deci,
            OP_PUTS => Puts,
            OP_PUTI => Puti,
            OP_PUTF => Putf,
            OP_ENDL => Endl,
            OP_FLAGSET => Flagset,
            OP_SETCHAPTER => Setchapter,
            other => return Err(DecodeError::UnknownOpcode(other)),
        })
    }

    /// The on-disk id for this opcode.
    pub const fn id(self) -> u16 {
        self as u16
    }

    /// The parameter format string for this opcode, over the alphabet
    /// `{i, u, f, s}` (see [`crate::decode_params`]).
    pub const fn format(self) -> &'static str {
        use Opcode::*;
        match self {
            Nop | Delete | Ret | Printtop | Addi | Addf | Muli | Modi | Eqi | Lessi | Puti
            | Putf | Endl => "",
            Call | Callasync | Printstr | Puts => "s",
            Jmp | Jmpeq | Jmpneq => "iu",
            Wait | Push | Set | Deci | Flagset | Setchapter => "i",
            Stackalloc => "u",
            Pushf | Setf => "f",
        }
    }
}
