/// The sparse table of built-in (global) variables, keyed by negative slot
/// id.
///
/// This only names *which* built-in a given id refers to and how to render
/// it in disassembly; computing its value needs live VM/task state (the
/// RNG, the active difficulty, the task's `time`) that this crate
/// deliberately doesn't hold, so `ecl-vm::interpreter` is what actually
/// resolves a `Builtin` to a [`crate::Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `-10000` — next pseudo-random `i32`.
    Rand,
    /// `-9999` — uniform `f32` in `[0, 1)`.
    RandF,
    /// `-9988` — the task's `time`.
    Time,
    /// `-9959` — `0/1/2/3` for Easy/Normal/Hard/Lunatic.
    Diff,
    /// `-9953` — `1` if the active difficulty is Easy, else `0`.
    Easy,
    /// `-9952` — `1` if the active difficulty is Normal, else `0`.
    Normal,
    /// `-9951` — `1` if the active difficulty is Hard, else `0`.
    Hard,
    /// `-9950` — `1` if the active difficulty is Lunatic, else `0`.
    Lunatic,
    /// `-9907` — external; `0` placeholder (no spell-card subsystem).
    SpellId,
    /// `-9997..=-9990` — geometric placeholders (player/entity position and
    /// similar); always `0`/`0.0` with no game world present.
    Geometry(i32),
    /// `-1` — pop the data-stack top. Classified separately by
    /// [`crate::Slot::classify`], included here only so the disassembler can
    /// render its symbolic name.
    Tos,
}

impl Builtin {
    /// Resolve a negative slot id to its built-in, if known.
    pub const fn from_id(id: i32) -> Option<Self> {
        Some(match id {
            -1 => Builtin::Tos,
            -10000 => Builtin::Rand,
            -9999 => Builtin::RandF,
            -9988 => Builtin::Time,
            -9959 => Builtin::Diff,
            -9953 => Builtin::Easy,
            -9952 => Builtin::Normal,
            -9951 => Builtin::Hard,
            -9950 => Builtin::Lunatic,
            -9907 => Builtin::SpellId,
            -9997..=-9990 => Builtin::Geometry(id),
            _ => return None,
        })
    }

    /// The symbolic name the disassembler renders for this built-in.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Tos => "TOS",
            Builtin::Rand => "RAND",
            Builtin::RandF => "RANDF",
            Builtin::Time => "TIME",
            Builtin::Diff => "DIFF",
            Builtin::Easy => "EASY",
            Builtin::Normal => "NORMAL",
            Builtin::Hard => "HARD",
            Builtin::Lunatic => "LUNATIC",
            Builtin::SpellId => "SPELL_ID",
            Builtin::Geometry(_) => "GEOM",
        }
    }
}
