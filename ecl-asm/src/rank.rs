//! The difficulty-rank bitmask shared by an instruction's `rank_mask` byte
//! and the VM's active difficulty (spec.md §3 "Global state", §4.3
//! "Difficulty gating").

bitflags::bitflags! {
    /// Low nibble `LHNE`: bit *i* set means "this instruction (or
    /// difficulty) applies to rank *i*".
    #[derive(Default)]
    pub struct RankMask: u8 {
        /// `E` — Easy.
        const EASY = 0b0001;
        /// `N` — Normal.
        const NORMAL = 0b0010;
        /// `H` — Hard.
        const HARD = 0b0100;
        /// `L` — Lunatic.
        const LUNATIC = 0b1000;
    }
}

impl RankMask {
    /// spec.md §4.3's gating rule: an instruction runs only if its
    /// `rank_mask` shares at least one bit with the active difficulty.
    pub fn runs_under(self, active: RankMask) -> bool {
        self.intersects(active)
    }
}
