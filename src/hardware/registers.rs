use std::fmt::{Debug, Formatter};

/// The LC-3 register file: general purpose registers R0..R7, the program counter `PC`
/// and the condition register `COND`.
///
/// All registers are zero after construction, so `COND` starts out with no flag set.
#[derive(Clone, PartialEq, Eq)]
pub struct Registers {
    general_purpose: [u16; 8],
    pc: u16,
    cond: u16,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            general_purpose: [0u16; 8],
            pc: 0,
            cond: 0,
        }
    }

    /// # Panics
    /// - `r` is not a valid general purpose register index
    #[must_use]
    pub fn get(&self, r: u8) -> u16 {
        assert!(r <= 7, "Invalid general purpose register get");
        self.general_purpose[usize::from(r)]
    }
    /// # Panics
    /// - `r` is not a valid general purpose register index
    pub fn set(&mut self, r: u8, value: u16) {
        assert!(r <= 7, "Invalid general purpose register set");
        self.general_purpose[usize::from(r)] = value;
    }
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }
    /// Raw bitmask of the condition register, `0` until the first flag update.
    #[must_use]
    pub const fn cond(&self) -> u16 {
        self.cond
    }
    #[must_use]
    pub fn get_conditional_register(&self) -> Option<ConditionFlag> {
        ConditionFlag::n(self.cond)
    }
    /// Sets `COND` according to the value of general purpose register `r`.
    pub fn update_conditional_register(&mut self, r: u8) {
        self.cond = ConditionFlag::from(self.get(r)) as u16;
    }
}

impl Debug for Registers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (idx, value) in self.general_purpose.iter().enumerate() {
            write!(f, "R{idx}: {value:#06X}, ")?;
        }
        write!(f, "PC: {:#06X}, COND: {:03b}", self.pc, self.cond)
    }
}

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, enumn::N)]
pub enum ConditionFlag {
    Pos = 1 << 0, // Positive
    Zero = 1 << 1,
    Neg = 1 << 2, // Negative
}

impl From<u16> for ConditionFlag {
    fn from(value: u16) -> Self {
        if value == 0 {
            Self::Zero
        } else if value >> 15 == 1 {
            // leftmost bit is 1 for negative numbers
            Self::Neg
        } else {
            Self::Pos
        }
    }
}
