//! Immediate operand values.
//!
//! An immediate is an 8- or 16-bit value resolved from the data bytes of an
//! instruction. Sign extension (`S` bit) has already been applied when the
//! locator produces one, so an `Immediate` always has the width of the
//! operation it takes part in.

use cpu::instr::{Data, Width};

use std::fmt;

/// An 8 or 16-bit immediate value.
///
/// The value is stored unsigned. Whether the sign is meaningful depends on the
/// operation performed on it.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Immediate {
    Byte(u8),
    Word(u16),
}

impl Immediate {
    /// Sign-extend or truncate the immediate to a different width.
    pub fn sign_ext_to(&self, width: Width) -> Immediate {
        let extended = self.sign_extended();
        match width {
            Width::Byte => Immediate::Byte(extended as u8),
            Width::Word => Immediate::Word(extended as u16),
        }
    }

    /// Returns the sign-extended immediate value as an `i16`.
    pub fn sign_extended(&self) -> i16 {
        match *self {
            Immediate::Byte(imm) => imm as i8 as i16,
            Immediate::Word(imm) => imm as i16,
        }
    }
}

impl From<u8> for Immediate {
    fn from(imm: u8) -> Self {
        Immediate::Byte(imm)
    }
}

impl From<Data> for Immediate {
    fn from(data: Data) -> Self {
        match data {
            Data::Byte(b) => Immediate::Byte(b),
            Data::Word(w) => Immediate::Word(w),
        }
    }
}

/// Prints the unsigned decimal value of the immediate.
impl fmt::Display for Immediate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Immediate::Byte(imm) => fmt::Display::fmt(imm, f),
            Immediate::Word(imm) => fmt::Display::fmt(imm, f),
        }
    }
}
