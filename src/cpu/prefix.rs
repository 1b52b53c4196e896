//! Instruction prefix byte collection.

use cpu::decode::DecoderError;
use cpu::instr::{Prefix, RepeatCondition, SegmentRegister};

bitflags! {
    /// Bitmask of prefix bytes preceding an instruction.
    ///
    /// The decoder collects standalone prefix bytes in here and attaches them
    /// to the next instruction. A repeat prefix is moved into the string
    /// instruction it applies to, so only `lock` and the segment overrides are
    /// left once an instruction is complete.
    pub struct Prefixes: u8 {
        /// `0xF0`
        const LOCK        = 0b0000_0001;
        /// `0xF3`
        const REP         = 0b0000_0010;
        /// `0xF2`
        const REPNE       = 0b0000_0100;
        /// `0x26`
        const OVERRIDE_ES = 0b0001_0000;
        /// `0x2E`
        const OVERRIDE_CS = 0b0010_0000;
        /// `0x36`
        const OVERRIDE_SS = 0b0100_0000;
        /// `0x3E`
        const OVERRIDE_DS = 0b1000_0000;
        /// Any segment override.
        const SEGMENT     = Self::OVERRIDE_ES.bits
                          | Self::OVERRIDE_CS.bits
                          | Self::OVERRIDE_SS.bits
                          | Self::OVERRIDE_DS.bits;
        /// Either repeat prefix.
        const REPEAT      = Self::REP.bits | Self::REPNE.bits;
    }
}

impl Prefixes {
    /// Merges a decoded prefix byte into `self`.
    ///
    /// Returns an error if this would result in two different segment
    /// overrides or both repeat conditions. Repeating the same prefix is
    /// allowed and has no further effect.
    pub fn add(self, prefix: Prefix, opcode: u8) -> Result<Self, DecoderError> {
        let flag = match prefix {
            Prefix::Lock => Prefixes::LOCK,
            Prefix::Segment(SegmentRegister::Es) => Prefixes::OVERRIDE_ES,
            Prefix::Segment(SegmentRegister::Cs) => Prefixes::OVERRIDE_CS,
            Prefix::Segment(SegmentRegister::Ss) => Prefixes::OVERRIDE_SS,
            Prefix::Segment(SegmentRegister::Ds) => Prefixes::OVERRIDE_DS,
            Prefix::Repeat(RepeatCondition::WhileZero) => Prefixes::REP,
            Prefix::Repeat(RepeatCondition::WhileNotZero) => Prefixes::REPNE,
        };

        if flag.intersects(Prefixes::SEGMENT) && self.intersects(Prefixes::SEGMENT) && !self.contains(flag) {
            return Err(DecoderError::invalid(opcode, "conflicting segment override prefixes"));
        }
        if flag.intersects(Prefixes::REPEAT) && self.intersects(Prefixes::REPEAT) && !self.contains(flag) {
            return Err(DecoderError::invalid(opcode, "conflicting repeat prefixes"));
        }

        Ok(self | flag)
    }

    /// Returns the segment selected by an override prefix, if any.
    pub fn segment(&self) -> Option<SegmentRegister> {
        if self.contains(Prefixes::OVERRIDE_ES) {
            Some(SegmentRegister::Es)
        } else if self.contains(Prefixes::OVERRIDE_CS) {
            Some(SegmentRegister::Cs)
        } else if self.contains(Prefixes::OVERRIDE_SS) {
            Some(SegmentRegister::Ss)
        } else if self.contains(Prefixes::OVERRIDE_DS) {
            Some(SegmentRegister::Ds)
        } else {
            None
        }
    }

    /// Removes a repeat prefix from `self` and returns its condition.
    pub fn take_repeat(&mut self) -> Option<RepeatCondition> {
        if self.take(Prefixes::REP) {
            Some(RepeatCondition::WhileZero)
        } else if self.take(Prefixes::REPNE) {
            Some(RepeatCondition::WhileNotZero)
        } else {
            None
        }
    }

    /// If `self` contains `other`, removes `other` from `self` and returns
    /// `true`.
    fn take(&mut self, other: Prefixes) -> bool {
        if self.contains(other) {
            self.remove(other);
            true
        } else {
            false
        }
    }
}
