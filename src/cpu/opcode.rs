//! The static 8086 opcode map.
//!
//! Every one of the 256 possible first bytes is assigned a structural [`Shape`]
//! here, which tells the decoder which fields to extract and how many bytes
//! follow. The decoder never looks at operand values to pick a shape, only at
//! this table and (for identifier groups) at the `REG` field of the second
//! byte.
//!
//! The layout follows the opcode map in the 8086 family user's manual. Slots
//! that are undocumented on the 8086 (the `0x60` row mirrors `0x70`, for
//! example) are marked [`Shape::NotImplemented`] together with the
//! intersegment direct `call`/`jmp`, whose operand extraction isn't written
//! yet.
//!
//! [`Shape`]: enum.Shape.html
//! [`Shape::NotImplemented`]: enum.Shape.html#variant.NotImplemented

use cpu::instr::{Mnemonic, Prefix, Width};

/// Structural shape of an instruction, determined by its first byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Shape {
    /// `X X X X X X D W`, Mod-Reg-R/M byte, optional displacement.
    RegMemWithReg(Mnemonic),
    /// `1 0 1 1 W R R R`, immediate data (`mov reg, imm`).
    ImmToReg,
    /// `1 1 0 0 0 1 1 W`, Mod-000-R/M, displacement, data (`mov r/m, imm`).
    ImmToRegMem,
    /// `X X X X X X X W`, data. Operates on `al`/`ax`.
    AccImm(Mnemonic),
    /// `1 0 1 0 0 0 D W`, 16-bit direct address (`mov` to/from accumulator).
    AccMem,
    /// `1 0 0 0 1 1 D 0`, Mod-0-SR-R/M, displacement.
    SegRegMove,
    /// `1 0 0 0 0 0 S W`, Mod-OP-R/M, displacement, data.
    ArithmeticGroup,
    /// `1 1 0 1 0 0 V W`, Mod-OP-R/M, displacement.
    ShiftGroup,
    /// `1 1 1 1 0 1 1 W`, Mod-OP-R/M, displacement, data for `test`.
    UnaryGroup,
    /// `0xFE`: `inc`/`dec` of a byte register or memory operand.
    IncDecGroup,
    /// `0xFF`: `inc`, `dec`, `call`, `jmp` and `push` of a word operand.
    IndirectGroup,
    /// `0x8F`: `pop r/m`.
    PopRegMem,
    /// `X X X X X R R R`: word register encoded in the opcode.
    Reg(Mnemonic),
    /// `X X X S R X X X`: segment register encoded in the opcode.
    SegReg(Mnemonic),
    /// 8-bit signed IP-relative offset.
    ShortJump(Mnemonic),
    /// 16-bit IP-relative offset.
    NearJump(Mnemonic),
    /// Fixed-size immediate operand.
    Immediate(Mnemonic, Width),
    /// Port number in the following byte.
    PortFixed(Mnemonic),
    /// Port number in `dx`.
    PortDx(Mnemonic),
    /// Single byte, no operands.
    Single(Mnemonic),
    /// String primitive, `1 0 1 0 X X X W`.
    StringOp(Mnemonic),
    /// `1 1 1 1 0 0 1 Z`, followed by a string primitive.
    Repeat,
    /// Segment override or `lock`.
    Prefix(Prefix),
    /// `1 1 0 1 1 X X X`, Mod-XXX-R/M, displacement.
    Escape,
    /// Recognised slot without an authored operand extraction rule.
    NotImplemented,
}

impl Shape {
    /// Whether the shape is followed by a Mod-Reg-R/M byte.
    pub fn has_modrm(&self) -> bool {
        match self {
            Shape::RegMemWithReg(_)
            | Shape::ImmToRegMem
            | Shape::SegRegMove
            | Shape::ArithmeticGroup
            | Shape::ShiftGroup
            | Shape::UnaryGroup
            | Shape::IncDecGroup
            | Shape::IndirectGroup
            | Shape::PopRegMem
            | Shape::Escape => true,
            _ => false,
        }
    }

    /// Whether the decoder has an extraction rule for this shape.
    pub fn is_implemented(&self) -> bool {
        *self != Shape::NotImplemented
    }
}

/// Looks up the shape of an opcode byte.
#[inline]
pub fn lookup(opcode: u8) -> Shape {
    OPCODES[opcode as usize]
}

/// The opcode map, indexed by the first instruction byte.
pub static OPCODES: [Shape; 256] = table::OPCODES;

mod table {
    use super::Shape as S;
    use cpu::instr::Mnemonic as M;
    use cpu::instr::{Prefix, SegmentRegister, Width};

    pub const OPCODES: [S; 256] = [
        /* 0x00 */ S::RegMemWithReg(M::Add),
        /* 0x01 */ S::RegMemWithReg(M::Add),
        /* 0x02 */ S::RegMemWithReg(M::Add),
        /* 0x03 */ S::RegMemWithReg(M::Add),
        /* 0x04 */ S::AccImm(M::Add),
        /* 0x05 */ S::AccImm(M::Add),
        /* 0x06 */ S::SegReg(M::Push),
        /* 0x07 */ S::SegReg(M::Pop),
        /* 0x08 */ S::RegMemWithReg(M::Or),
        /* 0x09 */ S::RegMemWithReg(M::Or),
        /* 0x0A */ S::RegMemWithReg(M::Or),
        /* 0x0B */ S::RegMemWithReg(M::Or),
        /* 0x0C */ S::AccImm(M::Or),
        /* 0x0D */ S::AccImm(M::Or),
        /* 0x0E */ S::SegReg(M::Push),
        /* 0x0F */ S::NotImplemented,
        /* 0x10 */ S::RegMemWithReg(M::Adc),
        /* 0x11 */ S::RegMemWithReg(M::Adc),
        /* 0x12 */ S::RegMemWithReg(M::Adc),
        /* 0x13 */ S::RegMemWithReg(M::Adc),
        /* 0x14 */ S::AccImm(M::Adc),
        /* 0x15 */ S::AccImm(M::Adc),
        /* 0x16 */ S::SegReg(M::Push),
        /* 0x17 */ S::SegReg(M::Pop),
        /* 0x18 */ S::RegMemWithReg(M::Sbb),
        /* 0x19 */ S::RegMemWithReg(M::Sbb),
        /* 0x1A */ S::RegMemWithReg(M::Sbb),
        /* 0x1B */ S::RegMemWithReg(M::Sbb),
        /* 0x1C */ S::AccImm(M::Sbb),
        /* 0x1D */ S::AccImm(M::Sbb),
        /* 0x1E */ S::SegReg(M::Push),
        /* 0x1F */ S::SegReg(M::Pop),
        /* 0x20 */ S::RegMemWithReg(M::And),
        /* 0x21 */ S::RegMemWithReg(M::And),
        /* 0x22 */ S::RegMemWithReg(M::And),
        /* 0x23 */ S::RegMemWithReg(M::And),
        /* 0x24 */ S::AccImm(M::And),
        /* 0x25 */ S::AccImm(M::And),
        /* 0x26 */ S::Prefix(Prefix::Segment(SegmentRegister::Es)),
        /* 0x27 */ S::Single(M::Daa),
        /* 0x28 */ S::RegMemWithReg(M::Sub),
        /* 0x29 */ S::RegMemWithReg(M::Sub),
        /* 0x2A */ S::RegMemWithReg(M::Sub),
        /* 0x2B */ S::RegMemWithReg(M::Sub),
        /* 0x2C */ S::AccImm(M::Sub),
        /* 0x2D */ S::AccImm(M::Sub),
        /* 0x2E */ S::Prefix(Prefix::Segment(SegmentRegister::Cs)),
        /* 0x2F */ S::Single(M::Das),
        /* 0x30 */ S::RegMemWithReg(M::Xor),
        /* 0x31 */ S::RegMemWithReg(M::Xor),
        /* 0x32 */ S::RegMemWithReg(M::Xor),
        /* 0x33 */ S::RegMemWithReg(M::Xor),
        /* 0x34 */ S::AccImm(M::Xor),
        /* 0x35 */ S::AccImm(M::Xor),
        /* 0x36 */ S::Prefix(Prefix::Segment(SegmentRegister::Ss)),
        /* 0x37 */ S::Single(M::Aaa),
        /* 0x38 */ S::RegMemWithReg(M::Cmp),
        /* 0x39 */ S::RegMemWithReg(M::Cmp),
        /* 0x3A */ S::RegMemWithReg(M::Cmp),
        /* 0x3B */ S::RegMemWithReg(M::Cmp),
        /* 0x3C */ S::AccImm(M::Cmp),
        /* 0x3D */ S::AccImm(M::Cmp),
        /* 0x3E */ S::Prefix(Prefix::Segment(SegmentRegister::Ds)),
        /* 0x3F */ S::Single(M::Aas),
        /* 0x40 */ S::Reg(M::Inc),
        /* 0x41 */ S::Reg(M::Inc),
        /* 0x42 */ S::Reg(M::Inc),
        /* 0x43 */ S::Reg(M::Inc),
        /* 0x44 */ S::Reg(M::Inc),
        /* 0x45 */ S::Reg(M::Inc),
        /* 0x46 */ S::Reg(M::Inc),
        /* 0x47 */ S::Reg(M::Inc),
        /* 0x48 */ S::Reg(M::Dec),
        /* 0x49 */ S::Reg(M::Dec),
        /* 0x4A */ S::Reg(M::Dec),
        /* 0x4B */ S::Reg(M::Dec),
        /* 0x4C */ S::Reg(M::Dec),
        /* 0x4D */ S::Reg(M::Dec),
        /* 0x4E */ S::Reg(M::Dec),
        /* 0x4F */ S::Reg(M::Dec),
        /* 0x50 */ S::Reg(M::Push),
        /* 0x51 */ S::Reg(M::Push),
        /* 0x52 */ S::Reg(M::Push),
        /* 0x53 */ S::Reg(M::Push),
        /* 0x54 */ S::Reg(M::Push),
        /* 0x55 */ S::Reg(M::Push),
        /* 0x56 */ S::Reg(M::Push),
        /* 0x57 */ S::Reg(M::Push),
        /* 0x58 */ S::Reg(M::Pop),
        /* 0x59 */ S::Reg(M::Pop),
        /* 0x5A */ S::Reg(M::Pop),
        /* 0x5B */ S::Reg(M::Pop),
        /* 0x5C */ S::Reg(M::Pop),
        /* 0x5D */ S::Reg(M::Pop),
        /* 0x5E */ S::Reg(M::Pop),
        /* 0x5F */ S::Reg(M::Pop),
        /* 0x60 */ S::NotImplemented,
        /* 0x61 */ S::NotImplemented,
        /* 0x62 */ S::NotImplemented,
        /* 0x63 */ S::NotImplemented,
        /* 0x64 */ S::NotImplemented,
        /* 0x65 */ S::NotImplemented,
        /* 0x66 */ S::NotImplemented,
        /* 0x67 */ S::NotImplemented,
        /* 0x68 */ S::NotImplemented,
        /* 0x69 */ S::NotImplemented,
        /* 0x6A */ S::NotImplemented,
        /* 0x6B */ S::NotImplemented,
        /* 0x6C */ S::NotImplemented,
        /* 0x6D */ S::NotImplemented,
        /* 0x6E */ S::NotImplemented,
        /* 0x6F */ S::NotImplemented,
        /* 0x70 */ S::ShortJump(M::Jo),
        /* 0x71 */ S::ShortJump(M::Jno),
        /* 0x72 */ S::ShortJump(M::Jb),
        /* 0x73 */ S::ShortJump(M::Jnb),
        /* 0x74 */ S::ShortJump(M::Je),
        /* 0x75 */ S::ShortJump(M::Jne),
        /* 0x76 */ S::ShortJump(M::Jbe),
        /* 0x77 */ S::ShortJump(M::Ja),
        /* 0x78 */ S::ShortJump(M::Js),
        /* 0x79 */ S::ShortJump(M::Jns),
        /* 0x7A */ S::ShortJump(M::Jp),
        /* 0x7B */ S::ShortJump(M::Jnp),
        /* 0x7C */ S::ShortJump(M::Jl),
        /* 0x7D */ S::ShortJump(M::Jnl),
        /* 0x7E */ S::ShortJump(M::Jle),
        /* 0x7F */ S::ShortJump(M::Jg),
        /* 0x80 */ S::ArithmeticGroup,
        /* 0x81 */ S::ArithmeticGroup,
        /* 0x82 */ S::ArithmeticGroup,
        /* 0x83 */ S::ArithmeticGroup,
        /* 0x84 */ S::RegMemWithReg(M::Test),
        /* 0x85 */ S::RegMemWithReg(M::Test),
        /* 0x86 */ S::RegMemWithReg(M::Xchg),
        /* 0x87 */ S::RegMemWithReg(M::Xchg),
        /* 0x88 */ S::RegMemWithReg(M::Mov),
        /* 0x89 */ S::RegMemWithReg(M::Mov),
        /* 0x8A */ S::RegMemWithReg(M::Mov),
        /* 0x8B */ S::RegMemWithReg(M::Mov),
        /* 0x8C */ S::SegRegMove,
        /* 0x8D */ S::RegMemWithReg(M::Lea),
        /* 0x8E */ S::SegRegMove,
        /* 0x8F */ S::PopRegMem,
        /* 0x90 */ S::Single(M::Nop),
        /* 0x91 */ S::Reg(M::Xchg),
        /* 0x92 */ S::Reg(M::Xchg),
        /* 0x93 */ S::Reg(M::Xchg),
        /* 0x94 */ S::Reg(M::Xchg),
        /* 0x95 */ S::Reg(M::Xchg),
        /* 0x96 */ S::Reg(M::Xchg),
        /* 0x97 */ S::Reg(M::Xchg),
        /* 0x98 */ S::Single(M::Cbw),
        /* 0x99 */ S::Single(M::Cwd),
        /* 0x9A */ S::NotImplemented,
        /* 0x9B */ S::Single(M::Wait),
        /* 0x9C */ S::Single(M::Pushf),
        /* 0x9D */ S::Single(M::Popf),
        /* 0x9E */ S::Single(M::Sahf),
        /* 0x9F */ S::Single(M::Lahf),
        /* 0xA0 */ S::AccMem,
        /* 0xA1 */ S::AccMem,
        /* 0xA2 */ S::AccMem,
        /* 0xA3 */ S::AccMem,
        /* 0xA4 */ S::StringOp(M::Movs),
        /* 0xA5 */ S::StringOp(M::Movs),
        /* 0xA6 */ S::StringOp(M::Cmps),
        /* 0xA7 */ S::StringOp(M::Cmps),
        /* 0xA8 */ S::AccImm(M::Test),
        /* 0xA9 */ S::AccImm(M::Test),
        /* 0xAA */ S::StringOp(M::Stos),
        /* 0xAB */ S::StringOp(M::Stos),
        /* 0xAC */ S::StringOp(M::Lods),
        /* 0xAD */ S::StringOp(M::Lods),
        /* 0xAE */ S::StringOp(M::Scas),
        /* 0xAF */ S::StringOp(M::Scas),
        /* 0xB0 */ S::ImmToReg,
        /* 0xB1 */ S::ImmToReg,
        /* 0xB2 */ S::ImmToReg,
        /* 0xB3 */ S::ImmToReg,
        /* 0xB4 */ S::ImmToReg,
        /* 0xB5 */ S::ImmToReg,
        /* 0xB6 */ S::ImmToReg,
        /* 0xB7 */ S::ImmToReg,
        /* 0xB8 */ S::ImmToReg,
        /* 0xB9 */ S::ImmToReg,
        /* 0xBA */ S::ImmToReg,
        /* 0xBB */ S::ImmToReg,
        /* 0xBC */ S::ImmToReg,
        /* 0xBD */ S::ImmToReg,
        /* 0xBE */ S::ImmToReg,
        /* 0xBF */ S::ImmToReg,
        /* 0xC0 */ S::NotImplemented,
        /* 0xC1 */ S::NotImplemented,
        /* 0xC2 */ S::Immediate(M::Ret, Width::Word),
        /* 0xC3 */ S::Single(M::Ret),
        /* 0xC4 */ S::RegMemWithReg(M::Les),
        /* 0xC5 */ S::RegMemWithReg(M::Lds),
        /* 0xC6 */ S::ImmToRegMem,
        /* 0xC7 */ S::ImmToRegMem,
        /* 0xC8 */ S::NotImplemented,
        /* 0xC9 */ S::NotImplemented,
        /* 0xCA */ S::Immediate(M::Retf, Width::Word),
        /* 0xCB */ S::Single(M::Retf),
        /* 0xCC */ S::Single(M::Int3),
        /* 0xCD */ S::Immediate(M::Int, Width::Byte),
        /* 0xCE */ S::Single(M::Into),
        /* 0xCF */ S::Single(M::Iret),
        /* 0xD0 */ S::ShiftGroup,
        /* 0xD1 */ S::ShiftGroup,
        /* 0xD2 */ S::ShiftGroup,
        /* 0xD3 */ S::ShiftGroup,
        /* 0xD4 */ S::Immediate(M::Aam, Width::Byte),
        /* 0xD5 */ S::Immediate(M::Aad, Width::Byte),
        /* 0xD6 */ S::NotImplemented,
        /* 0xD7 */ S::Single(M::Xlat),
        /* 0xD8 */ S::Escape,
        /* 0xD9 */ S::Escape,
        /* 0xDA */ S::Escape,
        /* 0xDB */ S::Escape,
        /* 0xDC */ S::Escape,
        /* 0xDD */ S::Escape,
        /* 0xDE */ S::Escape,
        /* 0xDF */ S::Escape,
        /* 0xE0 */ S::ShortJump(M::Loopnz),
        /* 0xE1 */ S::ShortJump(M::Loopz),
        /* 0xE2 */ S::ShortJump(M::Loop),
        /* 0xE3 */ S::ShortJump(M::Jcxz),
        /* 0xE4 */ S::PortFixed(M::In),
        /* 0xE5 */ S::PortFixed(M::In),
        /* 0xE6 */ S::PortFixed(M::Out),
        /* 0xE7 */ S::PortFixed(M::Out),
        /* 0xE8 */ S::NearJump(M::Call),
        /* 0xE9 */ S::NearJump(M::Jmp),
        /* 0xEA */ S::NotImplemented,
        /* 0xEB */ S::ShortJump(M::Jmp),
        /* 0xEC */ S::PortDx(M::In),
        /* 0xED */ S::PortDx(M::In),
        /* 0xEE */ S::PortDx(M::Out),
        /* 0xEF */ S::PortDx(M::Out),
        /* 0xF0 */ S::Prefix(Prefix::Lock),
        /* 0xF1 */ S::NotImplemented,
        /* 0xF2 */ S::Repeat,
        /* 0xF3 */ S::Repeat,
        /* 0xF4 */ S::Single(M::Hlt),
        /* 0xF5 */ S::Single(M::Cmc),
        /* 0xF6 */ S::UnaryGroup,
        /* 0xF7 */ S::UnaryGroup,
        /* 0xF8 */ S::Single(M::Clc),
        /* 0xF9 */ S::Single(M::Stc),
        /* 0xFA */ S::Single(M::Cli),
        /* 0xFB */ S::Single(M::Sti),
        /* 0xFC */ S::Single(M::Cld),
        /* 0xFD */ S::Single(M::Std),
        /* 0xFE */ S::IncDecGroup,
        /* 0xFF */ S::IndirectGroup,
    ];
}
