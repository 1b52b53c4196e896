//! 8086 instruction decoder.

use cpu::fields;
use cpu::instr::*;
use cpu::locate::{self, InstructionInfo, LocatorError};
use cpu::opcode::{self, Shape};
use cpu::prefix::Prefixes;
use cpu::state::Registers;
use memory::{CodeMemory, MemoryError, Window};

use num_traits::FromPrimitive;
use std::error::Error;
use std::fmt;

/// Decodes a single instruction.
///
/// `window` holds the instruction bytes starting at `opcode` (so
/// `window[0] == opcode`). Bytes past the end of the instruction are ignored.
///
/// Prefix bytes decode as `InstructionData::Prefix` on their own. A repeat
/// prefix directly followed by a string primitive is decoded together with it
/// instead.
///
/// This is a pure function of its input: decoding the same window twice yields
/// the same result.
pub fn decode(opcode: u8, window: &Window) -> Result<InstructionData, DecoderError> {
    let mut fetch = Fetch { window, pos: 1 };

    // Many instrs look like this: X X X X X X D W
    // Pull out D and W bits for convenience
    let dir_bit = fields::d_of(opcode);
    let width = Width::from_bit(fields::w_of(opcode));

    let data = match opcode::lookup(opcode) {
        Shape::RegMemWithReg(op) => {
            let (modrm, disp) = fetch.modrm(opcode)?;
            let (direction, width) = match op {
                Mnemonic::Lea | Mnemonic::Lds | Mnemonic::Les => {
                    // always load a word into `REG`
                    if !modrm.is_memory() {
                        return Err(DecoderError::invalid(opcode, "address load with register operand"));
                    }
                    (Direction::ToReg, Width::Word)
                }
                _ => (Direction::from_bit(dir_bit), width),
            };

            InstructionData::RegMemWithReg { op, direction, width, modrm, disp }
        }
        Shape::ImmToReg => {
            // W bit is in a different position here
            let width = Width::from_bit(fields::opcode_w_of(opcode));
            let reg = fields::opcode_reg_of(opcode);
            let data = fetch.data(width)?;

            InstructionData::ImmToReg { width, reg, data }
        }
        Shape::ImmToRegMem => {
            let (modrm, disp) = fetch.modrm(opcode)?;
            if modrm.reg != 0 {
                return Err(DecoderError::invalid(opcode, "`mov r/m, imm` with non-0 opcode extension"));
            }
            let data = fetch.data(width)?;

            InstructionData::ImmToRegMem { width, modrm, disp, data }
        }
        Shape::AccImm(op) => {
            let data = fetch.data(width)?;

            InstructionData::AccImm { op, width, data }
        }
        Shape::AccMem => {
            // inverted: D=0 loads the accumulator
            let direction = Direction::from_bit(!dir_bit);
            let addr = fetch.word()?;

            InstructionData::AccMem { direction, width, addr }
        }
        Shape::SegRegMove => {
            let (modrm, disp) = fetch.modrm(opcode)?;
            if modrm.reg & 0b100 != 0 {
                return Err(DecoderError::invalid(opcode, "segment register code out of range"));
            }
            let sr = SegmentRegister::from_u8(modrm.reg & 0b11)
                .ok_or_else(|| DecoderError::invalid(opcode, "invalid segment register"))?;

            InstructionData::SegRegMove { direction: Direction::from_bit(dir_bit), sr, modrm, disp }
        }
        Shape::ArithmeticGroup => {
            // direction can't be changed here, so the bit encodes something
            // else: 0=imm. same size as operand, 1=imm. 8-bit sign-extended
            let sign_extend = fields::s_of(opcode);
            let (modrm, disp) = fetch.modrm(opcode)?;
            let op = AluOp::from_u8(modrm.reg)
                .ok_or_else(|| DecoderError::invalid(opcode, "couldn't determine ALU op"))?;
            let data = if sign_extend {
                Data::Byte(fetch.byte()?)
            } else {
                fetch.data(width)?
            };

            InstructionData::Arithmetic { op, sign_extend, width, modrm, disp, data }
        }
        Shape::ShiftGroup => {
            let count = ShiftCount::from_bit(fields::v_of(opcode));
            let (modrm, disp) = fetch.modrm(opcode)?;
            let op = ShiftOp::from_u8(modrm.reg)
                .ok_or_else(|| DecoderError::invalid(opcode, "shift group with opcode extension 6"))?;

            InstructionData::Shift { op, count, width, modrm, disp }
        }
        Shape::UnaryGroup => {
            let (modrm, disp) = fetch.modrm(opcode)?;
            let op = UnaryOp::from_u8(modrm.reg)
                .ok_or_else(|| DecoderError::invalid(opcode, "0xF6/0xF7 group with opcode extension 1"))?;
            let data = match op {
                UnaryOp::Test => Some(fetch.data(width)?),
                _ => None,
            };

            InstructionData::Unary { op, width, modrm, disp, data }
        }
        Shape::IncDecGroup => {
            let (modrm, disp) = fetch.modrm(opcode)?;
            let op = match modrm.reg {
                0 => Mnemonic::Inc,
                1 => Mnemonic::Dec,
                _ => return Err(DecoderError::invalid(opcode, "0xFE group with opcode extension other than 0 or 1")),
            };

            InstructionData::RegMem { op, width, modrm, disp }
        }
        Shape::IndirectGroup => {
            let (modrm, disp) = fetch.modrm(opcode)?;
            let op = match modrm.reg {
                0 => Mnemonic::Inc,
                1 => Mnemonic::Dec,
                2 => Mnemonic::Call,
                3 => Mnemonic::CallFar,
                4 => Mnemonic::Jmp,
                5 => Mnemonic::JmpFar,
                6 => Mnemonic::Push,
                _ => return Err(DecoderError::invalid(opcode, "0xFF group with opcode extension 7")),
            };
            if (op == Mnemonic::CallFar || op == Mnemonic::JmpFar) && !modrm.is_memory() {
                return Err(DecoderError::invalid(opcode, "far pointer in register"));
            }

            InstructionData::RegMem { op, width, modrm, disp }
        }
        Shape::PopRegMem => {
            let (modrm, disp) = fetch.modrm(opcode)?;
            if modrm.reg != 0 {
                return Err(DecoderError::invalid(opcode, "`pop r/m` with non-0 opcode extension"));
            }

            InstructionData::RegMem { op: Mnemonic::Pop, width: Width::Word, modrm, disp }
        }
        Shape::Reg(op) => {
            InstructionData::Reg { op, reg: fields::opcode_reg_of(opcode) }
        }
        Shape::SegReg(op) => {
            let sr = SegmentRegister::from_u8(fields::sr_of(opcode))
                .ok_or_else(|| DecoderError::invalid(opcode, "invalid segment register"))?;

            InstructionData::SegReg { op, sr }
        }
        Shape::ShortJump(op) => {
            InstructionData::ShortJump { op, offset: fetch.byte()? as i8 }
        }
        Shape::NearJump(op) => {
            InstructionData::NearJump { op, offset: fetch.word()? as i16 }
        }
        Shape::Immediate(op, width) => {
            InstructionData::Immediate { op, data: fetch.data(width)? }
        }
        Shape::PortFixed(op) => {
            InstructionData::Port { op, width, port: Port::Fixed(fetch.byte()?) }
        }
        Shape::PortDx(op) => {
            InstructionData::Port { op, width, port: Port::Dx }
        }
        Shape::Single(op) => InstructionData::Single { op },
        Shape::StringOp(op) => InstructionData::String { repeat: None, op, width },
        Shape::Repeat => {
            let repeat = RepeatCondition::from_bit(fields::z_of(opcode));
            let next = fetch.byte()?;
            match opcode::lookup(next) {
                Shape::StringOp(op) => InstructionData::String {
                    repeat: Some(repeat),
                    op,
                    width: Width::from_bit(fields::w_of(next)),
                },
                _ => InstructionData::Prefix(Prefix::Repeat(repeat)),
            }
        }
        Shape::Prefix(prefix) => InstructionData::Prefix(prefix),
        Shape::Escape => {
            let (modrm, disp) = fetch.modrm(opcode)?;
            let code = (opcode & 0b111) << 3 | modrm.reg;

            InstructionData::Escape { code, modrm, disp }
        }
        Shape::NotImplemented => return Err(DecoderError::NotYetImplemented(opcode)),
    };

    Ok(data)
}

/// Cursor over the bytes following the opcode.
struct Fetch<'a> {
    window: &'a Window,
    pos: usize,
}

impl<'a> Fetch<'a> {
    fn byte(&mut self) -> Result<u8, DecoderError> {
        let b = *self.window.get(self.pos)
            .ok_or_else(|| DecoderError::invalid(self.window[0], "instruction longer than 6 bytes"))?;
        self.pos += 1;
        Ok(b)
    }

    /// Reads a little-endian word.
    fn word(&mut self) -> Result<u16, DecoderError> {
        let lo = self.byte()? as u16;
        let hi = self.byte()? as u16;
        Ok(hi << 8 | lo)
    }

    fn data(&mut self, width: Width) -> Result<Data, DecoderError> {
        Ok(match width {
            Width::Byte => Data::Byte(self.byte()?),
            Width::Word => Data::Word(self.word()?),
        })
    }

    /// Reads a Mod-Reg-R/M byte and the displacement it specifies.
    fn modrm(&mut self, opcode: u8) -> Result<(ModRm, Displacement), DecoderError> {
        let modrm = ModRm::from_byte(self.byte()?)
            .ok_or_else(|| DecoderError::invalid(opcode, "invalid Mod-Reg-R/M byte"))?;

        let disp = match modrm.mode {
            // `[bp]` without displacement is replaced by a direct address
            Mode::Memory if modrm.rm == 0b110 => Displacement::Word(self.word()?),
            Mode::Memory => Displacement::None,
            Mode::Memory8 => Displacement::Byte(self.byte()?),
            Mode::Memory16 => Displacement::Word(self.word()?),
            Mode::Register => Displacement::None,
        };

        Ok((modrm, disp))
    }
}

/// Decodes a stream of instructions from memory.
///
/// Prefix bytes are folded into the instruction that follows them. Repeat
/// prefixes end up in the `String` data of the instruction.
#[derive(Debug)]
pub struct Decoder<'a, M: CodeMemory + 'a> {
    /// Address of the next byte that will be loaded from memory.
    pos: u32,
    mem: &'a M,
}

impl<'a, M: CodeMemory> Decoder<'a, M> {
    /// Creates a new instruction decoder.
    ///
    /// # Parameters
    ///
    /// * `mem`: The memory to read from.
    /// * `pc`: The address at which to start decoding.
    pub fn new(mem: &'a M, pc: u32) -> Self {
        Self {
            pos: pc,
            mem,
        }
    }

    /// Returns the address of the first byte of the next instruction we're
    /// going to decode.
    ///
    /// This is incremented as `decode_next` is called.
    pub fn current_address(&self) -> u32 {
        self.pos
    }

    /// Whether all bytes in memory have been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.mem.len()
    }

    /// Read and decode the next instruction in the stream.
    ///
    /// If this returns an error, the decoder's address may point behind a
    /// prefix byte and the decoder should not be used for further decoding.
    pub fn decode_next(&mut self) -> Result<Decoded, DecoderError> {
        let address = self.pos;
        match self.decode_with_prefixes() {
            Ok(decoded) => {
                trace!("{:#06X}: {:?}", address, decoded.data);
                Ok(decoded)
            }
            Err(e) => {
                debug!("failed to decode instruction at {:#06X}: {}", address, e);
                Err(e)
            }
        }
    }

    fn decode_with_prefixes(&mut self) -> Result<Decoded, DecoderError> {
        let address = self.pos;
        let mut prefixes = Prefixes::empty();

        loop {
            let window = self.mem.window(self.pos)?;
            let data = decode(window[0], &window)?;

            let end = self.pos.checked_add(data.len() as u32)
                .ok_or(MemoryError { addr: self.pos })?;
            if end > self.mem.len() {
                return Err(MemoryError { addr: self.mem.len() }.into());
            }
            self.pos = end;

            match data {
                InstructionData::Prefix(prefix) => {
                    trace!("collecting prefix {:?}", prefix);
                    prefixes = prefixes.add(prefix, window[0])?;
                }
                data => {
                    let data = fold_repeat(&mut prefixes, data, window[0])?;
                    return Ok(Decoded {
                        address,
                        len: self.pos - address,
                        prefixes,
                        data,
                    });
                }
            }
        }
    }
}

/// Moves a collected repeat prefix into the string instruction it applies to.
fn fold_repeat(prefixes: &mut Prefixes, data: InstructionData, opcode: u8) -> Result<InstructionData, DecoderError> {
    match (prefixes.take_repeat(), data) {
        (None, data) => Ok(data),
        (Some(repeat), InstructionData::String { repeat: inner, op, width }) => {
            if inner.map_or(false, |inner| inner != repeat) {
                return Err(DecoderError::invalid(opcode, "conflicting repeat prefixes"));
            }
            Ok(InstructionData::String { repeat: Some(repeat), op, width })
        }
        (Some(_), _) => Err(DecoderError::invalid(opcode, "repeat prefix before non-string instruction")),
    }
}

/// An instruction decoded from a stream, along with its location and
/// prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Address of the first byte (including prefixes).
    pub address: u32,
    /// Length in bytes, including prefixes.
    pub len: u32,
    pub prefixes: Prefixes,
    pub data: InstructionData,
}

impl Decoded {
    /// Address of the instruction following this one.
    pub fn next_address(&self) -> u32 {
        self.address + self.len
    }

    pub fn segment_override(&self) -> Option<SegmentRegister> {
        self.prefixes.segment()
    }

    pub fn is_locked(&self) -> bool {
        self.prefixes.contains(Prefixes::LOCK)
    }

    /// Resolves the operands against a register snapshot.
    pub fn resolve(&self, registers: &Registers) -> Result<InstructionInfo, LocatorError> {
        locate::resolve(&self.data, registers)
    }
}

/// Error type returned by the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoderError {
    /// The opcode is known, but extracting its operands isn't implemented.
    NotYetImplemented(u8),
    /// A field combination that the encoding rules out.
    Instruction {
        opcode: u8,
        reason: &'static str,
    },
    /// The instruction extends past the end of memory.
    Memory(MemoryError),
}

impl DecoderError {
    #[cold]
    pub(crate) fn invalid(opcode: u8, reason: &'static str) -> Self {
        DecoderError::Instruction { opcode, reason }
    }
}

impl From<MemoryError> for DecoderError {
    #[cold]
    fn from(e: MemoryError) -> Self {
        DecoderError::Memory(e)
    }
}

impl fmt::Display for DecoderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecoderError::NotYetImplemented(opcode) => {
                write!(f, "opcode {:#04X} is not yet implemented", opcode)
            }
            DecoderError::Instruction { opcode, reason } => {
                write!(f, "invalid instruction (opcode {:#04X}): {}", opcode, reason)
            }
            DecoderError::Memory(e) => write!(f, "{}", e),
        }
    }
}

impl Error for DecoderError {}

#[cfg(test)]
mod tests {
    use super::*;
    use memory::{ArrayMemory, WINDOW_LEN};

    fn bytes(rawstr: &str) -> Vec<u8> {
        rawstr.split_whitespace()
            .map(|hexstr| u8::from_str_radix(hexstr, 16).unwrap())
            .collect()
    }

    fn decode_str(rawstr: &str) -> Result<InstructionData, DecoderError> {
        let raw = bytes(rawstr);
        let mut window = [0; WINDOW_LEN];
        window[..raw.len()].copy_from_slice(&raw);
        let data = decode(window[0], &window)?;
        assert_eq!(data.len(), raw.len(), "length mismatch for {}", rawstr);
        Ok(data)
    }

    fn modrm(byte: u8) -> ModRm {
        ModRm::from_byte(byte).unwrap()
    }

    #[test]
    fn reg_to_reg() {
        assert_eq!(decode_str("89 D9").unwrap(), InstructionData::RegMemWithReg {
            op: Mnemonic::Mov,
            direction: Direction::FromReg,
            width: Width::Word,
            modrm: ModRm { mode: Mode::Register, reg: 0b011, rm: 0b001 },
            disp: Displacement::None,
        });
    }

    #[test]
    fn direct_address() {
        assert_eq!(decode_str("8B 1E 55 01").unwrap(), InstructionData::RegMemWithReg {
            op: Mnemonic::Mov,
            direction: Direction::ToReg,
            width: Width::Word,
            modrm: ModRm { mode: Mode::Memory, reg: 0b011, rm: 0b110 },
            disp: Displacement::Word(0x0155),
        });
    }

    #[test]
    fn sign_extended_immediate() {
        assert_eq!(decode_str("83 82 04 3D 0C").unwrap(), InstructionData::Arithmetic {
            op: AluOp::Add,
            sign_extend: true,
            width: Width::Word,
            modrm: ModRm { mode: Mode::Memory16, reg: 0, rm: 0b010 },
            disp: Displacement::Word(0x3D04),
            data: Data::Byte(0x0C),
        });
        // S=1, W=0 also reads a single byte
        assert_eq!(decode_str("82 C1 7F").unwrap(), InstructionData::Arithmetic {
            op: AluOp::Add,
            sign_extend: true,
            width: Width::Byte,
            modrm: modrm(0xC1),
            disp: Displacement::None,
            data: Data::Byte(0x7F),
        });
        // S=0, W=1 reads a full word
        assert_eq!(decode_str("81 FB 34 12").unwrap(), InstructionData::Arithmetic {
            op: AluOp::Cmp,
            sign_extend: false,
            width: Width::Word,
            modrm: modrm(0xFB),
            disp: Displacement::None,
            data: Data::Word(0x1234),
        });
    }

    #[test]
    fn imm_to_reg() {
        assert_eq!(decode_str("B1 88").unwrap(), InstructionData::ImmToReg {
            width: Width::Byte,
            reg: 0b001,
            data: Data::Byte(0x88),
        });
        assert_eq!(decode_str("BA 6C 0F").unwrap(), InstructionData::ImmToReg {
            width: Width::Word,
            reg: 0b010,
            data: Data::Word(0x0F6C),
        });
    }

    #[test]
    fn not_yet_implemented() {
        assert_eq!(decode_str("9A"), Err(DecoderError::NotYetImplemented(0x9A)));
        assert_eq!(decode_str("EA"), Err(DecoderError::NotYetImplemented(0xEA)));
        assert_eq!(decode_str("0F"), Err(DecoderError::NotYetImplemented(0x0F)));
        assert_eq!(decode_str("64"), Err(DecoderError::NotYetImplemented(0x64)));
    }

    #[test]
    fn invalid_field_combinations() {
        fn invalid(rawstr: &str) {
            let raw = bytes(rawstr);
            let mut window = [0; WINDOW_LEN];
            window[..raw.len()].copy_from_slice(&raw);
            match decode(window[0], &window) {
                Err(DecoderError::Instruction { opcode, .. }) => assert_eq!(opcode, raw[0]),
                other => panic!("{} decoded as {:?}", rawstr, other),
            }
        }

        invalid("D0 F0");       // shift extension 110
        invalid("F6 C8");       // unary extension 001
        invalid("FE D0");       // 0xFE extension 2
        invalid("FF F8");       // 0xFF extension 7
        invalid("FF D8");       // far call through register
        invalid("8F C8");       // pop with extension 1
        invalid("C6 C8 01");    // mov imm with extension 1
        invalid("8C E0");       // segment register code 4
        invalid("8D C0");       // lea from register
    }

    #[test]
    fn displacement_lengths() {
        // `mov r/m, reg` is 2 bytes plus displacement for every Mod/R/M
        for md in 0..4 {
            for rm in 0..8 {
                let byte = fields::modrm_byte(md, 0b010, rm);
                let window = [0x88, byte, 0x12, 0x34, 0x56, 0x78];
                let data = decode(0x88, &window).unwrap();
                let expected_disp = match (md, rm) {
                    (0b00, 0b110) => Displacement::Word(0x3412),
                    (0b00, _) => Displacement::None,
                    (0b01, _) => Displacement::Byte(0x12),
                    (0b10, _) => Displacement::Word(0x3412),
                    _ => Displacement::None,
                };
                assert_eq!(data.disp(), expected_disp, "mod={:02b} rm={:03b}", md, rm);
                assert_eq!(data.len(), 2 + expected_disp.len());
            }
        }
    }

    #[test]
    fn immediate_follows_displacement() {
        assert_eq!(decode_str("C7 85 D4 FE 2C 01").unwrap(), InstructionData::ImmToRegMem {
            width: Width::Word,
            modrm: modrm(0x85),
            disp: Displacement::Word(0xFED4),
            data: Data::Word(0x012C),
        });
        assert_eq!(decode_str("C6 06 E8 03 07").unwrap(), InstructionData::ImmToRegMem {
            width: Width::Byte,
            modrm: modrm(0x06),
            disp: Displacement::Word(0x03E8),
            data: Data::Byte(0x07),
        });
        assert_eq!(decode_str("F6 47 05 01").unwrap(), InstructionData::Unary {
            op: UnaryOp::Test,
            width: Width::Byte,
            modrm: modrm(0x47),
            disp: Displacement::Byte(0x05),
            data: Some(Data::Byte(0x01)),
        });
    }

    #[test]
    fn accumulator_forms() {
        assert_eq!(decode_str("A1 FB 09").unwrap(), InstructionData::AccMem {
            direction: Direction::ToReg,
            width: Width::Word,
            addr: 0x09FB,
        });
        assert_eq!(decode_str("A2 FA 09").unwrap(), InstructionData::AccMem {
            direction: Direction::FromReg,
            width: Width::Byte,
            addr: 0x09FA,
        });
        assert_eq!(decode_str("3D E8 03").unwrap(), InstructionData::AccImm {
            op: Mnemonic::Cmp,
            width: Width::Word,
            data: Data::Word(0x03E8),
        });
        assert_eq!(decode_str("A8 82").unwrap(), InstructionData::AccImm {
            op: Mnemonic::Test,
            width: Width::Byte,
            data: Data::Byte(0x82),
        });
    }

    #[test]
    fn segment_forms() {
        assert_eq!(decode_str("8E D8").unwrap(), InstructionData::SegRegMove {
            direction: Direction::ToReg,
            sr: SegmentRegister::Ds,
            modrm: modrm(0xD8),
            disp: Displacement::None,
        });
        assert_eq!(decode_str("8C 46 02").unwrap(), InstructionData::SegRegMove {
            direction: Direction::FromReg,
            sr: SegmentRegister::Es,
            modrm: modrm(0x46),
            disp: Displacement::Byte(0x02),
        });
        assert_eq!(decode_str("1E").unwrap(), InstructionData::SegReg { op: Mnemonic::Push, sr: SegmentRegister::Ds });
        assert_eq!(decode_str("17").unwrap(), InstructionData::SegReg { op: Mnemonic::Pop, sr: SegmentRegister::Ss });
    }

    #[test]
    fn groups() {
        assert_eq!(decode_str("D3 E8").unwrap(), InstructionData::Shift {
            op: ShiftOp::Shr,
            count: ShiftCount::Cl,
            width: Width::Word,
            modrm: modrm(0xE8),
            disp: Displacement::None,
        });
        assert_eq!(decode_str("D0 07").unwrap(), InstructionData::Shift {
            op: ShiftOp::Rol,
            count: ShiftCount::One,
            width: Width::Byte,
            modrm: modrm(0x07),
            disp: Displacement::None,
        });
        assert_eq!(decode_str("F7 F3").unwrap(), InstructionData::Unary {
            op: UnaryOp::Div,
            width: Width::Word,
            modrm: modrm(0xF3),
            disp: Displacement::None,
            data: None,
        });
        assert_eq!(decode_str("FE 4E 01").unwrap(), InstructionData::RegMem {
            op: Mnemonic::Dec,
            width: Width::Byte,
            modrm: modrm(0x4E),
            disp: Displacement::Byte(0x01),
        });
        assert_eq!(decode_str("FF 1E 34 12").unwrap(), InstructionData::RegMem {
            op: Mnemonic::CallFar,
            width: Width::Word,
            modrm: modrm(0x1E),
            disp: Displacement::Word(0x1234),
        });
        assert_eq!(decode_str("8F 00").unwrap(), InstructionData::RegMem {
            op: Mnemonic::Pop,
            width: Width::Word,
            modrm: modrm(0x00),
            disp: Displacement::None,
        });
    }

    #[test]
    fn register_in_opcode() {
        assert_eq!(decode_str("41").unwrap(), InstructionData::Reg { op: Mnemonic::Inc, reg: 1 });
        assert_eq!(decode_str("4F").unwrap(), InstructionData::Reg { op: Mnemonic::Dec, reg: 7 });
        assert_eq!(decode_str("56").unwrap(), InstructionData::Reg { op: Mnemonic::Push, reg: 6 });
        assert_eq!(decode_str("5D").unwrap(), InstructionData::Reg { op: Mnemonic::Pop, reg: 5 });
        assert_eq!(decode_str("93").unwrap(), InstructionData::Reg { op: Mnemonic::Xchg, reg: 3 });
        assert_eq!(decode_str("90").unwrap(), InstructionData::Single { op: Mnemonic::Nop });
    }

    #[test]
    fn jumps() {
        assert_eq!(decode_str("75 FC").unwrap(), InstructionData::ShortJump { op: Mnemonic::Jne, offset: -4 });
        assert_eq!(decode_str("E2 FE").unwrap(), InstructionData::ShortJump { op: Mnemonic::Loop, offset: -2 });
        assert_eq!(decode_str("E3 10").unwrap(), InstructionData::ShortJump { op: Mnemonic::Jcxz, offset: 16 });
        assert_eq!(decode_str("EB 00").unwrap(), InstructionData::ShortJump { op: Mnemonic::Jmp, offset: 0 });
        assert_eq!(decode_str("E8 FD FF").unwrap(), InstructionData::NearJump { op: Mnemonic::Call, offset: -3 });
        assert_eq!(decode_str("E9 00 01").unwrap(), InstructionData::NearJump { op: Mnemonic::Jmp, offset: 0x100 });
    }

    #[test]
    fn immediates_and_ports() {
        assert_eq!(decode_str("C2 10 00").unwrap(), InstructionData::Immediate { op: Mnemonic::Ret, data: Data::Word(16) });
        assert_eq!(decode_str("CD 21").unwrap(), InstructionData::Immediate { op: Mnemonic::Int, data: Data::Byte(0x21) });
        assert_eq!(decode_str("D4 0A").unwrap(), InstructionData::Immediate { op: Mnemonic::Aam, data: Data::Byte(10) });
        assert_eq!(decode_str("E4 C8").unwrap(), InstructionData::Port { op: Mnemonic::In, width: Width::Byte, port: Port::Fixed(0xC8) });
        assert_eq!(decode_str("EF").unwrap(), InstructionData::Port { op: Mnemonic::Out, width: Width::Word, port: Port::Dx });
        assert_eq!(decode_str("CC").unwrap(), InstructionData::Single { op: Mnemonic::Int3 });
    }

    #[test]
    fn strings() {
        assert_eq!(decode_str("F3 A4").unwrap(), InstructionData::String {
            repeat: Some(RepeatCondition::WhileZero),
            op: Mnemonic::Movs,
            width: Width::Byte,
        });
        assert_eq!(decode_str("F2 AF").unwrap(), InstructionData::String {
            repeat: Some(RepeatCondition::WhileNotZero),
            op: Mnemonic::Scas,
            width: Width::Word,
        });
        assert_eq!(decode_str("AD").unwrap(), InstructionData::String {
            repeat: None,
            op: Mnemonic::Lods,
            width: Width::Word,
        });
    }

    #[test]
    fn escape() {
        assert_eq!(decode_str("D9 2E 34 12").unwrap(), InstructionData::Escape {
            code: 0b001_101,
            modrm: modrm(0x2E),
            disp: Displacement::Word(0x1234),
        });
    }

    #[test]
    fn prefixes() {
        assert_eq!(decode_str("26").unwrap(), InstructionData::Prefix(Prefix::Segment(SegmentRegister::Es)));
        assert_eq!(decode_str("F0").unwrap(), InstructionData::Prefix(Prefix::Lock));

        // a repeat prefix only merges with a string primitive right behind it
        assert_eq!(decode(0xF3, &[0xF3, 0x26, 0xA4, 0, 0, 0]).unwrap(),
                   InstructionData::Prefix(Prefix::Repeat(RepeatCondition::WhileZero)));
        assert_eq!(decode(0xF2, &[0xF2, 0x90, 0, 0, 0, 0]).unwrap(),
                   InstructionData::Prefix(Prefix::Repeat(RepeatCondition::WhileNotZero)));
    }

    #[test]
    fn idempotent() {
        let windows: &[Window] = &[
            [0x83, 0x82, 0x04, 0x3D, 0x0C, 0x00],
            [0x8B, 0x1E, 0x55, 0x01, 0xFF, 0xFF],
            [0xF3, 0xA5, 0x00, 0x00, 0x00, 0x00],
            [0xC7, 0x85, 0xD4, 0xFE, 0x2C, 0x01],
        ];
        for window in windows {
            assert_eq!(decode(window[0], window), decode(window[0], window));
        }
    }

    #[test]
    fn every_opcode_decodes_or_errors() {
        // nothing panics, and only the table's gaps report `NotYetImplemented`
        for opcode in 0x00..=0xFFu8 {
            for &second in &[0x00, 0x06, 0x46, 0x86, 0xC0, 0xFF] {
                let window = [opcode, second, 0x12, 0x34, 0x56, 0x78];
                match decode(opcode, &window) {
                    Ok(data) => assert!(data.len() <= WINDOW_LEN),
                    Err(DecoderError::NotYetImplemented(op)) => {
                        assert_eq!(op, opcode);
                        assert!(!opcode::lookup(opcode).is_implemented());
                    }
                    Err(DecoderError::Instruction { .. }) => {}
                    Err(e) => panic!("unexpected error {:?}", e),
                }
            }
        }
    }

    #[test]
    fn stream_folds_prefixes() {
        let mem = ArrayMemory::new(bytes("26 8B 07 F0 86 04 89 D9"));
        let mut dec = Decoder::new(&mem, 0);

        let first = dec.decode_next().unwrap();
        assert_eq!(first.address, 0);
        assert_eq!(first.len, 3);
        assert_eq!(first.segment_override(), Some(SegmentRegister::Es));
        assert!(!first.is_locked());

        let second = dec.decode_next().unwrap();
        assert_eq!(second.address, 3);
        assert_eq!(second.len, 3);
        assert!(second.is_locked());
        assert_eq!(second.data.mnemonic(), Mnemonic::Xchg);

        let third = dec.decode_next().unwrap();
        assert_eq!(third.next_address(), 8);
        assert!(dec.is_at_end());
    }

    #[test]
    fn stream_truncated() {
        let mem = ArrayMemory::new(bytes("89 D9 8B 1E 55"));
        let mut dec = Decoder::new(&mem, 0);
        dec.decode_next().unwrap();
        assert_eq!(dec.decode_next(), Err(DecoderError::Memory(MemoryError { addr: 5 })));
    }

    #[test]
    fn stream_end_of_address_space() {
        /// Memory covering every 32-bit address, filled with `mov ax, imm16`.
        struct Full;

        impl CodeMemory for Full {
            fn len(&self) -> u32 {
                u32::max_value()
            }

            fn load(&self, _addr: u32) -> Result<u8, MemoryError> {
                Ok(0xB8)
            }
        }

        let start = u32::max_value() - 1;
        let mut dec = Decoder::new(&Full, start);
        assert_eq!(dec.decode_next(), Err(DecoderError::Memory(MemoryError { addr: start })));
    }

    #[test]
    fn stream_conflicting_overrides() {
        let mem = ArrayMemory::new(bytes("26 2E 8B 07"));
        let mut dec = Decoder::new(&mem, 0);
        match dec.decode_next() {
            Err(DecoderError::Instruction { opcode: 0x2E, .. }) => {}
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn stream_repeat_around_override() {
        let movsb = InstructionData::String {
            repeat: Some(RepeatCondition::WhileZero),
            op: Mnemonic::Movs,
            width: Width::Byte,
        };

        for rawstr in &["F3 26 A4", "26 F3 A4"] {
            let mem = ArrayMemory::new(bytes(rawstr));
            let mut dec = Decoder::new(&mem, 0);
            let decoded = dec.decode_next().unwrap();
            assert_eq!(decoded.data, movsb, "{}", rawstr);
            assert_eq!(decoded.len, 3);
            assert_eq!(decoded.segment_override(), Some(SegmentRegister::Es));
            assert!(!decoded.prefixes.intersects(Prefixes::REPEAT));
            assert!(dec.is_at_end());
        }

        // `lock` and `repne` in front of a word compare
        let mem = ArrayMemory::new(bytes("F2 F0 A7"));
        let decoded = Decoder::new(&mem, 0).decode_next().unwrap();
        assert!(decoded.is_locked());
        assert_eq!(decoded.data, InstructionData::String {
            repeat: Some(RepeatCondition::WhileNotZero),
            op: Mnemonic::Cmps,
            width: Width::Word,
        });
    }

    #[test]
    fn stream_repeat_errors() {
        fn first_error(rawstr: &str) -> DecoderError {
            let mem = ArrayMemory::new(bytes(rawstr));
            Decoder::new(&mem, 0).decode_next().unwrap_err()
        }

        // `rep nop`
        assert_eq!(first_error("F3 90"), DecoderError::Instruction {
            opcode: 0x90,
            reason: "repeat prefix before non-string instruction",
        });
        assert_eq!(first_error("F3 26 8B 07"), DecoderError::Instruction {
            opcode: 0x8B,
            reason: "repeat prefix before non-string instruction",
        });
        match first_error("F2 26 F3 A4") {
            DecoderError::Instruction { reason: "conflicting repeat prefixes", .. } => {}
            e => panic!("{:?}", e),
        }
        match first_error("F2 F3 A4") {
            DecoderError::Instruction { reason: "conflicting repeat prefixes", .. } => {}
            e => panic!("{:?}", e),
        }
    }
}
