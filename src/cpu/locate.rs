//! Operand locator.
//!
//! Turns the raw fields of an [`InstructionData`] into concrete operands:
//! register names, effective address computations, direct addresses,
//! immediates and branch offsets. The only state involved is a borrowed
//! register snapshot, which is needed to compute effective addresses.
//!
//! [`InstructionData`]: ../instr/enum.InstructionData.html

use cpu::imm::Immediate;
use cpu::instr::*;
use cpu::opcode::{Shape, OPCODES};
use cpu::state::Registers;

use std::error::Error;
use std::fmt;

/// An instruction with its operands resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionInfo {
    pub mnemonic: Mnemonic,
    /// Operation width, if the encoding specifies one.
    pub width: Option<Width>,
    /// Repeat prefix of a string instruction.
    pub repeat: Option<RepeatCondition>,
    pub dest: Operand,
    pub src: Operand,
}

impl InstructionInfo {
    fn new(data: &InstructionData, dest: Operand, src: Operand) -> Self {
        let repeat = match *data {
            InstructionData::String { repeat, .. } => repeat,
            _ => None,
        };

        Self {
            mnemonic: data.mnemonic(),
            width: data.width(),
            repeat,
            dest,
            src,
        }
    }

    /// Returns the operands that are present, destination first.
    pub fn operands(&self) -> Vec<&Operand> {
        [&self.dest, &self.src].iter()
            .filter(|op| !op.is_none())
            .cloned()
            .collect()
    }
}

/// A resolved instruction operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    None,
    Register(Register),
    /// Memory addressed through base and/or index registers.
    EffectiveAddress(EffectiveAddressCalculation),
    /// Memory at a 16-bit offset encoded in the instruction.
    DirectAddress(u16),
    Immediate(Immediate),
    /// Branch displacement relative to the address of the next instruction.
    Relative(i16),
}

impl Operand {
    pub fn is_none(&self) -> bool {
        *self == Operand::None
    }

    /// Whether this operand refers to memory.
    pub fn is_memory(&self) -> bool {
        match self {
            Operand::EffectiveAddress(_) | Operand::DirectAddress(_) => true,
            _ => false,
        }
    }
}

/// Register-indirect memory operand with its computed offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveAddressCalculation {
    pub base: Option<Register>,
    pub index: Option<Register>,
    pub displacement: Displacement,
    /// 16-bit offset within the data segment. Segment relocation is not
    /// applied.
    pub address: u16,
}

impl EffectiveAddressCalculation {
    /// The raw displacement, if there is one.
    pub fn displacement_magnitude(&self) -> Option<u16> {
        self.displacement.raw()
    }

    /// The displacement as a signed value, if there is one.
    pub fn signed_displacement(&self) -> Option<i16> {
        match self.displacement {
            Displacement::None => None,
            disp => Some(disp.signed()),
        }
    }
}

/// Base and index register for each `R/M` code with `MOD != 11`.
///
/// `110` with `MOD=00` is the direct address form and never looks at this
/// table.
const ADDRESSING: [(Option<Register>, Option<Register>); 8] = [
    (Some(Register::Bx), Some(Register::Si)),
    (Some(Register::Bx), Some(Register::Di)),
    (Some(Register::Bp), Some(Register::Si)),
    (Some(Register::Bp), Some(Register::Di)),
    (Some(Register::Si), None),
    (Some(Register::Di), None),
    (Some(Register::Bp), None),
    (Some(Register::Bx), None),
];

/// Resolves the operands of a decoded instruction.
///
/// Registers are only read for effective address computation. The snapshot
/// should reflect the state before the instruction executes.
pub fn resolve(data: &InstructionData, registers: &Registers) -> Result<InstructionInfo, LocatorError> {
    let result = Locator { registers }.resolve(data);
    if let Err(ref e) = result {
        debug!("couldn't resolve operands of {:?}: {}", data, e);
    }
    result
}

struct Locator<'a> {
    registers: &'a Registers,
}

impl<'a> Locator<'a> {
    fn resolve(&self, data: &InstructionData) -> Result<InstructionInfo, LocatorError> {
        use cpu::instr::InstructionData as D;
        use cpu::instr::Mnemonic as M;

        if let Some(modrm) = data.modrm() {
            let disp = data.disp();
            if disp.len() != modrm.disp_len() {
                return Err(LocatorError::InvalidField { field: "displacement length", value: disp.len() as u8 });
            }
        }

        let (dest, src) = match *data {
            D::RegMemWithReg { op, direction, width, modrm, disp } => {
                expect(op, &[
                    M::Mov, M::Add, M::Or, M::Adc, M::Sbb, M::And, M::Sub, M::Xor, M::Cmp,
                    M::Test, M::Xchg, M::Lea, M::Lds, M::Les,
                ], "register/memory with register")?;
                let reg = Operand::Register(register(modrm.reg, width)?);
                let rm = self.rm(modrm, disp, width)?;
                swap_if(direction == Direction::ToReg, rm, reg)
            }
            D::ImmToReg { width, reg, data } => {
                (Operand::Register(register(reg, width)?), Operand::Immediate(data.into()))
            }
            D::ImmToRegMem { width, modrm, disp, data } => {
                (self.rm(modrm, disp, width)?, Operand::Immediate(data.into()))
            }
            D::AccImm { op, width, data } => {
                expect(op, &[
                    M::Add, M::Or, M::Adc, M::Sbb, M::And, M::Sub, M::Xor, M::Cmp, M::Test,
                ], "accumulator with immediate")?;
                (Operand::Register(Register::accumulator(width)), Operand::Immediate(data.into()))
            }
            D::AccMem { direction, width, addr } => {
                let acc = Operand::Register(Register::accumulator(width));
                swap_if(direction == Direction::ToReg, Operand::DirectAddress(addr), acc)
            }
            D::SegRegMove { direction, sr, modrm, disp } => {
                let sr = Operand::Register(sr.into());
                let rm = self.rm(modrm, disp, Width::Word)?;
                swap_if(direction == Direction::ToReg, rm, sr)
            }
            D::Arithmetic { sign_extend, width, modrm, disp, data, .. } => {
                let imm = Immediate::from(data);
                let imm = if sign_extend { imm.sign_ext_to(width) } else { imm };
                (self.rm(modrm, disp, width)?, Operand::Immediate(imm))
            }
            D::Shift { count, width, modrm, disp, .. } => {
                let count = match count {
                    ShiftCount::One => Operand::Immediate(Immediate::Byte(1)),
                    ShiftCount::Cl => Operand::Register(Register::Cl),
                };
                (self.rm(modrm, disp, width)?, count)
            }
            D::Unary { width, modrm, disp, data, .. } => {
                let src = data.map_or(Operand::None, |d| Operand::Immediate(d.into()));
                (self.rm(modrm, disp, width)?, src)
            }
            D::RegMem { op, width, modrm, disp } => {
                expect(op, &[
                    M::Inc, M::Dec, M::Call, M::CallFar, M::Jmp, M::JmpFar, M::Push, M::Pop,
                ], "register/memory")?;
                (self.rm(modrm, disp, width)?, Operand::None)
            }
            D::Reg { op, reg } => {
                let reg = Operand::Register(register(reg, Width::Word)?);
                match op {
                    M::Xchg => (Operand::Register(Register::Ax), reg),
                    M::Inc | M::Dec | M::Push | M::Pop => (reg, Operand::None),
                    _ => return Err(LocatorError::invalid_opcode(op, "register")),
                }
            }
            D::SegReg { op, sr } => {
                expect(op, &[M::Push, M::Pop], "segment register")?;
                (Operand::Register(sr.into()), Operand::None)
            }
            D::ShortJump { op, offset } => {
                expect(op, &[
                    M::Jo, M::Jno, M::Jb, M::Jnb, M::Je, M::Jne, M::Jbe, M::Ja,
                    M::Js, M::Jns, M::Jp, M::Jnp, M::Jl, M::Jnl, M::Jle, M::Jg,
                    M::Loopnz, M::Loopz, M::Loop, M::Jcxz, M::Jmp,
                ], "short jump")?;
                (Operand::Relative(offset.into()), Operand::None)
            }
            D::NearJump { op, offset } => {
                expect(op, &[M::Call, M::Jmp], "near jump")?;
                (Operand::Relative(offset), Operand::None)
            }
            D::Immediate { op, data } => match op {
                // the base is implicit when it's 10
                M::Aam | M::Aad if data.value() == 10 => (Operand::None, Operand::None),
                M::Aam | M::Aad | M::Ret | M::Retf | M::Int => (Operand::Immediate(data.into()), Operand::None),
                _ => return Err(LocatorError::invalid_opcode(op, "immediate")),
            },
            D::Port { op, width, port } => {
                let acc = Operand::Register(Register::accumulator(width));
                let port = match port {
                    self::Port::Fixed(n) => Operand::Immediate(n.into()),
                    self::Port::Dx => Operand::Register(Register::Dx),
                };
                match op {
                    M::In => (acc, port),
                    M::Out => (port, acc),
                    _ => return Err(LocatorError::invalid_opcode(op, "port")),
                }
            }
            D::String { op, .. } => {
                if !op.is_string() {
                    return Err(LocatorError::invalid_opcode(op, "string"));
                }
                (Operand::None, Operand::None)
            }
            D::Single { op } => {
                if !OPCODES.contains(&Shape::Single(op)) {
                    return Err(LocatorError::invalid_opcode(op, "no"));
                }
                (Operand::None, Operand::None)
            }
            D::Prefix(_) => (Operand::None, Operand::None),
            D::Escape { code, modrm, disp } => {
                if code > 0b111_111 {
                    return Err(LocatorError::InvalidField { field: "escape code", value: code });
                }
                (Operand::Immediate(code.into()), self.rm(modrm, disp, Width::Word)?)
            }
        };

        Ok(InstructionInfo::new(data, dest, src))
    }

    /// Resolves the `R/M` side of a Mod-Reg-R/M byte.
    fn rm(&self, modrm: ModRm, disp: Displacement, width: Width) -> Result<Operand, LocatorError> {
        if modrm.mode == Mode::Register {
            return Ok(Operand::Register(register(modrm.rm, width)?));
        }

        if modrm.is_direct() {
            return match disp {
                Displacement::Word(addr) => Ok(Operand::DirectAddress(addr)),
                _ => Err(LocatorError::InvalidField { field: "displacement length", value: disp.len() as u8 }),
            };
        }

        let (base, index) = *ADDRESSING.get(modrm.rm as usize)
            .ok_or(LocatorError::InvalidField { field: "R/M", value: modrm.rm })?;
        let address = self.value_of(base)?
            .wrapping_add(self.value_of(index)?)
            .wrapping_add(disp.signed() as u16);

        Ok(Operand::EffectiveAddress(EffectiveAddressCalculation {
            base,
            index,
            displacement: disp,
            address,
        }))
    }

    fn value_of(&self, reg: Option<Register>) -> Result<u16, LocatorError> {
        match reg {
            Some(reg) => self.registers.get(reg).ok_or(LocatorError::UntrackedRegister(reg)),
            None => Ok(0),
        }
    }
}

fn register(code: u8, width: Width) -> Result<Register, LocatorError> {
    Register::from_code(code, width).ok_or(LocatorError::InvalidField { field: "REG", value: code })
}

/// Returns `(a, b)`, or `(b, a)` if `swap` is set.
fn swap_if(swap: bool, a: Operand, b: Operand) -> (Operand, Operand) {
    if swap { (b, a) } else { (a, b) }
}

fn expect(op: Mnemonic, allowed: &[Mnemonic], shape: &'static str) -> Result<(), LocatorError> {
    if allowed.contains(&op) {
        Ok(())
    } else {
        Err(LocatorError::invalid_opcode(op, shape))
    }
}

/// Error type returned by the operand locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    /// The mnemonic doesn't use the operand shape it was paired with.
    InvalidOpcode {
        mnemonic: Mnemonic,
        shape: &'static str,
    },
    /// A register or `R/M` code doesn't fit its field, or the displacement
    /// length doesn't match `MOD`.
    InvalidField {
        field: &'static str,
        value: u8,
    },
    /// The register snapshot doesn't hold a register that is needed for
    /// address computation.
    UntrackedRegister(Register),
}

impl LocatorError {
    #[cold]
    fn invalid_opcode(mnemonic: Mnemonic, shape: &'static str) -> Self {
        LocatorError::InvalidOpcode { mnemonic, shape }
    }
}

impl fmt::Display for LocatorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LocatorError::InvalidOpcode { mnemonic, shape } => {
                write!(f, "`{}` can not have {} operands", mnemonic, shape)
            }
            LocatorError::InvalidField { field, value } => {
                write!(f, "invalid {} field value {:#b}", field, value)
            }
            LocatorError::UntrackedRegister(reg) => {
                write!(f, "register `{}` is not part of the snapshot", reg)
            }
        }
    }
}

impl Error for LocatorError {}

#[cfg(test)]
mod tests {
    use super::*;
    use cpu::decode::decode;
    use cpu::fields;
    use memory::WINDOW_LEN;

    fn resolve_str(rawstr: &str, regs: &Registers) -> InstructionInfo {
        let raw: Vec<u8> = rawstr.split_whitespace()
            .map(|hexstr| u8::from_str_radix(hexstr, 16).unwrap())
            .collect();
        let mut window = [0; WINDOW_LEN];
        window[..raw.len()].copy_from_slice(&raw);
        let data = decode(window[0], &window).unwrap();
        resolve(&data, regs).unwrap()
    }

    fn reg(r: Register) -> Operand {
        Operand::Register(r)
    }

    #[test]
    fn reg_to_reg() {
        let info = resolve_str("89 D9", &Registers::new());
        assert_eq!(info.mnemonic, Mnemonic::Mov);
        assert_eq!(info.width, Some(Width::Word));
        assert_eq!(info.dest, reg(Register::Cx));
        assert_eq!(info.src, reg(Register::Bx));
    }

    #[test]
    fn direct_address() {
        let info = resolve_str("8B 1E 55 01", &Registers::new());
        assert_eq!(info.dest, reg(Register::Bx));
        assert_eq!(info.src, Operand::DirectAddress(0x0155));
    }

    #[test]
    fn sign_extended_immediate() {
        let mut regs = Registers::new();
        regs.set_bp(0x1000);
        regs.set_si(0x0020);
        let info = resolve_str("83 82 04 3D 0C", &regs);
        assert_eq!(info.mnemonic, Mnemonic::Add);
        assert_eq!(info.dest, Operand::EffectiveAddress(EffectiveAddressCalculation {
            base: Some(Register::Bp),
            index: Some(Register::Si),
            displacement: Displacement::Word(0x3D04),
            address: 0x4D24,
        }));
        assert_eq!(info.src, Operand::Immediate(Immediate::Word(12)));

        // negative immediates are sign-extended to the operation width
        let info = resolve_str("83 C3 FE", &regs);
        assert_eq!(info.src, Operand::Immediate(Immediate::Word(0xFFFE)));
        let info = resolve_str("80 C3 FE", &regs);
        assert_eq!(info.src, Operand::Immediate(Immediate::Byte(0xFE)));
    }

    #[test]
    fn imm_to_reg() {
        let info = resolve_str("B1 88", &Registers::new());
        assert_eq!(info.dest, reg(Register::Cl));
        assert_eq!(info.src, Operand::Immediate(Immediate::Byte(0x88)));
    }

    #[test]
    fn register_table() {
        let byte = [Register::Al, Register::Cl, Register::Dl, Register::Bl,
                    Register::Ah, Register::Ch, Register::Dh, Register::Bh];
        let word = [Register::Ax, Register::Cx, Register::Dx, Register::Bx,
                    Register::Sp, Register::Bp, Register::Si, Register::Di];

        let regs = Registers::new();
        let mut seen = Vec::new();
        for (opcode, table) in &[(0x88, &byte), (0x89, &word)] {
            for rm in 0..8 {
                let modrm = fields::modrm_byte(0b11, 0, rm);
                let window = [*opcode, modrm, 0, 0, 0, 0];
                let info = resolve(&decode(*opcode, &window).unwrap(), &regs).unwrap();
                assert_eq!(info.dest, reg(table[rm as usize]));
                assert!(!seen.contains(&info.dest));
                seen.push(info.dest);
            }
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn effective_addresses() {
        let mut regs = Registers::new();
        regs.set_bx(0x0100);
        regs.set_bp(0x0200);
        regs.set_si(0x0010);
        regs.set_di(0x0020);

        let expected: [(Option<Register>, Option<Register>, u16); 8] = [
            (Some(Register::Bx), Some(Register::Si), 0x0110),
            (Some(Register::Bx), Some(Register::Di), 0x0120),
            (Some(Register::Bp), Some(Register::Si), 0x0210),
            (Some(Register::Bp), Some(Register::Di), 0x0220),
            (Some(Register::Si), None, 0x0010),
            (Some(Register::Di), None, 0x0020),
            (Some(Register::Bp), None, 0x0200),
            (Some(Register::Bx), None, 0x0100),
        ];

        for rm in 0..8u8 {
            // `mov ax, [... - 2]`
            let modrm = fields::modrm_byte(0b01, 0, rm);
            let window = [0x8B, modrm, 0xFE, 0, 0, 0];
            let info = resolve(&decode(0x8B, &window).unwrap(), &regs).unwrap();
            let (base, index, address) = expected[rm as usize];
            match info.src {
                Operand::EffectiveAddress(ea) => {
                    assert_eq!(ea.base, base);
                    assert_eq!(ea.index, index);
                    assert_eq!(ea.address, address.wrapping_sub(2));
                    assert_eq!(ea.signed_displacement(), Some(-2));
                    assert_eq!(ea.displacement_magnitude(), Some(0xFE));
                }
                op => panic!("rm={:03b} resolved to {:?}", rm, op),
            }
        }
    }

    #[test]
    fn effective_address_wraps() {
        let mut regs = Registers::new();
        regs.set_bx(0xFFF0);
        regs.set_si(0x0020);
        let info = resolve_str("8B 00", &regs);
        match info.src {
            Operand::EffectiveAddress(ea) => {
                assert_eq!(ea.address, 0x0010);
                assert_eq!(ea.signed_displacement(), None);
                assert_eq!(ea.displacement_magnitude(), None);
            }
            op => panic!("{:?}", op),
        }

        // `[bp]` is encoded with an 8-bit displacement of 0
        regs.set_bp(0x1234);
        let info = resolve_str("8B 46 00", &regs);
        match info.src {
            Operand::EffectiveAddress(ea) => {
                assert_eq!(ea.base, Some(Register::Bp));
                assert_eq!(ea.address, 0x1234);
                assert_eq!(ea.signed_displacement(), Some(0));
            }
            op => panic!("{:?}", op),
        }
    }

    #[test]
    fn accumulator_and_segment_forms() {
        let regs = Registers::new();
        let info = resolve_str("A1 FB 09", &regs);
        assert_eq!(info.dest, reg(Register::Ax));
        assert_eq!(info.src, Operand::DirectAddress(0x09FB));

        let info = resolve_str("A2 FA 09", &regs);
        assert_eq!(info.dest, Operand::DirectAddress(0x09FA));
        assert_eq!(info.src, reg(Register::Al));

        let info = resolve_str("2C 09", &regs);
        assert_eq!(info.mnemonic, Mnemonic::Sub);
        assert_eq!(info.dest, reg(Register::Al));
        assert_eq!(info.src, Operand::Immediate(Immediate::Byte(9)));

        let info = resolve_str("8E D8", &regs);
        assert_eq!(info.dest, reg(Register::Ds));
        assert_eq!(info.src, reg(Register::Ax));

        let info = resolve_str("8C 1E 34 12", &regs);
        assert_eq!(info.dest, Operand::DirectAddress(0x1234));
        assert_eq!(info.src, reg(Register::Ds));

        let info = resolve_str("07", &regs);
        assert_eq!(info.mnemonic, Mnemonic::Pop);
        assert_eq!(info.dest, reg(Register::Es));
    }

    #[test]
    fn other_shapes() {
        let regs = Registers::new();

        let info = resolve_str("D1 E0", &regs);
        assert_eq!((info.mnemonic, info.dest, info.src),
                   (Mnemonic::Shl, reg(Register::Ax), Operand::Immediate(Immediate::Byte(1))));

        let info = resolve_str("D2 C8", &regs);
        assert_eq!((info.mnemonic, info.dest, info.src),
                   (Mnemonic::Ror, reg(Register::Al), reg(Register::Cl)));

        let info = resolve_str("F7 C3 01 00", &regs);
        assert_eq!((info.mnemonic, info.src), (Mnemonic::Test, Operand::Immediate(Immediate::Word(1))));

        let info = resolve_str("F6 E3", &regs);
        assert_eq!((info.mnemonic, info.dest, info.src), (Mnemonic::Mul, reg(Register::Bl), Operand::None));

        let info = resolve_str("95", &regs);
        assert_eq!((info.dest, info.src), (reg(Register::Ax), reg(Register::Bp)));

        let info = resolve_str("52", &regs);
        assert_eq!((info.mnemonic, info.dest, info.src), (Mnemonic::Push, reg(Register::Dx), Operand::None));

        let info = resolve_str("74 FE", &regs);
        assert_eq!((info.mnemonic, info.dest), (Mnemonic::Je, Operand::Relative(-2)));

        let info = resolve_str("E8 00 10", &regs);
        assert_eq!((info.mnemonic, info.dest), (Mnemonic::Call, Operand::Relative(0x1000)));

        let info = resolve_str("EC", &regs);
        assert_eq!((info.mnemonic, info.dest, info.src), (Mnemonic::In, reg(Register::Al), reg(Register::Dx)));

        let info = resolve_str("E7 2C", &regs);
        assert_eq!((info.mnemonic, info.dest, info.src),
                   (Mnemonic::Out, Operand::Immediate(Immediate::Byte(44)), reg(Register::Ax)));

        let info = resolve_str("CD 21", &regs);
        assert_eq!(info.dest, Operand::Immediate(Immediate::Byte(0x21)));

        let info = resolve_str("D4 0A", &regs);
        assert_eq!(info.operands(), Vec::<&Operand>::new());
        let info = resolve_str("D5 07", &regs);
        assert_eq!(info.dest, Operand::Immediate(Immediate::Byte(7)));

        let info = resolve_str("F3 AB", &regs);
        assert_eq!(info.mnemonic, Mnemonic::Stos);
        assert_eq!(info.repeat, Some(RepeatCondition::WhileZero));
        assert_eq!(info.width, Some(Width::Word));
        assert!(info.operands().is_empty());

        let info = resolve_str("DD 5E 04", &regs);
        assert_eq!(info.mnemonic, Mnemonic::Esc);
        assert_eq!(info.dest, Operand::Immediate(Immediate::Byte(0b101_011)));
        assert!(info.src.is_memory());
    }

    #[test]
    fn errors() {
        let regs = Registers::new();
        let modrm = ModRm { mode: Mode::Register, reg: 0, rm: 1 };

        let data = InstructionData::RegMemWithReg {
            op: Mnemonic::Push,
            direction: Direction::FromReg,
            width: Width::Word,
            modrm,
            disp: Displacement::None,
        };
        assert_eq!(resolve(&data, &regs), Err(LocatorError::InvalidOpcode {
            mnemonic: Mnemonic::Push,
            shape: "register/memory with register",
        }));

        let data = InstructionData::ImmToReg { width: Width::Byte, reg: 9, data: Data::Byte(0) };
        assert_eq!(resolve(&data, &regs), Err(LocatorError::InvalidField { field: "REG", value: 9 }));

        let data = InstructionData::Immediate { op: Mnemonic::Jmp, data: Data::Byte(0) };
        assert!(resolve(&data, &regs).is_err());

        let data = InstructionData::String { repeat: None, op: Mnemonic::Mov, width: Width::Byte };
        assert!(resolve(&data, &regs).is_err());

        let data = InstructionData::Single { op: Mnemonic::Mov };
        assert_eq!(resolve(&data, &regs), Err(LocatorError::InvalidOpcode {
            mnemonic: Mnemonic::Mov,
            shape: "no",
        }));
        let data = InstructionData::Single { op: Mnemonic::Hlt };
        assert_eq!(resolve(&data, &regs).map(|info| info.mnemonic), Ok(Mnemonic::Hlt));
    }

    #[test]
    fn displacement_must_match_mode() {
        let regs = Registers::new();
        let mov = |mode, rm, disp| InstructionData::RegMemWithReg {
            op: Mnemonic::Mov,
            direction: Direction::ToReg,
            width: Width::Word,
            modrm: ModRm { mode, reg: 0, rm },
            disp,
        };
        let bad_len = |len| -> Result<InstructionInfo, LocatorError> {
            Err(LocatorError::InvalidField { field: "displacement length", value: len })
        };

        // direct address without its address word
        assert_eq!(resolve(&mov(Mode::Memory, 0b110, Displacement::None), &regs), bad_len(0));
        assert_eq!(resolve(&mov(Mode::Memory, 0b110, Displacement::Byte(1)), &regs), bad_len(1));
        // `[bx + disp8]` without a displacement
        assert_eq!(resolve(&mov(Mode::Memory8, 0b111, Displacement::None), &regs), bad_len(0));
        assert_eq!(resolve(&mov(Mode::Memory16, 0b000, Displacement::Byte(4)), &regs), bad_len(1));
        assert_eq!(resolve(&mov(Mode::Memory, 0b000, Displacement::Word(4)), &regs), bad_len(2));
        assert_eq!(resolve(&mov(Mode::Register, 0b000, Displacement::Byte(4)), &regs), bad_len(1));

        let info = resolve(&mov(Mode::Memory, 0b110, Displacement::Word(0x0155)), &regs).unwrap();
        assert_eq!(info.src, Operand::DirectAddress(0x0155));
        let info = resolve(&mov(Mode::Memory8, 0b111, Displacement::Byte(0xFF)), &regs).unwrap();
        match info.src {
            Operand::EffectiveAddress(ea) => assert_eq!(ea.signed_displacement(), Some(-1)),
            op => panic!("{:?}", op),
        }
    }
}
