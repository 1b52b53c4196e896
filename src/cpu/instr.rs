//! Decoded 8086 instruction representation.

use cpu::fields;

use num_traits::FromPrimitive;
use std::fmt;

/// A decoded 8086 instruction, as it was encoded.
///
/// There is one variant per structural shape of the encoding. Each variant
/// carries exactly the fields its encoding defines; fields that an encoding
/// doesn't have simply aren't there. Nothing in here depends on register
/// contents, use [`resolve`] to turn this into concrete operands.
///
/// Register and R/M fields are kept as their raw 3-bit codes since their
/// meaning depends on `MOD` and `W`.
///
/// [`resolve`]: ../locate/fn.resolve.html
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InstructionData {
    /// Register/memory to/from register.
    ///
    /// Used by `mov`, the 8 ALU operations, `test`, `xchg`, `lea`, `lds` and
    /// `les`. The last three always load a word into `REG`, their `direction`
    /// and `width` are implied by the opcode.
    RegMemWithReg {
        op: Mnemonic,
        direction: Direction,
        width: Width,
        modrm: ModRm,
        disp: Displacement,
    },

    /// Immediate to register (`mov reg, imm`, `0xB0`-`0xBF`).
    ImmToReg {
        width: Width,
        /// 3-bit register code.
        reg: u8,
        data: Data,
    },

    /// Immediate to register/memory (`mov r/m, imm`, `0xC6`/`0xC7`).
    ImmToRegMem {
        width: Width,
        modrm: ModRm,
        disp: Displacement,
        data: Data,
    },

    /// Immediate with accumulator (ALU operations and `test`).
    AccImm {
        op: Mnemonic,
        width: Width,
        data: Data,
    },

    /// `mov` between the accumulator and a 16-bit direct address.
    ///
    /// `ToReg` means memory to accumulator (`0xA0`/`0xA1`).
    AccMem {
        direction: Direction,
        width: Width,
        addr: u16,
    },

    /// `mov` to (`0x8E`) or from (`0x8C`) a segment register.
    ///
    /// `ToReg` means the segment register is the destination.
    SegRegMove {
        direction: Direction,
        sr: SegmentRegister,
        modrm: ModRm,
        disp: Displacement,
    },

    /// Immediate group 1 (`0x80`-`0x83`): ALU operation with an immediate.
    Arithmetic {
        op: AluOp,
        /// `S` bit. If set, `data` is a single byte sign-extended to `width`.
        sign_extend: bool,
        width: Width,
        modrm: ModRm,
        disp: Displacement,
        data: Data,
    },

    /// Shift group (`0xD0`-`0xD3`).
    Shift {
        op: ShiftOp,
        count: ShiftCount,
        width: Width,
        modrm: ModRm,
        disp: Displacement,
    },

    /// Unary group (`0xF6`/`0xF7`). Only `test` carries immediate data.
    Unary {
        op: UnaryOp,
        width: Width,
        modrm: ModRm,
        disp: Displacement,
        data: Option<Data>,
    },

    /// Single register/memory operand selected by an opcode extension:
    /// `inc`/`dec` (`0xFE`), `inc`/`dec`/`call`/`jmp`/`push` (`0xFF`) and
    /// `pop` (`0x8F`).
    RegMem {
        op: Mnemonic,
        width: Width,
        modrm: ModRm,
        disp: Displacement,
    },

    /// Word register in the low 3 bits of the opcode (`inc`, `dec`, `push`,
    /// `pop`, `xchg ax, reg`).
    Reg {
        op: Mnemonic,
        reg: u8,
    },

    /// Segment register `push`/`pop`.
    SegReg {
        op: Mnemonic,
        sr: SegmentRegister,
    },

    /// Conditional jumps, loops and `jmp short` with an 8-bit displacement
    /// relative to the next instruction.
    ShortJump {
        op: Mnemonic,
        offset: i8,
    },

    /// `call` and `jmp` with a 16-bit displacement relative to the next
    /// instruction.
    NearJump {
        op: Mnemonic,
        offset: i16,
    },

    /// Instructions taking a fixed-size immediate: `ret n`, `retf n`, `int n`,
    /// `aam`, `aad`.
    Immediate {
        op: Mnemonic,
        data: Data,
    },

    /// `in`/`out`.
    Port {
        op: Mnemonic,
        width: Width,
        port: Port,
    },

    /// Single-byte instruction without operands.
    Single {
        op: Mnemonic,
    },

    /// String primitive, optionally preceded by a repeat prefix.
    String {
        repeat: Option<RepeatCondition>,
        op: Mnemonic,
        width: Width,
    },

    /// Prefix byte that applies to the next instruction.
    Prefix(Prefix),

    /// Escape to a coprocessor (`0xD8`-`0xDF`).
    Escape {
        /// 6-bit external opcode: 3 bits from the opcode, 3 from `REG`.
        code: u8,
        modrm: ModRm,
        disp: Displacement,
    },
}

impl InstructionData {
    /// Returns the instruction's mnemonic.
    pub fn mnemonic(&self) -> Mnemonic {
        use self::InstructionData::*;

        match *self {
            RegMemWithReg { op, .. }
            | AccImm { op, .. }
            | RegMem { op, .. }
            | Reg { op, .. }
            | SegReg { op, .. }
            | ShortJump { op, .. }
            | NearJump { op, .. }
            | Immediate { op, .. }
            | Port { op, .. }
            | Single { op }
            | String { op, .. } => op,
            ImmToReg { .. }
            | ImmToRegMem { .. }
            | AccMem { .. }
            | SegRegMove { .. } => Mnemonic::Mov,
            Arithmetic { op, .. } => op.mnemonic(),
            Shift { op, .. } => op.mnemonic(),
            Unary { op, .. } => op.mnemonic(),
            Prefix(prefix) => prefix.mnemonic(),
            Escape { .. } => Mnemonic::Esc,
        }
    }

    /// Returns the operation width, if the encoding has a `W` bit.
    pub fn width(&self) -> Option<Width> {
        use self::InstructionData::*;

        match *self {
            RegMemWithReg { width, .. }
            | ImmToReg { width, .. }
            | ImmToRegMem { width, .. }
            | AccImm { width, .. }
            | AccMem { width, .. }
            | Arithmetic { width, .. }
            | Shift { width, .. }
            | Unary { width, .. }
            | RegMem { width, .. }
            | Port { width, .. }
            | String { width, .. } => Some(width),
            SegRegMove { .. }
            | Reg { .. }
            | SegReg { .. } => Some(Width::Word),
            ShortJump { .. }
            | NearJump { .. }
            | Immediate { .. }
            | Single { .. }
            | Prefix(_)
            | Escape { .. } => None,
        }
    }

    /// Returns the Mod-Reg-R/M byte, if the instruction has one.
    pub fn modrm(&self) -> Option<ModRm> {
        use self::InstructionData::*;

        match *self {
            RegMemWithReg { modrm, .. }
            | ImmToRegMem { modrm, .. }
            | SegRegMove { modrm, .. }
            | Arithmetic { modrm, .. }
            | Shift { modrm, .. }
            | Unary { modrm, .. }
            | RegMem { modrm, .. }
            | Escape { modrm, .. } => Some(modrm),
            _ => None,
        }
    }

    /// Returns the displacement following the Mod-Reg-R/M byte.
    ///
    /// Instructions without Mod-Reg-R/M byte return `Displacement::None`.
    pub fn disp(&self) -> Displacement {
        use self::InstructionData::*;

        match *self {
            RegMemWithReg { disp, .. }
            | ImmToRegMem { disp, .. }
            | SegRegMove { disp, .. }
            | Arithmetic { disp, .. }
            | Shift { disp, .. }
            | Unary { disp, .. }
            | RegMem { disp, .. }
            | Escape { disp, .. } => disp,
            _ => Displacement::None,
        }
    }

    /// Returns the length of the encoded instruction in bytes.
    ///
    /// A repeat prefix is counted as part of the string instruction it
    /// precedes. Other prefixes are instructions of their own and have length
    /// 1.
    pub fn len(&self) -> usize {
        use self::InstructionData::*;

        match *self {
            RegMemWithReg { disp, .. }
            | SegRegMove { disp, .. }
            | Shift { disp, .. }
            | RegMem { disp, .. }
            | Escape { disp, .. } => 2 + disp.len(),
            ImmToRegMem { disp, data, .. }
            | Arithmetic { disp, data, .. } => 2 + disp.len() + data.len(),
            Unary { disp, data, .. } => 2 + disp.len() + data.map_or(0, |d| d.len()),
            ImmToReg { data, .. }
            | AccImm { data, .. }
            | Immediate { data, .. } => 1 + data.len(),
            AccMem { .. } => 3,
            Reg { .. }
            | SegReg { .. }
            | Single { .. }
            | Prefix(_) => 1,
            ShortJump { .. } => 2,
            NearJump { .. } => 3,
            Port { port, .. } => match port {
                self::Port::Fixed(_) => 2,
                self::Port::Dx => 1,
            },
            String { repeat, .. } => if repeat.is_some() { 2 } else { 1 },
        }
    }
}

/// The Mod-Reg-R/M byte, split into its fields.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ModRm {
    pub mode: Mode,
    /// Register code or opcode extension.
    pub reg: u8,
    pub rm: u8,
}

impl ModRm {
    /// Splits a raw Mod-Reg-R/M byte.
    ///
    /// Returns `None` only if `MOD` cannot be represented, which the 2-bit
    /// mask rules out.
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(ModRm {
            mode: Mode::from_u8(fields::mod_of(byte))?,
            reg: fields::reg_of(byte),
            rm: fields::rm_of(byte),
        })
    }

    /// Reassembles the raw byte.
    pub fn to_byte(&self) -> u8 {
        fields::modrm_byte(self.mode as u8, self.reg, self.rm)
    }

    /// Whether this is the `MOD=00`, `R/M=110` direct address form.
    pub fn is_direct(&self) -> bool {
        self.mode == Mode::Memory && self.rm == 0b110
    }

    /// Whether `R/M` names a memory operand rather than a register.
    pub fn is_memory(&self) -> bool {
        self.mode != Mode::Register
    }

    /// Number of displacement bytes that follow this byte.
    pub fn disp_len(&self) -> usize {
        fields::disp_len(self.to_byte())
    }
}

/// The `MOD` field of the Mod-Reg-R/M byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum Mode {
    /// `00` - memory, no displacement (except for the direct address form).
    Memory = 0b00,
    /// `01` - memory, 8-bit displacement sign-extended to 16 bits.
    Memory8 = 0b01,
    /// `10` - memory, 16-bit displacement.
    Memory16 = 0b10,
    /// `11` - `R/M` is a register.
    Register = 0b11,
}

/// The `D` bit: whether `REG` is the source or the destination.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    /// `D=0`: `REG` is the source.
    FromReg,
    /// `D=1`: `REG` is the destination.
    ToReg,
}

impl Direction {
    pub fn from_bit(d: bool) -> Self {
        if d { Direction::ToReg } else { Direction::FromReg }
    }

    pub fn bit(&self) -> bool {
        *self == Direction::ToReg
    }
}

/// The `W` bit: byte or word operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Width {
    Byte,
    Word,
}

impl Width {
    pub fn from_bit(w: bool) -> Self {
        if w { Width::Word } else { Width::Byte }
    }

    pub fn bit(&self) -> bool {
        *self == Width::Word
    }

    /// Operand size keyword used by assemblers.
    pub fn name(&self) -> &'static str {
        match self {
            Width::Byte => "byte",
            Width::Word => "word",
        }
    }
}

/// The `V` bit of the shift group.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShiftCount {
    /// `V=0`: shift by 1.
    One,
    /// `V=1`: shift by the count in `cl`.
    Cl,
}

impl ShiftCount {
    pub fn from_bit(v: bool) -> Self {
        if v { ShiftCount::Cl } else { ShiftCount::One }
    }

    pub fn bit(&self) -> bool {
        *self == ShiftCount::Cl
    }
}

/// The `Z` bit of a repeat prefix.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RepeatCondition {
    /// `0xF2`: `repne`/`repnz`.
    WhileNotZero,
    /// `0xF3`: `rep`/`repe`/`repz`.
    WhileZero,
}

impl RepeatCondition {
    pub fn from_bit(z: bool) -> Self {
        if z { RepeatCondition::WhileZero } else { RepeatCondition::WhileNotZero }
    }

    pub fn bit(&self) -> bool {
        *self == RepeatCondition::WhileZero
    }
}

/// Displacement following the Mod-Reg-R/M byte.
///
/// The variant is the displacement kind, the payload its raw little-endian
/// value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Displacement {
    None,
    Byte(u8),
    Word(u16),
}

impl Displacement {
    /// Number of bytes the displacement occupies in the instruction.
    pub fn len(&self) -> usize {
        match self {
            Displacement::None => 0,
            Displacement::Byte(_) => 1,
            Displacement::Word(_) => 2,
        }
    }

    /// The raw unsigned value, or `None` if there is no displacement.
    pub fn raw(&self) -> Option<u16> {
        match *self {
            Displacement::None => None,
            Displacement::Byte(b) => Some(b.into()),
            Displacement::Word(w) => Some(w),
        }
    }

    /// The displacement as a two's complement value of its own size,
    /// sign-extended to 16 bits.
    pub fn signed(&self) -> i16 {
        match *self {
            Displacement::None => 0,
            Displacement::Byte(b) => b as i8 as i16,
            Displacement::Word(w) => w as i16,
        }
    }
}

/// Immediate data bytes, as encoded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Data {
    Byte(u8),
    Word(u16),
}

impl Data {
    pub fn len(&self) -> usize {
        match self {
            Data::Byte(_) => 1,
            Data::Word(_) => 2,
        }
    }

    /// The data zero-extended to 16 bits.
    pub fn value(&self) -> u16 {
        match *self {
            Data::Byte(b) => b.into(),
            Data::Word(w) => w,
        }
    }
}

/// Port operand of `in`/`out`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Port {
    /// 8-bit port number encoded in the instruction.
    Fixed(u8),
    /// Port number in `dx`.
    Dx,
}

/// Standalone prefix bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Prefix {
    /// `0xF0`
    Lock,
    /// `0x26`, `0x2E`, `0x36`, `0x3E`
    Segment(SegmentRegister),
    /// `0xF2`, `0xF3` when the next byte isn't a string primitive, for
    /// example because another prefix sits in between.
    Repeat(RepeatCondition),
}

impl Prefix {
    pub fn mnemonic(&self) -> Mnemonic {
        match self {
            Prefix::Lock => Mnemonic::Lock,
            Prefix::Segment(_) => Mnemonic::Segment,
            Prefix::Repeat(RepeatCondition::WhileZero) => Mnemonic::Rep,
            Prefix::Repeat(RepeatCondition::WhileNotZero) => Mnemonic::Repne,
        }
    }
}

/// The 2-bit `SR` field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum SegmentRegister {
    Es = 0b00,
    Cs = 0b01,
    Ss = 0b10,
    Ds = 0b11,
}

impl SegmentRegister {
    pub fn name(&self) -> &'static str {
        Register::from(*self).name()
    }
}

/// An 8086 register.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Register {
    Al,
    Cl,
    Dl,
    Bl,
    Ah,
    Ch,
    Dh,
    Bh,

    Ax,
    Cx,
    Dx,
    Bx,
    /// Stack Pointer.
    Sp,
    /// Base Pointer.
    Bp,
    /// Source Index.
    Si,
    /// Destination Index.
    Di,

    Es,
    Cs,
    Ss,
    Ds,
}

impl Register {
    /// Converts a 3-bit `REG` (or `R/M` with `MOD=11`) code to the register it
    /// names for the given operation width.
    ///
    /// Returns `None` if `code` doesn't fit in 3 bits.
    pub fn from_code(code: u8, width: Width) -> Option<Self> {
        use self::Register::*;

        const BYTE: [Register; 8] = [Al, Cl, Dl, Bl, Ah, Ch, Dh, Bh];
        const WORD: [Register; 8] = [Ax, Cx, Dx, Bx, Sp, Bp, Si, Di];

        let table = match width {
            Width::Byte => &BYTE,
            Width::Word => &WORD,
        };
        table.get(code as usize).cloned()
    }

    /// Returns the accumulator of the given width (`al` or `ax`).
    pub fn accumulator(width: Width) -> Self {
        match width {
            Width::Byte => Register::Al,
            Width::Word => Register::Ax,
        }
    }

    pub fn name(&self) -> &'static str {
        use self::Register::*;
        match self {
            Al => "al",
            Cl => "cl",
            Dl => "dl",
            Bl => "bl",
            Ah => "ah",
            Ch => "ch",
            Dh => "dh",
            Bh => "bh",
            Ax => "ax",
            Cx => "cx",
            Dx => "dx",
            Bx => "bx",
            Sp => "sp",
            Bp => "bp",
            Si => "si",
            Di => "di",
            Es => "es",
            Cs => "cs",
            Ss => "ss",
            Ds => "ds",
        }
    }
}

impl From<SegmentRegister> for Register {
    fn from(sr: SegmentRegister) -> Self {
        match sr {
            SegmentRegister::Es => Register::Es,
            SegmentRegister::Cs => Register::Cs,
            SegmentRegister::Ss => Register::Ss,
            SegmentRegister::Ds => Register::Ds,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Specifies the operation to perform for ALU instructions.
///
/// All of these share a common encoding:
///
/// ```notrust
/// +-----------------+
/// | 0 0 A A A 0 D W |
/// +-----------------+
/// ```
///
/// Where `A` is the value of `AluOp`. The same 3-bit value selects the
/// operation in the `REG` field of the immediate group (`0x80`-`0x83`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum AluOp {
    Add = 0,
    Or = 1,
    /// Add with carry.
    Adc = 2,
    /// Subtract with borrow.
    Sbb = 3,
    And = 4,
    Sub = 5,
    Xor = 6,
    /// Set flags like `sub` would, but do not change `dest`.
    Cmp = 7,
}

impl AluOp {
    pub fn mnemonic(&self) -> Mnemonic {
        match self {
            AluOp::Add => Mnemonic::Add,
            AluOp::Or => Mnemonic::Or,
            AluOp::Adc => Mnemonic::Adc,
            AluOp::Sbb => Mnemonic::Sbb,
            AluOp::And => Mnemonic::And,
            AluOp::Sub => Mnemonic::Sub,
            AluOp::Xor => Mnemonic::Xor,
            AluOp::Cmp => Mnemonic::Cmp,
        }
    }
}

/// Shift instruction group opcode.
///
/// Stored in the `REG` field of the Mod-Reg-R/M byte. `110` is not defined on
/// the 8086.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum ShiftOp {
    Rol = 0,
    Ror = 1,
    Rcl = 2,
    Rcr = 3,
    /// Also known as `sal`.
    Shl = 4,
    Shr = 5,
    Sar = 7,
}

impl ShiftOp {
    pub fn mnemonic(&self) -> Mnemonic {
        match self {
            ShiftOp::Rol => Mnemonic::Rol,
            ShiftOp::Ror => Mnemonic::Ror,
            ShiftOp::Rcl => Mnemonic::Rcl,
            ShiftOp::Rcr => Mnemonic::Rcr,
            ShiftOp::Shl => Mnemonic::Shl,
            ShiftOp::Shr => Mnemonic::Shr,
            ShiftOp::Sar => Mnemonic::Sar,
        }
    }
}

/// `0xF6`/`0xF7` group opcode, stored in the `REG` field. `001` is not defined.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum UnaryOp {
    /// `test r/m, imm`
    Test = 0,
    Not = 2,
    Neg = 3,
    /// Unsigned multiply of the accumulator.
    Mul = 4,
    Imul = 5,
    /// Unsigned divide of `ax` or `dx:ax`.
    Div = 6,
    Idiv = 7,
}

impl UnaryOp {
    pub fn mnemonic(&self) -> Mnemonic {
        match self {
            UnaryOp::Test => Mnemonic::Test,
            UnaryOp::Not => Mnemonic::Not,
            UnaryOp::Neg => Mnemonic::Neg,
            UnaryOp::Mul => Mnemonic::Mul,
            UnaryOp::Imul => Mnemonic::Imul,
            UnaryOp::Div => Mnemonic::Div,
            UnaryOp::Idiv => Mnemonic::Idiv,
        }
    }
}

/// Instruction mnemonics of the 8086.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    // Data transfer
    Mov,
    Push,
    Pop,
    Xchg,
    In,
    Out,
    Xlat,
    Lea,
    Lds,
    Les,
    Lahf,
    Sahf,
    Pushf,
    Popf,

    // Arithmetic
    Add,
    Adc,
    Inc,
    Aaa,
    Daa,
    Sub,
    Sbb,
    Dec,
    Neg,
    Cmp,
    Aas,
    Das,
    Mul,
    Imul,
    Aam,
    Div,
    Idiv,
    Aad,
    Cbw,
    Cwd,

    // Logic
    Not,
    Shl,
    Shr,
    Sar,
    Rol,
    Ror,
    Rcl,
    Rcr,
    And,
    Test,
    Or,
    Xor,

    // String manipulation
    Movs,
    Cmps,
    Scas,
    Lods,
    Stos,

    // Control transfer
    Call,
    /// Intersegment indirect call.
    CallFar,
    Jmp,
    /// Intersegment indirect jump.
    JmpFar,
    Ret,
    Retf,
    Je,
    Jl,
    Jle,
    Jb,
    Jbe,
    Jp,
    Jo,
    Js,
    Jne,
    Jnl,
    Jg,
    Jnb,
    Ja,
    Jnp,
    Jno,
    Jns,
    Loop,
    Loopz,
    Loopnz,
    Jcxz,
    Int,
    Int3,
    Into,
    Iret,

    // Processor control
    Clc,
    Cmc,
    Stc,
    Cld,
    Std,
    Cli,
    Sti,
    Hlt,
    Wait,
    Esc,
    Lock,
    /// Segment override prefix.
    Segment,
    Rep,
    Repne,
    Nop,
}

impl Mnemonic {
    pub fn name(&self) -> &'static str {
        use self::Mnemonic::*;
        match self {
            Mov => "mov",
            Push => "push",
            Pop => "pop",
            Xchg => "xchg",
            In => "in",
            Out => "out",
            Xlat => "xlat",
            Lea => "lea",
            Lds => "lds",
            Les => "les",
            Lahf => "lahf",
            Sahf => "sahf",
            Pushf => "pushf",
            Popf => "popf",
            Add => "add",
            Adc => "adc",
            Inc => "inc",
            Aaa => "aaa",
            Daa => "daa",
            Sub => "sub",
            Sbb => "sbb",
            Dec => "dec",
            Neg => "neg",
            Cmp => "cmp",
            Aas => "aas",
            Das => "das",
            Mul => "mul",
            Imul => "imul",
            Aam => "aam",
            Div => "div",
            Idiv => "idiv",
            Aad => "aad",
            Cbw => "cbw",
            Cwd => "cwd",
            Not => "not",
            Shl => "shl",
            Shr => "shr",
            Sar => "sar",
            Rol => "rol",
            Ror => "ror",
            Rcl => "rcl",
            Rcr => "rcr",
            And => "and",
            Test => "test",
            Or => "or",
            Xor => "xor",
            Movs => "movs",
            Cmps => "cmps",
            Scas => "scas",
            Lods => "lods",
            Stos => "stos",
            Call => "call",
            CallFar => "call far",
            Jmp => "jmp",
            JmpFar => "jmp far",
            Ret => "ret",
            Retf => "retf",
            Je => "je",
            Jl => "jl",
            Jle => "jle",
            Jb => "jb",
            Jbe => "jbe",
            Jp => "jp",
            Jo => "jo",
            Js => "js",
            Jne => "jne",
            Jnl => "jnl",
            Jg => "jg",
            Jnb => "jnb",
            Ja => "ja",
            Jnp => "jnp",
            Jno => "jno",
            Jns => "jns",
            Loop => "loop",
            Loopz => "loopz",
            Loopnz => "loopnz",
            Jcxz => "jcxz",
            Int => "int",
            Int3 => "int3",
            Into => "into",
            Iret => "iret",
            Clc => "clc",
            Cmc => "cmc",
            Stc => "stc",
            Cld => "cld",
            Std => "std",
            Cli => "cli",
            Sti => "sti",
            Hlt => "hlt",
            Wait => "wait",
            Esc => "esc",
            Lock => "lock",
            Segment => "segment",
            Rep => "rep",
            Repne => "repne",
            Nop => "nop",
        }
    }

    /// Whether this is one of the string primitives.
    pub fn is_string(&self) -> bool {
        use self::Mnemonic::*;
        match self {
            Movs | Cmps | Scas | Lods | Stos => true,
            _ => false,
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
