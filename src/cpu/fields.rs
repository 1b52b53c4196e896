//! Bit field accessors for 8086 instruction bytes.
//!
//! Most 8086 instructions are built from the same handful of fields, found at
//! fixed positions in the opcode byte and in the Mod-Reg-R/M byte that follows
//! it:
//!
//! ```notrust
//!  opcode byte          Mod-Reg-R/M byte
//! +-----------------+  +-----------------+
//! | X X X X X X D W |  | M M R R R r r r |
//! +-----------------+  +-----------------+
//! ```
//!
//! Some opcodes reuse the `D` position for `S` (sign extension), `V` (shift
//! count) or, on repeat prefixes, put `Z` where `W` would be. The shift
//! arithmetic lives here and nowhere else.

/// The `MOD` field (bits 7-6 of the Mod-Reg-R/M byte).
#[inline]
pub fn mod_of(byte: u8) -> u8 {
    (byte >> 6) & 0b11
}

/// The `REG` field (bits 5-3 of the Mod-Reg-R/M byte).
///
/// For identifier groups this is the opcode extension instead.
#[inline]
pub fn reg_of(byte: u8) -> u8 {
    (byte >> 3) & 0b111
}

/// The `R/M` field (bits 2-0 of the Mod-Reg-R/M byte).
#[inline]
pub fn rm_of(byte: u8) -> u8 {
    byte & 0b111
}

/// The `SR` segment register field (bits 4-3 of the Mod-Reg-R/M byte, or of
/// the opcode for segment `push`/`pop` and override prefixes).
#[inline]
pub fn sr_of(byte: u8) -> u8 {
    (byte >> 3) & 0b11
}

/// The `D` direction bit of an opcode (bit 1).
#[inline]
pub fn d_of(opcode: u8) -> bool {
    opcode & 0b10 != 0
}

/// The `W` width bit of an opcode (bit 0).
#[inline]
pub fn w_of(opcode: u8) -> bool {
    opcode & 0b01 != 0
}

/// The `S` sign extension bit of the immediate group opcodes `0x80`-`0x83`.
#[inline]
pub fn s_of(opcode: u8) -> bool {
    opcode & 0b10 != 0
}

/// The `V` shift count bit of the shift group opcodes `0xD0`-`0xD3`.
#[inline]
pub fn v_of(opcode: u8) -> bool {
    opcode & 0b10 != 0
}

/// The `Z` bit of the repeat prefixes `0xF2`/`0xF3`.
#[inline]
pub fn z_of(opcode: u8) -> bool {
    opcode & 0b01 != 0
}

/// The `W` bit of `mov reg, imm` (`0xB0`-`0xBF`), which sits at bit 3.
#[inline]
pub fn opcode_w_of(opcode: u8) -> bool {
    opcode & 0b1000 != 0
}

/// The register encoded in the low 3 bits of an opcode (`inc`/`dec`/`push`/
/// `pop` reg, `xchg ax, reg`, `mov reg, imm`).
#[inline]
pub fn opcode_reg_of(opcode: u8) -> u8 {
    opcode & 0b111
}

/// Number of displacement bytes following the Mod-Reg-R/M byte.
///
/// `MOD=00` normally has no displacement, except that `R/M=110` replaces the
/// `[bp]` form with a mandatory 16-bit direct address.
pub fn disp_len(modrm: u8) -> usize {
    match (mod_of(modrm), rm_of(modrm)) {
        (0b00, 0b110) => 2,
        (0b00, _) => 0,
        (0b01, _) => 1,
        (0b10, _) => 2,
        _ => 0,
    }
}

/// Assembles an opcode-like byte from a base and the `D`/`W` bits.
#[inline]
pub fn with_dw(base: u8, d: bool, w: bool) -> u8 {
    base | (d as u8) << 1 | w as u8
}

/// Assembles a Mod-Reg-R/M byte.
#[inline]
pub fn modrm_byte(md: u8, reg: u8, rm: u8) -> u8 {
    (md & 0b11) << 6 | (reg & 0b111) << 3 | rm & 0b111
}
