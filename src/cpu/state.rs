//! 8086 register snapshot.

use cpu::instr::Register;

/// Snapshot of the eight general purpose registers.
///
/// Operand resolution borrows this immutably; whoever executes instructions
/// owns it and updates it between instructions. Segment registers, `IP` and
/// flags aren't part of the snapshot.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registers {
    ax: u16,
    bx: u16,
    cx: u16,
    dx: u16,

    sp: u16,
    bp: u16,
    si: u16,
    di: u16,
}

impl Registers {
    /// Creates a snapshot with all registers set to 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register by name.
    ///
    /// Byte registers are zero-extended. Returns `None` for segment registers,
    /// which the snapshot doesn't track.
    pub fn get(&self, reg: Register) -> Option<u16> {
        use cpu::instr::Register::*;

        Some(match reg {
            Al => self.al().into(),
            Cl => self.cl().into(),
            Dl => self.dl().into(),
            Bl => self.bl().into(),
            Ah => self.ah().into(),
            Ch => self.ch().into(),
            Dh => self.dh().into(),
            Bh => self.bh().into(),
            Ax => self.ax,
            Cx => self.cx,
            Dx => self.dx,
            Bx => self.bx,
            Sp => self.sp,
            Bp => self.bp,
            Si => self.si,
            Di => self.di,
            Es | Cs | Ss | Ds => return None,
        })
    }

    /// Writes a register by name.
    ///
    /// Writes to a byte register only change that half. Returns `false` (and
    /// does nothing) for segment registers.
    pub fn set(&mut self, reg: Register, value: u16) -> bool {
        use cpu::instr::Register::*;

        match reg {
            Al => self.set_al(value as u8),
            Cl => self.set_cl(value as u8),
            Dl => self.set_dl(value as u8),
            Bl => self.set_bl(value as u8),
            Ah => self.set_ah(value as u8),
            Ch => self.set_ch(value as u8),
            Dh => self.set_dh(value as u8),
            Bh => self.set_bh(value as u8),
            Ax => self.ax = value,
            Cx => self.cx = value,
            Dx => self.dx = value,
            Bx => self.bx = value,
            Sp => self.sp = value,
            Bp => self.bp = value,
            Si => self.si = value,
            Di => self.di = value,
            Es | Cs | Ss | Ds => return false,
        }
        true
    }
}

macro_rules! accessors {
    (
        $base:ident: [ $getter16:ident/$setter16:ident ]
    ) => {
        pub fn $getter16(&self) -> u16 { self.$base }
        pub fn $setter16(&mut self, value: u16) { self.$base = value; }
    };
    (
        $base:ident: [ $getter16:ident/$setter16:ident, $getter8h:ident/$setter8h:ident, $getter8l:ident/$setter8l:ident ]
    ) => {
        pub fn $getter16(&self) -> u16 { self.$base }
        pub fn $setter16(&mut self, value: u16) { self.$base = value; }
        pub fn $getter8h(&self) -> u8 { (self.$base >> 8) as u8 }
        pub fn $setter8h(&mut self, value: u8) { self.$base = (self.$base & 0x00FF) | (value as u16) << 8; }
        pub fn $getter8l(&self) -> u8 { self.$base as u8 }
        pub fn $setter8l(&mut self, value: u8) { self.$base = (self.$base & 0xFF00) | (value as u16); }
    };
}

impl Registers {
    accessors!(ax: [ax/set_ax, ah/set_ah, al/set_al]);
    accessors!(bx: [bx/set_bx, bh/set_bh, bl/set_bl]);
    accessors!(cx: [cx/set_cx, ch/set_ch, cl/set_cl]);
    accessors!(dx: [dx/set_dx, dh/set_dh, dl/set_dl]);
    accessors!(sp: [sp/set_sp]);
    accessors!(bp: [bp/set_bp]);
    accessors!(si: [si/set_si]);
    accessors!(di: [di/set_di]);
}
