//! Re-encoding of decoded instructions.
//!
//! `encode` derives the raw bytes of an instruction back from the fields
//! stored in its [`InstructionData`]. Decoding the result yields the same
//! data again, which makes this useful for checking the opcode table and for
//! patching instructions in a program image.
//!
//! [`InstructionData`]: ../instr/enum.InstructionData.html

use cpu::fields;
use cpu::instr::*;
use cpu::opcode::{Shape, OPCODES};

/// Encodes an instruction into its raw bytes.
///
/// Returns `None` if no opcode matches the data, which can only happen for
/// hand-built values the decoder would never produce.
pub fn encode(data: &InstructionData) -> Option<Vec<u8>> {
    use cpu::instr::InstructionData as D;

    let mut out = Vec::with_capacity(data.len());

    match *data {
        D::RegMemWithReg { op, direction, width, modrm, disp } => {
            let opcode = find(|opcode, shape| {
                shape == Shape::RegMemWithReg(op) && match op {
                    // D and W are implied
                    Mnemonic::Lea | Mnemonic::Lds | Mnemonic::Les => true,
                    _ => fields::d_of(opcode) == direction.bit() && fields::w_of(opcode) == width.bit(),
                }
            })?;
            out.push(opcode);
            push_modrm(&mut out, modrm, disp);
        }
        D::ImmToReg { width, reg, data } => {
            if reg > 0b111 {
                return None;
            }
            out.push(0xB0 | (width.bit() as u8) << 3 | reg);
            push_data(&mut out, data);
        }
        D::ImmToRegMem { width, modrm, disp, data } => {
            out.push(fields::with_dw(0xC6, false, width.bit()));
            push_modrm(&mut out, modrm, disp);
            push_data(&mut out, data);
        }
        D::AccImm { op, width, data } => {
            let opcode = find(|opcode, shape| {
                shape == Shape::AccImm(op) && fields::w_of(opcode) == width.bit()
            })?;
            out.push(opcode);
            push_data(&mut out, data);
        }
        D::AccMem { direction, width, addr } => {
            out.push(fields::with_dw(0xA0, !direction.bit(), width.bit()));
            push_word(&mut out, addr);
        }
        D::SegRegMove { direction, sr, modrm, disp } => {
            out.push(fields::with_dw(0x8C, direction.bit(), false));
            push_modrm(&mut out, ModRm { reg: sr as u8, ..modrm }, disp);
        }
        D::Arithmetic { op, sign_extend, width, modrm, disp, data } => {
            out.push(fields::with_dw(0x80, sign_extend, width.bit()));
            push_modrm(&mut out, ModRm { reg: op as u8, ..modrm }, disp);
            push_data(&mut out, data);
        }
        D::Shift { op, count, width, modrm, disp } => {
            out.push(fields::with_dw(0xD0, count.bit(), width.bit()));
            push_modrm(&mut out, ModRm { reg: op as u8, ..modrm }, disp);
        }
        D::Unary { op, width, modrm, disp, data } => {
            out.push(fields::with_dw(0xF6, false, width.bit()));
            push_modrm(&mut out, ModRm { reg: op as u8, ..modrm }, disp);
            if let Some(data) = data {
                push_data(&mut out, data);
            }
        }
        D::RegMem { op, width, modrm, disp } => {
            let (opcode, ext) = match (op, width) {
                (Mnemonic::Pop, Width::Word) => (0x8F, 0),
                (Mnemonic::Inc, Width::Byte) => (0xFE, 0),
                (Mnemonic::Dec, Width::Byte) => (0xFE, 1),
                (Mnemonic::Inc, Width::Word) => (0xFF, 0),
                (Mnemonic::Dec, Width::Word) => (0xFF, 1),
                (Mnemonic::Call, Width::Word) => (0xFF, 2),
                (Mnemonic::CallFar, Width::Word) => (0xFF, 3),
                (Mnemonic::Jmp, Width::Word) => (0xFF, 4),
                (Mnemonic::JmpFar, Width::Word) => (0xFF, 5),
                (Mnemonic::Push, Width::Word) => (0xFF, 6),
                _ => return None,
            };
            out.push(opcode);
            push_modrm(&mut out, ModRm { reg: ext, ..modrm }, disp);
        }
        D::Reg { op, reg } => {
            if reg > 0b111 {
                return None;
            }
            // `xchg ax, ax` is `nop`, so the row starts one slot in
            let first = find(|_, shape| shape == Shape::Reg(op))?;
            out.push((first & !0b111) | reg);
        }
        D::SegReg { op, sr } => {
            let opcode = find(|opcode, shape| {
                shape == Shape::SegReg(op) && fields::sr_of(opcode) == sr as u8
            })?;
            out.push(opcode);
        }
        D::ShortJump { op, offset } => {
            out.push(find(|_, shape| shape == Shape::ShortJump(op))?);
            out.push(offset as u8);
        }
        D::NearJump { op, offset } => {
            out.push(find(|_, shape| shape == Shape::NearJump(op))?);
            push_word(&mut out, offset as u16);
        }
        D::Immediate { op, data } => {
            out.push(find(|_, shape| match shape {
                Shape::Immediate(m, width) => m == op && width == data_width(data),
                _ => false,
            })?);
            push_data(&mut out, data);
        }
        D::Port { op, width, port } => {
            let opcode = find(|opcode, shape| {
                let shape_matches = match port {
                    Port::Fixed(_) => shape == Shape::PortFixed(op),
                    Port::Dx => shape == Shape::PortDx(op),
                };
                shape_matches && fields::w_of(opcode) == width.bit()
            })?;
            out.push(opcode);
            if let Port::Fixed(port) = port {
                out.push(port);
            }
        }
        D::Single { op } => {
            out.push(find(|_, shape| shape == Shape::Single(op))?);
        }
        D::String { repeat, op, width } => {
            if let Some(repeat) = repeat {
                out.push(0xF2 | repeat.bit() as u8);
            }
            out.push(find(|opcode, shape| {
                shape == Shape::StringOp(op) && fields::w_of(opcode) == width.bit()
            })?);
        }
        D::Prefix(Prefix::Repeat(repeat)) => {
            out.push(0xF2 | repeat.bit() as u8);
        }
        D::Prefix(prefix) => {
            out.push(find(|_, shape| shape == Shape::Prefix(prefix))?);
        }
        D::Escape { code, modrm, disp } => {
            if code > 0b111_111 {
                return None;
            }
            out.push(0xD8 | code >> 3);
            push_modrm(&mut out, ModRm { reg: code & 0b111, ..modrm }, disp);
        }
    }

    Some(out)
}

/// Finds the first opcode whose table entry satisfies `pred`.
fn find<F>(pred: F) -> Option<u8>
    where F: Fn(u8, Shape) -> bool {
    OPCODES.iter()
        .enumerate()
        .find(|&(opcode, &shape)| pred(opcode as u8, shape))
        .map(|(opcode, _)| opcode as u8)
}

fn data_width(data: Data) -> Width {
    match data {
        Data::Byte(_) => Width::Byte,
        Data::Word(_) => Width::Word,
    }
}

fn push_word(out: &mut Vec<u8>, word: u16) {
    out.push(word as u8);
    out.push((word >> 8) as u8);
}

fn push_data(out: &mut Vec<u8>, data: Data) {
    match data {
        Data::Byte(b) => out.push(b),
        Data::Word(w) => push_word(out, w),
    }
}

fn push_modrm(out: &mut Vec<u8>, modrm: ModRm, disp: Displacement) {
    out.push(modrm.to_byte());
    match disp {
        Displacement::None => {}
        Displacement::Byte(b) => out.push(b),
        Displacement::Word(w) => push_word(out, w),
    }
}
