//! Instruction disassembler and pretty printer.
//!
//! Output uses NASM syntax, so a listing of a whole program can be fed back
//! into `nasm` to reassemble it.

use cpu::decode::Decoded;
use cpu::imm::Immediate;
use cpu::instr::*;
use cpu::locate::{EffectiveAddressCalculation, InstructionInfo, Operand};
use cpu::visit::{self, Visitor};

/// Trait for assembly printing contexts.
///
/// This can be implemented to color specific parts of an instruction.
pub trait AsmPrinter {
    /// Print an instruction mnemonic/name.
    fn print_mnemonic(&mut self, mnemonic: &str);

    /// Prints a register operand (or part of an operand).
    fn print_register(&mut self, name: &str);

    /// Prints an immediate operand.
    fn print_immediate(&mut self, imm: &str);

    /// Prints an address or an address offset of an operand.
    fn print_addr_or_offset(&mut self, addr: &str);

    /// Prints a jump or call target.
    fn print_jump_target(&mut self, target: &str);

    /// Print a string of symbol characters like `&,[]+ `.
    fn print_symbols(&mut self, sym: &str);

    /// Called when the instruction is fully printed.
    fn done(&mut self);
}

/// Prints the instruction to a string, without formatting.
impl AsmPrinter for String {
    fn print_mnemonic(&mut self, mnemonic: &str) {
        self.push_str(mnemonic);
    }

    fn print_register(&mut self, name: &str) {
        self.push_str(name);
    }

    fn print_immediate(&mut self, imm: &str) {
        self.push_str(imm);
    }

    fn print_addr_or_offset(&mut self, addr: &str) {
        self.push_str(addr);
    }

    fn print_jump_target(&mut self, target: &str) {
        self.push_str(target);
    }

    fn print_symbols(&mut self, sym: &str) {
        self.push_str(sym);
    }

    fn done(&mut self) {}
}

/// Extension trait for internal use by the disassembly printer.
trait PrinterExt {
    fn space(&mut self);
    fn with_indirect<F>(&mut self, segment: Option<SegmentRegister>, f: F)
        where F: FnOnce(&mut Self);
}

impl<P: AsmPrinter> PrinterExt for P {
    fn space(&mut self) {
        self.print_symbols(" ");
    }

    fn with_indirect<F>(&mut self, segment: Option<SegmentRegister>, f: F)
        where F: FnOnce(&mut Self) {
        self.print_symbols("[");
        if let Some(segment) = segment {
            self.print_register(segment.name());
            self.print_symbols(":");
        }
        f(self);
        self.print_symbols("]");
    }
}

struct Disassembler<'a, A: AsmPrinter + 'a> {
    printer: &'a mut A,
    /// Length of the instruction including prefixes, for `$`-relative
    /// branch targets.
    len: u32,
    segment: Option<SegmentRegister>,
    /// Segment override printed as a prefix, for instructions without a
    /// memory operand to attach it to.
    prefix_segment: Option<SegmentRegister>,
    lock: bool,
    /// Operand size keyword to print before the memory operand, if the
    /// operands don't imply it.
    size: Option<Width>,
}

impl<'a, A: AsmPrinter> Visitor for Disassembler<'a, A> {
    fn visit_instr(&mut self, info: &InstructionInfo) {
        use cpu::instr::Mnemonic as M;

        let implies_size = match info.mnemonic {
            // the count never implies the size of the shifted operand
            M::Shl | M::Shr | M::Sar | M::Rol | M::Ror | M::Rcl | M::Rcr => false,
            // far pointers have a fixed size
            M::CallFar | M::JmpFar | M::Esc => true,
            _ => info.operands().iter().any(|op| match op {
                Operand::Register(_) => true,
                _ => false,
            }),
        };
        self.size = if implies_size { None } else { info.width };
        self.prefix_segment = if info.operands().iter().any(|op| op.is_memory()) {
            None
        } else {
            self.segment
        };

        visit::walk_instr(self, info);
        self.printer.done();
    }

    fn visit_prefixes(&mut self, prefixes: &[&str]) {
        if self.lock {
            self.printer.print_mnemonic("lock");
            self.printer.space();
        }
        for prefix in prefixes {
            self.printer.print_mnemonic(prefix);
            self.printer.space();
        }
        if let Some(segment) = self.prefix_segment {
            self.printer.print_register(segment.name());
            self.printer.space();
        }
    }

    fn visit_mnemonic(&mut self, mnemonic: &str) {
        self.printer.print_mnemonic(mnemonic);
    }

    fn visit_operands(&mut self, operands: &[&Operand]) {
        for (i, op) in operands.iter().enumerate() {
            self.printer.print_symbols(if i == 0 { " " } else { ", " });

            if op.is_memory() {
                if let Some(size) = self.size.take() {
                    self.printer.print_immediate(size.name());
                    self.printer.space();
                }
            }

            visit::walk_operand(self, op);
        }
    }

    fn visit_register(&mut self, reg: Register) {
        self.printer.print_register(reg.name());
    }

    fn visit_immediate(&mut self, imm: &Immediate) {
        self.printer.print_immediate(&imm.to_string());
    }

    fn visit_effective_address(&mut self, ea: &EffectiveAddressCalculation) {
        self.printer.with_indirect(self.segment, |p| {
            let mut first = true;
            for reg in ea.base.iter().chain(ea.index.iter()) {
                if !first {
                    p.print_symbols(" + ");
                }
                p.print_register(reg.name());
                first = false;
            }

            match ea.signed_displacement() {
                Some(disp) if disp != 0 => {
                    p.print_symbols(if disp > 0 { " + " } else { " - " });
                    p.print_addr_or_offset(&(disp as i32).abs().to_string());
                }
                _ => {}
            }
        });
    }

    fn visit_direct_address(&mut self, addr: u16) {
        self.printer.with_indirect(self.segment, |p| {
            p.print_addr_or_offset(&addr.to_string());
        });
    }

    fn visit_relative(&mut self, offset: i16) {
        // `$` is the start of the instruction, the CPU adds the offset to the
        // address of the next one
        self.printer.print_jump_target(&format!("$+{}{:+}", self.len, offset));
    }
}

/// Prints a decoded instruction in NASM syntax.
///
/// `info` is the result of resolving `decoded`. Prefixes and the instruction
/// length are taken from `decoded`.
pub fn print_instruction<P: AsmPrinter>(decoded: &Decoded, info: &InstructionInfo, p: &mut P) {
    Disassembler {
        printer: p,
        len: decoded.len,
        segment: decoded.segment_override(),
        prefix_segment: None,
        lock: decoded.is_locked(),
        size: None,
    }.visit_instr(info);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpu::decode::Decoder;
    use cpu::state::Registers;
    use memory::ArrayMemory;

    fn disassemble(rawstr: &str) -> Vec<String> {
        let raw: Vec<u8> = rawstr.split_whitespace()
            .map(|hexstr| u8::from_str_radix(hexstr, 16).unwrap())
            .collect();
        let mem = ArrayMemory::new(raw);
        let regs = Registers::new();
        let mut dec = Decoder::new(&mem, 0);
        let mut lines = Vec::new();
        while !dec.is_at_end() {
            let decoded = dec.decode_next().unwrap();
            let info = decoded.resolve(&regs).unwrap();
            let mut s = String::new();
            print_instruction(&decoded, &info, &mut s);
            lines.push(s);
        }
        lines
    }

    #[test]
    fn registers_and_memory() {
        assert_eq!(disassemble("89 D9 88 E5 8B 1E 55 01 8A 00 8B 56 00 8A 60 04 8A 80 87 13"), [
            "mov cx, bx",
            "mov ch, ah",
            "mov bx, [341]",
            "mov al, [bx + si]",
            "mov dx, [bp]",
            "mov ah, [bx + si + 4]",
            "mov al, [bx + si + 4999]",
        ]);
        assert_eq!(disassemble("8B 41 DB 89 8C D4 FE 8B 57 E0"), [
            "mov ax, [bx + di - 37]",
            "mov [si - 300], cx",
            "mov dx, [bx - 32]",
        ]);
    }

    #[test]
    fn immediates() {
        assert_eq!(disassemble("B1 0C B5 F4 B9 0C 00 BA 6C 0F"), [
            "mov cl, 12",
            "mov ch, 244",
            "mov cx, 12",
            "mov dx, 3948",
        ]);
        assert_eq!(disassemble("C6 03 07 C7 85 85 03 5B 01 83 82 04 3D 0C"), [
            "mov byte [bp + di], 7",
            "mov word [di + 901], 347",
            "add word [bp + si + 15620], 12",
        ]);
        assert_eq!(disassemble("A1 FB 09 A3 0F 00 04 09"), [
            "mov ax, [2555]",
            "mov [15], ax",
            "add al, 9",
        ]);
    }

    #[test]
    fn groups() {
        assert_eq!(disassemble("D0 E4 D3 2F F6 1F F7 F3 FE 06 E8 03 FF 36 34 12"), [
            "shl ah, 1",
            "shr word [bx], cl",
            "neg byte [bx]",
            "div bx",
            "inc byte [1000]",
            "push word [4660]",
        ]);
        assert_eq!(disassemble("FF 1F FF 67 02"), [
            "call far [bx]",
            "jmp word [bx + 2]",
        ]);
    }

    #[test]
    fn prefixes() {
        assert_eq!(disassemble("F3 A4 F2 AF 26 8B 07 F0 86 04 2E A1 10 00"), [
            "rep movsb",
            "repne scasw",
            "mov ax, [es:bx]",
            "lock xchg al, [si]",
            "mov ax, [cs:16]",
        ]);
        assert_eq!(disassemble("F3 26 A4 26 F3 A4 F2 3E AE 26 AC"), [
            "rep es movsb",
            "rep es movsb",
            "repne ds scasb",
            "es lodsb",
        ]);
    }

    #[test]
    fn control_flow() {
        assert_eq!(disassemble("75 FC E2 FE E8 00 01 C3 C2 04 00 CD 21 CC"), [
            "jne $+2-4",
            "loop $+2-2",
            "call $+3+256",
            "ret",
            "ret 4",
            "int 33",
            "int3",
        ]);
    }

    #[test]
    fn misc() {
        assert_eq!(disassemble("E4 C8 EF 1E 8E D8 D4 0A D5 07 90 93 8D 81 8C 00"), [
            "in al, 200",
            "out dx, ax",
            "push ds",
            "mov ds, ax",
            "aam",
            "aad 7",
            "nop",
            "xchg ax, bx",
            "lea ax, [bx + di + 140]",
        ]);
    }
}
