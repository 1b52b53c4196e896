//! Contains visitor machinery for resolved instructions.

use cpu::imm::Immediate;
use cpu::instr::{Register, RepeatCondition, Width};
use cpu::locate::{EffectiveAddressCalculation, InstructionInfo, Operand};

/// Instruction visitor.
///
/// When overriding a method, call the corresponding `walk_*` method to keep the
/// default behaviour of descending into the object. Omit it to stop descending.
pub trait Visitor {
    /// Visit the whole instruction.
    ///
    /// This is called when a new instruction is about to be processed. By
    /// default, it calls into `walk_instr`, which will decompose the
    /// instruction into its prefixes, mnemonic and operands and call the
    /// corresponding visitor methods on those.
    fn visit_instr(&mut self, info: &InstructionInfo) { walk_instr(self, info) }
    fn visit_prefixes(&mut self, _prefixes: &[&str]) {}
    fn visit_mnemonic(&mut self, _mnemonic: &str) {}

    /// Visit the operands that are present, destination first.
    fn visit_operands(&mut self, operands: &[&Operand]) {
        for op in operands {
            walk_operand(self, op);
        }
    }

    /// Visit a register operand.
    fn visit_register(&mut self, _reg: Register) {}

    /// Visit an immediate operand.
    ///
    /// Note that, depending on the instruction, this might be an interrupt or
    /// port number instead of a numeric operand.
    fn visit_immediate(&mut self, _imm: &Immediate) {}

    /// Visit a register-indirect memory operand.
    fn visit_effective_address(&mut self, _ea: &EffectiveAddressCalculation) {}

    /// Visit a memory operand at a fixed offset.
    fn visit_direct_address(&mut self, _addr: u16) {}

    /// Visit a branch target, given relative to the next instruction.
    fn visit_relative(&mut self, _offset: i16) {}
}

/// Decomposes an `InstructionInfo` into its components and calls the
/// corresponding visitor methods.
pub fn walk_instr<V: Visitor + ?Sized>(v: &mut V, info: &InstructionInfo) {
    v.visit_prefixes(&prefixes(info));
    v.visit_mnemonic(&mnemonic(info));
    v.visit_operands(&info.operands());
}

/// Decomposes an operand into its components and calls the corresponding
/// visitor methods.
pub fn walk_operand<V: Visitor + ?Sized>(v: &mut V, op: &Operand) {
    match op {
        Operand::None => {}
        Operand::Register(reg) => v.visit_register(*reg),
        Operand::Immediate(imm) => v.visit_immediate(imm),
        Operand::EffectiveAddress(ea) => v.visit_effective_address(ea),
        Operand::DirectAddress(addr) => v.visit_direct_address(*addr),
        Operand::Relative(offset) => v.visit_relative(*offset),
    }
}

fn prefixes(info: &InstructionInfo) -> Vec<&'static str> {
    match info.repeat {
        Some(RepeatCondition::WhileZero) => vec!["rep"],
        Some(RepeatCondition::WhileNotZero) => vec!["repne"],
        None => vec![],
    }
}

/// String instructions carry their operand size in the mnemonic (`movsb`).
fn mnemonic(info: &InstructionInfo) -> String {
    let name = info.mnemonic.name();
    match info.width {
        Some(width) if info.mnemonic.is_string() => {
            let suffix = match width {
                Width::Byte => 'b',
                Width::Word => 'w',
            };
            format!("{}{}", name, suffix)
        }
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpu::instr::Mnemonic;

    #[derive(Default)]
    struct Collect {
        parts: Vec<String>,
    }

    impl Visitor for Collect {
        fn visit_prefixes(&mut self, prefixes: &[&str]) {
            self.parts.extend(prefixes.iter().map(|p| p.to_string()));
        }

        fn visit_mnemonic(&mut self, mnemonic: &str) {
            self.parts.push(mnemonic.to_string());
        }

        fn visit_register(&mut self, reg: Register) {
            self.parts.push(format!("reg {}", reg));
        }

        fn visit_immediate(&mut self, imm: &Immediate) {
            self.parts.push(format!("imm {}", imm));
        }
    }

    #[test]
    fn walk_order() {
        let info = InstructionInfo {
            mnemonic: Mnemonic::Mov,
            width: Some(Width::Byte),
            repeat: None,
            dest: Operand::Register(Register::Cl),
            src: Operand::Immediate(Immediate::Byte(0x88)),
        };
        let mut v = Collect::default();
        v.visit_instr(&info);
        assert_eq!(v.parts, ["mov", "reg cl", "imm 136"]);
    }

    #[test]
    fn string_instructions() {
        let info = InstructionInfo {
            mnemonic: Mnemonic::Cmps,
            width: Some(Width::Word),
            repeat: Some(RepeatCondition::WhileNotZero),
            dest: Operand::None,
            src: Operand::None,
        };
        let mut v = Collect::default();
        v.visit_instr(&info);
        assert_eq!(v.parts, ["repne", "cmpsw"]);
    }
}
