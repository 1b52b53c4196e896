//! 8086 instruction decoding and operand resolution.

mod fields;
mod prefix;
mod state;
pub mod decode;
pub mod disasm;
pub mod encode;
pub mod imm;
pub mod instr;
pub mod locate;
pub mod opcode;
pub mod visit;

pub use self::decode::{decode, Decoded, Decoder, DecoderError};
pub use self::locate::{resolve, InstructionInfo, LocatorError, Operand};
pub use self::prefix::Prefixes;
pub use self::state::Registers;
