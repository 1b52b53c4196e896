//! An 8086 instruction decoder.
//!
//! Decoding happens in two steps:
//!
//! * [`cpu::decode`] turns the bytes of one instruction into an
//!   [`InstructionData`], which holds every field of the encoding.
//! * [`cpu::resolve`] turns that into an [`InstructionInfo`]: destination and
//!   source operands with effective addresses computed from a register
//!   snapshot.
//!
//! [`cpu::Decoder`] drives both over a whole program image, and
//! [`cpu::disasm`] prints the results in NASM syntax.
//!
//! [`cpu::decode`]: cpu/decode/fn.decode.html
//! [`cpu::resolve`]: cpu/locate/fn.resolve.html
//! [`cpu::Decoder`]: cpu/decode/struct.Decoder.html
//! [`cpu::disasm`]: cpu/disasm/index.html
//! [`InstructionData`]: cpu/instr/enum.InstructionData.html
//! [`InstructionInfo`]: cpu/locate/struct.InstructionInfo.html

#![doc(html_root_url = "https://docs.rs/sim86/0.1.0")]
#![warn(missing_debug_implementations)]

#[macro_use] extern crate bitflags;
#[macro_use] extern crate log;
#[macro_use] extern crate num_derive;
extern crate num_traits;

#[cfg(test)] #[macro_use] extern crate bitpat;

pub mod cpu;
pub mod memory;
