extern crate sim86;
extern crate termcolor;

use sim86::cpu::{decode, DecoderError};
use sim86::cpu::opcode;

use termcolor::{ColorChoice, Color, ColorSpec, StandardStream, WriteColor};
use std::io::{self, Write};

/// Second bytes tried for each opcode. Covers every `MOD` value and all
/// opcode extensions, and ends with a string opcode for the repeat prefixes.
const MODRM_PROBES: [u8; 12] = [0x06, 0x46, 0x86, 0xC0, 0xC8, 0xD0, 0xD8, 0xE0, 0xE8, 0xF0, 0xF8, 0xA4];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Status {
    /// Every probe decodes.
    Implemented,
    /// Some opcode extensions are invalid.
    Partial,
    NotYetImplemented,
}

fn status(opcode: u8) -> Status {
    let mut ok = 0;
    for &modrm in MODRM_PROBES.iter() {
        let window = [opcode, modrm, 0x00, 0x00, 0x00, 0x00];
        match decode(opcode, &window) {
            Ok(_) => ok += 1,
            Err(DecoderError::NotYetImplemented(_)) => return Status::NotYetImplemented,
            Err(_) => {}
        }
    }

    if !opcode::lookup(opcode).has_modrm() && ok > 0 {
        // the probes only vary bytes the instruction doesn't look at
        Status::Implemented
    } else if ok == MODRM_PROBES.len() {
        Status::Implemented
    } else {
        Status::Partial
    }
}

fn main() -> io::Result<()> {
    let mut out = StandardStream::stdout(ColorChoice::Auto);

    write!(out, "Single-byte opcodes implemented:")?;
    let mut impl_count = 0;
    let mut partial_count = 0;
    for byte in 0x00..=0xffu8 {
        if byte % 16 == 0 {
            writeln!(out)?;
        }

        let color = match status(byte) {
            Status::Implemented => {
                impl_count += 1;
                Color::Green
            }
            Status::Partial => {
                partial_count += 1;
                Color::Yellow
            }
            Status::NotYetImplemented => Color::Red,
        };

        out.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(out, " {:#04X}", byte)?;
        out.set_color(ColorSpec::new().set_fg(None))?;
    }

    writeln!(out)?;
    writeln!(out)?;
    let pct = (impl_count + partial_count) as f32 / 256.0 * 100.0;
    writeln!(out, "{}/256 opcodes implemented ({:.0}%), {} of them with invalid extensions (yellow)",
             impl_count + partial_count, pct, partial_count)?;
    Ok(())
}
