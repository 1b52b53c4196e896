extern crate sim86;
extern crate env_logger;
extern crate termcolor;
extern crate log;
extern crate structopt;

use sim86::cpu::Decoder;
use sim86::cpu::Registers;
use sim86::cpu::disasm::{AsmPrinter, print_instruction};
use sim86::memory::{ArrayMemory, CodeMemory};

use structopt::StructOpt;
use termcolor::{ColorChoice, Color, ColorSpec, StandardStream, WriteColor};
use std::{fs, process, u32};
use std::error::Error;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::io::{self, Write};
use std::fmt::Write as _Write;
use std::str::FromStr;
use std::num::ParseIntError;

/// Parse a number that might be hexadecimal.
fn parse_hex(src: &str) -> Result<u32, ParseIntError> {
    if src.starts_with("0x") {
        u32::from_str_radix(&src[2..], 16)
    } else {
        u32::from_str(src)
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "sim86-disasm", about = "Disassemble a flat 8086 binary")]
struct Opt {
    /// Select the tool to use for disassembly (nasm or builtin).
    #[structopt(long = "tool", parse(try_from_str))]
    tool: Option<Disassembler>,

    /// Number of bytes to disassemble (can also be a hexadecimal value
    /// starting with `0x`). Defaults to the rest of the file.
    #[structopt(long = "bytes", parse(try_from_str = "parse_hex"))]
    bytes: Option<u32>,

    /// Offset into the file to start disassembling at (can also be a
    /// hexadecimal value starting with `0x`). Defaults to 0.
    #[structopt(long = "start", parse(try_from_str = "parse_hex"))]
    start: Option<u32>,

    /// Print addresses and raw instruction bytes in front of each
    /// instruction. Without this, the output can be reassembled with `nasm`.
    #[structopt(long = "listing")]
    listing: bool,

    /// Path to the binary to disassemble.
    #[structopt(parse(from_os_str))]
    path: PathBuf,
}

#[derive(Debug, Copy, Clone)]
enum Disassembler {
    /// Netwide (dis)assembler (`ndisasm`).
    Nasm,
    /// sim86's builtin instruction decoder and printer.
    Builtin,
}

impl FromStr for Disassembler {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        Ok(match s {
            "nasm" => Disassembler::Nasm,
            "builtin" => Disassembler::Builtin,
            _ => return Err(format!("invalid disassembler: {}", s)),
        })
    }
}

const COLOR_MNEMONIC: Color = Color::Blue;
const COLOR_REGISTER: Color = Color::Red;
const COLOR_IMMEDIATE: Color = Color::Green;
const COLOR_ADDR: Color = Color::Cyan;
const COLOR_TARGET: Color = Color::Yellow;

struct TermPrinter<W: WriteColor> {
    w: W,
    /// First I/O error that occurred while printing.
    error: Option<io::Error>,
}

impl<W: WriteColor> TermPrinter<W> {
    fn new(w: W) -> Self {
        Self { w, error: None }
    }

    fn print(&mut self, color: Option<Color>, text: &str) {
        if let Err(e) = self.try_print(color, text) {
            self.error.get_or_insert(e);
        }
    }

    fn try_print(&mut self, color: Option<Color>, text: &str) -> io::Result<()> {
        self.w.set_color(ColorSpec::new().set_fg(color))?;
        write!(self.w, "{}", text)?;
        self.w.reset()
    }

    /// Returns the first error that occurred since the last call.
    fn take_error(&mut self) -> io::Result<()> {
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<W: WriteColor> AsmPrinter for TermPrinter<W> {
    fn print_mnemonic(&mut self, mnemonic: &str) {
        self.print(Some(COLOR_MNEMONIC), mnemonic);
    }

    fn print_register(&mut self, name: &str) {
        self.print(Some(COLOR_REGISTER), name);
    }

    fn print_immediate(&mut self, imm: &str) {
        self.print(Some(COLOR_IMMEDIATE), imm);
    }

    fn print_addr_or_offset(&mut self, addr: &str) {
        self.print(Some(COLOR_ADDR), addr);
    }

    fn print_jump_target(&mut self, target: &str) {
        self.print(Some(COLOR_TARGET), target);
    }

    fn print_symbols(&mut self, sym: &str) {
        self.print(None, sym);
    }

    fn done(&mut self) {
        self.print(None, "\n");
    }
}

fn builtin(opt: &Opt, mem: &ArrayMemory, start: u32, end: u32) -> Result<(), Box<Error>> {
    let mut printer = TermPrinter::new(StandardStream::stdout(ColorChoice::Auto));
    // no register state is known statically
    let regs = Registers::new();

    printer.print_symbols(&format!("; {}\n", opt.path.display()));
    printer.print_mnemonic("bits");
    printer.print_symbols(" ");
    printer.print_immediate("16");
    printer.print_symbols("\n\n");

    let mut dec = Decoder::new(mem, start);
    while dec.current_address() < end {
        let pc_before = dec.current_address();
        let decoded = match dec.decode_next() {
            Ok(decoded) => decoded,
            Err(e) => {
                printer.take_error()?;
                println!("; decoding error at {:#06X}: {}", pc_before, e);
                break;
            }
        };

        if opt.listing {
            printer.print(Some(COLOR_ADDR), &format!("{:04X}  ", pc_before));

            let mut raw = String::new();
            for addr in pc_before..decoded.next_address() {
                write!(raw, "{:02X} ", mem.load(addr)?)?;
            }
            printer.print(Some(COLOR_IMMEDIATE), &format!("{:21} ", raw));
        }

        let info = decoded.resolve(&regs)?;
        print_instruction(&decoded, &info, &mut printer);
        printer.take_error()?;
    }

    Ok(())
}

fn ndisasm(mem: &ArrayMemory, start: u32, end: u32) -> Result<(), Box<Error>> {
    let mut cmd = Command::new("ndisasm")
        .arg("-b16")
        .arg(format!("-o{:x}h", start))
        .arg("-")   // disassemble stdin
        .stdin(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = cmd.stdin.take() {
        stdin.write_all(&mem.as_slice()[start as usize..end as usize])?;
    }

    cmd.wait()?;
    Ok(())
}

fn run() -> Result<(), Box<Error>> {
    let opt = Opt::from_args();

    let contents = fs::read(&opt.path)?;
    eprintln!("opened '{}' ({} bytes)", opt.path.display(), contents.len());
    let mem = ArrayMemory::new(contents);

    let start = opt.start.unwrap_or(0);
    if start > mem.len() {
        return Err(format!("start offset {:#X} is past the end of the file", start).into());
    }
    let bytes = opt.bytes.unwrap_or(u32::MAX);
    let end = start.saturating_add(bytes).min(mem.len());

    match opt.tool.unwrap_or(Disassembler::Builtin) {
        Disassembler::Nasm => ndisasm(&mem, start, end),
        Disassembler::Builtin => builtin(&opt, &mem, start, end),
    }
}

fn main() {
    // By default, log all `info!` messages and higher
    env_logger::Builder::from_default_env()
        .filter(None, log::LevelFilter::Info)
        .init();

    match run() {
        Ok(()) => {},
        Err(e) => {
            eprintln!("exiting due to error: {}", e);
            process::exit(1);
        },
    }
}
