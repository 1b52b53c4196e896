//! Byte sources for the instruction decoder.
//!
//! The decoder itself only ever looks at a 6-byte window starting at the
//! opcode, since no 8086 instruction (without prefixes) is longer than that.
//! `CodeMemory` is the boundary through which windows are fetched; the
//! emulator's memory or a prefetch queue implement it, and `ArrayMemory`
//! covers flat program images.

use std::error::Error;
use std::fmt;

/// Maximum length of an 8086 instruction, not counting prefix bytes.
pub const WINDOW_LEN: usize = 6;

/// A lookahead window of instruction bytes, starting at the opcode.
pub type Window = [u8; WINDOW_LEN];

pub trait CodeMemory {
    /// Number of addressable bytes.
    fn len(&self) -> u32;

    /// Loads the byte at `addr`.
    fn load(&self, addr: u32) -> Result<u8, MemoryError>;

    /// Loads the lookahead window starting at `addr`.
    ///
    /// Bytes past the end of memory read as 0. The decoder reports a
    /// [`MemoryError`] itself if an instruction actually extends past the end.
    ///
    /// [`MemoryError`]: struct.MemoryError.html
    fn window(&self, addr: u32) -> Result<Window, MemoryError> {
        let mut window = [0; WINDOW_LEN];
        window[0] = self.load(addr)?;
        for (i, byte) in window.iter_mut().enumerate().skip(1) {
            match addr.checked_add(i as u32) {
                Some(a) if a < self.len() => *byte = self.load(a)?,
                _ => break,
            }
        }
        Ok(window)
    }
}

/// A static, contiguous memory that stores everything in a `Vec`.
///
/// Addresses are offsets into the program image.
#[derive(Debug)]
pub struct ArrayMemory {
    mem: Vec<u8>,
}

impl ArrayMemory {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            mem: data
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.mem
    }
}

impl CodeMemory for ArrayMemory {
    fn len(&self) -> u32 {
        self.mem.len() as u32
    }

    fn load(&self, addr: u32) -> Result<u8, MemoryError> {
        self.mem.get(addr as usize).cloned().ok_or(MemoryError { addr })
    }
}

/// An access outside of the available memory.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MemoryError {
    /// The first address that couldn't be read.
    pub addr: u32,
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "memory access error at {:#06X}", self.addr)
    }
}

impl Error for MemoryError {}
