// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The [Mem] represents the CPU's memory
//!
//! 4KiB, laid out as:
//!
//! | range         | contents
//! |---------------|----------
//! |`0x000..0x050` | unused
//! |`0x050..0x0a0` | [FONT], 16 glyphs of 5 bytes
//! |`0x0a0..0x200` | unused
//! |`0x200..0x1000`| Program

use crate::error::{Error, Result};
use std::fmt::{Debug, Display, Formatter};

/// Total size of memory, in bytes
pub const MEM_SIZE: usize = 0x1000;
/// Where the built-in font lives
pub const FONT_ADDR: usize = 0x050;
/// Where programs are loaded, and where execution begins
pub const PROGRAM_ADDR: usize = 0x200;

/// Hexadecimal digit sprites, 0 through F. Each glyph is 4 pixels wide, 5 tall.
#[rustfmt::skip]
pub const FONT: [u8; 80] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];

/// Flat, byte-addressed memory
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mem {
    memory: Vec<u8>,
}

impl Mem {
    /// Constructs a zeroed [Mem] with the font already loaded
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mem = Mem::new();
    /// assert_eq!(0xf0, mem.read(0x50).unwrap());
    /// assert_eq!(0x00, mem.read(0x200).unwrap());
    /// ```
    pub fn new() -> Self {
        let mut mem = Mem {
            memory: vec![0; MEM_SIZE],
        };
        mem.load_fontset();
        mem
    }

    /// Reads a single byte
    ///
    /// Returns [Error::OutOfBounds] if `addr` is past the end of memory
    pub fn read(&self, addr: usize) -> Result<u8> {
        self.memory
            .get(addr)
            .copied()
            .ok_or(Error::OutOfBounds { addr })
    }

    /// Writes a single byte
    ///
    /// Returns [Error::OutOfBounds] if `addr` is past the end of memory
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut mem = Mem::new();
    /// mem.write(0x300, 0xa5).unwrap();
    /// assert_eq!(0xa5, mem.read(0x300).unwrap());
    /// assert!(mem.write(0x1000, 0xa5).is_err());
    /// ```
    pub fn write(&mut self, addr: usize, value: u8) -> Result<()> {
        let byte = self
            .memory
            .get_mut(addr)
            .ok_or(Error::OutOfBounds { addr })?;
        *byte = value;
        Ok(())
    }

    /// Gets `len` bytes starting at `addr`, or [Error::OutOfBounds]
    /// naming the first address that doesn't exist
    pub fn get(&self, addr: usize, len: usize) -> Result<&[u8]> {
        self.memory
            .get(addr..addr + len)
            .ok_or(Error::OutOfBounds {
                addr: addr.max(MEM_SIZE),
            })
    }

    /// Gets `len` mutable bytes starting at `addr`
    pub fn get_mut(&mut self, addr: usize, len: usize) -> Result<&mut [u8]> {
        self.memory
            .get_mut(addr..addr + len)
            .ok_or(Error::OutOfBounds {
                addr: addr.max(MEM_SIZE),
            })
    }

    /// Copies [FONT] into its slot at [FONT_ADDR]
    pub fn load_fontset(&mut self) -> &mut Self {
        self.memory[FONT_ADDR..FONT_ADDR + FONT.len()].copy_from_slice(&FONT);
        self
    }

    /// Copies a program into memory at [PROGRAM_ADDR]
    ///
    /// Returns [Error::ProgramTooLarge] if the program doesn't fit.
    /// Memory is left untouched on failure.
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut mem = Mem::new();
    /// mem.load_program(&[0x00, 0xe0]).unwrap();
    /// assert_eq!(0xe0, mem.read(0x201).unwrap());
    /// assert!(mem.load_program(&[0; 0xe01]).is_err());
    /// ```
    pub fn load_program(&mut self, rom: &[u8]) -> Result<&mut Self> {
        let max = MEM_SIZE - PROGRAM_ADDR;
        if rom.len() > max {
            return Err(Error::ProgramTooLarge {
                len: rom.len(),
                max,
            });
        }
        self.memory[PROGRAM_ADDR..PROGRAM_ADDR + rom.len()].copy_from_slice(rom);
        Ok(self)
    }

    /// Fills program space with zeroes
    pub fn clear_program(&mut self) -> &mut Self {
        self.memory[PROGRAM_ADDR..].fill(0);
        self
    }

    /// Gets the whole of memory as a slice
    pub fn as_slice(&self) -> &[u8] {
        &self.memory
    }
}

impl Default for Mem {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Mem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mem")
            .field("len", &self.memory.len())
            .finish_non_exhaustive()
    }
}

/// Hexdump, 16 bytes per line
impl Display for Mem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (line, chunk) in self.memory.chunks(16).enumerate() {
            write!(f, "{:03x}:", line * 16)?;
            for pair in chunk.chunks(2) {
                write!(f, " ")?;
                for byte in pair {
                    write!(f, "{byte:02x}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
