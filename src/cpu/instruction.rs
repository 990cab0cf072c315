// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains the definition of a Chip-8 [Insn]
//!
//! Decoding happens in two levels: the high nibble picks the [Insn] variant,
//! and the families which share a high nibble (`0`, `8`, `E`, `F`) carry a
//! second enum picked by the low bits.

pub mod disassembler;

use super::{Adr, Nib, Reg};
use std::fmt::Display;

/// |`00nn`| System instructions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SysOp {
    /// |`00e0`| Clear screen memory to 0s
    Cls,
    /// |`00ee`| Return from subroutine
    Ret,
}

/// |`8xyn`| ALU operations, selected by `n`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AluOp {
    /// |`8xy0`| vX = vY
    Mov,
    /// |`8xy1`| vX |= vY
    Or,
    /// |`8xy2`| vX &= vY
    And,
    /// |`8xy3`| vX ^= vY
    Xor,
    /// |`8xy4`| vX += vY, vF = carry
    Add,
    /// |`8xy5`| vX -= vY, vF = !borrow
    Sub,
    /// |`8xy6`| vX = vY >> 1, vF = shifted out bit
    Shr,
    /// |`8xy7`| vX = vY - vX, vF = !borrow
    Bsub,
    /// |`8xyE`| vX = vY << 1, vF = shifted out bit
    Shl,
}

/// |`Exnn`| Key-conditional skips
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyOp {
    /// |`Ex9E`| Skip next instruction if key vX is held
    Sek,
    /// |`ExA1`| Skip next instruction if key vX is not held
    Snek,
}

/// |`Fxnn`| Timers, keys, fonts and memory
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MiscOp {
    /// |`Fx07`| vX = DT
    GetDt,
    /// |`Fx0A`| Wait for a key, store it in vX
    WaitK,
    /// |`Fx15`| DT = vX
    SetDt,
    /// |`Fx18`| ST = vX
    SetSt,
    /// |`Fx1E`| I += vX
    AddI,
    /// |`Fx29`| I = address of the font glyph for vX
    Font,
    /// |`Fx33`| BCD convert vX into I[0..3]
    Bcd,
    /// |`Fx55`| DMA store v0..=vX to I
    DmaO,
    /// |`Fx65`| DMA load v0..=vX from I
    DmaI,
}

/// A decoded Chip-8 instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Insn {
    /// |`00nn`| See [SysOp]
    Sys(SysOp),
    /// |`1aaa`| Jumps to an absolute address
    Jmp { a: Adr },
    /// |`2aaa`| Pushes pc onto the stack, then jumps to a
    Call { a: Adr },
    /// |`3xbb`| Skips next instruction if register X == b
    Seb { x: Reg, b: u8 },
    /// |`4xbb`| Skips next instruction if register X != b
    Sneb { x: Reg, b: u8 },
    /// |`5xy0`| Skip next instruction if vX == vY
    Se { x: Reg, y: Reg },
    /// |`6xbb`| Loads immediate byte b into register vX
    Movb { x: Reg, b: u8 },
    /// |`7xbb`| Adds immediate byte b to register vX
    Addb { x: Reg, b: u8 },
    /// |`8xyn`| See [AluOp]
    Alu { op: AluOp, x: Reg, y: Reg },
    /// |`9xy0`| Skip next instruction if vX != vY
    Sne { x: Reg, y: Reg },
    /// |`Aaaa`| Load address #a into register I
    MovI { a: Adr },
    /// |`Baaa`| Jump to &adr + v0
    Jmpr { a: Adr },
    /// |`Cxbb`| Stores a random number & the provided byte into vX
    Rand { x: Reg, b: u8 },
    /// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
    Draw { x: Reg, y: Reg, n: Nib },
    /// |`Exnn`| See [KeyOp]
    Key { op: KeyOp, x: Reg },
    /// |`Fxnn`| See [MiscOp]
    Misc { op: MiscOp, x: Reg },
}

impl Insn {
    /// Decodes a big-endian instruction word, or returns [None] if it isn't one
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// assert_eq!(Some(Insn::Jmp { a: 0x2a0 }), Insn::decode(0x12a0));
    /// assert_eq!(None, Insn::decode(0x5121));
    /// ```
    pub fn decode(word: u16) -> Option<Insn> {
        let (x, y, n) = (
            (word >> 8 & 0xf) as Reg,
            (word >> 4 & 0xf) as Reg,
            (word & 0xf) as Nib,
        );
        let (b, a) = ((word & 0xff) as u8, word & 0xfff);
        Some(match word >> 12 {
            0x0 => Insn::Sys(match word {
                0x00e0 => SysOp::Cls,
                0x00ee => SysOp::Ret,
                _ => return None,
            }),
            0x1 => Insn::Jmp { a },
            0x2 => Insn::Call { a },
            0x3 => Insn::Seb { x, b },
            0x4 => Insn::Sneb { x, b },
            0x5 if n == 0 => Insn::Se { x, y },
            0x6 => Insn::Movb { x, b },
            0x7 => Insn::Addb { x, b },
            0x8 => Insn::Alu {
                op: match n {
                    0x0 => AluOp::Mov,
                    0x1 => AluOp::Or,
                    0x2 => AluOp::And,
                    0x3 => AluOp::Xor,
                    0x4 => AluOp::Add,
                    0x5 => AluOp::Sub,
                    0x6 => AluOp::Shr,
                    0x7 => AluOp::Bsub,
                    0xe => AluOp::Shl,
                    _ => return None,
                },
                x,
                y,
            },
            0x9 if n == 0 => Insn::Sne { x, y },
            0xa => Insn::MovI { a },
            0xb => Insn::Jmpr { a },
            0xc => Insn::Rand { x, b },
            0xd => Insn::Draw { x, y, n },
            0xe => Insn::Key {
                op: match b {
                    0x9e => KeyOp::Sek,
                    0xa1 => KeyOp::Snek,
                    _ => return None,
                },
                x,
            },
            0xf => Insn::Misc {
                op: match b {
                    0x07 => MiscOp::GetDt,
                    0x0a => MiscOp::WaitK,
                    0x15 => MiscOp::SetDt,
                    0x18 => MiscOp::SetSt,
                    0x1e => MiscOp::AddI,
                    0x29 => MiscOp::Font,
                    0x33 => MiscOp::Bcd,
                    0x55 => MiscOp::DmaO,
                    0x65 => MiscOp::DmaI,
                    _ => return None,
                },
                x,
            },
            _ => return None,
        })
    }
}

impl Display for Insn {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Insn::Sys(SysOp::Cls)              => write!(f, "cls    "),
            Insn::Sys(SysOp::Ret)              => write!(f, "ret    "),
            Insn::Jmp { a }                    => write!(f, "jmp    {a:03x}"),
            Insn::Call { a }                   => write!(f, "call   {a:03x}"),
            Insn::Seb { x, b }                 => write!(f, "se     #{b:02x}, v{x:X}"),
            Insn::Sneb { x, b }                => write!(f, "sne    #{b:02x}, v{x:X}"),
            Insn::Se { x, y }                  => write!(f, "se     v{y:X}, v{x:X}"),
            Insn::Movb { x, b }                => write!(f, "mov    #{b:02x}, v{x:X}"),
            Insn::Addb { x, b }                => write!(f, "add    #{b:02x}, v{x:X}"),
            Insn::Alu { op, x, y } => match op {
                AluOp::Mov                     => write!(f, "mov    v{y:X}, v{x:X}"),
                AluOp::Or                      => write!(f, "or     v{y:X}, v{x:X}"),
                AluOp::And                     => write!(f, "and    v{y:X}, v{x:X}"),
                AluOp::Xor                     => write!(f, "xor    v{y:X}, v{x:X}"),
                AluOp::Add                     => write!(f, "add    v{y:X}, v{x:X}"),
                AluOp::Sub                     => write!(f, "sub    v{y:X}, v{x:X}"),
                AluOp::Shr                     => write!(f, "shr    v{y:X}, v{x:X}"),
                AluOp::Bsub                    => write!(f, "bsub   v{y:X}, v{x:X}"),
                AluOp::Shl                     => write!(f, "shl    v{y:X}, v{x:X}"),
            },
            Insn::Sne { x, y }                 => write!(f, "sne    v{y:X}, v{x:X}"),
            Insn::MovI { a }                   => write!(f, "mov    ${a:03x}, I"),
            Insn::Jmpr { a }                   => write!(f, "jmp    ${a:03x}+v0"),
            Insn::Rand { x, b }                => write!(f, "rand   #{b:02x}, v{x:X}"),
            Insn::Draw { x, y, n }             => write!(f, "draw   #{n:x}, v{x:X}, v{y:X}"),
            Insn::Key { op: KeyOp::Sek, x }    => write!(f, "sek    v{x:X}"),
            Insn::Key { op: KeyOp::Snek, x }   => write!(f, "snek   v{x:X}"),
            Insn::Misc { op, x } => match op {
                MiscOp::GetDt                  => write!(f, "mov    DT, v{x:X}"),
                MiscOp::WaitK                  => write!(f, "waitk  v{x:X}"),
                MiscOp::SetDt                  => write!(f, "mov    v{x:X}, DT"),
                MiscOp::SetSt                  => write!(f, "mov    v{x:X}, ST"),
                MiscOp::AddI                   => write!(f, "add    v{x:X}, I"),
                MiscOp::Font                   => write!(f, "font   v{x:X}, I"),
                MiscOp::Bcd                    => write!(f, "bcd    v{x:X}, &I"),
                MiscOp::DmaO                   => write!(f, "dmao   v{x:X}"),
                MiscOp::DmaI                   => write!(f, "dmai   v{x:X}"),
            },
        }
    }
}
