// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! This crate implements a Chip-8 interpreter core: memory, the
//! fetch-decode-execute cycle, timers, keys, and the framebuffer.
//!
//! Rendering, audio, input mapping, ROM loading, and pacing belong to the
//! host. It owns a [CPU], calls [CPU::cycle] and [CPU::tick_timers] at
//! whatever rates it likes, pushes keys in with [CPU::key_down] and
//! [CPU::key_up], and reads the [Screen] back out.
//!
//! ```rust
//! # use chirp8::*;
//! let mut cpu = CPU::default();
//! cpu.load_program(&[0x60, 0x05, 0x70, 0x03, 0x00, 0xe0]).unwrap();
//! cpu.multistep(3).unwrap();
//! assert_eq!(8, cpu.v()[0]);
//! ```

pub mod cpu;
pub mod error;
pub mod screen;

pub use cpu::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        AluOp, Insn, KeyOp, MiscOp, SysOp,
    },
    mem::Mem,
    mode::Mode,
    quirks::Quirks,
    CPU,
};
pub use error::{Error, Result};
pub use screen::Screen;
