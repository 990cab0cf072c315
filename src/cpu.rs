// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions

#[cfg(test)]
mod tests;

pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod mem;
pub mod mode;
pub mod quirks;

use self::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    mem::{Mem, PROGRAM_ADDR},
    mode::Mode,
    quirks::Quirks,
};
use crate::{
    error::{Error, Result},
    screen::Screen,
};
use std::fmt::Debug;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Maximum subroutine nesting depth
pub const STACK_DEPTH: usize = 16;

/// Represents the internal state of the CPU interpreter
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes [Quirks] and pause state.
    pub flags: Flags,
    // memory
    mem: Mem,
    screen: Screen,
    stack: Vec<Adr>,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // I/O
    keys: [bool; 16],
    /// Register to receive the next key while in keypause
    waitreg: Reg,
    // Execution data
    cycle: usize,
}

// public interface
impl CPU {
    /// Constructs a new CPU with the given [Quirks]
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let cpu = CPU::new(Mode::SChip.into());
    /// assert!(cpu.flags.quirks.shift);
    /// ```
    pub fn new(quirks: Quirks) -> Self {
        let mut cpu = CPU::default();
        cpu.flags.quirks = quirks;
        cpu
    }

    /// Loads bytes into the CPU's program space, clearing whatever was there
    ///
    /// Returns [Error::ProgramTooLarge] if the program won't fit
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program(&[0x60, 0x05]).unwrap();
    /// assert!(cpu.load_program(&[0; 0x1000]).is_err());
    /// ```
    pub fn load_program(&mut self, rom: &[u8]) -> Result<&mut Self> {
        if rom.len() > mem::MEM_SIZE - PROGRAM_ADDR {
            return Err(Error::ProgramTooLarge {
                len: rom.len(),
                max: mem::MEM_SIZE - PROGRAM_ADDR,
            });
        }
        self.mem.clear_program().load_program(rom)?;
        log::debug!("loaded {} byte program at {PROGRAM_ADDR:03x}", rom.len());
        Ok(self)
    }

    /// Presses a key, and reports whether the key's state changed.
    /// Keys outside `0..=0xF` are ignored.
    ///
    /// If the CPU is waiting for a key ([Flags::keypause]), the key is
    /// stored in the waiting register and execution resumes.
    ///
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    ///
    /// // press key `7`
    /// assert!(cpu.key_down(0x7));
    /// // press key `7` again, even though it's already pressed
    /// assert!(!cpu.key_down(0x7));
    /// // there's no key `16`
    /// assert!(!cpu.key_down(0x10));
    /// ```
    pub fn key_down(&mut self, key: usize) -> bool {
        let Some(keyref) = self.keys.get_mut(key) else {
            return false;
        };
        if *keyref {
            return false;
        }
        *keyref = true;
        if self.flags.keypause {
            self.v[self.waitreg] = key as u8;
            self.flags.keypause = false;
            log::debug!("key {key:X} -> v{:X}, resuming", self.waitreg);
        }
        true
    }

    /// Releases a key, and reports whether the key's state changed.
    /// Keys outside `0..=0xF` are ignored.
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// cpu.key_down(0x7);
    /// assert!(cpu.key_up(0x7));  // key released
    /// assert!(!cpu.key_up(0x7)); // key was not held
    /// ```
    pub fn key_up(&mut self, key: usize) -> bool {
        match self.keys.get_mut(key) {
            Some(keyref) if *keyref => {
                *keyref = false;
                true
            }
            _ => false,
        }
    }

    /// Gets the state of every key
    pub fn keys(&self) -> &[bool] {
        &self.keys
    }

    /// Sets a general purpose register in the CPU.
    /// Returns false, changing nothing, if the register doesn't exist
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// assert!(cpu.set_v(0x4, 0x41));
    /// assert!(!cpu.set_v(0x10, 0x41));
    /// assert_eq!(0x41, cpu.v()[4]);
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> bool {
        if let Some(gpr) = self.v.get_mut(reg) {
            *gpr = value;
            true
        } else {
            false
        }
    }

    /// Gets a slice of the entire general purpose registers
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the stack pointer (the number of return addresses on the stack)
    pub fn sp(&self) -> usize {
        self.stack.len()
    }

    /// Gets the return addresses on the stack, oldest first
    pub fn stack(&self) -> &[Adr] {
        &self.stack
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Returns true while the sound timer is counting down
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }

    /// Returns true while the CPU is blocked on `Fx0A`
    pub fn is_paused(&self) -> bool {
        self.flags.keypause
    }

    /// Gets the number of cycles the CPU has executed
    pub fn cycles(&self) -> usize {
        self.cycle
    }

    /// Gets the framebuffer
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Gets the CPU's memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Gets the CPU's memory, mutably
    pub fn mem_mut(&mut self) -> &mut Mem {
        &mut self.mem
    }

    /// Resets the emulator.
    ///
    /// Touches the [Flags] (pause, keypause), stack, pc, registers, timers,
    /// keys, screen, and cycle count.
    ///
    /// Does not touch [Quirks] or memory.
    pub fn reset(&mut self) {
        self.flags = Flags {
            pause: false,
            keypause: false,
            ..self.flags
        };
        self.stack.truncate(0);
        self.pc = PROGRAM_ADDR as Adr;
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        self.keys = [false; 16];
        self.waitreg = 0;
        self.screen.clear();
        self.cycle = 0;
    }

    /// Decrements the delay and sound timers, stopping at zero.
    ///
    /// Call this at 60Hz, independently of [CPU::cycle].
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// cpu.tick_timers();
    /// assert_eq!((0, 0), (cpu.delay(), cpu.sound()));
    /// ```
    pub fn tick_timers(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// Runs `steps` cycles, stopping at the first unrecoverable error.
    ///
    /// Unknown opcodes are logged by [CPU::cycle] and skipped.
    /// Timers are not ticked.
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.multistep(0x20)
    ///     .expect("The program should only have valid opcodes.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(0x20, cpu.cycles());
    /// ```
    pub fn multistep(&mut self, steps: usize) -> Result<&mut Self> {
        for _ in 0..steps {
            match self.cycle() {
                Err(e) if e.is_recoverable() => {}
                Err(e) => return Err(e),
                Ok(_) => {}
            }
        }
        Ok(self)
    }

    /// Executes a single instruction
    ///
    /// Does nothing if paused, either by the user or by `Fx0A`.
    ///
    /// Returns [Error::UnknownOpcode] if the instruction at `pc` is unknown.
    /// The pc has already moved past it, so execution may continue.
    ///
    /// Any other error leaves the CPU exactly as it was before the call.
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.cycle()
    ///     .expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycles());
    /// ```
    /// Returns [Error::UnknownOpcode] if the instruction is not implemented.
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program(&[
    ///     0xff, 0xff, // invalid!
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.cycle()
    ///     .expect_err("Should return Error::UnknownOpcode { 0xffff }");
    /// assert_eq!(0x202, cpu.pc());
    /// ```
    pub fn cycle(&mut self) -> Result<&mut Self> {
        if self.flags.is_paused() {
            return Ok(self);
        }
        let pc = self.pc;
        // fetch opcode
        let opcode = u16::from_be_bytes([
            self.mem.read(pc as usize)?,
            self.mem.read(pc as usize + 1)?,
        ]);
        log::trace!(
            "{:6} {pc:03x}: {:<36}",
            self.cycle,
            Dis::plain().once(opcode)
        );
        // advance before executing, so jumps and calls land where they say
        self.pc = pc.wrapping_add(2);
        let Some(insn) = Insn::decode(opcode) else {
            self.cycle += 1;
            log::warn!("skipping unknown opcode {opcode:04x} at {pc:03x}");
            return Err(Error::UnknownOpcode {
                word: opcode,
                addr: pc,
            });
        };
        if let Err(e) = self.execute(insn) {
            self.pc = pc;
            return Err(e);
        }
        self.cycle += 1;
        Ok(self)
    }

    /// Dumps the current state of all CPU registers, and the cycle count,
    /// at the `debug` log level
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let cpu = CPU::default();
    /// println!("{}", cpu.dump());
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 0000, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) -> String {
        let dump = format!(
            "PC: {:04x}, SP: {:04x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            self.pc,
            self.stack.len(),
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
            self.cycle,
        );
        log::debug!("\n{dump}");
        dump
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("stack", &self.stack)
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("keys", &self.keys)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU in its power-on state
    ///
    /// | value  | default | description
    /// |--------|---------|------------
    /// | font   |`0x0050` | Location of font memory.
    /// | pc     |`0x0200` | Start location.
    ///
    /// # Examples
    /// ```rust
    /// use chirp8::*;
    /// let mut cpu = CPU::default();
    /// ```
    fn default() -> Self {
        CPU {
            flags: Flags::default(),
            mem: Mem::new(),
            screen: Screen::new(),
            stack: Vec::with_capacity(STACK_DEPTH),
            pc: PROGRAM_ADDR as Adr,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            keys: [false; 16],
            waitreg: 0,
            cycle: 0,
        }
    }
}
