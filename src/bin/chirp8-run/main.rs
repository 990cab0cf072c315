// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Chirp8: runs a chip-8 program headless, then prints the screen

use chirp8::{error::Result, *};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run on Chirp8.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,

    #[options(help = "Set the instructions-per-frame rate.", default = "10", meta = "IPF")]
    pub ipf: usize,
    #[options(help = "Number of frames to run before printing the screen.", default = "600")]
    pub frames: usize,
    #[options(help = "Set the target framerate.", default = "60", meta = "FR")]
    pub frame_rate: u64,
    #[options(help = "Don't wait between frames.")]
    pub fast: bool,

    #[options(help = "Run in (Chip8, SChip) mode.")]
    pub mode: Option<Mode>,
    #[options(
        short = "z",
        help = "Disable setting vF to 0 after a bitwise operation."
    )]
    pub vfreset: bool,
    #[options(
        short = "c",
        help = "Use CHIP-48 style DMA instructions, which don't touch I."
    )]
    pub memory: bool,
    #[options(
        short = "v",
        help = "Use CHIP-48 style bit-shifts, which don't touch vY."
    )]
    pub shift: bool,
    #[options(
        short = "b",
        help = "Use SUPER-CHIP style indexed jump, which is indexed relative to v[adr]."
    )]
    pub jumping: bool,
}

#[derive(Debug)]
struct State {
    pub ipf: usize,
    pub frames: usize,
    pub rate: Option<u64>,
    pub cpu: CPU,
    pub ft: Instant,
}

impl State {
    fn new(options: Arguments) -> Result<Self> {
        let mut cpu = CPU::new(options.mode.unwrap_or_default().into());
        // Flip the state of the quirks
        cpu.flags.quirks.bin_ops ^= options.vfreset;
        cpu.flags.quirks.dma_inc ^= options.memory;
        cpu.flags.quirks.shift ^= options.shift;
        cpu.flags.quirks.jump_vx ^= options.jumping;
        cpu.load_program(&std::fs::read(&options.file)?)?;
        log::info!("running {} with {:?}", options.file.display(), cpu.flags.quirks);
        Ok(State {
            ipf: options.ipf,
            frames: options.frames,
            rate: (!options.fast).then_some(options.frame_rate.max(1)),
            cpu,
            ft: Instant::now(),
        })
    }
    fn tick_cpu(&mut self) -> Result<()> {
        self.cpu.multistep(self.ipf)?;
        self.cpu.tick_timers();
        Ok(())
    }
    fn wait_for_next_frame(&mut self) {
        if let Some(rate) = self.rate {
            let rate = Duration::from_nanos(1_000_000_000 / rate + 1);
            std::thread::sleep(rate.saturating_sub(self.ft.elapsed()));
            self.ft += rate;
        }
    }
}

impl Iterator for State {
    type Item = Result<()>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.frames == 0 {
            return None;
        }
        self.frames -= 1;
        self.wait_for_next_frame();
        Some(self.tick_cpu())
    }
}

pub fn main() -> Result<()> {
    env_logger::init();
    let options = Arguments::parse_args_default_or_exit();
    let mut state = State::new(options)?;
    let fatal = state.by_ref().find_map(|result| result.err());
    println!("{}", state.cpu.screen().green());
    println!("{}", state.cpu.dump().bright_black());
    if state.cpu.is_paused() {
        println!("{}", "waiting for a key".yellow());
    }
    if let Some(e) = fatal {
        eprintln!("{}", e.bold().red());
        std::process::exit(1);
    }
    Ok(())
}
