use chirp8::{error::Result, *};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{fs::read, path::PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Show help text")]
    help: bool,
    #[options(help = "Load a ROM to disassemble", free, required)]
    pub file: PathBuf,
    #[options(help = "Start disassembling at offset...")]
    pub offset: usize,
    #[options(help = "Don't color the output")]
    pub plain: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let options = Arguments::parse_args_default_or_exit();
    let contents = &read(&options.file)?;
    let disassembler = if options.plain {
        Dis::plain()
    } else {
        Dis::default()
    };
    let start = options.offset.min(contents.len());
    for (addr, insn) in contents[start..].chunks_exact(2).enumerate() {
        let insn = u16::from_be_bytes([insn[0], insn[1]]);
        let addr = 2 * addr + 0x200 + start;
        if options.plain {
            println!("{addr:03x}: {:<36} {insn:04x}", disassembler.once(insn));
        } else {
            println!(
                "{addr:03x}: {} {:04x}",
                disassembler.once(insn),
                insn.bright_black(),
            );
        }
    }
    Ok(())
}
