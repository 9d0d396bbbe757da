//! `uxn-cli`: a minimal line-mode host for the Uxn emulator. Loads a ROM
//! named on the command line, runs it, then feeds stdin to the console
//! one line at a time until stdin closes.

use std::io::BufRead;
use std::process::ExitCode;

use uxn_machine::Emulator;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let rom_path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: uxn-cli <rom-file>");
            return ExitCode::FAILURE;
        }
    };

    let mut emu = Emulator::new();
    if let Err(e) = emu.load_file(&rom_path) {
        eprintln!("uxn-cli: {rom_path}: {e}");
        return ExitCode::FAILURE;
    }

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        emu.on_line(&line);
    }
    emu.inject(0x00, uxn_core::console::InputKind::End);

    ExitCode::SUCCESS
}
