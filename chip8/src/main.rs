use std::path::PathBuf;
use std::process;

use clap::Parser;
use chip8_vm::Status;

mod keymap;
mod run;

#[derive(Parser)]
#[command(name = "chip8", about = "Runs a Chip-8 ROM in the terminal")]
pub struct Cli {
    /// Path to the ROM to run.
    rom: PathBuf,

    /// Ticks per second.
    #[arg(long, default_value_t = chip8_vm::constants::TICK_RATE)]
    tick_rate: u32,

    /// Stop after this many ticks.
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Seed for the random number opcode.
    #[arg(long)]
    seed: Option<u64>,

    /// Shift Vx in place for 8XY6 and 8XYE instead of shifting Vy into it.
    #[arg(long)]
    shift_vx: bool,

    /// Test the key held in Vx for EX9E and EXA1 instead of the key X.
    #[arg(long)]
    key_register: bool,

    /// Return addresses the call stack may hold.
    #[arg(long, default_value_t = chip8_vm::constants::DEFAULT_STACK_LIMIT)]
    stack_limit: usize,

    /// Let the call stack grow without limit.
    #[arg(long, conflicts_with = "stack_limit")]
    unbounded_stack: bool,

    /// Keys held down for the whole run, named by their keyboard layout (e.g. "qw").
    #[arg(long, default_value = "")]
    hold: String,

    /// Don't draw frames to the terminal.
    #[arg(long)]
    headless: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run::run(&cli) {
        Ok(Status::Exited(code)) => process::exit(code.into()),
        Ok(_) => {}
        Err(e) => {
            eprintln!("chip8: {}", e);
            process::exit(1);
        }
    }
}
