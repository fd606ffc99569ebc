use std::error::Error;
use std::io;
use std::sync::Arc;

use log::{debug, info};

use chip8_vm::{Chip8, Config, KeyOperand, Keypad, Quirks, ShiftSource, Status};
use display::TextDisplay;

use crate::keymap::keymap;
use crate::Cli;

fn quirks(cli: &Cli) -> Quirks {
    Quirks {
        shift: if cli.shift_vx {
            ShiftSource::Vx
        } else {
            ShiftSource::Vy
        },
        key_operand: if cli.key_register {
            KeyOperand::Register
        } else {
            KeyOperand::Nibble
        },
        stack_limit: if cli.unbounded_stack {
            None
        } else {
            Some(cli.stack_limit)
        },
    }
}

fn config(cli: &Cli) -> Config {
    let config = Config::default()
        .with_tick_rate(cli.tick_rate)
        .with_quirks(quirks(cli));
    match cli.seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    }
}

/// Rings the terminal bell each time the tone switches on
fn bell() -> impl FnMut(bool) {
    let mut sounding = false;
    move |on: bool| {
        if on && !sounding {
            debug!("Tone on");
            eprint!("\x07");
        }
        sounding = on;
    }
}

pub fn run(cli: &Cli) -> Result<Status, Box<dyn Error>> {
    let keypad = Arc::new(Keypad::new());
    for key in cli.hold.chars() {
        let code = keymap(key).ok_or_else(|| format!("no keypad key is mapped to '{}'", key))?;
        keypad.press(code);
    }

    let mut chip8 = Chip8::new(config(cli), keypad);

    // Load ROM
    let rom = std::fs::read(&cli.rom)
        .map_err(|e| format!("unable to read {}: {}", cli.rom.display(), e))?;
    chip8.load_rom(&rom)?;

    if !cli.headless {
        chip8.subscribe(TextDisplay::new(io::stdout()));
    }
    chip8.attach_tone(bell());

    let status = chip8.run(cli.max_ticks)?;
    info!("Finished with {:?}", status);
    Ok(status)
}
