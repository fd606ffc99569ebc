use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::host::{FrameSink, ToneGate};
use crate::instruction::{self, Context, Effect};
use crate::keypad::KeyState;
use crate::state::{FrameBuffer, State};

/// Where the machine stands after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Ready to execute the next instruction
    Ready,
    /// The program executed `0?1N`
    Exited(u8),
    /// An instruction faulted; the state is as it was before that instruction
    Faulted(Error),
}

/// Cooperative stop flag, checked between ticks.
/// Clones share the flag, so a host can stop the loop from another thread.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the `status` the last tick left it in
///  - the injected key-state provider
///
/// Supplies interfaces for:
/// - resetting and loading roms
/// - ticking the machine, singly or from a fixed-rate loop that can be stopped
/// - subscribing displays to frame buffer flushes and gating a tone on the sound timer
pub struct Chip8 {
    state: State,
    status: Status,
    config: Config,
    keys: Arc<dyn KeyState>,
    rng: StdRng,
    displays: Vec<Box<dyn FrameSink>>,
    tone: Option<Box<dyn ToneGate>>,
    stop: StopHandle,
}

impl Chip8 {
    /// # Arguments
    /// * `config` tick rate, random seed and quirks
    /// * `keys` the keypad the host input adapter writes to
    pub fn new(config: Config, keys: Arc<dyn KeyState>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Chip8 {
            state: State::new(),
            status: Status::Ready,
            config,
            keys,
            rng,
            displays: Vec::new(),
            tone: None,
            stop: StopHandle::default(),
        }
    }

    /// Subscribe a display to every flush of the frame buffer
    pub fn subscribe<S: FrameSink + 'static>(&mut self, display: S) {
        self.displays.push(Box::new(display));
    }

    /// Attach the gate told each tick whether the sound timer is running
    pub fn attach_tone<T: ToneGate + 'static>(&mut self, tone: T) {
        self.tone = Some(Box::new(tone));
    }

    /// Reinitializes the machine, clearing any fault, and flushes the blank frame
    pub fn reset(&mut self) {
        self.state.reset();
        self.status = Status::Ready;
        info!("Reset machine");
        self.flush();
    }

    /// Load a rom at 0x200 without resetting
    ///
    /// # Arguments
    /// * `rom` the program; at most 3584 bytes
    pub fn load_rom(&mut self, rom: &[u8]) -> Result {
        self.state.load_rom(rom)?;
        info!("Loaded ROM [size: {}]", rom.len());
        Ok(())
    }

    /// Runs one fetch-decode-execute cycle and decrements the timers
    /// - a faulted machine returns its fault again without executing
    /// - an exited machine does nothing
    pub fn tick(&mut self) -> Result<Status> {
        match self.status {
            Status::Ready => {}
            Status::Faulted(err) => return Err(err),
            Status::Exited(_) => return Ok(self.status),
        }
        self.cycle().map_err(|err| {
            error!("Halting at pc {:#06X}: {}", self.state.pc, err);
            self.status = Status::Faulted(err);
            err
        })
    }

    fn cycle(&mut self) -> Result<Status> {
        let op = self.state.current_opcode()?;
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.v,
            self.state.i,
            self.state.pc
        );
        let mut ctx = Context {
            keys: self.keys.as_ref(),
            rng: &mut self.rng,
            quirks: self.config.quirks,
        };
        match instruction::execute(op, &mut self.state, &mut ctx)? {
            Effect::Continue => {}
            Effect::Redraw => self.flush(),
            Effect::Exit(code) => {
                info!("Program exited [code: {}]", code);
                self.status = Status::Exited(code);
            }
        }
        self.state.decrement_timers();
        self.gate_tone();
        Ok(self.status)
    }

    fn flush(&mut self) {
        debug!("Flushing frame to {} displays", self.displays.len());
        for display in self.displays.iter_mut() {
            display.flush(&self.state.frame_buffer);
        }
    }

    fn gate_tone(&mut self) {
        if let Some(tone) = self.tone.as_mut() {
            tone.set_tone(self.state.sound_timer > 0);
        }
    }

    /// Ticks at the configured rate until stopped, exited or faulted
    pub fn start(&mut self) -> Result<Status> {
        self.run(None)
    }

    /// Like `start`, stopping after at most `max_ticks` ticks.
    /// A stop requested before the call ends the run before its first tick;
    /// the request is consumed when the loop ends.
    pub fn run(&mut self, max_ticks: Option<u64>) -> Result<Status> {
        info!("Running at {}Hz", self.config.tick_rate);
        let result = self.paced(max_ticks);
        self.stop.clear();
        result
    }

    fn paced(&mut self, max_ticks: Option<u64>) -> Result<Status> {
        let cycle_time = self.config.tick_interval();
        let mut next_cycle = Instant::now();
        let mut ticks: u64 = 0;

        while !self.stop.is_stopped() && max_ticks.map_or(true, |max| ticks < max) {
            let status = self.tick()?;
            ticks += 1;
            if status != Status::Ready {
                break;
            }

            // Handle timing
            next_cycle += cycle_time;
            let now = Instant::now();
            if next_cycle > now {
                std::thread::sleep(next_cycle - now);
            } else {
                next_cycle = now;
            }
        }

        info!("Stopped after {} ticks", ticks);
        Ok(self.status)
    }

    /// Runs `ticks` ticks back to back, ignoring the tick rate
    pub fn step(&mut self, ticks: u64) -> Result<Status> {
        for _ in 0..ticks {
            if self.tick()? != Status::Ready {
                break;
            }
        }
        Ok(self.status)
    }

    /// Asks a running loop to stop before its next tick
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::keypad::Keypad;
    use proptest::prelude::*;

    fn chip8_with(rom: &[u8]) -> Chip8 {
        let mut chip8 = Chip8::new(Config::default().with_seed(7), Arc::new(Keypad::new()));
        chip8.load_rom(rom).unwrap();
        chip8
    }

    proptest! {
        #[test]
        fn load_immediate_sets_register(x in 0u8..16, nn in any::<u8>()) {
            let mut chip8 = chip8_with(&[0x60 | x, nn]);
            chip8.tick().unwrap();
            prop_assert_eq!(chip8.state.v[x as usize], nn);
            prop_assert_eq!(chip8.state.pc, 0x202);
        }

        #[test]
        fn add_registers_carries(x in 0u8..15, y in 0u8..15, vx in any::<u8>(), vy in any::<u8>()) {
            prop_assume!(x != y);
            let mut chip8 = chip8_with(&[0x80 | x, (y << 4) | 0x4]);
            chip8.state.v[x as usize] = vx;
            chip8.state.v[y as usize] = vy;
            chip8.tick().unwrap();
            let sum = u16::from(vx) + u16::from(vy);
            prop_assert_eq!(chip8.state.v[x as usize], (sum % 256) as u8);
            prop_assert_eq!(chip8.state.v[0xF], u8::from(sum > 255));
        }

        #[test]
        fn sub_registers_borrows(x in 0u8..15, y in 0u8..15, vx in any::<u8>(), vy in any::<u8>()) {
            prop_assume!(x != y);
            let mut chip8 = chip8_with(&[0x80 | x, (y << 4) | 0x5]);
            chip8.state.v[x as usize] = vx;
            chip8.state.v[y as usize] = vy;
            chip8.tick().unwrap();
            prop_assert_eq!(chip8.state.v[x as usize], vx.wrapping_sub(vy));
            prop_assert_eq!(chip8.state.v[0xF], u8::from(vx > vy));
        }

        #[test]
        fn random_programs_never_panic_and_faults_are_atomic(
            rom in prop::collection::vec(any::<u8>(), 2..128)
        ) {
            let mut chip8 = chip8_with(&rom);
            for _ in 0..256 {
                let before = chip8.state.clone();
                match chip8.tick() {
                    Ok(Status::Ready) => {}
                    Ok(_) => break,
                    Err(_) => {
                        prop_assert_eq!(&chip8.state, &before);
                        break;
                    }
                }
            }
        }
    }
}
