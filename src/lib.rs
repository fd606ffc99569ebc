pub use chip8::{Chip8, Status, StopHandle};
pub use config::{Config, KeyOperand, Quirks, ShiftSource};
pub use error::{Error, Result};
pub use host::{FrameSink, ToneGate};
pub use keypad::{KeyState, Keypad};
pub use state::{FrameBuffer, State};

mod chip8;
pub mod config;
pub mod constants;
mod error;
mod host;
pub mod instruction;
mod keypad;
mod opcode;
mod operations;
pub mod state;
