use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;

use crate::constants::KEY_COUNT;

/// Read access to the hex keypad.
///
/// Implementations are written by the host's input adapter while the interpreter
/// reads them, so a read must never observe a half-written update.
pub trait KeyState: Send + Sync {
    /// Whether `key` (0x0..=0xF) is held down; unknown keys read as released
    fn is_pressed(&self, key: u8) -> bool;
}

/// # Keypad
/// Pressed status of the 16 keys 0..F, one atomic flag per key so a host input
/// thread can write while the interpreter reads.
#[derive(Debug, Default)]
pub struct Keypad {
    keys: [AtomicBool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, key: u8) {
        self.set(key, true);
    }

    pub fn release(&self, key: u8) {
        self.set(key, false);
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the key code, 0x0..=0xF
    /// * `pressed` whether the key is held down
    pub fn set(&self, key: u8, pressed: bool) {
        match self.keys.get(key as usize) {
            Some(flag) => flag.store(pressed, Ordering::Release),
            None => warn!("ignoring key code {:#04X} outside of the keypad", key),
        }
    }
}

impl KeyState for Keypad {
    fn is_pressed(&self, key: u8) -> bool {
        self.keys
            .get(key as usize)
            .map_or(false, |flag| flag.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_press_and_release() {
        let keypad = Keypad::new();
        keypad.press(0xE);
        assert!(keypad.is_pressed(0xE));
        assert!(!keypad.is_pressed(0xD));
        keypad.release(0xE);
        assert!(!keypad.is_pressed(0xE));
    }

    #[test]
    fn test_unknown_keys_read_released() {
        let keypad = Keypad::new();
        keypad.press(0x10);
        assert!(!keypad.is_pressed(0x10));
    }

    #[test]
    fn test_written_from_another_thread() {
        let keypad = Arc::new(Keypad::new());
        let writer = Arc::clone(&keypad);
        thread::spawn(move || writer.press(0x5)).join().unwrap();
        assert!(keypad.is_pressed(0x5));
    }
}
