use std::time::Duration;

use crate::constants::{DEFAULT_STACK_LIMIT, TICK_RATE};

/// Which register `8XY6` and `8XYE` shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftSource {
    /// Vx := Vy shifted, as on the COSMAC VIP
    Vy,
    /// Vx is shifted in place and Vy is ignored
    Vx,
}

/// Which key `EX9E` and `EXA1` test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOperand {
    /// The key named by the X nibble itself
    Nibble,
    /// The key whose code is held in Vx
    Register,
}

/// Choices between historical interpretations of the instruction set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    pub shift: ShiftSource,
    pub key_operand: KeyOperand,
    /// Return addresses the stack may hold; `None` for no limit
    pub stack_limit: Option<usize>,
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            shift: ShiftSource::Vy,
            key_operand: KeyOperand::Nibble,
            stack_limit: Some(DEFAULT_STACK_LIMIT),
        }
    }
}

/// # Config
/// - `tick_rate` scheduler ticks per second
/// - `seed` seeds the `CXNN` random source; drawn from the OS when unset
/// - `quirks` instruction set interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub tick_rate: u32,
    pub seed: Option<u64>,
    pub quirks: Quirks,
}

impl Config {
    pub fn with_tick_rate(mut self, tick_rate: u32) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    /// Time between ticks; a zero tick rate is treated as 1Hz
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tick_rate: TICK_RATE,
            seed: None,
            quirks: Quirks::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ticks_at_60hz() {
        let config = Config::default();
        assert_eq!(config.tick_interval(), Duration::from_nanos(16_666_666));
    }

    #[test]
    fn test_zero_tick_rate_does_not_divide_by_zero() {
        let config = Config::default().with_tick_rate(0);
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_default_quirks() {
        let quirks = Quirks::default();
        assert_eq!(quirks.shift, ShiftSource::Vy);
        assert_eq!(quirks.key_operand, KeyOperand::Nibble);
        assert_eq!(quirks.stack_limit, Some(16));
    }
}
