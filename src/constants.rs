/// Addressable memory in bytes
pub const MEMORY_SIZE: usize = 4096;

/// ROMs are loaded, and execution begins, at this address
pub const PROGRAM_START: u16 = 0x200;

/// The largest ROM that fits between `PROGRAM_START` and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Every instruction is two bytes wide
pub const INSTRUCTION_SIZE: u16 = 2;

/// Addresses (PC, I) are 12 bits wide
pub const ADDRESS_MASK: u16 = 0x0FFF;

pub const REGISTER_COUNT: usize = 16;

/// VF doubles as the carry, borrow and collision flag
pub const FLAG: usize = 0xF;

pub const KEY_COUNT: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Sprites are at most this many rows tall
pub const MAX_SPRITE_HEIGHT: usize = 16;

/// Number of bytes per glyph in `SPRITE_SHEET`
pub const GLYPH_SIZE: u16 = 5;

/// Return addresses the call stack holds before a call faults
pub const DEFAULT_STACK_LIMIT: usize = 16;

/// Ticks per second of the fixed-rate scheduler
pub const TICK_RATE: u32 = 60;

/// # Sprite sheet
/// The built-in 4x5 font for the hex digits 0..F, stored at 0x000.
/// Each glyph is 5 rows; only the high nibble of each row is drawn.
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
