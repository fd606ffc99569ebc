use crate::constants::{
    ADDRESS_MASK, DISPLAY_HEIGHT, DISPLAY_WIDTH, FLAG, INSTRUCTION_SIZE, MEMORY_SIZE,
    PROGRAM_START, REGISTER_COUNT, SPRITE_SHEET,
};
use crate::error::{Error, Result};

/// The FrameBuffer is indexed as [y][x]; `true` is a lit pixel
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// The Chip-8 machine state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/borrow/collision flag
/// - (i) a 12-bit memory address register
///
/// Counter
/// - (pc) a 12-bit program counter
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented once per tick
///
/// ## Memory
/// - a call stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x000..0x050 holds the sprite sheet
///     - programs are loaded at 0x200
/// - 32x64 frame buffer
///
/// Holds no decoding logic; instructions are applied to it through the primitives below.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub(crate) v: [u8; REGISTER_COUNT],
    pub(crate) i: u16,
    pub(crate) pc: u16,
    pub(crate) delay_timer: u8,
    pub(crate) sound_timer: u8,
    pub(crate) stack: Vec<u16>,
    pub(crate) memory: [u8; MEMORY_SIZE],
    pub(crate) frame_buffer: FrameBuffer,
}

impl State {
    pub fn new() -> Self {
        let mut state = State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            delay_timer: 0,
            sound_timer: 0,
            stack: Vec::new(),
            memory: [0; MEMORY_SIZE],
            frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        };
        state.reset();
        state
    }

    /// Zeroes memory, registers, stack, timers and the frame buffer, points the pc at
    /// the program start and reloads the sprite sheet
    pub fn reset(&mut self) {
        self.v = [0; REGISTER_COUNT];
        self.i = 0;
        self.pc = PROGRAM_START;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.stack.clear();
        self.memory = [0; MEMORY_SIZE];
        self.memory[..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        self.clear_frame();
    }

    /// Copies a ROM into memory starting at 0x200, without resetting anything else
    ///
    /// # Arguments
    /// * `rom` the raw program bytes; at most `MAX_ROM_SIZE` of them
    pub fn load_rom(&mut self, rom: &[u8]) -> Result {
        self.write(PROGRAM_START as usize, rom)
    }

    /// The opcode at the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn current_opcode(&self) -> Result<u16> {
        let bytes = self.read(self.pc as usize, INSTRUCTION_SIZE as usize)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Moves the pc on to the next instruction
    pub fn advance(&mut self) {
        self.pc = self.pc.wrapping_add(INSTRUCTION_SIZE);
    }

    pub fn jump(&mut self, addr: u16) {
        self.pc = addr & ADDRESS_MASK;
    }

    /// Borrows `len` bytes of memory starting at `addr`
    pub fn read(&self, addr: usize, len: usize) -> Result<&[u8]> {
        let end = Self::checked_end(addr, len)?;
        Ok(&self.memory[addr..end])
    }

    /// Copies `bytes` into memory starting at `addr`; nothing is written unless all of it fits
    pub fn write(&mut self, addr: usize, bytes: &[u8]) -> Result {
        let end = Self::checked_end(addr, bytes.len())?;
        self.memory[addr..end].copy_from_slice(bytes);
        Ok(())
    }

    pub fn write_byte(&mut self, addr: usize, value: u8) -> Result {
        self.write(addr, &[value])
    }

    fn checked_end(addr: usize, len: usize) -> Result<usize> {
        match addr.checked_add(len) {
            Some(end) if end <= MEMORY_SIZE => Ok(end),
            _ => Err(Error::OutOfBounds {
                address: addr.max(MEMORY_SIZE),
            }),
        }
    }

    /// # Arguments
    /// * `x` column, already reduced into `0..DISPLAY_WIDTH`
    /// * `y` row, already reduced into `0..DISPLAY_HEIGHT`
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.frame_buffer[y][x]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, lit: bool) {
        self.frame_buffer[y][x] = lit;
    }

    pub fn clear_frame(&mut self) {
        self.frame_buffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }

    /// Pushes a return address, failing if the stack already holds `limit` of them
    pub fn push_return(&mut self, addr: u16, limit: Option<usize>) -> Result {
        if let Some(limit) = limit {
            if self.stack.len() >= limit {
                return Err(Error::StackOverflow { limit });
            }
        }
        self.stack.push(addr);
        Ok(())
    }

    pub fn pop_return(&mut self) -> Result<u16> {
        self.stack.pop().ok_or(Error::StackUnderflow)
    }

    pub fn register(&self, x: usize) -> u8 {
        self.v[x]
    }

    pub fn set_register(&mut self, x: usize, value: u8) {
        self.v[x] = value;
    }

    /// Overwrites VF with 1 or 0
    pub fn set_flag(&mut self, raised: bool) {
        self.v[FLAG] = u8::from(raised);
    }

    pub fn set_index(&mut self, addr: u16) {
        self.i = addr & ADDRESS_MASK;
    }

    /// Counts both timers down by one, stopping at zero
    pub fn decrement_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.v
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn stack(&self) -> &[u16] {
        &self.stack
    }

    pub fn memory(&self) -> &[u8; MEMORY_SIZE] {
        &self.memory
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
