/// # Opcodes
///
/// Every CHIP-8 instruction is a big-endian 16-bit word. The high nibble picks the
/// instruction group; groups 0x0, 0x8, 0xE and 0xF dispatch again on the low byte
/// or low nibble.
///
/// Nibbles not used for dispatch carry operands:
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` an immediate byte assigned to or compared with Vx
/// - `(_, n, _, _)` the register Vx, or the range V0..=Vx
/// - `(_, _, n, _)` the register Vy
/// - `(_, _, _, n)` a sprite height or exit code
pub trait Opcode {
    /// The opcode split into its four nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// Register index from the second nibble.
    /// `[_x__]`
    fn x(&self) -> usize;

    /// Register index from the third nibble.
    /// `[__y_]`
    fn y(&self) -> usize;

    /// `[___n]`
    fn n(&self) -> u8;

    /// The low byte.
    /// `[__kk]`
    fn kk(&self) -> u8;

    /// The low 12 bits.
    /// `[_adr]`
    fn addr(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (
            ((self & 0xF000) >> 12) as u8,
            ((self & 0x0F00) >> 8) as u8,
            ((self & 0x00F0) >> 4) as u8,
            self.n(),
        )
    }

    fn x(&self) -> usize {
        ((self & 0x0F00) >> 8) as usize
    }

    fn y(&self) -> usize {
        ((self & 0x00F0) >> 4) as usize
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn addr(&self) -> u16 {
        self & 0x0FFF
    }
}

#[cfg(test)]
mod test_opcode {
    use super::*;

    #[test]
    fn test_nibbles() {
        let op: u16 = 0xABCD;
        assert_eq!(op.nibbles(), (0xA, 0xB, 0xC, 0xD));
    }

    #[test]
    fn test_operands() {
        let op: u16 = 0xABCD;
        assert_eq!(op.x(), 0xB);
        assert_eq!(op.y(), 0xC);
        assert_eq!(op.n(), 0xD);
        assert_eq!(op.kk(), 0xCD);
        assert_eq!(op.addr(), 0xBCD);
    }
}
