pub type Result<T = ()> = std::result::Result<T, Error>;

/// Faults raised by the interpreter.
///
/// Every fault is fatal to the instruction that raised it: the machine halts and
/// its state is left exactly as it was before that instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A read or write outside of addressable memory, including ROMs too large to load
    #[error("memory access out of bounds at {address:#06X}")]
    OutOfBounds { address: usize },

    #[error("return from subroutine with an empty call stack")]
    StackUnderflow,

    #[error("call stack exceeded its limit of {limit} return addresses")]
    StackOverflow { limit: usize },

    #[error("unrecognized opcode {0:#06X}")]
    UnrecognizedOpcode(u16),
}
