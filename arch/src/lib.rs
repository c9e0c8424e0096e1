pub mod inst;
pub mod op;
pub mod reg;

/// Load address of the program image and initial program counter.
pub const BASE_ADDR: u16 = 0x200;

/// Highest addressable byte.
pub const ADDR_MAX: u16 = 0xFFF;
