pub const WORD_WIDTH   : u32 = 18;
pub const WORD_MASK    : u32 = 0o777777;
pub const WORD_SIGN    : u32 = 0o400000;

/// Left shift applied to the `<c` character literal form.
pub const CHAR_SHIFT   : u32 = 9;

/// Initial value of the relocation base `..`.
pub const DEFAULT_BASE : u32 = 0o10000;

/// High bit set on every 6-bit paper-tape frame.
pub const FRAME_MARK   : u8 = 0o200;
/// Extra bit on the last frame of the RIM halt-and-start word.
pub const FRAME_START  : u8 = 0o100;
