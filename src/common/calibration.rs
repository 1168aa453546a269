//! Bank 1 analog / RF calibration block of RFM73 devices.
//! These are vendor supplied values and are written verbatim.



/// Words of the bank 1 registers 0 to 13.
pub const BANK1_WORDS: [u32; 14] = [
    0xE2014B40,
    0x00004BC0,
    0x028CFCD0,
    0x41390099,
    0x1B8296D9,
    0xA67F0224,
    0x00000000,
    0x00000000,
    0x00000000,
    0x00000000,
    0x00000000,
    0x00000000,
    0x00127300,
    0x46B48000,
];

/// Contents of the bank 1 register 14 (ramp curve).
pub const BANK1_RAMP: [u8; 11] = [0x41, 0x20, 0x08, 0x04, 0x81, 0x20, 0xCF, 0xF7, 0xFE, 0xFF, 0xFF];

/// Registers up to and including this index are emitted least significant byte first.
pub const BANK1_LSB_FIRST_LAST: u8 = 8;

/// Index of the ramp curve register.
pub const BANK1_RAMP_REGISTER: u8 = 14;

/// Register toggled after the block is written.
pub const BANK1_TOGGLE_REGISTER: u8 = 4;

/// Bits of the first emitted byte set and then cleared in the toggle register.
pub const BANK1_TOGGLE_BITS: u8 = 0x06;



/// Bytes of a calibration word in the order they go on the bus.
/// Registers 0 to 8 are sent little endian, registers 9 to 13 big endian.
/// `index` must be 0 - 13.
pub(crate) const fn calibration_bytes(index: u8) -> [u8; 4] {
    let word = BANK1_WORDS[index as usize];

    if index <= BANK1_LSB_FIRST_LAST {
        word.to_le_bytes()
    } else {
        word.to_be_bytes()
    }
}
