//! Commands accepted by RFM73 devices.



#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Command {
    /// Command to read a register. OR'd with the 5 bit register address.
    ReadRegister = 0b00000000,

    /// Command to write a register. OR'd with the 5 bit register address.
    /// Only executable in power down or standby modes.
    WriteRegister = 0b00100000,

    /// Activate command. Followed by an `ActivateKey` byte.
    Activate = 0b01010000,

    /// Read the RX payload width for the top payload in the FIFO.
    PayloadWidth = 0b01100000,

    /// Command to read a payload packet.
    ReadPayload = 0b01100001,

    /// Command to write a TX payload with ACK.
    WritePayload = 0b10100000,

    /// Command to write a TX payload with no ACK.
    WritePayloadNoAck = 0b10110000,

    /// Flushes the TX FIFO.
    FlushTX = 0b11100001,

    /// Flushes the RX FIFO.
    FlushRX = 0b11100010,

    /// Reuses the last transmitted payload while CE is held high.
    ReuseTX = 0b11100011,

    /// No operation.
    NOP = 0b11111111,
}

impl Command {
    /// Encodes a register access command for the given address.
    /// Only the lower 5 bits of the address are used.
    pub const fn register(self, address: u8) -> u8 {
        self as u8 | (address & 0x1F)
    }
}

impl Into<u8> for Command {
    fn into(self) -> u8 {
        self as u8
    }
}



/// Data byte sent after the `Activate` command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum ActivateKey {
    /// Toggles the active register bank.
    ToggleBank = 0x53,

    /// Toggles the extended command set (R_RX_PL_WID, W_ACK_PAYLOAD, W_TX_PAYLOAD_NOACK).
    Features = 0x73,
}

impl Into<u8> for ActivateKey {
    fn into(self) -> u8 {
        self as u8
    }
}
