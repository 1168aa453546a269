//! Bank 0 registers of RFM73 devices.
//! Bank 1 holds an opaque calibration block addressed by index only.



/// Bank 0 register addresses. Datasheet mnemonics are given for each one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Register {
    /// CONFIG : IRQ masks, CRC, PWR_UP and PRIM_RX.
    Config = 0x00,

    /// EN_AA : Auto-ACK per pipe.
    EnableAutoACK = 0x01,

    /// EN_RXADDR : Enabled pipes.
    EnabledRXAddress = 0x02,

    /// SETUP_AW : Address width (0b01 - 0b11 for 3 - 5 bytes).
    AddressWidth = 0x03,

    /// SETUP_RETR : Auto retransmit delay and count.
    SetupRetries = 0x04,

    /// RF_CH : 7 bit channel.
    RFChannel = 0x05,

    /// RF_SETUP : Data rate, output power and LNA gain.
    RFSetup = 0x06,

    /// STATUS : Interrupt flags, RX pipe, TX full and active bank.
    Status = 0x07,

    /// OBSERVE_TX : Lost packet and retransmit counters. Read only.
    ObserveTX = 0x08,

    /// CD : Carrier detect. Read only.
    CarrierDetect = 0x09,

    /// RX_ADDR_P0 : Full address of pipe 0, LSB first.
    RX0Address = 0x0A,

    /// RX_ADDR_P1 : Full address of pipe 1, LSB first.
    RX1Address = 0x0B,

    /// RX_ADDR_P2 : LSB of pipe 2, upper bytes shared with pipe 1.
    RX2Address = 0x0C,

    /// RX_ADDR_P3.
    RX3Address = 0x0D,

    /// RX_ADDR_P4.
    RX4Address = 0x0E,

    /// RX_ADDR_P5.
    RX5Address = 0x0F,

    /// TX_ADDR : Destination address, LSB first.
    TXAddress = 0x10,

    /// RX_PW_P0 : Static payload width of pipe 0.
    RX0PayloadWidth = 0x11,

    /// RX_PW_P1.
    RX1PayloadWidth = 0x12,

    /// RX_PW_P2.
    RX2PayloadWidth = 0x13,

    /// RX_PW_P3.
    RX3PayloadWidth = 0x14,

    /// RX_PW_P4.
    RX4PayloadWidth = 0x15,

    /// RX_PW_P5.
    RX5PayloadWidth = 0x16,

    /// FIFO_STATUS : RX and TX FIFO flags. Read only.
    FIFOStatus = 0x17,

    /// DYNPD : Dynamic payload length per pipe.
    DynamicPayload = 0x1C,

    /// FEATURE : Extended feature set. Reads 0 until activated.
    Features = 0x1D,
}

impl Register {
    /// RX_PW_Pn address of the given pipe.
    pub const fn payload_width(pipe: u8) -> u8 {
        Register::RX0PayloadWidth as u8 + pipe
    }

    /// RX_ADDR_Pn address of the given pipe.
    pub const fn pipe_address(pipe: u8) -> u8 {
        Register::RX0Address as u8 + pipe
    }
}

impl From<Register> for u8 {
    fn from(r: Register) -> u8 {
        r as u8
    }
}
