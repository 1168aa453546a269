//! `enum`s used in RFM73 configuration structs.



/// CRC length appended to each packet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CRCBytes {
    /// No CRC.
    /// Forced to one byte by the device while any auto-ACK bit is set.
    None,

    /// 1 byte CRC.
    One,

    /// 2 byte CRC.
    Two,
}



/// Payload width of an RX pipe.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PayloadSize {
    /// Width sent along with each packet (DYNPD).
    /// Requires the extended feature set to be active.
    Dynamic,

    /// Static width in bytes (RX_PW_Pn).
    Fixed( u8 ),
}

impl PayloadSize {
    /// Static width to program, clamped to 1 - 32 bytes.
    /// `None` for dynamic payloads.
    pub const fn fixed(self) -> Option<u8> {
        match self {
            PayloadSize::Dynamic => None,
            PayloadSize::Fixed( 0 ) => Some( 1 ),
            PayloadSize::Fixed( s ) if s > 32 => Some( 32 ),
            PayloadSize::Fixed( s ) => Some( s ),
        }
    }
}



/// RF output power configurations of RFM73 devices.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "log", derive(defmt::Format))]
#[repr(u8)]
pub enum OutputPower {
    /// Minimum output power [-10 dBm].
    Minus10dBm = 0b00,

    /// Low output power [-5 dBm].
    Minus5dBm = 0b01,

    /// Nominal output power [0 dBm].
    ZerodBm = 0b10,

    /// Maximum output power [+5 dBm].
    Plus5dBm = 0b11,
}



/// LNA gain configurations of RFM73 devices.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "log", derive(defmt::Format))]
pub enum LnaGain {
    /// Low gain [20 dB down].
    Low,

    /// High gain.
    High,
}



/// RF data rate configurations of RFM73 devices.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "log", derive(defmt::Format))]
pub enum DataRate {
    /// Mid data rate [1 Mbps].
    Mbps1,

    /// Low data rate [250 kbps].
    Kbps250,

    /// High data rate [2 Mbps].
    Mbps2,
}

impl DataRate {
    /// All data rates in the order used by the channel scanner.
    pub const ALL: [DataRate; 3] = [DataRate::Mbps1, DataRate::Kbps250, DataRate::Mbps2];

    /// Index of the data rate in `DataRate::ALL`.
    pub const fn index(self) -> usize {
        match self {
            DataRate::Mbps1   => 0,
            DataRate::Kbps250 => 1,
            DataRate::Mbps2   => 2,
        }
    }

    /// Returns the (RF_DR_HIGH, RF_DR_LOW) bits of the data rate.
    pub(crate) const fn bits(self) -> (bool, bool) {
        match self {
            DataRate::Mbps1   => (false, false),
            DataRate::Kbps250 => (false, true),
            DataRate::Mbps2   => (true, false),
        }
    }
}
