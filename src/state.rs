//! Device modes tracked by the driver.
//! The device does not report its mode, the driver keeps track of every
//! transition it makes.



#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// PWR_UP cleared. Registers are kept, the oscillator is stopped.
    /// This is the state of a freshly created driver.
    PowerDown,

    /// PWR_UP set and CE low. RX or TX mode is reached in about 130 us.
    Standby,

    /// PRIM_RX cleared and CE high. Packets in the TX FIFO are sent.
    Transmitting,

    /// PRIM_RX set and CE high. The device listens on the RF channel.
    Receiving,
}

#[cfg(feature = "log")]
impl defmt::Format for State {
    fn format(&self, _: defmt::Formatter) {
        let string = match self {
            State::PowerDown => defmt::intern!("Power Down"),
            State::Standby => defmt::intern!("Standby"),
            State::Transmitting => defmt::intern!("TX"),
            State::Receiving => defmt::intern!("RX"),
        };

        defmt::export::istr(&string);
    }
}
