//! Configuration of RFM73 devices.



use super::common::*;
use super::AckWait;



#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// CRC checksum configuration.
    pub(crate) crc: CRCBytes,

    /// Address Width (in bytes).
    pub(crate) aw: u8,

    /// RF channel of the device.
    pub(crate) ch: u8,

    /// RF data rate.
    pub(crate) dr: DataRate,

    /// RF output power.
    pub(crate) power: OutputPower,

    /// LNA gain.
    pub(crate) lna: LnaGain,

    /// Auto retransmit delay [us].
    pub(crate) delay: u16,

    /// Auto retransmit count.
    pub(crate) retries: u8,

    /// Main channel address (Pipe 0 and TX Pipe), LSB first.
    pub(crate) main: [u8; 5],

    /// Base channel address (Pipe 1), LSB first.
    pub(crate) base: [u8; 5],

    /// Channel sub-addresses (Pipe 2-5).
    pub(crate) sub: [u8; 4],

    /// Acknowledge wait policy.
    pub(crate) ack: AckWait,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates a new configuration instance.
    pub const fn new() -> Self {
        Self {
            crc: CRCBytes::Two,
            aw: 5,
            ch: 0x17,
            dr: DataRate::Mbps1,
            power: OutputPower::Plus5dBm,
            lna: LnaGain::High,
            delay: 4000,
            retries: 15,
            main: [0x34, 0x43, 0x10, 0x10, 0x01],
            base: [0x39, 0x38, 0x37, 0x36, 0xC2],
            sub: [0xC3, 0xC4, 0xC5, 0xC6],
            ack: AckWait::new(),
        }
    }

    /// Set the CRC configuration.
    pub const fn crc(mut self, crc: CRCBytes) -> Self {
        self.crc = crc;
        self
    }

    /// Set the addres width.
    pub const fn addresswidth(mut self, aw: u8) -> Self {
        self.aw = match aw {
            0..=3 => 3,
            4 => 4,
            _ => 5,
        };

        self
    }

    /// Set the RF channel.
    pub const fn channel(mut self, ch: u8) -> Self {
        self.ch = ch & 0x7F;
        self
    }

    /// Set the RF data rate.
    pub const fn datarate(mut self, dr: DataRate) -> Self {
        self.dr = dr;
        self
    }

    /// Set the RF output power.
    pub const fn power(mut self, power: OutputPower) -> Self {
        self.power = power;
        self
    }

    /// Set the LNA gain.
    pub const fn lna(mut self, lna: LnaGain) -> Self {
        self.lna = lna;
        self
    }

    /// Set the auto retransmission policy.
    /// The delay is given in microseconds and rounded to steps of 250 us.
    pub const fn retransmit(mut self, delay: u16, retries: u8) -> Self {
        self.delay = delay;
        self.retries = if retries > 15 { 15 } else { retries };
        self
    }

    /// Sets the main address (Pipe 0 and TX).
    pub const fn main(mut self, main: [u8; 5]) -> Self {
        self.main = main;
        self
    }

    /// Sets the base address for the multi channel pipes (Pipe 1-5).
    pub const fn base(mut self, base: [u8; 5]) -> Self {
        self.base = base;
        self
    }

    /// Sets the subaddress for a multi channel pipe (Pipe 2-5).
    /// Other pipe numbers leave the configuration unchanged.
    pub const fn subaddress(mut self, pipe: usize, addr: u8) -> Self {
        if (pipe >= 2) && (pipe <= 5) {
            self.sub[pipe - 2] = addr;
        }

        self
    }

    /// Sets the acknowledge wait policy.
    pub const fn ackwait(mut self, ack: AckWait) -> Self {
        self.ack = ack;
        self
    }



    /// Value of the CONFIG register written during initialization.
    /// RX_DR and TX_DS are masked from the IRQ pin, MAX_RT is reflected.
    /// The device is left powered down in PTX mode.
    pub(crate) fn configreg(&self) -> ConfigRegister {
        let mut config = ConfigRegister::from(0);
        config.set_crc( self.crc );
        config.set_mask_rx_dr( true );
        config.set_mask_tx_ds( true );
        config.set_mask_max_rt( false );
        config
    }

    /// Value of the RF_SETUP register.
    pub(crate) fn rfsetup(&self) -> RfSetup {
        let mut setup = RfSetup::from(0);
        setup.set_rf( self.power, self.lna, self.dr );
        setup
    }

    /// Value of the SETUP_AW register.
    pub(crate) const fn aw(&self) -> u8 {
        self.aw - 2
    }

    /// Bank 0 register table written as single register writes during
    /// initialization, in order.
    pub(crate) fn bank0(&self) -> [(Register, u8); 12] {
        [
            ( Register::Config,           self.configreg().into() ),
            ( Register::EnableAutoACK,    PipeMask::ALL.into() ),
            ( Register::EnabledRXAddress, PipeMask::ALL.into() ),
            ( Register::AddressWidth,     self.aw() ),
            ( Register::SetupRetries,     SetupRetries::new(self.delay, self.retries).into() ),
            ( Register::RFChannel,        self.ch ),
            ( Register::RFSetup,          self.rfsetup().into() ),
            ( Register::Status,           Status::INTERRUPTS ),
            ( Register::RX2Address,       self.sub[0] ),
            ( Register::RX3Address,       self.sub[1] ),
            ( Register::RX4Address,       self.sub[2] ),
            ( Register::RX5Address,       self.sub[3] ),
        ]
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_reference_values() {
        let table = Config::new()
            .power( OutputPower::ZerodBm )
            .lna( LnaGain::High )
            .datarate( DataRate::Mbps1 )
            .channel( 0x17 )
            .bank0();

        let raw: [u8; 12] = core::array::from_fn(|i| table[i].1);

        assert_eq!(raw, [0x6C, 0x3F, 0x3F, 0x03, 0xFF, 0x17, 0x05, 0x70, 0xC3, 0xC4, 0xC5, 0xC6]);
    }

    #[test]
    fn rates_map_to_rf_setup_bits() {
        let two = Config::new().power(OutputPower::Minus10dBm).lna(LnaGain::Low).datarate(DataRate::Mbps2).rfsetup();
        let slow = Config::new().power(OutputPower::Minus10dBm).lna(LnaGain::Low).datarate(DataRate::Kbps250).rfsetup();

        assert_eq!(u8::from(two), 0b0000_1000);
        assert_eq!(u8::from(slow), 0b0010_0000);
        assert_eq!(two.datarate(), DataRate::Mbps2);
    }

    #[test]
    fn channel_is_limited_to_seven_bits() {
        assert_eq!(Config::new().channel(0xFF).ch, 0x7F);
    }

    #[test]
    fn subaddress_ignores_pipes_without_one() {
        let default = Config::new().sub;

        assert_eq!(Config::new().subaddress(0, 0xAA).sub, default);
        assert_eq!(Config::new().subaddress(1, 0xAA).sub, default);
        assert_eq!(Config::new().subaddress(6, 0xAA).sub, default);
        assert_eq!(Config::new().subaddress(5, 0xAA).sub, [0xC3, 0xC4, 0xC5, 0xAA]);
    }
}
