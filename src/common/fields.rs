//! Typed bit-fields of the bank 0 registers.
//! Each type wraps the raw register byte and converts to and from it.



use bitfield::bitfield;

use super::{ CRCBytes, DataRate, LnaGain, OutputPower, };



/// Implements the raw byte conversions of a register value.
macro_rules! raw {
    ($($name:ident),*) => {
        $(
            impl From<u8> for $name {
                fn from(raw: u8) -> Self {
                    Self(raw)
                }
            }

            impl From<$name> for u8 {
                fn from(value: $name) -> u8 {
                    value.0
                }
            }
        )*
    };
}



bitfield! {
    /// CONFIG register.
    #[derive(Clone, Copy, Eq, PartialEq)]
    pub struct ConfigRegister(u8);
    impl Debug;

    /// Mask RX_DR on the IRQ pin.
    pub mask_rx_dr, set_mask_rx_dr: 6;
    /// Mask TX_DS on the IRQ pin.
    pub mask_tx_ds, set_mask_tx_ds: 5;
    /// Mask MAX_RT on the IRQ pin.
    pub mask_max_rt, set_mask_max_rt: 4;
    /// Enable CRC.
    pub en_crc, set_en_crc: 3;
    /// CRC encoding scheme (0: 1 byte, 1: 2 bytes).
    pub crco, set_crco: 2;
    /// Power up.
    pub pwr_up, set_pwr_up: 1;
    /// RX/TX control (1: PRX, 0: PTX).
    pub prim_rx, set_prim_rx: 0;
}

impl ConfigRegister {
    /// Sets the CRC configuration bits.
    pub fn set_crc(&mut self, crc: CRCBytes) {
        self.set_en_crc( crc != CRCBytes::None );
        self.set_crco( crc == CRCBytes::Two );
    }
}



bitfield! {
    /// STATUS register. Also shifted out with every command byte.
    #[derive(Clone, Copy, Eq, PartialEq)]
    pub struct Status(u8);
    impl Debug;

    /// Active register bank.
    pub rbank, _: 7;
    /// Data ready in the RX FIFO. Write 1 to clear.
    pub rx_dr, set_rx_dr: 6;
    /// Data sent from the TX FIFO (ACK received if auto-ACK). Write 1 to clear.
    pub tx_ds, set_tx_ds: 5;
    /// Maximum retransmissions reached. Write 1 to clear.
    pub max_rt, set_max_rt: 4;
    /// Pipe number of the payload at the top of the RX FIFO (0b111 when empty).
    pub u8, rx_p_no, _: 3, 1;
    /// TX FIFO full.
    pub tx_full, _: 0;
}

impl Status {
    /// Mask of the three write-1-to-clear interrupt flags.
    pub const INTERRUPTS: u8 = 0b0111_0000;

    /// Returns only the interrupt flags of this snapshot, ready to be written
    /// back to clear them.
    pub const fn interrupts(self) -> Status {
        Status( self.0 & Self::INTERRUPTS )
    }

    /// Returns the register bank reported by this snapshot.
    pub fn bank(&self) -> super::Bank {
        super::Bank::from( self.rbank() )
    }
}



bitfield! {
    /// FIFO_STATUS register.
    #[derive(Clone, Copy, Eq, PartialEq)]
    pub struct FifoStatus(u8);
    impl Debug;

    /// Last TX payload is being reused.
    pub tx_reuse, _: 6;
    /// TX FIFO full.
    pub tx_full, _: 5;
    /// TX FIFO empty.
    pub tx_empty, _: 4;
    /// RX FIFO full.
    pub rx_full, _: 1;
    /// RX FIFO empty.
    pub rx_empty, _: 0;
}



bitfield! {
    /// RF_SETUP register.
    #[derive(Clone, Copy, Eq, PartialEq)]
    pub struct RfSetup(u8);
    impl Debug;

    /// Air data rate, low bit.
    pub rf_dr_low, set_rf_dr_low: 5;
    /// Force PLL lock. Test only, must stay cleared.
    pub pll_lock, set_pll_lock: 4;
    /// Air data rate, high bit.
    pub rf_dr_high, set_rf_dr_high: 3;
    /// Output power in TX mode.
    pub u8, rf_pwr, set_rf_pwr: 2, 1;
    /// LNA gain (1: high).
    pub lna_hcurr, set_lna_hcurr: 0;
}

impl RfSetup {
    /// Replaces the power, gain and data rate fields, keeping every other bit.
    pub fn set_rf(&mut self, power: OutputPower, lna: LnaGain, rate: DataRate) {
        let (high, low) = rate.bits();

        self.set_rf_pwr( power as u8 );
        self.set_lna_hcurr( lna == LnaGain::High );
        self.set_rf_dr_high( high );
        self.set_rf_dr_low( low );
        self.set_pll_lock( false );
    }

    /// Decodes the configured data rate.
    pub fn datarate(&self) -> DataRate {
        match (self.rf_dr_high(), self.rf_dr_low()) {
            (_, true)      => DataRate::Kbps250,
            (true, false)  => DataRate::Mbps2,
            (false, false) => DataRate::Mbps1,
        }
    }
}



bitfield! {
    /// SETUP_RETR register.
    #[derive(Clone, Copy, Eq, PartialEq)]
    pub struct SetupRetries(u8);
    impl Debug;

    /// Auto retransmit delay [(n + 1) * 250 us].
    pub u8, ard, set_ard: 7, 4;
    /// Auto retransmit count.
    pub u8, arc, set_arc: 3, 0;
}

impl SetupRetries {
    /// Builds the register from a delay in microseconds and a retry count.
    /// Both values are clamped to the range of the device.
    pub fn new(delay_us: u16, count: u8) -> Self {
        let ard = if delay_us < 250 {
            0
        } else if delay_us > 4000 {
            15
        } else {
            (delay_us / 250 - 1) as u8
        };

        let mut retr = SetupRetries(0);
        retr.set_ard( ard );
        retr.set_arc( if count > 15 { 15 } else { count } );
        retr
    }
}



bitfield! {
    /// OBSERVE_TX register.
    #[derive(Clone, Copy, Eq, PartialEq)]
    pub struct ObserveTx(u8);
    impl Debug;

    /// Lost packets. Saturates at 15, reset by writing RF_CH.
    pub u8, plos_cnt, _: 7, 4;
    /// Retransmissions of the last packet.
    pub u8, arc_cnt, _: 3, 0;
}



bitfield! {
    /// FEATURE register.
    #[derive(Clone, Copy, Eq, PartialEq)]
    pub struct Feature(u8);
    impl Debug;

    /// Enable dynamic payload length.
    pub en_dpl, set_en_dpl: 2;
    /// Enable payload with ACK.
    pub en_ack_pay, set_en_ack_pay: 1;
    /// Enable the W_TX_PAYLOAD_NOACK command.
    pub en_dyn_ack, set_en_dyn_ack: 0;
}

impl Feature {
    /// All three extended features enabled.
    pub fn all() -> Self {
        let mut feature = Feature(0);
        feature.set_en_dpl( true );
        feature.set_en_ack_pay( true );
        feature.set_en_dyn_ack( true );
        feature
    }
}



/// Per-pipe bit mask shared by EN_AA, EN_RXADDR and DYNPD.
/// Pipe `n` always maps to bit `n`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PipeMask(u8);

impl PipeMask {
    /// All six pipes set.
    pub const ALL: PipeMask = PipeMask( 0b0011_1111 );

    /// Returns `true` if the bit of the pipe is set.
    pub const fn pipe(&self, n: u8) -> bool {
        (self.0 >> n) & 1 == 1
    }

    /// Sets or clears the bit of the pipe.
    pub fn set_pipe(&mut self, n: u8, value: bool) {
        match value {
            true  => self.0 |=   1 << n ,
            false => self.0 &= !(1 << n),
        }
    }
}



raw!( ConfigRegister, Status, FifoStatus, RfSetup, SetupRetries, ObserveTx, Feature, PipeMask );
