//! Mode control of RFM73 devices.
//! The device mode is given by the PWR_UP and PRIM_RX bits of CONFIG and the
//! level of the CE pin. CONFIG is only written while CE is low.



use super::*;



/// Mode controller of the RFM73 device.
impl<SPI: SpiDevice, CE: OutputPin, DELAY: DelayNs> Driver<SPI, CE, DELAY> {
    /// Powers up the device and waits for its oscillator to start.
    /// The device is left in standby mode.
    pub async fn powerup(&mut self) -> Result<(), Failure<SPI, CE>> {
        let mut config = ConfigRegister::from( self.readreg(Register::Config).await.map_err( fail(Error::FailedModeSet(State::Standby)) )? );
        config.set_pwr_up( true );

        self.writereg( Register::Config, config.into() ).await.map_err( fail(Error::FailedModeSet(State::Standby)) )?;

        self.delay.delay_ms( POWER_UP_DELAY ).await;

        if self.state == State::PowerDown {
            self.state = State::Standby;
        }

        #[cfg(feature = "log")]
        defmt::debug!("Driver : Powered up");

        Ok( () )
    }

    /// Sets the device in a power down state.
    /// This is the mode with the lowest consumption. Register values are kept.
    pub async fn powerdown(&mut self) -> Result<(), Failure<SPI, CE>> {
        self.celow( State::Standby )?;

        let mut config = ConfigRegister::from( self.readreg(Register::Config).await.map_err( fail(Error::FailedModeSet(State::PowerDown)) )? );
        config.set_pwr_up( false );

        self.writereg( Register::Config, config.into() ).await.map_err( fail(Error::FailedModeSet(State::PowerDown)) )?;

        self.state = State::PowerDown;

        #[cfg(feature = "log")]
        defmt::debug!("Driver : Powered down");

        Ok( () )
    }

    /// Sets the device in a standby state.
    /// From RX or TX mode CE is lowered, from power down the device is powered up.
    pub async fn standby(&mut self) -> Result<(), Failure<SPI, CE>> {
        match self.state {
            State::Standby => Ok( () ),

            State::PowerDown => self.powerup().await,

            State::Receiving | State::Transmitting => {
                self.celow( State::Standby )?;
                self.state = State::Standby;

                Ok( () )
            },
        }
    }

    /// Sets the device in RX mode.
    /// The RX FIFO is flushed and the interrupt flags cleared on every call.
    /// The device must be powered up.
    pub async fn rxmode(&mut self) -> Result<(), Failure<SPI, CE>> {
        let failed = || fail( Error::FailedModeSet(State::Receiving) );

        self.command( Command::FlushRX ).await.map_err( failed() )?;
        self.writereg( Register::Status, Status::INTERRUPTS ).await.map_err( failed() )?;

        self.primary( true ).await?;

        self.state = State::Receiving;

        #[cfg(feature = "log")]
        defmt::trace!("Driver : RX mode");

        Ok( () )
    }

    /// Sets the device in TX mode.
    /// The TX FIFO is flushed on every call. The device must be powered up.
    /// WARNING : The device must not stay in TX mode for more than 4 ms.
    /// Leave through `standby`, `rxmode` or `pulse` once the packet is sent.
    pub async fn txmode(&mut self) -> Result<(), Failure<SPI, CE>> {
        self.command( Command::FlushTX ).await.map_err( fail(Error::FailedModeSet(State::Transmitting)) )?;

        self.primary( false ).await?;

        self.state = State::Transmitting;

        #[cfg(feature = "log")]
        defmt::trace!("Driver : TX mode");

        Ok( () )
    }

    /// Transmits the next packet of the TX FIFO with a short CE pulse and
    /// leaves the device in standby.
    pub async fn pulse(&mut self) -> Result<(), Failure<SPI, CE>> {
        self.cehigh( State::Transmitting )?;
        self.delay.delay_us( TX_PULSE ).await;
        self.celow( State::Standby )?;

        self.state = State::Standby;

        Ok( () )
    }

    /// Switches PRIM_RX with CE low, then raises CE.
    async fn primary(&mut self, rx: bool) -> Result<(), Failure<SPI, CE>> {
        let target = if rx { State::Receiving } else { State::Transmitting };

        self.celow( State::Standby )?;

        let mut config = ConfigRegister::from( self.readreg(Register::Config).await.map_err( fail(Error::FailedModeSet(target)) )? );
        config.set_prim_rx( rx );

        self.writereg( Register::Config, config.into() ).await.map_err( fail(Error::FailedModeSet(target)) )?;

        self.cehigh( target )
    }

    fn celow(&mut self, target: State) -> Result<(), Failure<SPI, CE>> {
        self.ce.set_low().map_err( HWError::<SPI, CE>::ChipEnable ).map_err( fail(Error::FailedModeSet(target)) )
    }

    fn cehigh(&mut self, target: State) -> Result<(), Failure<SPI, CE>> {
        self.ce.set_high().map_err( HWError::<SPI, CE>::ChipEnable ).map_err( fail(Error::FailedModeSet(target)) )
    }
}
