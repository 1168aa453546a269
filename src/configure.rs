//! Configuration of the RFM73 device.
//! Full initialization sequence and runtime changes of single settings.



use super::*;



/// Device configurator.
/// Brings a freshly powered device to RX mode with the given configuration.
impl<SPI: SpiDevice, CE: OutputPin, DELAY: DelayNs> Driver<SPI, CE, DELAY> {
    /// Initializes the device with the default configuration and the given
    /// RF parameters. Any other setting of the current configuration is kept.
    pub async fn initialize(&mut self, power: OutputPower, lna: LnaGain, rate: DataRate, channel: u8) -> Result<(), Failure<SPI, CE>> {
        let config = self.config
            .power( power )
            .lna( lna )
            .datarate( rate )
            .channel( channel );

        self.configure( config ).await
    }

    /// Writes the full configuration to the device, calibrates it and sets it
    /// in RX mode.
    /// Must be called after every power cycle of the device. The call includes
    /// the 200 ms power on delay.
    pub async fn configure(&mut self, config: Config) -> Result<(), Failure<SPI, CE>> {
        #[cfg(feature = "log")]
        defmt::debug!("Driver : Configuring device on channel {} with {}", config.ch, config.dr);

        // Wait for the device to accept commands.
        self.delay.delay_ms( POWER_ON_DELAY ).await;

        self.selectbank( Bank::Zero ).await?;

        // Operational registers.
        for (r, v) in config.bank0() {
            self.writereg( r, v ).await.map_err( fail(Error::FailedDriverConfiguration) )?;
        }

        // Addresses.
        let aw = config.aw as usize;

        self.writebuf( Register::RX0Address, &config.main[..aw] ).await.map_err( fail(Error::FailedDriverConfiguration) )?;
        self.writebuf( Register::RX1Address, &config.base[..aw] ).await.map_err( fail(Error::FailedDriverConfiguration) )?;
        self.writebuf( Register::TXAddress,  &config.main[..aw] ).await.map_err( fail(Error::FailedDriverConfiguration) )?;

        // Static payload widths, used by pipes set to fixed payloads later.
        for pipe in 0..6 {
            self.writereg( Register::payload_width(pipe), MAX_PAYLOAD as u8 ).await.map_err( fail(Error::FailedDriverConfiguration) )?;
        }

        // Extended feature set and dynamic payloads on every pipe.
        self.activatefeatures().await?;
        self.writereg( Register::Features, Feature::all().into() ).await.map_err( fail(Error::FailedDriverConfiguration) )?;
        self.writereg( Register::DynamicPayload, PipeMask::ALL.into() ).await.map_err( fail(Error::FailedDriverConfiguration) )?;

        self.calibrate().await?;

        self.config = config;

        self.powerup().await?;
        self.rxmode().await?;

        #[cfg(feature = "log")]
        defmt::info!("Driver : Device configured");

        Ok( () )
    }

    /// Writes the bank 1 calibration block and returns to bank 0.
    async fn calibrate(&mut self) -> Result<(), Failure<SPI, CE>> {
        self.selectbank( Bank::One ).await?;

        for r in 0..BANK1_RAMP_REGISTER {
            self.writebuf( r, &calibration_bytes(r) ).await.map_err( fail(Error::FailedDriverConfiguration) )?;
        }

        self.writebuf( BANK1_RAMP_REGISTER, &BANK1_RAMP ).await.map_err( fail(Error::FailedDriverConfiguration) )?;

        // Toggle the calibration bits of register 4.
        let mut toggle = calibration_bytes( BANK1_TOGGLE_REGISTER );

        toggle[0] |= BANK1_TOGGLE_BITS;
        self.writebuf( BANK1_TOGGLE_REGISTER, &toggle ).await.map_err( fail(Error::FailedDriverConfiguration) )?;

        toggle[0] &= !BANK1_TOGGLE_BITS;
        self.writebuf( BANK1_TOGGLE_REGISTER, &toggle ).await.map_err( fail(Error::FailedDriverConfiguration) )?;

        self.delay.delay_ms( CALIBRATION_DELAY ).await;

        self.selectbank( Bank::Zero ).await
    }
}


/// Intermediate level methods of the RFM73 device.
/// Changing single settings after initialization. Bank 0 must be active.
impl<SPI: SpiDevice, CE: OutputPin, DELAY: DelayNs> Driver<SPI, CE, DELAY> {
    /// Sets the RF channel used by the device.
    /// The channel is limited to 7 bits. The method returns the channel that
    /// was actually set.
    pub async fn setchannel(&mut self, ch: u8) -> Result<u8, Failure<SPI, CE>> {
        let ch = ch & MAX_CHANNEL;

        self.writereg( Register::RFChannel, ch ).await.map_err( fail(Error::FailedRegisterWrite) )?;

        self.config.ch = ch;

        Ok( ch )
    }

    /// Sets the output power, LNA gain and data rate, keeping the other bits
    /// of RF_SETUP.
    pub async fn setrf(&mut self, power: OutputPower, lna: LnaGain, rate: DataRate) -> Result<(), Failure<SPI, CE>> {
        let mut setup = RfSetup::from( self.readreg(Register::RFSetup).await.map_err( fail(Error::FailedRegisterWrite) )? );
        setup.set_rf( power, lna, rate );

        self.writereg( Register::RFSetup, setup.into() ).await.map_err( fail(Error::FailedRegisterWrite) )?;

        self.config.power = power;
        self.config.lna = lna;
        self.config.dr = rate;

        Ok( () )
    }

    /// Sets the auto retransmit delay (in microseconds) and count.
    /// The delay is rounded down to steps of 250 us, between 250 and 4000 us.
    pub async fn retries(&mut self, delay: u16, count: u8) -> Result<(), Failure<SPI, CE>> {
        self.writereg( Register::SetupRetries, SetupRetries::new(delay, count).into() ).await.map_err( fail(Error::FailedRegisterWrite) )?;

        self.config = self.config.retransmit( delay, count );

        Ok( () )
    }

    /// Sets the address width in bytes (3 to 5).
    /// The addresses written afterwards are truncated to the new width.
    pub async fn addresswidth(&mut self, aw: u8) -> Result<u8, Failure<SPI, CE>> {
        let config = self.config.addresswidth( aw );

        self.writereg( Register::AddressWidth, config.aw() ).await.map_err( fail(Error::FailedRegisterWrite) )?;

        self.config = config;

        Ok( config.aw )
    }

    /// Masks (`true`) or reflects (`false`) each interrupt on the IRQ pin.
    pub async fn maskirq(&mut self, rxdr: bool, txds: bool, retries: bool) -> Result<(), Failure<SPI, CE>> {
        let mut config = ConfigRegister::from( self.readreg(Register::Config).await.map_err( fail(Error::FailedRegisterWrite) )? );
        config.set_mask_rx_dr( rxdr );
        config.set_mask_tx_ds( txds );
        config.set_mask_max_rt( retries );

        self.writereg( Register::Config, config.into() ).await.map_err( fail(Error::FailedRegisterWrite) )?;

        Ok( () )
    }

    /// Sets the main address, used by Pipe 0 and the TX pipe.
    /// WARNING : After changing address the device will be in standby mode.
    pub async fn mainaddr(&mut self, addr: [u8; 5]) -> Result<(), Failure<SPI, CE>> {
        self.standby().await?;

        let aw = self.config.aw as usize;

        self.writebuf( Register::RX0Address, &addr[..aw] ).await.map_err( fail(Error::FailedRegisterWrite) )?;
        self.writebuf( Register::TXAddress,  &addr[..aw] ).await.map_err( fail(Error::FailedRegisterWrite) )?;

        self.config.main = addr;

        Ok( () )
    }

    /// Sets the base address for Pipes 1-5 and the Least Significant Byte for Pipe 1.
    /// WARNING : After changing address the device will be in standby mode.
    pub async fn baseaddr(&mut self, addr: [u8; 5]) -> Result<(), Failure<SPI, CE>> {
        self.standby().await?;

        let aw = self.config.aw as usize;

        self.writebuf( Register::RX1Address, &addr[..aw] ).await.map_err( fail(Error::FailedRegisterWrite) )?;

        self.config.base = addr;

        Ok( () )
    }

    /// Sets the Least Significant Byte of the address for the given pipe (2-5).
    /// WARNING : After changing address the device will be in standby mode.
    pub async fn subaddr(&mut self, pipe: u8, lsb: u8) -> Result<(), Failure<SPI, CE>> {
        if !(2..=5).contains(&pipe) {
            return Err( (Error::IllegalPipeNumber(pipe), None) );
        }

        self.standby().await?;

        self.writereg( Register::pipe_address(pipe), lsb ).await.map_err( fail(Error::FailedRegisterWrite) )?;

        self.config.sub[pipe as usize - 2] = lsb;

        Ok( () )
    }

    /// Clears the given IRQs from the status register.
    pub async fn clearirq(&mut self, rxdr: bool, txds: bool, retries: bool) -> Result<Status, HWError<SPI, CE>> {
        let mut irq = Status::from(0);
        irq.set_rx_dr( rxdr );
        irq.set_tx_ds( txds );
        irq.set_max_rt( retries );

        self.writereg( Register::Status, irq.into() ).await
    }

    /// Clears all IRQs from the status register.
    pub async fn clearirqs(&mut self) -> Result<Status, HWError<SPI, CE>> {
        self.writereg( Register::Status, Status::INTERRUPTS ).await
    }

    /// Marks the last transmitted payload for retransmission on the next CE
    /// pulse. Remains active until the TX FIFO is flushed or written.
    pub async fn reuse(&mut self) -> Result<(), Failure<SPI, CE>> {
        self.command( Command::ReuseTX ).await.map_err( fail(Error::FailedPacketUpload) )?;

        Ok( () )
    }
}
