//! RX data pipes of RFM73 devices.
//! All six pipes are opened with dynamic payloads and auto-ACK during
//! initialization. These methods change a single pipe afterwards.



use super::*;



/// Configuration of an RX data pipe.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PipeConfig {
    /// ACK required.
    pub(crate) ack: bool,

    /// Payload size.
    pub(crate) size: PayloadSize,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self::modern()
    }
}

impl PipeConfig {
    /// Creates a legacy configuration. Requires the payload size in bytes.
    /// This configuration is compatible with devices without the extended
    /// feature set, like nRF2401 or RFM70 modules in legacy mode.
    pub const fn legacy(size: u8) -> Self {
        Self { ack: false, size: PayloadSize::Fixed(size), }
    }

    /// Creates the default modern configuration.
    /// The packets are dynamically sized and require acknowledge.
    pub const fn modern() -> Self {
        Self { ack: true, size: PayloadSize::Dynamic, }
    }

    /// Creates a free configuration. This configuration must be equal to other
    /// devices to be able to communicate with them.
    pub const fn free(ack: bool, size: PayloadSize) -> Self {
        Self { ack, size, }
    }
}



/// Intermediate level methods of the RFM73 device.
/// Opening and closing RX data pipes.
impl<SPI: SpiDevice, CE: OutputPin, DELAY: DelayNs> Driver<SPI, CE, DELAY> {
    /// Opens the RX pipe `n` with the given configuration.
    /// Fixed payload sizes are clamped to 1 - 32 bytes.
    pub async fn openpipe(&mut self, n: u8, config: PipeConfig) -> Result<(), Failure<SPI, CE>> {
        if n > 5 {
            return Err( (Error::IllegalPipeNumber(n), None) );
        }

        // Configure the payload size.
        let fixed = config.size.fixed();

        if let Some( width ) = fixed {
            self.writereg( Register::payload_width(n), width ).await.map_err( fail(Error::FailedRegisterWrite) )?;
        }

        self.setpipebit( Register::DynamicPayload,   n, fixed.is_none() ).await?;
        self.setpipebit( Register::EnableAutoACK,    n, config.ack      ).await?;
        self.setpipebit( Register::EnabledRXAddress, n, true            ).await?;

        #[cfg(feature = "log")]
        defmt::debug!("Driver : Opened RX pipe {} (ACK: {})", n, config.ack);

        Ok( () )
    }

    /// Closes the RX pipe `n`. Its address and size settings are kept.
    pub async fn closepipe(&mut self, n: u8) -> Result<(), Failure<SPI, CE>> {
        if n > 5 {
            return Err( (Error::IllegalPipeNumber(n), None) );
        }

        self.setpipebit( Register::EnabledRXAddress, n, false ).await
    }

    /// Read-modify-write of one pipe bit of a pipe mask register.
    async fn setpipebit(&mut self, r: Register, n: u8, value: bool) -> Result<(), Failure<SPI, CE>> {
        let mut mask = PipeMask::from( self.readreg(r).await.map_err( fail(Error::FailedRegisterWrite) )? );
        mask.set_pipe( n, value );

        self.writereg( r, mask.into() ).await.map_err( fail(Error::FailedRegisterWrite) )?;

        Ok( () )
    }
}
