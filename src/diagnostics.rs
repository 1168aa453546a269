//! Link diagnostics of RFM73 devices.



use super::*;



/// Link quality and channel information.
impl<SPI: SpiDevice, CE: OutputPin, DELAY: DelayNs> Driver<SPI, CE, DELAY> {
    /// Returns the number of lost packets and the number of retransmissions
    /// of the last packet, in this order.
    /// The lost packet count saturates at 15 and is reset by a channel change.
    pub async fn observe(&mut self) -> Result<(u8, u8), Failure<SPI, CE>> {
        let observe = ObserveTx::from( self.readreg(Register::ObserveTX).await.map_err( fail(Error::CouldNotReadStatus) )? );

        Ok( (observe.plos_cnt(), observe.arc_cnt()) )
    }

    /// Returns `true` if a carrier was detected on the current channel.
    /// Only meaningful in RX mode.
    pub async fn carrier_detect(&mut self) -> Result<bool, Failure<SPI, CE>> {
        let cd = self.readreg( Register::CarrierDetect ).await.map_err( fail(Error::CouldNotReadStatus) )?;

        Ok( (cd & 1) == 1 )
    }

    /// Returns the RF channel the device is tuned to.
    pub async fn current_channel(&mut self) -> Result<u8, Failure<SPI, CE>> {
        let ch = self.readreg( Register::RFChannel ).await.map_err( fail(Error::CouldNotReadStatus) )?;

        Ok( ch & MAX_CHANNEL )
    }

    /// Dumps the bank 0 registers of the device.
    #[cfg(feature = "log")]
    pub async fn report(&mut self) {
        const REGISTERS: [(Register, &str); 19] = [
            ( Register::Config,           "Config"                  ),
            ( Register::EnableAutoACK,    "Enable Auto Acknowledge" ),
            ( Register::EnabledRXAddress, "Enable RX Address"       ),
            ( Register::AddressWidth,     "Setup Address Width"     ),
            ( Register::SetupRetries,     "Setup Retries"           ),
            ( Register::RFChannel,        "RF Channel"              ),
            ( Register::RFSetup,          "RF Setup"                ),
            ( Register::Status,           "Status"                  ),
            ( Register::ObserveTX,        "Observe TX"              ),
            ( Register::CarrierDetect,    "Carrier Detect"          ),
            ( Register::RX0PayloadWidth,  "Bytes in Pipe 0"         ),
            ( Register::RX1PayloadWidth,  "Bytes in Pipe 1"         ),
            ( Register::RX2PayloadWidth,  "Bytes in Pipe 2"         ),
            ( Register::RX3PayloadWidth,  "Bytes in Pipe 3"         ),
            ( Register::RX4PayloadWidth,  "Bytes in Pipe 4"         ),
            ( Register::RX5PayloadWidth,  "Bytes in Pipe 5"         ),
            ( Register::FIFOStatus,       "FIFO Status"             ),
            ( Register::DynamicPayload,   "Dynamic Payload"         ),
            ( Register::Features,         "Features"                ),
        ];

        defmt::info!("Driver : {} in bank {}", self.state, self.bank);

        for (r, name) in REGISTERS {
            let value = self.readreg(r).await.unwrap_or(0xFF);
            defmt::info!("Register {}: {:b}", name, value);
        }
    }
}
