//! Errors emitted RFM73 device drivers.
//! There are 2 types of errors, driver errors and hardware errors.
//! The driver will always return at least a driver error. The hardware errors
//! returned specify that the error originated from the host hardware (SPI bus
//! or CE pin) not the driver or the RFM73 device. The device itself has no
//! error signaling, a failed bus exchange on its side reads back as garbage.



use super::State;



/// A set of possible usage errors in the driver.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "log", derive(defmt::Format))]
pub enum Error {
    /// The driver could not read the status register.
    CouldNotReadStatus,

    /// The register bank could not be switched.
    FailedBankSwitch,

    /// The configuration of the device failed.
    FailedDriverConfiguration,

    /// The radio failed to get into a given state.
    FailedModeSet( State ),

    /// Failed to download a payload from the device.
    FailedPacketDownload,

    /// Failed to upload a payload to the device.
    FailedPacketUpload,

    /// Failed to modify a register.
    FailedRegisterWrite,

    /// The given pipe number is not allowed.
    IllegalPipeNumber( u8 ),

    /// The payload is empty or longer than 32 bytes.
    InvalidPayload( usize ),

    /// A transmission reached the maximum number of retries without a response.
    NoReply,

    /// There is no received payload available.
    NoData,

    /// A received payload was wider than the read buffer and was flushed.
    Oversized( u8 ),

    /// The acknowledge wait exceeded its time budget.
    Timeout,

    /// The operation was cancelled through its cancel signal.
    Cancelled,
}



/// A set of possible hardware errors in the driver.
pub enum HardwareError<SPI, CE> {
    /// An error with the SPI hardware.
    Serial( SPI ),

    /// An error with the CE pin.
    ChipEnable( CE ),
}

impl<SPI: core::fmt::Debug, CE: core::fmt::Debug> core::fmt::Debug for HardwareError<SPI, CE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HardwareError::Serial( e ) => f.debug_tuple("Serial").field(e).finish(),
            HardwareError::ChipEnable( e ) => f.debug_tuple("ChipEnable").field(e).finish(),
        }
    }
}

#[cfg(feature = "log")]
impl<SPI, CE> defmt::Format for HardwareError<SPI, CE> {
    fn format(&self, _: defmt::Formatter) {
        // String to format.
        let string = match self {
            HardwareError::Serial( _ ) => defmt::intern!("SPI Serial Error"),
            HardwareError::ChipEnable( _ ) => defmt::intern!("Digital IO Error"),
        };

        // Send the defmt string.
        defmt::export::istr(&string);
    }
}



/// Common error type emitted by the driver.
pub type DriverError<SPI, CE> = (Error, Option<HardwareError<SPI, CE>>);
