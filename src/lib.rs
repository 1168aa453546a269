//! RFM73 (BK2425) no-std multi-level device driver for executor agnostic embedded `Rust`.
//!
//! What do each of these mean:
//!   - RFM73 : Works with RFM73 modules and bare BK2425 / BK2421 transceivers.
//!   - No std : The driver works in all embedded environments.
//!   - Multi-level : The driver exposes both a low level and a high level API.
//!   - Executor agnostic : The driver does not depend on a specific executor.
//!
//! The driver owns the SPI device, the CE pin and a delay provider. It must be
//! owned by a single task, all methods take `&mut self`.



#![cfg_attr(not(test), no_std)]



pub mod common;



mod config;
mod configure;
mod control;
mod diagnostics;
mod error;
mod mode;
mod pipe;
mod scanner;
mod state;
mod transceiver;

#[cfg(test)]
mod testing;




pub use config::*;

pub use control::*;

pub use error::*;

pub use pipe::*;

pub use state::*;

pub use transceiver::*;



use common::*;

use embedded_hal::digital::OutputPin;

use embedded_hal_async::{
    delay::DelayNs,
    spi::SpiDevice,
};



/// Maximum length of a payload.
pub const MAX_PAYLOAD: usize = 32;

/// Highest RF channel of the device.
pub const MAX_CHANNEL: u8 = 127;

/// Delay after power on before the device accepts commands [ms].
pub(crate) const POWER_ON_DELAY: u32 = 200;

/// Delay after writing the calibration block [ms].
pub(crate) const CALIBRATION_DELAY: u32 = 50;

/// Delay after setting the PWR_UP bit [ms].
pub(crate) const POWER_UP_DELAY: u32 = 3;

/// Delay after entering TX mode before uploading a payload [us].
pub(crate) const TX_SETTLE_DELAY: u32 = 200;

/// Length of the CE pulse that transmits one packet [us].
pub(crate) const TX_PULSE: u32 = 20;



/// Hardware error type emitted by a driver over `SPI` and `CE`.
pub type HWError<SPI, CE> = HardwareError<
    <SPI as embedded_hal_async::spi::ErrorType>::Error,
    <CE as embedded_hal::digital::ErrorType>::Error,
>;

/// Common error type emitted by a driver over `SPI` and `CE`.
pub type Failure<SPI, CE> = DriverError<
    <SPI as embedded_hal_async::spi::ErrorType>::Error,
    <CE as embedded_hal::digital::ErrorType>::Error,
>;

/// Attaches a driver error to a hardware error.
pub(crate) fn fail<H>(error: Error) -> impl FnOnce(H) -> (Error, Option<H>) {
    move |hwe| (error, Some(hwe))
}



pub struct Driver<SPI, CE, DELAY> {
    /// The SPI interface to the RFM73 device.
    /// Chip select is handled by the `SpiDevice`, one transaction per command.
    spi: SPI,

    /// The CE pin output to the RFM73 device.
    ce: CE,

    /// Delay provider for settle times and acknowledge polls.
    delay: DELAY,

    /// Current state of the device.
    state: State,

    /// Last register bank selected by the driver.
    bank: Bank,

    /// Current configuration of the device.
    config: Config,
}

/// Common high level method for general use of RFM73 devices.
/// Creating the driver.
impl<SPI: SpiDevice, CE: OutputPin, DELAY: DelayNs> Driver<SPI, CE, DELAY> {
    /// Creates a new RFM73 driver.
    /// No command is sent to the device, call `initialize` or `configure`
    /// before using it.
    pub async fn create(spi: SPI, mut ce: CE, delay: DELAY) -> Result<Self, Failure<SPI, CE>> {
        // Disable CE.
        ce.set_low().map_err( HWError::<SPI, CE>::ChipEnable ).map_err( fail(Error::FailedModeSet(State::PowerDown)) )?;

        Ok( Self {
            spi,
            ce,
            delay,
            state: State::PowerDown,
            bank: Bank::Zero,
            config: Config::new(),
        })
    }

    /// Returns the current state of the device.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the last register bank selected through the driver.
    pub fn bank(&self) -> Bank {
        self.bank
    }

    /// Returns the configuration applied to the device.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Releases the hardware owned by the driver.
    pub fn release(self) -> (SPI, CE, DELAY) {
        (self.spi, self.ce, self.delay)
    }
}


/// Register bank management.
/// The active bank is only visible through the RBANK bit of STATUS and can
/// only be toggled, so every switch is a read followed by a conditional toggle.
impl<SPI: SpiDevice, CE: OutputPin, DELAY: DelayNs> Driver<SPI, CE, DELAY> {
    /// Reads `check` and sends the `Activate` command with `key` only if the
    /// value read does not satisfy `satisfied`.
    /// Returns `true` if the command was sent.
    pub async fn reconcile<F: Fn(u8) -> bool>(&mut self, check: Register, satisfied: F, key: ActivateKey) -> Result<bool, HWError<SPI, CE>> {
        // Read the current state.
        let value = self.readreg(check).await?;

        if satisfied(value) {
            return Ok( false );
        }

        // Toggle the state.
        self.activate(key).await?;

        Ok( true )
    }

    /// Makes `target` the active register bank.
    /// Does not toggle if the device already reports the target bank.
    pub async fn selectbank(&mut self, target: Bank) -> Result<(), Failure<SPI, CE>> {
        let toggled = self.reconcile(
            Register::Status,
            |raw| target.matches( Status::from(raw).rbank() ),
            ActivateKey::ToggleBank,
        ).await.map_err( fail(Error::FailedBankSwitch) )?;

        if toggled {
            #[cfg(feature = "log")]
            defmt::trace!("Driver : Switched to register bank {}", target);
        }

        self.bank = target;

        Ok( () )
    }

    /// Activates the extended command set (R_RX_PL_WID, W_ACK_PAYLOAD and
    /// W_TX_PAYLOAD_NOACK) if the FEATURE register reads as inactive.
    /// Returns `true` if the activation command was sent.
    pub async fn activatefeatures(&mut self) -> Result<bool, Failure<SPI, CE>> {
        self.reconcile( Register::Features, |raw| raw != 0, ActivateKey::Features ).await
            .map_err( fail(Error::FailedDriverConfiguration) )
    }
}


/// Basic methods for interacting with the RFM73 device.
/// Writing and reading buffers / commands / registers through SPI.
/// Every method is a single SPI transaction and returns the STATUS register
/// shifted out with the command byte unless it returns a register value.
impl<SPI: SpiDevice, CE: OutputPin, DELAY: DelayNs> Driver<SPI, CE, DELAY> {
    /// Low level function to send a command followed by up to 32 bytes.
    /// Longer data is truncated to 32 bytes.
    pub async fn writecmd(&mut self, cmd: u8, data: &[u8]) -> Result<Status, HWError<SPI, CE>> {
        let n = data.len().min(MAX_PAYLOAD);

        // Create the command buffer.
        let mut buf = [0u8; MAX_PAYLOAD + 1];
        buf[0] = cmd;
        buf[1..=n].copy_from_slice( &data[..n] );

        // Perform the transfer.
        self.spi.transfer_in_place( &mut buf[..=n] ).await.map_err( HWError::<SPI, CE>::Serial )?;

        Ok( Status::from( buf[0] ) )
    }

    /// Low level function to send a command and read up to 32 bytes back.
    /// Reads `out.len()` bytes, at most 32.
    pub async fn readcmd(&mut self, cmd: u8, out: &mut [u8]) -> Result<Status, HWError<SPI, CE>> {
        let n = out.len().min(MAX_PAYLOAD);

        // Create the command buffer.
        let mut buf = [0u8; MAX_PAYLOAD + 1];
        buf[0] = cmd;

        // Perform the transfer.
        self.spi.transfer_in_place( &mut buf[..=n] ).await.map_err( HWError::<SPI, CE>::Serial )?;

        out[..n].copy_from_slice( &buf[1..=n] );

        Ok( Status::from( buf[0] ) )
    }

    /// Low level function to write a buffer to a register, starting at byte 0.
    pub async fn writebuf<R: Into<u8>>(&mut self, r: R, data: &[u8]) -> Result<Status, HWError<SPI, CE>> {
        self.writecmd( Command::WriteRegister.register(r.into()), data ).await
    }

    /// Low level function to read a multi-byte register into a buffer.
    pub async fn readbuf<R: Into<u8>>(&mut self, r: R, out: &mut [u8]) -> Result<Status, HWError<SPI, CE>> {
        self.readcmd( Command::ReadRegister.register(r.into()), out ).await
    }

    /// Low level function to write to a register.
    pub async fn writereg<R: Into<u8>>(&mut self, r: R, v: u8) -> Result<Status, HWError<SPI, CE>> {
        self.writebuf( r, &[v] ).await
    }

    /// Low level function to read a register.
    pub async fn readreg<R: Into<u8>>(&mut self, r: R) -> Result<u8, HWError<SPI, CE>> {
        let mut value = [0u8];
        self.readbuf( r, &mut value ).await?;

        Ok( value[0] )
    }

    /// Low level function to send a 1 byte command.
    pub async fn command(&mut self, c: Command) -> Result<Status, HWError<SPI, CE>> {
        self.writecmd( c.into(), &[] ).await
    }

    /// Low level function to send the `Activate` command with its key.
    pub async fn activate(&mut self, key: ActivateKey) -> Result<Status, HWError<SPI, CE>> {
        self.writecmd( Command::Activate.into(), &[key.into()] ).await
    }

    /// Reads the device's STATUS register with a NOP command.
    pub async fn status(&mut self) -> Result<Status, HWError<SPI, CE>> {
        self.command( Command::NOP ).await
    }

    /// Reads the device's FIFO STATUS register.
    pub async fn fifostatus(&mut self) -> Result<FifoStatus, HWError<SPI, CE>> {
        Ok( FifoStatus::from( self.readreg(Register::FIFOStatus).await? ) )
    }

    /// Reads the payload width of the top level RX FIFO packet.
    pub async fn pldwidth(&mut self) -> Result<u8, HWError<SPI, CE>> {
        let mut width = [0u8];
        self.readcmd( Command::PayloadWidth.into(), &mut width ).await?;

        Ok( width[0] )
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    use embassy_futures::block_on;
    use embedded_hal_mock::eh1::{
        delay::NoopDelay,
        digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction},
        spi::{Mock as SpiMock, Transaction as SpiTransaction},
    };

    type MockDriver = Driver<SpiMock<u8>, PinMock, NoopDelay>;

    /// Creates a driver over mocks expecting the given SPI transactions.
    fn mocked(spi: &[SpiTransaction<u8>]) -> (MockDriver, SpiMock<u8>, PinMock) {
        let spi = SpiMock::new(spi);
        let ce = PinMock::new(&[PinTransaction::set(PinState::Low)]);

        let driver = block_on( Driver::create(spi.clone(), ce.clone(), NoopDelay::new()) )
            .unwrap();

        (driver, spi, ce)
    }

    /// One SPI transaction exchanging `sent` for `received`.
    fn exchange(sent: Vec<u8>, received: Vec<u8>) -> [SpiTransaction<u8>; 3] {
        [
            SpiTransaction::transaction_start(),
            SpiTransaction::transfer_in_place(sent, received),
            SpiTransaction::transaction_end(),
        ]
    }

    #[test]
    fn register_commands_carry_the_address() {
        let expectations = [
            exchange(vec![0b0010_0101, 0x17], vec![0x0E, 0x00]),
            exchange(vec![0b0000_0101, 0x00], vec![0x0E, 0x17]),
        ].concat();

        let (mut driver, mut spi, mut ce) = mocked(&expectations);

        let status = block_on( driver.writereg(Register::RFChannel, 0x17) ).unwrap();
        let value = block_on( driver.readreg(Register::RFChannel) ).unwrap();

        assert_eq!(u8::from(status), 0x0E);
        assert_eq!(value, 0x17);

        spi.done();
        ce.done();
    }

    #[test]
    fn fixed_opcodes_match_the_command_table() {
        let expectations = [
            exchange(vec![0b1110_0001], vec![0x0E]),
            exchange(vec![0b1110_0010], vec![0x0E]),
            exchange(vec![0b1110_0011], vec![0x0E]),
            exchange(vec![0b1111_1111], vec![0x0E]),
            exchange(vec![0b0101_0000, 0x53], vec![0x0E, 0x00]),
            exchange(vec![0b0101_0000, 0x73], vec![0x8E, 0x00]),
            exchange(vec![0b0110_0000, 0x00], vec![0x0E, 0x05]),
        ].concat();

        let (mut driver, mut spi, mut ce) = mocked(&expectations);

        block_on(async {
            driver.command(Command::FlushTX).await.unwrap();
            driver.command(Command::FlushRX).await.unwrap();
            driver.command(Command::ReuseTX).await.unwrap();
            driver.status().await.unwrap();
            driver.activate(ActivateKey::ToggleBank).await.unwrap();

            let status = driver.activate(ActivateKey::Features).await.unwrap();
            assert!( status.rbank() );

            assert_eq!( driver.pldwidth().await.unwrap(), 5 );
        });

        spi.done();
        ce.done();
    }

    #[test]
    fn buffers_are_sent_in_order() {
        let expectations = [
            exchange(vec![0x2A, 0x34, 0x43, 0x10, 0x10, 0x01], vec![0x0E, 0, 0, 0, 0, 0]),
            exchange(vec![0x0B, 0, 0, 0, 0, 0], vec![0x0E, 0x39, 0x38, 0x37, 0x36, 0xC2]),
        ].concat();

        let (mut driver, mut spi, mut ce) = mocked(&expectations);

        let mut address = [0u8; 5];

        block_on(async {
            driver.writebuf(Register::RX0Address, &[0x34, 0x43, 0x10, 0x10, 0x01]).await.unwrap();
            driver.readbuf(Register::RX1Address, &mut address).await.unwrap();
        });

        assert_eq!(address, [0x39, 0x38, 0x37, 0x36, 0xC2]);

        spi.done();
        ce.done();
    }

    #[test]
    fn selecting_the_active_bank_only_reads_status() {
        let expectations = [
            // Bank 0 already active.
            exchange(vec![0x07, 0x00], vec![0x0E, 0x0E]),
            // Bank 1 requested, toggle.
            exchange(vec![0x07, 0x00], vec![0x0E, 0x0E]),
            exchange(vec![0x50, 0x53], vec![0x0E, 0x00]),
        ].concat();

        let (mut driver, mut spi, mut ce) = mocked(&expectations);

        block_on(async {
            driver.selectbank(Bank::Zero).await.unwrap();
            driver.selectbank(Bank::One).await.unwrap();
        });

        assert_eq!(driver.bank(), Bank::One);

        spi.done();
        ce.done();
    }

    #[test]
    fn repeated_bank_selection_toggles_once() {
        let (mut driver, chip) = fake();

        block_on(async {
            driver.selectbank(Bank::One).await.unwrap();
            driver.selectbank(Bank::One).await.unwrap();
        });

        assert_eq!(chip.borrow().count(&[0x50, 0x53]), 1);
        assert_eq!(chip.borrow().bank, 1);
    }

    #[test]
    fn registers_round_trip_per_bank() {
        let (mut driver, _chip) = fake();

        block_on(async {
            driver.selectbank(Bank::Zero).await.unwrap();
            driver.writereg(Register::RFChannel, 0x42).await.unwrap();
            driver.writebuf(Register::TXAddress, &[1, 2, 3, 4, 5]).await.unwrap();

            driver.selectbank(Bank::One).await.unwrap();
            driver.writereg(Register::RFChannel, 0x11).await.unwrap();
            assert_eq!( driver.readreg(Register::RFChannel).await.unwrap(), 0x11 );

            driver.selectbank(Bank::Zero).await.unwrap();
            assert_eq!( driver.readreg(Register::RFChannel).await.unwrap(), 0x42 );

            let mut address = [0u8; 5];
            driver.readbuf(Register::TXAddress, &mut address).await.unwrap();
            assert_eq!( address, [1, 2, 3, 4, 5] );
        });
    }

    #[test]
    fn features_are_not_toggled_when_active() {
        let (mut driver, chip) = fake();
        chip.borrow_mut().features = true;
        chip.borrow_mut().regs[0][0x1D] = vec![0x07];

        let sent = block_on( driver.activatefeatures() ).unwrap();

        assert!( !sent );
        assert_eq!(chip.borrow().count(&[0x50, 0x73]), 0);
        assert!( chip.borrow().features );
    }

    #[test]
    fn inactive_features_are_activated() {
        let (mut driver, chip) = fake();

        let sent = block_on( driver.activatefeatures() ).unwrap();

        assert!( sent );
        assert!( chip.borrow().features );
    }
}
