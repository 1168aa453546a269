//! Packet transmission and reception.



use embassy_sync::blocking_mutex::raw::{
    NoopRawMutex, RawMutex,
};

use super::*;



/// Payload reads of one `receive` call. The RX FIFO holds 3 packets, the rest
/// covers packets arriving while it is drained.
const RX_DRAIN_LIMIT: usize = 6;



/// Outcome of a transmission that did not fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "log", derive(defmt::Format))]
pub enum Transmission {
    /// The receiver acknowledged the packet.
    Acknowledged,

    /// The packet was sent without requesting an acknowledge.
    Unconfirmed,

    /// The TX FIFO was full and the payload was not written.
    Dropped,
}



/// High level methods of the RFM73 device.
/// Sending and receiving single packets.
impl<SPI: SpiDevice, CE: OutputPin, DELAY: DelayNs> Driver<SPI, CE, DELAY> {
    /// Sends a payload of 1 to 32 bytes.
    /// With `ack` the call waits for the acknowledge of the receiver according
    /// to the configured `AckWait`. The device is left in TX mode.
    /// WARNING : The device must not stay in TX mode for more than 4 ms.
    pub async fn send(&mut self, ack: bool, payload: &[u8]) -> Result<Transmission, Failure<SPI, CE>> {
        let never = Cancel::<NoopRawMutex>::new();

        self.send_until( ack, payload, &never ).await
    }

    /// Sends a payload like `send` and stops waiting for the acknowledge when
    /// `cancel` is signaled.
    pub async fn send_until<M: RawMutex>(&mut self, ack: bool, payload: &[u8], cancel: &Cancel<M>) -> Result<Transmission, Failure<SPI, CE>> {
        if payload.is_empty() || (payload.len() > MAX_PAYLOAD) {
            return Err( (Error::InvalidPayload(payload.len()), None) );
        }

        self.txmode().await?;
        self.delay.delay_us( TX_SETTLE_DELAY ).await;

        // Flags of earlier transmissions must not answer for this one.
        self.clearirq( false, true, true ).await.map_err( fail(Error::FailedRegisterWrite) )?;

        // Check if there is space in the TX FIFO.
        let fifo = self.fifostatus().await.map_err( fail(Error::CouldNotReadStatus) )?;

        if fifo.tx_full() {
            #[cfg(feature = "log")]
            defmt::warn!("Driver : TX FIFO full, payload dropped");

            return Ok( Transmission::Dropped );
        }

        // Upload the payload.
        let cmd = if ack { Command::WritePayload } else { Command::WritePayloadNoAck };
        self.writecmd( cmd.into(), payload ).await.map_err( fail(Error::FailedPacketUpload) )?;

        if !ack {
            return Ok( Transmission::Unconfirmed );
        }

        let status = self.ackwait( cancel ).await?;

        // Clear the consumed flags.
        self.clearirq( false, status.tx_ds(), status.max_rt() ).await.map_err( fail(Error::FailedRegisterWrite) )?;

        if status.max_rt() {
            #[cfg(feature = "log")]
            defmt::debug!("Driver : No acknowledge received");

            return Err( (Error::NoReply, None) );
        }

        Ok( Transmission::Acknowledged )
    }

    /// Polls the STATUS register until TX_DS or MAX_RT is set.
    async fn ackwait<M: RawMutex>(&mut self, cancel: &Cancel<M>) -> Result<Status, Failure<SPI, CE>> {
        let wait = self.config.ack;
        let mut elapsed: u32 = 0;

        loop {
            if cancelled( cancel ) {
                return Err( (Error::Cancelled, None) );
            }

            let status = self.status().await.map_err( fail(Error::CouldNotReadStatus) )?;

            if status.tx_ds() || status.max_rt() {
                return Ok( status );
            }

            if wait.expired( elapsed ) {
                #[cfg(feature = "log")]
                defmt::warn!("Driver : Acknowledge wait timed out after {} us", elapsed);

                return Err( (Error::Timeout, None) );
            }

            self.delay.delay_us( wait.interval ).await;

            // A zero interval still counts each poll.
            elapsed = elapsed.saturating_add( wait.interval.max(1) );
        }
    }

    /// Reads the received packets into `buf` and returns the length of the
    /// last one. The RX FIFO is drained, earlier packets are overwritten by
    /// later ones. At most 6 packets are read per call, packets still queued
    /// after that are left for the next call.
    /// Packets wider than `buf` are flushed. If the last packet was one of
    /// them the call returns `Error::Oversized` and `buf` is not modified.
    /// With `echo` the last packet is sent back without acknowledge.
    /// The device is left in RX mode.
    pub async fn receive(&mut self, echo: bool, buf: &mut [u8]) -> Result<usize, Failure<SPI, CE>> {
        let status = self.status().await.map_err( fail(Error::CouldNotReadStatus) )?;

        if !status.rx_dr() {
            self.writereg( Register::Status, status.interrupts().into() ).await.map_err( fail(Error::FailedRegisterWrite) )?;
            return Err( (Error::NoData, None) );
        }

        let limit = buf.len().min( MAX_PAYLOAD );
        let mut last: Result<usize, Error> = Err( Error::NoData );

        for _ in 0..RX_DRAIN_LIMIT {
            let width = self.pldwidth().await.map_err( fail(Error::FailedPacketDownload) )?;

            if (width as usize) > limit {
                #[cfg(feature = "log")]
                defmt::warn!("Driver : Flushed a {} byte payload", width);

                self.command( Command::FlushRX ).await.map_err( fail(Error::FailedPacketDownload) )?;
                last = Err( Error::Oversized(width) );
            } else {
                let n = width as usize;
                self.readcmd( Command::ReadPayload.into(), &mut buf[..n] ).await.map_err( fail(Error::FailedPacketDownload) )?;
                last = Ok( n );
            }

            if self.fifostatus().await.map_err( fail(Error::CouldNotReadStatus) )?.rx_empty() {
                break;
            }
        }

        if let (true, Ok(n)) = (echo, last) {
            if n > 0 {
                self.send( false, &buf[..n] ).await?;
            }
        }

        self.rxmode().await?;
        self.writereg( Register::Status, status.interrupts().into() ).await.map_err( fail(Error::FailedRegisterWrite) )?;

        last.map_err( |error| (error, None) )
    }
}
