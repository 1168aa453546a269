//! Search of a listening receiver over all channels and data rates.



use embassy_sync::blocking_mutex::raw::{
    NoopRawMutex, RawMutex,
};

use super::*;



/// Payload of every ping.
const PING: u8 = 0xAA;

/// Retransmit delay used while scanning [us].
const PING_DELAY: u16 = 4000;

/// Retransmit count used while scanning.
const PING_RETRIES: u8 = 15;



/// Channel scanner of the RFM73 device.
impl<SPI: SpiDevice, CE: OutputPin, DELAY: DelayNs> Driver<SPI, CE, DELAY> {
    /// Pings every channel from `channel` to 127 at every data rate until a
    /// receiver acknowledges, and returns the channel and data rate it
    /// answered on. The rates are tried in the order of `DataRate::ALL`,
    /// starting at `rate` on the first channel only.
    /// Every ping is sent at maximum power and LNA gain. The device keeps the
    /// parameters of the last ping and is left in TX mode.
    pub async fn find_receiver(&mut self, channel: u8, rate: DataRate) -> Result<Option<(u8, DataRate)>, Failure<SPI, CE>> {
        let never = Cancel::<NoopRawMutex>::new();

        self.find_receiver_until( channel, rate, &never ).await
    }

    /// Scans like `find_receiver` and stops before the next ping, or during
    /// the acknowledge wait, when `cancel` is signaled.
    pub async fn find_receiver_until<M: RawMutex>(&mut self, channel: u8, rate: DataRate, cancel: &Cancel<M>) -> Result<Option<(u8, DataRate)>, Failure<SPI, CE>> {
        self.retries( PING_DELAY, PING_RETRIES ).await?;

        for ch in channel..=MAX_CHANNEL {
            let first = if ch == channel { rate.index() } else { 0 };

            self.setchannel( ch ).await?;

            for dr in &DataRate::ALL[first..] {
                if cancelled( cancel ) {
                    return Err( (Error::Cancelled, None) );
                }

                self.setrf( OutputPower::Plus5dBm, LnaGain::High, *dr ).await?;
                self.clearirqs().await.map_err( fail(Error::FailedRegisterWrite) )?;

                match self.send_until( true, &[PING], cancel ).await {
                    Ok( Transmission::Acknowledged ) => {
                        #[cfg(feature = "log")]
                        defmt::info!("Driver : Receiver found on channel {} at {}", ch, dr);

                        return Ok( Some( (ch, *dr) ) );
                    },

                    Ok( _ ) | Err( (Error::NoReply, _) ) | Err( (Error::Timeout, _) ) => (),

                    Err( e ) => return Err( e ),
                }

                embassy_futures::yield_now().await;
            }
        }

        #[cfg(feature = "log")]
        defmt::debug!("Driver : No receiver found from channel {}", channel);

        Ok( None )
    }
}
