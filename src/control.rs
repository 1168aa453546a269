//! Control of the blocking waits of the driver.
//! Bounds the acknowledge poll and allows cancelling long operations.



use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    signal::Signal,
};



/// Cancel signal accepted by `send_until` and `find_receiver_until`.
/// Signal it from any task to stop the operation at its next poll.
pub type Cancel<M> = Signal<M, ()>;

/// Returns `true` if the cancel signal was raised.
pub(crate) fn cancelled<M: RawMutex>(cancel: &Cancel<M>) -> bool {
    cancel.signaled()
}



/// Policy of the acknowledge wait of a transmission.
/// The device retransmits by itself, the driver only polls the STATUS
/// register until TX_DS or MAX_RT is set.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AckWait {
    /// Delay between two reads of the STATUS register [us].
    pub(crate) interval: u32,

    /// Maximum accumulated delay before giving up [us].
    /// `None` waits until the device answers, which never happens if the
    /// device is powered down.
    pub(crate) timeout: Option<u32>,
}

impl Default for AckWait {
    fn default() -> Self {
        Self::new()
    }
}

impl AckWait {
    /// Creates the default wait: 100 us polls for at most 100 ms.
    /// 15 retries with the maximum 4 ms retransmit delay fit in this budget.
    pub const fn new() -> Self {
        Self { interval: 100, timeout: Some(100_000), }
    }

    /// Creates an unbounded wait.
    pub const fn forever() -> Self {
        Self { interval: 100, timeout: None, }
    }

    /// Sets the delay between two polls in microseconds.
    /// A delay of 0 polls back to back.
    pub const fn interval(mut self, us: u32) -> Self {
        self.interval = us;
        self
    }

    /// Sets the time budget of the wait in microseconds.
    pub const fn timeout(mut self, us: u32) -> Self {
        self.timeout = Some(us);
        self
    }

    /// Returns `true` if the elapsed time exceeds the budget.
    pub(crate) const fn expired(&self, elapsed: u32) -> bool {
        match self.timeout {
            Some(timeout) => elapsed >= timeout,
            None => false,
        }
    }
}
