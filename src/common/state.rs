//! Register bank selection of RFM73 devices.



/// One of the two mutually exclusive register banks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "log", derive(defmt::Format))]
pub enum Bank {
    /// Operational registers.
    Zero,

    /// Analog / RF calibration registers.
    One,
}

impl Bank {
    /// Returns `true` if the RBANK status bit corresponds to this bank.
    pub const fn matches(self, rbank: bool) -> bool {
        match self {
            Bank::Zero => !rbank,
            Bank::One  =>  rbank,
        }
    }
}

impl From<bool> for Bank {
    fn from(rbank: bool) -> Self {
        if rbank { Bank::One } else { Bank::Zero }
    }
}
