//! Simulated RFM73 device for the driver tests.
//! Models both register banks, the FIFOs and a remote receiver, and records
//! every bus transaction, CE edge and delay in order.



use std::{
    cell::RefCell,
    collections::VecDeque,
    convert::Infallible,
    rc::Rc,
    vec::Vec,
};

use embedded_hal_async::spi::Operation;

use super::*;



/// One recorded interaction with the hardware.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    /// Bytes sent in one SPI transaction.
    Spi( Vec<u8> ),

    /// CE level set.
    Ce( bool ),

    /// Delay requested [us].
    Delay( u32 ),
}

/// Behaviour of the remote device answering acknowledged packets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Peer {
    /// The device never finishes the transmission (powered down radio).
    Silent,

    /// Every packet is acknowledged.
    Acks,

    /// No packet is ever acknowledged, MAX_RT is raised.
    Absent,

    /// Packets are acknowledged only on the given channel and data rate.
    At( u8, DataRate ),
}

pub struct Chip {
    /// Register contents of both banks.
    pub regs: Vec<Vec<Vec<u8>>>,

    /// Active bank.
    pub bank: usize,

    /// Extended feature set active.
    pub features: bool,

    /// Interrupt flags of STATUS.
    pub flags: u8,

    /// RX FIFO.
    pub rx: VecDeque<Vec<u8>>,

    /// TX FIFO.
    pub tx: VecDeque<Vec<u8>>,

    /// Every payload uploaded, with its ACK request.
    pub sent: Vec<(bool, Vec<u8>)>,

    /// Remote device.
    pub peer: Peer,

    /// STATUS reads before a transmission result shows up.
    pub latency: usize,

    /// The TX FIFO reports full whatever it holds.
    pub jammed: bool,

    /// Every payload read is queued again, as under steady traffic.
    pub flooding: bool,

    /// Pending transmission result (`true` for TX_DS) and remaining reads.
    pending: Option<(bool, usize)>,

    /// Recorded interactions.
    pub trace: Vec<Event>,
}

impl Chip {
    fn new() -> Self {
        Self {
            regs: vec![vec![Vec::new(); 32]; 2],
            bank: 0,
            features: false,
            flags: 0,
            rx: VecDeque::new(),
            tx: VecDeque::new(),
            sent: Vec::new(),
            peer: Peer::Acks,
            latency: 0,
            jammed: false,
            flooding: false,
            pending: None,
            trace: Vec::new(),
        }
    }

    /// Value of a bank 0 register byte.
    pub fn reg(&self, address: u8) -> u8 {
        self.regs[0][address as usize].first().copied().unwrap_or(0)
    }

    /// SPI transactions recorded so far.
    pub fn transactions(&self) -> Vec<Vec<u8>> {
        self.trace.iter()
            .filter_map(|event| match event {
                Event::Spi( bytes ) => Some( bytes.clone() ),
                _ => None,
            })
            .collect()
    }

    /// Number of SPI transactions equal to `bytes`.
    pub fn count(&self, bytes: &[u8]) -> usize {
        self.transactions().iter().filter(|t| t.as_slice() == bytes).count()
    }

    /// Forgets the recorded interactions.
    pub fn clear(&mut self) {
        self.trace.clear();
    }

    fn txfull(&self) -> bool {
        self.jammed || (self.tx.len() >= 3)
    }

    fn status(&self) -> u8 {
        let rbank = if self.bank == 1 { 0x80 } else { 0x00 };
        let pipe = if self.rx.is_empty() { 0b1110 } else { 0b0000 };
        let full = if self.txfull() { 0x01 } else { 0x00 };

        rbank | self.flags | pipe | full
    }

    fn fifostatus(&self) -> u8 {
        let mut fifo = 0;
        if self.txfull() { fifo |= 0x20 }
        if self.tx.is_empty() { fifo |= 0x10 }
        if self.rx.len() >= 3 { fifo |= 0x02 }
        if self.rx.is_empty() { fifo |= 0x01 }
        fifo
    }

    /// Advances the pending transmission on every STATUS read.
    fn tick(&mut self) {
        if let Some((acked, remaining)) = self.pending {
            if remaining == 0 {
                self.flags |= if acked { 0x20 } else { 0x10 };
                if acked { self.tx.pop_front(); }
                self.pending = None;
            } else {
                self.pending = Some((acked, remaining - 1));
            }
        }
    }

    /// Decides the fate of an acknowledged packet.
    fn transmit(&mut self) {
        let channel = self.reg(0x05);
        let rate = RfSetup::from( self.reg(0x06) ).datarate();

        let acked = match self.peer {
            Peer::Silent => return,
            Peer::Acks => true,
            Peer::Absent => false,
            Peer::At( ch, dr ) => (ch == channel) && (dr == rate),
        };

        self.pending = Some((acked, self.latency));
    }

    fn exchange(&mut self, buf: &mut [u8]) {
        self.trace.push( Event::Spi( buf.to_vec() ) );

        let cmd = buf[0];
        let address = (cmd & 0x1F) as usize;
        let data = buf[1..].to_vec();

        // Status reads advance the radio before the byte is shifted out.
        if (cmd == 0xFF) || (cmd == 0x07) {
            self.tick();
        }

        buf[0] = self.status();

        match cmd {
            // R_REGISTER
            0x00..=0x1F => {
                let value = match address {
                    0x07 => vec![self.status()],
                    0x17 => vec![self.fifostatus()],
                    0x1D if !self.features => vec![0],
                    _ => self.regs[self.bank][address].clone(),
                };

                for (i, byte) in buf[1..].iter_mut().enumerate() {
                    *byte = value.get(i).copied().unwrap_or(0);
                }
            },

            // W_REGISTER
            0x20..=0x3F => match address {
                0x07 if self.bank == 0 => self.flags &= !(data[0] & 0x70),
                0x1D if !self.features => (),
                _ => self.regs[self.bank][address] = data,
            },

            // ACTIVATE
            0x50 => match data[0] {
                0x53 => self.bank ^= 1,
                0x73 => self.features = !self.features,
                _ => (),
            },

            // R_RX_PL_WID
            0x60 => buf[1] = self.rx.front().map_or(0, |p| p.len() as u8),

            // R_RX_PAYLOAD
            0x61 => {
                let payload = self.rx.pop_front().unwrap_or_default();
                if self.flooding { self.rx.push_back( payload.clone() ) }
                for (i, byte) in buf[1..].iter_mut().enumerate() {
                    *byte = payload.get(i).copied().unwrap_or(0);
                }
                if self.rx.is_empty() { self.flags &= !0x40 }
            },

            // W_TX_PAYLOAD
            0xA0 => {
                self.sent.push( (true, data.clone()) );
                self.tx.push_back( data );
                self.transmit();
            },

            // W_TX_PAYLOAD_NOACK
            0xB0 => {
                self.sent.push( (false, data) );
                self.flags |= 0x20;
            },

            // FLUSH_TX
            0xE1 => {
                self.tx.clear();
                self.pending = None;
            },

            // FLUSH_RX
            0xE2 => self.rx.clear(),

            _ => (),
        }
    }

    /// Queues a received packet and raises RX_DR.
    pub fn deliver(&mut self, payload: &[u8]) {
        self.rx.push_back( payload.to_vec() );
        self.flags |= 0x40;
    }
}



/// Shared handle to the simulated device.
pub type Handle = Rc<RefCell<Chip>>;

pub struct FakeBus( Handle );
pub struct FakePin( Handle );
pub struct FakeDelay( Handle );

pub type FakeDriver = Driver<FakeBus, FakePin, FakeDelay>;

/// Creates a driver over a fresh simulated device.
/// The CE edge of `create` is not recorded.
pub fn fake() -> (FakeDriver, Handle) {
    let chip: Handle = Rc::new( RefCell::new( Chip::new() ) );

    let driver = embassy_futures::block_on( Driver::create(
        FakeBus( chip.clone() ),
        FakePin( chip.clone() ),
        FakeDelay( chip.clone() ),
    )).unwrap();

    chip.borrow_mut().clear();

    (driver, chip)
}



impl embedded_hal_async::spi::ErrorType for FakeBus {
    type Error = Infallible;
}

impl embedded_hal_async::spi::SpiDevice for FakeBus {
    async fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        for operation in operations {
            match operation {
                Operation::TransferInPlace( buf ) => self.0.borrow_mut().exchange( buf ),
                _ => panic!("unexpected SPI operation"),
            }
        }

        Ok( () )
    }
}

impl embedded_hal::digital::ErrorType for FakePin {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().trace.push( Event::Ce(false) );
        Ok( () )
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().trace.push( Event::Ce(true) );
        Ok( () )
    }
}

impl embedded_hal_async::delay::DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().trace.push( Event::Delay( ns / 1000 ) );
    }

    async fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().trace.push( Event::Delay( us ) );
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().trace.push( Event::Delay( ms * 1000 ) );
    }
}
