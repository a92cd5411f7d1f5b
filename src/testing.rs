use crate::bus::{Bus, BusKind, MAX_FRAME_BYTES, MAX_REG_BYTES};
use crate::context::Context;
use crate::error::Cancelled;
use embedded_hal_async::delay::DelayNs;
use heapless::{Deque, LinearMap, Vec};

const MAX_TRANSACTIONS: usize = 64;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FakeError;

impl embedded_hal::i2c::Error for FakeError {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        embedded_hal::i2c::ErrorKind::Other
    }
}

impl embedded_hal::spi::Error for FakeError {
    fn kind(&self) -> embedded_hal::spi::ErrorKind {
        embedded_hal::spi::ErrorKind::Other
    }
}

/// A register access as the chip would see it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Op {
    /// Register index (flag bits stripped) and payload length.
    Read(u8, usize),
    /// Address byte as sent, value.
    Write(u8, u8),
}

/// Raw bytes of one bus transaction.
#[derive(Debug)]
pub struct Transaction {
    write: Vec<u8, MAX_FRAME_BYTES>,
    read_len: usize,
}

impl Transaction {
    pub fn write(&self) -> &[u8] {
        &self.write
    }

    pub fn read_len(&self) -> usize {
        self.read_len
    }
}

type Response = ([u8; MAX_REG_BYTES], usize);

/// Scripted register-level stand-in for an LPS chip.
///
/// Each register holds a queue of responses. Reads pop the queue until one response is left, which
/// is then repeated forever.
pub struct FakeBus {
    kind: BusKind,
    regs: LinearMap<u8, Deque<Response, 8>, 16>,
    log: Vec<Transaction, MAX_TRANSACTIONS>,
    fail_at: Option<usize>,
    last_address: Option<u8>,
}

impl FakeBus {
    pub fn new(kind: BusKind) -> Self {
        FakeBus {
            kind,
            regs: LinearMap::new(),
            log: Vec::new(),
            fail_at: None,
            last_address: None,
        }
    }

    pub fn i2c() -> Self {
        Self::new(BusKind::AddressFramed)
    }

    pub fn spi() -> Self {
        Self::new(BusKind::FlagFramed)
    }

    /// Queues a response for reads of register `reg` (flag bits ignored).
    pub fn with_response(&mut self, reg: u8, data: &[u8]) {
        let mut bytes = [0u8; MAX_REG_BYTES];
        bytes[..data.len()].copy_from_slice(data);

        let reg = reg & 0x7F;
        if self.regs.get(&reg).is_none() {
            self.regs.insert(reg, Deque::new()).unwrap();
        }
        self.regs.get_mut(&reg).unwrap().push_back((bytes, data.len())).unwrap();
    }

    /// A chip answering WHO_AM_I with `id` and zeroed control registers at the given addresses.
    pub fn with_chip(&mut self, id: u8, ctrl_reg1: u8, ctrl_reg2: u8, res_conf: Option<u8>) {
        self.with_response(0x0F, &[id]);
        self.with_response(ctrl_reg1, &[0]);
        self.with_response(ctrl_reg2, &[0]);
        if let Some(res_conf) = res_conf {
            self.with_response(res_conf, &[0]);
        }
    }

    /// Makes the `n`th transaction (0-based) fail.
    pub fn fail_at(&mut self, n: usize) {
        self.fail_at = Some(n);
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.log
    }

    pub fn transaction(&self, n: usize) -> &Transaction {
        &self.log[n]
    }

    /// Device address of the most recent I2C transaction.
    pub fn last_address(&self) -> Option<u8> {
        self.last_address
    }

    /// Decoded view of the transaction log.
    pub fn ops(&self) -> Vec<Op, MAX_TRANSACTIONS> {
        let skip = match self.kind {
            BusKind::AddressFramed => 0,
            BusKind::FlagFramed => 1,
        };

        self.log
            .iter()
            .map(|t| {
                if t.read_len == 0 {
                    Op::Write(t.write[0], t.write[1])
                } else {
                    Op::Read(t.write[0] & 0x7F, t.read_len - skip)
                }
            })
            .collect()
    }

    fn respond(&mut self, reg: u8, out: &mut [u8]) {
        let Some(queue) = self.regs.get_mut(&reg) else {
            panic!("No mocked value for register 0x{:x} and length {}", reg, out.len());
        };

        let (bytes, len) = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            *queue.front().unwrap()
        };

        assert!(len >= out.len(), "Mocked value for register 0x{:x} is {} bytes, {} requested", reg, len, out.len());
        out.copy_from_slice(&bytes[..out.len()]);
    }
}

impl Bus for FakeBus {
    type Error = FakeError;

    fn kind(&self) -> BusKind {
        self.kind
    }

    async fn transact(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), FakeError> {
        let index = self.log.len();
        self.log
            .push(Transaction {
                write: Vec::from_slice(write).unwrap(),
                read_len: read.len(),
            })
            .unwrap();

        if self.fail_at == Some(index) {
            return Err(FakeError);
        }

        if read.is_empty() {
            return Ok(());
        }

        let reg = write[0] & 0x7F;
        match self.kind {
            BusKind::AddressFramed => self.respond(reg, read),
            BusKind::FlagFramed => {
                read[0] = 0xFF;
                self.respond(reg, &mut read[1..]);
            }
        }

        Ok(())
    }
}

impl embedded_hal::i2c::ErrorType for FakeBus {
    type Error = FakeError;
}

impl embedded_hal_async::i2c::I2c for FakeBus {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [embedded_hal::i2c::Operation<'_>],
    ) -> Result<(), FakeError> {
        use embedded_hal::i2c::Operation;

        self.last_address = Some(address);
        match operations {
            [Operation::Write(write)] => Bus::transact(self, *write, &mut []).await,
            [Operation::Write(write), Operation::Read(read)] => Bus::transact(self, write, &mut **read).await,
            _ => panic!("Unexpected I2C operation sequence"),
        }
    }
}

impl embedded_hal::spi::ErrorType for FakeBus {
    type Error = FakeError;
}

impl embedded_hal_async::spi::SpiDevice for FakeBus {
    async fn transaction(&mut self, operations: &mut [embedded_hal::spi::Operation<'_, u8>]) -> Result<(), FakeError> {
        use embedded_hal::spi::Operation;

        match operations {
            [Operation::Write(write)] => Bus::transact(self, *write, &mut []).await,
            [Operation::Transfer(read, write)] => Bus::transact(self, write, &mut **read).await,
            _ => panic!("Unexpected SPI operation sequence"),
        }
    }
}

pub struct FakeDelay {
    total_ns: u64,
}

impl FakeDelay {
    pub fn new() -> Self {
        Self { total_ns: 0 }
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}

/// Context that records waits and cancels on the `n`th one.
pub struct FakeContext {
    waits: Vec<u32, MAX_TRANSACTIONS>,
    cancel_at: Option<usize>,
}

impl FakeContext {
    pub fn new() -> Self {
        Self { waits: Vec::new(), cancel_at: None }
    }

    pub fn cancelling_at(n: usize) -> Self {
        Self { waits: Vec::new(), cancel_at: Some(n) }
    }

    pub fn waits(&self) -> &[u32] {
        &self.waits
    }
}

impl Context for FakeContext {
    async fn wait_ms(&mut self, ms: u32) -> Result<(), Cancelled> {
        let index = self.waits.len();
        self.waits.push(ms).unwrap();

        if self.cancel_at == Some(index) {
            return Err(Cancelled);
        }

        Ok(())
    }
}
