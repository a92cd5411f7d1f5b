//! Register access on top of a raw [`Bus`].
//!
//! Frames every access for the bus it owns, reports writes to the [`Observer`] and tags transaction
//! failures with their direction and framing. Nothing is retried here.

use crate::bus::{Bus, BusKind, Frame, MAX_FRAME_BYTES, MAX_REG_BYTES};
use crate::error::{Direction, ErrorKind};
use crate::observer::Observer;
use crate::register::Readable;

pub(crate) type TransportResult<T, BusError> = Result<T, ErrorKind<BusError>>;

pub(crate) struct Transport<B, O> {
    bus: B,
    observer: O,
    kind: BusKind,
}

impl<B: Bus, O: Observer> Transport<B, O> {
    pub(crate) fn new(bus: B, observer: O) -> Self {
        let kind = bus.kind();
        Self { bus, observer, kind }
    }

    pub(crate) fn observer(&mut self) -> &mut O {
        &mut self.observer
    }

    pub(crate) fn release(self) -> (B, O) {
        (self.bus, self.observer)
    }

    /// Reads `out.len()` bytes starting at `addr` in one transaction.
    ///
    /// Only the first [`MAX_REG_BYTES`] bytes of `out` are filled.
    pub(crate) async fn read_register(&mut self, addr: u8, out: &mut [u8]) -> TransportResult<(), B::Error> {
        let len = out.len().min(MAX_REG_BYTES);
        let out = &mut out[..len];

        let frame = Frame::read(self.kind, addr, out.len());
        let mut rx = [0u8; MAX_FRAME_BYTES];
        let rx = &mut rx[..frame.rx_len()];

        self.bus
            .transact(frame.tx(), rx)
            .await
            .map_err(|source| ErrorKind::Transport { direction: Direction::Read, framing: self.kind, source })?;

        frame.unpack(rx, out);
        Ok(())
    }

    /// Reads a fixed-address register using its typed marker.
    pub(crate) async fn read<R: Readable>(&mut self) -> TransportResult<R::Out, B::Error> {
        const { assert!(R::N <= MAX_REG_BYTES, "register burst longer than MAX_REG_BYTES") };

        let mut buf = [0u8; MAX_REG_BYTES];
        self.read_register(R::ADDR, &mut buf[..R::N]).await?;

        Ok(R::decode(&buf[..R::N]))
    }

    /// Writes each `(addr, value)` pair as its own transaction, in order.
    ///
    /// Stops at the first failing pair; pairs already written stay written.
    pub(crate) async fn write_commands(&mut self, pairs: &[(u8, u8)]) -> TransportResult<(), B::Error> {
        for &(addr, value) in pairs {
            self.observer.write_command(self.kind, addr, value);

            let frame = Frame::write(self.kind, addr, value);
            self.bus
                .transact(frame.tx(), &mut [])
                .await
                .map_err(|source| ErrorKind::Transport { direction: Direction::Write, framing: self.kind, source })?;
        }

        Ok(())
    }

    pub(crate) async fn write_register(&mut self, addr: u8, value: u8) -> TransportResult<(), B::Error> {
        self.write_commands(&[(addr, value)]).await
    }
}
