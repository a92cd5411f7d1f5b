//! Errors that can occur when using an LPS device.
//!
//! Every public operation returns an [`LpsError`], which records the failing operation, the resolved
//! chip name (when identification got that far) and an [`ErrorKind`] describing what went wrong.
//! It is generic over the underlying bus (spi/i2c) error type.

use core::fmt;

use crate::bus::BusKind;
use crate::variant::ChipVariant;

/// Direction of a failed bus transaction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Read,
    Write,
}

/// Returned when the caller's context signals cancellation during a wait.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cancelled;

/// What went wrong.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind<BusError> {
    /// The I2C address is not one the LPS family answers on (0x5C / 0x5D).
    UnsupportedAddress(u8),

    /// WHO_AM_I returned an id that does not belong to a supported chip.
    ///
    /// Could possibly indicate an error with wiring, or a different device on the bus.
    UnsupportedChip(u8),

    /// A bus transaction failed.
    Transport {
        direction: Direction,
        framing: BusKind,
        source: BusError,
    },

    /// The caller cancelled while the driver was waiting on the chip.
    ///
    /// The command that was already written is not undone.
    Cancelled,

    /// The operation has no defined behaviour for this chip.
    UnknownVariantForOperation(ChipVariant),
}

impl<BusError> From<Cancelled> for ErrorKind<BusError> {
    fn from(_: Cancelled) -> Self {
        ErrorKind::Cancelled
    }
}

/// An [`ErrorKind`] tagged with the operation and chip it came from.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LpsError<BusError> {
    operation: &'static str,
    chip: Option<&'static str>,
    kind: ErrorKind<BusError>,
}

impl<BusError> LpsError<BusError> {
    pub(crate) fn new(operation: &'static str, chip: Option<&'static str>, kind: ErrorKind<BusError>) -> Self {
        Self { operation, chip, kind }
    }

    /// Name of the public operation that failed, e.g. `"sense"`.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Display name of the chip, if identification had completed.
    pub fn chip(&self) -> Option<&'static str> {
        self.chip
    }

    pub fn kind(&self) -> &ErrorKind<BusError> {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind<BusError> {
        self.kind
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled)
    }
}

/// Type alias used to simplify return types throughout the driver
pub type LpsResult<T, BusError> = Result<T, LpsError<BusError>>;

impl<BusError: fmt::Debug> fmt::Display for ErrorKind<BusError> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnsupportedAddress(addr) => write!(f, "address 0x{:02x} not supported by device", addr),
            ErrorKind::UnsupportedChip(id) => write!(f, "unexpected chip type 0x{:02x}", id),
            ErrorKind::Transport { direction, framing, source } => {
                let dir = match direction {
                    Direction::Read => "read",
                    Direction::Write => "write",
                };
                write!(f, "transport {} ({}) failed: {:?}", dir, framing.label(), source)
            }
            ErrorKind::Cancelled => f.write_str("cancelled"),
            ErrorKind::UnknownVariantForOperation(variant) => {
                write!(f, "operation not defined for {}", variant.name())
            }
        }
    }
}

impl<BusError: fmt::Debug> fmt::Display for LpsError<BusError> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(chip) = self.chip {
            // Chip names are ASCII; lower-case without allocating.
            for c in chip.chars() {
                write!(f, "{}", c.to_ascii_lowercase())?;
            }
            f.write_str(": ")?;
        } else {
            f.write_str("lps: ")?;
        }
        write!(f, "{}: {}", self.operation, self.kind)
    }
}

impl<BusError: fmt::Debug> core::error::Error for LpsError<BusError> {}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;

    #[test]
    fn display_with_chip() {
        let err: LpsError<&str> = LpsError::new(
            "sense",
            Some("LPS25H"),
            ErrorKind::Transport { direction: Direction::Read, framing: BusKind::FlagFramed, source: "nak" },
        );
        assert_eq!("lps25h: sense: transport read (flag-framed) failed: \"nak\"", format!("{}", err));
    }

    #[test]
    fn display_without_chip() {
        let err: LpsError<()> = LpsError::new("new_i2c", None, ErrorKind::UnsupportedAddress(0x76));
        assert_eq!("lps: new_i2c: address 0x76 not supported by device", format!("{}", err));
    }

    #[test]
    fn cancelled_converts() {
        let kind: ErrorKind<()> = Cancelled.into();
        assert!(matches!(kind, ErrorKind::Cancelled));
        assert!(LpsError::new("boot", Some("LPS22HB"), kind).is_cancelled());
    }
}
