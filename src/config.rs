/// How the chip produces samples.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementMode {
    /// The chip stays powered down between readings. Every [`sense`](crate::Lps::sense) powers it up,
    /// configures high-precision averaging and triggers a single conversion.
    OneShot,
    /// The chip free-runs at its default output data rate after a single initialisation write.
    #[default]
    Continuous,
}

/// Driver options.
///
/// # Examples
///
/// ```rust
/// use lps_rs::config::{MeasurementMode, Options};
///
/// let options = Options::default()
///     .mode(MeasurementMode::OneShot)
///     .poll_interval_ms(2);
/// assert_eq!(MeasurementMode::OneShot, options.measurement_mode());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Options {
    pub(crate) mode: MeasurementMode,
    pub(crate) poll_interval_ms: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: MeasurementMode::Continuous,
            // BOOT takes about 2.2 ms; SWRESET and a one-shot conversion finish well within that order.
            poll_interval_ms: 5,
        }
    }
}

impl Options {
    pub fn mode(mut self, mode: MeasurementMode) -> Self {
        self.mode = mode;

        self
    }

    /// Sets how long to wait between reads of CTRL_REG2 while a command bit is still set.
    pub fn poll_interval_ms(mut self, poll_interval_ms: u32) -> Self {
        self.poll_interval_ms = poll_interval_ms;

        self
    }

    pub fn measurement_mode(&self) -> MeasurementMode {
        self.mode
    }

    pub fn poll_interval(&self) -> u32 {
        self.poll_interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::default();
        assert_eq!(MeasurementMode::Continuous, options.measurement_mode());
        assert_eq!(5, options.poll_interval());
    }
}
