use crate::bus::{Bus, I2c, Spi};
use crate::config::{MeasurementMode, Options};
use crate::context::Context;
use crate::error::{ErrorKind, LpsError, LpsResult};
use crate::measurement::{pressure_from_raw, Reading};
use crate::observer::{NoopObserver, Observer};
use crate::register::ctrl_reg1::{ONE_SHOT_READY, POWER_DOWN};
use crate::register::ctrl_reg2::{Command, SWRESET};
use crate::register::data::{PressOut, PressTempOut, TempOut};
use crate::register::Readable;
use crate::transport::{Transport, TransportResult};
use crate::variant::{self, ChipVariant, ControlRegisters, RegisterMap, ResetStrategy};
use embedded_hal::i2c::SevenBitAddress;

/// Type alias for an LPS chip communicating over I2C
pub type LpsI2c<T, O = NoopObserver> = Lps<I2c<T>, O>;

/// Type alias for an LPS chip communicating over SPI
pub type LpsSpi<T, O = NoopObserver> = Lps<Spi<T>, O>;

/// The two I2C addresses the family answers on, selected by the SA0 pin (low, high).
pub const I2C_ADDRESSES: [SevenBitAddress; 2] = [0x5C, 0x5D];

/// Time given to the chip to reload its trimming parameters after BOOT has cleared.
const BOOT_SETTLE_MS: u32 = 10;

/// Fixed waits of the LPS331AP software reset sequence.
const RESET_SETTLE_MS: u32 = 5;

/// Where the driver's mode state machine stands.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Uninitialized,
    /// Powered down between readings; every [`Lps::sense`] runs a full one-shot sequence.
    OneShotArmed,
    /// CTRL_REG1 has been written with the initial control byte; the chip free-runs.
    ContinuousRunning,
}

/// Main LPS driver struct
///
/// One instance drives one physical chip and owns its bus for its whole lifetime. It is not meant
/// to be shared between tasks without external locking.
pub struct Lps<B, O = NoopObserver> {
    transport: Transport<B, O>,
    variant: ChipVariant,
    regs: RegisterMap,
    init_cmd: u8,
    state: State,
    poll_interval_ms: u32,
}

impl<T> LpsI2c<T>
where
    T: embedded_hal_async::i2c::I2c,
{
    /// Constructs a new driver instance that communicates over I2C.
    ///
    /// Only addresses in [`I2C_ADDRESSES`] are accepted; any other address fails with
    /// [`ErrorKind::UnsupportedAddress`] before anything is sent on the bus.
    ///
    /// This function will:
    /// - Identify the chip through WHO_AM_I (0x0F)
    /// - Read the control registers for diagnostics
    /// - Apply the given [`Options`]
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use embedded_hal_async::i2c::I2c;
    /// # use lps_rs::LpsResult;
    ///  use lps_rs::Lps;
    ///  use lps_rs::config::Options;
    /// # async fn demo<I: I2c>(i2c: I) -> LpsResult<(), I::Error> {
    ///
    ///  let device = Lps::new_i2c(i2c, 0x5C, Options::default()).await?;
    ///  println!("found {}", device.name());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new_i2c(i2c: T, address: SevenBitAddress, options: Options) -> LpsResult<Self, T::Error> {
        Self::new_i2c_with_observer(i2c, address, options, NoopObserver).await
    }
}

impl<T, O> LpsI2c<T, O>
where
    T: embedded_hal_async::i2c::I2c,
    O: Observer,
{
    /// Like [`Lps::new_i2c`], reporting diagnostics to `observer`.
    pub async fn new_i2c_with_observer(
        i2c: T,
        address: SevenBitAddress,
        options: Options,
        observer: O,
    ) -> LpsResult<Self, T::Error> {
        if !I2C_ADDRESSES.contains(&address) {
            return Err(LpsError::new("new_i2c", None, ErrorKind::UnsupportedAddress(address)));
        }

        Self::new(I2c::new(i2c, address), options, observer).await
    }
}

impl<T> LpsSpi<T>
where
    T: embedded_hal_async::spi::SpiDevice,
{
    /// Constructs a new driver instance that communicates over SPI (mode 0 or 3).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use embedded_hal_async::spi::SpiDevice;
    /// # use lps_rs::LpsResult;
    ///  use lps_rs::Lps;
    ///  use lps_rs::config::{MeasurementMode, Options};
    /// # async fn demo<S: SpiDevice>(spi: S) -> LpsResult<(), S::Error> {
    ///
    ///  let device = Lps::new_spi(spi, Options::default().mode(MeasurementMode::OneShot)).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new_spi(spi: T, options: Options) -> LpsResult<Self, T::Error> {
        Self::new_spi_with_observer(spi, options, NoopObserver).await
    }
}

impl<T, O> LpsSpi<T, O>
where
    T: embedded_hal_async::spi::SpiDevice,
    O: Observer,
{
    /// Like [`Lps::new_spi`], reporting diagnostics to `observer`.
    pub async fn new_spi_with_observer(spi: T, options: Options, observer: O) -> LpsResult<Self, T::Error> {
        Self::new(Spi::new(spi), options, observer).await
    }
}

impl<B, O> Lps<B, O>
where
    B: Bus,
    O: Observer,
{
    /// Creates a new driver instance on top of any [`Bus`].
    ///
    /// Fails with [`ErrorKind::UnsupportedChip`] if WHO_AM_I does not match a supported chip.
    pub async fn new(bus: B, options: Options, observer: O) -> LpsResult<Self, B::Error> {
        let mut transport = Transport::new(bus, observer);

        let variant = variant::identify(&mut transport)
            .await
            .map_err(|kind| LpsError::new("new", None, kind))?;

        variant::read_control_registers(&mut transport, variant)
            .await
            .map_err(|kind| LpsError::new("new", Some(variant.name()), kind))?;

        let mut device = Lps {
            transport,
            variant,
            regs: variant.register_map(),
            init_cmd: variant.initial_control_byte(),
            state: State::Uninitialized,
            poll_interval_ms: options.poll_interval_ms,
        };

        device.init(&options).await?;

        Ok(device)
    }

    fn wrap(&self, operation: &'static str) -> impl FnOnce(ErrorKind<B::Error>) -> LpsError<B::Error> + use<B, O> {
        let chip = self.variant.name();
        move |kind| LpsError::new(operation, Some(chip), kind)
    }

    /// Applies `options`.
    ///
    /// - [`MeasurementMode::OneShot`] writes nothing; the chip is configured on every [`sense`](Self::sense).
    /// - [`MeasurementMode::Continuous`] writes the initial control byte to CTRL_REG1 in a single
    ///   transaction, after which the chip free-runs.
    ///
    /// Calling it again replays the transition.
    pub async fn init(&mut self, options: &Options) -> LpsResult<(), B::Error> {
        self.poll_interval_ms = options.poll_interval_ms;

        match options.mode {
            MeasurementMode::OneShot => {
                self.state = State::OneShotArmed;
            }
            MeasurementMode::Continuous => {
                self.transport
                    .write_register(self.regs.ctrl_reg1, self.init_cmd)
                    .await
                    .map_err(self.wrap("init"))?;
                self.state = State::ContinuousRunning;
            }
        }

        Ok(())
    }

    /// Writes `mask` to CTRL_REG2 and polls it until every bit of `mask` reads back as zero.
    ///
    /// Between reads the driver waits the configured poll interval on `ctx`. There is no retry
    /// limit: the loop ends when the chip clears the bits or `ctx` cancels, in which case
    /// [`ErrorKind::Cancelled`] is returned and nothing more is sent on the bus.
    pub async fn set_and_wait_clear<C: Context>(&mut self, ctx: &mut C, mask: u8) -> LpsResult<(), B::Error> {
        self.command_and_poll(ctx, mask).await.map_err(self.wrap("set_and_wait_clear"))
    }

    async fn command_and_poll<C: Context>(&mut self, ctx: &mut C, mask: u8) -> TransportResult<(), B::Error> {
        self.transport.write_register(self.regs.ctrl_reg2, mask).await?;

        let mut b = [0u8; 1];
        loop {
            self.transport.read_register(self.regs.ctrl_reg2, &mut b).await?;
            if b[0] & mask == 0 {
                return Ok(());
            }

            ctx.wait_ms(self.poll_interval_ms).await?;
        }
    }

    /// Reboots the memory content (BOOT, CTRL_REG2 bit 7).
    ///
    /// Waits until BOOT clears, then gives the chip another 10 ms to settle.
    pub async fn boot<C: Context>(&mut self, ctx: &mut C) -> LpsResult<(), B::Error> {
        self.command_and_poll(ctx, Command::Boot.mask()).await.map_err(self.wrap("boot"))?;

        ctx.wait_ms(BOOT_SETTLE_MS)
            .await
            .map_err(ErrorKind::from)
            .map_err(self.wrap("boot"))
    }

    /// Triggers a software reset (SWRESET, CTRL_REG2 bit 2).
    ///
    /// On LPS25H and LPS22HB the bit clears itself and is polled. The LPS331AP does not clear it, so
    /// the driver sets it, waits 5 ms, clears it, waits another 5 ms and reads out the output
    /// registers to reset STATUS_REG.
    ///
    /// **Note:** This resets the chip's registers, not the driver. Call [`init`](Self::init) afterwards to
    /// restore continuous sampling.
    pub async fn software_reset<C: Context>(&mut self, ctx: &mut C) -> LpsResult<(), B::Error> {
        let result = match self.variant.reset_strategy() {
            ResetStrategy::SelfClearing => self.command_and_poll(ctx, Command::SoftwareReset.mask()).await,
            ResetStrategy::Sequenced => self.sequenced_reset(ctx).await,
        };

        result.map_err(self.wrap("software_reset"))
    }

    async fn sequenced_reset<C: Context>(&mut self, ctx: &mut C) -> TransportResult<(), B::Error> {
        self.transport.write_register(self.regs.ctrl_reg2, SWRESET).await?;
        ctx.wait_ms(RESET_SETTLE_MS).await?;

        self.transport.write_register(self.regs.ctrl_reg2, 0).await?;
        ctx.wait_ms(RESET_SETTLE_MS).await?;

        self.transport.read::<PressTempOut>().await?;

        Ok(())
    }

    /// Reads temperature and pressure.
    ///
    /// In one-shot mode the chip is powered down, configured for high-precision averaging where it
    /// has RES_CONF, powered up with BDU and triggered; the call returns once the conversion is done.
    /// In continuous mode the latest sample is read directly.
    ///
    /// Temperature is always read before pressure so that PRESS_OUT_H is the last address read, as
    /// block data update requires.
    ///
    /// # Examples
    ///
    /// ```rust, no_run
    /// # use lps_rs::{Lps, LpsResult};
    /// # use lps_rs::bus::Bus;
    /// # use lps_rs::context::Context;
    ///
    /// # async fn demo<B: Bus, C: Context>(mut device: Lps<B>, mut ctx: C) -> LpsResult<(), B::Error> {
    /// let reading = device.sense(&mut ctx).await?;
    /// println!("{}", reading);
    /// # Ok(()) }
    /// ```
    pub async fn sense<C: Context>(&mut self, ctx: &mut C) -> LpsResult<Reading, B::Error> {
        if self.state == State::OneShotArmed {
            self.measure_one_shot(ctx).await.map_err(self.wrap("sense"))?;
        }

        let reading = self.read_reading().await.map_err(self.wrap("sense"))?;
        self.transport.observer().reading(self.variant, &reading);

        Ok(reading)
    }

    async fn measure_one_shot<C: Context>(&mut self, ctx: &mut C) -> TransportResult<(), B::Error> {
        self.transport.write_register(self.regs.ctrl_reg1, POWER_DOWN).await?;

        if let Some(res_conf) = self.regs.res_conf {
            let averaging = self
                .variant
                .averaging_code()
                .ok_or(ErrorKind::UnknownVariantForOperation(self.variant))?;
            self.transport.write_register(res_conf, averaging).await?;
        }

        self.transport.write_register(self.regs.ctrl_reg1, ONE_SHOT_READY).await?;

        self.command_and_poll(ctx, Command::OneShot.mask()).await
    }

    async fn read_reading(&mut self) -> TransportResult<Reading, B::Error> {
        let raw_temperature = self.transport.read::<TempOut>().await?;
        let temperature = self.variant.convert_temperature(raw_temperature);

        let raw_pressure = self.transport.read::<PressOut>().await?;
        let pressure = pressure_from_raw(raw_pressure);

        Ok(Reading { temperature, pressure })
    }

    /// Reads CTRL_REG1, CTRL_REG2 and, on chips that have it, RES_CONF.
    ///
    /// The snapshot is also reported to the observer.
    pub async fn control_registers(&mut self) -> LpsResult<ControlRegisters, B::Error> {
        variant::read_control_registers(&mut self.transport, self.variant)
            .await
            .map_err(self.wrap("control_registers"))
    }

    /// Read a fixed-address register using a **typed marker** from [`crate::register`].
    pub async fn read<R: Readable>(&mut self) -> LpsResult<R::Out, B::Error> {
        self.transport.read::<R>().await.map_err(self.wrap("read"))
    }

    pub fn variant(&self) -> ChipVariant {
        self.variant
    }

    /// Display name of the chip, e.g. `"LPS25H"`.
    pub fn name(&self) -> &'static str {
        self.variant.name()
    }

    pub fn register_map(&self) -> RegisterMap {
        self.regs
    }

    pub fn initial_control_byte(&self) -> u8 {
        self.init_cmd
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Gives back the bus and the observer.
    pub fn release(self) -> (B, O) {
        self.transport.release()
    }
}
