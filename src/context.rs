//! Waiting on the chip under the caller's control.
//!
//! Every operation that has to wait for the hardware takes a [`Context`]. The driver itself never
//! enforces a deadline: a context decides how long a wait takes and whether it ends early because
//! the caller gave up. Bus transactions are never interrupted, only the waits between them.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal_async::delay::DelayNs;

use crate::error::Cancelled;

/// The caller's execution context: a clock to wait on and a cancellation signal.
pub trait Context {
    /// Waits `ms` milliseconds, or returns [`Cancelled`] as soon as the caller cancels.
    fn wait_ms(&mut self, ms: u32) -> impl Future<Output = Result<(), Cancelled>>;
}

impl<C: Context + ?Sized> Context for &mut C {
    fn wait_ms(&mut self, ms: u32) -> impl Future<Output = Result<(), Cancelled>> {
        (**self).wait_ms(ms)
    }
}

/// Something that can tell whether the caller has given up.
pub trait CancelToken {
    fn is_cancelled(&self) -> bool;
}

impl<T: CancelToken + ?Sized> CancelToken for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// A cancellation flag that can be tripped from another task or an interrupt handler.
///
/// # Examples
///
/// ```rust
/// use lps_rs::context::{CancelFlag, CancelToken};
///
/// static STOP: CancelFlag = CancelFlag::new();
///
/// assert!(!STOP.is_cancelled());
/// STOP.cancel();
/// assert!(STOP.is_cancelled());
/// ```
#[derive(Debug, Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CancelToken for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Cancellation once an [`embassy_time::Instant`] has passed.
#[cfg(feature = "embassy-time")]
#[derive(Debug, Copy, Clone)]
pub struct Deadline(embassy_time::Instant);

#[cfg(feature = "embassy-time")]
impl Deadline {
    pub fn at(instant: embassy_time::Instant) -> Self {
        Self(instant)
    }

    pub fn after(duration: embassy_time::Duration) -> Self {
        Self(embassy_time::Instant::now() + duration)
    }
}

#[cfg(feature = "embassy-time")]
impl CancelToken for Deadline {
    fn is_cancelled(&self) -> bool {
        embassy_time::Instant::now() >= self.0
    }
}

/// A [`Context`] built from a delay provider and a [`CancelToken`].
///
/// Waits are sliced into 1 ms steps and the token is checked before every step, so a cancelled
/// wait returns within about a millisecond.
pub struct Cancellable<D, C> {
    delay: D,
    token: C,
}

impl<D: DelayNs, C: CancelToken> Cancellable<D, C> {
    pub fn new(delay: D, token: C) -> Self {
        Self { delay, token }
    }

    pub fn release(self) -> (D, C) {
        (self.delay, self.token)
    }
}

impl<D: DelayNs, C: CancelToken> Context for Cancellable<D, C> {
    async fn wait_ms(&mut self, ms: u32) -> Result<(), Cancelled> {
        for _ in 0..ms {
            if self.token.is_cancelled() {
                return Err(Cancelled);
            }
            self.delay.delay_ms(1).await;
        }

        if self.token.is_cancelled() {
            return Err(Cancelled);
        }

        Ok(())
    }
}

/// A [`Context`] that can never be cancelled. Polling loops run until the chip answers.
pub struct Uncancellable<D>(pub D);

impl<D: DelayNs> Context for Uncancellable<D> {
    async fn wait_ms(&mut self, ms: u32) -> Result<(), Cancelled> {
        self.0.delay_ms(ms).await;
        Ok(())
    }
}
