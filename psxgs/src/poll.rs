//! Busy-wait strategies for status register polling.
//!
//! The coprocessor has no completion interrupt we can rely on, so every wait
//! is a loop over status reads. The strategy decides what happens between
//! reads and whether the loop may give up.

/// What to do between two status reads.
pub trait PollStrategy {
    fn pause(&mut self);

    /// Maximum number of status reads per wait, or `None` to spin forever.
    fn limit(&self) -> Option<u32> {
        None
    }
}

/// Spin on the status register forever. This is the hardware behaviour.
#[derive(Clone, Copy, Debug, Default)]
pub struct BusySpin;

impl PollStrategy for BusySpin {
    #[inline]
    fn pause(&mut self) {
        core::hint::spin_loop();
    }
}

/// Yield the OS thread between reads.
///
/// For use against the simulated coprocessor, whose worker runs on another thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct YieldSpin;

impl PollStrategy for YieldSpin {
    fn pause(&mut self) {
        std::thread::yield_now();
    }
}

/// Give up after a fixed number of status reads.
///
/// Opt-in: a stuck status bit becomes `GsError::Timeout` instead of a hang.
#[derive(Clone, Copy, Debug)]
pub struct Bounded<P> {
    inner: P,
    reads: u32,
}

impl<P: PollStrategy> Bounded<P> {
    pub fn new(inner: P, reads: u32) -> Self {
        Self { inner, reads }
    }
}

impl<P: PollStrategy> PollStrategy for Bounded<P> {
    fn pause(&mut self) {
        self.inner.pause();
    }

    fn limit(&self) -> Option<u32> {
        Some(match self.inner.limit() {
            Some(inner) => inner.min(self.reads),
            None => self.reads,
        })
    }
}
