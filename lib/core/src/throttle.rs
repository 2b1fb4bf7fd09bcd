//! Request coalescing primitives: an in-flight guard that drops overlapping
//! requests and a trailing-edge debouncer with an injectable clock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Allows one request at a time. A request arriving while another is
/// pending is dropped (no-op, no error) - callers re-trigger after
/// completion if their input changed in the meantime.
#[derive(Debug, Default)]
pub struct InFlightGuard {
    pending: AtomicBool,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while a request is pending; otherwise a permit that releases
    /// the guard on drop.
    pub fn begin(&self) -> Option<InFlightPermit<'_>> {
        if self
            .pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(InFlightPermit { guard: self })
        } else {
            None
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

/// RAII permit for [`InFlightGuard`]
#[derive(Debug)]
pub struct InFlightPermit<'a> {
    guard: &'a InFlightGuard,
}

impl Drop for InFlightPermit<'_> {
    fn drop(&mut self) {
        self.guard.pending.store(false, Ordering::Release);
    }
}

/// Time source for [`Debouncer`]. Injectable so debounce behavior is tested
/// by advancing a manual clock instead of sleeping.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Trailing-edge debounce with a fixed delay: every trigger pushes the
/// deadline forward, and `poll` fires only once the deadline has passed
/// with no further triggers.
#[derive(Debug)]
pub struct Debouncer<C: Clock = SystemClock> {
    clock: C,
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer<SystemClock> {
    pub fn new(delay: Duration) -> Self {
        Self::with_clock(delay, SystemClock)
    }
}

impl<C: Clock> Debouncer<C> {
    pub fn with_clock(delay: Duration, clock: C) -> Self {
        Self {
            clock,
            delay,
            deadline: None,
        }
    }

    /// Arm the debouncer, or push an armed deadline forward
    pub fn trigger(&mut self) {
        self.deadline = Some(self.clock.now() + self.delay);
    }

    /// Fires at most once per armed deadline: `true` clears the deadline
    pub fn poll(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if self.clock.now() >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}
