//! High-resolution timer with overflow detection.
//!
//! Readings are signed microseconds. A counter that wraps shows up as a
//! negative reading or one that runs backwards, [`Timer`] flags both.

#[cfg(test)]
mod test;

use std::io;
use std::thread;
use std::time::Duration;

use crate::config::Opts;
use crate::error::{Error, Result};
use crate::ffi::syscall::clock_gettime;
use crate::ffi::timespec_to;
use crate::outcome::Outcome;

/// Longest sleep accepted between two overflow samples.
pub const MAX_OVERFLOW_INTERVAL: Duration = Duration::from_secs(60 * 60);
/// Interval used when a zero interval is requested.
pub const DEFAULT_OVERFLOW_INTERVAL: Duration = Duration::from_secs(1);

/// Microseconds of the monotonic clock.
pub fn real_usec() -> io::Result<i64> {
    let ts = clock_gettime(libc::CLOCK_MONOTONIC)?;
    Ok(timespec_to(&ts, 1_000_000))
}

/// Nanoseconds of the monotonic clock.
pub fn real_nsec() -> io::Result<i64> {
    let ts = clock_gettime(libc::CLOCK_MONOTONIC)?;
    Ok(timespec_to(&ts, 1_000_000_000))
}

/// Microseconds of CPU time consumed by this process.
pub fn virt_usec() -> io::Result<i64> {
    let ts = clock_gettime(libc::CLOCK_PROCESS_CPUTIME_ID)?;
    Ok(timespec_to(&ts, 1_000_000))
}

/// Source of microsecond readings.
pub trait Clock {
    fn now(&mut self) -> io::Result<i64>;

    /// Blocks for `dur` between two samples.
    fn sleep(&mut self, dur: Duration) {
        thread::sleep(dur);
    }
}

/// The monotonic system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct RealClock;

impl Clock for RealClock {
    fn now(&mut self) -> io::Result<i64> {
        real_usec()
    }
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn now(&mut self) -> io::Result<i64> {
        (**self).now()
    }

    fn sleep(&mut self, dur: Duration) {
        (**self).sleep(dur)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerReading {
    pub usec: i64,
    /// Negative, or less than the previous reading.
    pub overflowed: bool,
}

/// Remembers the last reading to detect wraparound.
pub struct Timer<C> {
    clock: C,
    last: Option<i64>,
}

impl<C: Clock> Timer<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, last: None }
    }

    pub fn read(&mut self) -> io::Result<TimerReading> {
        let usec = self.clock.now()?;
        let overflowed = usec < 0 || self.last.is_some_and(|last| usec < last);
        self.last = Some(usec);
        Ok(TimerReading { usec, overflowed })
    }

    pub fn sleep(&mut self, dur: Duration) {
        self.clock.sleep(dur);
    }

    pub fn into_inner(self) -> C {
        self.clock
    }
}

/// Samples `clock` every `interval`, `repetitions` times, failing on the
/// first overflowed reading.
///
/// A zero `interval` falls back to [`DEFAULT_OVERFLOW_INTERVAL`], intervals
/// longer than [`MAX_OVERFLOW_INTERVAL`] are rejected. This blocks for
/// `interval * repetitions` on a real clock.
pub fn detect_overflow<C: Clock>(clock: C, interval: Duration, repetitions: u32) -> Result<()> {
    if interval > MAX_OVERFLOW_INTERVAL {
        return Err(Error::InvalidInterval(interval));
    }
    let interval = match interval.is_zero() {
        true => DEFAULT_OVERFLOW_INTERVAL,
        false => interval,
    };

    let mut timer = Timer::new(clock);
    for repetition in 1..=repetitions {
        timer.sleep(interval);
        let reading = timer.read()?;
        tracing::debug!(repetition, usec = reading.usec, "timer sample");

        if reading.overflowed {
            tracing::warn!(repetition, usec = reading.usec, "timer overflow");
            return Err(Error::TimerOverflow {
                repetition,
                usec: reading.usec,
            });
        }
    }

    Ok(())
}

/// Runs [`detect_overflow`] as configured by `opts`.
///
/// The check takes `interval * repetitions` of wall time, in fast mode it is
/// skipped.
#[track_caller]
pub fn run_overflow_check<C: Clock>(clock: C, opts: &Opts) -> Outcome {
    if opts.fast {
        tracing::info!("fast mode, skipping timer overflow check");
        return Outcome::Skipped("timer overflow check is too slow for fast mode");
    }
    Outcome::from_result(detect_overflow(
        clock,
        opts.overflow_interval,
        opts.overflow_repetitions,
    ))
}
