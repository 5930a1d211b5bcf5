use std::io;
use std::time::Duration;

use super::*;
use crate::config::Opts;
use crate::error::ErrorKind;

// Replays fixed readings and records requested sleeps without blocking.
struct Replay {
    readings: Vec<i64>,
    next: usize,
    slept: Vec<Duration>,
}

impl Replay {
    fn new(readings: Vec<i64>) -> Self {
        Self {
            readings,
            next: 0,
            slept: vec![],
        }
    }

    fn monotonic(n: usize) -> Self {
        Self::new((0..n as i64).map(|i| 1_000 + i * 1_000_000).collect())
    }
}

impl Clock for Replay {
    fn now(&mut self) -> io::Result<i64> {
        let val = self
            .readings
            .get(self.next)
            .copied()
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))?;
        self.next += 1;
        Ok(val)
    }

    fn sleep(&mut self, dur: Duration) {
        self.slept.push(dur);
    }
}

#[test]
fn test_real_clock() {
    let a = real_usec().unwrap();
    let b = real_usec().unwrap();
    assert!(a >= 0);
    assert!(b >= a);

    let ns = real_nsec().unwrap();
    assert!(ns / 1_000 >= a);

    assert!(virt_usec().unwrap() >= 0);
}

#[test]
fn test_timer_reading() {
    let mut timer = Timer::new(Replay::new(vec![5, 10, 7, -1]));
    assert_eq!(timer.read().unwrap(), TimerReading { usec: 5, overflowed: false });
    assert_eq!(timer.read().unwrap(), TimerReading { usec: 10, overflowed: false });
    assert_eq!(timer.read().unwrap(), TimerReading { usec: 7, overflowed: true });
    assert_eq!(timer.read().unwrap(), TimerReading { usec: -1, overflowed: true });
    timer.sleep(Duration::from_millis(3));

    let clock = timer.into_inner();
    assert_eq!(clock.next, 4);
    assert_eq!(clock.slept, vec![Duration::from_millis(3)]);
    assert_eq!(clock.readings.len(), 4);
}

#[test]
fn test_timer_first_reading_negative() {
    let mut timer = Timer::new(Replay::new(vec![-5]));
    assert!(timer.read().unwrap().overflowed);
}

#[test]
fn test_monotonic_never_fails() {
    let mut clock = Replay::monotonic(100);
    detect_overflow(&mut clock, Duration::from_secs(2), 100).unwrap();
    assert_eq!(clock.next, 100);
    assert_eq!(clock.slept, vec![Duration::from_secs(2); 100]);
}

#[test]
fn test_negative_on_fifth_sample() {
    let mut clock = Replay::new(vec![1, 2, 3, 4, -4, 6, 7]);
    let err = detect_overflow(&mut clock, Duration::from_millis(10), 7).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TimerOverflow);
    assert!(matches!(err, Error::TimerOverflow { repetition: 5, usec: -4 }));
    // Stops at the first overflow.
    assert_eq!(clock.next, 5);
}

#[test]
fn test_backwards_reading_fails() {
    let clock = Replay::new(vec![10, 20, 15]);
    let err = detect_overflow(clock, Duration::from_millis(1), 3).unwrap_err();
    assert!(matches!(err, Error::TimerOverflow { repetition: 3, usec: 15 }));
}

#[test]
fn test_interval_bounds() {
    let mut clock = Replay::monotonic(2);
    detect_overflow(&mut clock, Duration::ZERO, 2).unwrap();
    assert_eq!(clock.slept, vec![DEFAULT_OVERFLOW_INTERVAL; 2]);

    let mut clock = Replay::monotonic(1);
    let err = detect_overflow(&mut clock, MAX_OVERFLOW_INTERVAL + Duration::from_secs(1), 1)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInterval);
    assert_eq!(clock.next, 0);

    let mut clock = Replay::monotonic(1);
    detect_overflow(&mut clock, MAX_OVERFLOW_INTERVAL, 1).unwrap();
}

#[test]
fn test_zero_repetitions() {
    let mut clock = Replay::new(vec![]);
    detect_overflow(&mut clock, Duration::from_secs(1), 0).unwrap();
    assert!(clock.slept.is_empty());
}

#[test]
fn test_clock_error() {
    let clock = Replay::new(vec![1]);
    let err = detect_overflow(clock, Duration::from_secs(1), 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_overflow_check_skipped_in_fast_mode() {
    let opts = Opts {
        fast: true,
        ..Default::default()
    };
    let mut clock = Replay::new(vec![-1]);
    let outcome = run_overflow_check(&mut clock, &opts);
    assert!(outcome.is_skipped());
    assert!(!outcome.is_passed());
    assert_eq!(clock.next, 0);
}

#[test]
fn test_overflow_check_outcomes() {
    let opts = Opts {
        overflow_repetitions: 3,
        ..Default::default()
    };

    let outcome = run_overflow_check(Replay::monotonic(3), &opts);
    assert!(outcome.is_passed());

    let line = line!() + 1;
    let outcome = run_overflow_check(Replay::new(vec![1, -1, 2]), &opts);
    let report = outcome.report().unwrap();
    assert_eq!(report.kind, ErrorKind::TimerOverflow);
    assert!(!report.is_fatal());
    assert_eq!(report.location.file(), file!());
    assert_eq!(report.location.line(), line);
    assert!(outcome.to_string().starts_with("FAILED TimerOverflow at "));
}
