pub mod syscall;

// Splits a `timespec` into whole units of `1 / per_sec` seconds.
#[inline]
pub fn timespec_to(ts: &libc::timespec, per_sec: i64) -> i64 {
    let secs = ts.tv_sec as i64;
    let nanos = ts.tv_nsec as i64;
    secs * per_sec + nanos / (1_000_000_000 / per_sec)
}
