use std::io::{Error, Result};
use std::mem::MaybeUninit;

pub fn clock_gettime(clock: libc::clockid_t) -> Result<libc::timespec> {
    let mut ts = MaybeUninit::<libc::timespec>::uninit();
    let result = unsafe { libc::clock_gettime(clock, ts.as_mut_ptr()) };
    if result != -1 {
        Ok(unsafe { ts.assume_init() })
    } else {
        Err(Error::last_os_error())
    }
}

pub fn getpid() -> u32 {
    // `getpid` always succeeds.
    let pid = unsafe { libc::getpid() };
    pid as _
}
