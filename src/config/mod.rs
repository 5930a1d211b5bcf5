use std::time::Duration;

/// Options for the checks run on top of the library.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Opts {
    /// Skip long-running checks such as the timer overflow check.
    pub fast: bool,

    /// Sleep between two timer overflow samples.
    pub overflow_interval: Duration,

    /// Number of timer overflow samples.
    pub overflow_repetitions: u32,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            fast: false,
            overflow_interval: Duration::from_secs(1),
            overflow_repetitions: 10,
        }
    }
}
