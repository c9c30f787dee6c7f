#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,

    /// Invalid CLI input (bad flags, zero clients, unparsable durations).
    InvalidInput = 1,

    /// The scenario document could not be read or resolved.
    LoadError = 2,

    /// Session setup failed or a client thread panicked.
    RuntimeError = 3,

    /// The run completed and at least one client failed the scenario.
    ScenarioFailed = 100,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub fn from_outcome(failed: bool) -> Self {
        if failed {
            Self::ScenarioFailed
        } else {
            Self::Success
        }
    }
}
