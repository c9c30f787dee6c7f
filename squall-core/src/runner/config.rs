use std::time::Duration;

use super::error::{Error, Result};

/// Run-scoped settings. Scenario-scoped behavior lives in the scenario document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub clients: u64,
    /// How many times each client replays the whole scenario.
    pub passes: u32,
    pub progress_interval: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            clients: 1,
            passes: 1,
            progress_interval: Duration::from_secs(1),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.clients == 0 {
            return Err(Error::InvalidClients);
        }
        if self.passes == 0 {
            return Err(Error::InvalidPasses);
        }
        Ok(())
    }
}
