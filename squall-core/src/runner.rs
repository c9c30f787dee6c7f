mod config;
mod error;
mod progress;
mod run;
mod scoreboard;
mod summary;
mod transport;
mod worker;

pub use config::RunConfig;
pub use error::{Error, Result};
pub use progress::{ProgressFn, ProgressUpdate};
pub use run::execute;
pub use scoreboard::{ResponseClass, Scoreboard};
pub use summary::RunSummary;
pub use transport::{Connector, HttpConnector, Transport};
pub use worker::Worker;
