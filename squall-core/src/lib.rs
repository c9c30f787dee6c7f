#![forbid(unsafe_code)]

pub mod runner;
pub mod scenario;

pub use runner::{
    Connector, Error as RunError, HttpConnector, ProgressFn, ProgressUpdate, ResponseClass,
    RunConfig, RunSummary, Scoreboard, Transport, Worker, execute,
};
pub use scenario::{
    Body, EncodingError, FailurePolicy, Header, Headers, LoadError, Param, ParamType, ParamValue,
    Request, Scenario, encode_form, load_file, load_str,
};
pub use squall_http::SessionOptions;
