pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`clients` must be a positive integer")]
    InvalidClients,

    #[error("`passes` must be a positive integer")]
    InvalidPasses,

    #[error("failed to set up client session: {0}")]
    Session(#[source] squall_http::Error),

    #[error("failed to spawn thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("a client worker panicked")]
    WorkerPanicked,
}
