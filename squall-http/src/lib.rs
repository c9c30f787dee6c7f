#![forbid(unsafe_code)]

mod client;
mod error;
mod jar;
mod session;
mod types;
mod util;

pub use client::HttpClient;
pub use error::{Error, ErrorKind, Result};
pub use jar::CookieJar;
pub use session::{HttpSession, SessionOptions};
pub use types::{HttpRequest, HttpResponse};
