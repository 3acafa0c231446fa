//! webrequest - fluent HTTP(S) GET/POST requests
//!
//! Configure a [`RequestBuilder`] with chained calls, then execute it once,
//! either blocking, on a background thread with callbacks, or as a future.
//! Response bodies come back as text, decompressed first when the server
//! sent them gzip-encoded.

pub mod cli;
pub mod config;
pub mod error;
pub mod exit_code;
pub mod http;
pub mod logging;
pub mod utils;

pub use config::HttpMethod;
pub use error::{FailureKind, Result, WebRequestError};
pub use http::request::{PreparedRequest, RequestBuilder};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
