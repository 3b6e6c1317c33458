//! Transport module
//!
//! Serves the bundled routes over HTTP.

pub mod http;

pub use http::{DEFAULT_HTTP_PORT, HttpConfig, HttpServer, run_http, run_http_blocking};
