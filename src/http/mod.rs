//! HTTP server module.
//!
//! Serves plain HTTP; TLS is terminated by the reverse proxy in front of the
//! service. The server drains in-flight requests on SIGTERM/SIGINT.

mod server;
mod shutdown;

pub use server::{serve, start_server, ServerError};
