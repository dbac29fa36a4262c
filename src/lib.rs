//! docroot - minimal concurrent HTTP file server
//!
//! Serves files from a document root over a subset of HTTP/1.0 and HTTP/1.1.

pub mod cli;
pub mod config;
pub mod http;
pub mod server;
