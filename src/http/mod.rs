//! HTTP protocol implementation.
//!
//! A deliberately small subset of HTTP/1.0 and HTTP/1.1: only the request
//! line is read, only `GET` is served, and only files under the document
//! root are returned.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection handler driving the request/response loop
//! - **`parser`**: Parses and validates the request line
//! - **`request`**: Parsed request line, method and protocol version
//! - **`resolver`**: Maps request targets to files under the document root
//! - **`mime`**: Content type detection based on file extensions
//! - **`response`**: Status codes, response outcomes and error bodies
//! - **`writer`**: Writes headers and streams file bodies to the client
//! - **`lifecycle`**: Close-after-response vs. keep-alive decisions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for a request line (idle timeout on keep-alive)
//!        └──────┬──────┘
//!               │ Line received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse, resolve the file
//!        └──────┬───────────┘
//!               │ 200 / 400 / 403 / 404
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Headers + body, flush
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ HTTP/1.1 (or unknown) → Reading (same connection)
//!               └─ HTTP/1.0 → Closed
//! ```

pub mod connection;
pub mod lifecycle;
pub mod mime;
pub mod parser;
pub mod request;
pub mod resolver;
pub mod response;
pub mod writer;
