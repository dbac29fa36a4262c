//! Connection source: the TCP accept loop.

pub mod listener;
