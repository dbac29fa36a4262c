use std::time::Duration;

use socket2::SockRef;
use tokio::net::TcpStream;

use crate::http::request::HttpVersion;

/// Idle timeout applied to keep-alive connections.
pub const DEFAULT_KEEP_ALIVE_TIMEOUT: Duration = Duration::from_secs(60);

/// Where a connection stands between requests.
///
/// ```text
///                 ┌─────────────┐
///                 │ Negotiating │
///                 └──────┬──────┘
///         HTTP/1.0       │       anything else
///        ┌───────────────┴───────────────┐
///        ▼                               ▼
/// ┌──────────────────────┐     ┌────────────────────┐
/// │ ClosingAfterResponse │     │   KeepAliveOpen    │ ── next request ─┐
/// └──────────────────────┘     └────────────────────┘ ◄───────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Negotiating,
    ClosingAfterResponse,
    KeepAliveOpen { idle_timeout: Duration },
}

/// Per-connection keep-alive decisions. Never shared between connections.
#[derive(Debug)]
pub struct ConnectionLifecycle {
    state: LifecycleState,
    keep_alive_timeout: Duration,
}

impl ConnectionLifecycle {
    pub fn new(keep_alive_timeout: Duration) -> Self {
        Self {
            state: LifecycleState::Negotiating,
            keep_alive_timeout,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Picks the state for the response about to be sent.
    ///
    /// Runs once per request, so a keep-alive connection that receives an
    /// HTTP/1.0 request closes after answering it.
    pub fn negotiate(&mut self, version: &HttpVersion) -> LifecycleState {
        self.state = if version.closes_after_response() {
            LifecycleState::ClosingAfterResponse
        } else {
            LifecycleState::KeepAliveOpen {
                idle_timeout: self.keep_alive_timeout,
            }
        };
        self.state
    }

    /// Mirrors the current state onto the socket's `SO_KEEPALIVE` flag.
    pub fn apply(&self, stream: &TcpStream) -> std::io::Result<()> {
        let keep_alive = matches!(self.state, LifecycleState::KeepAliveOpen { .. });
        SockRef::from(stream).set_keepalive(keep_alive)
    }

    /// Bound on writing a response. Only keep-alive connections have one.
    pub fn idle_timeout(&self) -> Option<Duration> {
        match self.state {
            LifecycleState::KeepAliveOpen { idle_timeout } => Some(idle_timeout),
            _ => None,
        }
    }

    /// Bound on waiting for a request line, the first one on a fresh
    /// connection included.
    pub fn read_timeout(&self) -> Option<Duration> {
        match self.state {
            LifecycleState::Negotiating => Some(self.keep_alive_timeout),
            LifecycleState::ClosingAfterResponse => None,
            LifecycleState::KeepAliveOpen { idle_timeout } => Some(idle_timeout),
        }
    }

    pub fn closes_after_response(&self) -> bool {
        self.state == LifecycleState::ClosingAfterResponse
    }
}
