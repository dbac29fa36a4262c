use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::StaticFilesConfig;
use crate::http::lifecycle::ConnectionLifecycle;
use crate::http::parser::parse_request_line;
use crate::http::request::HttpVersion;
use crate::http::resolver::PathResolver;
use crate::http::response::ResponseOutcome;
use crate::http::writer::ResponseWriter;

/// Longest request line accepted, terminator included.
pub const MAX_REQUEST_LINE: u64 = 8192;

pub struct Connection {
    reader: BufReader<TcpStream>,
    peer: SocketAddr,
    resolver: Arc<PathResolver>,
    writer: ResponseWriter,
    lifecycle: ConnectionLifecycle,
    state: ConnectionState,
    served: u64,
}

pub enum ConnectionState {
    Reading,
    Processing(Option<String>),
    Writing {
        outcome: ResponseOutcome,
        version: HttpVersion,
        close: bool, // close regardless of version
    },
    Closed,
}

enum LineRead {
    Line(String),
    Eof,
    TooLong,
}

impl Connection {
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        resolver: Arc<PathResolver>,
        config: &StaticFilesConfig,
    ) -> Self {
        Self {
            reader: BufReader::new(stream),
            peer,
            resolver,
            writer: ResponseWriter::new(config.chunk_size),
            lifecycle: ConnectionLifecycle::new(config.keep_alive_timeout()),
            state: ConnectionState::Reading,
            served: 0,
        }
    }

    /// Serves requests until the peer leaves, the idle timeout fires, or an
    /// HTTP/1.0 exchange completes.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    let read = match self.lifecycle.read_timeout() {
                        Some(idle) => match timeout(idle, self.read_line()).await {
                            Ok(read) => read?,
                            Err(_) => {
                                info!(peer = %self.peer, served = self.served, "idle timeout, closing");
                                continue;
                            }
                        },
                        None => self.read_line().await?,
                    };

                    self.state = match read {
                        LineRead::Line(line) => ConnectionState::Processing(Some(line)),
                        // Nothing was ever sent on this connection
                        LineRead::Eof if self.served == 0 => ConnectionState::Processing(None),
                        LineRead::Eof => ConnectionState::Closed,
                        LineRead::TooLong => ConnectionState::Writing {
                            outcome: ResponseOutcome::BadRequest,
                            version: HttpVersion::Http11,
                            close: true,
                        },
                    };
                }

                ConnectionState::Processing(line) => {
                    debug!(peer = %self.peer, line = ?line, "received request line");
                    let close = line.is_none();

                    self.state = match parse_request_line(line.as_deref()) {
                        Ok(req) => {
                            let outcome = self.resolver.resolve(&req.target).await?;
                            info!(
                                peer = %self.peer,
                                target = %req.target,
                                version = %req.version,
                                "request"
                            );
                            ConnectionState::Writing {
                                outcome,
                                version: req.version,
                                close,
                            }
                        }
                        Err(e) => {
                            debug!(peer = %self.peer, error = ?e, "rejecting request line");
                            // No version to go by; HTTP/1.1 rules apply
                            ConnectionState::Writing {
                                outcome: ResponseOutcome::BadRequest,
                                version: HttpVersion::Http11,
                                close,
                            }
                        }
                    };
                }

                ConnectionState::Writing {
                    outcome,
                    version,
                    close,
                } => {
                    self.lifecycle.negotiate(&version);
                    if let Err(e) = self.lifecycle.apply(self.reader.get_ref()) {
                        warn!(peer = %self.peer, error = %e, "failed to set SO_KEEPALIVE");
                    }
                    if let Some(idle) = self.lifecycle.idle_timeout() {
                        debug!(
                            peer = %self.peer,
                            timeout_secs = idle.as_secs(),
                            "keep-alive active"
                        );
                    }

                    let write = self
                        .writer
                        .write_outcome(self.reader.get_mut(), outcome, &version);
                    let status = match self.lifecycle.idle_timeout() {
                        Some(idle) => match timeout(idle, write).await {
                            Ok(status) => status?,
                            Err(_) => {
                                debug!(peer = %self.peer, "response flush timed out after keep-alive");
                                continue;
                            }
                        },
                        None => write.await?,
                    };
                    self.served += 1;
                    info!(peer = %self.peer, status = status.as_u16(), "response sent");

                    if close || self.lifecycle.closes_after_response() {
                        // Best effort; the socket is dropped right after anyway
                        let _ = self.reader.get_mut().shutdown().await;
                        info!(peer = %self.peer, version = %version, "connection closed after response");
                    } else {
                        self.state = ConnectionState::Reading;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    async fn read_line(&mut self) -> anyhow::Result<LineRead> {
        let mut buf = Vec::with_capacity(128);
        let n = (&mut self.reader)
            .take(MAX_REQUEST_LINE)
            .read_until(b'\n', &mut buf)
            .await
            .context("reading request line")?;

        if n == 0 {
            return Ok(LineRead::Eof);
        }
        if !buf.ends_with(b"\n") && n as u64 == MAX_REQUEST_LINE {
            return Ok(LineRead::TooLong);
        }

        Ok(LineRead::Line(String::from_utf8_lossy(&buf).into_owned()))
    }
}
