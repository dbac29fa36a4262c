use crate::http::request::{HttpVersion, Method, Request};

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Peer closed before sending a line, or the line was blank
    Empty,
    /// First token is not `GET`
    InvalidMethod,
    /// Not exactly `METHOD SP TARGET SP VERSION`
    Malformed,
}

/// Parses a request line (`GET /path HTTP/1.1`).
///
/// `None` means the peer closed before a line arrived. The trailing line
/// terminator, if any, is ignored. Only the request line is consumed; no
/// headers are read.
pub fn parse_request_line(line: Option<&str>) -> Result<Request, ParseError> {
    let line = line
        .map(|l| l.trim_end_matches(['\r', '\n']))
        .filter(|l| !l.is_empty())
        .ok_or(ParseError::Empty)?;

    if !line.starts_with("GET") {
        return Err(ParseError::InvalidMethod);
    }

    let parts: Vec<&str> = line.split(' ').collect();
    let [method, target, version] = parts.as_slice() else {
        return Err(ParseError::Malformed);
    };

    let method = Method::from_token(method);
    if method != Method::GET {
        return Err(ParseError::InvalidMethod);
    }

    Ok(Request {
        method,
        target: target.to_string(),
        version: HttpVersion::from_token(version),
    })
}
