use std::fmt;

/// HTTP request methods.
///
/// Only `GET` is served; anything else is answered with 400 Bad Request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// Any other token found in the method position
    Other(String),
}

impl Method {
    /// Parses a method token (case-sensitive).
    ///
    /// ```
    /// # use docroot::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Method::GET);
    /// assert_eq!(Method::from_token("get"), Method::Other("get".into()));
    /// ```
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            other => Method::Other(other.to_string()),
        }
    }
}

/// Protocol version named on the request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpVersion {
    /// `HTTP/1.0`, or any token ending in `1.0`: one response, then close.
    Http10,
    /// `HTTP/1.1`: keep-alive.
    Http11,
    /// Anything else. Handled exactly like HTTP/1.1.
    Unrecognized(String),
}

impl HttpVersion {
    pub fn from_token(token: &str) -> Self {
        if token == "HTTP/1.1" {
            HttpVersion::Http11
        } else if token.ends_with("1.0") {
            HttpVersion::Http10
        } else {
            HttpVersion::Unrecognized(token.to_string())
        }
    }

    /// Whether the connection must be closed after a single response.
    pub fn closes_after_response(&self) -> bool {
        matches!(self, HttpVersion::Http10)
    }

    /// Version string written on the response status line.
    pub fn as_wire(&self) -> &'static str {
        match self {
            HttpVersion::Http10 => "HTTP/1.0",
            HttpVersion::Http11 | HttpVersion::Unrecognized(_) => "HTTP/1.1",
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpVersion::Unrecognized(token) => f.write_str(token),
            known => f.write_str(known.as_wire()),
        }
    }
}

/// A parsed request line. Immutable, lives for one request/response cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// The request target exactly as received (e.g. "/index.html")
    pub target: String,
    pub version: HttpVersion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_tokens() {
        assert_eq!(HttpVersion::from_token("HTTP/1.1"), HttpVersion::Http11);
        assert_eq!(HttpVersion::from_token("HTTP/1.0"), HttpVersion::Http10);
        assert_eq!(HttpVersion::from_token("FOO/1.0"), HttpVersion::Http10);
        assert_eq!(
            HttpVersion::from_token("HTTP/2"),
            HttpVersion::Unrecognized("HTTP/2".into())
        );
    }

    #[test]
    fn only_http10_closes() {
        assert!(HttpVersion::Http10.closes_after_response());
        assert!(!HttpVersion::Http11.closes_after_response());
        assert!(!HttpVersion::Unrecognized("HTTP/9".into()).closes_after_response());
    }

    #[test]
    fn unrecognized_versions_answer_as_http11() {
        assert_eq!(HttpVersion::Unrecognized("x".into()).as_wire(), "HTTP/1.1");
        assert_eq!(HttpVersion::Unrecognized("x".into()).to_string(), "x");
        assert_eq!(HttpVersion::Http10.to_string(), "HTTP/1.0");
    }
}
