use docroot::http::parser::{ParseError, parse_request_line};
use docroot::http::request::{HttpVersion, Method};

#[test]
fn test_parse_simple_get_request() {
    let req = parse_request_line(Some("GET /index.html HTTP/1.1\r\n")).unwrap();

    assert_eq!(req.method, Method::GET);
    assert_eq!(req.target, "/index.html");
    assert_eq!(req.version, HttpVersion::Http11);
}

#[test]
fn test_parse_http10_request() {
    let req = parse_request_line(Some("GET /a.txt HTTP/1.0")).unwrap();
    assert_eq!(req.version, HttpVersion::Http10);
}

#[test]
fn test_parse_unrecognized_version_is_kept() {
    let req = parse_request_line(Some("GET / HTTP/3\n")).unwrap();
    assert_eq!(req.version, HttpVersion::Unrecognized("HTTP/3".to_string()));
    assert!(!req.version.closes_after_response());
}

#[test]
fn test_parse_target_with_query_string_is_raw() {
    let req = parse_request_line(Some("GET /search?q=rust HTTP/1.1\r\n")).unwrap();
    assert_eq!(req.target, "/search?q=rust");
}

#[test]
fn test_parse_empty_target() {
    let req = parse_request_line(Some("GET  HTTP/1.1\r\n")).unwrap();
    assert_eq!(req.target, "");
}

#[test]
fn test_parse_missing_or_blank_line() {
    assert_eq!(parse_request_line(None), Err(ParseError::Empty));
    assert_eq!(parse_request_line(Some("")), Err(ParseError::Empty));
    assert_eq!(parse_request_line(Some("\r\n")), Err(ParseError::Empty));
}

#[test]
fn test_parse_other_methods_rejected() {
    for method in ["POST", "PUT", "DELETE", "HEAD", "OPTIONS", "get"] {
        let line = format!("{} / HTTP/1.1\r\n", method);
        assert_eq!(
            parse_request_line(Some(&line)),
            Err(ParseError::InvalidMethod),
            "{method} should be rejected"
        );
    }
}

#[test]
fn test_parse_method_prefix_is_not_get() {
    assert_eq!(
        parse_request_line(Some("GETX / HTTP/1.1\r\n")),
        Err(ParseError::InvalidMethod)
    );
}

#[test]
fn test_parse_wrong_token_count() {
    assert_eq!(parse_request_line(Some("GET")), Err(ParseError::Malformed));
    assert_eq!(parse_request_line(Some("GET /")), Err(ParseError::Malformed));
    assert_eq!(
        parse_request_line(Some("GET / HTTP/1.1 extra")),
        Err(ParseError::Malformed)
    );
}
