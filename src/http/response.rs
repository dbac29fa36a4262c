use crate::http::resolver::ResolvedResource;

/// HTTP status codes produced by the server.
///
/// - `Ok` (200): File served
/// - `BadRequest` (400): Missing or malformed request line, or a non-GET method
/// - `Forbidden` (403): File exists but cannot be read, or lies outside the document root
/// - `NotFound` (404): No such file, or the target is a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 File Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// ```
    /// # use docroot::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
        }
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "File Not Found",
        }
    }
}

/// What a single request resolved to. Decides which response gets written.
///
/// Each request's outcome is independent of earlier requests on the same
/// connection.
#[derive(Debug)]
pub enum ResponseOutcome {
    Success(ResolvedResource),
    BadRequest,
    NotFound,
    Forbidden,
}

impl ResponseOutcome {
    pub fn status(&self) -> StatusCode {
        match self {
            ResponseOutcome::Success(_) => StatusCode::Ok,
            ResponseOutcome::BadRequest => StatusCode::BadRequest,
            ResponseOutcome::NotFound => StatusCode::NotFound,
            ResponseOutcome::Forbidden => StatusCode::Forbidden,
        }
    }
}

/// Small HTML page sent as the body of every error response.
pub fn error_body(status: StatusCode) -> String {
    format!(
        "<html><head><title>Error</title></head><body><h1>{} {}</h1></body></html>",
        status.as_u16(),
        status.reason_phrase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_embeds_status() {
        let body = error_body(StatusCode::NotFound);
        assert!(body.contains("<h1>404 File Not Found</h1>"));
        assert!(body.starts_with("<html>"));
    }

    #[test]
    fn outcome_status() {
        assert_eq!(ResponseOutcome::BadRequest.status(), StatusCode::BadRequest);
        assert_eq!(ResponseOutcome::Forbidden.status().as_u16(), 403);
    }
}
