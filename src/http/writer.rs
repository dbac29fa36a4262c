use std::time::SystemTime;

use anyhow::Context;
use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::request::HttpVersion;
use crate::http::resolver::ResolvedResource;
use crate::http::response::{ResponseOutcome, StatusCode, error_body};

/// Chunk size used when streaming file bodies.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Version on the status line of a 400, where no version could be parsed.
const BAD_REQUEST_VERSION: &str = "HTTP/1.1";

fn serialize_head(version: &str, status: StatusCode, headers: &[(&str, &str)]) -> BytesMut {
    let mut buf = BytesMut::with_capacity(256);

    // Status line
    buf.put_slice(version.as_bytes());
    buf.put_u8(b' ');
    buf.put_slice(status.as_u16().to_string().as_bytes());
    buf.put_u8(b' ');
    buf.put_slice(status.reason_phrase().as_bytes());
    buf.put_slice(b"\r\n");

    for (k, v) in headers {
        buf.put_slice(k.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(v.as_bytes());
        buf.put_slice(b"\r\n");
    }

    // Header/body separator
    buf.put_slice(b"\r\n");
    buf
}

/// Current time in RFC 1123 format, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
fn http_date() -> String {
    httpdate::fmt_http_date(SystemTime::now())
}

/// Writes status line, headers and body for one [`ResponseOutcome`].
#[derive(Debug, Clone)]
pub struct ResponseWriter {
    chunk_size: usize,
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl ResponseWriter {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Writes the full response and flushes `out`. Returns the status sent.
    pub async fn write_outcome<W>(
        &self,
        out: &mut W,
        outcome: ResponseOutcome,
        version: &HttpVersion,
    ) -> anyhow::Result<StatusCode>
    where
        W: AsyncWrite + Unpin,
    {
        let status = outcome.status();
        match outcome {
            ResponseOutcome::Success(resource) => self.write_file(out, resource, version).await?,
            ResponseOutcome::BadRequest => write_error(out, BAD_REQUEST_VERSION, status).await?,
            ResponseOutcome::NotFound | ResponseOutcome::Forbidden => {
                write_error(out, version.as_wire(), status).await?
            }
        }

        out.flush().await.context("flushing response")?;
        Ok(status)
    }

    async fn write_file<W>(
        &self,
        out: &mut W,
        mut resource: ResolvedResource,
        version: &HttpVersion,
    ) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let content_length = resource.len.to_string();
        let date = http_date();
        let mut headers = vec![
            ("Content-Type", resource.content_type.as_str()),
            ("Content-Length", content_length.as_str()),
            ("Date", date.as_str()),
        ];
        if !version.closes_after_response() {
            headers.push(("Connection", "keep-alive"));
        }

        let head = serialize_head(version.as_wire(), StatusCode::Ok, &headers);
        out.write_all(&head).await.context("writing response head")?;

        // Never send more than advertised, even if the file grew since resolve
        let mut body = (&mut resource.file).take(resource.len);
        let mut chunk = vec![0u8; self.chunk_size];
        let mut sent: u64 = 0;
        loop {
            let n = body
                .read(&mut chunk)
                .await
                .with_context(|| format!("reading {}", resource.path.display()))?;
            if n == 0 {
                break;
            }
            out.write_all(&chunk[..n]).await.context("writing response body")?;
            sent += n as u64;
        }

        // File shrank; the advertised length is already on the wire
        if sent != resource.len {
            anyhow::bail!(
                "{} changed while being sent ({} of {} bytes)",
                resource.path.display(),
                sent,
                resource.len
            );
        }

        Ok(())
    }
}

async fn write_error<W>(out: &mut W, version: &str, status: StatusCode) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let body = error_body(status);
    let content_length = body.len().to_string();
    let date = http_date();
    let headers = [
        ("Content-Type", "text/html"),
        ("Content-Length", content_length.as_str()),
        ("Date", date.as_str()),
    ];

    let mut buf = serialize_head(version, status, &headers);
    buf.put_slice(body.as_bytes());
    out.write_all(&buf).await.context("writing error response")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_layout() {
        let head = serialize_head("HTTP/1.0", StatusCode::Ok, &[("Content-Length", "3")]);
        assert_eq!(&head[..], b"HTTP/1.0 200 OK\r\nContent-Length: 3\r\n\r\n");
    }

    #[tokio::test]
    async fn bad_request_is_well_formed() {
        let mut out = Vec::new();
        let status = ResponseWriter::default()
            .write_outcome(&mut out, ResponseOutcome::BadRequest, &HttpVersion::Http10)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(status, StatusCode::BadRequest);
        assert!(text.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(text.contains("Content-Type: text/html\r\n"));
        assert!(!text.contains("Connection:"));
    }

    #[tokio::test]
    async fn error_content_length_matches_body() {
        let mut out = Vec::new();
        ResponseWriter::default()
            .write_outcome(&mut out, ResponseOutcome::NotFound, &HttpVersion::Http10)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let (head, body) = text.split_once("\r\n\r\n").unwrap();
        assert!(head.starts_with("HTTP/1.0 404 File Not Found"));
        assert!(head.contains(&format!("Content-Length: {}", body.len())));
        assert!(head.contains("Date: "));
    }
}
