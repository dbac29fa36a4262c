//! Maps request targets onto files under the document root.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::fs::File;

use crate::http::mime;
use crate::http::response::ResponseOutcome;

/// Document served for `/` and for an empty target.
pub const DEFAULT_DOCUMENT: &str = "index.html";

/// A file that was found, opened and checked, ready to be streamed.
#[derive(Debug)]
pub struct ResolvedResource {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Open handle; the body is streamed from this, not from `path`
    pub file: File,
    /// Exact byte length, sent as `Content-Length`
    pub len: u64,
    /// Full `Content-Type` header value
    pub content_type: String,
}

/// Resolves request targets against one document root.
///
/// The root is canonicalized once at construction and shared read-only by
/// every connection.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(document_root: impl AsRef<Path>) -> anyhow::Result<Self> {
        let document_root = document_root.as_ref();
        let root = std::fs::canonicalize(document_root).with_context(|| {
            format!("document root {} is not accessible", document_root.display())
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path on disk a target maps to, before any filesystem access.
    pub fn candidate(&self, target: &str) -> PathBuf {
        self.root.join(normalize_target(target))
    }

    /// Resolves a target into `Success`, `NotFound` or `Forbidden`.
    ///
    /// Checks run in order: the candidate must be confirmed to exist and not
    /// be a directory (else `NotFound`), then it must open for reading and
    /// stay inside the root once symlinks are followed (else `Forbidden`).
    /// Unexpected I/O errors are returned as errors.
    pub async fn resolve(&self, target: &str) -> anyhow::Result<ResponseOutcome> {
        let candidate = self.candidate(target);

        let metadata = match tokio::fs::metadata(&candidate).await {
            Ok(m) => m,
            Err(e) => return failed_check(Check::Exists, e),
        };
        if metadata.is_dir() {
            return Ok(ResponseOutcome::NotFound);
        }

        let file = match File::open(&candidate).await {
            Ok(f) => f,
            Err(e) => {
                return failed_check(Check::Readable, e)
                    .with_context(|| format!("opening {}", candidate.display()));
            }
        };

        let canonical = tokio::fs::canonicalize(&candidate)
            .await
            .with_context(|| format!("canonicalizing {}", candidate.display()))?;
        if !canonical.starts_with(&self.root) {
            tracing::warn!(path = %canonical.display(), "target escapes document root");
            return Ok(ResponseOutcome::Forbidden);
        }

        let len = file
            .metadata()
            .await
            .with_context(|| format!("reading metadata of {}", candidate.display()))?
            .len();
        let content_type = mime::header_value(&candidate);

        Ok(ResponseOutcome::Success(ResolvedResource {
            path: candidate,
            file,
            len,
            content_type,
        }))
    }
}

#[derive(Debug, Clone, Copy)]
enum Check {
    Exists,
    Readable,
}

/// Maps a failed filesystem check onto a response.
///
/// Anything that keeps the existence check from succeeding (including an
/// untraversable parent directory) is a 404. A file that exists but cannot
/// be opened is a 403.
fn failed_check(check: Check, err: io::Error) -> anyhow::Result<ResponseOutcome> {
    match (check, err.kind()) {
        (Check::Exists, _) => Ok(ResponseOutcome::NotFound),
        (Check::Readable, ErrorKind::PermissionDenied) => Ok(ResponseOutcome::Forbidden),
        (Check::Readable, ErrorKind::NotFound) => Ok(ResponseOutcome::NotFound),
        (Check::Readable, _) => Err(err.into()),
    }
}

/// Turns a raw request target into a path relative to the document root.
///
/// Query string and fragment are dropped. `/` and the empty target become
/// the default document. `.` segments vanish and `..` never climbs above
/// the root.
pub fn normalize_target(target: &str) -> PathBuf {
    let target = target.split(['?', '#']).next().unwrap_or_default();
    if target.is_empty() || target == "/" {
        return PathBuf::from(DEFAULT_DOCUMENT);
    }

    let mut stack = Vec::new();
    for part in target.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            part => stack.push(part),
        }
    }

    stack.into_iter().collect()
}
