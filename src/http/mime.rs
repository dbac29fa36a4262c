use std::path::Path;

/// Content type sent for files whose extension is not in the table.
///
/// This is not a real MIME type; it is still sent verbatim as the
/// `Content-Type` value and the file is served anyway.
pub const UNSUPPORTED: &str = "Unsupported file type";

const CONTENT_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("txt", "text/plain"),
    ("jpg", "image/jpg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
];

/// Looks up the bare content type for a path by its (case-insensitive) extension.
pub fn content_type(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return UNSUPPORTED;
    };
    let ext = ext.to_ascii_lowercase();

    CONTENT_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(UNSUPPORTED)
}

/// Full `Content-Type` header value, with `; charset=UTF-8` for text types.
pub fn header_value(path: &Path) -> String {
    let mime = content_type(path);
    if mime.starts_with("text/") {
        format!("{mime}; charset=UTF-8")
    } else {
        mime.to_string()
    }
}
