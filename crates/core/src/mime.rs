//! Static extension-to-MIME table.
//!
//! The gateway never inspects file content; the `Content-Type` of a read
//! reply is chosen from the filename alone so browsers can pick an
//! appropriate handler. The mapping is a total function: anything outside
//! the table (including extensionless names) falls back to the generic
//! binary type.

use shelf_types::FileName;

/// Fallback for extensions outside the table.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Returns the MIME type for a filename, by extension.
///
/// Matching is case-insensitive on the extension. Always returns a value;
/// unknown or missing extensions yield [`FALLBACK_MIME`].
pub fn mime_for(name: &FileName) -> &'static str {
    match name.extension().as_deref() {
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("csv") => "text/csv",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("pdf") => "application/pdf",
        _ => FALLBACK_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mime(name: &str) -> &'static str {
        mime_for(&FileName::new(name).unwrap())
    }

    #[test]
    fn known_extensions_map() {
        assert_eq!(mime("notes.txt"), "text/plain");
        assert_eq!(mime("readme.md"), "text/markdown");
        assert_eq!(mime("index.html"), "text/html");
        assert_eq!(mime("legacy.htm"), "text/html");
        assert_eq!(mime("style.css"), "text/css");
        assert_eq!(mime("app.js"), "application/javascript");
        assert_eq!(mime("data.json"), "application/json");
        assert_eq!(mime("feed.xml"), "application/xml");
        assert_eq!(mime("table.csv"), "text/csv");
        assert_eq!(mime("icon.svg"), "image/svg+xml");
        assert_eq!(mime("photo.png"), "image/png");
        assert_eq!(mime("photo.jpg"), "image/jpeg");
        assert_eq!(mime("photo.jpeg"), "image/jpeg");
        assert_eq!(mime("anim.gif"), "image/gif");
        assert_eq!(mime("doc.pdf"), "application/pdf");
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(mime("REPORT.TXT"), "text/plain");
        assert_eq!(mime("Photo.JpG"), "image/jpeg");
    }

    #[test]
    fn unknown_and_missing_extensions_fall_back() {
        assert_eq!(mime("archive.tar.zst"), FALLBACK_MIME);
        assert_eq!(mime("Makefile"), FALLBACK_MIME);
        assert_eq!(mime("binary.exe"), FALLBACK_MIME);
    }
}
