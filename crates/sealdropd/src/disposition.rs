//! `Content-Disposition` for served files
//!
//! Only MIME types on the allow-list render inline. Everything else,
//! including `text/html` and `image/svg+xml`, is sent as an attachment so a
//! stored file can never run script in the relay's origin.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// RFC 3986 unreserved characters stay literal; everything else is escaped.
const FILENAME_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const INLINE_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/bmp",
    "audio/mpeg",
    "audio/ogg",
    "audio/wav",
    "audio/webm",
    "audio/flac",
    "video/mp4",
    "video/webm",
    "video/ogg",
    "text/plain",
    "application/pdf",
    "application/json",
];

/// `type/subtype` in lowercase, without parameters.
fn essence(mime_type: &str) -> String {
    match mime_type.parse::<mime::Mime>() {
        Ok(m) => m.essence_str().to_ascii_lowercase(),
        Err(_) => mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase(),
    }
}

pub fn is_inline(mime_type: &str) -> bool {
    INLINE_TYPES.contains(&essence(mime_type).as_str())
}

/// Header value carrying `filename` in both the quoted and RFC 5987 forms.
pub fn content_disposition(filename: &str, mime_type: &str) -> String {
    let disposition = if is_inline(mime_type) {
        "inline"
    } else {
        "attachment"
    };
    let encoded = utf8_percent_encode(filename, FILENAME_ESCAPE).to_string();
    format!("{disposition}; filename=\"{encoded}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_is_attachment() {
        assert_eq!(
            content_disposition("page one \u{e9}.html", "text/html"),
            "attachment; filename=\"page%20one%20%C3%A9.html\"; \
             filename*=UTF-8''page%20one%20%C3%A9.html"
        );
    }

    #[test]
    fn test_png_is_inline() {
        assert_eq!(
            content_disposition("holiday pic \u{e9}.png", "image/png"),
            "inline; filename=\"holiday%20pic%20%C3%A9.png\"; \
             filename*=UTF-8''holiday%20pic%20%C3%A9.png"
        );
    }

    #[test]
    fn test_svg_is_attachment() {
        assert!(!is_inline("image/svg+xml"));
    }

    #[test]
    fn test_unknown_defaults_to_attachment() {
        assert!(!is_inline("application/octet-stream"));
        assert!(!is_inline("application/x-empty"));
        assert!(!is_inline(""));
        assert!(!is_inline("not a mime type"));
    }

    #[test]
    fn test_parameters_and_case_ignored() {
        assert!(is_inline("text/plain; charset=utf-8"));
        assert!(is_inline("IMAGE/PNG"));
        assert!(!is_inline("Text/HTML; charset=utf-8"));
    }

    #[test]
    fn test_quotes_and_slashes_escaped() {
        let header = content_disposition("a\"b/c;d.txt", "text/plain");
        assert_eq!(
            header,
            "inline; filename=\"a%22b%2Fc%3Bd.txt\"; filename*=UTF-8''a%22b%2Fc%3Bd.txt"
        );
    }

    #[test]
    fn test_unreserved_untouched() {
        let header = content_disposition("A-z_0.9~", "application/pdf");
        assert!(header.contains("filename=\"A-z_0.9~\""));
    }
}
