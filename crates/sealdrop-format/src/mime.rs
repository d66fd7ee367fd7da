//! Content sniffing for payloads whose MIME type was never recorded

/// Best-effort MIME type from the payload's leading bytes.
///
/// Magic-number matches win; anything else that decodes as UTF-8 is treated
/// as plain text.
pub fn sniff(payload: &[u8]) -> String {
    if payload.is_empty() {
        return "application/x-empty".to_string();
    }
    if let Some(kind) = infer::get(payload) {
        return kind.mime_type().to_string();
    }
    if std::str::from_utf8(payload).is_ok() {
        return "text/plain".to_string();
    }
    "application/octet-stream".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png() {
        assert_eq!(sniff(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"), "image/png");
    }

    #[test]
    fn test_pdf() {
        assert_eq!(sniff(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n"), "application/pdf");
    }

    #[test]
    fn test_text() {
        assert_eq!(sniff("caf\u{e9} au lait".as_bytes()), "text/plain");
    }

    #[test]
    fn test_binary_fallback() {
        assert_eq!(sniff(&[0xff, 0xfe, 0x00, 0x80, 0x81]), "application/octet-stream");
    }

    #[test]
    fn test_empty() {
        assert_eq!(sniff(b""), "application/x-empty");
    }
}
