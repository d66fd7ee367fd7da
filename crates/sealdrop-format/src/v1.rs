//! V1 container: one marker byte, then either a filename-footed record or
//! an AESv1 bundle
//!
//! ```text
//! plain:     '0' [payload][filename][6 ASCII digits: filename length]
//! encrypted: '1' AESv1( [payload][filename][6 ASCII digits] )
//! ```
//!
//! V1 never stored a MIME type; it is sniffed from the payload on every read.

use sealdrop_core::FormatVersion;
use sealdrop_crypto::{AesV1, Suite};

use crate::container::{PlainFile, SealedFile, StoredFile};
use crate::error::{FormatError, FormatResult};
use crate::mime;

pub const PLAIN_MARKER: u8 = b'0';
pub const ENCRYPTED_MARKER: u8 = b'1';

/// Width of the decimal filename-length footer.
pub const FOOTER_SIZE: usize = 6;

/// Largest filename the footer can describe.
pub const MAX_FILENAME_LEN: usize = 999_999;

/// A V1 blob starts with one of the two ASCII markers.
pub fn complies(bytes: &[u8]) -> bool {
    matches!(bytes.first(), Some(&PLAIN_MARKER) | Some(&ENCRYPTED_MARKER))
}

pub fn read(fs_filename: &str, bytes: &[u8]) -> FormatResult<StoredFile> {
    match bytes.split_first() {
        Some((&ENCRYPTED_MARKER, bundle)) => Ok(StoredFile::Sealed(SealedFile::from_parts(
            FormatVersion::V1,
            fs_filename,
            bundle.to_vec(),
        ))),
        Some((&PLAIN_MARKER, body)) => decode_record(fs_filename, body).map(StoredFile::Plain),
        _ => Err(FormatError::Malformed("missing V1 marker".into())),
    }
}

pub fn encode_plain(file: &PlainFile) -> FormatResult<Vec<u8>> {
    let record = encode_record(file)?;
    let mut out = Vec::with_capacity(1 + record.len());
    out.push(PLAIN_MARKER);
    out.extend_from_slice(&record);
    Ok(out)
}

pub fn encode_sealed(file: &SealedFile) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + file.bundle().len());
    out.push(ENCRYPTED_MARKER);
    out.extend_from_slice(file.bundle());
    out
}

/// Encrypt the footed record; the marker stays outside the bundle.
pub(crate) fn seal(file: &PlainFile, key: &[u8]) -> FormatResult<Vec<u8>> {
    let record = encode_record(file)?;
    Ok(AesV1::encrypt(key, &record)?)
}

pub(crate) fn open(file: &SealedFile, key: &[u8]) -> FormatResult<PlainFile> {
    let record = AesV1::decrypt(key, file.bundle())?;
    decode_record(file.fs_filename(), &record)
}

fn encode_record(file: &PlainFile) -> FormatResult<Vec<u8>> {
    let filename = file.filename().as_bytes();
    if filename.len() > MAX_FILENAME_LEN {
        return Err(FormatError::FieldTooLong {
            field: "filename",
            len: filename.len(),
            max: MAX_FILENAME_LEN,
        });
    }

    let mut record = Vec::with_capacity(file.payload().len() + filename.len() + FOOTER_SIZE);
    record.extend_from_slice(file.payload());
    record.extend_from_slice(filename);
    record.extend_from_slice(format!("{:06}", filename.len()).as_bytes());
    Ok(record)
}

fn decode_record(fs_filename: &str, record: &[u8]) -> FormatResult<PlainFile> {
    if record.len() < FOOTER_SIZE {
        return Err(FormatError::Malformed(format!(
            "V1 record is {} bytes, shorter than its footer",
            record.len()
        )));
    }

    let (body, footer) = record.split_at(record.len() - FOOTER_SIZE);
    if !footer.iter().all(u8::is_ascii_digit) {
        return Err(FormatError::Malformed("V1 footer is not decimal".into()));
    }
    // Six ASCII digits always fit a usize
    let filename_len = footer
        .iter()
        .fold(0usize, |acc, d| acc * 10 + usize::from(d - b'0'));

    if filename_len > body.len() {
        return Err(FormatError::Malformed(format!(
            "V1 filename length {filename_len} exceeds record body of {} bytes",
            body.len()
        )));
    }
    let (payload, filename) = body.split_at(body.len() - filename_len);
    let filename = std::str::from_utf8(filename)
        .map_err(|_| FormatError::Malformed("V1 filename is not UTF-8".into()))?;

    Ok(PlainFile::from_parts(
        FormatVersion::V1,
        fs_filename,
        filename,
        mime::sniff(payload),
        payload.to_vec(),
    ))
}
