//! V2 container: fixed 8-byte header with length-prefixed metadata
//!
//! ```text
//! offset  size  field
//!      0     1  version = 0x02
//!      1     1  flags (bit 1 = encrypted)
//!      2     2  filename length (u16 BE)
//!      4     2  MIME type length (u16 BE)
//!      6     2  padding
//!      8     …  plain:     filename ‖ MIME type ‖ payload
//!               encrypted: AESv2 bundle of a complete plain V2 record
//! ```
//!
//! An encrypted record carries zeroed length fields; everything it describes
//! lives inside the bundle, header included.

use sealdrop_core::FormatVersion;
use sealdrop_crypto::{AesV2, Suite};

use crate::container::{PlainFile, SealedFile, StoredFile};
use crate::error::{FormatError, FormatResult};

pub const VERSION: u8 = 0x02;
pub const ENCRYPTED_FLAG: u8 = 0b0000_0010;
pub const HEADER_SIZE: usize = 8;
pub const MAX_FIELD_LEN: usize = u16::MAX as usize;

struct Header {
    flags: u8,
    filename_len: usize,
    mime_len: usize,
}

impl Header {
    fn parse(bytes: &[u8]) -> FormatResult<Self> {
        if bytes.len() < HEADER_SIZE || bytes[0] != VERSION {
            return Err(FormatError::Malformed("not a V2 header".into()));
        }
        Ok(Self {
            flags: bytes[1],
            filename_len: usize::from(u16::from_be_bytes([bytes[2], bytes[3]])),
            mime_len: usize::from(u16::from_be_bytes([bytes[4], bytes[5]])),
        })
    }

    fn encode(&self) -> [u8; HEADER_SIZE] {
        // Lengths are range-checked by field_len before a header is built
        let filename_len = (self.filename_len as u16).to_be_bytes();
        let mime_len = (self.mime_len as u16).to_be_bytes();
        [
            VERSION,
            self.flags,
            filename_len[0],
            filename_len[1],
            mime_len[0],
            mime_len[1],
            0,
            0,
        ]
    }

    fn is_encrypted(&self) -> bool {
        self.flags & ENCRYPTED_FLAG != 0
    }
}

pub fn complies(bytes: &[u8]) -> bool {
    bytes.len() >= HEADER_SIZE && bytes[0] == VERSION
}

pub fn read(fs_filename: &str, bytes: &[u8]) -> FormatResult<StoredFile> {
    let header = Header::parse(bytes)?;
    let body = &bytes[HEADER_SIZE..];

    if header.is_encrypted() {
        if header.filename_len != 0 || header.mime_len != 0 {
            return Err(FormatError::Malformed(
                "encrypted V2 header carries metadata lengths".into(),
            ));
        }
        return Ok(StoredFile::Sealed(SealedFile::from_parts(
            FormatVersion::V2,
            fs_filename,
            body.to_vec(),
        )));
    }

    decode_plain(fs_filename, &header, body).map(StoredFile::Plain)
}

pub fn encode_plain(file: &PlainFile) -> FormatResult<Vec<u8>> {
    let filename = file.filename().as_bytes();
    let mime_type = file.mime_type().as_bytes();
    let header = Header {
        flags: 0,
        filename_len: field_len("filename", filename)?,
        mime_len: field_len("mime_type", mime_type)?,
    };

    let mut out =
        Vec::with_capacity(HEADER_SIZE + filename.len() + mime_type.len() + file.payload().len());
    out.extend_from_slice(&header.encode());
    out.extend_from_slice(filename);
    out.extend_from_slice(mime_type);
    out.extend_from_slice(file.payload());
    Ok(out)
}

pub fn encode_sealed(file: &SealedFile) -> Vec<u8> {
    let header = Header {
        flags: ENCRYPTED_FLAG,
        filename_len: 0,
        mime_len: 0,
    };
    let mut out = Vec::with_capacity(HEADER_SIZE + file.bundle().len());
    out.extend_from_slice(&header.encode());
    out.extend_from_slice(file.bundle());
    out
}

/// Encrypt the complete plain record so decryption restores the metadata.
pub(crate) fn seal(file: &PlainFile, key: &[u8]) -> FormatResult<Vec<u8>> {
    let record = encode_plain(file)?;
    Ok(AesV2::encrypt(key, &record)?)
}

pub(crate) fn open(file: &SealedFile, key: &[u8]) -> FormatResult<PlainFile> {
    let record = AesV2::decrypt(key, file.bundle())?;
    if !complies(&record) {
        return Err(FormatError::Malformed(
            "decrypted bundle is not a V2 record".into(),
        ));
    }
    match read(file.fs_filename(), &record)? {
        StoredFile::Plain(plain) => Ok(plain),
        // One layer of encryption per record; nesting is never produced here
        StoredFile::Sealed(_) => Err(FormatError::InvalidState(
            "decrypted record is itself encrypted",
        )),
    }
}

fn field_len(field: &'static str, value: &[u8]) -> FormatResult<usize> {
    if value.len() > MAX_FIELD_LEN {
        return Err(FormatError::FieldTooLong {
            field,
            len: value.len(),
            max: MAX_FIELD_LEN,
        });
    }
    Ok(value.len())
}

fn decode_plain(fs_filename: &str, header: &Header, body: &[u8]) -> FormatResult<PlainFile> {
    let meta_len = header.filename_len + header.mime_len;
    if body.len() < meta_len {
        return Err(FormatError::Malformed(format!(
            "V2 metadata needs {meta_len} bytes, record body has {}",
            body.len()
        )));
    }

    let (filename, rest) = body.split_at(header.filename_len);
    let (mime_type, payload) = rest.split_at(header.mime_len);
    let filename = std::str::from_utf8(filename)
        .map_err(|_| FormatError::Malformed("V2 filename is not UTF-8".into()))?;
    let mime_type = std::str::from_utf8(mime_type)
        .map_err(|_| FormatError::Malformed("V2 MIME type is not UTF-8".into()))?;

    let mime_type = if mime_type.is_empty() {
        crate::mime::sniff(payload)
    } else {
        mime_type.to_string()
    };

    Ok(PlainFile::from_parts(
        FormatVersion::V2,
        fs_filename,
        filename,
        mime_type,
        payload.to_vec(),
    ))
}
