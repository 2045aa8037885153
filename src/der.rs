//! Minimal DER tag-length-value cursor.
//!
//! Private keys produced by legacy OpenSSL tooling have a fixed field order
//! known in advance, so there is no ASN.1 schema machinery here: just enough
//! of a TLV walk to step over a `SEQUENCE` header and pull out `INTEGER`
//! fields by position, and just enough of an encoder to re-emit a
//! `SubjectPublicKeyInfo`.

use crate::{Error, Result};
use alloc::vec::Vec;
use core::ops::Range;

/// ASN.1 `SEQUENCE` tag (constructed).
pub(crate) const TAG_SEQUENCE: u8 = 0x30;

/// ASN.1 `INTEGER` tag.
pub(crate) const TAG_INTEGER: u8 = 0x02;

/// ASN.1 `BIT STRING` tag.
pub(crate) const TAG_BIT_STRING: u8 = 0x03;

/// ASN.1 `NULL` tag.
pub(crate) const TAG_NULL: u8 = 0x05;

/// ASN.1 `OBJECT IDENTIFIER` tag.
pub(crate) const TAG_OID: u8 = 0x06;

/// One decoded TLV header: the tag plus the byte range of the value within
/// the original buffer. The offset of the following field is `value.end`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Tlv {
    /// Tag octet.
    pub tag: u8,

    /// Byte range of the field's value, bounds-checked against the buffer
    /// the header was read from.
    pub value: Range<usize>,
}

impl Tlv {
    /// Offset of the first byte after this field.
    pub fn next(&self) -> usize {
        self.value.end
    }
}

/// Read one TLV header at `offset`.
///
/// Lengths use the DER short form (single byte below 128) or long form (top
/// bit set, low 7 bits giving the count of following big-endian length
/// bytes). The value range is validated to lie within `buf`.
pub(crate) fn read_header(buf: &[u8], offset: usize) -> Result<Tlv> {
    let tag = *buf
        .get(offset)
        .ok_or(Error::MalformedKey("truncated field header"))?;
    let mut pos = offset
        .checked_add(1)
        .ok_or(Error::MalformedKey("truncated field header"))?;

    let first = *buf
        .get(pos)
        .ok_or(Error::MalformedKey("truncated field length"))?;
    pos += 1;

    let len = if first & 0x80 == 0 {
        first as usize
    } else {
        let octets = (first & 0x7F) as usize;
        if octets == 0 || octets > size_of::<usize>() {
            return Err(Error::MalformedKey("unsupported field length"));
        }
        let end = pos
            .checked_add(octets)
            .ok_or(Error::MalformedKey("truncated field length"))?;
        let bytes = buf
            .get(pos..end)
            .ok_or(Error::MalformedKey("truncated field length"))?;
        pos = end;
        bytes.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize)
    };

    let end = pos
        .checked_add(len)
        .ok_or(Error::MalformedKey("truncated field value"))?;
    if end > buf.len() {
        return Err(Error::MalformedKey("truncated field value"));
    }

    Ok(Tlv {
        tag,
        value: pos..end,
    })
}

/// Read one TLV header at `offset` and require it to be an `INTEGER`,
/// failing with the caller's field-specific `context` otherwise.
pub(crate) fn read_integer(buf: &[u8], offset: usize, context: &'static str) -> Result<Tlv> {
    let tlv = read_header(buf, offset)?;
    if tlv.tag != TAG_INTEGER {
        return Err(Error::MalformedKey(context));
    }
    Ok(tlv)
}

/// Append one TLV field to `out`.
pub(crate) fn write_tlv(out: &mut Vec<u8>, tag: u8, value: &[u8]) {
    out.push(tag);
    write_length(out, value.len());
    out.extend_from_slice(value);
}

/// Append a DER length, using the long form when `len` exceeds 127.
pub(crate) fn write_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let bytes = len.to_be_bytes();
        let skip = bytes.iter().take_while(|&&b| b == 0).count();
        out.push(0x80 | (bytes.len() - skip) as u8);
        out.extend_from_slice(&bytes[skip..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn short_form_header() {
        let buf = [0x02, 0x02, 0xAB, 0xCD];
        let tlv = read_header(&buf, 0).unwrap();
        assert_eq!(tlv.tag, TAG_INTEGER);
        assert_eq!(tlv.value, 2..4);
        assert_eq!(tlv.next(), 4);
    }

    #[test]
    fn long_form_header() {
        let mut buf = vec![0x30, 0x81, 0x80];
        buf.extend_from_slice(&[0u8; 0x80]);
        let tlv = read_header(&buf, 0).unwrap();
        assert_eq!(tlv.tag, TAG_SEQUENCE);
        assert_eq!(tlv.value, 3..3 + 0x80);
    }

    #[test]
    fn truncated_value_rejected() {
        let buf = [0x02, 0x05, 0x01];
        assert_eq!(
            read_header(&buf, 0),
            Err(Error::MalformedKey("truncated field value"))
        );
    }

    #[test]
    fn integer_tag_mismatch_uses_context() {
        let buf = [0x30, 0x00];
        assert_eq!(
            read_integer(&buf, 0, "expected integer for n"),
            Err(Error::MalformedKey("expected integer for n"))
        );
    }

    #[test]
    fn length_round_trip() {
        for &len in &[0usize, 1, 127, 128, 255, 256, 65535, 65536] {
            let mut out = Vec::new();
            write_length(&mut out, len);

            // reparse through a synthetic header
            let mut buf = vec![TAG_SEQUENCE];
            buf.extend_from_slice(&out);
            buf.extend_from_slice(&vec![0u8; len]);
            let tlv = read_header(&buf, 0).unwrap();
            assert_eq!(tlv.value.len(), len);
        }
    }
}
