//! Public key derivation.
//!
//! Walks a cleartext DER private key to extract its public integer fields,
//! assembles the SSH wire format blob, and re-encodes the blob as an X.509
//! `SubjectPublicKeyInfo` in PEM armor.

use crate::{
    der,
    reader::{BufferCursor, ReadStatus},
    Error, KeyAlgorithm, KeyInfo, Result,
};
use alloc::{string::String, vec, vec::Vec};
use base64ct::{Base64, Encoding};

/// Line width used by the PEM encoding of public keys.
const PEM_LINE_WIDTH: usize = 64;

/// `rsaEncryption` OID (1.2.840.113549.1.1.1), DER value bytes.
const OID_RSA_ENCRYPTION: &[u8] = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01];

/// `id-dsa` OID (1.2.840.10040.4.1), DER value bytes.
const OID_DSA: &[u8] = &[0x2A, 0x86, 0x48, 0xCE, 0x38, 0x04, 0x01];

/// Derived public key bundle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublicKey {
    /// Key algorithm.
    pub algorithm: KeyAlgorithm,

    /// SSH wire format blob: length-prefixed label followed by the
    /// length-prefixed integer fields.
    pub blob: Vec<u8>,

    /// PEM-armored X.509 `SubjectPublicKeyInfo` encoding of the same key.
    pub pem: String,
}

impl PublicKey {
    /// Derive the public key for `key`.
    ///
    /// If the record holds cleartext private DER, its integer fields are
    /// extracted and the wire blob built from them. If it instead carries a
    /// pre-existing public blob, that blob is reused and DER parsing is
    /// skipped entirely. With neither, [`Error::MissingKeyMaterial`].
    pub fn derive(key: &KeyInfo) -> Result<Self> {
        let blob = if let Some(private) = &key.private {
            wire_blob(key.algorithm, private)?
        } else if let Some(public) = &key.public {
            public.clone()
        } else {
            return Err(Error::MissingKeyMaterial);
        };

        let spki = spki_der(key.algorithm, &blob)?;
        let pem = pem_armor(&spki);

        Ok(Self {
            algorithm: key.algorithm,
            blob,
            pem,
        })
    }

    /// Full SSH type string, e.g. `ssh-rsa`.
    pub fn full_type(&self) -> &'static str {
        self.algorithm.label()
    }
}

/// Extract the public integer fields from a cleartext DER private key and
/// assemble the SSH wire format blob.
///
/// The wire convention orders RSA fields as `e, n` (exponent before
/// modulus), the reverse of their order in the private key; DSA fields stay
/// in `p, q, g, y` order. Integer value bytes are carried verbatim,
/// including any leading zero octet.
fn wire_blob(algorithm: KeyAlgorithm, private: &[u8]) -> Result<Vec<u8>> {
    if private.first() != Some(&der::TAG_SEQUENCE) {
        return Err(Error::MalformedKey("expected sequence"));
    }
    let outer = der::read_header(private, 0)?;

    let version = der::read_integer(private, outer.value.start, "expected integer for version")?;

    let mut blob = Vec::with_capacity(private.len() + 64);
    match algorithm {
        KeyAlgorithm::Rsa => {
            let n = der::read_integer(private, version.next(), "expected integer for n")?;
            let e = der::read_integer(private, n.next(), "expected integer for e")?;

            encode_string(&mut blob, algorithm.label().as_bytes());
            encode_string(&mut blob, &private[e.value.clone()]);
            encode_string(&mut blob, &private[n.value.clone()]);
        }
        KeyAlgorithm::Dsa => {
            let p = der::read_integer(private, version.next(), "expected integer for p")?;
            let q = der::read_integer(private, p.next(), "expected integer for q")?;
            let g = der::read_integer(private, q.next(), "expected integer for g")?;
            let y = der::read_integer(private, g.next(), "expected integer for y")?;

            encode_string(&mut blob, algorithm.label().as_bytes());
            for field in [&p, &q, &g, &y] {
                encode_string(&mut blob, &private[field.value.clone()]);
            }
        }
    }

    Ok(blob)
}

/// Re-walk a wire blob to recover the integer fields and emit the DER
/// `SubjectPublicKeyInfo` structure.
fn spki_der(algorithm: KeyAlgorithm, blob: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = BufferCursor::new(blob);
    let (_, offset) = read_field(&mut cursor, 0)?;

    let spki = match algorithm {
        KeyAlgorithm::Rsa => {
            let (e, offset) = read_field(&mut cursor, offset)?;
            let (n, _) = read_field(&mut cursor, offset)?;

            let key_seq = tlv(
                der::TAG_SEQUENCE,
                &[tlv(der::TAG_INTEGER, n), tlv(der::TAG_INTEGER, e)].concat(),
            );
            let alg_id = tlv(
                der::TAG_SEQUENCE,
                &[tlv(der::TAG_OID, OID_RSA_ENCRYPTION), tlv(der::TAG_NULL, &[])].concat(),
            );

            let mut bits = vec![0x00];
            bits.extend_from_slice(&key_seq);
            tlv(
                der::TAG_SEQUENCE,
                &[alg_id, tlv(der::TAG_BIT_STRING, &bits)].concat(),
            )
        }
        KeyAlgorithm::Dsa => {
            let (p, offset) = read_field(&mut cursor, offset)?;
            let (q, offset) = read_field(&mut cursor, offset)?;
            let (g, offset) = read_field(&mut cursor, offset)?;
            let (y, _) = read_field(&mut cursor, offset)?;

            let params = tlv(
                der::TAG_SEQUENCE,
                &[
                    tlv(der::TAG_INTEGER, p),
                    tlv(der::TAG_INTEGER, q),
                    tlv(der::TAG_INTEGER, g),
                ]
                .concat(),
            );
            let alg_id = tlv(
                der::TAG_SEQUENCE,
                &[tlv(der::TAG_OID, OID_DSA), params].concat(),
            );

            let mut bits = vec![0x00];
            bits.extend_from_slice(&tlv(der::TAG_INTEGER, y));
            tlv(
                der::TAG_SEQUENCE,
                &[alg_id, tlv(der::TAG_BIT_STRING, &bits)].concat(),
            )
        }
    };

    Ok(spki)
}

/// Frame DER bytes as a PEM public key: base64 wrapped at 64 columns, with a
/// single newline before the footer line and none after it.
fn pem_armor(spki: &[u8]) -> String {
    let b64 = Base64::encode_string(spki);
    let mut out = String::with_capacity(b64.len() + b64.len() / PEM_LINE_WIDTH + 64);

    out.push_str("-----BEGIN PUBLIC KEY-----\n");
    let mut rest = b64.as_str();
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(rest.len().min(PEM_LINE_WIDTH));
        out.push_str(line);
        out.push('\n');
        rest = tail;
    }
    out.push_str("-----END PUBLIC KEY-----");

    out
}

/// Append a length-prefixed byte string in the SSH wire convention.
fn encode_string(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(bytes);
}

/// One length-prefixed field from a wire blob this crate just assembled, so
/// truncation can only mean a corrupted blob.
fn read_field<'a>(cursor: &mut BufferCursor<'a>, offset: usize) -> Result<(&'a [u8], usize)> {
    match cursor.read_string(offset) {
        ReadStatus::Complete(bytes, next) => Ok((bytes, next)),
        ReadStatus::NeedMore => Err(Error::MalformedKey("truncated public key blob")),
    }
}

/// Build one TLV field as an owned buffer, for nesting.
fn tlv(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len() + 6);
    der::write_tlv(&mut out, tag, value);
    out
}
