//! Tests for DER field extraction and public key derivation.

use base64ct::{Base64, Encoding};
use hex_literal::hex;
use ssh_legacy_key::{BufferCursor, Error, KeyAlgorithm, KeyInfo, PublicKey};

/// RSAPrivateKey ::= SEQUENCE { version 0, n = 008001, e = 010001, ... }
const RSA_DER: &[u8] = &hex!("300D 020100 0203008001 0203010001");

/// DSAPrivateKey ::= SEQUENCE { version 0, p = 0102, q = 03, g = 040506,
/// y = 07 } (a real key would continue with x, which is never inspected)
const DSA_DER: &[u8] = &hex!("3012 020100 02020102 020103 0203040506 020107");

fn rsa_key(private: &[u8]) -> KeyInfo {
    KeyInfo {
        algorithm: KeyAlgorithm::Rsa,
        encryption: None,
        extra: vec![],
        private: Some(private.to_vec()),
        private_pem: None,
        public: None,
    }
}

fn dsa_key(private: &[u8]) -> KeyInfo {
    KeyInfo {
        algorithm: KeyAlgorithm::Dsa,
        ..rsa_key(private)
    }
}

fn pem_body(pem: &str) -> Vec<u8> {
    assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----\n"));
    assert!(pem.ends_with("-----END PUBLIC KEY-----"));
    let body: String = pem
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect();
    Base64::decode_vec(&body).unwrap()
}

#[test]
fn rsa_wire_blob_puts_exponent_before_modulus() {
    let public = PublicKey::derive(&rsa_key(RSA_DER)).unwrap();
    assert_eq!(public.algorithm, KeyAlgorithm::Rsa);
    assert_eq!(public.full_type(), "ssh-rsa");
    assert_eq!(
        public.blob,
        hex!(
            "00000007 7373682D 727361" // "ssh-rsa"
            "00000003 010001" // e
            "00000003 008001" // n
        )
    );
}

#[test]
fn dsa_wire_blob_golden_field_order() {
    let public = PublicKey::derive(&dsa_key(DSA_DER)).unwrap();
    assert_eq!(public.full_type(), "ssh-dss");

    let golden = hex!(
        "00000007 7373682D 647373" // "ssh-dss"
        "00000002 0102" // p
        "00000001 03" // q
        "00000003 040506" // g
        "00000001 07" // y
    );
    assert_eq!(public.blob, golden);

    // swapping two private key fields must be visible against the golden
    let swapped = hex!("3012 020100 020103 02020102 0203040506 020107"); // q before p
    let public = PublicKey::derive(&dsa_key(&swapped)).unwrap();
    assert_ne!(public.blob, golden);
}

#[test]
fn rsa_spki_pem_golden() {
    let public = PublicKey::derive(&rsa_key(RSA_DER)).unwrap();
    assert_eq!(
        pem_body(&public.pem),
        hex!(
            "301E" // SubjectPublicKeyInfo
            "300D 0609 2A864886F70D010101 0500" // rsaEncryption, NULL
            "030D00" // BIT STRING
            "300A 0203008001 0203010001" // SEQUENCE { n, e }
        )
    );
}

#[test]
fn dsa_spki_pem_golden() {
    let public = PublicKey::derive(&dsa_key(DSA_DER)).unwrap();
    assert_eq!(
        pem_body(&public.pem),
        hex!(
            "301F" // SubjectPublicKeyInfo
            "3017 0607 2A8648CE380401" // id-dsa
            "300C 02020102 020103 0203040506" // SEQUENCE { p, q, g }
            "030400 020107" // BIT STRING { y }
        )
    );
}

#[test]
fn pem_wraps_at_64_columns_with_single_trailing_newline() {
    // a modulus long enough to need several base64 lines
    let mut der = vec![0x30, 0x82, 0x01, 0x0C, 0x02, 0x01, 0x00];
    der.extend_from_slice(&[0x02, 0x82, 0x01, 0x00]);
    der.extend_from_slice(&[0xA5; 0x100]); // n
    der.extend_from_slice(&hex!("0203010001")); // e

    let public = PublicKey::derive(&rsa_key(&der)).unwrap();
    let lines: Vec<&str> = public.pem.lines().collect();

    assert_eq!(lines.first(), Some(&"-----BEGIN PUBLIC KEY-----"));
    assert_eq!(lines.last(), Some(&"-----END PUBLIC KEY-----"));
    for line in &lines[1..lines.len() - 1] {
        assert!(line.len() <= 64 && !line.is_empty());
    }
    assert!(public.pem.contains("\n-----END PUBLIC KEY-----"));
    assert!(!public.pem.ends_with('\n'));
}

#[test]
fn spki_decodes_with_standard_decoder() {
    use spki::{der::Decode, ObjectIdentifier, SubjectPublicKeyInfoRef};

    let rsa = PublicKey::derive(&rsa_key(RSA_DER)).unwrap();
    let der = pem_body(&rsa.pem);
    let info = SubjectPublicKeyInfoRef::from_der(&der).unwrap();
    assert_eq!(
        info.algorithm.oid,
        ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1")
    );

    let dsa = PublicKey::derive(&dsa_key(DSA_DER)).unwrap();
    let der = pem_body(&dsa.pem);
    let info = SubjectPublicKeyInfoRef::from_der(&der).unwrap();
    assert_eq!(
        info.algorithm.oid,
        ObjectIdentifier::new_unwrap("1.2.840.10040.4.1")
    );
}

#[test]
fn derived_fields_match_fresh_rsa_keypair() {
    use rsa::{pkcs1::EncodeRsaPrivateKey, traits::PublicKeyParts, RsaPrivateKey};

    let mut rng = rand::thread_rng();
    let private = RsaPrivateKey::new(&mut rng, 1024).unwrap();
    let der = private.to_pkcs1_der().unwrap();

    let public = PublicKey::derive(&rsa_key(der.as_bytes())).unwrap();

    let mut cursor = BufferCursor::new(&public.blob);
    let (label, offset) = cursor.read_string(0).complete().unwrap();
    let (e, offset) = cursor.read_string(offset).complete().unwrap();
    let (n, offset) = cursor.read_string(offset).complete().unwrap();

    assert_eq!(label, b"ssh-rsa");
    assert_eq!(offset, public.blob.len());
    assert_eq!(strip_leading_zeros(e), private.e().to_bytes_be());
    assert_eq!(strip_leading_zeros(n), private.n().to_bytes_be());

    // and the PEM form decodes to the same modulus
    use spki::{der::Decode, SubjectPublicKeyInfoRef};
    let spki_der = pem_body(&public.pem);
    let info = SubjectPublicKeyInfoRef::from_der(&spki_der).unwrap();
    let n_der = first_integer(info.subject_public_key.raw_bytes());
    assert_eq!(strip_leading_zeros(n_der), private.n().to_bytes_be());
}

fn strip_leading_zeros(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().skip_while(|&&b| b == 0).cloned().collect()
}

/// Value bytes of the first INTEGER inside a DER SEQUENCE.
fn first_integer(buf: &[u8]) -> &[u8] {
    fn header(buf: &[u8], offset: usize) -> (usize, usize) {
        let first = buf[offset + 1] as usize;
        if first < 0x80 {
            (offset + 2, first)
        } else {
            let octets = first & 0x7F;
            let mut len = 0usize;
            for byte in &buf[offset + 2..offset + 2 + octets] {
                len = (len << 8) | *byte as usize;
            }
            (offset + 2 + octets, len)
        }
    }

    let (start, _) = header(buf, 0); // outer SEQUENCE
    let (value_start, value_len) = header(buf, start);
    assert_eq!(buf[start], 0x02);
    &buf[value_start..value_start + value_len]
}

#[test]
fn non_sequence_leading_byte() {
    let private = hex!("0203010001");
    assert_eq!(
        PublicKey::derive(&rsa_key(&private)),
        Err(Error::MalformedKey("expected sequence"))
    );
}

#[test]
fn field_specific_tag_mismatches() {
    // version is not an INTEGER
    let private = hex!("3003 0401AA");
    assert_eq!(
        PublicKey::derive(&rsa_key(&private)),
        Err(Error::MalformedKey("expected integer for version"))
    );

    // n is not an INTEGER
    let private = hex!("3006 020100 0401AA");
    assert_eq!(
        PublicKey::derive(&rsa_key(&private)),
        Err(Error::MalformedKey("expected integer for n"))
    );

    // e missing entirely
    let private = hex!("3008 020100 0203008001");
    assert_eq!(
        PublicKey::derive(&rsa_key(&private)),
        Err(Error::MalformedKey("expected integer for e"))
    );

    // DSA g is not an INTEGER
    let private = hex!("300C 020100 02020102 020103 0401AA");
    assert_eq!(
        PublicKey::derive(&dsa_key(&private)),
        Err(Error::MalformedKey("expected integer for g"))
    );
}

#[test]
fn existing_public_blob_reused_without_der_parsing() {
    let blob = hex!(
        "00000007 7373682D 727361"
        "00000003 010001"
        "00000003 008001"
    );
    let info = KeyInfo {
        algorithm: KeyAlgorithm::Rsa,
        encryption: None,
        extra: vec![],
        private: None,
        private_pem: None,
        public: Some(blob.to_vec()),
    };

    let public = PublicKey::derive(&info).unwrap();
    assert_eq!(public.blob, blob);
    assert_eq!(
        pem_body(&public.pem),
        pem_body(&PublicKey::derive(&rsa_key(RSA_DER)).unwrap().pem)
    );
}

#[test]
fn missing_key_material() {
    let info = KeyInfo {
        algorithm: KeyAlgorithm::Rsa,
        encryption: None,
        extra: vec![],
        private: None,
        private_pem: None,
        public: None,
    };
    assert_eq!(PublicKey::derive(&info), Err(Error::MissingKeyMaterial));
}
