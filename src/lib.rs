//! Decoder for legacy OpenSSL-style SSH private key files.
//!
//! This crate handles the key-material side of the classic PEM private key
//! format (`-----BEGIN RSA/DSA PRIVATE KEY-----` with an optional `DEK-Info`
//! header): decrypting passphrase-protected key bytes using the historical
//! `EVP_BytesToKey` single-round MD5 derivation, walking the decrypted DER
//! to extract the public integer fields, and producing the matching public
//! key in both SSH wire format and PEM-armored X.509 `SubjectPublicKeyInfo`
//! form.
//!
//! Locating the armor lines and headers in key file text is a collaborating
//! parser's job; this crate consumes the already-parsed [`KeyInfo`] record.
//!
//! ```
//! use ssh_legacy_key::{KeyAlgorithm, KeyInfo, PublicKey};
//!
//! // RSAPrivateKey ::= SEQUENCE { version, n, e, ... }
//! // (fields after the public exponent are not inspected)
//! let der = [
//!     0x30, 0x0D, 0x02, 0x01, 0x00, 0x02, 0x03, 0x00, 0x80, 0x01, 0x02,
//!     0x03, 0x01, 0x00, 0x01,
//! ];
//!
//! let key = KeyInfo {
//!     algorithm: KeyAlgorithm::Rsa,
//!     encryption: None,
//!     extra: Vec::new(),
//!     private: Some(der.to_vec()),
//!     private_pem: None,
//!     public: None,
//! };
//!
//! let public = PublicKey::derive(&key)?;
//! assert_eq!(public.full_type(), "ssh-rsa");
//! assert!(public.pem.starts_with("-----BEGIN PUBLIC KEY-----\n"));
//! # Ok::<(), ssh_legacy_key::Error>(())
//! ```

#![no_std]
#![forbid(unsafe_code)]
#![warn(
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod cipher;
mod der;
mod error;
mod key;
mod public;
mod reader;

pub mod kdf;

pub use crate::{
    cipher::{increment_counter, Cipher},
    error::{Error, Result},
    key::{KeyAlgorithm, KeyInfo},
    public::PublicKey,
    reader::{BufferCursor, ReadStatus},
};
