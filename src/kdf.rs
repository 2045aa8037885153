//! Legacy OpenSSL key derivation.
//!
//! This is the historical `EVP_BytesToKey` single-hash-round scheme used by
//! OpenSSL-style encrypted PEM files, kept for compatibility with keys
//! generated by older tooling. It is distinct from (and far weaker than)
//! PBKDF2; do not use it for anything new.

use alloc::vec::Vec;
use md5::{Digest, Md5};
use zeroize::Zeroizing;

/// Size of the KDF salt in bytes: the first half of the 16-byte value stored
/// in the key file's `DEK-Info` header.
pub const SALT_SIZE: usize = 8;

/// Derive a `key_size`-byte encryption key from a passphrase and salt.
///
/// The first block is `MD5(passphrase ‖ salt)`. While the key is short of
/// `key_size`, the first 8 bytes of `MD5(key ‖ passphrase ‖ salt)` are
/// appended, and the result is truncated to exactly `key_size` bytes.
pub fn derive(passphrase: &[u8], salt: &[u8; SALT_SIZE], key_size: usize) -> Zeroizing<Vec<u8>> {
    let mut key = Zeroizing::new(Vec::with_capacity(key_size.max(16)));

    let mut md5 = Md5::new();
    md5.update(passphrase);
    md5.update(salt);
    key.extend_from_slice(&md5.finalize());

    while key.len() < key_size {
        let mut md5 = Md5::new();
        md5.update(key.as_slice());
        md5.update(passphrase);
        md5.update(salt);
        let digest = md5.finalize();
        key.extend_from_slice(&digest[..8]);
    }

    key.truncate(key_size);
    key
}
