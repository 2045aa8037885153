//! Error types

use alloc::string::String;
use core::fmt;

/// Result type with `ssh-legacy-key`'s [`Error`] as the error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type.
///
/// Note that "not enough bytes in the buffer" is deliberately absent: the
/// cursor reads in [`crate::reader`] report it as
/// [`ReadStatus::NeedMore`][`crate::ReadStatus`], a normal value streaming
/// callers can retry on, rather than as an error.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Character encoding invalid (e.g. a length-prefixed string that was
    /// requested as text is not valid UTF-8).
    CharacterEncoding,

    /// Cannot decrypt a private key which is already decrypted.
    Decrypted,

    /// Decryption failed: ciphertext not aligned to the cipher block size,
    /// or the cipher rejected its key/IV parameters.
    DecryptionFailed,

    /// Private key material does not have the expected DER structure.
    ///
    /// Carries a description of the field where the walk failed,
    /// e.g. `"expected integer for n"`.
    MalformedKey(&'static str),

    /// Neither private nor public key material was supplied.
    MissingKeyMaterial,

    /// The key file names a cipher this crate does not recognize.
    UnsupportedCipher(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CharacterEncoding => write!(f, "character encoding invalid"),
            Error::Decrypted => write!(f, "private key is already decrypted"),
            Error::DecryptionFailed => write!(f, "private key decryption failed"),
            Error::MalformedKey(field) => write!(f, "malformed private key ({field})"),
            Error::MissingKeyMaterial => {
                write!(f, "neither private nor public key material supplied")
            }
            Error::UnsupportedCipher(name) => write!(f, "unsupported cipher: {name}"),
        }
    }
}

impl core::error::Error for Error {}
