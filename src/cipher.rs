//! Legacy symmetric ciphers for OpenSSL-style encrypted private keys.
//!
//! These are the ciphers that may appear in a `DEK-Info` header. Padding is
//! never applied: block-mode ciphertext is required to already be aligned to
//! the cipher block size.

use crate::{Error, Result};
use aes::{
    cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit, StreamCipherCore},
    Aes128, Aes192, Aes256,
};
use alloc::string::ToString;
use blowfish::Blowfish;
use cast5::Cast5;
use cbc::cipher::block_padding::NoPadding;
use core::{fmt, str};
use des::TdesEde3;

/// AES-128 in block chaining (CBC) mode
const AES128_CBC: &str = "aes-128-cbc";

/// AES-192 in block chaining (CBC) mode
const AES192_CBC: &str = "aes-192-cbc";

/// AES-256 in block chaining (CBC) mode
const AES256_CBC: &str = "aes-256-cbc";

/// AES-128 in counter (CTR) mode
const AES128_CTR: &str = "aes-128-ctr";

/// AES-192 in counter (CTR) mode
const AES192_CTR: &str = "aes-192-ctr";

/// AES-256 in counter (CTR) mode
const AES256_CTR: &str = "aes-256-ctr";

/// Triple-DES in block chaining (CBC) mode
const DES_EDE3_CBC: &str = "des-ede3-cbc";

/// Triple-DES in electronic codebook (ECB) mode, which is what OpenSSL
/// means by the bare name `des-ede3`
const DES_EDE3: &str = "des-ede3";

/// CAST-128 in block chaining (CBC) mode
const CAST_CBC: &str = "cast-cbc";

/// Blowfish in block chaining (CBC) mode
const BF_CBC: &str = "bf-cbc";

/// Counter mode with a 128-bit big endian counter.
type Ctr128BE<Cipher> = ctr::CtrCore<Cipher, ctr::flavors::Ctr128BE>;

/// Cipher algorithms permitted in legacy encrypted key files.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Cipher {
    /// AES-128 in block chaining (CBC) mode.
    Aes128Cbc,

    /// AES-192 in block chaining (CBC) mode.
    Aes192Cbc,

    /// AES-256 in block chaining (CBC) mode.
    Aes256Cbc,

    /// AES-128 in counter (CTR) mode.
    Aes128Ctr,

    /// AES-192 in counter (CTR) mode.
    Aes192Ctr,

    /// AES-256 in counter (CTR) mode.
    Aes256Ctr,

    /// Triple-DES in block chaining (CBC) mode.
    TdesCbc,

    /// Triple-DES in electronic codebook (ECB) mode.
    TdesEcb,

    /// CAST-128 in block chaining (CBC) mode.
    Cast128Cbc,

    /// Blowfish in block chaining (CBC) mode.
    BlowfishCbc,
}

impl Cipher {
    /// Decode a cipher from its legacy OpenSSL identifier, e.g. `aes-128-cbc`.
    ///
    /// Matching is case-insensitive, since `DEK-Info` headers conventionally
    /// carry the name in upper case. An unrecognized name is an explicit
    /// [`Error::UnsupportedCipher`], never a silent fallback.
    pub fn new(ciphername: &str) -> Result<Self> {
        match ciphername.to_ascii_lowercase().as_str() {
            AES128_CBC => Ok(Self::Aes128Cbc),
            AES192_CBC => Ok(Self::Aes192Cbc),
            AES256_CBC => Ok(Self::Aes256Cbc),
            AES128_CTR => Ok(Self::Aes128Ctr),
            AES192_CTR => Ok(Self::Aes192Ctr),
            AES256_CTR => Ok(Self::Aes256Ctr),
            DES_EDE3_CBC => Ok(Self::TdesCbc),
            DES_EDE3 => Ok(Self::TdesEcb),
            CAST_CBC => Ok(Self::Cast128Cbc),
            BF_CBC => Ok(Self::BlowfishCbc),
            _ => Err(Error::UnsupportedCipher(ciphername.to_string())),
        }
    }

    /// Get the canonical string identifier for this cipher.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aes128Cbc => AES128_CBC,
            Self::Aes192Cbc => AES192_CBC,
            Self::Aes256Cbc => AES256_CBC,
            Self::Aes128Ctr => AES128_CTR,
            Self::Aes192Ctr => AES192_CTR,
            Self::Aes256Ctr => AES256_CTR,
            Self::TdesCbc => DES_EDE3_CBC,
            Self::TdesEcb => DES_EDE3,
            Self::Cast128Cbc => CAST_CBC,
            Self::BlowfishCbc => BF_CBC,
        }
    }

    /// Get the key size for this cipher in bytes.
    pub fn key_size(self) -> usize {
        match self {
            Self::Aes256Cbc | Self::Aes256Ctr => 32,
            Self::TdesCbc | Self::TdesEcb | Self::Aes192Cbc | Self::Aes192Ctr => 24,
            Self::Aes128Cbc | Self::Aes128Ctr | Self::Cast128Cbc | Self::BlowfishCbc => 16,
        }
    }

    /// Get the initialization vector size for this cipher in bytes.
    pub fn iv_size(self) -> usize {
        match self {
            Self::Aes128Cbc
            | Self::Aes192Cbc
            | Self::Aes256Cbc
            | Self::Aes128Ctr
            | Self::Aes192Ctr
            | Self::Aes256Ctr => 16,
            Self::TdesCbc | Self::Cast128Cbc | Self::BlowfishCbc => 8,
            Self::TdesEcb => 0,
        }
    }

    /// Get the block size for this cipher in bytes.
    pub fn block_size(self) -> usize {
        match self {
            Self::Aes128Cbc
            | Self::Aes192Cbc
            | Self::Aes256Cbc
            | Self::Aes128Ctr
            | Self::Aes192Ctr
            | Self::Aes256Ctr => 16,
            Self::TdesCbc | Self::TdesEcb | Self::Cast128Cbc | Self::BlowfishCbc => 8,
        }
    }

    /// Decrypt `buffer` in place with this cipher.
    ///
    /// Padding is disabled: block-mode ciphertext must already be aligned to
    /// [`Cipher::block_size`], otherwise [`Error::DecryptionFailed`].
    pub fn decrypt(self, key: &[u8], iv: &[u8], buffer: &mut [u8]) -> Result<()> {
        self.check_alignment(buffer)?;

        match self {
            Self::Aes128Cbc => cbc_decrypt::<Aes128>(key, iv, buffer),
            Self::Aes192Cbc => cbc_decrypt::<Aes192>(key, iv, buffer),
            Self::Aes256Cbc => cbc_decrypt::<Aes256>(key, iv, buffer),
            Self::Aes128Ctr | Self::Aes192Ctr | Self::Aes256Ctr => {
                // Counter mode encryption and decryption are the same operation
                self.encrypt(key, iv, buffer)
            }
            Self::TdesCbc => cbc_decrypt::<TdesEde3>(key, iv, buffer),
            Self::TdesEcb => ecb_decrypt::<TdesEde3>(key, buffer),
            Self::Cast128Cbc => cbc_decrypt::<Cast5>(key, iv, buffer),
            Self::BlowfishCbc => cbc_decrypt::<Blowfish>(key, iv, buffer),
        }
    }

    /// Encrypt `buffer` in place with this cipher.
    ///
    /// The plaintext must already be aligned to [`Cipher::block_size`] for
    /// block modes; no padding is applied.
    pub fn encrypt(self, key: &[u8], iv: &[u8], buffer: &mut [u8]) -> Result<()> {
        self.check_alignment(buffer)?;

        match self {
            Self::Aes128Cbc => cbc_encrypt::<Aes128>(key, iv, buffer),
            Self::Aes192Cbc => cbc_encrypt::<Aes192>(key, iv, buffer),
            Self::Aes256Cbc => cbc_encrypt::<Aes256>(key, iv, buffer),
            Self::Aes128Ctr => ctr_apply::<Ctr128BE<Aes128>>(key, iv, buffer),
            Self::Aes192Ctr => ctr_apply::<Ctr128BE<Aes192>>(key, iv, buffer),
            Self::Aes256Ctr => ctr_apply::<Ctr128BE<Aes256>>(key, iv, buffer),
            Self::TdesCbc => cbc_encrypt::<TdesEde3>(key, iv, buffer),
            Self::TdesEcb => ecb_encrypt::<TdesEde3>(key, buffer),
            Self::Cast128Cbc => cbc_encrypt::<Cast5>(key, iv, buffer),
            Self::BlowfishCbc => cbc_encrypt::<Blowfish>(key, iv, buffer),
        }
    }

    fn check_alignment(self, buffer: &[u8]) -> Result<()> {
        match self {
            // Counter mode is a stream cipher: any length is fine
            Self::Aes128Ctr | Self::Aes192Ctr | Self::Aes256Ctr => Ok(()),
            _ if buffer.len() % self.block_size() == 0 => Ok(()),
            _ => Err(Error::DecryptionFailed),
        }
    }
}

impl AsRef<str> for Cipher {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl str::FromStr for Cipher {
    type Err = Error;

    fn from_str(id: &str) -> Result<Self> {
        Self::new(id)
    }
}

/// Advance the counter region of a 16-byte IV used with counter-style
/// stream ciphers.
///
/// The IV is treated as a 4-byte fixed prefix followed by a 96-bit
/// big-endian counter in the last 12 bytes. The increment walks from the
/// last byte toward byte 4, zeroing 0xFF bytes to propagate the carry and
/// stopping at the first byte it can bump. Bytes 0–3 are never modified.
pub fn increment_counter(iv: &mut [u8; 16]) {
    for byte in iv[4..].iter_mut().rev() {
        if *byte == 0xFF {
            *byte = 0;
        } else {
            *byte += 1;
            return;
        }
    }
}

fn cbc_encrypt<C>(key: &[u8], iv: &[u8], buffer: &mut [u8]) -> Result<()>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    let cipher =
        cbc::Encryptor::<C>::new_from_slices(key, iv).map_err(|_| Error::DecryptionFailed)?;
    let msg_len = buffer.len();
    cipher
        .encrypt_padded_mut::<NoPadding>(buffer, msg_len)
        .map_err(|_| Error::DecryptionFailed)?;
    Ok(())
}

fn cbc_decrypt<C>(key: &[u8], iv: &[u8], buffer: &mut [u8]) -> Result<()>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    let cipher =
        cbc::Decryptor::<C>::new_from_slices(key, iv).map_err(|_| Error::DecryptionFailed)?;
    cipher
        .decrypt_padded_mut::<NoPadding>(buffer)
        .map_err(|_| Error::DecryptionFailed)?;
    Ok(())
}

fn ecb_encrypt<C>(key: &[u8], buffer: &mut [u8]) -> Result<()>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    let cipher = ecb::Encryptor::<C>::new_from_slice(key).map_err(|_| Error::DecryptionFailed)?;
    let msg_len = buffer.len();
    cipher
        .encrypt_padded_mut::<NoPadding>(buffer, msg_len)
        .map_err(|_| Error::DecryptionFailed)?;
    Ok(())
}

fn ecb_decrypt<C>(key: &[u8], buffer: &mut [u8]) -> Result<()>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    let cipher = ecb::Decryptor::<C>::new_from_slice(key).map_err(|_| Error::DecryptionFailed)?;
    cipher
        .decrypt_padded_mut::<NoPadding>(buffer)
        .map_err(|_| Error::DecryptionFailed)?;
    Ok(())
}

fn ctr_apply<C>(key: &[u8], iv: &[u8], buffer: &mut [u8]) -> Result<()>
where
    C: StreamCipherCore + KeyIvInit,
{
    let cipher = C::new_from_slices(key, iv).map_err(|_| Error::DecryptionFailed)?;
    cipher
        .try_apply_keystream_partial(buffer.into())
        .map_err(|_| Error::DecryptionFailed)?;
    Ok(())
}
