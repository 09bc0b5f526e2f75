use digest::DynDigest;
use hmac_sha256::Hash as Sha256;
use hmac_sha512::sha384::Hash as Sha384;
use hmac_sha512::Hash as Sha512;
use rsa::BigUint;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Error;

/// Hash function used to map messages to integers
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Hash {
    Sha256,
    Sha384,
    Sha512,
}

impl Default for Hash {
    fn default() -> Self {
        Hash::Sha256
    }
}

impl Hash {
    /// Returns a fresh hasher for this algorithm.
    pub fn hasher(self) -> Box<dyn DynDigest> {
        match self {
            Hash::Sha256 => Box::new(Sha256::new()),
            Hash::Sha384 => Box::new(Sha384::new()),
            Hash::Sha512 => Box::new(Sha512::new()),
        }
    }

    /// Digest size in bytes.
    pub fn output_size(self) -> usize {
        self.hasher().output_size()
    }
}

/// Hashes `msg` and reads the digest as a big-endian unsigned integer.
///
/// The result is *not* reduced modulo the signer's modulus. With SHA-256 and
/// a modulus of at least 2048 bits it is always smaller than `n` anyway.
pub fn hash_to_int(msg: impl AsRef<[u8]>, hash: Hash) -> Result<BigUint, Error> {
    hash_to_int_with(msg, hash.hasher().as_mut())
}

/// Same as [`hash_to_int`], for any digest implementing [`DynDigest`].
pub fn hash_to_int_with(
    msg: impl AsRef<[u8]>,
    hasher: &mut dyn DynDigest,
) -> Result<BigUint, Error> {
    hasher.update(msg.as_ref());
    let digest = hasher.finalize_reset();
    if digest.is_empty() {
        return Err(Error::HashComputation);
    }
    Ok(BigUint::from_bytes_be(&digest))
}
