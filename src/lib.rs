//! Chaum-style RSA blind signatures.
//!
//! A requester obtains a signer's RSA signature on a message without the
//! signer learning the message. The message is hashed to an integer `m`,
//! multiplied by `r^e` for a random unit `r`, signed with the raw private
//! exponent, and finally divided by `r` to recover `m^d mod n`.
//!
//! ```rust
//! use chaum_blind_rsa::{DefaultRng, KeyPair, Options};
//!
//! let options = Options::default();
//!
//! // [SERVER]: Generate a RSA-2048 key pair
//! let kp = KeyPair::generate(&mut DefaultRng, 2048)?;
//! let (pk, sk) = (kp.pk, kp.sk);
//!
//! // [CLIENT]: blind a message for the server whose public key is `pk`.
//! // The client must keep the message and the blinding factor.
//! let msg = b"Hello world!";
//! let blinding_result = pk.blind(&mut DefaultRng, msg, &options)?;
//!
//! // [SERVER]: sign the blinded message. The server never sees `msg`.
//! let blind_sig = sk.blind_sign(&blinding_result.blind_msg)?;
//!
//! // [CLIENT]: remove the blinding factor and check the result against the
//! // server's public key. The blinding factor is consumed here.
//! let sig = pk.finalize(&blind_sig, blinding_result.secret, msg, &options)?;
//!
//! // [ANYONE]: the signature is a regular RSA signature on H(msg).
//! sig.verify(&pk, msg, &options)?;
//! # Ok::<(), chaum_blind_rsa::Error>(())
//! ```
//!
//! The [`brsa`] module exposes the same protocol as plain integer functions
//! taking `(e, n)` or `(d, n)` explicitly.

#[macro_use]
extern crate derive_new;

use std::fmt::{self, Display};

use derive_more::*;
use num_integer::Integer as _;
use rand::{CryptoRng, RngCore};
use rsa::pkcs8::{
    DecodePrivateKey as _, DecodePublicKey as _, EncodePrivateKey as _, EncodePublicKey as _,
    LineEnding,
};
use rsa::traits::{PrivateKeyParts as _, PublicKeyParts as _};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod arith;
pub mod brsa;
pub mod codec;
mod hash;
mod num_padding;

pub use arith::{is_coprime, mod_inverse};
pub use hash::{hash_to_int, hash_to_int_with, Hash};
pub use rand::rngs::OsRng as DefaultRng;

use num_padding::ToBytesPadded;

pub mod reexports {
    pub use {digest, rand, rsa};
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Error {
    /// The message hash shares a factor with the modulus
    NonCoprimeHash,
    /// The unblinded value is not a valid signature for the message
    InvalidSignature,
    /// The digest could not be computed
    HashComputation,
    /// The blinding factor has no inverse modulo `n`
    NonInvertible,
    /// An integer is not in `[0, n)`
    OutOfRange,
    UnsupportedParameters,
    EncodingError,
    InvalidKey,
    InternalError,
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NonCoprimeHash => write!(f, "Message hash is not coprime with the modulus"),
            Error::InvalidSignature => write!(f, "Invalid signature"),
            Error::HashComputation => write!(f, "Hash computation failed"),
            Error::NonInvertible => write!(f, "Blinding factor is not invertible"),
            Error::OutOfRange => write!(f, "Value out of range"),
            Error::UnsupportedParameters => write!(f, "Unsupported parameters"),
            Error::EncodingError => write!(f, "Encoding error"),
            Error::InvalidKey => write!(f, "Invalid key"),
            Error::InternalError => write!(f, "Internal Error"),
        }
    }
}

/// Options
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, new)]
pub struct Options {
    /// Hash function used to map the message to an integer
    hash: Hash,
}

impl Options {
    pub fn hash(&self) -> Hash {
        self.hash
    }
}

/// An RSA public key
#[derive(Clone, Debug, Eq, PartialEq, AsRef, Deref, From, Into, new)]
pub struct PublicKey(pub RsaPublicKey);

/// An RSA secret key
#[derive(Clone, Debug, AsRef, Deref, From, Into, new)]
pub struct SecretKey(pub RsaPrivateKey);

/// An RSA key pair
#[derive(Clone, Debug, From, Into, new)]
pub struct KeyPair {
    pub pk: PublicKey,
    pub sk: SecretKey,
}

/// A blinding factor.
///
/// It must be used for a single message, and is wiped from memory when
/// dropped. It is deliberately not `Clone`.
#[derive(AsRef, Deref, From)]
pub struct BlindingFactor(BigUint);

/// A blinded message, to be sent to the signer
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, AsRef, Deref, From, Into, new)]
pub struct BlindedMessage(pub BigUint);

/// A signature on a blinded message, returned by the signer
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, AsRef, Deref, From, Into, new)]
pub struct BlindSignature(pub BigUint);

/// A (non-blind) signature
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, AsRef, Deref, From, Into, new)]
pub struct Signature(pub BigUint);

/// Result of a blinding operation
#[derive(Debug)]
pub struct BlindingResult {
    pub blind_msg: BlindedMessage,
    pub secret: BlindingFactor,
}

impl Drop for BlindingFactor {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for BlindingFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BlindingFactor(..)")
    }
}

/// Encodes `x` as a big-endian byte string as long as the modulus.
fn int_to_bytes(pk: &PublicKey, x: &BigUint) -> Result<Vec<u8>, Error> {
    if x >= pk.n() {
        return Err(Error::OutOfRange);
    }
    x.to_bytes_be_padded(pk.size()).ok_or(Error::InternalError)
}

/// Decodes a modulus-sized big-endian byte string into an integer in `[0, n)`.
fn int_from_bytes(pk: &PublicKey, bytes: &[u8]) -> Result<BigUint, Error> {
    if bytes.len() != pk.size() {
        return Err(Error::UnsupportedParameters);
    }
    let x = BigUint::from_bytes_be(bytes);
    if &x >= pk.n() {
        return Err(Error::OutOfRange);
    }
    Ok(x)
}

impl BlindingFactor {
    /// The encoded factor is wiped when the returned buffer is dropped.
    pub fn to_bytes(&self, pk: &PublicKey) -> Result<Zeroizing<Vec<u8>>, Error> {
        int_to_bytes(pk, &self.0).map(Zeroizing::new)
    }

    pub fn from_bytes(pk: &PublicKey, bytes: &[u8]) -> Result<Self, Error> {
        Ok(BlindingFactor(int_from_bytes(pk, bytes)?))
    }
}

impl BlindedMessage {
    pub fn to_bytes(&self, pk: &PublicKey) -> Result<Vec<u8>, Error> {
        int_to_bytes(pk, &self.0)
    }

    pub fn from_bytes(pk: &PublicKey, bytes: &[u8]) -> Result<Self, Error> {
        Ok(BlindedMessage(int_from_bytes(pk, bytes)?))
    }
}

impl BlindSignature {
    pub fn to_bytes(&self, pk: &PublicKey) -> Result<Vec<u8>, Error> {
        int_to_bytes(pk, &self.0)
    }

    pub fn from_bytes(pk: &PublicKey, bytes: &[u8]) -> Result<Self, Error> {
        Ok(BlindSignature(int_from_bytes(pk, bytes)?))
    }
}

impl Signature {
    pub fn to_bytes(&self, pk: &PublicKey) -> Result<Vec<u8>, Error> {
        int_to_bytes(pk, &self.0)
    }

    pub fn from_bytes(pk: &PublicKey, bytes: &[u8]) -> Result<Self, Error> {
        Ok(Signature(int_from_bytes(pk, bytes)?))
    }

    /// Verify that the (non-blind) signature is valid for the given public key and original message
    pub fn verify(
        &self,
        pk: &PublicKey,
        msg: impl AsRef<[u8]>,
        options: &Options,
    ) -> Result<(), Error> {
        if !pk.verify(self, msg, options)? {
            return Err(Error::InvalidSignature);
        }
        Ok(())
    }
}

impl KeyPair {
    /// Generate a new key pair
    pub fn generate<R: CryptoRng + RngCore>(
        rng: &mut R,
        modulus_bits: usize,
    ) -> Result<KeyPair, Error> {
        let mut sk =
            RsaPrivateKey::new(rng, modulus_bits).map_err(|_| Error::UnsupportedParameters)?;
        sk.precompute().map_err(|_| Error::InternalError)?;
        let sk = SecretKey(sk);
        let pk = sk.public_key()?;
        debug!(modulus_bits, "key pair generated");
        Ok(KeyPair { sk, pk })
    }
}

impl PublicKey {
    pub fn from_components(n: BigUint, e: BigUint) -> Result<Self, Error> {
        Ok(PublicKey(
            RsaPublicKey::new(n, e).map_err(|_| Error::InvalidKey)?,
        ))
    }

    pub fn to_der(&self) -> Result<Vec<u8>, Error> {
        self.as_ref()
            .to_public_key_der()
            .map(|der| der.as_bytes().to_vec())
            .map_err(|_| Error::EncodingError)
    }

    fn check_rsa_parameters(&self) -> Result<(), Error> {
        let modulus_bits = self.size() * 8;
        if !(2048..=4096).contains(&modulus_bits) {
            return Err(Error::UnsupportedParameters);
        }
        let e = self.e();
        if e < &BigUint::from(3u32) || e.is_even() {
            return Err(Error::UnsupportedParameters);
        }
        Ok(())
    }

    pub fn from_der(der: &[u8]) -> Result<Self, Error> {
        if der.len() > 800 {
            return Err(Error::EncodingError);
        }
        let pk = PublicKey(
            RsaPublicKey::from_public_key_der(der).map_err(|_| Error::EncodingError)?,
        );
        pk.check_rsa_parameters()?;
        Ok(pk)
    }

    pub fn to_pem(&self) -> Result<String, Error> {
        self.as_ref()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|_| Error::EncodingError)
    }

    pub fn from_pem(pem: &str) -> Result<Self, Error> {
        if pem.len() > 1000 {
            return Err(Error::EncodingError);
        }
        let pk = PublicKey(
            RsaPublicKey::from_public_key_pem(pem).map_err(|_| Error::EncodingError)?,
        );
        pk.check_rsa_parameters()?;
        Ok(pk)
    }

    /// Blind a message to be signed
    pub fn blind<R: CryptoRng + RngCore>(
        &self,
        rng: &mut R,
        msg: impl AsRef<[u8]>,
        options: &Options,
    ) -> Result<BlindingResult, Error> {
        let (blind_msg, secret) = brsa::blind(rng, msg, self.e(), self.n(), options.hash())?;
        Ok(BlindingResult {
            blind_msg: BlindedMessage(blind_msg),
            secret: BlindingFactor(secret),
        })
    }

    /// Remove the blinding factor from a blind signature, without checking the result
    pub fn unblind(
        &self,
        blind_sig: &BlindSignature,
        secret: &BlindingFactor,
    ) -> Result<Signature, Error> {
        if blind_sig.0 >= *self.n() {
            return Err(Error::OutOfRange);
        }
        Ok(Signature(brsa::unblind(&blind_sig.0, &secret.0, self.n())?))
    }

    /// Compute a valid signature for the original message given a blindly signed message
    ///
    /// The blinding factor is consumed. The signature is verified before
    /// being returned.
    pub fn finalize(
        &self,
        blind_sig: &BlindSignature,
        secret: BlindingFactor,
        msg: impl AsRef<[u8]>,
        options: &Options,
    ) -> Result<Signature, Error> {
        if blind_sig.0 >= *self.n() {
            return Err(Error::OutOfRange);
        }
        let sig = brsa::unblind_verify(
            msg,
            &blind_sig.0,
            &secret.0,
            self.e(),
            self.n(),
            options.hash(),
        )?;
        Ok(Signature(sig))
    }

    /// Verify a (non-blind) signature
    pub fn verify(
        &self,
        sig: &Signature,
        msg: impl AsRef<[u8]>,
        options: &Options,
    ) -> Result<bool, Error> {
        brsa::verify(msg, &sig.0, self.e(), self.n(), options.hash())
    }
}

impl SecretKey {
    pub fn from_components(
        n: BigUint,
        e: BigUint,
        d: BigUint,
        primes: Vec<BigUint>,
    ) -> Result<Self, Error> {
        let mut sk =
            RsaPrivateKey::from_components(n, e, d, primes).map_err(|_| Error::InvalidKey)?;
        sk.validate().map_err(|_| Error::InvalidKey)?;
        sk.precompute().map_err(|_| Error::InvalidKey)?;
        Ok(SecretKey(sk))
    }

    pub fn to_der(&self) -> Result<Vec<u8>, Error> {
        self.as_ref()
            .to_pkcs8_der()
            .map(|der| der.as_bytes().to_vec())
            .map_err(|_| Error::EncodingError)
    }

    pub fn from_der(der: &[u8]) -> Result<Self, Error> {
        let mut sk = RsaPrivateKey::from_pkcs8_der(der).map_err(|_| Error::EncodingError)?;
        sk.validate().map_err(|_| Error::InvalidKey)?;
        sk.precompute().map_err(|_| Error::InvalidKey)?;
        Ok(SecretKey(sk))
    }

    pub fn to_pem(&self) -> Result<String, Error> {
        self.as_ref()
            .to_pkcs8_pem(LineEnding::LF)
            .map(|pem| pem.to_string())
            .map_err(|_| Error::EncodingError)
    }

    pub fn from_pem(pem: &str) -> Result<Self, Error> {
        let mut sk = RsaPrivateKey::from_pkcs8_pem(pem).map_err(|_| Error::EncodingError)?;
        sk.validate().map_err(|_| Error::InvalidKey)?;
        sk.precompute().map_err(|_| Error::InvalidKey)?;
        Ok(SecretKey(sk))
    }

    pub fn public_key(&self) -> Result<PublicKey, Error> {
        Ok(PublicKey(RsaPublicKey::from(self.as_ref())))
    }

    /// Sign a blinded message
    pub fn blind_sign(&self, blind_msg: &BlindedMessage) -> Result<BlindSignature, Error> {
        let n = self.n();
        if blind_msg.0 >= *n {
            return Err(Error::OutOfRange);
        }
        debug!(modulus_bits = n.bits(), "signing blinded message");
        Ok(BlindSignature(brsa::sign(&blind_msg.0, self.d(), n)?))
    }
}
