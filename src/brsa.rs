//! Raw RSA blinding arithmetic over `(e, n)` and `(d, n)`.
//!
//! These functions work on bare integers and take the exponents explicitly,
//! so they can be used with key material that does not come from the `rsa`
//! crate. The typed API in the crate root is built on top of them.

use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use rsa::BigUint;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::arith::{is_coprime, mod_inverse};
use crate::hash::{hash_to_int, Hash};
use crate::Error;

/// Extra random bytes drawn on top of the modulus length, to keep the
/// modular reduction bias negligible.
const BLINDING_EXTRA_BYTES: usize = 8;

fn check_modulus(n: &BigUint) -> Result<(), Error> {
    if n <= &BigUint::one() {
        return Err(Error::UnsupportedParameters);
    }
    Ok(())
}

/// Draws a fresh blinding factor `r` with `1 <= r < n` and `gcd(r, n) == 1`.
///
/// Each attempt reads `len(n) + 8` bytes from `rng`, reduces them modulo
/// `n`, and starts over if the result is not a unit.
pub fn generate_blinding_factor<R: CryptoRng + RngCore>(
    rng: &mut R,
    n: &BigUint,
) -> Result<BigUint, Error> {
    check_modulus(n)?;
    let mut bytes = Zeroizing::new(vec![0u8; (n.bits() + 7) / 8 + BLINDING_EXTRA_BYTES]);
    let mut attempts = 0usize;
    loop {
        attempts += 1;
        rng.fill_bytes(&mut bytes[..]);
        let r = BigUint::from_bytes_be(&bytes) % n;
        if !r.is_zero() && is_coprime(&r, n) {
            trace!(attempts, "blinding factor sampled");
            return Ok(r);
        }
    }
}

/// Blinds a message for a signer whose public key is `(e, n)`.
///
/// Returns the blinded message `m * r^e mod n` and the blinding factor `r`,
/// which the requester must keep secret until the signature is unblinded.
/// The hash is checked for coprimality with `n` before any randomness is
/// drawn from `rng`.
pub fn blind<R: CryptoRng + RngCore>(
    rng: &mut R,
    msg: impl AsRef<[u8]>,
    e: &BigUint,
    n: &BigUint,
    hash: Hash,
) -> Result<(BigUint, BigUint), Error> {
    check_modulus(n)?;
    let m = hash_to_int(msg, hash)?;
    if !is_coprime(&m, n) {
        return Err(Error::NonCoprimeHash);
    }
    let r = generate_blinding_factor(rng, n)?;
    let blinded = (m * r.modpow(e, n)) % n;
    debug!(modulus_bits = n.bits(), "message blinded");
    Ok((blinded, r))
}

/// Raw RSA signing primitive: `blinded^d mod n`.
///
/// The signer learns nothing about the underlying message from `blinded`.
/// The input is reduced modulo `n` first.
pub fn sign(blinded: &BigUint, d: &BigUint, n: &BigUint) -> Result<BigUint, Error> {
    check_modulus(n)?;
    Ok((blinded % n).modpow(d, n))
}

/// Removes the blinding factor from a signed value: `signed * r^-1 mod n`.
pub fn unblind(signed: &BigUint, r: &BigUint, n: &BigUint) -> Result<BigUint, Error> {
    check_modulus(n)?;
    let r_inv = mod_inverse(r, n).ok_or(Error::NonInvertible)?;
    Ok((signed * r_inv) % n)
}

/// Checks the textbook RSA verification equation `H(msg) == sig^e mod n`.
///
/// The hash is reduced modulo `n` before the comparison. `sig` itself must
/// already be reduced: a value `>= n` is never accepted, even if it is
/// congruent to a valid signature. A mismatch is a regular outcome and is
/// reported as `Ok(false)`.
pub fn verify(
    msg: impl AsRef<[u8]>,
    sig: &BigUint,
    e: &BigUint,
    n: &BigUint,
    hash: Hash,
) -> Result<bool, Error> {
    check_modulus(n)?;
    let m = hash_to_int(msg, hash)? % n;
    let valid = sig < n && sig.modpow(e, n) == m;
    debug!(valid, "signature checked");
    Ok(valid)
}

/// Unblinds `signed` and verifies the result against `msg`.
///
/// Fails with [`Error::InvalidSignature`] if the unblinded value is not a
/// valid signature for `msg` under `(e, n)`.
pub fn unblind_verify(
    msg: impl AsRef<[u8]>,
    signed: &BigUint,
    r: &BigUint,
    e: &BigUint,
    n: &BigUint,
    hash: Hash,
) -> Result<BigUint, Error> {
    let sig = unblind(signed, r, n)?;
    if !verify(msg, &sig, e, n, hash)? {
        return Err(Error::InvalidSignature);
    }
    Ok(sig)
}
