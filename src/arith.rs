use num_integer::Integer;
use num_traits::{One, Zero};
use rsa::BigUint;

/// Returns `true` if `gcd(a, b) == 1`.
///
/// `b == 0` is never coprime with anything but 1, and there is no modulus
/// to speak of in that case, so it is reported as `false`.
pub fn is_coprime(a: &BigUint, b: &BigUint) -> bool {
    if b.is_zero() {
        return false;
    }
    a.gcd(b).is_one()
}

/// Modular inverse of `a` modulo `n`, using the extended Euclidean algorithm.
///
/// Returns `None` if `gcd(a, n) != 1` or `n <= 1`.
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Option<BigUint> {
    if n <= &BigUint::one() {
        return None;
    }

    // Bezout coefficient of `a`, kept as magnitude + sign since BigUint is unsigned.
    let mut t = BigUint::zero();
    let mut t_neg = false;
    let mut new_t = BigUint::one();
    let mut new_t_neg = false;

    let mut r = n.clone();
    let mut new_r = a % n;

    while !new_r.is_zero() {
        let (quotient, rem) = r.div_rem(&new_r);

        // t, new_t = new_t, t - quotient * new_t
        let qt = &quotient * &new_t;
        let (next_t, next_t_neg) = if t_neg == new_t_neg {
            if t >= qt {
                (&t - &qt, t_neg)
            } else {
                (&qt - &t, !t_neg)
            }
        } else {
            (&t + &qt, t_neg)
        };
        t = std::mem::replace(&mut new_t, next_t);
        t_neg = std::mem::replace(&mut new_t_neg, next_t_neg);

        r = std::mem::replace(&mut new_r, rem);
    }

    if !r.is_one() {
        return None;
    }

    let t = t % n;
    if t_neg && !t.is_zero() {
        Some(n - &t)
    } else {
        Some(t)
    }
}
