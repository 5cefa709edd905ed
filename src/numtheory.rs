//! Shared number-theoretic utilities used throughout the algebraic tower.
//!
//! Inputs are `BigInt` rather than a machine-word integer type: the didactic
//! parameters used elsewhere in this crate are small, but nothing here
//! assumes it — the same routines would still be correct (if slow, since
//! `is_prime` is trial division) for a cryptographically sized prime.

use crate::error::{BlsError, Result};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// Euclid's algorithm. `gcd(0, 0) == 0`, and the result is always non-negative.
pub fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
    let (mut a, mut b) = (a.clone(), b.clone());
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a.abs()
}

/// Extended Euclidean algorithm: returns `(g, x, y)` with `a*x + b*y == g == gcd(a, b)`.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());
    let (mut old_y, mut y) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;

        let new_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, new_r);

        let new_x = &old_x - &q * &x;
        old_x = std::mem::replace(&mut x, new_x);

        let new_y = &old_y - &q * &y;
        old_y = std::mem::replace(&mut y, new_y);
    }

    (old_r, old_x, old_y)
}

/// Trial division up to `sqrt(n)`. Fine for the small primes this crate is
/// meant to run with; `n <= 1` is never prime.
pub fn is_prime(n: &BigInt) -> bool {
    let one = BigInt::one();
    let two = BigInt::from(2);
    let three = BigInt::from(3);

    if *n <= one {
        return false;
    }
    if *n <= three {
        return true;
    }
    if n.is_even() || n.is_multiple_of(&three) {
        return false;
    }

    let mut i = BigInt::from(5);
    while &i * &i <= *n {
        if n.is_multiple_of(&i) || n.is_multiple_of(&(&i + &two)) {
            return false;
        }
        i += BigInt::from(6);
    }
    true
}

/// Distinct prime factors of `n` in ascending order (no multiplicity).
/// `prime_factors(1) == []`.
pub fn prime_factors(n: &BigInt) -> Vec<BigInt> {
    let mut factors = Vec::new();
    let mut n = n.clone();
    let two = BigInt::from(2);

    if n.is_multiple_of(&two) {
        factors.push(two.clone());
        while n.is_multiple_of(&two) {
            n /= &two;
        }
    }

    let mut i = BigInt::from(3);
    while &i * &i <= n {
        if n.is_multiple_of(&i) {
            factors.push(i.clone());
            while n.is_multiple_of(&i) {
                n /= &i;
            }
        }
        i += &two;
    }

    if n > BigInt::one() {
        factors.push(n);
    }

    factors
}

/// The largest prime factor of `n`. `n` must be greater than 1.
pub fn largest_prime_factor(n: &BigInt) -> Result<BigInt> {
    if *n <= BigInt::one() {
        return Err(BlsError::InvalidParameter(format!(
            "largest_prime_factor: n must be > 1, got {n}"
        )));
    }
    Ok(prime_factors(n).into_iter().max().expect("n > 1 always has a prime factor"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bi(v: i64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn gcd_basic() {
        assert_eq!(gcd(&bi(12), &bi(8)), bi(4));
        assert_eq!(gcd(&bi(17), &bi(5)), bi(1));
        assert_eq!(gcd(&bi(0), &bi(7)), bi(7));
        assert_eq!(gcd(&bi(7), &bi(0)), bi(7));
        assert_eq!(gcd(&bi(0), &bi(0)), bi(0));
    }

    #[test]
    fn extended_gcd_identity_holds() {
        let (g, x, y) = extended_gcd(&bi(35), &bi(15));
        assert_eq!(g, bi(5));
        assert_eq!(&bi(35) * &x + &bi(15) * &y, g);
    }

    #[test]
    fn extended_gcd_gives_modular_inverse() {
        let (g, x, _) = extended_gcd(&bi(7), &bi(103));
        assert_eq!(g, bi(1));
        assert_eq!((bi(7) * x).mod_floor(&bi(103)), bi(1));
    }

    #[test]
    fn is_prime_cases() {
        assert!(is_prime(&bi(2)));
        assert!(is_prime(&bi(3)));
        assert!(is_prime(&bi(103)));
        assert!(!is_prime(&bi(104)));
        assert!(!is_prime(&bi(1)));
        assert!(!is_prime(&bi(0)));
        assert!(!is_prime(&bi(-7)));
    }

    #[test]
    fn prime_factors_cases() {
        let mut f12 = prime_factors(&bi(12));
        f12.sort();
        assert_eq!(f12, vec![bi(2), bi(3)]);
        assert_eq!(prime_factors(&bi(13)), vec![bi(13)]);
        assert_eq!(prime_factors(&bi(1)), Vec::<BigInt>::new());
    }

    #[test]
    fn largest_prime_factor_cases() {
        assert_eq!(largest_prime_factor(&bi(104)).unwrap(), bi(13));
        assert_eq!(largest_prime_factor(&bi(13)).unwrap(), bi(13));
        assert_eq!(largest_prime_factor(&bi(16)).unwrap(), bi(2));
        assert!(largest_prime_factor(&bi(1)).is_err());
    }
}
