//! Hash-to-point: `H(m) -> E(F_p)`, mapping an arbitrary message to a curve
//! point of order `r`.
//!
//! Three steps, chained by [`hash_to_point`]: [`string_to_field_element`]
//! turns the message into an integer mod `p`; [`increment_and_try`] walks
//! forward from that integer until it lands on a valid x-coordinate;
//! [`cofactor_clear`] scales the result down into the order-`r` subgroup.

use num_bigint::BigInt;
use num_traits::{One, Zero};
use tracing::{debug, instrument};

use crate::elliptic_curve::{ECPoint, EllipticCurve};
use crate::error::{BlsError, Result};
use crate::prime_field::{FieldElement, PrimeField};
use std::rc::Rc;

/// Encode `message` as a base-256 big integer (`sum(byte[i] * 256^i)`) over
/// its UTF-8 bytes, then reduce it into `field`.
pub fn string_to_field_element(message: &str, field: &Rc<PrimeField>) -> FieldElement {
    let mut value = BigInt::zero();
    let base = BigInt::from(256);
    for &byte in message.as_bytes().iter().rev() {
        value = value * &base + BigInt::from(byte);
    }
    field.element(value)
}

/// Starting from `x`, try `x, x+1, x+2, ...` until `x^3 + Ax + B` is a
/// quadratic residue, then return `(x, sqrt(x^3+Ax+B))`.
#[instrument(skip(curve), fields(curve = %curve))]
pub fn increment_and_try(x: FieldElement, curve: &Rc<EllipticCurve>) -> Result<ECPoint> {
    let p = curve.field().modulus().clone();
    let mut candidate = x;
    let mut tries = BigInt::zero();

    while tries < p {
        let rhs = candidate
            .mul(&candidate)?
            .mul(&candidate)?
            .add(&curve.a().mul(&candidate)?)?
            .add(curve.b())?;
        if rhs.is_quadratic_residue() {
            let y = rhs.sqrt()?;
            debug!(x = %candidate, y = %y, "found valid x-coordinate");
            return curve.point(candidate.value().clone(), y.value().clone());
        }
        candidate = candidate.add(&curve.field().element(BigInt::one()))?;
        tries += BigInt::one();
    }

    Err(BlsError::NoPointFound)
}

/// Scale `point` by the cofactor `group_order / r`, landing in the subgroup
/// of order (dividing) `r`.
pub fn cofactor_clear(point: &ECPoint, group_order: &BigInt, r: &BigInt) -> Result<ECPoint> {
    let cofactor = group_order / r;
    point.scalar_mul(&cofactor)
}

/// The full pipeline: message → field element → curve point → order-`r`
/// subgroup member.
#[instrument(skip(curve), fields(curve = %curve))]
pub fn hash_to_point(message: &str, curve: &Rc<EllipticCurve>, group_order: &BigInt, r: &BigInt) -> Result<ECPoint> {
    let x = string_to_field_element(message, curve.field());
    let p = increment_and_try(x, curve)?;
    let h = cofactor_clear(&p, group_order, r)?;
    debug!(%h, "hashed message to curve point");
    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base256_encoding_of_ascii() {
        let field = PrimeField::new(103).unwrap();
        // "ab" = bytes [0x61, 0x62] -> 0x61 + 0x62*256
        let got = string_to_field_element("ab", &field);
        let expected = field.element(BigInt::from(0x61) + BigInt::from(0x62) * BigInt::from(256));
        assert_eq!(got, expected);
    }

    #[test]
    fn empty_message_is_zero() {
        let field = PrimeField::new(103).unwrap();
        assert!(string_to_field_element("", &field).is_zero());
    }

    #[test]
    fn increment_and_try_lands_on_curve() {
        let field = PrimeField::new(103).unwrap();
        let curve = EllipticCurve::new(&field, 1, 0).unwrap();
        let x = field.element(7);
        let p = increment_and_try(x, &curve).unwrap();
        assert!(curve.contains(&p));
    }

    #[test]
    fn hash_to_point_gives_order_r_point() {
        let field = PrimeField::new(103).unwrap();
        let curve = EllipticCurve::new(&field, 1, 0).unwrap();
        let group_order = curve.group_order();
        let r = crate::numtheory::largest_prime_factor(&group_order).unwrap();
        let h = hash_to_point("hello", &curve, &group_order, &r).unwrap();
        assert!(h.scalar_mul(&r).unwrap().is_infinity());
    }
}
