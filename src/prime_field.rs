//! Prime field F_p arithmetic.
//!
//! [`PrimeField`] is a factory: construct one, then call
//! [`PrimeField::element`] to produce [`FieldElement`] values bound to it.
//! All arithmetic operations return fresh instances — nothing here is ever
//! mutated in place.

use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::{BlsError, Result};
use crate::numtheory::{extended_gcd, is_prime};

/// The finite field F_p = Z/pZ, for a prime `p` with `p ≡ 3 (mod 4)`.
///
/// The `p ≡ 3 (mod 4)` restriction is what makes [`FieldElement::sqrt`]
/// cheap: square roots are computed as `a^((p+1)/4)` rather than via a
/// general algorithm like Tonelli-Shanks.
#[derive(Debug, PartialEq, Eq)]
pub struct PrimeField {
    p: BigInt,
}

impl PrimeField {
    /// Construct F_p, validating that `p` is prime and `p ≡ 3 (mod 4)`.
    pub fn new(p: impl Into<BigInt>) -> Result<Rc<PrimeField>> {
        let p = p.into();
        if !is_prime(&p) {
            return Err(BlsError::InvalidParameter(format!("{p} is not prime")));
        }
        if p.mod_floor(&BigInt::from(4)) != BigInt::from(3) {
            return Err(BlsError::InvalidParameter(format!(
                "{p} is not ≡ 3 (mod 4)"
            )));
        }
        Ok(Rc::new(PrimeField { p }))
    }

    /// Create an element of this field, reducing `value` into `[0, p)`.
    pub fn element(self: &Rc<Self>, value: impl Into<BigInt>) -> FieldElement {
        FieldElement {
            value: value.into().mod_floor(&self.p),
            field: Rc::clone(self),
        }
    }

    /// The modulus `p`.
    pub fn modulus(&self) -> &BigInt {
        &self.p
    }

    /// The size of the field (equal to `p`, since F_p has p elements).
    pub fn order(&self) -> &BigInt {
        &self.p
    }
}

impl fmt::Display for PrimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F_{}", self.p)
    }
}

/// An element of F_p, a value in `[0, p)` bound to its [`PrimeField`].
#[derive(Debug, Clone)]
pub struct FieldElement {
    value: BigInt,
    field: Rc<PrimeField>,
}

impl FieldElement {
    /// The canonical representative in `[0, p)`.
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    /// The field this element belongs to.
    pub fn field(&self) -> &Rc<PrimeField> {
        &self.field
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    fn check_same_field(&self, other: &FieldElement) -> Result<()> {
        if self.field.p != other.field.p {
            Err(BlsError::MismatchedFields(
                self.field.p.clone(),
                other.field.p.clone(),
            ))
        } else {
            Ok(())
        }
    }

    pub fn add(&self, other: &FieldElement) -> Result<FieldElement> {
        self.check_same_field(other)?;
        Ok(self.field.element(&self.value + &other.value))
    }

    pub fn sub(&self, other: &FieldElement) -> Result<FieldElement> {
        self.check_same_field(other)?;
        Ok(self.field.element(&self.value - &other.value))
    }

    pub fn mul(&self, other: &FieldElement) -> Result<FieldElement> {
        self.check_same_field(other)?;
        Ok(self.field.element(&self.value * &other.value))
    }

    pub fn neg(&self) -> FieldElement {
        self.field.element(-&self.value)
    }

    /// Multiplicative inverse via the extended Euclidean algorithm.
    pub fn inverse(&self) -> Result<FieldElement> {
        if self.is_zero() {
            return Err(BlsError::DivideByZero(format!(
                "inverse of 0 in F_{}",
                self.field.p
            )));
        }
        let (g, x, _) = extended_gcd(&self.value, &self.field.p);
        debug_assert!(g.is_one(), "gcd(value, p) must be 1 for prime p");
        Ok(self.field.element(x))
    }

    pub fn div(&self, other: &FieldElement) -> Result<FieldElement> {
        self.check_same_field(other)?;
        if other.is_zero() {
            return Err(BlsError::DivideByZero(format!(
                "division by 0 in F_{}",
                self.field.p
            )));
        }
        self.mul(&other.inverse()?)
    }

    /// Square-and-multiply exponentiation. A negative exponent inverts first
    /// and raises to the magnitude; `exp == 0` yields 1.
    pub fn pow(&self, exp: &BigInt) -> Result<FieldElement> {
        if exp.is_zero() {
            return Ok(self.field.element(BigInt::one()));
        }
        if exp.sign() == num_bigint::Sign::Minus {
            return self.inverse()?.pow(&(-exp));
        }

        let mut result = self.field.element(BigInt::one());
        let mut base = self.clone();
        let mut e = exp.clone();
        let two = BigInt::from(2);
        while !e.is_zero() {
            if e.is_odd() {
                result = result.mul(&base)?;
            }
            base = base.mul(&base)?;
            e /= &two;
        }
        Ok(result)
    }

    /// Euler's criterion: `a` is a quadratic residue iff `a^((p-1)/2) == 1`.
    /// Zero is treated as a quadratic residue.
    pub fn is_quadratic_residue(&self) -> bool {
        if self.is_zero() {
            return true;
        }
        let exp = (&self.field.p - BigInt::one()) / BigInt::from(2);
        self.pow(&exp).expect("pow never fails for non-negative exponent").value.is_one()
    }

    /// Square root for `p ≡ 3 (mod 4)`: `a^((p+1)/4)`.
    pub fn sqrt(&self) -> Result<FieldElement> {
        if !self.is_quadratic_residue() {
            return Err(BlsError::NotASquare(self.value.clone()));
        }
        let exp = (&self.field.p + BigInt::one()) / BigInt::from(4);
        self.pow(&exp)
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.field.p == other.field.p && self.value == other.value
    }
}
impl Eq for FieldElement {}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field103() -> Rc<PrimeField> {
        PrimeField::new(103).unwrap()
    }

    #[test]
    fn rejects_non_prime() {
        assert!(PrimeField::new(104).is_err());
    }

    #[test]
    fn rejects_prime_not_3_mod_4() {
        assert!(PrimeField::new(17).is_err());
    }

    #[test]
    fn element_reduces_mod_p() {
        let f = field103();
        assert_eq!(f.element(110).value(), &BigInt::from(7));
    }

    #[test]
    fn add_sub_mul() {
        let f = field103();
        let (a, b) = (f.element(10), f.element(95));
        assert_eq!(a.add(&b).unwrap().value(), &BigInt::from((10 + 95) % 103));
        let (a, b) = (f.element(5), f.element(10));
        assert_eq!(a.sub(&b).unwrap().value(), &BigInt::from(98));
        let (a, b) = (f.element(10), f.element(11));
        assert_eq!(a.mul(&b).unwrap().value(), &BigInt::from(110 % 103));
    }

    #[test]
    fn div_round_trips_through_mul() {
        let f = field103();
        let (a, b) = (f.element(5), f.element(7));
        let c = a.div(&b).unwrap();
        assert_eq!(c.mul(&b).unwrap(), a);
    }

    #[test]
    fn neg_is_additive_inverse() {
        let f = field103();
        let a = f.element(5);
        assert!(a.add(&a.neg()).unwrap().is_zero());
    }

    #[test]
    fn pow_zero_is_one() {
        let f = field103();
        assert_eq!(f.element(5).pow(&BigInt::zero()).unwrap(), f.element(1));
    }

    #[test]
    fn pow_matches_naive() {
        let f = field103();
        let a = f.element(5);
        assert_eq!(a.pow(&BigInt::from(3)).unwrap(), f.element(125 % 103));
    }

    #[test]
    fn pow_negative_inverts() {
        let f = field103();
        let a = f.element(5);
        let inv = a.inverse().unwrap();
        assert_eq!(a.pow(&BigInt::from(-1)).unwrap(), inv);
    }

    #[test]
    fn inverse_of_zero_fails() {
        let f = field103();
        assert!(f.element(0).inverse().is_err());
    }

    #[test]
    fn mismatched_fields_detected() {
        let f103 = field103();
        let f107 = PrimeField::new(107).unwrap();
        let a = f103.element(5);
        let b = f107.element(5);
        assert!(a.add(&b).is_err());
    }

    #[test]
    fn quadratic_residue_and_sqrt() {
        let f = field103();
        let q = f.element(4);
        assert!(q.is_quadratic_residue());
        let s = q.sqrt().unwrap();
        assert_eq!(s.mul(&s).unwrap(), q);
    }

    #[test]
    fn fermats_little_theorem() {
        let f = field103();
        let a = f.element(5);
        assert_eq!(a.pow(&BigInt::from(102)).unwrap(), f.element(1));
    }
}
