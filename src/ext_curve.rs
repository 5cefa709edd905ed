//! Elliptic curve points with coordinates in the extension field F_{p^k}.
//!
//! The Tate pairing needs two points: `P` in `E(F_p)`, and `Q` in
//! `E(F_{p^k})` but not in `E(F_p)`. This module provides the point type for
//! `Q` and the search that finds it.

use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::{One, Zero};
use tracing::debug;

use crate::error::{BlsError, Result};
use crate::extension_field::{
    enumerate_elements, enumerate_non_base_field_elements, ExtFieldElement, ExtensionField,
};
use crate::prime_field::FieldElement;

#[derive(Debug, Clone)]
enum ExtCurvePointInner {
    Infinity,
    Affine(ExtFieldElement, ExtFieldElement),
}

/// A point on `E: y^2 = x^3 + Ax + B`, with `A`, `B`, `x`, `y` all lifted
/// into F_{p^k}. `A` and `B` are embedded as the constant polynomials they
/// are in the base field.
#[derive(Debug, Clone)]
pub struct ExtCurvePoint {
    inner: ExtCurvePointInner,
    a: ExtFieldElement,
    b: ExtFieldElement,
    ext_field: Rc<ExtensionField>,
}

impl ExtCurvePoint {
    /// Lift the base field's `A`, `B` curve parameters into F_{p^k} as
    /// constant polynomials.
    fn lift(ext_field: &Rc<ExtensionField>, value: &FieldElement) -> ExtFieldElement {
        ext_field.element([value.value().clone()])
    }

    pub fn infinity(ext_field: &Rc<ExtensionField>, a: &FieldElement, b: &FieldElement) -> ExtCurvePoint {
        ExtCurvePoint {
            inner: ExtCurvePointInner::Infinity,
            a: Self::lift(ext_field, a),
            b: Self::lift(ext_field, b),
            ext_field: Rc::clone(ext_field),
        }
    }

    pub fn affine(
        ext_field: &Rc<ExtensionField>,
        a: &FieldElement,
        b: &FieldElement,
        x: ExtFieldElement,
        y: ExtFieldElement,
    ) -> ExtCurvePoint {
        ExtCurvePoint {
            inner: ExtCurvePointInner::Affine(x, y),
            a: Self::lift(ext_field, a),
            b: Self::lift(ext_field, b),
            ext_field: Rc::clone(ext_field),
        }
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self.inner, ExtCurvePointInner::Infinity)
    }

    pub fn coords(&self) -> Option<(&ExtFieldElement, &ExtFieldElement)> {
        match &self.inner {
            ExtCurvePointInner::Infinity => None,
            ExtCurvePointInner::Affine(x, y) => Some((x, y)),
        }
    }

    pub fn ext_field(&self) -> &Rc<ExtensionField> {
        &self.ext_field
    }

    pub fn neg(&self) -> ExtCurvePoint {
        match &self.inner {
            ExtCurvePointInner::Infinity => self.clone(),
            ExtCurvePointInner::Affine(x, y) => ExtCurvePoint {
                inner: ExtCurvePointInner::Affine(x.clone(), y.neg()),
                a: self.a.clone(),
                b: self.b.clone(),
                ext_field: Rc::clone(&self.ext_field),
            },
        }
    }

    /// Same formulas as `ECPoint::add`, but with every operation performed
    /// in F_{p^k}.
    pub fn add(&self, other: &ExtCurvePoint) -> Result<ExtCurvePoint> {
        let (x1, y1) = match self.coords() {
            None => return Ok(other.clone()),
            Some(c) => c,
        };
        let (x2, y2) = match other.coords() {
            None => return Ok(self.clone()),
            Some(c) => c,
        };

        if x1 == x2 && y1 == &y2.neg() {
            return Ok(ExtCurvePoint {
                inner: ExtCurvePointInner::Infinity,
                a: self.a.clone(),
                b: self.b.clone(),
                ext_field: Rc::clone(&self.ext_field),
            });
        }

        let slope = if self == other {
            let two = self.ext_field.element([2]);
            let three = self.ext_field.element([3]);
            three
                .mul(x1)?
                .mul(x1)?
                .add(&self.a)?
                .div(&two.mul(y1)?)?
        } else {
            y2.sub(y1)?.div(&x2.sub(x1)?)?
        };

        let x3 = slope.mul(&slope)?.sub(x1)?.sub(x2)?;
        let y3 = slope.mul(&x1.sub(&x3)?)?.sub(y1)?;

        Ok(ExtCurvePoint {
            inner: ExtCurvePointInner::Affine(x3, y3),
            a: self.a.clone(),
            b: self.b.clone(),
            ext_field: Rc::clone(&self.ext_field),
        })
    }

    pub fn scalar_mul(&self, scalar: &BigInt) -> Result<ExtCurvePoint> {
        if scalar.sign() == num_bigint::Sign::Minus {
            return self.neg().scalar_mul(&(-scalar));
        }
        let mut result = ExtCurvePoint {
            inner: ExtCurvePointInner::Infinity,
            a: self.a.clone(),
            b: self.b.clone(),
            ext_field: Rc::clone(&self.ext_field),
        };
        let mut addend = self.clone();
        let mut n = scalar.clone();
        let two = BigInt::from(2);
        while !n.is_zero() {
            if &n % &two == BigInt::one() {
                result = result.add(&addend)?;
            }
            addend = addend.add(&addend)?;
            n /= &two;
        }
        Ok(result)
    }
}

impl PartialEq for ExtCurvePoint {
    fn eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (ExtCurvePointInner::Infinity, ExtCurvePointInner::Infinity) => true,
            (ExtCurvePointInner::Affine(x1, y1), ExtCurvePointInner::Affine(x2, y2)) => {
                x1 == x2 && y1 == y2
            }
            _ => false,
        }
    }
}
impl Eq for ExtCurvePoint {}

impl fmt::Display for ExtCurvePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            ExtCurvePointInner::Infinity => write!(f, "O"),
            ExtCurvePointInner::Affine(x, y) => write!(f, "({x}, {y})"),
        }
    }
}

/// `#E(F_{p^k})`, found the same way `EllipticCurve::group_order` counts
/// `#E(F_p)`: for every `x` in F_{p^k}, `x^3 + Ax + B` is either `0` (one
/// point), a square (two points), or not (no affine point), plus the point
/// at infinity. `E(F_p)` is a subgroup of `E(F_{p^k})`, so by Lagrange's
/// theorem `#E(F_p)` always divides this.
pub fn group_order(a: &FieldElement, b: &FieldElement, ext_field: &Rc<ExtensionField>) -> Result<BigInt> {
    let a_lifted = ExtCurvePoint::lift(ext_field, a);
    let b_lifted = ExtCurvePoint::lift(ext_field, b);
    let mut count = BigInt::one();
    for x in enumerate_elements(ext_field) {
        let rhs = x.mul(&x)?.mul(&x)?.add(&a_lifted.mul(&x)?)?.add(&b_lifted)?;
        if rhs.is_zero() {
            count += BigInt::one();
        } else if rhs.is_square() {
            count += BigInt::from(2);
        }
    }
    Ok(count)
}

/// Find a point `Q` of order `r` in `E(F_{p^k})` that is not in `E(F_p)`.
///
/// Systematic search: scan x-coordinates in F_{p^k} that aren't embeddings
/// of base-field elements, skip any for which `x^3 + Ax + B` isn't a
/// square, take its square root, cofactor-clear by scaling by
/// `ext_group_order / r`, and return the first result that isn't infinity.
pub fn find_point_of_order_r(
    a: &FieldElement,
    b: &FieldElement,
    ext_field: &Rc<ExtensionField>,
    ext_group_order: &BigInt,
    r: &BigInt,
) -> Result<ExtCurvePoint> {
    let cofactor = ext_group_order / r;
    let a_lifted = ExtCurvePoint::lift(ext_field, a);
    let b_lifted = ExtCurvePoint::lift(ext_field, b);

    for x in enumerate_non_base_field_elements(ext_field) {
        let rhs = x.mul(&x)?.mul(&x)?.add(&a_lifted.mul(&x)?)?.add(&b_lifted)?;
        if !rhs.is_square() {
            continue;
        }
        let y = rhs.sqrt()?;
        let candidate = ExtCurvePoint::affine(ext_field, a, b, x, y);
        let q = candidate.scalar_mul(&cofactor)?;
        if q.is_infinity() {
            continue;
        }
        // A point whose x-coordinate reduces to a constant polynomial is an
        // embedding of an E(F_p) point; cofactor-clearing can land back on
        // one of those even when the search started outside F_p, and such a
        // Q makes the pairing degenerate.
        let (qx, _) = q.coords().expect("q is not infinity");
        if qx.as_polynomial().degree() < 1 {
            continue;
        }
        debug!(%q, "found candidate point of order r in the extension field");
        return Ok(q);
    }

    Err(BlsError::SearchExhausted(format!(
        "no point of order {r} found in E(F_{{p^{}}}) \\ E(F_p)",
        ext_field.degree()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension_field::find_irreducible;
    use crate::prime_field::PrimeField;

    #[test]
    fn finds_point_not_in_base_field() {
        let field = PrimeField::new(103).unwrap();
        let a = field.element(1);
        let b = field.element(0);
        let modulus = find_irreducible(&field, 2).unwrap();
        let ext_field = ExtensionField::new(&field, modulus).unwrap();

        let base_curve = crate::elliptic_curve::EllipticCurve::new(&field, 1, 0).unwrap();
        let base_order = base_curve.group_order();
        // r is the largest prime factor of the base group order, per the
        // pairing-setup convention used throughout this crate.
        let r = crate::numtheory::largest_prime_factor(&base_order).unwrap();

        let ext_order = group_order(&a, &b, &ext_field).unwrap();
        assert!((&ext_order % &r).is_zero(), "r must divide #E(F_{{p^2}})");

        let q = find_point_of_order_r(&a, &b, &ext_field, &ext_order, &r).unwrap();
        assert!(!q.is_infinity());
        assert!(q.scalar_mul(&r).unwrap().is_infinity());
    }
}
