//! The elliptic curve `E: y^2 = x^3 + A*x + B` over F_p, and its group law.

use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use crate::error::{BlsError, Result};
use crate::numtheory::prime_factors;
use crate::prime_field::{FieldElement, PrimeField};

/// `E: y^2 = x^3 + A*x + B` over F_p.
#[derive(Debug)]
pub struct EllipticCurve {
    field: Rc<PrimeField>,
    a: FieldElement,
    b: FieldElement,
}

impl EllipticCurve {
    /// Construct the curve, rejecting a singular one
    /// (`4*A^3 + 27*B^2 == 0`, discriminant zero).
    pub fn new(field: &Rc<PrimeField>, a: impl Into<BigInt>, b: impl Into<BigInt>) -> Result<Rc<EllipticCurve>> {
        let a = field.element(a);
        let b = field.element(b);

        let four = field.element(4);
        let twenty_seven = field.element(27);
        let a_cubed = a.mul(&a)?.mul(&a)?;
        let b_squared = b.mul(&b)?;
        let discriminant = four.mul(&a_cubed)?.add(&twenty_seven.mul(&b_squared)?)?;
        if discriminant.is_zero() {
            return Err(BlsError::InvalidParameter(format!(
                "curve y^2 = x^3 + {}x + {} over F_{} is singular",
                a.value(),
                b.value(),
                field.modulus()
            )));
        }

        Ok(Rc::new(EllipticCurve {
            field: Rc::clone(field),
            a,
            b,
        }))
    }

    pub fn field(&self) -> &Rc<PrimeField> {
        &self.field
    }

    pub fn a(&self) -> &FieldElement {
        &self.a
    }

    pub fn b(&self) -> &FieldElement {
        &self.b
    }

    /// The point at infinity, the group's identity element.
    pub fn infinity(self: &Rc<Self>) -> ECPoint {
        ECPoint {
            inner: ECPointInner::Infinity,
            curve: Rc::clone(self),
        }
    }

    /// An affine point, without checking it lies on the curve. Use
    /// [`EllipticCurve::point`] when that check is wanted.
    pub fn affine(self: &Rc<Self>, x: impl Into<BigInt>, y: impl Into<BigInt>) -> ECPoint {
        ECPoint {
            inner: ECPointInner::Affine(self.field.element(x), self.field.element(y)),
            curve: Rc::clone(self),
        }
    }

    /// An affine point, checked against the curve equation.
    pub fn point(self: &Rc<Self>, x: impl Into<BigInt>, y: impl Into<BigInt>) -> Result<ECPoint> {
        let p = self.affine(x, y);
        if !self.contains(&p) {
            return Err(BlsError::InvalidParameter(
                "point does not satisfy the curve equation".to_string(),
            ));
        }
        Ok(p)
    }

    /// Whether `p` lies on the curve (always true for the point at infinity).
    pub fn contains(&self, p: &ECPoint) -> bool {
        match &p.inner {
            ECPointInner::Infinity => true,
            ECPointInner::Affine(x, y) => {
                let lhs = y.mul(y).unwrap();
                let rhs = x
                    .mul(x)
                    .unwrap()
                    .mul(x)
                    .unwrap()
                    .add(&self.a.mul(x).unwrap())
                    .unwrap()
                    .add(&self.b)
                    .unwrap();
                lhs == rhs
            }
        }
    }

    /// The group order `#E(F_p)`, found by naively counting points: for
    /// every `x`, `x^3 + A*x + B` is either `0` (one point), a quadratic
    /// residue (two points), or a non-residue (no affine point); plus the
    /// point at infinity.
    pub fn group_order(&self) -> BigInt {
        let p = self.field.modulus().clone();
        let mut count = BigInt::one(); // the point at infinity
        let mut x = BigInt::zero();
        while x < p {
            let xe = self.field.element(x.clone());
            let rhs = xe
                .mul(&xe)
                .unwrap()
                .mul(&xe)
                .unwrap()
                .add(&self.a.mul(&xe).unwrap())
                .unwrap()
                .add(&self.b)
                .unwrap();
            if rhs.is_zero() {
                count += BigInt::one();
            } else if rhs.is_quadratic_residue() {
                count += BigInt::from(2);
            }
            x += BigInt::one();
        }
        count
    }
}

impl PartialEq for EllipticCurve {
    fn eq(&self, other: &Self) -> bool {
        self.field.modulus() == other.field.modulus() && self.a == other.a && self.b == other.b
    }
}
impl Eq for EllipticCurve {}

impl fmt::Display for EllipticCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y^2 = x^3 + {}x + {} over F_{}", self.a, self.b, self.field.modulus())
    }
}

#[derive(Debug, Clone)]
enum ECPointInner {
    Infinity,
    Affine(FieldElement, FieldElement),
}

/// A point on an [`EllipticCurve`]: either the point at infinity or an
/// affine `(x, y)` pair. Infinity is tagged rather than represented with
/// sentinel coordinates, so callers can't mistake a real point for it.
#[derive(Debug, Clone)]
pub struct ECPoint {
    inner: ECPointInner,
    curve: Rc<EllipticCurve>,
}

impl ECPoint {
    pub fn curve(&self) -> &Rc<EllipticCurve> {
        &self.curve
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self.inner, ECPointInner::Infinity)
    }

    /// `(x, y)` if this is an affine point.
    pub fn coords(&self) -> Option<(&FieldElement, &FieldElement)> {
        match &self.inner {
            ECPointInner::Infinity => None,
            ECPointInner::Affine(x, y) => Some((x, y)),
        }
    }

    fn check_same_curve(&self, other: &ECPoint) -> Result<()> {
        if self.curve != other.curve {
            Err(BlsError::InvalidParameter(
                "points belong to different curves".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    pub fn neg(&self) -> ECPoint {
        match &self.inner {
            ECPointInner::Infinity => self.clone(),
            ECPointInner::Affine(x, y) => ECPoint {
                inner: ECPointInner::Affine(x.clone(), y.neg()),
                curve: Rc::clone(&self.curve),
            },
        }
    }

    /// The group law: handles the identity, vertical-line (mutual inverse)
    /// cancellation, point doubling via the tangent line, and the general
    /// chord case, in that order.
    pub fn add(&self, other: &ECPoint) -> Result<ECPoint> {
        self.check_same_curve(other)?;

        let (x1, y1) = match self.coords() {
            None => return Ok(other.clone()),
            Some(c) => c,
        };
        let (x2, y2) = match other.coords() {
            None => return Ok(self.clone()),
            Some(c) => c,
        };

        if x1 == x2 && y1 == &y2.neg() {
            return Ok(self.curve.infinity());
        }

        let slope = if self == other {
            let two = self.curve.field.element(2);
            let three = self.curve.field.element(3);
            three
                .mul(x1)?
                .mul(x1)?
                .add(&self.curve.a)?
                .div(&two.mul(y1)?)?
        } else {
            y2.sub(y1)?.div(&x2.sub(x1)?)?
        };

        let x3 = slope.mul(&slope)?.sub(x1)?.sub(x2)?;
        let y3 = slope.mul(&x1.sub(&x3)?)?.sub(y1)?;

        Ok(ECPoint {
            inner: ECPointInner::Affine(x3, y3),
            curve: Rc::clone(&self.curve),
        })
    }

    pub fn sub(&self, other: &ECPoint) -> Result<ECPoint> {
        self.add(&other.neg())
    }

    /// Scalar multiplication by double-and-add. A negative scalar negates
    /// the point first and multiplies by the magnitude.
    pub fn scalar_mul(&self, scalar: &BigInt) -> Result<ECPoint> {
        if scalar.sign() == num_bigint::Sign::Minus {
            return self.neg().scalar_mul(&(-scalar));
        }
        let mut result = self.curve.infinity();
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

    /// The order of this point: the smallest positive divisor of
    /// `group_order` that annihilates it, found by scaling `group_order`
    /// down one prime factor at a time.
    pub fn order(&self, group_order: &BigInt) -> Result<BigInt> {
        let mut order = group_order.clone();
        for prime in prime_factors(group_order) {
            while (&order % &prime).is_zero() {
                let candidate = &order / &prime;
                if self.scalar_mul(&candidate)?.is_infinity() {
                    order = candidate;
                } else {
                    break;
                }
            }
        }
        Ok(order)
    }
}

impl PartialEq for ECPoint {
    fn eq(&self, other: &Self) -> bool {
        if self.curve != other.curve {
            return false;
        }
        match (&self.inner, &other.inner) {
            (ECPointInner::Infinity, ECPointInner::Infinity) => true,
            (ECPointInner::Affine(x1, y1), ECPointInner::Affine(x2, y2)) => x1 == x2 && y1 == y2,
            _ => false,
        }
    }
}
impl Eq for ECPoint {}

impl fmt::Display for ECPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            ECPointInner::Infinity => write!(f, "O"),
            ECPointInner::Affine(x, y) => write!(f, "({x}, {y})"),
        }
    }
}
