//! Polynomials over F_p, used to build the extension field F_{p^k}.
//!
//! Coefficients are stored low-degree-first and kept in canonical form: no
//! trailing zero coefficients, except that the zero polynomial is always
//! represented as the single coefficient `[0]`.

use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

use crate::error::{BlsError, Result};
use crate::numtheory::prime_factors;
use crate::prime_field::PrimeField;

/// A polynomial over F_p, coefficients ordered low-degree-first.
#[derive(Debug, Clone)]
pub struct Polynomial {
    field: Rc<PrimeField>,
    /// `coeffs[i]` is the coefficient of `x^i`, each reduced into `[0, p)`.
    coeffs: Vec<BigInt>,
}

impl Polynomial {
    /// Build a polynomial from low-degree-first coefficients, reducing each
    /// one modulo `p` and stripping trailing zeros.
    pub fn new(field: &Rc<PrimeField>, coeffs: impl IntoIterator<Item = impl Into<BigInt>>) -> Polynomial {
        let p = field.modulus();
        let mut coeffs: Vec<BigInt> = coeffs.into_iter().map(|c| c.into().mod_floor(p)).collect();
        if coeffs.is_empty() {
            coeffs.push(BigInt::zero());
        }
        while coeffs.len() > 1 && coeffs.last().unwrap().is_zero() {
            coeffs.pop();
        }
        Polynomial {
            field: Rc::clone(field),
            coeffs,
        }
    }

    /// The constant polynomial `0` over `field`.
    pub fn zero(field: &Rc<PrimeField>) -> Polynomial {
        Polynomial::new(field, [BigInt::zero()])
    }

    /// The constant polynomial `1` over `field`.
    pub fn one(field: &Rc<PrimeField>) -> Polynomial {
        Polynomial::new(field, [BigInt::one()])
    }

    /// The polynomial `x` over `field`.
    pub fn x(field: &Rc<PrimeField>) -> Polynomial {
        Polynomial::new(field, [BigInt::zero(), BigInt::one()])
    }

    pub fn field(&self) -> &Rc<PrimeField> {
        &self.field
    }

    /// Coefficients, low-degree-first, each in `[0, p)`.
    pub fn coeffs(&self) -> &[BigInt] {
        &self.coeffs
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].is_zero()
    }

    /// `-1` for the zero polynomial, otherwise the highest power with a
    /// nonzero coefficient.
    pub fn degree(&self) -> i64 {
        if self.is_zero() {
            -1
        } else {
            (self.coeffs.len() - 1) as i64
        }
    }

    /// The coefficient of the highest-degree term. Zero for the zero
    /// polynomial.
    pub fn leading_coeff(&self) -> &BigInt {
        self.coeffs.last().expect("coeffs is never empty")
    }

    /// A polynomial is monic if its leading coefficient is 1. The zero
    /// polynomial is never monic.
    pub fn is_monic(&self) -> bool {
        !self.is_zero() && self.leading_coeff().is_one()
    }

    fn check_same_field(&self, other: &Polynomial) -> Result<()> {
        if self.field.modulus() != other.field.modulus() {
            Err(BlsError::MismatchedFields(
                self.field.modulus().clone(),
                other.field.modulus().clone(),
            ))
        } else {
            Ok(())
        }
    }

    pub fn add(&self, other: &Polynomial) -> Result<Polynomial> {
        self.check_same_field(other)?;
        let n = self.coeffs.len().max(other.coeffs.len());
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let a = self.coeffs.get(i).cloned().unwrap_or_else(BigInt::zero);
            let b = other.coeffs.get(i).cloned().unwrap_or_else(BigInt::zero);
            out.push(a + b);
        }
        Ok(Polynomial::new(&self.field, out))
    }

    pub fn neg(&self) -> Polynomial {
        Polynomial::new(&self.field, self.coeffs.iter().map(|c| -c))
    }

    pub fn sub(&self, other: &Polynomial) -> Result<Polynomial> {
        self.check_same_field(other)?;
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Polynomial) -> Result<Polynomial> {
        self.check_same_field(other)?;
        if self.is_zero() || other.is_zero() {
            return Ok(Polynomial::zero(&self.field));
        }
        let mut out = vec![BigInt::zero(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Ok(Polynomial::new(&self.field, out))
    }

    /// Polynomial long division: returns `(quotient, remainder)` with
    /// `self == quotient * divisor + remainder` and
    /// `remainder.degree() < divisor.degree()`.
    pub fn div_rem(&self, divisor: &Polynomial) -> Result<(Polynomial, Polynomial)> {
        self.check_same_field(divisor)?;
        if divisor.is_zero() {
            return Err(BlsError::DivideByZero(
                "polynomial division by the zero polynomial".to_string(),
            ));
        }

        let p = self.field.modulus();
        let inv_lead = self
            .field
            .element(divisor.leading_coeff().clone())
            .inverse()?;

        let mut remainder = self.coeffs.clone();
        let mut quotient = vec![BigInt::zero(); (self.degree() - divisor.degree() + 1).max(0) as usize];

        while remainder.len() >= divisor.coeffs.len()
            && !remainder.iter().all(|c| c.is_zero())
        {
            let rem_degree = remainder.len() - 1;
            if remainder[rem_degree].is_zero() {
                remainder.pop();
                continue;
            }
            let shift = rem_degree - (divisor.coeffs.len() - 1);
            let coeff = (&remainder[rem_degree] * inv_lead.value()).mod_floor(p);
            if shift < quotient.len() {
                quotient[shift] = coeff.clone();
            }
            for (j, d) in divisor.coeffs.iter().enumerate() {
                remainder[shift + j] = (&remainder[shift + j] - &coeff * d).mod_floor(p);
            }
            remainder.pop();
        }

        Ok((
            Polynomial::new(&self.field, quotient),
            Polynomial::new(&self.field, remainder),
        ))
    }

    /// Exponentiation by repeated squaring, optionally reducing modulo
    /// `modulus` after every multiplication. `Pow` only takes one type
    /// argument, so this is an inherent method rather than a trait impl.
    pub fn pow_mod(&self, exp: &BigInt, modulus: Option<&Polynomial>) -> Result<Polynomial> {
        if exp.sign() == num_bigint::Sign::Minus {
            return Err(BlsError::InvalidParameter(
                "polynomial exponentiation does not support negative exponents".to_string(),
            ));
        }
        let reduce = |p: Polynomial| -> Result<Polynomial> {
            match modulus {
                Some(m) => Ok(p.div_rem(m)?.1),
                None => Ok(p),
            }
        };

        let mut result = Polynomial::one(&self.field);
        let mut base = reduce(self.clone())?;
        let mut e = exp.clone();
        let two = BigInt::from(2);
        while !e.is_zero() {
            if e.is_odd() {
                result = reduce(result.mul(&base)?)?;
            }
            base = reduce(base.mul(&base)?)?;
            e /= &two;
        }
        Ok(result)
    }

    /// Euclidean algorithm, normalized so the result is monic (or zero).
    pub fn gcd(&self, other: &Polynomial) -> Result<Polynomial> {
        self.check_same_field(other)?;
        let (mut a, mut b) = (self.clone(), other.clone());
        while !b.is_zero() {
            let (_, r) = a.div_rem(&b)?;
            a = b;
            b = r;
        }
        if a.is_zero() {
            return Ok(a);
        }
        let inv_lead = self.field.element(a.leading_coeff().clone()).inverse()?;
        let normalized: Vec<BigInt> = a
            .coeffs
            .iter()
            .map(|c| (c * inv_lead.value()).mod_floor(self.field.modulus()))
            .collect();
        Ok(Polynomial::new(&self.field, normalized))
    }

    /// Extended Euclidean algorithm for polynomials: returns `(g, s, t)`
    /// with `self*s + other*t == g == gcd(self, other)`, `g` normalized to
    /// monic (or zero).
    pub fn extended_gcd(&self, other: &Polynomial) -> Result<(Polynomial, Polynomial, Polynomial)> {
        self.check_same_field(other)?;
        let (mut old_r, mut r) = (self.clone(), other.clone());
        let (mut old_s, mut s) = (Polynomial::one(&self.field), Polynomial::zero(&self.field));
        let (mut old_t, mut t) = (Polynomial::zero(&self.field), Polynomial::one(&self.field));

        while !r.is_zero() {
            let (q, rem) = old_r.div_rem(&r)?;
            old_r = std::mem::replace(&mut r, rem);
            let new_s = old_s.sub(&q.mul(&s)?)?;
            old_s = std::mem::replace(&mut s, new_s);
            let new_t = old_t.sub(&q.mul(&t)?)?;
            old_t = std::mem::replace(&mut t, new_t);
        }

        if old_r.is_zero() {
            return Ok((old_r, old_s, old_t));
        }
        let inv_lead = self.field.element(old_r.leading_coeff().clone()).inverse()?;
        let scale = Polynomial::new(&self.field, [inv_lead.value().clone()]);
        Ok((old_r.mul(&scale)?, old_s.mul(&scale)?, old_t.mul(&scale)?))
    }

    /// Rabin's irreducibility test: `f` of degree `n` over F_p is irreducible
    /// iff `x^(p^n) ≡ x (mod f)` and, for every prime `q` dividing `n`,
    /// `gcd(x^(p^(n/q)) - x, f)` is a constant (degree 0).
    pub fn is_irreducible(&self) -> Result<bool> {
        let n = self.degree();
        if n < 1 {
            return Ok(false);
        }
        let n = n as u64;
        let p = self.field.modulus();
        let x = Polynomial::x(&self.field);

        for q in prime_factors(&BigInt::from(n)) {
            let q = q.to_u64().expect("small embedding degrees only");
            let exponent = p.pow((n / q) as u32);
            let reduced = x.pow_mod(&exponent, Some(self))?;
            let diff = reduced.sub(&x)?;
            let g = self.gcd(&diff)?;
            if g.degree() != 0 {
                return Ok(false);
            }
        }

        let exponent = p.pow(n as u32);
        let reduced = x.pow_mod(&exponent, Some(self))?;
        Ok(reduced == x)
    }

    /// Render every coefficient from `x^0` up to `x^degree`, including
    /// zeros: `"c_0 + c_1*x + ... + c_k*x^k"`. Unlike the compact `Display`
    /// impl (which drops zero terms), this is for reports that need the
    /// full coefficient vector visible, e.g. an irreducible modulus shown
    /// alongside the extension field it defines.
    pub fn full_form(&self) -> String {
        let terms: Vec<String> = self
            .coeffs
            .iter()
            .enumerate()
            .map(|(i, c)| match i {
                0 => format!("{c}"),
                1 => format!("{c}*x"),
                _ => format!("{c}*x^{i}"),
            })
            .collect();
        terms.join(" + ")
    }

    /// Evaluate the polynomial at a field value via Horner's method.
    pub fn evaluate(&self, value: &BigInt) -> BigInt {
        let p = self.field.modulus();
        let mut acc = BigInt::zero();
        for c in self.coeffs.iter().rev() {
            acc = (&acc * value + c).mod_floor(p);
        }
        acc
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        self.field.modulus() == other.field.modulus() && self.coeffs == other.coeffs
    }
}
impl Eq for Polynomial {}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let terms: Vec<String> = self
            .coeffs
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| !c.is_zero())
            .map(|(i, c)| match i {
                0 => format!("{c}"),
                1 => format!("{c}*x"),
                _ => format!("{c}*x^{i}"),
            })
            .collect();
        write!(f, "{}", terms.join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f() -> Rc<PrimeField> {
        PrimeField::new(103).unwrap()
    }

    #[test]
    fn canonicalizes_trailing_zeros() {
        let f = f();
        let p = Polynomial::new(&f, [1, 2, 0, 0]);
        assert_eq!(p.degree(), 1);
        assert_eq!(p.coeffs(), &[BigInt::from(1), BigInt::from(2)]);
    }

    #[test]
    fn zero_polynomial_degree_is_negative_one() {
        let f = f();
        assert_eq!(Polynomial::zero(&f).degree(), -1);
        assert_eq!(Polynomial::new(&f, [0, 0, 0]).degree(), -1);
    }

    #[test]
    fn is_monic_requires_leading_one() {
        let f = f();
        assert!(Polynomial::new(&f, [1, 1]).is_monic());
        assert!(!Polynomial::new(&f, [1, 2]).is_monic());
        assert!(!Polynomial::zero(&f).is_monic());
    }

    #[test]
    fn add_sub_mul() {
        let f = f();
        let a = Polynomial::new(&f, [1, 1]); // 1 + x
        let b = Polynomial::new(&f, [1, 0, 1]); // 1 + x^2
        assert_eq!(a.add(&b).unwrap(), Polynomial::new(&f, [2, 1, 1]));
        assert_eq!(b.sub(&a).unwrap(), Polynomial::new(&f, [0, -1, 1]));
        // (1+x)(1+x^2) = 1 + x + x^2 + x^3
        assert_eq!(a.mul(&b).unwrap(), Polynomial::new(&f, [1, 1, 1, 1]));
    }

    #[test]
    fn div_rem_matches_long_division() {
        let f = f();
        // x^2 - 1 = (x - 1)(x + 1), dividing by (x - 1) gives quotient x+1, remainder 0.
        let dividend = Polynomial::new(&f, [-1, 0, 1]);
        let divisor = Polynomial::new(&f, [-1, 1]);
        let (q, r) = dividend.div_rem(&divisor).unwrap();
        assert_eq!(q, Polynomial::new(&f, [1, 1]));
        assert!(r.is_zero());
    }

    #[test]
    fn div_rem_with_nonzero_remainder() {
        let f = f();
        // x^2 + 1 divided by x gives quotient x, remainder 1.
        let dividend = Polynomial::new(&f, [1, 0, 1]);
        let divisor = Polynomial::x(&f);
        let (q, r) = dividend.div_rem(&divisor).unwrap();
        assert_eq!(q, Polynomial::new(&f, [0, 1]));
        assert_eq!(r, Polynomial::one(&f));
    }

    #[test]
    fn gcd_is_monic() {
        let f = f();
        let a = Polynomial::new(&f, [-1, 0, 1]); // x^2 - 1
        let b = Polynomial::new(&f, [-1, 1]); // x - 1
        let g = a.gcd(&b).unwrap();
        assert!(g.is_monic());
        assert_eq!(g, b);
    }

    #[test]
    fn full_form_keeps_zero_terms() {
        let f = f();
        let poly = Polynomial::new(&f, [1, 0, 1]); // x^2 + 1
        assert_eq!(poly.full_form(), "1 + 0*x + 1*x^2");
        assert_eq!(Polynomial::zero(&f).full_form(), "0");
    }

    #[test]
    fn x_squared_plus_one_is_irreducible_mod_103() {
        // 103 ≡ 3 (mod 4), so -1 is a non-residue and x^2 + 1 is irreducible.
        let f = f();
        let poly = Polynomial::new(&f, [1, 0, 1]);
        assert!(poly.is_irreducible().unwrap());
    }

    #[test]
    fn reducible_quadratic_is_rejected() {
        let f = f();
        // x^2 - 1 = (x-1)(x+1), reducible.
        let poly = Polynomial::new(&f, [-1, 0, 1]);
        assert!(!poly.is_irreducible().unwrap());
    }

    #[test]
    fn extended_gcd_identity_holds() {
        let f = f();
        let a = Polynomial::new(&f, [1, 0, 1]); // x^2 + 1, irreducible mod 103
        let b = Polynomial::new(&f, [5, 2]); // 5 + 2x
        let (g, s, t) = a.extended_gcd(&b).unwrap();
        assert!(g.is_monic());
        let check = a.mul(&s).unwrap().add(&b.mul(&t).unwrap()).unwrap();
        assert_eq!(check, g);
    }

    #[test]
    fn evaluate_horner() {
        let f = f();
        let poly = Polynomial::new(&f, [1, 2, 3]); // 1 + 2x + 3x^2
        assert_eq!(poly.evaluate(&BigInt::from(2)), BigInt::from((1 + 4 + 12) % 103));
    }
}
