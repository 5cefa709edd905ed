//! The extension field F_{p^k} = F_p[x] / ⟨f(x)⟩ for an irreducible `f` of
//! degree `k`, and its elements.

use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};

use crate::error::{BlsError, Result};
use crate::polynomial::Polynomial;
use crate::prime_field::PrimeField;

/// F_{p^k}, represented as polynomials over F_p reduced modulo an
/// irreducible polynomial `modulus` of degree `k`.
#[derive(Debug)]
pub struct ExtensionField {
    base: Rc<PrimeField>,
    modulus: Polynomial,
    k: usize,
}

impl ExtensionField {
    /// Build F_{p^k} from an irreducible polynomial `modulus` of degree `k`.
    /// Rejects a reducible (or non-degree-`k`) modulus.
    pub fn new(base: &Rc<PrimeField>, modulus: Polynomial) -> Result<Rc<ExtensionField>> {
        if modulus.degree() < 1 {
            return Err(BlsError::InvalidModulus(
                "extension modulus must have degree >= 1".to_string(),
            ));
        }
        if !modulus.is_irreducible()? {
            return Err(BlsError::InvalidModulus(format!(
                "{modulus} is not irreducible over F_{}",
                base.modulus()
            )));
        }
        let k = modulus.degree() as usize;
        Ok(Rc::new(ExtensionField {
            base: Rc::clone(base),
            modulus,
            k,
        }))
    }

    pub fn base_field(&self) -> &Rc<PrimeField> {
        &self.base
    }

    pub fn modulus(&self) -> &Polynomial {
        &self.modulus
    }

    /// The embedding degree `k`.
    pub fn degree(&self) -> usize {
        self.k
    }

    /// `p^k`, the number of elements in the field.
    pub fn order(&self) -> BigInt {
        self.base.modulus().pow(self.k as u32)
    }

    /// Build an element from low-degree-first coefficients, reducing modulo
    /// `modulus` (coefficient lists longer or shorter than `k` are handled
    /// transparently by polynomial reduction; shorter lists are implicitly
    /// zero-padded).
    pub fn element(self: &Rc<Self>, coeffs: impl IntoIterator<Item = impl Into<BigInt>>) -> ExtFieldElement {
        let raw = Polynomial::new(&self.base, coeffs);
        let (_, reduced) = raw
            .div_rem(&self.modulus)
            .expect("reduction modulo an irreducible polynomial never divides by zero");
        ExtFieldElement {
            value: reduced,
            ext_field: Rc::clone(self),
        }
    }

    pub fn zero(self: &Rc<Self>) -> ExtFieldElement {
        self.element([BigInt::zero()])
    }

    pub fn one(self: &Rc<Self>) -> ExtFieldElement {
        self.element([BigInt::one()])
    }
}

impl PartialEq for ExtensionField {
    fn eq(&self, other: &Self) -> bool {
        self.base.modulus() == other.base.modulus() && self.modulus == other.modulus
    }
}
impl Eq for ExtensionField {}

impl fmt::Display for ExtensionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F_{}[x]/({})", self.base.modulus(), self.modulus)
    }
}

/// An element of F_{p^k}, represented as its reduced polynomial
/// representative of degree `< k`.
#[derive(Debug, Clone)]
pub struct ExtFieldElement {
    value: Polynomial,
    ext_field: Rc<ExtensionField>,
}

impl ExtFieldElement {
    pub fn ext_field(&self) -> &Rc<ExtensionField> {
        &self.ext_field
    }

    /// The reduced polynomial representative.
    pub fn as_polynomial(&self) -> &Polynomial {
        &self.value
    }

    /// Low-degree-first coefficients, zero-padded to length `k`.
    pub fn coeffs(&self) -> Vec<BigInt> {
        let mut c = self.value.coeffs().to_vec();
        c.resize(self.ext_field.degree(), BigInt::zero());
        c
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    fn check_same_field(&self, other: &ExtFieldElement) -> Result<()> {
        if self.ext_field != other.ext_field {
            Err(BlsError::MismatchedFields(
                self.ext_field.base.modulus().clone(),
                other.ext_field.base.modulus().clone(),
            ))
        } else {
            Ok(())
        }
    }

    pub fn add(&self, other: &ExtFieldElement) -> Result<ExtFieldElement> {
        self.check_same_field(other)?;
        Ok(ExtFieldElement {
            value: self.value.add(&other.value)?,
            ext_field: Rc::clone(&self.ext_field),
        })
    }

    pub fn sub(&self, other: &ExtFieldElement) -> Result<ExtFieldElement> {
        self.check_same_field(other)?;
        Ok(ExtFieldElement {
            value: self.value.sub(&other.value)?,
            ext_field: Rc::clone(&self.ext_field),
        })
    }

    pub fn neg(&self) -> ExtFieldElement {
        ExtFieldElement {
            value: self.value.neg(),
            ext_field: Rc::clone(&self.ext_field),
        }
    }

    pub fn mul(&self, other: &ExtFieldElement) -> Result<ExtFieldElement> {
        self.check_same_field(other)?;
        let product = self.value.mul(&other.value)?;
        let (_, reduced) = product.div_rem(&self.ext_field.modulus)?;
        Ok(ExtFieldElement {
            value: reduced,
            ext_field: Rc::clone(&self.ext_field),
        })
    }

    /// Multiplicative inverse via the extended Euclidean algorithm on
    /// polynomials: `value` and `modulus` are coprime since `modulus` is
    /// irreducible, so `value*s + modulus*t == 1` gives `s == value^-1`.
    pub fn inverse(&self) -> Result<ExtFieldElement> {
        if self.is_zero() {
            return Err(BlsError::DivideByZero(format!(
                "inverse of 0 in {}",
                self.ext_field
            )));
        }
        let (g, s, _) = self.value.extended_gcd(&self.ext_field.modulus)?;
        debug_assert!(g.is_monic() || g.is_zero());
        let (_, reduced) = s.div_rem(&self.ext_field.modulus)?;
        Ok(ExtFieldElement {
            value: reduced,
            ext_field: Rc::clone(&self.ext_field),
        })
    }

    pub fn div(&self, other: &ExtFieldElement) -> Result<ExtFieldElement> {
        self.check_same_field(other)?;
        if other.is_zero() {
            return Err(BlsError::DivideByZero(format!(
                "division by 0 in {}",
                self.ext_field
            )));
        }
        self.mul(&other.inverse()?)
    }

    /// Square-and-multiply exponentiation, negative exponents handled via
    /// inverse-then-positive-magnitude as in `FieldElement::pow`.
    /// Euler's criterion generalizes to any finite field of odd
    /// characteristic: `a` is a square in F_q iff `a^((q-1)/2) == 1`. Zero
    /// is treated as a square.
    pub fn is_square(&self) -> bool {
        if self.is_zero() {
            return true;
        }
        let exponent = (self.ext_field.order() - BigInt::one()) / BigInt::from(2);
        self.pow(&exponent)
            .expect("pow never fails for a non-negative exponent")
            == self.ext_field.one()
    }

    /// Square root via systematic search over F_{p^k}. There's no cheap
    /// closed form here the way there is in the base field: the base
    /// field's `p ≡ 3 (mod 4)` shortcut relies on `p`, not `p^k`, being
    /// `≡ 3 (mod 4)`, and for `k` even that never holds. Fine for the
    /// small fields this crate is meant to run with.
    pub fn sqrt(&self) -> Result<ExtFieldElement> {
        if !self.is_square() {
            return Err(BlsError::SearchExhausted(format!(
                "{self} has no square root in {}",
                self.ext_field
            )));
        }
        for candidate in enumerate_elements(&self.ext_field) {
            if candidate.mul(&candidate)? == *self {
                return Ok(candidate);
            }
        }
        Err(BlsError::SearchExhausted(format!(
            "{self} has no square root in {}",
            self.ext_field
        )))
    }

    pub fn pow(&self, exp: &BigInt) -> Result<ExtFieldElement> {
        if exp.is_zero() {
            return Ok(self.ext_field.one());
        }
        if exp.sign() == num_bigint::Sign::Minus {
            return self.inverse()?.pow(&(-exp));
        }
        let mut result = self.ext_field.one();
        let mut base = self.clone();
        let mut e = exp.clone();
        let two = BigInt::from(2);
        while !e.is_zero() {
            if (&e % &two).is_one() {
                result = result.mul(&base)?;
            }
            base = base.mul(&base)?;
            e /= &two;
        }
        Ok(result)
    }
}

impl PartialEq for ExtFieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ext_field == other.ext_field && self.value == other.value
    }
}
impl Eq for ExtFieldElement {}

impl fmt::Display for ExtFieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Enumerate every element of `ext_field` in ascending order of the integer
/// formed from its coefficient vector (low-degree coefficient varying
/// fastest): `0, 1, ..., p-1, x, x+1, ..., x+(p-1), 2x, ...`.
pub fn enumerate_elements(ext_field: &Rc<ExtensionField>) -> impl Iterator<Item = ExtFieldElement> {
    let k = ext_field.degree();
    let p = ext_field.base_field().modulus().clone();
    let p_u64: u64 = num_traits::ToPrimitive::to_u64(&p).unwrap_or(u64::MAX);
    let total = p_u64.saturating_pow(k as u32);
    let ext_field = Rc::clone(ext_field);
    (0..total).map(move |code| {
        let mut coeffs = Vec::with_capacity(k);
        let mut n = code;
        for _ in 0..k {
            coeffs.push(BigInt::from(n % p_u64));
            n /= p_u64;
        }
        ext_field.element(coeffs)
    })
}

/// Like [`enumerate_elements`], but skips every element whose non-constant
/// coefficients are all zero — those are exactly the elements of the base
/// field F_p embedded into F_{p^k}, which can never generate a subgroup
/// outside E(F_p).
pub fn enumerate_non_base_field_elements(
    ext_field: &Rc<ExtensionField>,
) -> impl Iterator<Item = ExtFieldElement> {
    enumerate_elements(ext_field).filter(|e| e.coeffs().iter().skip(1).any(|c| !c.is_zero()))
}

/// Search for the smallest embedding degree `k >= 1` such that `r` divides
/// `p^k - 1`.
pub fn find_embedding_degree(p: &BigInt, r: &BigInt, max_k: u32) -> Result<u32> {
    for k in 1..=max_k {
        let order = p.pow(k) - BigInt::one();
        if (&order % r).is_zero() {
            return Ok(k);
        }
    }
    Err(BlsError::SearchExhausted(format!(
        "no embedding degree <= {max_k} found for p={p}, r={r}"
    )))
}

/// Find a degree-`k` irreducible polynomial over F_p.
///
/// For `k == 2` and `p ≡ 3 (mod 4)`, `x^2 + 1` is always irreducible (`-1`
/// is then a quadratic non-residue), so that shortcut is tried first. For
/// every other case this falls back to scanning monic degree-`k`
/// polynomials in ascending order of their (non-leading) coefficient
/// vector, interpreted as a base-p integer, low-degree coefficient varying
/// fastest.
pub fn find_irreducible(field: &Rc<PrimeField>, k: usize) -> Result<Polynomial> {
    if k == 2 {
        let candidate = Polynomial::new(field, [1, 0, 1]);
        if candidate.is_irreducible()? {
            return Ok(candidate);
        }
    }

    let p = field.modulus();
    let p_usize: u64 = p.to_u64().unwrap_or(u64::MAX);
    let total_non_leading: u64 = p_usize.saturating_pow(k as u32);

    for code in 0..total_non_leading {
        let mut coeffs = Vec::with_capacity(k + 1);
        let mut n = code;
        for _ in 0..k {
            coeffs.push(BigInt::from(n % p_usize));
            n /= p_usize;
        }
        coeffs.push(BigInt::one());
        let candidate = Polynomial::new(field, coeffs);
        if candidate.is_irreducible()? {
            return Ok(candidate);
        }
    }

    Err(BlsError::SearchExhausted(format!(
        "no irreducible degree-{k} polynomial found over F_{p}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prime_field::PrimeField;

    fn field103() -> Rc<PrimeField> {
        PrimeField::new(103).unwrap()
    }

    fn ext103() -> Rc<ExtensionField> {
        let base = field103();
        let modulus = find_irreducible(&base, 2).unwrap();
        ExtensionField::new(&base, modulus).unwrap()
    }

    #[test]
    fn rejects_reducible_modulus() {
        let base = field103();
        let reducible = Polynomial::new(&base, [-1, 0, 1]); // x^2 - 1
        assert!(ExtensionField::new(&base, reducible).is_err());
    }

    #[test]
    fn find_irreducible_shortcut_for_k2() {
        let base = field103();
        let f = find_irreducible(&base, 2).unwrap();
        assert_eq!(f, Polynomial::new(&base, [1, 0, 1]));
    }

    #[test]
    fn add_sub_mul_div_roundtrip() {
        let ext = ext103();
        let a = ext.element([3, 5]);
        let b = ext.element([1, 2]);
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.sub(&b).unwrap(), a);
        let prod = a.mul(&b).unwrap();
        assert_eq!(prod.div(&b).unwrap(), a);
    }

    #[test]
    fn inverse_round_trips() {
        let ext = ext103();
        let a = ext.element([3, 5]);
        let inv = a.inverse().unwrap();
        assert_eq!(a.mul(&inv).unwrap(), ext.one());
    }

    #[test]
    fn pow_zero_is_one() {
        let ext = ext103();
        let a = ext.element([3, 5]);
        assert_eq!(a.pow(&BigInt::zero()).unwrap(), ext.one());
    }

    #[test]
    fn find_embedding_degree_basic() {
        // p=103, r=13: 103^1-1=102=2*3*17 not div by 13; 103^2-1=10608=13*816.
        let k = find_embedding_degree(&BigInt::from(103), &BigInt::from(13), 4).unwrap();
        assert_eq!(k, 2);
    }
}
