//! Miller's algorithm: builds the Miller function `f_{r,P}` via the binary
//! expansion of `r`, evaluating line functions at `Q` along the way.
//!
//! The reduced Tate pairing is `e_r(P, Q) = miller(P, Q, r) ^ ((p^k - 1) / r)`
//! — that final exponentiation lives in [`crate::bls`].

use std::ops::{BitAnd, Shr};
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::One;
use tracing::trace;

use crate::elliptic_curve::ECPoint;
use crate::error::Result;
use crate::ext_curve::ExtCurvePoint;
use crate::extension_field::{ExtFieldElement, ExtensionField};
use crate::prime_field::FieldElement;

fn embed(ext_field: &Rc<ExtensionField>, value: &FieldElement) -> ExtFieldElement {
    ext_field.element([value.value().clone()])
}

/// Evaluate the line through `p` and `r_pt` (both in `E(F_p)`) at `q` (in
/// `E(F_{p^k})`). Three cases: `p == r_pt` (tangent line at doubling),
/// `p.x == r_pt.x` with `p != r_pt` (vertical line, since two distinct
/// points on the curve sharing an x-coordinate are mutual negatives), and
/// the general two-point chord. `p`/`r_pt` coordinates are embedded into
/// `F_{p^k}` before combining them with `q`'s coordinates.
///
/// Either `p` or `r_pt` being the point at infinity only arises from a
/// degenerate double-and-add step (accumulated `T` returning to `O`), which
/// does not happen for the subgroup orders this crate works with; it is
/// treated as a constant line (value `1`) rather than left unhandled.
pub fn line_function(p: &ECPoint, r_pt: &ECPoint, q: &ExtCurvePoint, ext_field: &Rc<ExtensionField>) -> Result<ExtFieldElement> {
    let (x_q, y_q) = match q.coords() {
        Some(c) => c,
        None => return Ok(ext_field.one()),
    };

    let (x_p, y_p) = match p.coords() {
        Some(c) => c,
        None => return Ok(ext_field.one()),
    };
    let (x_r, y_r) = match r_pt.coords() {
        Some(c) => c,
        None => return Ok(ext_field.one()),
    };

    let x_p_e = embed(ext_field, x_p);
    let y_p_e = embed(ext_field, y_p);

    if p == r_pt {
        let two = p.curve().field().element(2);
        let three = p.curve().field().element(3);
        let lambda = three
            .mul(x_p)?
            .mul(x_p)?
            .add(p.curve().a())?
            .div(&two.mul(y_p)?)?;
        let lambda_e = embed(ext_field, &lambda);
        return y_q.sub(&y_p_e)?.sub(&lambda_e.mul(&x_q.sub(&x_p_e)?)?);
    }

    if x_p == x_r {
        return x_q.sub(&x_p_e);
    }

    let lambda = y_r.sub(y_p)?.div(&x_r.sub(x_p)?)?;
    let lambda_e = embed(ext_field, &lambda);
    y_q.sub(&y_p_e)?.sub(&lambda_e.mul(&x_q.sub(&x_p_e)?)?)
}

/// Miller's algorithm: compute `f_{r,P}(Q)` via double-and-add over the
/// binary expansion of `r`. Vertical-line denominators are omitted — they
/// cancel out under the final exponentiation of the reduced Tate pairing,
/// so carrying them would only add work for no change in the result.
pub fn miller(p: &ECPoint, q: &ExtCurvePoint, r: &BigInt, ext_field: &Rc<ExtensionField>) -> Result<ExtFieldElement> {
    let n = r.bits();
    let mut t = p.clone();
    let mut f = ext_field.one();

    for i in (0..n.saturating_sub(1)).rev() {
        f = f.mul(&f)?.mul(&line_function(&t, &t, q, ext_field)?)?;
        t = t.add(&t)?;

        let bit = BigInt::one().bitand(r.shr(i));
        if bit.is_one() {
            f = f.mul(&line_function(&t, p, q, ext_field)?)?;
            t = t.add(p)?;
        }
        trace!(i, %f, "miller loop step");
    }

    Ok(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elliptic_curve::EllipticCurve;
    use crate::extension_field::find_irreducible;
    use crate::ext_curve::find_point_of_order_r;
    use crate::prime_field::PrimeField;

    #[test]
    fn line_function_vertical_case() {
        let field = PrimeField::new(103).unwrap();
        let curve = EllipticCurve::new(&field, 1, 0).unwrap();
        let modulus = find_irreducible(&field, 2).unwrap();
        let ext_field = ExtensionField::new(&field, modulus).unwrap();

        let p = curve.point(32, 47).unwrap();
        let neg_p = p.neg();
        assert_ne!(p, neg_p, "32 has nonzero y on this curve, so P != -P");
        let q = ExtCurvePoint::affine(
            &ext_field,
            curve.a(),
            curve.b(),
            ext_field.element([1, 1]),
            ext_field.element([2, 3]),
        );

        let value = line_function(&p, &neg_p, &q, &ext_field).unwrap();
        let expected = q.coords().unwrap().0.sub(&ext_field.element([32])).unwrap();
        assert_eq!(value, expected);
    }

    #[test]
    fn miller_runs_to_completion() {
        let field = PrimeField::new(103).unwrap();
        let curve = EllipticCurve::new(&field, 1, 0).unwrap();
        let group_order = curve.group_order();
        let r = crate::numtheory::largest_prime_factor(&group_order).unwrap();
        let modulus = find_irreducible(&field, 2).unwrap();
        let ext_field = ExtensionField::new(&field, modulus).unwrap();
        let ext_order = crate::ext_curve::group_order(curve.a(), curve.b(), &ext_field).unwrap();

        let p = crate::hash_to_point::hash_to_point("m", &curve, &group_order, &r).unwrap();
        let q = find_point_of_order_r(curve.a(), curve.b(), &ext_field, &ext_order, &r).unwrap();

        let f = miller(&p, &q, &r, &ext_field).unwrap();
        assert!(!f.is_zero());
    }
}
