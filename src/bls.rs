//! The BLS signature scheme orchestrator: wires the prime field, curve,
//! extension field, and pairing machinery together into setup, sign,
//! verify, and a step-by-step report for display.
//!
//! Security rests on bilinearity: `e_r(aP, Q) = e_r(P, Q)^a = e_r(P, aQ)`.
//! A signature `sig = a*H(m)` verifies because
//! `e_r(sig, Q) = e_r(H(m), Q)^a = e_r(H(m), a*Q) = e_r(H(m), public_key)`.

use std::rc::Rc;

use num_bigint::BigInt;
use serde::Serialize;
use tracing::{info, instrument};

use crate::elliptic_curve::{ECPoint, EllipticCurve};
use crate::error::Result;
use crate::ext_curve::{self, find_point_of_order_r, ExtCurvePoint};
use crate::extension_field::{find_embedding_degree, find_irreducible, ExtFieldElement, ExtensionField};
use crate::hash_to_point::hash_to_point;
use crate::miller::miller;
use crate::numtheory::largest_prime_factor;
use crate::prime_field::PrimeField;

/// The highest embedding degree this crate's setup pipeline will search
/// before giving up. Kept small because [`find_irreducible`] and
/// [`ext_curve::group_order`] scale with `p^k`.
const MAX_EMBEDDING_DEGREE: u32 = 6;

/// A fully set up BLS instance: field, curve, extension field, and keypair.
///
/// Construction runs the whole setup pipeline once; every other operation
/// (`sign`, `verify`, `tate_pairing`) reuses the curves and points it found.
pub struct BlsScheme {
    field: Rc<PrimeField>,
    curve: Rc<EllipticCurve>,
    group_order: BigInt,
    r: BigInt,
    cofactor: BigInt,
    embedding_degree: u32,
    ext_field: Rc<ExtensionField>,
    ext_group_order: BigInt,
    q: ExtCurvePoint,
    private_key: BigInt,
    public_key: ExtCurvePoint,
}

impl BlsScheme {
    /// Run the setup pipeline: field → curve → group order → `r` →
    /// cofactor → embedding degree → irreducible polynomial → extension
    /// field → `Q` → keypair.
    #[instrument(skip(private_key), fields(p = %p, a = %a, b = %b))]
    pub fn new(p: impl Into<BigInt>, a: impl Into<BigInt>, b: impl Into<BigInt>, private_key: impl Into<BigInt>) -> Result<BlsScheme> {
        let field = PrimeField::new(p)?;
        info!(%field, "prime field ready");

        let curve = EllipticCurve::new(&field, a, b)?;
        info!(%curve, "curve ready");

        let group_order = curve.group_order();
        info!(%group_order, "computed |E(F_p)|");

        let r = largest_prime_factor(&group_order)?;
        let cofactor = &group_order / &r;
        info!(%r, %cofactor, "found subgroup order and cofactor");

        let embedding_degree = find_embedding_degree(field.modulus(), &r, MAX_EMBEDDING_DEGREE)?;
        info!(embedding_degree, "found embedding degree");

        let modulus = find_irreducible(&field, embedding_degree as usize)?;
        info!(%modulus, "found irreducible polynomial");

        let ext_field = ExtensionField::new(&field, modulus)?;
        let ext_group_order = ext_curve::group_order(curve.a(), curve.b(), &ext_field)?;
        info!(%ext_field, %ext_group_order, "extension field ready");

        let q = find_point_of_order_r(curve.a(), curve.b(), &ext_field, &ext_group_order, &r)?;
        info!(%q, "found Q of order r in E(F_{{p^k}}) \\ E(F_p)");

        let private_key = private_key.into();
        let public_key = q.scalar_mul(&private_key)?;
        info!(%public_key, "computed public key a*Q");

        Ok(BlsScheme {
            field,
            curve,
            group_order,
            r,
            cofactor,
            embedding_degree,
            ext_field,
            ext_group_order,
            q,
            private_key,
            public_key,
        })
    }

    pub fn field(&self) -> &Rc<PrimeField> {
        &self.field
    }

    pub fn curve(&self) -> &Rc<EllipticCurve> {
        &self.curve
    }

    pub fn group_order(&self) -> &BigInt {
        &self.group_order
    }

    pub fn r(&self) -> &BigInt {
        &self.r
    }

    pub fn cofactor(&self) -> &BigInt {
        &self.cofactor
    }

    pub fn embedding_degree(&self) -> u32 {
        self.embedding_degree
    }

    pub fn ext_field(&self) -> &Rc<ExtensionField> {
        &self.ext_field
    }

    pub fn q(&self) -> &ExtCurvePoint {
        &self.q
    }

    pub fn public_key(&self) -> &ExtCurvePoint {
        &self.public_key
    }

    /// `sig = private_key * H(message)`.
    #[instrument(skip(self))]
    pub fn sign(&self, message: &str) -> Result<ECPoint> {
        let h = hash_to_point(message, &self.curve, &self.group_order, &self.r)?;
        h.scalar_mul(&self.private_key)
    }

    /// The reduced Tate pairing `e_r(p, q) = miller(p, q, r) ^ ((p^k - 1) / r)`.
    #[instrument(skip(self))]
    pub fn tate_pairing(&self, p: &ECPoint, q: &ExtCurvePoint) -> Result<ExtFieldElement> {
        let f = miller(p, q, &self.r, &self.ext_field)?;
        let exponent = (self.ext_field.order() - BigInt::from(1)) / &self.r;
        f.pow(&exponent)
    }

    /// Verify `signature` against `message` by checking
    /// `e_r(sig, Q) == e_r(H(m), public_key)`.
    #[instrument(skip(self))]
    pub fn verify(&self, message: &str, signature: &ECPoint) -> Result<bool> {
        if signature.is_infinity() || !self.curve.contains(signature) {
            return Ok(false);
        }
        let h = hash_to_point(message, &self.curve, &self.group_order, &self.r)?;
        let lhs = self.tate_pairing(signature, &self.q)?;
        let rhs = self.tate_pairing(&h, &self.public_key)?;
        Ok(lhs == rhs)
    }

    /// Sign `message` and collect every intermediate value of the
    /// setup-and-verify pipeline into a serializable report.
    #[instrument(skip(self))]
    pub fn steps(&self, message: &str) -> Result<BlsSteps> {
        let h = hash_to_point(message, &self.curve, &self.group_order, &self.r)?;
        let signature = h.scalar_mul(&self.private_key)?;
        let lhs = self.tate_pairing(&signature, &self.q)?;
        let rhs = self.tate_pairing(&h, &self.public_key)?;
        let verified = lhs == rhs;

        Ok(BlsSteps {
            group_order: self.group_order.to_string(),
            r: self.r.to_string(),
            cofactor: self.cofactor.to_string(),
            embedding_degree: self.embedding_degree,
            irreducible_polynomial: self.ext_field.modulus().full_form(),
            hash_point: h.to_string(),
            q: self.q.to_string(),
            public_key: self.public_key.to_string(),
            signature: signature.to_string(),
            pairing_lhs: lhs.to_string(),
            pairing_rhs: rhs.to_string(),
            verified,
            display_message: if verified {
                "Signature verified".to_string()
            } else {
                "Verification failed".to_string()
            },
        })
    }
}

/// Every intermediate value of a sign-then-verify run, string-rendered for
/// display (CLI `--json` output or a human-readable step dump).
#[derive(Debug, Clone, Serialize)]
pub struct BlsSteps {
    pub group_order: String,
    pub r: String,
    pub cofactor: String,
    pub embedding_degree: u32,
    pub irreducible_polynomial: String,
    pub hash_point: String,
    pub q: String,
    pub public_key: String,
    pub signature: String,
    pub pairing_lhs: String,
    pub pairing_rhs: String,
    pub verified: bool,
    pub display_message: String,
}
