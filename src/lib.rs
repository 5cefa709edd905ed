//! Pedagogical BLS signatures over a small elliptic curve, built from
//! scratch up through the algebraic tower: prime field, polynomials,
//! extension field, elliptic curve group law (base and extension field),
//! hash-to-point, Miller's algorithm, and the reduced Tate pairing.
//!
//! None of this is sized for production use — curve parameters are meant
//! to be small enough to compute and display by hand, not cryptographically
//! secure. See [`bls::BlsScheme`] for the top-level orchestrator.

pub mod bls;
pub mod elliptic_curve;
pub mod error;
pub mod ext_curve;
pub mod extension_field;
pub mod hash_to_point;
pub mod miller;
pub mod numtheory;
pub mod polynomial;
pub mod prime_field;

pub use bls::{BlsScheme, BlsSteps};
pub use error::{BlsError, Result};
