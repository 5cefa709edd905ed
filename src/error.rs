//! Error kinds shared across the algebraic tower.
//!
//! Every fallible operation in this crate returns `Result<T, BlsError>`. The
//! variants are grouped by failure kind rather than by module, since a
//! single kind (e.g. divide-by-zero) can be raised from several places
//! (`FieldElement::inverse`, `Polynomial::div_rem`, `ExtFieldElement::inverse`).

use num_bigint::BigInt;
use thiserror::Error;

/// Errors raised by the BLS algebraic core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlsError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("mismatched fields: operands belong to F_{0} and F_{1}")]
    MismatchedFields(BigInt, BigInt),

    #[error("divide by zero: {0}")]
    DivideByZero(String),

    #[error("{0} is not a quadratic residue, no square root exists")]
    NotASquare(BigInt),

    #[error("invalid extension modulus: {0}")]
    InvalidModulus(String),

    #[error("search exhausted: {0}")]
    SearchExhausted(String),

    #[error("no point found: increment-and-try exhausted F_p without landing on the curve")]
    NoPointFound,
}

pub type Result<T> = std::result::Result<T, BlsError>;
