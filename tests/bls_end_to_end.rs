//! End-to-end scenarios over the worked example curve `p=103, A=1, B=0`.

use num_bigint::BigInt;
use tate_bls::bls::BlsScheme;
use tate_bls::error::BlsError;

#[test]
fn scenario_1_setup_and_verify() {
    let bls = BlsScheme::new(103, 1, 0, 7).unwrap();
    assert_eq!(*bls.group_order(), BigInt::from(104));
    assert_eq!(*bls.r(), BigInt::from(13));
    assert_eq!(*bls.cofactor(), BigInt::from(8));
    assert_eq!(bls.embedding_degree(), 2);
    assert_eq!(bls.ext_field().modulus().to_string(), "1*x^2 + 1");
    assert_eq!(bls.ext_field().modulus().full_form(), "1 + 0*x + 1*x^2");

    let sig = bls.sign("hello").unwrap();
    assert!(bls.verify("hello", &sig).unwrap());
}

#[test]
fn scenario_2_hash_to_point_properties() {
    let bls = BlsScheme::new(103, 1, 0, 7).unwrap();
    let sig = bls.sign("שלום").unwrap();
    assert!(bls.verify("שלום", &sig).unwrap());

    let h = tate_bls::hash_to_point::hash_to_point(
        "שלום",
        bls.curve(),
        bls.group_order(),
        bls.r(),
    )
    .unwrap();
    assert!(bls.curve().contains(&h));
    assert!(h.scalar_mul(bls.r()).unwrap().is_infinity());
}

#[test]
fn scenario_3_tampered_message_rejected() {
    let bls = BlsScheme::new(103, 1, 0, 7).unwrap();
    let sig = bls.sign("original").unwrap();
    assert!(bls.verify("original", &sig).unwrap());
    assert!(!bls.verify("tampered", &sig).unwrap());
}

#[test]
fn scenario_4_forged_signature_rejected() {
    let bls = BlsScheme::new(103, 1, 0, 7).unwrap();
    let sig = bls.sign("same").unwrap();
    let forged = sig.add(&sig).unwrap();
    assert!(!bls.verify("same", &forged).unwrap());
}

#[test]
fn scenario_5_non_prime_modulus_rejected() {
    let err = BlsScheme::new(104, 1, 0, 1).unwrap_err();
    assert!(matches!(err, BlsError::InvalidParameter(_)));
}

#[test]
fn scenario_6_singular_curve_rejected() {
    let err = BlsScheme::new(103, 0, 0, 1).unwrap_err();
    assert!(matches!(err, BlsError::InvalidParameter(_)));
}
