use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::Scalar;
use group::Group;
use rand::rngs::OsRng;

use schnorr_fragments::test_utils::{DlogKnowledge, PedersenOpening};
use schnorr_fragments::{Response, SendThenDelegateProtocol, VariableValue};

type G = RistrettoPoint;

/// Walks a response tree along a child path and returns the scalar bound to
/// `var` at the final level.
fn scalar_at(response: &Response<G>, path: &[&str], var: &str) -> Scalar {
    let mut current = response;
    for name in path {
        let Response::Composite { children, .. } = current else {
            panic!("expected a composite response at '{name}'");
        };
        current = &children[*name];
    }
    let Response::Composite { own, .. } = current else {
        panic!("expected a composite response for '{var}'");
    };
    match own[var] {
        VariableValue::Scalar(s) => s,
        VariableValue::Element(_) => panic!("'{var}' is not a scalar"),
    }
}

#[test]
fn two_transcripts_extract_the_witness() {
    // Special soundness: answering two distinct challenges from the same
    // announcement secret reveals the witness as (s0 - s1) / (c0 - c1).
    let mut rng = OsRng;
    let base = G::random(&mut rng);
    let w = Scalar::random(&mut rng);
    let protocol = SendThenDelegateProtocol::from_delegate(DlogKnowledge {
        base,
        target: base * w,
        witness: Some(w),
    });

    let (announcement, state) = protocol.prover_commit(&mut rng).unwrap();
    let c0 = Scalar::random(&mut rng);
    let c1 = Scalar::random(&mut rng);
    assert_ne!(c0, c1);

    let r0 = protocol.prover_response(state.clone(), &c0).unwrap();
    let r1 = protocol.prover_response(state, &c1).unwrap();
    assert!(protocol.verifier(&announcement, &c0, &r0).is_ok());
    assert!(protocol.verifier(&announcement, &c1, &r1).is_ok());

    let s0 = scalar_at(&r0, &["protocol"], "x");
    let s1 = scalar_at(&r1, &["protocol"], "x");
    let extracted = (s0 - s1) * (c0 - c1).invert();
    assert_eq!(extracted, w);
}

#[allow(non_snake_case)]
#[test]
fn extraction_recovers_every_declared_variable() {
    let mut rng = OsRng;
    let Y = G::random(&mut rng);
    let H = G::random(&mut rng);
    let m = Scalar::random(&mut rng);
    let r = Scalar::random(&mut rng);
    let protocol = SendThenDelegateProtocol::from_delegate(PedersenOpening {
        h: Y,
        g: H,
        commitment: Y * m + H * r,
        witness: Some((m, r)),
    });

    let (_, state) = protocol.prover_commit(&mut rng).unwrap();
    let c0 = Scalar::random(&mut rng);
    let c1 = Scalar::random(&mut rng);
    let r0 = protocol.prover_response(state.clone(), &c0).unwrap();
    let r1 = protocol.prover_response(state, &c1).unwrap();

    let inv = (c0 - c1).invert();
    let extracted_m =
        (scalar_at(&r0, &["protocol"], "m") - scalar_at(&r1, &["protocol"], "m")) * inv;
    let extracted_r =
        (scalar_at(&r0, &["protocol"], "r") - scalar_at(&r1, &["protocol"], "r")) * inv;
    assert_eq!(extracted_m, m);
    assert_eq!(extracted_r, r);
}

#[test]
fn response_is_linear_in_the_challenge() {
    // s = c * w + nonce, so two responses from one nonce differ by
    // (c0 - c1) * w exactly.
    let mut rng = OsRng;
    let base = G::random(&mut rng);
    let w = Scalar::random(&mut rng);
    let protocol = SendThenDelegateProtocol::from_delegate(DlogKnowledge {
        base,
        target: base * w,
        witness: Some(w),
    });

    let (_, state) = protocol.prover_commit(&mut rng).unwrap();
    let c0 = Scalar::from(11u64);
    let c1 = Scalar::from(3u64);
    let r0 = protocol.prover_response(state.clone(), &c0).unwrap();
    let r1 = protocol.prover_response(state, &c1).unwrap();

    let s0 = scalar_at(&r0, &["protocol"], "x");
    let s1 = scalar_at(&r1, &["protocol"], "x");
    assert_eq!(s0 - s1, (c0 - c1) * w);
}
