use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::Scalar;
use group::Group;
use rand::rngs::OsRng;

use schnorr_fragments::fiat_shamir::Nizk;
use schnorr_fragments::test_utils::{DlogKnowledge, PedersenOpening};
use schnorr_fragments::SendThenDelegateProtocol;

type G = RistrettoPoint;

fn dlog_nizk() -> Nizk<G> {
    let mut rng = OsRng;
    let base = G::random(&mut rng);
    let w = Scalar::random(&mut rng);
    let protocol = SendThenDelegateProtocol::from_delegate(DlogKnowledge {
        base,
        target: base * w,
        witness: Some(w),
    });
    Nizk::new(b"fiat-shamir-test", protocol)
}

#[test]
fn batchable_proof_round_trips() {
    let nizk = dlog_nizk();
    let proof = nizk.prove_batchable(&mut OsRng).unwrap();
    assert!(nizk.verify_batchable(&proof).is_ok());
}

#[test]
fn compact_proof_round_trips() {
    let nizk = dlog_nizk();
    let proof = nizk.prove_compact(&mut OsRng).unwrap();
    assert!(nizk.verify_compact(&proof).is_ok());
}

#[allow(non_snake_case)]
#[test]
fn compact_proofs_are_shorter() {
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
    let nizk: Nizk<_> = Nizk::new(b"pedersen", protocol);

    let batchable = nizk.prove_batchable(&mut rng).unwrap();
    let compact = nizk.prove_compact(&mut rng).unwrap();
    assert!(nizk.verify_batchable(&batchable).is_ok());
    assert!(nizk.verify_compact(&compact).is_ok());
    assert!(compact.len() < batchable.len());
}

#[test]
fn tampered_batchable_proof_fails() {
    let nizk = dlog_nizk();
    let proof = nizk.prove_batchable(&mut OsRng).unwrap();
    for index in 0..proof.len() {
        let mut tampered = proof.clone();
        tampered[index] ^= 0x01;
        assert!(
            nizk.verify_batchable(&tampered).is_err(),
            "tampering at byte {index} was not caught"
        );
    }
}

#[test]
fn tampered_compact_proof_fails() {
    let nizk = dlog_nizk();
    let proof = nizk.prove_compact(&mut OsRng).unwrap();
    for index in 0..proof.len() {
        let mut tampered = proof.clone();
        tampered[index] ^= 0x01;
        assert!(
            nizk.verify_compact(&tampered).is_err(),
            "tampering at byte {index} was not caught"
        );
    }
}

#[test]
fn proofs_do_not_transfer_between_sessions() {
    let mut rng = OsRng;
    let base = G::random(&mut rng);
    let w = Scalar::random(&mut rng);
    let make_protocol = || {
        SendThenDelegateProtocol::from_delegate(DlogKnowledge {
            base,
            target: base * w,
            witness: Some(w),
        })
    };
    let nizk_a = Nizk::<G>::new(b"session-a", make_protocol());
    let nizk_b = Nizk::<G>::new(b"session-b", make_protocol());

    let proof = nizk_a.prove_batchable(&mut rng).unwrap();
    assert!(nizk_a.verify_batchable(&proof).is_ok());
    assert!(nizk_b.verify_batchable(&proof).is_err());
}

#[test]
fn truncated_proofs_fail() {
    let nizk = dlog_nizk();
    let batchable = nizk.prove_batchable(&mut OsRng).unwrap();
    let compact = nizk.prove_compact(&mut OsRng).unwrap();
    assert!(nizk.verify_batchable(&batchable[..batchable.len() - 1]).is_err());
    assert!(nizk.verify_compact(&compact[..compact.len() - 1]).is_err());
    // Trailing garbage is not ignored either.
    let mut extended = batchable.clone();
    extended.push(0);
    assert!(nizk.verify_batchable(&extended).is_err());
}
