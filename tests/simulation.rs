use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::Scalar;
use group::Group;
use rand::rngs::OsRng;

use schnorr_fragments::test_utils::{DlogKnowledge, OffsetDlog, PedersenOpening};
use schnorr_fragments::{
    Error, SendThenDelegateFragment, SendThenDelegateProtocol, Transcript,
};

type G = RistrettoPoint;

fn dlog_protocol(with_witness: bool) -> (SendThenDelegateProtocol<G>, G, G) {
    let mut rng = OsRng;
    let base = G::random(&mut rng);
    let w = Scalar::random(&mut rng);
    let target = base * w;
    let protocol = SendThenDelegateProtocol::from_delegate(DlogKnowledge {
        base,
        target,
        witness: with_witness.then_some(w),
    });
    (protocol, base, target)
}

#[test]
fn simulated_transcripts_verify() {
    // The simulator works entirely without the witness.
    let mut rng = OsRng;
    let (protocol, _, _) = dlog_protocol(false);
    for _ in 0..8 {
        let challenge = protocol.random_challenge(&mut rng);
        let transcript = protocol.simulate_transcript(&challenge, &mut rng).unwrap();
        assert_eq!(transcript.challenge, challenge);
        assert!(protocol
            .verifier(
                &transcript.announcement,
                &transcript.challenge,
                &transcript.response
            )
            .is_ok());
    }
}

#[test]
fn simulated_responses_vary() {
    // Response values are sampled fresh per simulation; a repeat would
    // leak that the transcript is simulated.
    let mut rng = OsRng;
    let (protocol, _, _) = dlog_protocol(false);
    let challenge = protocol.random_challenge(&mut rng);
    let a = protocol.simulate_transcript(&challenge, &mut rng).unwrap();
    let b = protocol.simulate_transcript(&challenge, &mut rng).unwrap();
    assert_ne!(a.response, b.response);
}

#[test]
fn simulation_covers_send_first_values() {
    let mut rng = OsRng;
    let base = G::random(&mut rng);
    let target = G::random(&mut rng);
    // Verifier-side instance: no witness anywhere.
    let fragment = SendThenDelegateFragment::new(OffsetDlog::<G> {
        base,
        target,
        witness: None,
    });
    let protocol = SendThenDelegateProtocol::new(std::sync::Arc::new(fragment));

    let challenge = protocol.random_challenge(&mut rng);
    let transcript = protocol.simulate_transcript(&challenge, &mut rng).unwrap();
    assert!(protocol
        .verifier(
            &transcript.announcement,
            &transcript.challenge,
            &transcript.response
        )
        .is_ok());
}

fn honest_transcript(
    protocol: &SendThenDelegateProtocol<G>,
    rng: &mut OsRng,
) -> Transcript<G> {
    let (announcement, state) = protocol.prover_commit(rng).unwrap();
    let challenge = protocol.random_challenge(rng);
    let response = protocol.prover_response(state, &challenge).unwrap();
    Transcript {
        announcement,
        challenge,
        response,
    }
}

#[allow(non_snake_case)]
#[test]
fn compression_round_trips() {
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

    let transcript = honest_transcript(&protocol, &mut rng);
    let compressed = protocol.compress_transcript(&transcript).unwrap();

    let mut cursor = compressed.as_slice();
    let restored = protocol
        .decompress_transcript(&mut cursor, &transcript.challenge)
        .unwrap();
    assert!(cursor.is_empty());
    assert_eq!(restored, transcript);
    assert!(protocol
        .verifier(
            &restored.announcement,
            &restored.challenge,
            &restored.response
        )
        .is_ok());
}

#[test]
fn compression_drops_rederivable_parts() {
    let mut rng = OsRng;
    let (protocol, _, _) = dlog_protocol(true);
    let transcript = honest_transcript(&protocol, &mut rng);

    let compressed = protocol.compress_transcript(&transcript).unwrap();
    let full = {
        let mut bytes = transcript.announcement.serialize();
        transcript.response.serialize_into(&mut bytes);
        bytes
    };
    assert!(compressed.len() < full.len());
}

#[test]
fn malformed_compressed_transcript_is_rejected() {
    let mut rng = OsRng;
    let (protocol, _, _) = dlog_protocol(true);
    let transcript = honest_transcript(&protocol, &mut rng);
    let compressed = protocol.compress_transcript(&transcript).unwrap();

    // A mangled send-first tag no longer decodes.
    let mut corrupted = compressed.clone();
    corrupted[0] ^= 0x01;
    let mut cursor = corrupted.as_slice();
    assert!(matches!(
        protocol.decompress_transcript(&mut cursor, &transcript.challenge),
        Err(Error::InvalidTranscript)
    ));

    // Truncated data runs out mid-response.
    let mut cursor = &compressed[..compressed.len() - 1];
    assert!(matches!(
        protocol.decompress_transcript(&mut cursor, &transcript.challenge),
        Err(Error::InvalidTranscript)
    ));
}

#[allow(non_snake_case)]
#[test]
fn decompression_reruns_the_additional_check() {
    // A compressed transcript whose send-first value fails the
    // statement-specific predicate is rejected inside decompression, even
    // though every knowledge equation is internally consistent.
    let mut rng = OsRng;
    let B = G::random(&mut rng);
    let x = Scalar::random(&mut rng);
    let T = B * x + G::identity();
    let fragment = SendThenDelegateFragment::new(OffsetDlog {
        base: B,
        target: T,
        witness: Some((x, G::identity())),
    });
    let protocol = SendThenDelegateProtocol::new(std::sync::Arc::new(fragment));

    let transcript = honest_transcript(&protocol, &mut rng);
    let compressed = protocol.compress_transcript(&transcript).unwrap();
    let mut cursor = compressed.as_slice();
    assert!(matches!(
        protocol.decompress_transcript(&mut cursor, &transcript.challenge),
        Err(Error::InvalidTranscript)
    ));
}

#[test]
fn decompression_rejects_wrong_challenge() {
    let mut rng = OsRng;
    let (protocol, _, _) = dlog_protocol(true);
    let transcript = honest_transcript(&protocol, &mut rng);
    let compressed = protocol.compress_transcript(&transcript).unwrap();

    // Decompressing under a different challenge re-derives a different
    // announcement; the transcript still checks (it is exactly a simulated
    // one), so binding to the original announcement must happen at a layer
    // that compares announcements, as the Fiat-Shamir wrapper does.
    let other = protocol.random_challenge(&mut rng);
    let mut cursor = compressed.as_slice();
    let restored = protocol.decompress_transcript(&mut cursor, &other).unwrap();
    assert_ne!(restored.announcement, transcript.announcement);
}
