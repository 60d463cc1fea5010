//! Demo: proving knowledge of a discrete logarithm with fragments.
//!
//! The prover convinces a verifier that it knows a secret `x` with
//! `P = x * G`, where `G` generates the Ristretto group. The statement is
//! expressed as a delegate-only fragment declaring one scalar variable and
//! wiring a single linear-statement leaf; the top-level adapter turns the
//! fragment into a standalone three-move protocol, and the Fiat-Shamir
//! wrapper makes it non-interactive.

use std::sync::Arc;

use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::Scalar;
use group::Group;
use rand::rngs::OsRng;

use schnorr_fragments::fiat_shamir::Nizk;
use schnorr_fragments::{
    DelegateStrategy, Error, LinearStatementFragment, ProverSpec, ProverSpecBuilder,
    SendThenDelegateProtocol, SubprotocolSpec, SubprotocolSpecBuilder,
};

type G = RistrettoPoint;

/// Knowledge of `x` with `point = x * G`.
struct SchnorrStatement {
    point: G,
    secret: Option<Scalar>,
}

impl DelegateStrategy<G> for SchnorrStatement {
    fn provide_subprotocol_spec(
        &self,
        mut builder: SubprotocolSpecBuilder<G>,
    ) -> Result<SubprotocolSpec<G>, Error> {
        // One scalar variable, one leaf proving the linear relation.
        let x = builder.add_scalar_variable("x")?;
        builder.add_subprotocol(
            "schnorr",
            Arc::new(LinearStatementFragment::new(
                [(x, G::generator())],
                self.point,
            )),
        )?;
        Ok(builder.build())
    }

    fn provide_witnesses(
        &self,
        mut builder: ProverSpecBuilder<'_, G>,
    ) -> Result<ProverSpec<G>, Error> {
        if let Some(secret) = self.secret {
            builder.put_scalar_witness("x", secret)?;
        }
        builder.build()
    }
}

fn main() {
    let mut rng = OsRng;

    // The secret and the public statement.
    let x = Scalar::random(&mut rng);
    let point = G::generator() * x;

    // Interactive protocol: commit, challenge, respond, check.
    let protocol = SendThenDelegateProtocol::from_delegate(SchnorrStatement {
        point,
        secret: Some(x),
    });
    let (announcement, state) = protocol.prover_commit(&mut rng).unwrap();
    let challenge = protocol.random_challenge(&mut rng);
    let response = protocol.prover_response(state, &challenge).unwrap();
    let interactive_ok = protocol
        .verifier(&announcement, &challenge, &response)
        .is_ok();
    println!("interactive Schnorr proof verified: {interactive_ok}");

    // Non-interactive via Fiat-Shamir, in both encodings.
    let protocol = SendThenDelegateProtocol::from_delegate(SchnorrStatement {
        point,
        secret: Some(x),
    });
    let nizk: Nizk<_> = Nizk::new(b"schnorr-demo", protocol);
    let batchable = nizk.prove_batchable(&mut rng).unwrap();
    let compact = nizk.prove_compact(&mut rng).unwrap();
    println!(
        "batchable proof: {} bytes, verified: {}",
        batchable.len(),
        nizk.verify_batchable(&batchable).is_ok()
    );
    println!(
        "compact proof: {} bytes, verified: {}",
        compact.len(),
        nizk.verify_compact(&compact).is_ok()
    );
}
