//! Top-level protocol adapter.
//!
//! [`SendThenDelegateProtocol`] converts a fragment with no external
//! variable references into a standalone three-move Sigma protocol. The
//! supplied fragment is wrapped into a singleton top-level fragment (one
//! subprotocol, no variables) and every operation forwards with empty
//! external assignments, which is exactly what "no external references"
//! means at the root. The adapter also describes the challenge space a
//! verifier draws from.

use std::sync::Arc;

use ff::Field;
use group::prime::PrimeGroup;
use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use tracing::instrument;

use crate::codec::cardinal;
use crate::delegate::DelegateStrategy;
use crate::errors::Error;
use crate::send_then_delegate::{SendThenDelegateFragment, SendThenDelegateStrategy};
use crate::spec::{ProverSpec, ProverSpecBuilder, SubprotocolSpec, SubprotocolSpecBuilder};
use crate::traits::{AnnouncementSecret, SchnorrFragment};
use crate::transcript::{Announcement, Challenge, Response, SendFirstValue, Transcript};
use crate::variable::VariableAssignment;

/// Name under which the wrapped fragment is registered in the top-level
/// spec. Fixed, so both parties agree on the wire layout.
const TOP_LEVEL_NAME: &str = "protocol";

/// The singleton top-level strategy: no variables, no first message, one
/// child.
struct TopLevel<G: PrimeGroup> {
    fragment: Arc<dyn SchnorrFragment<G>>,
}

impl<G: PrimeGroup> SendThenDelegateStrategy<G> for TopLevel<G> {
    fn provide_prover_spec(
        &self,
        mut builder: ProverSpecBuilder<'_, G>,
        _rng: &mut dyn CryptoRngCore,
    ) -> Result<ProverSpec<G>, Error> {
        builder.set_send_first_value(SendFirstValue::Empty)?;
        builder.build()
    }

    fn simulate_send_first_value(
        &self,
        _rng: &mut dyn CryptoRngCore,
    ) -> Result<SendFirstValue<G>, Error> {
        Ok(SendFirstValue::Empty)
    }

    fn provide_subprotocol_spec(
        &self,
        send_first: &SendFirstValue<G>,
        mut builder: SubprotocolSpecBuilder<G>,
    ) -> Result<SubprotocolSpec<G>, Error> {
        if !send_first.is_empty() {
            return Err(Error::InvalidTranscript);
        }
        builder.add_subprotocol(TOP_LEVEL_NAME, Arc::clone(&self.fragment))?;
        Ok(builder.build())
    }
}

/// Description of the set challenges are drawn from: the full scalar field
/// of the group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChallengeSpace {
    size: BigUint,
}

impl ChallengeSpace {
    /// The challenge space of the given group's scalar field.
    pub fn of<G: PrimeGroup>() -> Self {
        Self {
            size: cardinal::<<G as group::Group>::Scalar>(),
        }
    }

    /// Number of admissible challenges.
    pub fn size(&self) -> &BigUint {
        &self.size
    }

    /// Bit length of the challenge space.
    pub fn bits(&self) -> u64 {
        self.size.bits()
    }
}

/// A standalone Sigma protocol over a single fragment.
pub struct SendThenDelegateProtocol<G: PrimeGroup> {
    fragment: SendThenDelegateFragment<TopLevel<G>>,
}

impl<G: PrimeGroup> SendThenDelegateProtocol<G> {
    /// Wraps a fragment that references no external variables.
    ///
    /// External references are not checked up front; a fragment that does
    /// reference ancestors will fail with
    /// [`Error::UnassignedVariable`] as soon as the dangling reference is
    /// evaluated.
    pub fn new(fragment: Arc<dyn SchnorrFragment<G>>) -> Self {
        Self {
            fragment: SendThenDelegateFragment::new(TopLevel { fragment }),
        }
    }

    /// Builds the protocol directly over a delegate strategy.
    pub fn from_delegate<S>(strategy: S) -> Self
    where
        S: DelegateStrategy<G> + 'static,
        G: 'static,
    {
        Self::new(Arc::new(crate::delegate::DelegateFragment::from_delegate(
            strategy,
        )))
    }

    /// Prover's first move: announcement plus the state needed to answer
    /// the challenge.
    #[instrument(level = "debug", skip_all)]
    pub fn prover_commit(
        &self,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<(Announcement<G>, AnnouncementSecret<G>), Error> {
        let empty = VariableAssignment::empty();
        let secret = self.fragment.generate_announcement_secret(&empty, rng)?;
        let announcement = self.fragment.generate_announcement(&empty, &secret, &empty)?;
        Ok((announcement, secret))
    }

    /// Prover's answer to a challenge. Consumes the commit state.
    #[instrument(level = "debug", skip_all)]
    pub fn prover_response(
        &self,
        secret: AnnouncementSecret<G>,
        challenge: &Challenge<G>,
    ) -> Result<Response<G>, Error> {
        let empty = VariableAssignment::empty();
        self.fragment.generate_response(&empty, secret, challenge)
    }

    /// Checks a full transcript.
    #[instrument(level = "debug", skip_all)]
    pub fn verifier(
        &self,
        announcement: &Announcement<G>,
        challenge: &Challenge<G>,
        response: &Response<G>,
    ) -> Result<(), Error> {
        let empty = VariableAssignment::empty();
        let check = self
            .fragment
            .check_transcript(announcement, challenge, response, &empty)?;
        if check.evaluate() {
            Ok(())
        } else {
            Err(Error::VerificationFailure)
        }
    }

    /// Produces a witness-free transcript for the given challenge, with the
    /// distribution of an honest execution.
    pub fn simulate_transcript(
        &self,
        challenge: &Challenge<G>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<Transcript<G>, Error> {
        let empty = VariableAssignment::empty();
        self.fragment
            .generate_simulated_transcript(challenge, &empty, rng)
    }

    /// Serializes a transcript into its compact form.
    pub fn compress_transcript(&self, transcript: &Transcript<G>) -> Result<Vec<u8>, Error> {
        self.fragment.compress_transcript(transcript)
    }

    /// Reconstructs and checks a transcript from its compact form.
    pub fn decompress_transcript(
        &self,
        data: &mut &[u8],
        challenge: &Challenge<G>,
    ) -> Result<Transcript<G>, Error> {
        let empty = VariableAssignment::empty();
        self.fragment.decompress_transcript(data, challenge, &empty)
    }

    /// Reads an announcement of this protocol's shape from a cursor.
    pub fn deserialize_announcement(&self, data: &mut &[u8]) -> Result<Announcement<G>, Error> {
        self.fragment.deserialize_announcement(data)
    }

    /// Reads a response of this protocol's shape from a cursor.
    pub fn deserialize_response(
        &self,
        announcement: &Announcement<G>,
        data: &mut &[u8],
    ) -> Result<Response<G>, Error> {
        self.fragment.deserialize_response(announcement, data)
    }

    /// The space a verifier draws challenges from.
    pub fn challenge_space(&self) -> ChallengeSpace {
        ChallengeSpace::of::<G>()
    }

    /// Draws a uniform challenge.
    pub fn random_challenge(&self, rng: &mut dyn CryptoRngCore) -> Challenge<G> {
        <G as group::Group>::Scalar::random(rng)
    }
}

/// A standalone protocol whose top fragment is delegate-only. Alias kept
/// for call sites that never use a send-first value anywhere in the tree.
pub type DelegateProtocol<G> = SendThenDelegateProtocol<G>;
