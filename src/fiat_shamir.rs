//! Fiat-Shamir transformation for fragment-based protocols.
//!
//! [`Nizk`] wraps a [`SendThenDelegateProtocol`] and a [`Codec`] to produce
//! non-interactive proofs: the challenge is derived by hashing the
//! serialized announcement under a session-specific domain separator.
//!
//! Two proof encodings are supported:
//! - *batchable*: announcement followed by response, verified by re-deriving
//!   the challenge from the announcement bytes;
//! - *compact*: challenge followed by the compressed transcript, verified by
//!   decompressing (which re-derives the dropped announcement parts and
//!   checks the transcript) and comparing the re-derived challenge.

use core::marker::PhantomData;

use group::prime::PrimeGroup;
use rand_core::CryptoRngCore;
use tracing::instrument;

use crate::codec::{Codec, ShakeCodec};
use crate::errors::Error;
use crate::protocol::SendThenDelegateProtocol;
use crate::serialization::{read_scalar, serialize_scalars};
use crate::transcript::{Challenge, Transcript};

/// A non-interactive proof wrapper around a standalone protocol.
pub struct Nizk<G, C = ShakeCodec<G>>
where
    G: PrimeGroup,
    C: Codec<Challenge = Challenge<G>>,
{
    session_id: Vec<u8>,
    protocol: SendThenDelegateProtocol<G>,
    _marker: PhantomData<C>,
}

impl<G, C> Nizk<G, C>
where
    G: PrimeGroup,
    C: Codec<Challenge = Challenge<G>>,
{
    /// Wraps a protocol under the given session identifier.
    ///
    /// The identifier separates proof domains: a proof produced under one
    /// session identifier never verifies under another.
    pub fn new(session_identifier: &[u8], protocol: SendThenDelegateProtocol<G>) -> Self {
        Self {
            session_id: session_identifier.to_vec(),
            protocol,
            _marker: PhantomData,
        }
    }

    /// The wrapped interactive protocol.
    pub fn protocol(&self) -> &SendThenDelegateProtocol<G> {
        &self.protocol
    }

    fn derive_challenge(&self, announcement_bytes: &[u8]) -> Challenge<G> {
        let mut codec = C::new(&self.session_id);
        codec.prover_message(announcement_bytes);
        codec.verifier_challenge()
    }

    /// Generates a batchable proof: announcement followed by response.
    #[instrument(level = "debug", skip_all)]
    pub fn prove_batchable(&self, rng: &mut dyn CryptoRngCore) -> Result<Vec<u8>, Error> {
        let (announcement, state) = self.protocol.prover_commit(rng)?;
        let announcement_bytes = announcement.serialize();
        let challenge = self.derive_challenge(&announcement_bytes);
        let response = self.protocol.prover_response(state, &challenge)?;

        let mut proof = announcement_bytes;
        response.serialize_into(&mut proof);
        Ok(proof)
    }

    /// Verifies a batchable proof.
    #[instrument(level = "debug", skip_all)]
    pub fn verify_batchable(&self, proof: &[u8]) -> Result<(), Error> {
        let mut cursor = proof;
        let announcement = self.protocol.deserialize_announcement(&mut cursor)?;
        let announcement_len = proof.len() - cursor.len();
        let challenge = self.derive_challenge(&proof[..announcement_len]);
        let response = self.protocol.deserialize_response(&announcement, &mut cursor)?;
        if !cursor.is_empty() {
            return Err(Error::InvalidTranscript);
        }
        self.protocol.verifier(&announcement, &challenge, &response)
    }

    /// Generates a compact proof: challenge followed by the compressed
    /// transcript.
    #[instrument(level = "debug", skip_all)]
    pub fn prove_compact(&self, rng: &mut dyn CryptoRngCore) -> Result<Vec<u8>, Error> {
        let (announcement, state) = self.protocol.prover_commit(rng)?;
        let announcement_bytes = announcement.serialize();
        let challenge = self.derive_challenge(&announcement_bytes);
        let response = self.protocol.prover_response(state, &challenge)?;

        let transcript = Transcript {
            announcement,
            challenge,
            response,
        };
        let mut proof = serialize_scalars([&challenge]);
        proof.extend(self.protocol.compress_transcript(&transcript)?);
        Ok(proof)
    }

    /// Verifies a compact proof.
    #[instrument(level = "debug", skip_all)]
    pub fn verify_compact(&self, proof: &[u8]) -> Result<(), Error> {
        let mut cursor = proof;
        let challenge: Challenge<G> =
            read_scalar(&mut cursor).ok_or(Error::InvalidTranscript)?;
        let transcript = self.protocol.decompress_transcript(&mut cursor, &challenge)?;
        if !cursor.is_empty() {
            return Err(Error::InvalidTranscript);
        }
        // Decompression already checked the transcript equations; binding
        // to the announcement happens through the re-derived challenge.
        let derived = self.derive_challenge(&transcript.announcement.serialize());
        if derived != challenge {
            return Err(Error::VerificationFailure);
        }
        Ok(())
    }
}
