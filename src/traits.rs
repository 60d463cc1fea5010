//! Generic interface for composable Schnorr-style proof fragments.
//!
//! This module defines the [`SchnorrFragment`] trait, the uniform contract
//! every proof component implements. A fragment proves one piece of an
//! algebraic statement and may reference variables declared by an ancestor
//! fragment; those external variables arrive through the assignment
//! parameters of each operation.
//!
//! ## Minimal implementation
//! Types implementing [`SchnorrFragment`] must define:
//! - `generate_announcement_secret` — Prover-side setup and randomness.
//! - `generate_announcement` — The committed first message.
//! - `generate_response` — The reply to a challenge.
//! - `check_transcript` — A deferred verification predicate.
//! - `generate_simulated_transcript` — Witness-free transcripts for a fixed
//!   challenge.
//!
//! ## Serialization
//! Fragments also own the wire shape of their messages: serialization lives
//! on the message types themselves, while `deserialize_announcement` and
//! `deserialize_response` are fragment methods because only the fragment
//! knows the arity of its message lists. Compression
//! (`compress_transcript` / `decompress_transcript`) drops every
//! announcement part that is re-derivable from the response, the challenge,
//! and the public statement.
//!
//! All operations are pure functions of their explicit inputs; the only
//! side effect anywhere is drawing from the caller-supplied RNG.

use std::collections::BTreeMap;

use group::prime::PrimeGroup;
use rand_core::CryptoRngCore;

use crate::errors::Error;
use crate::expression::BooleanExpression;
use crate::spec::ProverSpec;
use crate::transcript::{Announcement, Challenge, Response, Transcript};
use crate::variable::{VariableAssignment, VariableValue};

/// Prover-side state produced before the first message and consumed by the
/// response.
///
/// A composite fragment's secret carries the prover spec it committed to,
/// one uniformly sampled value per declared variable, and the secret of
/// every child. Leaves that keep no state use [`AnnouncementSecret::Empty`].
#[derive(Clone)]
pub enum AnnouncementSecret<G: PrimeGroup> {
    /// No prover-side state.
    Empty,
    /// State of a composite fragment.
    Composite(Box<CompositeSecret<G>>),
}

/// The announcement secret of a composite fragment.
#[derive(Clone)]
pub struct CompositeSecret<G: PrimeGroup> {
    /// The send-first value, frozen spec, and witnesses chosen for this proof.
    pub prover_spec: ProverSpec<G>,
    /// One uniform draw per declared variable, made exactly once.
    pub randomness: BTreeMap<String, VariableValue<G>>,
    /// Each child's own announcement secret.
    pub children: BTreeMap<String, AnnouncementSecret<G>>,
}

/// A composable piece of a Sigma protocol.
///
/// The `external_*` parameters carry values for variables owned by ancestor
/// fragments: witnesses during announcement generation, announcement
/// randomness during the first message, and response values during
/// verification. A fragment with no external references ignores them.
pub trait SchnorrFragment<G: PrimeGroup> {
    /// Prover-side setup. Samples this fragment's per-variable randomness
    /// and recursively prepares every child. Must be called before any
    /// randomness is fixed elsewhere; the draws made here are never
    /// repeated.
    fn generate_announcement_secret(
        &self,
        external_witnesses: &VariableAssignment<G>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<AnnouncementSecret<G>, Error>;

    /// The committed first message. Deterministic given its inputs.
    fn generate_announcement(
        &self,
        external_witnesses: &VariableAssignment<G>,
        secret: &AnnouncementSecret<G>,
        external_random: &VariableAssignment<G>,
    ) -> Result<Announcement<G>, Error>;

    /// The reply to a challenge. Consumes the secret so a fragment's
    /// randomness can never answer two different challenges through this
    /// API by accident.
    fn generate_response(
        &self,
        external_witnesses: &VariableAssignment<G>,
        secret: AnnouncementSecret<G>,
        challenge: &Challenge<G>,
    ) -> Result<Response<G>, Error>;

    /// Builds the verification predicate for a transcript without forcing
    /// it, so parents can conjoin the predicates of many children.
    ///
    /// Malformed inputs (wrong message shape, missing variables) surface as
    /// errors; a well-formed but invalid transcript yields an expression
    /// that evaluates to `false`.
    fn check_transcript(
        &self,
        announcement: &Announcement<G>,
        challenge: &Challenge<G>,
        response: &Response<G>,
        external_response: &VariableAssignment<G>,
    ) -> Result<BooleanExpression<G>, Error>;

    /// Produces a transcript for the given challenge with the same
    /// distribution as a real execution, without any witness.
    fn generate_simulated_transcript(
        &self,
        challenge: &Challenge<G>,
        external_random_response: &VariableAssignment<G>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<Transcript<G>, Error>;

    /// Serializes a transcript, dropping every announcement part that
    /// `decompress_transcript` can re-derive.
    fn compress_transcript(&self, transcript: &Transcript<G>) -> Result<Vec<u8>, Error>;

    /// Reconstructs a transcript from its compressed form, re-deriving the
    /// dropped announcement parts.
    ///
    /// Fails with [`Error::InvalidTranscript`] if the reconstruction does
    /// not satisfy [`SchnorrFragment::check_transcript`], so a caller never
    /// observes an unchecked decompressed transcript.
    fn decompress_transcript(
        &self,
        data: &mut &[u8],
        challenge: &Challenge<G>,
        external_response: &VariableAssignment<G>,
    ) -> Result<Transcript<G>, Error>;

    /// Reads an announcement of this fragment's shape from a cursor.
    fn deserialize_announcement(&self, data: &mut &[u8]) -> Result<Announcement<G>, Error>;

    /// Reads a response of this fragment's shape from a cursor. The
    /// announcement is needed because the response shape can depend on the
    /// send-first value inside it.
    fn deserialize_response(
        &self,
        announcement: &Announcement<G>,
        data: &mut &[u8],
    ) -> Result<Response<G>, Error>;
}
