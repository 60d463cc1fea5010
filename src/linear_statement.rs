//! Leaf fragment for linear statements over group elements.
//!
//! [`LinearStatementFragment`] proves that a linear combination of
//! externally declared scalar variables over fixed public bases hits a
//! public target, `x_1 * B_1 + ... + x_n * B_n = T`. It declares no
//! variables of its own, keeps no announcement secret, and sends an empty
//! response; every value it needs arrives through the external assignments.
//! This is the base case that terminates the recursion of composite
//! fragments.

use group::prime::PrimeGroup;
use rand_core::CryptoRngCore;

use crate::errors::Error;
use crate::expression::BooleanExpression;
use crate::serialization::read_element;
use crate::traits::{AnnouncementSecret, SchnorrFragment};
use crate::transcript::{Announcement, Challenge, Response, Transcript};
use crate::variable::{ScalarVar, VariableAssignment};

/// One `variable * base` term of a linear statement.
#[derive(Clone, Debug)]
pub struct StatementTerm<G: PrimeGroup> {
    scalar: ScalarVar,
    base: G,
}

impl<G: PrimeGroup> StatementTerm<G> {
    /// The referenced scalar variable.
    pub fn scalar(&self) -> &ScalarVar {
        &self.scalar
    }

    /// The fixed public base.
    pub fn base(&self) -> G {
        self.base
    }
}

impl<G: PrimeGroup> From<(ScalarVar, G)> for StatementTerm<G> {
    fn from((scalar, base): (ScalarVar, G)) -> Self {
        Self { scalar, base }
    }
}

/// Proves `homomorphic_part(vars) = target` for externally declared scalar
/// variables.
#[derive(Clone, Debug)]
pub struct LinearStatementFragment<G: PrimeGroup> {
    terms: Vec<StatementTerm<G>>,
    target: G,
}

impl<G: PrimeGroup> LinearStatementFragment<G> {
    /// Builds the statement `sum(terms) = target`.
    pub fn new<T: Into<StatementTerm<G>>>(
        terms: impl IntoIterator<Item = T>,
        target: G,
    ) -> Self {
        Self {
            terms: terms.into_iter().map(|t| t.into()).collect(),
            target,
        }
    }

    /// The public target element.
    pub fn target(&self) -> G {
        self.target
    }

    /// Evaluates the linear combination at the given assignment.
    fn homomorphic_part(&self, assignment: &VariableAssignment<G>) -> Result<G, Error> {
        let mut acc = G::identity();
        for term in &self.terms {
            acc += term.base * assignment.scalar(&term.scalar)?;
        }
        Ok(acc)
    }
}

impl<G: PrimeGroup> SchnorrFragment<G> for LinearStatementFragment<G> {
    fn generate_announcement_secret(
        &self,
        _external_witnesses: &VariableAssignment<G>,
        _rng: &mut dyn CryptoRngCore,
    ) -> Result<AnnouncementSecret<G>, Error> {
        Ok(AnnouncementSecret::Empty)
    }

    fn generate_announcement(
        &self,
        _external_witnesses: &VariableAssignment<G>,
        _secret: &AnnouncementSecret<G>,
        external_random: &VariableAssignment<G>,
    ) -> Result<Announcement<G>, Error> {
        Ok(Announcement::Element(
            self.homomorphic_part(external_random)?,
        ))
    }

    fn generate_response(
        &self,
        _external_witnesses: &VariableAssignment<G>,
        _secret: AnnouncementSecret<G>,
        _challenge: &Challenge<G>,
    ) -> Result<Response<G>, Error> {
        Ok(Response::Empty)
    }

    fn check_transcript(
        &self,
        announcement: &Announcement<G>,
        challenge: &Challenge<G>,
        response: &Response<G>,
        external_response: &VariableAssignment<G>,
    ) -> Result<BooleanExpression<G>, Error> {
        let Announcement::Element(announced) = announcement else {
            return Err(Error::InvalidTranscript);
        };
        if !matches!(response, Response::Empty) {
            return Err(Error::InvalidTranscript);
        }
        // homomorphic_part(response) = announcement + challenge * target
        Ok(BooleanExpression::ElementsEqual {
            lhs: self.homomorphic_part(external_response)?,
            rhs: *announced + self.target * *challenge,
        })
    }

    fn generate_simulated_transcript(
        &self,
        challenge: &Challenge<G>,
        external_random_response: &VariableAssignment<G>,
        _rng: &mut dyn CryptoRngCore,
    ) -> Result<Transcript<G>, Error> {
        // Solve the verification equation backward for the announcement.
        let announced =
            self.homomorphic_part(external_random_response)? - self.target * *challenge;
        Ok(Transcript {
            announcement: Announcement::Element(announced),
            challenge: *challenge,
            response: Response::Empty,
        })
    }

    fn compress_transcript(&self, transcript: &Transcript<G>) -> Result<Vec<u8>, Error> {
        if !matches!(transcript.announcement, Announcement::Element(_)) {
            return Err(Error::InvalidTranscript);
        }
        // The announcement is fully determined by the external responses,
        // the challenge, and the statement; nothing needs to travel.
        Ok(Vec::new())
    }

    fn decompress_transcript(
        &self,
        _data: &mut &[u8],
        challenge: &Challenge<G>,
        external_response: &VariableAssignment<G>,
    ) -> Result<Transcript<G>, Error> {
        let announced = self.homomorphic_part(external_response)? - self.target * *challenge;
        Ok(Transcript {
            announcement: Announcement::Element(announced),
            challenge: *challenge,
            response: Response::Empty,
        })
    }

    fn deserialize_announcement(&self, data: &mut &[u8]) -> Result<Announcement<G>, Error> {
        read_element::<G>(data)
            .map(Announcement::Element)
            .ok_or(Error::InvalidTranscript)
    }

    fn deserialize_response(
        &self,
        _announcement: &Announcement<G>,
        _data: &mut &[u8],
    ) -> Result<Response<G>, Error> {
        Ok(Response::Empty)
    }
}
