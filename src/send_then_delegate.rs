//! The generic "send, then delegate" fragment.
//!
//! [`SendThenDelegateFragment`] turns a small strategy object into a full
//! [`SchnorrFragment`]: the strategy declares variables, wires child
//! fragments, and picks a send-first value; the orchestrator here does
//! everything else. Announcement and response generation walk the fragment
//! tree top-down with merged assignments, verification conjoins every
//! child's predicate bottom-up, and simulation replays the same walk with
//! uniformly sampled response values in place of witnesses.
//!
//! A strategy with an empty send-first value and no variables of its own
//! degenerates to pure aggregation of its children's checks; the delegate
//! specializations in [`crate::delegate`] rely on exactly that.

use std::collections::BTreeMap;

use group::prime::PrimeGroup;
use rand_core::CryptoRngCore;
use tracing::instrument;

use crate::errors::Error;
use crate::expression::BooleanExpression;
use crate::serialization::{read_element, read_scalar};
use crate::spec::{ProverSpec, ProverSpecBuilder, SubprotocolSpec, SubprotocolSpecBuilder};
use crate::traits::{AnnouncementSecret, CompositeSecret, SchnorrFragment};
use crate::transcript::{Announcement, Challenge, Response, SendFirstValue, Transcript};
use crate::variable::{VariableAssignment, VariableKind, VariableValue};

/// The implementor-supplied part of a [`SendThenDelegateFragment`].
///
/// A strategy owns the statement: it knows which variables to declare,
/// which subprotocols prove what, which send-first value to transmit, and
/// which extra consistency check (if any) the verifier should apply to that
/// value. It never touches randomness bookkeeping, recursion, or wire
/// formats.
pub trait SendThenDelegateStrategy<G: PrimeGroup> {
    /// Prover-side setup: choose a send-first value and bind a witness to
    /// every declared variable, through the given builder.
    fn provide_prover_spec(
        &self,
        builder: ProverSpecBuilder<'_, G>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<ProverSpec<G>, Error>;

    /// Reads a send-first value of this statement's shape from a cursor.
    ///
    /// The default accepts any well-formed encoding; override to reject
    /// shapes the statement never produces.
    fn restore_send_first_value(&self, data: &mut &[u8]) -> Result<SendFirstValue<G>, Error> {
        SendFirstValue::read(data)
    }

    /// Samples a send-first value with the distribution of a real proof,
    /// for use in simulated transcripts.
    fn simulate_send_first_value(
        &self,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<SendFirstValue<G>, Error>;

    /// Declares variables and registers child fragments for the given
    /// send-first value. Called on both sides; both must end up with the
    /// same spec for the same value.
    fn provide_subprotocol_spec(
        &self,
        send_first: &SendFirstValue<G>,
        builder: SubprotocolSpecBuilder<G>,
    ) -> Result<SubprotocolSpec<G>, Error>;

    /// A statement-specific predicate over the send-first value alone,
    /// conjoined with the children's checks during verification. This is
    /// the hook for consistency checks that are not variable-knowledge
    /// proofs. Defaults to accepting.
    fn provide_additional_check(
        &self,
        send_first: &SendFirstValue<G>,
    ) -> Result<BooleanExpression<G>, Error> {
        let _ = send_first;
        Ok(BooleanExpression::Holds(true))
    }
}

/// A fragment assembled from a [`SendThenDelegateStrategy`].
#[derive(Clone, Debug)]
pub struct SendThenDelegateFragment<S> {
    strategy: S,
}

impl<S> SendThenDelegateFragment<S> {
    /// Wraps a strategy into a fragment.
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    /// The underlying strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }
}

fn spec_for<G, S>(strategy: &S, send_first: &SendFirstValue<G>) -> Result<SubprotocolSpec<G>, Error>
where
    G: PrimeGroup,
    S: SendThenDelegateStrategy<G>,
{
    strategy.provide_subprotocol_spec(send_first, SubprotocolSpecBuilder::new())
}

/// Validates that `own` covers exactly the declared variables, each in its
/// declared domain, and wraps it into an assignment.
fn own_response_assignment<G: PrimeGroup>(
    spec: &SubprotocolSpec<G>,
    own: &BTreeMap<String, VariableValue<G>>,
) -> Result<VariableAssignment<G>, Error> {
    if own.len() != spec.num_variables() {
        return Err(Error::InvalidTranscript);
    }
    for (name, kind) in spec.variables() {
        match own.get(name) {
            Some(value) if value.kind() == kind => {}
            _ => return Err(Error::InvalidTranscript),
        }
    }
    Ok(VariableAssignment::from_map(own.clone()))
}

impl<G, S> SchnorrFragment<G> for SendThenDelegateFragment<S>
where
    G: PrimeGroup,
    S: SendThenDelegateStrategy<G>,
{
    #[instrument(level = "debug", skip_all)]
    fn generate_announcement_secret(
        &self,
        external_witnesses: &VariableAssignment<G>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<AnnouncementSecret<G>, Error> {
        let prover_spec = self
            .strategy
            .provide_prover_spec(ProverSpecBuilder::new(&self.strategy), rng)?;
        let merged_witnesses = prover_spec.witnesses().fallback_to(external_witnesses);

        let mut children = BTreeMap::new();
        for (name, fragment) in prover_spec.spec().subprotocols() {
            let secret = fragment.generate_announcement_secret(&merged_witnesses, rng)?;
            children.insert(name.to_string(), secret);
        }
        let randomness = prover_spec.spec().sample_values(rng);

        Ok(AnnouncementSecret::Composite(Box::new(CompositeSecret {
            prover_spec,
            randomness,
            children,
        })))
    }

    #[instrument(level = "debug", skip_all)]
    fn generate_announcement(
        &self,
        external_witnesses: &VariableAssignment<G>,
        secret: &AnnouncementSecret<G>,
        external_random: &VariableAssignment<G>,
    ) -> Result<Announcement<G>, Error> {
        let AnnouncementSecret::Composite(secret) = secret else {
            return Err(Error::InvalidTranscript);
        };
        let merged_witnesses = secret.prover_spec.witnesses().fallback_to(external_witnesses);
        let merged_random =
            VariableAssignment::from_map(secret.randomness.clone()).fallback_to(external_random);

        let mut children = BTreeMap::new();
        for (name, fragment) in secret.prover_spec.spec().subprotocols() {
            let child_secret = secret.children.get(name).ok_or(Error::InvalidTranscript)?;
            let announcement =
                fragment.generate_announcement(&merged_witnesses, child_secret, &merged_random)?;
            children.insert(name.to_string(), announcement);
        }

        Ok(Announcement::Composite {
            send_first: secret.prover_spec.send_first().clone(),
            children,
        })
    }

    #[instrument(level = "debug", skip_all)]
    fn generate_response(
        &self,
        external_witnesses: &VariableAssignment<G>,
        secret: AnnouncementSecret<G>,
        challenge: &Challenge<G>,
    ) -> Result<Response<G>, Error> {
        let AnnouncementSecret::Composite(secret) = secret else {
            return Err(Error::InvalidTranscript);
        };
        let CompositeSecret {
            prover_spec,
            randomness,
            mut children,
        } = *secret;
        let merged_witnesses = prover_spec.witnesses().fallback_to(external_witnesses);

        let mut own = BTreeMap::new();
        for (name, _) in prover_spec.spec().variables() {
            let witness = prover_spec
                .witnesses()
                .get(name)
                .ok_or_else(|| Error::UnassignedVariable { name: name.into() })?;
            let randomness = randomness
                .get(name)
                .ok_or_else(|| Error::UnassignedVariable { name: name.into() })?;
            let response = witness
                .eval_linear(challenge, randomness)
                .ok_or_else(|| Error::DomainMismatch { name: name.into() })?;
            own.insert(name.to_string(), response);
        }

        let mut child_responses = BTreeMap::new();
        for (name, fragment) in prover_spec.spec().subprotocols() {
            let child_secret = children.remove(name).ok_or(Error::InvalidTranscript)?;
            let response =
                fragment.generate_response(&merged_witnesses, child_secret, challenge)?;
            child_responses.insert(name.to_string(), response);
        }

        Ok(Response::Composite {
            own,
            children: child_responses,
        })
    }

    #[instrument(level = "debug", skip_all)]
    fn check_transcript(
        &self,
        announcement: &Announcement<G>,
        challenge: &Challenge<G>,
        response: &Response<G>,
        external_response: &VariableAssignment<G>,
    ) -> Result<BooleanExpression<G>, Error> {
        let Announcement::Composite {
            send_first,
            children: child_announcements,
        } = announcement
        else {
            return Err(Error::InvalidTranscript);
        };
        let Response::Composite {
            own,
            children: child_responses,
        } = response
        else {
            return Err(Error::InvalidTranscript);
        };

        let spec = spec_for(&self.strategy, send_first)?;
        if child_announcements.len() != spec.num_subprotocols()
            || child_responses.len() != spec.num_subprotocols()
        {
            return Err(Error::InvalidTranscript);
        }
        let merged_response =
            own_response_assignment(&spec, own)?.fallback_to(external_response);

        let mut checks = Vec::with_capacity(spec.num_subprotocols() + 1);
        for (name, fragment) in spec.subprotocols() {
            let child_announcement = child_announcements
                .get(name)
                .ok_or(Error::InvalidTranscript)?;
            let child_response = child_responses.get(name).ok_or(Error::InvalidTranscript)?;
            checks.push(fragment.check_transcript(
                child_announcement,
                challenge,
                child_response,
                &merged_response,
            )?);
        }
        checks.push(self.strategy.provide_additional_check(send_first)?);

        Ok(BooleanExpression::All(checks))
    }

    #[instrument(level = "debug", skip_all)]
    fn generate_simulated_transcript(
        &self,
        challenge: &Challenge<G>,
        external_random_response: &VariableAssignment<G>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<Transcript<G>, Error> {
        let send_first = self.strategy.simulate_send_first_value(rng)?;
        let spec = spec_for(&self.strategy, &send_first)?;

        // Response values are drawn uniformly instead of via witnesses;
        // this is what makes the simulated distribution match the real one.
        let own = spec.sample_values(rng);
        let merged_response =
            VariableAssignment::from_map(own.clone()).fallback_to(external_random_response);

        let mut child_announcements = BTreeMap::new();
        let mut child_responses = BTreeMap::new();
        for (name, fragment) in spec.subprotocols() {
            let transcript =
                fragment.generate_simulated_transcript(challenge, &merged_response, rng)?;
            child_announcements.insert(name.to_string(), transcript.announcement);
            child_responses.insert(name.to_string(), transcript.response);
        }

        Ok(Transcript {
            announcement: Announcement::Composite {
                send_first,
                children: child_announcements,
            },
            challenge: *challenge,
            response: Response::Composite {
                own,
                children: child_responses,
            },
        })
    }

    fn compress_transcript(&self, transcript: &Transcript<G>) -> Result<Vec<u8>, Error> {
        let Announcement::Composite {
            send_first,
            children: child_announcements,
        } = &transcript.announcement
        else {
            return Err(Error::InvalidTranscript);
        };
        let Response::Composite {
            own,
            children: child_responses,
        } = &transcript.response
        else {
            return Err(Error::InvalidTranscript);
        };
        let spec = spec_for(&self.strategy, send_first)?;

        // The send-first value and the variable responses are not
        // re-derivable; everything a child can reconstruct is dropped by
        // the child's own compression.
        let mut out = Vec::new();
        send_first.serialize_into(&mut out);
        for (name, kind) in spec.variables() {
            let value = own.get(name).ok_or(Error::InvalidTranscript)?;
            match (kind, value) {
                (VariableKind::Scalar, VariableValue::Scalar(s)) => {
                    crate::serialization::write_scalars([s], &mut out)
                }
                (VariableKind::Element, VariableValue::Element(e)) => {
                    crate::serialization::write_elements([e], &mut out)
                }
                _ => return Err(Error::InvalidTranscript),
            }
        }
        for (name, fragment) in spec.subprotocols() {
            let child = Transcript {
                announcement: child_announcements
                    .get(name)
                    .ok_or(Error::InvalidTranscript)?
                    .clone(),
                challenge: transcript.challenge,
                response: child_responses
                    .get(name)
                    .ok_or(Error::InvalidTranscript)?
                    .clone(),
            };
            out.extend(fragment.compress_transcript(&child)?);
        }
        Ok(out)
    }

    fn decompress_transcript(
        &self,
        data: &mut &[u8],
        challenge: &Challenge<G>,
        external_response: &VariableAssignment<G>,
    ) -> Result<Transcript<G>, Error> {
        let send_first = self.strategy.restore_send_first_value(data)?;
        let spec = spec_for(&self.strategy, &send_first)?;

        let mut own = BTreeMap::new();
        for (name, kind) in spec.variables() {
            let value = match kind {
                VariableKind::Scalar => read_scalar::<G::Scalar>(data)
                    .map(VariableValue::Scalar)
                    .ok_or(Error::InvalidTranscript)?,
                VariableKind::Element => read_element::<G>(data)
                    .map(VariableValue::Element)
                    .ok_or(Error::InvalidTranscript)?,
            };
            own.insert(name.to_string(), value);
        }
        let merged_response =
            VariableAssignment::from_map(own.clone()).fallback_to(external_response);

        let mut child_announcements = BTreeMap::new();
        let mut child_responses = BTreeMap::new();
        for (name, fragment) in spec.subprotocols() {
            let child = fragment.decompress_transcript(data, challenge, &merged_response)?;
            child_announcements.insert(name.to_string(), child.announcement);
            child_responses.insert(name.to_string(), child.response);
        }

        let announcement = Announcement::Composite {
            send_first,
            children: child_announcements,
        };
        let response = Response::Composite {
            own,
            children: child_responses,
        };
        let check = self.check_transcript(&announcement, challenge, &response, external_response)?;
        if !check.evaluate() {
            return Err(Error::InvalidTranscript);
        }
        Ok(Transcript {
            announcement,
            challenge: *challenge,
            response,
        })
    }

    fn deserialize_announcement(&self, data: &mut &[u8]) -> Result<Announcement<G>, Error> {
        let send_first = self.strategy.restore_send_first_value(data)?;
        let spec = spec_for(&self.strategy, &send_first)?;
        let mut children = BTreeMap::new();
        for (name, fragment) in spec.subprotocols() {
            children.insert(name.to_string(), fragment.deserialize_announcement(data)?);
        }
        Ok(Announcement::Composite {
            send_first,
            children,
        })
    }

    fn deserialize_response(
        &self,
        announcement: &Announcement<G>,
        data: &mut &[u8],
    ) -> Result<Response<G>, Error> {
        let Announcement::Composite {
            send_first,
            children: child_announcements,
        } = announcement
        else {
            return Err(Error::InvalidTranscript);
        };
        let spec = spec_for(&self.strategy, send_first)?;

        let mut own = BTreeMap::new();
        for (name, kind) in spec.variables() {
            let value = match kind {
                VariableKind::Scalar => read_scalar::<G::Scalar>(data)
                    .map(VariableValue::Scalar)
                    .ok_or(Error::InvalidTranscript)?,
                VariableKind::Element => read_element::<G>(data)
                    .map(VariableValue::Element)
                    .ok_or(Error::InvalidTranscript)?,
            };
            own.insert(name.to_string(), value);
        }

        let mut children = BTreeMap::new();
        for (name, fragment) in spec.subprotocols() {
            let child_announcement = child_announcements
                .get(name)
                .ok_or(Error::InvalidTranscript)?;
            children.insert(
                name.to_string(),
                fragment.deserialize_response(child_announcement, data)?,
            );
        }
        Ok(Response::Composite { own, children })
    }
}
