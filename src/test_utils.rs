//! Reusable statements used in tests for this crate.
//!
//! Each constructor returns a strategy proving a familiar relation; the
//! verifier side builds the same strategy with `witness: None`, which makes
//! prover-side operations fail witness binding while verification works
//! from public data alone.

use std::sync::Arc;

use group::prime::PrimeGroup;
use rand_core::CryptoRngCore;

use crate::delegate::DelegateStrategy;
use crate::errors::{Error, SpecBuildError};
use crate::expression::BooleanExpression;
use crate::linear_statement::LinearStatementFragment;
use crate::send_then_delegate::SendThenDelegateStrategy;
use crate::spec::{ProverSpec, ProverSpecBuilder, SubprotocolSpec, SubprotocolSpecBuilder};
use crate::transcript::SendFirstValue;

/// Knowledge of `x` with `x * base = target`.
#[derive(Clone, Debug)]
pub struct DlogKnowledge<G: PrimeGroup> {
    /// The public base.
    pub base: G,
    /// The public image.
    pub target: G,
    /// The discrete logarithm, absent on the verifier side.
    pub witness: Option<<G as group::Group>::Scalar>,
}

impl<G: PrimeGroup> DelegateStrategy<G> for DlogKnowledge<G> {
    fn provide_subprotocol_spec(
        &self,
        mut builder: SubprotocolSpecBuilder<G>,
    ) -> Result<SubprotocolSpec<G>, Error> {
        let x = builder.add_scalar_variable("x")?;
        builder.add_subprotocol(
            "dlog",
            Arc::new(LinearStatementFragment::new([(x, self.base)], self.target)),
        )?;
        Ok(builder.build())
    }

    fn provide_witnesses(
        &self,
        mut builder: ProverSpecBuilder<'_, G>,
    ) -> Result<ProverSpec<G>, Error> {
        if let Some(x) = self.witness {
            builder.put_scalar_witness("x", x)?;
        }
        builder.build()
    }
}

/// Knowledge of an opening `(m, r)` of a Pedersen commitment
/// `m * h + r * g = commitment`.
#[derive(Clone, Debug)]
pub struct PedersenOpening<G: PrimeGroup> {
    /// Message base.
    pub h: G,
    /// Blinding base.
    pub g: G,
    /// The public commitment.
    pub commitment: G,
    /// The opening, absent on the verifier side.
    pub witness: Option<(<G as group::Group>::Scalar, <G as group::Group>::Scalar)>,
}

impl<G: PrimeGroup> DelegateStrategy<G> for PedersenOpening<G> {
    fn provide_subprotocol_spec(
        &self,
        mut builder: SubprotocolSpecBuilder<G>,
    ) -> Result<SubprotocolSpec<G>, Error> {
        let m = builder.add_scalar_variable("m")?;
        let r = builder.add_scalar_variable("r")?;
        builder.add_subprotocol(
            "opening",
            Arc::new(LinearStatementFragment::new(
                [(m, self.h), (r, self.g)],
                self.commitment,
            )),
        )?;
        Ok(builder.build())
    }

    fn provide_witnesses(
        &self,
        mut builder: ProverSpecBuilder<'_, G>,
    ) -> Result<ProverSpec<G>, Error> {
        if let Some((m, r)) = self.witness {
            builder.put_scalar_witness("m", m)?;
            builder.put_scalar_witness("r", r)?;
        }
        builder.build()
    }
}

/// Aggregation-only inner fragment referencing a variable declared by an
/// ancestor: proves `x * base = target` for the externally declared `x`.
#[derive(Clone, Debug)]
pub struct InnerDlog<G: PrimeGroup> {
    /// The public base.
    pub base: G,
    /// The public image.
    pub target: G,
}

impl<G: PrimeGroup> DelegateStrategy<G> for InnerDlog<G> {
    fn provide_subprotocol_spec(
        &self,
        mut builder: SubprotocolSpecBuilder<G>,
    ) -> Result<SubprotocolSpec<G>, Error> {
        // No own variables; the leaf references the ancestor's "x".
        builder.add_subprotocol(
            "dlog",
            Arc::new(LinearStatementFragment::new(
                [(crate::variable::ScalarVar::external("x"), self.base)],
                self.target,
            )),
        )?;
        Ok(builder.build())
    }

    fn provide_witnesses(
        &self,
        builder: ProverSpecBuilder<'_, G>,
    ) -> Result<ProverSpec<G>, Error> {
        builder.build()
    }
}

/// Two-level statement: the outer fragment declares `x`, an inner
/// delegate-only fragment wires the leaf that consumes it.
#[derive(Clone, Debug)]
pub struct NestedDlog<G: PrimeGroup> {
    /// The public base.
    pub base: G,
    /// The public image.
    pub target: G,
    /// The discrete logarithm, absent on the verifier side.
    pub witness: Option<<G as group::Group>::Scalar>,
}

impl<G: PrimeGroup + 'static> DelegateStrategy<G> for NestedDlog<G> {
    fn provide_subprotocol_spec(
        &self,
        mut builder: SubprotocolSpecBuilder<G>,
    ) -> Result<SubprotocolSpec<G>, Error> {
        builder.add_scalar_variable("x")?;
        builder.add_subprotocol(
            "inner",
            Arc::new(crate::delegate::DelegateFragment::from_delegate(InnerDlog {
                base: self.base,
                target: self.target,
            })),
        )?;
        Ok(builder.build())
    }

    fn provide_witnesses(
        &self,
        mut builder: ProverSpecBuilder<'_, G>,
    ) -> Result<ProverSpec<G>, Error> {
        if let Some(x) = self.witness {
            builder.put_scalar_witness("x", x)?;
        }
        builder.build()
    }
}

/// A statement whose spec depends on its send-first value: the prover
/// transmits an offset `a` of its choosing and proves `x * base = target - a`
/// for the declared `x`. The additional check rejects an identity offset.
#[derive(Clone, Debug)]
pub struct OffsetDlog<G: PrimeGroup> {
    /// The public base.
    pub base: G,
    /// The public image before the offset is applied.
    pub target: G,
    /// Witness and chosen offset, absent on the verifier side.
    pub witness: Option<(<G as group::Group>::Scalar, G)>,
}

impl<G: PrimeGroup> SendThenDelegateStrategy<G> for OffsetDlog<G> {
    fn provide_prover_spec(
        &self,
        mut builder: ProverSpecBuilder<'_, G>,
        _rng: &mut dyn CryptoRngCore,
    ) -> Result<ProverSpec<G>, Error> {
        let (x, offset) = self
            .witness
            .ok_or(SpecBuildError::MissingWitness { name: "x".into() })?;
        builder.set_send_first_value(SendFirstValue::Elements(vec![offset]))?;
        builder.put_scalar_witness("x", x)?;
        builder.build()
    }

    fn restore_send_first_value(&self, data: &mut &[u8]) -> Result<SendFirstValue<G>, Error> {
        match SendFirstValue::read(data)? {
            SendFirstValue::Elements(elements) if elements.len() == 1 => {
                Ok(SendFirstValue::Elements(elements))
            }
            _ => Err(Error::InvalidTranscript),
        }
    }

    fn simulate_send_first_value(
        &self,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<SendFirstValue<G>, Error> {
        Ok(SendFirstValue::Elements(vec![G::random(rng)]))
    }

    fn provide_subprotocol_spec(
        &self,
        send_first: &SendFirstValue<G>,
        mut builder: SubprotocolSpecBuilder<G>,
    ) -> Result<SubprotocolSpec<G>, Error> {
        let SendFirstValue::Elements(elements) = send_first else {
            return Err(Error::InvalidTranscript);
        };
        let [offset] = elements.as_slice() else {
            return Err(Error::InvalidTranscript);
        };
        let x = builder.add_scalar_variable("x")?;
        builder.add_subprotocol(
            "shifted",
            Arc::new(LinearStatementFragment::new(
                [(x, self.base)],
                self.target - *offset,
            )),
        )?;
        Ok(builder.build())
    }

    fn provide_additional_check(
        &self,
        send_first: &SendFirstValue<G>,
    ) -> Result<BooleanExpression<G>, Error> {
        let SendFirstValue::Elements(elements) = send_first else {
            return Err(Error::InvalidTranscript);
        };
        let [offset] = elements.as_slice() else {
            return Err(Error::InvalidTranscript);
        };
        Ok(BooleanExpression::Holds(*offset != G::identity()))
    }
}
