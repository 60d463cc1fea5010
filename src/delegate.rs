//! Delegate-only fragments.
//!
//! Many statements need no public pre-commitment of their own: the fragment
//! exists purely to declare variables and aggregate its children. A
//! [`DelegateStrategy`] captures exactly that, and [`Delegate`] adapts it to
//! the full [`SendThenDelegateStrategy`] contract by fixing the send-first
//! value to [`SendFirstValue::Empty`] unconditionally.

use group::prime::PrimeGroup;
use rand_core::CryptoRngCore;

use crate::errors::Error;
use crate::send_then_delegate::{SendThenDelegateFragment, SendThenDelegateStrategy};
use crate::spec::{ProverSpec, ProverSpecBuilder, SubprotocolSpec, SubprotocolSpecBuilder};
use crate::transcript::SendFirstValue;

/// The implementor-supplied part of a delegate-only fragment: variable
/// declarations, subprotocol wiring, and witness binding. The send-first
/// value is always empty and never observed.
pub trait DelegateStrategy<G: PrimeGroup> {
    /// Declares variables and registers child fragments.
    fn provide_subprotocol_spec(
        &self,
        builder: SubprotocolSpecBuilder<G>,
    ) -> Result<SubprotocolSpec<G>, Error>;

    /// Binds a witness to every declared variable. The builder arrives with
    /// the empty send-first value already set and the spec already frozen.
    fn provide_witnesses(&self, builder: ProverSpecBuilder<'_, G>) -> Result<ProverSpec<G>, Error>;
}

/// Adapter turning a [`DelegateStrategy`] into a [`SendThenDelegateStrategy`]
/// with an unconditionally empty send-first value.
#[derive(Clone, Debug)]
pub struct Delegate<S>(pub S);

impl<G, S> SendThenDelegateStrategy<G> for Delegate<S>
where
    G: PrimeGroup,
    S: DelegateStrategy<G>,
{
    fn provide_prover_spec(
        &self,
        mut builder: ProverSpecBuilder<'_, G>,
        _rng: &mut dyn CryptoRngCore,
    ) -> Result<ProverSpec<G>, Error> {
        builder.set_send_first_value(SendFirstValue::Empty)?;
        self.0.provide_witnesses(builder)
    }

    fn restore_send_first_value(&self, data: &mut &[u8]) -> Result<SendFirstValue<G>, Error> {
        let value = SendFirstValue::read(data)?;
        if !value.is_empty() {
            return Err(Error::InvalidTranscript);
        }
        Ok(value)
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
        builder: SubprotocolSpecBuilder<G>,
    ) -> Result<SubprotocolSpec<G>, Error> {
        if !send_first.is_empty() {
            return Err(Error::InvalidTranscript);
        }
        self.0.provide_subprotocol_spec(builder)
    }
}

/// A fragment with no first message of its own.
pub type DelegateFragment<S> = SendThenDelegateFragment<Delegate<S>>;

impl<S> DelegateFragment<S> {
    /// Wraps a delegate strategy into a fragment.
    pub fn from_delegate(strategy: S) -> Self {
        SendThenDelegateFragment::new(Delegate(strategy))
    }
}
