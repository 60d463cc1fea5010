//! Subprotocol registries and their single-use builders.
//!
//! A fragment declares its variables and child fragments in a
//! [`SubprotocolSpec`], built once through a [`SubprotocolSpecBuilder`] and
//! frozen afterwards. On the prover side, a [`ProverSpecBuilder`]
//! additionally fixes the send-first value (which freezes the spec, since
//! the spec may depend on it) and binds one witness to every declared
//! variable, yielding a [`ProverSpec`].
//!
//! Registries are name-keyed `BTreeMap`s; their lexicographic iteration
//! order is the wire order of every list-shaped message, so both parties
//! align list positions by reconstructing the same spec from the same
//! public inputs.

use std::collections::BTreeMap;
use std::sync::Arc;

use ff::Field;
use group::prime::PrimeGroup;
use rand_core::CryptoRngCore;

use crate::errors::{Error, SpecBuildError};
use crate::send_then_delegate::SendThenDelegateStrategy;
use crate::traits::SchnorrFragment;
use crate::transcript::SendFirstValue;
use crate::variable::{ElementVar, ScalarVar, VariableAssignment, VariableKind, VariableValue};

/// A frozen registry of declared variables and child fragments.
#[derive(Clone)]
pub struct SubprotocolSpec<G: PrimeGroup> {
    variables: BTreeMap<String, VariableKind>,
    subprotocols: BTreeMap<String, Arc<dyn SchnorrFragment<G>>>,
}

impl<G: PrimeGroup> SubprotocolSpec<G> {
    /// Iterates over declared variables in lexicographic name order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, VariableKind)> {
        self.variables.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Iterates over child fragments in lexicographic name order.
    pub fn subprotocols(&self) -> impl Iterator<Item = (&str, &Arc<dyn SchnorrFragment<G>>)> {
        self.subprotocols
            .iter()
            .map(|(name, fragment)| (name.as_str(), fragment))
    }

    /// The declared domain of a variable, if it exists.
    pub fn variable_kind(&self, name: &str) -> Option<VariableKind> {
        self.variables.get(name).copied()
    }

    /// Number of declared variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of registered child fragments.
    pub fn num_subprotocols(&self) -> usize {
        self.subprotocols.len()
    }

    /// Draws one uniform value per declared variable, in its own domain.
    ///
    /// Used for announcement randomness on the prover side and for response
    /// values during simulation.
    pub(crate) fn sample_values(
        &self,
        rng: &mut dyn CryptoRngCore,
    ) -> BTreeMap<String, VariableValue<G>> {
        self.variables
            .iter()
            .map(|(name, kind)| {
                let value = match kind {
                    VariableKind::Scalar => {
                        VariableValue::Scalar(<G as group::Group>::Scalar::random(&mut *rng))
                    }
                    VariableKind::Element => VariableValue::Element(G::random(&mut *rng)),
                };
                (name.clone(), value)
            })
            .collect()
    }
}

/// Single-use builder for a [`SubprotocolSpec`].
///
/// Duplicate names fail immediately; `build` consumes the builder, so a
/// frozen spec can never be extended.
pub struct SubprotocolSpecBuilder<G: PrimeGroup> {
    variables: BTreeMap<String, VariableKind>,
    subprotocols: BTreeMap<String, Arc<dyn SchnorrFragment<G>>>,
}

impl<G: PrimeGroup> SubprotocolSpecBuilder<G> {
    /// An empty builder.
    pub fn new() -> Self {
        Self {
            variables: BTreeMap::new(),
            subprotocols: BTreeMap::new(),
        }
    }

    fn check_fresh(&self, name: &str) -> Result<(), SpecBuildError> {
        if self.variables.contains_key(name) || self.subprotocols.contains_key(name) {
            return Err(SpecBuildError::DuplicateName { name: name.into() });
        }
        Ok(())
    }

    /// Declares a scalar-field variable and returns a handle to it.
    pub fn add_scalar_variable(
        &mut self,
        name: impl Into<String>,
    ) -> Result<ScalarVar, SpecBuildError> {
        let name = name.into();
        self.check_fresh(&name)?;
        self.variables.insert(name.clone(), VariableKind::Scalar);
        Ok(ScalarVar(name))
    }

    /// Declares a group-element variable and returns a handle to it.
    pub fn add_element_variable(
        &mut self,
        name: impl Into<String>,
    ) -> Result<ElementVar, SpecBuildError> {
        let name = name.into();
        self.check_fresh(&name)?;
        self.variables.insert(name.clone(), VariableKind::Element);
        Ok(ElementVar(name))
    }

    /// Registers a child fragment under the given name.
    pub fn add_subprotocol(
        &mut self,
        name: impl Into<String>,
        fragment: Arc<dyn SchnorrFragment<G>>,
    ) -> Result<(), SpecBuildError> {
        let name = name.into();
        self.check_fresh(&name)?;
        self.subprotocols.insert(name, fragment);
        Ok(())
    }

    /// Freezes the registry.
    pub fn build(self) -> SubprotocolSpec<G> {
        SubprotocolSpec {
            variables: self.variables,
            subprotocols: self.subprotocols,
        }
    }
}

impl<G: PrimeGroup> Default for SubprotocolSpecBuilder<G> {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the prover commits to before the protocol starts: the chosen
/// send-first value, the spec it implies, and a complete witness assignment
/// for the spec's own variables.
#[derive(Clone)]
pub struct ProverSpec<G: PrimeGroup> {
    pub(crate) send_first: SendFirstValue<G>,
    pub(crate) spec: SubprotocolSpec<G>,
    pub(crate) witnesses: VariableAssignment<G>,
}

impl<G: PrimeGroup> ProverSpec<G> {
    /// The send-first value chosen for this proof.
    pub fn send_first(&self) -> &SendFirstValue<G> {
        &self.send_first
    }

    /// The frozen subprotocol spec.
    pub fn spec(&self) -> &SubprotocolSpec<G> {
        &self.spec
    }

    /// The witness assignment for the spec's own variables.
    pub fn witnesses(&self) -> &VariableAssignment<G> {
        &self.witnesses
    }
}

/// Single-use builder for a [`ProverSpec`].
///
/// [`ProverSpecBuilder::set_send_first_value`] must be called exactly once
/// and freezes the spec as a side effect; witnesses can only be bound after
/// that, because binding validates names and domains against the frozen
/// spec.
pub struct ProverSpecBuilder<'a, G: PrimeGroup> {
    strategy: &'a dyn SendThenDelegateStrategy<G>,
    send_first: Option<SendFirstValue<G>>,
    spec: Option<SubprotocolSpec<G>>,
    witnesses: BTreeMap<String, VariableValue<G>>,
}

impl<'a, G: PrimeGroup> ProverSpecBuilder<'a, G> {
    pub(crate) fn new(strategy: &'a dyn SendThenDelegateStrategy<G>) -> Self {
        Self {
            strategy,
            send_first: None,
            spec: None,
            witnesses: BTreeMap::new(),
        }
    }

    /// Fixes the send-first value and freezes the spec derived from it.
    pub fn set_send_first_value(&mut self, value: SendFirstValue<G>) -> Result<(), Error> {
        if self.send_first.is_some() {
            return Err(SpecBuildError::SendFirstValueAlreadySet.into());
        }
        let spec = self
            .strategy
            .provide_subprotocol_spec(&value, SubprotocolSpecBuilder::new())?;
        self.send_first = Some(value);
        self.spec = Some(spec);
        Ok(())
    }

    /// Binds a witness to a declared variable.
    ///
    /// Rejects unknown names, rebinding, and values outside the variable's
    /// declared domain; domain violations are caught here, at binding time,
    /// rather than during verification.
    pub fn put_witness_value(
        &mut self,
        name: impl Into<String>,
        value: VariableValue<G>,
    ) -> Result<(), Error> {
        let name = name.into();
        let spec = self
            .spec
            .as_ref()
            .ok_or(SpecBuildError::SendFirstValueMissing)?;
        let kind = spec
            .variable_kind(&name)
            .ok_or_else(|| SpecBuildError::UnknownVariable { name: name.clone() })?;
        if value.kind() != kind {
            return Err(Error::DomainMismatch { name });
        }
        if self.witnesses.contains_key(&name) {
            return Err(SpecBuildError::WitnessAlreadySet { name }.into());
        }
        self.witnesses.insert(name, value);
        Ok(())
    }

    /// Binds a scalar witness.
    pub fn put_scalar_witness(
        &mut self,
        name: impl Into<String>,
        value: <G as group::Group>::Scalar,
    ) -> Result<(), Error> {
        self.put_witness_value(name, VariableValue::Scalar(value))
    }

    /// Binds a group-element witness.
    pub fn put_element_witness(&mut self, name: impl Into<String>, value: G) -> Result<(), Error> {
        self.put_witness_value(name, VariableValue::Element(value))
    }

    /// Finalizes the prover spec.
    ///
    /// Fails if the send-first value was never set or any declared variable
    /// is still missing a witness.
    pub fn build(self) -> Result<ProverSpec<G>, Error> {
        let send_first = self
            .send_first
            .ok_or(SpecBuildError::SendFirstValueMissing)?;
        let spec = self.spec.ok_or(SpecBuildError::SendFirstValueMissing)?;
        for (name, _) in spec.variables() {
            if !self.witnesses.contains_key(name) {
                return Err(SpecBuildError::MissingWitness { name: name.into() }.into());
            }
        }
        Ok(ProverSpec {
            send_first,
            spec,
            witnesses: VariableAssignment::from_map(self.witnesses),
        })
    }
}
