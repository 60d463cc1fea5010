//! Witness variables and their assignments.
//!
//! A fragment declares named variables, each living in one of two domains:
//! the scalar field of the ambient group (exponent variables) or the group
//! itself. Concrete values for those variables flow through the protocol as
//! [`VariableValue`]s bundled into [`VariableAssignment`]s, and the single
//! piece of witness arithmetic the whole engine performs is
//! [`VariableValue::eval_linear`].

use std::collections::BTreeMap;

use group::prime::PrimeGroup;

use crate::errors::Error;

/// The algebraic domain a declared variable lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableKind {
    /// An element of the group's scalar field.
    Scalar,
    /// A group element.
    Element,
}

/// Typed handle to a declared scalar variable.
///
/// Handles are produced by the spec builder and referenced by fragments; the
/// underlying name only surfaces again at the registry boundary.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScalarVar(pub(crate) String);

impl ScalarVar {
    /// References a scalar variable declared by an ancestor fragment.
    ///
    /// The name must match a declaration somewhere on the path from the
    /// root; a dangling reference surfaces as
    /// [`Error::UnassignedVariable`] when the fragment is first evaluated.
    pub fn external(name: impl Into<String>) -> Self {
        ScalarVar(name.into())
    }

    /// The registered name of this variable.
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Typed handle to a declared group-element variable.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementVar(pub(crate) String);

impl ElementVar {
    /// References a group-element variable declared by an ancestor fragment.
    pub fn external(name: impl Into<String>) -> Self {
        ElementVar(name.into())
    }

    /// The registered name of this variable.
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// A concrete value for a variable, in the variable's own domain.
///
/// The same type carries witnesses, per-announcement randomness, and
/// responses; which role a value plays is determined by where it appears in
/// the protocol, not by its representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VariableValue<G: PrimeGroup> {
    /// A scalar-field value.
    Scalar(G::Scalar),
    /// A group-element value.
    Element(G),
}

impl<G: PrimeGroup> VariableValue<G> {
    /// The domain this value belongs to.
    pub fn kind(&self) -> VariableKind {
        match self {
            VariableValue::Scalar(_) => VariableKind::Scalar,
            VariableValue::Element(_) => VariableKind::Element,
        }
    }

    /// Computes `challenge * self + randomness` within this value's domain.
    ///
    /// This is the response formula of every Schnorr-style proof, and it is
    /// deliberately the same for both domains so that composition code never
    /// has to branch on the variable kind. Returns `None` when the two values
    /// live in different domains.
    pub fn eval_linear(
        &self,
        challenge: &G::Scalar,
        randomness: &VariableValue<G>,
    ) -> Option<VariableValue<G>> {
        match (self, randomness) {
            (VariableValue::Scalar(w), VariableValue::Scalar(r)) => {
                Some(VariableValue::Scalar(*w * challenge + r))
            }
            (VariableValue::Element(w), VariableValue::Element(r)) => {
                Some(VariableValue::Element(*w * *challenge + *r))
            }
            _ => None,
        }
    }
}

/// An immutable mapping from variable names to values.
///
/// Assignments are threaded through the fragment tree: each fragment merges
/// the values for its own declared variables over the assignment it received
/// from its ancestors via [`VariableAssignment::fallback_to`], so descendants
/// see every variable declared on the path from the root.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableAssignment<G: PrimeGroup> {
    values: BTreeMap<String, VariableValue<G>>,
}

impl<G: PrimeGroup> VariableAssignment<G> {
    /// The assignment with no entries.
    pub fn empty() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Wraps an existing name-to-value map.
    pub fn from_map(values: BTreeMap<String, VariableValue<G>>) -> Self {
        Self { values }
    }

    /// Adds or replaces a single entry.
    pub fn insert(&mut self, name: impl Into<String>, value: VariableValue<G>) {
        self.values.insert(name.into(), value);
    }

    /// Looks up a value by name.
    pub fn get(&self, name: &str) -> Option<&VariableValue<G>> {
        self.values.get(name)
    }

    /// Looks up a scalar variable, rejecting values of the wrong domain.
    pub fn scalar(&self, var: &ScalarVar) -> Result<G::Scalar, Error> {
        match self.values.get(var.name()) {
            Some(VariableValue::Scalar(s)) => Ok(*s),
            Some(_) => Err(Error::DomainMismatch {
                name: var.name().into(),
            }),
            None => Err(Error::UnassignedVariable {
                name: var.name().into(),
            }),
        }
    }

    /// Looks up a group-element variable, rejecting values of the wrong domain.
    pub fn element(&self, var: &ElementVar) -> Result<G, Error> {
        match self.values.get(var.name()) {
            Some(VariableValue::Element(e)) => Ok(*e),
            Some(_) => Err(Error::DomainMismatch {
                name: var.name().into(),
            }),
            None => Err(Error::UnassignedVariable {
                name: var.name().into(),
            }),
        }
    }

    /// Combines two assignments, with `self` taking precedence.
    ///
    /// Lookups on the result first check `self`, then `other`. This is how a
    /// fragment exposes its own variables to descendants without descendants
    /// shadowing anything an ancestor declared under the same name (the spec
    /// builder keeps names unique along any root path, so precedence only
    /// matters for the merge direction).
    pub fn fallback_to(&self, other: &Self) -> Self {
        let mut values = other.values.clone();
        for (name, value) in &self.values {
            values.insert(name.clone(), *value);
        }
        Self { values }
    }

    /// Iterates over the entries in lexicographic name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableValue<G>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the assignment has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<G: PrimeGroup> Default for VariableAssignment<G> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::{RistrettoPoint, Scalar};
    use group::Group;
    use rand::rngs::OsRng;

    type G = RistrettoPoint;

    #[test]
    fn eval_linear_scalar() {
        let w = VariableValue::<G>::Scalar(Scalar::from(5u64));
        let r = VariableValue::<G>::Scalar(Scalar::from(3u64));
        let c = Scalar::from(7u64);
        let got = w.eval_linear(&c, &r).unwrap();
        assert_eq!(got, VariableValue::Scalar(Scalar::from(38u64)));
    }

    #[test]
    fn eval_linear_element_matches_scalar_formula() {
        let mut rng = OsRng;
        let w = G::random(&mut rng);
        let r = G::random(&mut rng);
        let c = Scalar::random(&mut rng);
        let got = VariableValue::Element(w)
            .eval_linear(&c, &VariableValue::Element(r))
            .unwrap();
        assert_eq!(got, VariableValue::Element(w * c + r));
    }

    #[test]
    fn eval_linear_rejects_mixed_domains() {
        let w = VariableValue::<G>::Scalar(Scalar::from(1u64));
        let r = VariableValue::Element(G::generator());
        assert!(w.eval_linear(&Scalar::from(2u64), &r).is_none());
    }

    #[test]
    fn fallback_prefers_local_values() {
        let mut local = VariableAssignment::<G>::empty();
        local.insert("x", VariableValue::Scalar(Scalar::from(1u64)));
        let mut outer = VariableAssignment::<G>::empty();
        outer.insert("x", VariableValue::Scalar(Scalar::from(2u64)));
        outer.insert("y", VariableValue::Scalar(Scalar::from(3u64)));

        let merged = local.fallback_to(&outer);
        assert_eq!(
            merged.get("x"),
            Some(&VariableValue::Scalar(Scalar::from(1u64)))
        );
        assert_eq!(
            merged.get("y"),
            Some(&VariableValue::Scalar(Scalar::from(3u64)))
        );
    }

    #[test]
    fn typed_getters_enforce_domains() {
        let mut assignment = VariableAssignment::<G>::empty();
        assignment.insert("x", VariableValue::Element(G::generator()));
        let var = ScalarVar("x".into());
        assert!(matches!(
            assignment.scalar(&var),
            Err(Error::DomainMismatch { .. })
        ));
        let missing = ScalarVar("z".into());
        assert!(matches!(
            assignment.scalar(&missing),
            Err(Error::UnassignedVariable { .. })
        ));
    }
}
