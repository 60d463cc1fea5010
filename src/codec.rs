//! Domain-separated hashing codec for deriving challenges.
//!
//! A codec absorbs the prover's serialized messages and squeezes a
//! challenge scalar. The output is deterministic for a given input
//! sequence, so prover and verifier derive the same challenge from the same
//! transcript bytes. This is the contract surface the Fiat-Shamir wrapper
//! builds on.

use core::marker::PhantomData;

use ff::PrimeField;
use group::prime::PrimeGroup;
use num_bigint::BigUint;
use num_traits::One;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake128;

/// A domain-separated codec producing verifier challenges.
///
/// ## Minimal Implementation
/// Types implementing [`Codec`] must define:
/// - `new`
/// - `prover_message`
/// - `verifier_challenge`
pub trait Codec {
    /// The challenge type this codec produces.
    type Challenge;

    /// Creates an empty codec identified by a domain separator.
    fn new(domain_sep: &[u8]) -> Self;

    /// Absorbs prover message bytes.
    fn prover_message(&mut self, data: &[u8]);

    /// Produces a challenge from everything absorbed so far.
    fn verifier_challenge(&mut self) -> Self::Challenge;
}

/// Order of the scalar field as a big integer.
pub(crate) fn cardinal<F: PrimeField>() -> BigUint {
    let bytes = (F::ZERO - F::ONE).to_repr();
    BigUint::from_bytes_le(bytes.as_ref()) + BigUint::one()
}

/// SHAKE128-based codec over a group's scalar field.
#[derive(Clone)]
pub struct ShakeCodec<G>
where
    G: PrimeGroup,
{
    hasher: Shake128,
    _marker: PhantomData<G>,
}

impl<G> Codec for ShakeCodec<G>
where
    G: PrimeGroup,
{
    type Challenge = <G as group::Group>::Scalar;

    fn new(domain_sep: &[u8]) -> Self {
        let mut hasher = Shake128::default();
        hasher.update(&(domain_sep.len() as u32).to_be_bytes());
        hasher.update(domain_sep);
        Self {
            hasher,
            _marker: PhantomData,
        }
    }

    fn prover_message(&mut self, data: &[u8]) {
        self.hasher.update(&(data.len() as u32).to_be_bytes());
        self.hasher.update(data);
    }

    fn verifier_challenge(&mut self) -> Self::Challenge {
        let scalar_byte_length = (<Self::Challenge as PrimeField>::NUM_BITS as usize).div_ceil(8);

        // Squeeze 16 extra bytes so the reduction bias is negligible.
        let mut uniform_bytes = vec![0u8; scalar_byte_length + 16];
        self.hasher
            .clone()
            .finalize_xof()
            .read(&mut uniform_bytes);
        let scalar = BigUint::from_bytes_be(&uniform_bytes);
        let reduced = scalar % cardinal::<Self::Challenge>();

        let mut bytes = vec![0u8; scalar_byte_length];
        let reduced_bytes = reduced.to_bytes_be();
        let start = bytes.len() - reduced_bytes.len();
        bytes[start..].copy_from_slice(&reduced_bytes);
        bytes.reverse();

        let mut repr = <Self::Challenge as PrimeField>::Repr::default();
        repr.as_mut().copy_from_slice(&bytes);
        <Self::Challenge as PrimeField>::from_repr(repr)
            .expect("reduced value is always a canonical field element")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::RistrettoPoint;

    type G = RistrettoPoint;

    #[test]
    fn same_input_same_challenge() {
        let mut a = ShakeCodec::<G>::new(b"test");
        let mut b = ShakeCodec::<G>::new(b"test");
        a.prover_message(b"announcement");
        b.prover_message(b"announcement");
        assert_eq!(a.verifier_challenge(), b.verifier_challenge());
    }

    #[test]
    fn domain_separation_changes_challenge() {
        let mut a = ShakeCodec::<G>::new(b"context-a");
        let mut b = ShakeCodec::<G>::new(b"context-b");
        a.prover_message(b"announcement");
        b.prover_message(b"announcement");
        assert_ne!(a.verifier_challenge(), b.verifier_challenge());
    }

    #[test]
    fn absorbed_bytes_change_challenge() {
        let mut a = ShakeCodec::<G>::new(b"test");
        let mut b = ShakeCodec::<G>::new(b"test");
        a.prover_message(b"one");
        b.prover_message(b"two");
        assert_ne!(a.verifier_challenge(), b.verifier_challenge());
    }
}
