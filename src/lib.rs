//! Composable Schnorr-style Sigma protocols.
//!
//! This crate builds interactive zero-knowledge proofs of knowledge out of
//! small, reusable *fragments*. A fragment proves one piece of an algebraic
//! statement and may reference variables declared by an ancestor, so a
//! statement is assembled as a tree: each level declares some variables,
//! transmits an optional first message, and delegates the rest to child
//! fragments. Announcement and response generation walk that tree top-down,
//! verification conjoins every child's predicate bottom-up, and simulation
//! replays the walk without any witness.
//!
//! The main pieces:
//! - [`traits::SchnorrFragment`] — the contract every fragment implements.
//! - [`send_then_delegate::SendThenDelegateFragment`] — the generic
//!   orchestrator; implementors only supply a small strategy object.
//! - [`linear_statement::LinearStatementFragment`] — the leaf proving a
//!   linear relation over group elements.
//! - [`delegate::DelegateFragment`] — fragments without a first message.
//! - [`protocol::SendThenDelegateProtocol`] — adapts a fragment tree into a
//!   standalone three-move protocol.
//! - [`fiat_shamir::Nizk`] — non-interactive proofs via a hashing codec.
//!
//! The algebra is abstract: everything is generic over a prime-order group
//! implementing [`group::prime::PrimeGroup`], with the group's scalar field
//! as the ring of exponents.

pub mod codec;
pub mod delegate;
pub mod errors;
pub mod expression;
pub mod fiat_shamir;
pub mod linear_statement;
pub mod protocol;
pub mod send_then_delegate;
pub mod serialization;
pub mod spec;
pub mod test_utils;
pub mod traits;
pub mod transcript;
pub mod variable;

pub use crate::errors::{Error, SpecBuildError};
pub use crate::expression::BooleanExpression;
pub use crate::linear_statement::LinearStatementFragment;
pub use crate::protocol::{ChallengeSpace, DelegateProtocol, SendThenDelegateProtocol};
pub use crate::send_then_delegate::{SendThenDelegateFragment, SendThenDelegateStrategy};
pub use crate::spec::{ProverSpec, ProverSpecBuilder, SubprotocolSpec, SubprotocolSpecBuilder};
pub use crate::traits::{AnnouncementSecret, SchnorrFragment};
pub use crate::transcript::{Announcement, Challenge, Response, SendFirstValue, Transcript};
pub use crate::variable::{
    ElementVar, ScalarVar, VariableAssignment, VariableKind, VariableValue,
};
pub use crate::delegate::{DelegateFragment, DelegateStrategy};
