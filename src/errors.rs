//! Error types for fragment-based Sigma protocols.
//!
//! Two layers of failure are distinguished: [`SpecBuildError`] covers misuse
//! of the spec and prover builders (integration errors, surfaced immediately
//! and never recovered), while [`Error`] covers everything a running protocol
//! can report, including rejected proofs and malformed transcript data.

/// An error raised while assembling a subprotocol spec or a prover spec.
///
/// All variants indicate programmer or integration errors. None of them is
/// retryable, and none is produced by a well-formed proof exchange.
#[derive(Debug, thiserror::Error)]
pub enum SpecBuildError {
    /// A variable or subprotocol name was registered twice.
    #[error("duplicate name in subprotocol spec: {name}")]
    DuplicateName {
        /// The name that was already taken.
        name: String,
    },
    /// `build` was called while a declared variable had no witness bound.
    #[error("no witness supplied for declared variable: {name}")]
    MissingWitness {
        /// The declared variable lacking a witness.
        name: String,
    },
    /// A witness was bound twice for the same variable.
    #[error("witness already supplied for variable: {name}")]
    WitnessAlreadySet {
        /// The variable bound twice.
        name: String,
    },
    /// A witness was bound for a name the spec never declared.
    #[error("unknown variable: {name}")]
    UnknownVariable {
        /// The undeclared name.
        name: String,
    },
    /// `set_send_first_value` was called a second time.
    #[error("send-first value has already been set")]
    SendFirstValueAlreadySet,
    /// An operation requiring a frozen spec ran before `set_send_first_value`.
    #[error("send-first value has not been set")]
    SendFirstValueMissing,
}

/// Represents an error encountered during the execution of a fragment-based
/// Sigma protocol.
///
/// This may occur during announcement generation, response computation,
/// transcript checking, or (de)serialization.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The proof is invalid: verification failed.
    #[error("Verification failed.")]
    VerificationFailure,
    /// Serialized transcript data is malformed, or a decompressed transcript
    /// failed its own check.
    #[error("Malformed or inconsistent transcript data.")]
    InvalidTranscript,
    /// A fragment referenced a variable that no assignment on the path from
    /// the root provides.
    #[error("unassigned variable: {name}")]
    UnassignedVariable {
        /// The missing variable.
        name: String,
    },
    /// A supplied value is not an element of the variable's declared domain.
    #[error("value for variable '{name}' lies outside its declared domain")]
    DomainMismatch {
        /// The variable whose domain was violated.
        name: String,
    },
    /// Builder misuse while assembling a spec.
    #[error(transparent)]
    SpecBuild(#[from] SpecBuildError),
}
