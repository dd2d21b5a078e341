//! # saml-consent
//!
//! Consent-gated selective disclosure of encrypted user attributes during a
//! SAML single-sign-on flow.
//!
//! Some user attributes are stored client-side-encrypted: the identity broker
//! holds ciphertext it cannot read. Before the broker emits its assertion, the
//! user must pick which of those attributes to disclose to the relying
//! service. This crate implements that pipeline:
//!
//! - Trigger: decide whether consent must be collected for this flow
//! - Challenge: the interactive selection state machine
//! - Statement: build the final ordered attribute list for the assertion
//!
//! The broker's protocol engine, XML serialization, and the client-side
//! cryptography are all outside this crate; it receives an authenticated
//! user and a flow-scoped session, and hands back a decision and an
//! attribute statement.

pub mod challenge;
pub mod config;
pub mod detector;
pub mod error;
pub mod events;
pub mod statement;
pub mod trigger;
pub mod types;

pub use challenge::{Challenge, ChallengeState, ConsentChallenge, ProcessOutcome};
pub use config::ConsentOptions;
pub use error::{ConsentError, Result};
pub use statement::build_statement;
pub use trigger::{evaluate_triggers, RequiredActionDecision};
pub use types::{
    AssertionAttribute, AttributeStatement, AuthenticationSession, FormData, MemoryAuthSession,
    MemoryUser, SelectedAttributes, UserAttributes,
};
