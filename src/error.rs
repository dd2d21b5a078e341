//! Consent error taxonomy.
//!
//! Validation failures (`EmptySelection`, `UnknownAttribute`) are
//! recoverable and handled inside the challenge by re-prompting; they
//! never reach the statement builder. `Cancelled` fails the whole
//! authentication attempt. The precondition variants signal integration
//! errors in the surrounding system and are raised fail-fast.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsentError {
    /// The user submitted the form without selecting any attribute.
    #[error("no attributes were selected")]
    EmptySelection,

    /// The submission named an attribute that was never offered.
    #[error("attribute '{0}' was not among the offered candidates")]
    UnknownAttribute(String),

    /// The user declined to share any attributes; the attempt fails.
    #[error("user cancelled attribute consent")]
    Cancelled,

    /// A form submission arrived while no challenge was awaiting one:
    /// either the form was never rendered or the challenge already
    /// reached a terminal state.
    #[error("no consent challenge is awaiting a submission")]
    ChallengeNotActive,

    /// The authenticated user has no username, which the assertion
    /// always discloses.
    #[error("authenticated user has no username")]
    MissingUsername,

    /// A configured attribute name contains the selection delimiter and
    /// could not survive the note encoding.
    #[error("attribute name '{0}' contains the selection delimiter")]
    DelimiterInAttributeName(String),
}

impl ConsentError {
    /// Stable machine-readable code for each variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptySelection => "EMPTY_SELECTION",
            Self::UnknownAttribute(_) => "UNKNOWN_ATTRIBUTE",
            Self::Cancelled => "CONSENT_CANCELLED",
            Self::ChallengeNotActive => "CHALLENGE_NOT_ACTIVE",
            Self::MissingUsername => "MISSING_USERNAME",
            Self::DelimiterInAttributeName(_) => "INVALID_ATTRIBUTE_NAME",
        }
    }

    /// Whether the error is recoverable by re-prompting the user.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::EmptySelection | Self::UnknownAttribute(_))
    }
}

/// Unified result type for consent operations.
pub type Result<T> = std::result::Result<T, ConsentError>;
