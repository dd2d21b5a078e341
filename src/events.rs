//! Structured logging of consent flow events.
//!
//! Emits via `tracing`; attribute values are never logged, only names
//! and counts.

/// A step of the consent pipeline worth recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentEvent<'a> {
    /// Trigger evaluation attached the consent required action.
    TriggerAttached,
    /// Trigger evaluation decided consent is not needed.
    TriggerSkipped { protocol: &'a str },
    /// The selection form was rendered, offering this many candidates.
    ChallengePresented { candidates: usize },
    /// The user submitted a selection and it was accepted.
    ConsentGranted { selected: usize },
    /// The submission failed validation and the form was re-rendered.
    ConsentReprompted { reason: &'a str },
    /// The user cancelled; the authentication attempt fails.
    ConsentDeclined,
    /// The attribute statement was built for the assertion.
    StatementBuilt { attributes: usize },
}

pub fn emit(event: ConsentEvent<'_>) {
    match event {
        ConsentEvent::TriggerAttached => {
            tracing::info!("attribute consent required action attached");
        }
        ConsentEvent::TriggerSkipped { protocol } => {
            tracing::debug!(protocol, "attribute consent not required");
        }
        ConsentEvent::ChallengePresented { candidates } => {
            tracing::info!(candidates, "attribute consent form presented");
        }
        ConsentEvent::ConsentGranted { selected } => {
            tracing::info!(selected, "attribute consent granted");
        }
        ConsentEvent::ConsentReprompted { reason } => {
            tracing::warn!(reason, "attribute consent submission rejected");
        }
        ConsentEvent::ConsentDeclined => {
            tracing::warn!("attribute consent declined, failing authentication");
        }
        ConsentEvent::StatementBuilt { attributes } => {
            tracing::info!(attributes, "attribute statement built");
        }
    }
}
