//! The interactive consent challenge.
//!
//! One instance lives for the duration of a single flow's consent step.
//! The framework first asks it to render the selection form, then feeds
//! it each form submission until the user either supplies a valid
//! selection (success, selection persisted to the flow note store) or
//! cancels (the whole authentication attempt fails). Invalid
//! submissions re-render the form with an error and can repeat
//! indefinitely; nothing is persisted until success.

use serde::Serialize;

use crate::config::{
    ConsentOptions, CANCEL_FIELD, EMPTY_SELECTION_MESSAGE, PROVIDER_ID, SELECTION_FIELD,
};
use crate::detector::{candidate_attributes, CandidateAttribute};
use crate::error::ConsentError;
use crate::events::{self, ConsentEvent};
use crate::types::{AuthenticationSession, FormData, SelectedAttributes, UserAttributes};

/// Challenge lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeState {
    /// Created, form not yet rendered.
    Pending,
    /// Form rendered, awaiting a submission.
    Challenged,
    /// Selection accepted and persisted. Terminal.
    Succeeded,
    /// User cancelled. Terminal; the authentication attempt fails.
    Failed,
}

/// The renderable artifact handed back to the protocol layer: which
/// template to render, the candidates to list, and an inline error on
/// re-prompt. Values are never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Challenge {
    pub template: String,
    pub candidates: Vec<CandidateAttribute>,
    pub error: Option<String>,
}

/// Result of processing one form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Selection accepted; the required action is complete.
    Success(SelectedAttributes),
    /// Validation failed; re-render this challenge.
    Retry(Challenge),
    /// User cancelled; the authentication attempt fails.
    Failure(ConsentError),
}

/// The consent challenge state machine for one flow.
#[derive(Debug, Clone)]
pub struct ConsentChallenge {
    options: ConsentOptions,
    state: ChallengeState,
}

impl ConsentChallenge {
    pub fn new(options: ConsentOptions) -> Self {
        Self {
            options,
            state: ChallengeState::Pending,
        }
    }

    pub fn state(&self) -> ChallengeState {
        self.state
    }

    /// Render the selection form for the first time
    /// (`Pending -> Challenged`). Candidates are the allow-listed
    /// encrypted attributes present on the user.
    pub fn challenge(&mut self, user: &dyn UserAttributes) -> Challenge {
        self.state = ChallengeState::Challenged;
        let candidates = candidate_attributes(user, &self.options);
        events::emit(ConsentEvent::ChallengePresented {
            candidates: candidates.len(),
        });
        Challenge {
            template: self.options.template.clone(),
            candidates,
            error: None,
        }
    }

    /// Process a form submission. Only legal in `Challenged`.
    ///
    /// - cancel field present: `Challenged -> Failed`, nothing persisted
    /// - empty or invalid selection: stays `Challenged`, form re-rendered
    ///   with an error, nothing persisted
    /// - valid non-empty selection: `Challenged -> Succeeded`, the
    ///   selection is written to the flow note store and the required
    ///   action is removed from the pending set
    ///
    /// `Succeeded` and `Failed` are terminal and `Pending` has no form
    /// to submit, so a submission in any other state is rejected
    /// without touching the store. The selection is written at most
    /// once per challenge.
    pub fn process(
        &mut self,
        session: &mut dyn AuthenticationSession,
        user: &dyn UserAttributes,
        form: &FormData,
    ) -> ProcessOutcome {
        if self.state != ChallengeState::Challenged {
            return ProcessOutcome::Failure(ConsentError::ChallengeNotActive);
        }

        if form.has(CANCEL_FIELD) {
            self.state = ChallengeState::Failed;
            events::emit(ConsentEvent::ConsentDeclined);
            return ProcessOutcome::Failure(ConsentError::Cancelled);
        }

        let candidates = candidate_attributes(user, &self.options);
        let candidate_names: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
        let submitted = form.values(SELECTION_FIELD);

        match SelectedAttributes::from_submitted(submitted, &candidate_names) {
            Ok(selection) => {
                session.set_note(&self.options.note_key, selection.serialize());
                session.remove_required_action(PROVIDER_ID);
                self.state = ChallengeState::Succeeded;
                events::emit(ConsentEvent::ConsentGranted {
                    selected: selection.len(),
                });
                ProcessOutcome::Success(selection)
            }
            Err(err) => {
                // Stay in Challenged; the user may resubmit or cancel.
                self.state = ChallengeState::Challenged;
                events::emit(ConsentEvent::ConsentReprompted { reason: err.code() });
                ProcessOutcome::Retry(Challenge {
                    template: self.options.template.clone(),
                    candidates,
                    error: Some(error_message(&err)),
                })
            }
        }
    }
}

/// Inline message shown on the re-rendered form.
fn error_message(err: &ConsentError) -> String {
    match err {
        ConsentError::EmptySelection => EMPTY_SELECTION_MESSAGE.to_string(),
        other => other.to_string(),
    }
}
