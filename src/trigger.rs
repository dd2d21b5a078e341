//! Consent trigger — decides whether the consent required action is
//! attached to the current flow.

use crate::config::{ConsentOptions, PROVIDER_ID};
use crate::detector::has_encrypted_attributes;
use crate::events::{self, ConsentEvent};
use crate::types::{AuthenticationSession, UserAttributes};

/// Outcome of trigger evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredActionDecision {
    /// The consent required action is (now) pending for this flow.
    Attach,
    /// Consent is not required for this flow.
    Skip,
}

/// Evaluate whether this flow needs consent and attach the required
/// action if so.
///
/// Attaches iff the session protocol matches the configured protocol
/// AND the user carries at least one allow-listed encrypted attribute.
/// Safe to call on every flow step: attachment is idempotent, so an
/// already-attached action is never duplicated.
pub fn evaluate_triggers(
    session: &mut dyn AuthenticationSession,
    user: &dyn UserAttributes,
    options: &ConsentOptions,
) -> RequiredActionDecision {
    if session.protocol() != options.protocol {
        events::emit(ConsentEvent::TriggerSkipped {
            protocol: session.protocol(),
        });
        return RequiredActionDecision::Skip;
    }

    if !has_encrypted_attributes(user, options) {
        events::emit(ConsentEvent::TriggerSkipped {
            protocol: session.protocol(),
        });
        return RequiredActionDecision::Skip;
    }

    if !session.has_required_action(PROVIDER_ID) {
        session.add_required_action(PROVIDER_ID);
        events::emit(ConsentEvent::TriggerAttached);
    }
    RequiredActionDecision::Attach
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MemoryAuthSession, MemoryUser};

    fn user_with_encrypted() -> MemoryUser {
        MemoryUser::new("alice").with_attribute("encrypted_email", "ciphertext")
    }

    #[test]
    fn attaches_for_saml_with_encrypted_attributes() {
        let mut session = MemoryAuthSession::new("saml");
        let decision =
            evaluate_triggers(&mut session, &user_with_encrypted(), &ConsentOptions::default());
        assert_eq!(decision, RequiredActionDecision::Attach);
        assert!(session.has_required_action(PROVIDER_ID));
    }

    #[test]
    fn skips_for_other_protocol() {
        let mut session = MemoryAuthSession::new("openid-connect");
        let decision =
            evaluate_triggers(&mut session, &user_with_encrypted(), &ConsentOptions::default());
        assert_eq!(decision, RequiredActionDecision::Skip);
        assert!(!session.has_required_action(PROVIDER_ID));
    }

    #[test]
    fn skips_without_encrypted_attributes() {
        let mut session = MemoryAuthSession::new("saml");
        let user = MemoryUser::new("bob").with_attribute("email", "b@example.com");
        let decision = evaluate_triggers(&mut session, &user, &ConsentOptions::default());
        assert_eq!(decision, RequiredActionDecision::Skip);
    }

    #[test]
    fn re_evaluation_does_not_duplicate() {
        let mut session = MemoryAuthSession::new("saml");
        let user = user_with_encrypted();
        let opts = ConsentOptions::default();
        evaluate_triggers(&mut session, &user, &opts);
        evaluate_triggers(&mut session, &user, &opts);
        assert_eq!(session.required_actions().len(), 1);
    }
}
