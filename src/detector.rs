//! Encrypted attribute detection.
//!
//! Pure predicates over the user's attribute map against the fixed
//! allow-list in [`ConsentOptions::encrypted_attributes`]. No side
//! effects, no failure modes.

use serde::Serialize;

use crate::config::ConsentOptions;
use crate::types::UserAttributes;

/// Whether the user carries at least one attribute from the encrypted
/// allow-list. Attributes outside the list are ignored even if their
/// name starts with `encrypted_`.
pub fn has_encrypted_attributes(user: &dyn UserAttributes, options: &ConsentOptions) -> bool {
    options
        .encrypted_attributes
        .iter()
        .any(|name| user.first_attribute(name).is_some())
}

/// An encrypted attribute present on the user and offered for
/// selection. Only the name and a display label are exposed; the
/// ciphertext never reaches the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateAttribute {
    pub name: String,
    pub label: String,
}

/// The subset of the allow-list present on the user, in allow-list
/// order. These are the candidates the consent form offers.
pub fn candidate_attributes(
    user: &dyn UserAttributes,
    options: &ConsentOptions,
) -> Vec<CandidateAttribute> {
    options
        .encrypted_attributes
        .iter()
        .filter(|name| user.first_attribute(name).is_some())
        .map(|name| CandidateAttribute {
            name: name.clone(),
            label: display_label(name),
        })
        .collect()
}

/// Human label for the form: the attribute name with the `encrypted_`
/// prefix stripped.
fn display_label(name: &str) -> String {
    name.strip_prefix("encrypted_").unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MemoryUser;

    #[test]
    fn detects_single_encrypted_attribute() {
        let user = MemoryUser::new("alice").with_attribute("encrypted_email", "ciphertext");
        assert!(has_encrypted_attributes(&user, &ConsentOptions::default()));
    }

    #[test]
    fn no_encrypted_attributes() {
        let user = MemoryUser::new("alice").with_attribute("email", "a@example.com");
        assert!(!has_encrypted_attributes(&user, &ConsentOptions::default()));
    }

    #[test]
    fn prefix_outside_allow_list_is_ignored() {
        let user = MemoryUser::new("alice").with_attribute("encrypted_nickname", "ciphertext");
        assert!(!has_encrypted_attributes(&user, &ConsentOptions::default()));
    }

    #[test]
    fn candidates_follow_allow_list_order() {
        let user = MemoryUser::new("alice")
            .with_attribute("encrypted_age", "c1")
            .with_attribute("encrypted_firstName", "c2");
        let candidates = candidate_attributes(&user, &ConsentOptions::default());
        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, &["encrypted_firstName", "encrypted_age"]);
    }

    #[test]
    fn candidate_labels_strip_prefix() {
        let user = MemoryUser::new("alice").with_attribute("encrypted_email", "c");
        let candidates = candidate_attributes(&user, &ConsentOptions::default());
        assert_eq!(candidates[0].label, "email");
    }
}
