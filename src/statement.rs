//! Attribute statement construction at assertion-build time.

use crate::config::{ConsentOptions, USERNAME_ATTRIBUTE};
use crate::error::{ConsentError, Result};
use crate::events::{self, ConsentEvent};
use crate::types::{AttributeStatement, AuthenticationSession, SelectedAttributes, UserAttributes};

/// Build the ordered attribute statement for the outgoing assertion.
///
/// Emission order is part of the wire contract:
/// 1. the consented encrypted attributes, in stored-selection order,
///    skipping any whose user value is absent or empty
/// 2. the metadata attributes present on the user, in configured order
/// 3. the username, unconditionally last
///
/// An absent or empty selection note is not an error: it means consent
/// was never required or never completed, and nothing encrypted is
/// disclosed. A missing username is an upstream precondition violation
/// and fails fast, since the relying service cannot use an assertion
/// without it.
pub fn build_statement(
    session: &dyn AuthenticationSession,
    user: &dyn UserAttributes,
    options: &ConsentOptions,
) -> Result<AttributeStatement> {
    let username = match user.username() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(ConsentError::MissingUsername),
    };

    let selection = session
        .get_note(&options.note_key)
        .map(|stored| SelectedAttributes::parse(&stored))
        .unwrap_or_else(SelectedAttributes::empty);

    let mut statement = AttributeStatement::new();

    for name in selection.names() {
        match user.first_attribute(name) {
            Some(value) if !value.is_empty() => statement.push(name.clone(), value),
            // Selected but absent on the user: dropped, not an error.
            _ => {}
        }
    }

    for name in &options.metadata_attributes {
        match user.first_attribute(name) {
            Some(value) if !value.is_empty() => statement.push(name.clone(), value),
            _ => {}
        }
    }

    statement.push(USERNAME_ATTRIBUTE, username);

    events::emit(ConsentEvent::StatementBuilt {
        attributes: statement.len(),
    });
    Ok(statement)
}
