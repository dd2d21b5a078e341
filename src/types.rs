//! Data model — user/session collaborator traits, the selection, the
//! attribute statement, and form submission data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::SELECTION_DELIMITER;
use crate::error::{ConsentError, Result};

// ── Collaborator traits ─────────────────────────────────────────

/// Read-only view of an authenticated user's attribute map.
///
/// The identity store owns the user; this crate only ever reads single
/// attribute values and the username.
pub trait UserAttributes {
    /// First value of the named attribute, if present.
    fn first_attribute(&self, name: &str) -> Option<&str>;

    /// The user's login name. Absence is an upstream integration error.
    fn username(&self) -> Option<&str>;
}

/// Flow-scoped authentication session: protocol identifier, a key/value
/// note store whose lifetime equals one authentication attempt, and the
/// list of required actions still pending for that attempt.
pub trait AuthenticationSession {
    /// Protocol identifier of the current handshake (e.g. "saml").
    fn protocol(&self) -> &str;

    /// Read a flow-scoped note.
    fn get_note(&self, key: &str) -> Option<String>;

    /// Write a flow-scoped note.
    fn set_note(&mut self, key: &str, value: String);

    /// Whether the given required action is already pending.
    fn has_required_action(&self, id: &str) -> bool;

    /// Attach a required action. Implementations must deduplicate;
    /// attaching an already-pending action is a no-op.
    fn add_required_action(&mut self, id: &str);

    /// Mark a required action complete, removing it from the pending set.
    fn remove_required_action(&mut self, id: &str);
}

// ── In-memory implementations ───────────────────────────────────

/// HashMap-backed [`UserAttributes`] implementation.
#[derive(Debug, Clone, Default)]
pub struct MemoryUser {
    username: Option<String>,
    attributes: HashMap<String, String>,
}

impl MemoryUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            attributes: HashMap::new(),
        }
    }

    /// A user with no username, for exercising precondition failures.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }
}

impl UserAttributes for MemoryUser {
    fn first_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

/// In-memory [`AuthenticationSession`], one instance per flow.
#[derive(Debug, Clone)]
pub struct MemoryAuthSession {
    protocol: String,
    notes: HashMap<String, String>,
    required_actions: Vec<String>,
}

impl MemoryAuthSession {
    pub fn new(protocol: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            notes: HashMap::new(),
            required_actions: Vec::new(),
        }
    }

    /// Pending required actions, in attachment order.
    pub fn required_actions(&self) -> &[String] {
        &self.required_actions
    }
}

impl AuthenticationSession for MemoryAuthSession {
    fn protocol(&self) -> &str {
        &self.protocol
    }

    fn get_note(&self, key: &str) -> Option<String> {
        self.notes.get(key).cloned()
    }

    fn set_note(&mut self, key: &str, value: String) {
        self.notes.insert(key.to_string(), value);
    }

    fn has_required_action(&self, id: &str) -> bool {
        self.required_actions.iter().any(|a| a == id)
    }

    fn add_required_action(&mut self, id: &str) {
        if !self.has_required_action(id) {
            self.required_actions.push(id.to_string());
        }
    }

    fn remove_required_action(&mut self, id: &str) {
        self.required_actions.retain(|a| a != id);
    }
}

// ── Selection ───────────────────────────────────────────────────

/// Ordered, duplicate-collapsing set of attribute names the user chose
/// to disclose.
///
/// The in-memory representation is structured; the comma-joined string
/// only exists at the note-store boundary, via [`serialize`] and
/// [`parse`].
///
/// [`serialize`]: SelectedAttributes::serialize
/// [`parse`]: SelectedAttributes::parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAttributes {
    names: Vec<String>,
}

impl SelectedAttributes {
    /// Build a selection from submitted names, validated against the
    /// candidates that were offered on the form.
    ///
    /// Order is preserved as submitted; duplicates collapse to the first
    /// occurrence. An empty result or a name outside the candidate set
    /// is a validation failure.
    pub fn from_submitted<S: AsRef<str>>(submitted: &[S], candidates: &[String]) -> Result<Self> {
        let mut names: Vec<String> = Vec::new();
        for name in submitted {
            let name = name.as_ref();
            if !candidates.iter().any(|c| c == name) {
                return Err(ConsentError::UnknownAttribute(name.to_string()));
            }
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        if names.is_empty() {
            return Err(ConsentError::EmptySelection);
        }
        Ok(Self { names })
    }

    /// Decode a previously stored selection. Unlike [`from_submitted`],
    /// an absent or empty string is a valid empty selection: it means
    /// consent never completed and nothing encrypted is disclosed.
    ///
    /// [`from_submitted`]: SelectedAttributes::from_submitted
    pub fn parse(stored: &str) -> Self {
        let names = stored
            .split(SELECTION_DELIMITER)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .fold(Vec::new(), |mut acc, name| {
                if !acc.contains(&name) {
                    acc.push(name);
                }
                acc
            });
        Self { names }
    }

    /// An empty selection: nothing encrypted is disclosed.
    pub fn empty() -> Self {
        Self { names: Vec::new() }
    }

    /// Encode for the note store.
    pub fn serialize(&self) -> String {
        self.names.join(&SELECTION_DELIMITER.to_string())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

// ── Form data ───────────────────────────────────────────────────

/// Decoded form submission: field name to one-or-more values.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: HashMap<String, Vec<String>>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to a (possibly multi-valued) field.
    pub fn add(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(field, value);
        self
    }

    /// Whether the field was submitted at all (marker fields like
    /// "cancel" carry meaning by presence alone).
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// All submitted values for a field, empty if absent.
    pub fn values(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

// ── Attribute statement ─────────────────────────────────────────

/// One (name, value) pair destined for the assertion's attribute
/// statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionAttribute {
    pub name: String,
    pub value: String,
}

impl AssertionAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered attribute list handed to the assertion serializer. Order is
/// part of the contract: selected attributes first (in stored order),
/// then metadata (fixed order), then the username.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeStatement {
    attributes: Vec<AssertionAttribute>,
}

impl AttributeStatement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push(AssertionAttribute::new(name, value));
    }

    pub fn attributes(&self) -> &[AssertionAttribute] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// First value emitted under the given name, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// How many entries carry the given name.
    pub fn count(&self, name: &str) -> usize {
        self.attributes.iter().filter(|a| a.name == name).count()
    }
}

impl IntoIterator for AttributeStatement {
    type Item = AssertionAttribute;
    type IntoIter = std::vec::IntoIter<AssertionAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        vec!["encrypted_email".to_string(), "encrypted_age".to_string()]
    }

    #[test]
    fn selection_preserves_submitted_order() {
        let sel =
            SelectedAttributes::from_submitted(&["encrypted_age", "encrypted_email"], &candidates())
                .unwrap();
        assert_eq!(sel.names(), &["encrypted_age", "encrypted_email"]);
    }

    #[test]
    fn selection_collapses_duplicates() {
        let sel = SelectedAttributes::from_submitted(
            &["encrypted_email", "encrypted_email"],
            &candidates(),
        )
        .unwrap();
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn selection_rejects_empty() {
        let submitted: [&str; 0] = [];
        let err = SelectedAttributes::from_submitted(&submitted, &candidates()).unwrap_err();
        assert_eq!(err, ConsentError::EmptySelection);
    }

    #[test]
    fn selection_rejects_unknown_name() {
        let err = SelectedAttributes::from_submitted(&["encrypted_nickname"], &candidates())
            .unwrap_err();
        assert_eq!(
            err,
            ConsentError::UnknownAttribute("encrypted_nickname".to_string())
        );
    }

    #[test]
    fn serialize_round_trip() {
        let sel =
            SelectedAttributes::from_submitted(&["encrypted_email", "encrypted_age"], &candidates())
                .unwrap();
        let encoded = sel.serialize();
        assert_eq!(encoded, "encrypted_email,encrypted_age");
        assert_eq!(SelectedAttributes::parse(&encoded), sel);
    }

    #[test]
    fn parse_empty_string_is_empty_selection() {
        let sel = SelectedAttributes::parse("");
        assert!(sel.is_empty());
    }

    #[test]
    fn memory_session_deduplicates_required_actions() {
        let mut session = MemoryAuthSession::new("saml");
        session.add_required_action("ATTRIBUTE_CONSENT");
        session.add_required_action("ATTRIBUTE_CONSENT");
        assert_eq!(session.required_actions().len(), 1);
        session.remove_required_action("ATTRIBUTE_CONSENT");
        assert!(session.required_actions().is_empty());
    }

    #[test]
    fn memory_session_notes() {
        let mut session = MemoryAuthSession::new("saml");
        assert_eq!(session.get_note("k"), None);
        session.set_note("k", "v".to_string());
        assert_eq!(session.get_note("k"), Some("v".to_string()));
    }

    #[test]
    fn form_data_marker_and_values() {
        let form = FormData::new()
            .with("cancel", "")
            .with("selected_attributes", "encrypted_email")
            .with("selected_attributes", "encrypted_age");
        assert!(form.has("cancel"));
        assert!(!form.has("other"));
        assert_eq!(form.values("selected_attributes").len(), 2);
        assert!(form.values("other").is_empty());
    }

    #[test]
    fn statement_lookup_and_count() {
        let mut stmt = AttributeStatement::new();
        stmt.push("username", "alice");
        stmt.push("wrapped_key", "K");
        assert_eq!(stmt.get("username"), Some("alice"));
        assert_eq!(stmt.count("username"), 1);
        assert_eq!(stmt.get("missing"), None);
    }

    #[test]
    fn statement_serializes_in_order() {
        let mut stmt = AttributeStatement::new();
        stmt.push("encrypted_email", "X");
        stmt.push("username", "alice");
        let json = serde_json::to_value(&stmt).unwrap();
        assert_eq!(json["attributes"][0]["name"], "encrypted_email");
        assert_eq!(json["attributes"][1]["name"], "username");
    }
}
