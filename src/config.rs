//! Consent configuration — fixed wire constants and deployment options.

use serde::{Deserialize, Serialize};

use crate::error::{ConsentError, Result};

/// Identifier of the consent required action attached to a flow.
pub const PROVIDER_ID: &str = "ATTRIBUTE_CONSENT";

/// Flow-scoped note key the selection is persisted under.
pub const SELECTED_ATTRIBUTES_NOTE: &str = "selected_attributes";

/// Protocol identifier that gates the consent requirement.
pub const SAML_PROTOCOL: &str = "saml";

/// Template rendered for the attribute selection form.
pub const CONSENT_TEMPLATE: &str = "attribute-consent.ftl";

/// Form field whose presence signals the user cancelled.
pub const CANCEL_FIELD: &str = "cancel";

/// Multi-valued form field carrying the selected attribute names.
pub const SELECTION_FIELD: &str = "selected_attributes";

/// Delimiter used when serializing the selection into the note store.
/// Must never appear in a configured attribute name.
pub const SELECTION_DELIMITER: char = ',';

/// Error shown when the user submits without selecting anything.
pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one attribute to share";

/// The fixed allow-list of encrypted attribute names subject to consent.
/// Deliberately a list, not an `encrypted_` prefix match: unrelated
/// attributes that happen to carry the prefix are ignored.
pub const ENCRYPTED_ATTRIBUTES: &[&str] = &[
    "encrypted_firstName",
    "encrypted_lastName",
    "encrypted_email",
    "encrypted_age",
    "encrypted_mobile",
    "encrypted_address",
    "encrypted_profession",
];

/// Encryption metadata attributes, always disclosed when present so the
/// client can decrypt. Order here is the order they appear in the
/// emitted statement.
pub const METADATA_ATTRIBUTES: &[&str] = &[
    "wrapped_key",
    "webauthn_credential_id",
    "encryption_salt",
    "public_key",
    "encryption_iv",
    "wrapping_iv",
];

/// Attribute name the username is emitted under.
pub const USERNAME_ATTRIBUTE: &str = "username";

/// Consent pipeline configuration.
///
/// Defaults reproduce the fixed constants above; a deployment can
/// override the attribute lists, note key, or template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentOptions {
    /// Encrypted attributes offered for selection.
    #[serde(default = "default_encrypted_attributes")]
    pub encrypted_attributes: Vec<String>,
    /// Metadata attributes always included when present, in emission order.
    #[serde(default = "default_metadata_attributes")]
    pub metadata_attributes: Vec<String>,
    /// Flow note key for the persisted selection.
    #[serde(default = "default_note_key")]
    pub note_key: String,
    /// Protocol identifier the trigger fires for.
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// Template identifier for the selection form.
    #[serde(default = "default_template")]
    pub template: String,
}

fn default_encrypted_attributes() -> Vec<String> {
    ENCRYPTED_ATTRIBUTES.iter().map(|s| s.to_string()).collect()
}

fn default_metadata_attributes() -> Vec<String> {
    METADATA_ATTRIBUTES.iter().map(|s| s.to_string()).collect()
}

fn default_note_key() -> String {
    SELECTED_ATTRIBUTES_NOTE.to_string()
}

fn default_protocol() -> String {
    SAML_PROTOCOL.to_string()
}

fn default_template() -> String {
    CONSENT_TEMPLATE.to_string()
}

impl Default for ConsentOptions {
    fn default() -> Self {
        Self {
            encrypted_attributes: default_encrypted_attributes(),
            metadata_attributes: default_metadata_attributes(),
            note_key: default_note_key(),
            protocol: default_protocol(),
            template: default_template(),
        }
    }
}

impl ConsentOptions {
    /// Reject configurations whose attribute names could not survive the
    /// delimited note encoding.
    pub fn validate(&self) -> Result<()> {
        for name in self
            .encrypted_attributes
            .iter()
            .chain(self.metadata_attributes.iter())
        {
            if name.contains(SELECTION_DELIMITER) {
                return Err(ConsentError::DelimiterInAttributeName(name.clone()));
            }
        }
        Ok(())
    }
}
