//! Privacy levels for user profile fields.

use serde::{Deserialize, Serialize};

/// Whether a profile field may be disclosed outside the user's own view.
///
/// Every field defaults to private; disclosure is always opt-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    /// The field must not be read for anything externally observable.
    #[default]
    Private,
    /// The field may be disclosed and acted upon.
    Public,
}

impl Privacy {
    /// Returns true if the field may be disclosed.
    pub fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}
