//! Provider codes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Lowercases `input` and drops every character outside `[a-z0-9_]`.
///
/// Idempotent: `normalize_code(&normalize_code(x)) == normalize_code(x)`.
pub fn normalize_code(input: &str) -> String {
    input
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

/// Stable, normalized identifier of a provider within the directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderCode(String);

impl ProviderCode {
    /// Normalizes `input` into a code.
    ///
    /// # Errors
    ///
    /// Returns an invalid input error when nothing survives normalization.
    pub fn new(input: &str) -> Result<Self> {
        let code = normalize_code(input);
        if code.is_empty() {
            return Err(Error::invalid_input()
                .with_message(format!("provider code '{input}' is empty after normalization")));
        }
        Ok(Self(code))
    }

    /// Wraps a code reported by the registry without normalizing it.
    ///
    /// The registry is the owner of stored codes; listing must show them as
    /// they are so that later deletes address the same row.
    pub fn from_wire(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether the code contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }
}

impl AsRef<str> for ProviderCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn normalizes_operator_input() {
        assert_eq!(normalize_code("EK_WhatsApp-01"), "ek_whatsapp01");
        assert_eq!(normalize_code("  push notify "), "pushnotify");
        assert_eq!(normalize_code("Почта_1"), "_1");
        assert_eq!(normalize_code(""), "");
    }

    #[test]
    fn rejects_codes_that_normalize_to_nothing() {
        assert!(ProviderCode::new("---").is_err());
        assert_eq!(ProviderCode::new("Ek_Tg").unwrap().as_str(), "ek_tg");
    }

    #[test]
    fn wire_codes_are_kept_verbatim() {
        let code = ProviderCode::from_wire("Legacy-Code");
        assert_eq!(code.as_str(), "Legacy-Code");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(input in any::<String>()) {
            let once = normalize_code(&input);
            prop_assert_eq!(normalize_code(&once), once);
        }

        #[test]
        fn normalized_output_uses_the_code_alphabet(input in any::<String>()) {
            let code = normalize_code(&input);
            prop_assert!(code
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        }
    }
}
