//! Newtype IDs for type-safe identifiers.
//!
//! Using newtypes prevents accidentally mixing up different ID types,
//! e.g., passing a ProductId where a BuyerId is expected.
//!
//! `new` trusts its input (fixtures, store snapshots). Anything that arrives
//! from outside the engine goes through `parse`.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest identifier accepted by `parse`.
pub const MAX_ID_LEN: usize = 64;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident, $label:literal) => {
        #[doc = concat!("Identifier of a ", $label, ".")]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from a trusted string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Parse an untrusted identifier.
            pub fn parse(raw: &str) -> Result<Self, CommerceError> {
                validate_id($label, raw).map(|()| Self(raw.to_string()))
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(BuyerId, "buyer");
define_id!(ProductId, "product");
define_id!(CartLineId, "cart line");

impl CartLineId {
    /// Generate a fresh, random line ID (`line_<base64url>`).
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 12] = rand::thread_rng().gen();
        Self(format!("line_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }
}

fn validate_id(label: &str, raw: &str) -> Result<(), CommerceError> {
    if raw.is_empty() {
        return Err(CommerceError::InvalidInput(format!("{label} id is empty")));
    }
    if raw.len() > MAX_ID_LEN {
        return Err(CommerceError::InvalidInput(format!(
            "{label} id is longer than {MAX_ID_LEN} characters"
        )));
    }
    if let Some(bad) = raw
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(CommerceError::InvalidInput(format!(
            "{label} id contains invalid character {bad:?}"
        )));
    }
    Ok(())
}
