//! Newtype wrappers for record identifiers.
//!
//! Elements, batches, batch items and style presets are all keyed by strings;
//! the wrappers stop one kind of id from being passed where another is expected.

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(id: impl Into<Arc<str>>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s.into())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.into())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Identifies an element inside a layout.
    ElementId
);
string_id!(
    /// Identifies an export batch in the store.
    BatchId
);
string_id!(
    /// Identifies a single reserved item within a batch.
    ItemId
);
string_id!(
    /// Identifies a QR style preset.
    StylePresetId
);

impl ElementId {
    /// Generates a fresh id of the form `el_<unix millis>_<6 alphanumerics>`.
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect();
        Self::from(format!("el_{}_{}", millis, suffix.to_lowercase()))
    }
}
