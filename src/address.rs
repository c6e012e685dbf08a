//! Address assembly from `addr:` tag fragments.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::ADDR_PREFIX;
use crate::normalize::{canonical, normalize_street, CITIES, PROVINCES};

/// Accumulated address sub-record for one element.
///
/// Keys are fragment names with the `addr:` prefix stripped. Serializes
/// transparently as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Address {
    fields: BTreeMap<String, String>,
}

impl Address {
    /// Create an empty address.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any fragment has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a recorded fragment by its stripped key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Record one address fragment, normalizing known fragment kinds.
    ///
    /// Dispatch by stripped key:
    /// - `street` runs street normalization;
    /// - `state` is a legacy alias stored under `province`, but only when
    ///   `province` is not already set. Note the asymmetry: a later
    ///   `province` fragment still overwrites unconditionally. Kept exactly
    ///   so because existing consumers rely on the observed behavior;
    /// - `province` and `city` run their lookup tables and overwrite;
    /// - anything else is stored verbatim under its stripped key,
    ///   last-write-wins.
    ///
    /// # Arguments
    /// * `key` - Full tag key including the `addr:` prefix
    /// * `value` - Raw fragment value
    pub fn update(&mut self, key: &str, value: &str) {
        let stripped = key.strip_prefix(ADDR_PREFIX).unwrap_or(key);
        match stripped {
            "street" => {
                self.fields
                    .insert("street".to_string(), normalize_street(value));
            }
            "state" => {
                if self.get("province").is_none() {
                    self.fields
                        .insert("province".to_string(), canonical(value, &PROVINCES).to_string());
                }
            }
            "province" => {
                self.fields
                    .insert("province".to_string(), canonical(value, &PROVINCES).to_string());
            }
            "city" => {
                self.fields
                    .insert("city".to_string(), canonical(value, &CITIES).to_string());
            }
            _ => {
                self.fields.insert(stripped.to_string(), value.to_string());
            }
        }
    }
}
