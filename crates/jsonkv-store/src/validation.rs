use jsonkv_codec::{decode, encode};
use serde_json::Value;
use tracing::warn;

use crate::error::ValidationError;
use crate::owner::FlatStore;

/// Result of a full validation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub checked: usize,
    pub violations: Vec<ValidationError>,
}

impl ValidationReport {
    /// Returns `true` if every entry decoded.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// The first violation in key order, if any.
    pub fn first(&self) -> Option<&ValidationError> {
        self.violations.first()
    }
}

/// Flat store integrity validator.
///
/// Validation is never automatic. Hosts call it before persisting if they
/// want to; a failure blocks nothing on its own.
pub struct Validator;

impl Validator {
    /// Check every entry decodes, stopping at the first that does not.
    ///
    /// Entries are checked in key order.
    pub fn validate(store: &FlatStore) -> Result<(), ValidationError> {
        for (key, raw) in store {
            if decode(raw).is_err() {
                let violation = violation(key, raw);
                warn!(key = %violation.key, "flat store entry is not valid JSON");
                return Err(violation);
            }
        }
        Ok(())
    }

    /// Check every entry and collect all failures.
    pub fn report(store: &FlatStore) -> ValidationReport {
        let violations: Vec<ValidationError> = store
            .iter()
            .filter(|(_, raw)| decode(raw).is_err())
            .map(|(key, raw)| violation(key, raw))
            .collect();
        if !violations.is_empty() {
            warn!(
                checked = store.len(),
                invalid = violations.len(),
                "flat store has undecodable entries"
            );
        }
        ValidationReport {
            checked: store.len(),
            violations,
        }
    }
}

fn violation(key: &str, raw: &str) -> ValidationError {
    ValidationError {
        key: key.to_string(),
        raw_value: raw.to_string(),
        suggested_encoding: suggest(raw),
    }
}

/// The stored text `raw` would have if it had been set as a plain string.
fn suggest(raw: &str) -> String {
    // Encoding a string value cannot fail; fall back to the raw text anyway.
    encode(&Value::String(raw.to_string())).unwrap_or_else(|_| raw.to_string())
}
