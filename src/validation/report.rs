use std::fmt;

use crate::models::api::LOCAL_UNSUPPORTED_KEYS;

/// A non-fatal notice produced while validating a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Cloud-only keys were set on at least one api; `api` is the first one seen
    IgnoredLocalKeys { api: String },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::IgnoredLocalKeys { api } => {
                let [endpoint, autoscaling, tracker, update_strategy] = LOCAL_UNSUPPORTED_KEYS;
                write!(
                    f,
                    "{endpoint}, {autoscaling}, {tracker}, and {update_strategy} keys will be ignored because they are not supported in local environment (first set by {api})"
                )
            }
        }
    }
}

/// Outcome of a successful batch validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    advisories: Vec<Advisory>,
}

impl ValidationReport {
    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    pub fn has_advisories(&self) -> bool {
        !self.advisories.is_empty()
    }

    /// Record `advisory` unless an equivalent one was already recorded
    pub(crate) fn advise_once(&mut self, advisory: Advisory) -> bool {
        let already = self
            .advisories
            .iter()
            .any(|existing| std::mem::discriminant(existing) == std::mem::discriminant(&advisory));
        if already {
            return false;
        }
        self.advisories.push(advisory);
        true
    }
}
