use crate::domain::Fund;
use serde::{Deserialize, Serialize};

/// Business conventions used to classify rows. Fund prefixes are supplied by
/// the upstream property system, so they live here rather than in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRules {
    pub fund2_prefix: String,
    pub fund3_prefix: String,
    pub vacancy_marker: String,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self {
            fund2_prefix: "x".to_string(),
            fund3_prefix: "3".to_string(),
            vacancy_marker: "VACANT".to_string(),
        }
    }
}

impl ClassificationRules {
    /// Total over all inputs: a missing code is `Unknown`, anything that
    /// matches neither prefix is `Other`. The Fund 3 prefix is checked first.
    pub fn classify(&self, property_code: Option<&str>) -> Fund {
        match property_code {
            None => Fund::Unknown,
            Some(code) if code.starts_with(self.fund3_prefix.as_str()) => Fund::Fund3,
            Some(code) if code.starts_with(self.fund2_prefix.as_str()) => Fund::Fund2,
            Some(_) => Fund::Other,
        }
    }

    /// Case-sensitive substring match. A tenant literally named
    /// "VACANT STORAGE LLC" is classified as vacant.
    pub fn is_vacant(&self, lease_label: Option<&str>) -> bool {
        lease_label.is_some_and(|label| label.contains(self.vacancy_marker.as_str()))
    }
}
