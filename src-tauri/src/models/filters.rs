use serde::Deserialize;

/// Advanced search form: the two filter modes are mutually exclusive —
/// an exact MRI study id wins over an entity code when both are set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdvancedSearch {
    #[serde(default)]
    pub study_id: String,
    #[serde(default)]
    pub entity_code: String,
}

impl AdvancedSearch {
    pub fn is_empty(&self) -> bool {
        self.study_id.trim().is_empty() && self.entity_code.trim().is_empty()
    }
}
