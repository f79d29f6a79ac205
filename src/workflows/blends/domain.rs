use serde::{Deserialize, Serialize};

/// Property axis a blend recommendation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationCategory {
    Mechanical,
    Thermal,
    Barrier,
    Compatibilization,
    Biodegradability,
    Processing,
    Cost,
}

impl OptimizationCategory {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Mechanical,
            Self::Thermal,
            Self::Barrier,
            Self::Compatibilization,
            Self::Biodegradability,
            Self::Processing,
            Self::Cost,
        ]
    }

    /// Short token used in the blend catalog's category column.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Mechanical => "MECH",
            Self::Thermal => "THERM",
            Self::Barrier => "BARRIER",
            Self::Compatibilization => "COMPAT",
            Self::Biodegradability => "BIO",
            Self::Processing => "PROC",
            Self::Cost => "COST",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Mechanical => "Mechanical",
            Self::Thermal => "Thermal",
            Self::Barrier => "Barrier",
            Self::Compatibilization => "Compatibilization",
            Self::Biodegradability => "Biodegradability",
            Self::Processing => "Processing",
            Self::Cost => "Cost Optimization",
        }
    }

    /// Resolve a catalog code or display name, case-insensitively.
    pub fn from_code(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ordered().into_iter().find(|category| {
            category.code().eq_ignore_ascii_case(trimmed)
                || category.label().eq_ignore_ascii_case(trimmed)
        })
    }
}

/// One row of the blend recommendation catalog. Weight percentages and
/// processing limits stay as spreadsheet text; they are displayed, not
/// computed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendRecord {
    pub base_polymer: String,
    pub ingredient: String,
    /// Raw category token string, e.g. "MECH, BARRIER".
    pub categories: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive_effect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_effect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_weight_pct: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_polymer_max_weight_pct: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_processing_temp_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_compostability_pct: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_limitations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}
