use serde::{Deserialize, Serialize};

use super::normalizer::normalize_measurement;

/// Role a record plays in ranking output: proposed material or comparison benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolymerClass {
    Candidate,
    Benchmark,
}

impl PolymerClass {
    pub const fn ordered() -> [Self; 2] {
        [Self::Candidate, Self::Benchmark]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Candidate => "Biopolymer",
            Self::Benchmark => "Benchmark",
        }
    }

    /// Catalog sources label benchmarks explicitly; anything else is a candidate.
    pub(crate) fn from_source(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "benchmark" | "reference" => Self::Benchmark,
            _ => Self::Candidate,
        }
    }
}

/// Attribute evaluated during a ranking pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionCriterion {
    Cost,
    TensileStrength,
    ElongationAtBreak,
    WvtrAt100Micron,
    WvtrAt20Micron,
    BiobasedContent,
    Compostability,
    Region,
}

impl SelectionCriterion {
    /// The criteria checked against a numeric acceptance window.
    pub const fn ranged() -> [Self; 6] {
        [
            Self::Cost,
            Self::TensileStrength,
            Self::ElongationAtBreak,
            Self::WvtrAt100Micron,
            Self::WvtrAt20Micron,
            Self::BiobasedContent,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Cost => "Cost (USD/kg)",
            Self::TensileStrength => "Tensile Strength (MPa)",
            Self::ElongationAtBreak => "Elongation at Break (%)",
            Self::WvtrAt100Micron => "WVTR @100µm (g/m²·day)",
            Self::WvtrAt20Micron => "WVTR @20µm (g/m²·day)",
            Self::BiobasedContent => "Biobased Content (%)",
            Self::Compostability => "Compostability",
            Self::Region => "Region",
        }
    }
}

/// Normalized measurement keeping the spreadsheet text and source link alongside the number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Measurement {
    /// Build from a raw catalog cell, normalizing the text into a representative number.
    pub fn from_source(raw: Option<String>, link: Option<String>) -> Self {
        let value = raw.as_deref().and_then(normalize_measurement);
        Self { value, raw, link }
    }

    pub fn from_value(value: f64) -> Self {
        Self {
            value: Some(value),
            raw: None,
            link: None,
        }
    }

    pub const fn empty() -> Self {
        Self {
            value: None,
            raw: None,
            link: None,
        }
    }
}

/// One row of the material catalog. Immutable during a ranking pass; the
/// engine produces derived results rather than editing records in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub category: String,
    pub grade: String,
    pub class: PolymerClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub cost: Measurement,
    pub tensile_strength: Measurement,
    pub elongation_at_break: Measurement,
    pub wvtr_at_100_micron: Measurement,
    pub wvtr_at_20_micron: Measurement,
    pub biobased_content: Measurement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compostability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_link: Option<String>,
}

impl MaterialRecord {
    /// Measurement backing a ranged criterion; `None` for the set-based checks.
    pub fn measurement(&self, criterion: SelectionCriterion) -> Option<&Measurement> {
        match criterion {
            SelectionCriterion::Cost => Some(&self.cost),
            SelectionCriterion::TensileStrength => Some(&self.tensile_strength),
            SelectionCriterion::ElongationAtBreak => Some(&self.elongation_at_break),
            SelectionCriterion::WvtrAt100Micron => Some(&self.wvtr_at_100_micron),
            SelectionCriterion::WvtrAt20Micron => Some(&self.wvtr_at_20_micron),
            SelectionCriterion::BiobasedContent => Some(&self.biobased_content),
            SelectionCriterion::Compostability | SelectionCriterion::Region => None,
        }
    }

    /// Comma-separated certification labels from the compostability cell.
    pub fn certification_labels(&self) -> Vec<&str> {
        self.compostability
            .as_deref()
            .map(|cell| {
                cell.split(',')
                    .map(str::trim)
                    .filter(|label| !label.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}
