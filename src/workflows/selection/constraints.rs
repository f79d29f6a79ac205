use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::domain::SelectionCriterion;

/// Inclusive acceptance window for one ranged criterion. A window with
/// `min > max` is well-defined and simply fails every comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeRange {
    pub min: f64,
    pub max: f64,
}

impl AttributeRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub(crate) fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// User-declared acceptance windows for one ranking pass. Replaced wholesale
/// on each form submission, never merged, and never read from ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSet {
    pub cost: AttributeRange,
    pub tensile_strength: AttributeRange,
    pub elongation_at_break: AttributeRange,
    /// One window applied at both film thickness conditions.
    pub wvtr: AttributeRange,
    pub biobased_content: AttributeRange,
    #[serde(default)]
    pub required_certifications: BTreeSet<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl ConstraintSet {
    /// The input form's defaults, including the fixed Asia region filter the
    /// selection flow currently ships with.
    pub fn baseline() -> Self {
        Self {
            cost: AttributeRange::new(1.0, 10.0),
            tensile_strength: AttributeRange::new(20.0, 100.0),
            elongation_at_break: AttributeRange::new(100.0, 600.0),
            wvtr: AttributeRange::new(1.0, 10.0),
            biobased_content: AttributeRange::new(0.0, 100.0),
            required_certifications: BTreeSet::new(),
            region: Some("Asia".to_string()),
        }
    }

    pub(crate) fn range_for(&self, criterion: SelectionCriterion) -> Option<&AttributeRange> {
        match criterion {
            SelectionCriterion::Cost => Some(&self.cost),
            SelectionCriterion::TensileStrength => Some(&self.tensile_strength),
            SelectionCriterion::ElongationAtBreak => Some(&self.elongation_at_break),
            SelectionCriterion::WvtrAt100Micron | SelectionCriterion::WvtrAt20Micron => {
                Some(&self.wvtr)
            }
            SelectionCriterion::BiobasedContent => Some(&self.biobased_content),
            SelectionCriterion::Compostability | SelectionCriterion::Region => None,
        }
    }

    /// The region filter, when one is actually set. Blank strings disable it.
    pub(crate) fn region_filter(&self) -> Option<&str> {
        self.region
            .as_deref()
            .map(str::trim)
            .filter(|region| !region.is_empty())
    }
}
