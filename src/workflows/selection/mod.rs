mod constraints;
mod normalizer;
mod parser;
mod rules;

pub mod domain;

pub use constraints::{AttributeRange, ConstraintSet};

use domain::{MaterialRecord, SelectionCriterion};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum MaterialCatalogError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for MaterialCatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialCatalogError::Io(err) => {
                write!(f, "failed to read material catalog: {}", err)
            }
            MaterialCatalogError::Csv(err) => {
                write!(f, "invalid material catalog data: {}", err)
            }
        }
    }
}

impl std::error::Error for MaterialCatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MaterialCatalogError::Io(err) => Some(err),
            MaterialCatalogError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for MaterialCatalogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for MaterialCatalogError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct MaterialCatalogImporter;

impl MaterialCatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<MaterialRecord>, MaterialCatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<MaterialRecord>, MaterialCatalogError> {
        Ok(parser::parse_records(reader)?)
    }
}

/// First record carrying a category + grade pair. Pairs are assumed unique;
/// the first match wins when a catalog violates that.
pub fn find_material<'a>(
    catalog: &'a [MaterialRecord],
    category: &str,
    grade: &str,
) -> Option<&'a MaterialRecord> {
    catalog
        .iter()
        .find(|record| record.category == category && record.grade == grade)
}

/// Outcome of one criterion applied to one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionCheck {
    pub criterion: SelectionCriterion,
    pub passed: bool,
    pub notes: String,
}

/// Derived per-record result of a ranking pass; recomputed from scratch each
/// run, never persisted across passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub record: MaterialRecord,
    pub score: usize,
    pub checks: Vec<CriterionCheck>,
}

impl EvaluationResult {
    pub fn passed(&self, criterion: SelectionCriterion) -> Option<bool> {
        self.checks
            .iter()
            .find(|check| check.criterion == criterion)
            .map(|check| check.passed)
    }
}

/// Stateless engine applying one constraint set to a material catalog.
pub struct RankingEngine {
    constraints: ConstraintSet,
}

impl RankingEngine {
    pub fn new(constraints: ConstraintSet) -> Self {
        Self { constraints }
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn evaluate(&self, record: &MaterialRecord) -> EvaluationResult {
        let checks = rules::evaluate_record(record, &self.constraints);
        let score = checks.iter().filter(|check| check.passed).count();

        EvaluationResult {
            record: record.clone(),
            score,
            checks,
        }
    }

    /// Evaluate the whole catalog and order the results: candidates before
    /// benchmarks regardless of score, each class descending by score, ties
    /// keeping catalog order. The sort is stable, so repeated runs over
    /// unchanged input produce identical output.
    pub fn rank(&self, catalog: &[MaterialRecord]) -> Vec<EvaluationResult> {
        let mut results: Vec<EvaluationResult> = catalog
            .iter()
            .map(|record| self.evaluate(record))
            .collect();

        results.sort_by_key(|result| (result.record.class, Reverse(result.score)));
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::domain::{Measurement, PolymerClass};
    use std::collections::BTreeSet;
    use std::io::Cursor;

    fn sample_record() -> MaterialRecord {
        MaterialRecord {
            category: "PLA".to_string(),
            grade: "L175".to_string(),
            class: PolymerClass::Candidate,
            supplier: Some("Total Corbion".to_string()),
            region: Some("Asia".to_string()),
            cost: Measurement::from_value(2.6),
            tensile_strength: Measurement::from_value(50.0),
            elongation_at_break: Measurement::from_value(160.0),
            wvtr_at_100_micron: Measurement::from_value(4.0),
            wvtr_at_20_micron: Measurement::from_value(9.0),
            biobased_content: Measurement::from_value(100.0),
            compostability: Some("TUV Home, BPI".to_string()),
            grade_link: None,
        }
    }

    fn open_constraints() -> ConstraintSet {
        ConstraintSet {
            cost: AttributeRange::new(0.0, 100.0),
            tensile_strength: AttributeRange::new(0.0, 1000.0),
            elongation_at_break: AttributeRange::new(0.0, 1000.0),
            wvtr: AttributeRange::new(0.0, 100.0),
            biobased_content: AttributeRange::new(0.0, 100.0),
            required_certifications: BTreeSet::new(),
            region: None,
        }
    }

    #[test]
    fn normalizer_returns_none_without_digits() {
        assert_eq!(normalizer::normalize_measurement(""), None);
        assert_eq!(normalizer::normalize_measurement("   "), None);
        assert_eq!(normalizer::normalize_measurement("n/a"), None);
        assert_eq!(normalizer::normalize_measurement("pending review"), None);
    }

    #[test]
    fn normalizer_passes_single_tokens_through() {
        assert_eq!(normalizer::normalize_measurement("42"), Some(42.0));
        assert_eq!(normalizer::normalize_measurement("3.5"), Some(3.5));
        assert_eq!(normalizer::normalize_measurement("≥ 3.5"), Some(3.5));
        assert_eq!(normalizer::normalize_measurement("≤10"), Some(10.0));
        assert_eq!(normalizer::normalize_measurement("< 10"), Some(10.0));
        assert_eq!(normalizer::normalize_measurement("> 10"), Some(10.0));
        assert_eq!(normalizer::normalize_measurement("*7.25"), Some(7.25));
    }

    #[test]
    fn normalizer_averages_multiple_tokens_order_independently() {
        assert_eq!(normalizer::normalize_measurement("5,10"), Some(7.5));
        assert_eq!(normalizer::normalize_measurement("10,5"), Some(7.5));
        assert_eq!(normalizer::normalize_measurement("5 - 10"), Some(7.5));
        assert_eq!(normalizer::normalize_measurement("3, 7"), Some(5.0));
    }

    #[test]
    fn normalizer_strips_thousands_separators() {
        assert_eq!(normalizer::normalize_measurement("1,200"), Some(1200.0));
    }

    #[test]
    fn normalizer_has_no_unit_awareness() {
        assert_eq!(normalizer::normalize_measurement("100 µm"), Some(100.0));
        assert_eq!(normalizer::normalize_measurement("2.4 USD/kg"), Some(2.4));
    }

    #[test]
    fn normalizer_rounds_means_to_two_decimals() {
        // (1 + 2 + 2.5) / 3 = 1.8333...
        assert_eq!(normalizer::normalize_measurement("1, 2, 2.5"), Some(1.83));
    }

    #[test]
    fn measurement_from_source_normalizes_ranged_text() {
        let measurement = Measurement::from_source(Some("3, 7".to_string()), None);
        assert_eq!(measurement.value, Some(5.0));
        assert_eq!(measurement.raw.as_deref(), Some("3, 7"));
    }

    #[test]
    fn fully_in_range_record_scores_every_criterion() {
        let engine = RankingEngine::new(open_constraints());
        let result = engine.evaluate(&sample_record());

        assert_eq!(result.checks.len(), 7);
        assert_eq!(result.score, result.checks.len());
    }

    #[test]
    fn absent_value_fails_its_range_check() {
        let mut record = sample_record();
        record.cost = Measurement::empty();

        let engine = RankingEngine::new(open_constraints());
        let result = engine.evaluate(&record);

        assert_eq!(result.passed(SelectionCriterion::Cost), Some(false));
        assert_eq!(result.score, result.checks.len() - 1);
    }

    #[test]
    fn certification_requirement_needs_every_label() {
        let mut constraints = open_constraints();
        constraints.required_certifications = BTreeSet::from(["BPI".to_string()]);

        let engine = RankingEngine::new(constraints);
        let result = engine.evaluate(&sample_record());
        assert_eq!(result.passed(SelectionCriterion::Compostability), Some(true));

        let mut constraints = open_constraints();
        constraints.required_certifications =
            BTreeSet::from(["BPI".to_string(), "TUV Industrial".to_string()]);

        let engine = RankingEngine::new(constraints);
        let result = engine.evaluate(&sample_record());
        assert_eq!(
            result.passed(SelectionCriterion::Compostability),
            Some(false)
        );
    }

    #[test]
    fn region_check_only_present_when_filter_set() {
        let engine = RankingEngine::new(open_constraints());
        let result = engine.evaluate(&sample_record());
        assert_eq!(result.passed(SelectionCriterion::Region), None);

        let mut constraints = open_constraints();
        constraints.region = Some("Asia".to_string());
        let engine = RankingEngine::new(constraints);
        let result = engine.evaluate(&sample_record());
        assert_eq!(result.passed(SelectionCriterion::Region), Some(true));

        let mut constraints = open_constraints();
        constraints.region = Some("Europe".to_string());
        let engine = RankingEngine::new(constraints);
        let result = engine.evaluate(&sample_record());
        assert_eq!(result.passed(SelectionCriterion::Region), Some(false));
    }

    #[test]
    fn inverted_range_fails_every_comparison() {
        let mut constraints = open_constraints();
        constraints.cost = AttributeRange::new(10.0, 1.0);

        let engine = RankingEngine::new(constraints);
        let result = engine.evaluate(&sample_record());
        assert_eq!(result.passed(SelectionCriterion::Cost), Some(false));
    }

    #[test]
    fn importer_maps_workbook_columns_and_blank_cells() {
        let csv = "\
Polymer Category,Polymer Grade,Type of Polymer,Supplier,Continent,Cost (USD/Kg),Tensile Strength (MPa),Elongation at break (%),WVTR 100um (g/m2.day),WVTR 20um (g/m2.day),BBC (%),Compostability,Polymer Grade_Link
PLA,L175,Biopolymer,Total Corbion,Asia,\"2.4, 2.8\",≥ 50,100-200,4,,100,\"TUV Home, BPI\",https://example.com/l175
LDPE,FT5230,Benchmark,Borealis,Europe,1.2,10,600,1.5,7,0,,
";
        let records =
            MaterialCatalogImporter::from_reader(Cursor::new(csv)).expect("catalog parses");

        assert_eq!(records.len(), 2);

        let pla = &records[0];
        assert_eq!(pla.class, PolymerClass::Candidate);
        assert_eq!(pla.cost.value, Some(2.6));
        assert_eq!(pla.tensile_strength.value, Some(50.0));
        assert_eq!(pla.elongation_at_break.value, Some(150.0));
        assert_eq!(pla.wvtr_at_20_micron.value, None);
        assert_eq!(pla.grade_link.as_deref(), Some("https://example.com/l175"));
        assert_eq!(pla.certification_labels(), vec!["TUV Home", "BPI"]);

        let ldpe = &records[1];
        assert_eq!(ldpe.class, PolymerClass::Benchmark);
        assert!(ldpe.compostability.is_none());
        assert!(ldpe.certification_labels().is_empty());
    }
}
