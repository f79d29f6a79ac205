use super::constraints::ConstraintSet;
use super::domain::{MaterialRecord, SelectionCriterion};
use super::CriterionCheck;

/// Apply every constraint to one record, independently. No check
/// short-circuits another, so callers can render exactly which criteria a
/// record missed. An absent value never silently passes a ranged check.
pub(crate) fn evaluate_record(
    record: &MaterialRecord,
    constraints: &ConstraintSet,
) -> Vec<CriterionCheck> {
    let mut checks = Vec::new();

    for criterion in SelectionCriterion::ranged() {
        let Some(range) = constraints.range_for(criterion) else {
            continue;
        };

        let value = record
            .measurement(criterion)
            .and_then(|measurement| measurement.value);

        let (passed, notes) = match value {
            Some(value) if range.contains(value) => (
                true,
                format!("{value:.2} within {:.2}..{:.2}", range.min, range.max),
            ),
            Some(value) => (
                false,
                format!("{value:.2} outside {:.2}..{:.2}", range.min, range.max),
            ),
            None => (false, "no usable value".to_string()),
        };

        checks.push(CriterionCheck {
            criterion,
            passed,
            notes,
        });
    }

    checks.push(certification_check(record, constraints));

    if let Some(region) = constraints.region_filter() {
        let record_region = record.region.as_deref().map(str::trim).unwrap_or("");
        let passed = record_region == region;
        let notes = if passed {
            format!("marketed for {region}")
        } else if record_region.is_empty() {
            format!("no region listed, {region} required")
        } else {
            format!("{record_region} does not match {region}")
        };

        checks.push(CriterionCheck {
            criterion: SelectionCriterion::Region,
            passed,
            notes,
        });
    }

    checks
}

fn certification_check(record: &MaterialRecord, constraints: &ConstraintSet) -> CriterionCheck {
    let labels = record.certification_labels();
    let missing: Vec<&str> = constraints
        .required_certifications
        .iter()
        .map(String::as_str)
        .filter(|required| !labels.iter().any(|label| label == required))
        .collect();

    let passed = missing.is_empty();
    let notes = if constraints.required_certifications.is_empty() {
        "no certifications required".to_string()
    } else if passed {
        format!(
            "holds {}",
            constraints
                .required_certifications
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )
    } else {
        format!("missing {}", missing.join(", "))
    };

    CriterionCheck {
        criterion: SelectionCriterion::Compostability,
        passed,
        notes,
    }
}
