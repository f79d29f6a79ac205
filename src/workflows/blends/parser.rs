use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::domain::BlendRecord;

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<BlendRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<BlendRow>() {
        records.push(row?.into_record());
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct BlendRow {
    #[serde(rename = "Base Polymer")]
    base_polymer: String,
    #[serde(rename = "Ingredient")]
    ingredient: String,
    #[serde(rename = "Category (Property)", default)]
    categories: String,
    #[serde(
        rename = "Interaction Type",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    interaction_type: Option<String>,
    #[serde(
        rename = "Positive Effect",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    positive_effect: Option<String>,
    #[serde(
        rename = "Negative Effect",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    negative_effect: Option<String>,
    #[serde(
        rename = "Compatibility Type",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    compatibility_type: Option<String>,
    #[serde(
        rename = "Recommended wt%",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    recommended_weight_pct: Option<String>,
    #[serde(
        rename = "Base Polymer Max wt%",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    base_polymer_max_weight_pct: Option<String>,
    #[serde(
        rename = "Max Processing Temp (°C)",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    max_processing_temp_c: Option<String>,
    #[serde(
        rename = "Max Compostability (%)",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    max_compostability_pct: Option<String>,
    #[serde(
        rename = "Processing Notes",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    processing_notes: Option<String>,
    #[serde(
        rename = "Known Limitations",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    known_limitations: Option<String>,
    #[serde(rename = "Reference", default, deserialize_with = "empty_string_as_none")]
    reference: Option<String>,
}

impl BlendRow {
    fn into_record(self) -> BlendRecord {
        BlendRecord {
            base_polymer: self.base_polymer,
            ingredient: self.ingredient,
            categories: self.categories,
            interaction_type: self.interaction_type,
            positive_effect: self.positive_effect,
            negative_effect: self.negative_effect,
            compatibility_type: self.compatibility_type,
            recommended_weight_pct: self.recommended_weight_pct,
            base_polymer_max_weight_pct: self.base_polymer_max_weight_pct,
            max_processing_temp_c: self.max_processing_temp_c,
            max_compostability_pct: self.max_compostability_pct,
            processing_notes: self.processing_notes,
            known_limitations: self.known_limitations,
            reference: self.reference,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
