use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::domain::{MaterialRecord, Measurement, PolymerClass};

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<MaterialRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<MaterialRow>() {
        records.push(row?.into_record());
    }

    Ok(records)
}

/// Column names follow the source workbook's "Clean Data" sheet.
#[derive(Debug, Deserialize)]
struct MaterialRow {
    #[serde(rename = "Polymer Category")]
    category: String,
    #[serde(rename = "Polymer Grade")]
    grade: String,
    #[serde(
        rename = "Type of Polymer",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    polymer_type: Option<String>,
    #[serde(rename = "Supplier", default, deserialize_with = "empty_string_as_none")]
    supplier: Option<String>,
    #[serde(rename = "Continent", default, deserialize_with = "empty_string_as_none")]
    region: Option<String>,
    #[serde(
        rename = "Cost (USD/Kg)",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    cost: Option<String>,
    #[serde(
        rename = "Tensile Strength (MPa)",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    tensile_strength: Option<String>,
    #[serde(
        rename = "Elongation at break (%)",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    elongation_at_break: Option<String>,
    #[serde(
        rename = "WVTR 100um (g/m2.day)",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    wvtr_at_100_micron: Option<String>,
    #[serde(
        rename = "WVTR 20um (g/m2.day)",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    wvtr_at_20_micron: Option<String>,
    #[serde(rename = "BBC (%)", default, deserialize_with = "empty_string_as_none")]
    biobased_content: Option<String>,
    #[serde(
        rename = "Compostability",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    compostability: Option<String>,
    #[serde(
        rename = "Polymer Grade_Link",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    grade_link: Option<String>,
    #[serde(rename = "Cost_Link", default, deserialize_with = "empty_string_as_none")]
    cost_link: Option<String>,
    #[serde(
        rename = "Tensile Strength_Link",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    tensile_strength_link: Option<String>,
    #[serde(
        rename = "Elongation_Link",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    elongation_link: Option<String>,
    #[serde(rename = "BBC_Link", default, deserialize_with = "empty_string_as_none")]
    biobased_content_link: Option<String>,
}

impl MaterialRow {
    fn into_record(self) -> MaterialRecord {
        let class = self
            .polymer_type
            .as_deref()
            .map(PolymerClass::from_source)
            .unwrap_or(PolymerClass::Candidate);

        MaterialRecord {
            category: self.category,
            grade: self.grade,
            class,
            supplier: self.supplier,
            region: self.region,
            cost: Measurement::from_source(self.cost, self.cost_link),
            tensile_strength: Measurement::from_source(
                self.tensile_strength,
                self.tensile_strength_link,
            ),
            elongation_at_break: Measurement::from_source(
                self.elongation_at_break,
                self.elongation_link,
            ),
            wvtr_at_100_micron: Measurement::from_source(self.wvtr_at_100_micron, None),
            wvtr_at_20_micron: Measurement::from_source(self.wvtr_at_20_micron, None),
            biobased_content: Measurement::from_source(
                self.biobased_content,
                self.biobased_content_link,
            ),
            compostability: self.compostability,
            grade_link: self.grade_link,
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
