mod insight;
mod parser;

pub mod domain;

pub use insight::{
    blend_insight_request, material_summary_request, InsightClient, InsightError, InsightRequest,
};

use domain::{BlendRecord, OptimizationCategory};
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum BlendCatalogError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for BlendCatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlendCatalogError::Io(err) => write!(f, "failed to read blend catalog: {}", err),
            BlendCatalogError::Csv(err) => write!(f, "invalid blend catalog data: {}", err),
        }
    }
}

impl std::error::Error for BlendCatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlendCatalogError::Io(err) => Some(err),
            BlendCatalogError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BlendCatalogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BlendCatalogError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct BlendCatalogImporter;

impl BlendCatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<BlendRecord>, BlendCatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<BlendRecord>, BlendCatalogError> {
        Ok(parser::parse_records(reader)?)
    }
}

/// Records recommending additives for one base polymer on one property axis.
/// Base polymer matches case-insensitively; the category matches when the
/// record's raw token string contains the category code. Catalog order is
/// preserved and an empty result is a reportable outcome, not an error.
pub fn find_blends<'a>(
    records: &'a [BlendRecord],
    base_polymer: &str,
    category: OptimizationCategory,
) -> Vec<&'a BlendRecord> {
    records
        .iter()
        .filter(|record| record.base_polymer.eq_ignore_ascii_case(base_polymer))
        .filter(|record| record.categories.contains(category.code()))
        .collect()
}
