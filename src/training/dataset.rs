// src/training/dataset.rs
use crate::model::schema::TARGET_COLUMN;
use crate::model::{ColumnSchema, ListingRecord};
use crate::training::TrainingError;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Cell contents read as missing, matching common CSV exports.
const MISSING_MARKERS: [&str; 6] = ["", "NA", "N/A", "NaN", "nan", "null"];

/// Historical listings with their (possibly missing) log-price labels.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<ListingRecord>,
    pub targets: Vec<Option<f64>>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn from_path(path: &Path, schema: &ColumnSchema) -> Result<Self, TrainingError> {
        let file = File::open(path)?;
        let dataset = Self::from_reader(file, schema)?;
        info!(
            path = %path.display(),
            rows = dataset.len(),
            "training data loaded"
        );
        Ok(dataset)
    }

    /// Read a headered CSV. Numeric schema columns are parsed as numbers;
    /// every other column is kept as text.
    pub fn from_reader<R: Read>(reader: R, schema: &ColumnSchema) -> Result<Self, TrainingError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = reader.headers()?.clone();

        let target_idx = headers
            .iter()
            .position(|h| h == TARGET_COLUMN)
            .ok_or_else(|| TrainingError::MissingTarget(TARGET_COLUMN.to_string()))?;

        let mut dataset = Dataset::default();
        let mut unparsable = 0usize;

        for (line, row) in reader.records().enumerate() {
            let row = row?;
            let mut record = ListingRecord::new();
            let mut target = None;

            for (idx, (column, cell)) in headers.iter().zip(row.iter()).enumerate() {
                let cell = cell.trim();
                if MISSING_MARKERS.contains(&cell) {
                    continue;
                }

                if idx == target_idx {
                    target = parse_number(cell, column, line, &mut unparsable);
                } else if schema.is_numeric(column) {
                    record.set_number(column, parse_number(cell, column, line, &mut unparsable));
                } else {
                    record.set_text(column, Some(cell.to_string()));
                }
            }

            dataset.records.push(record);
            dataset.targets.push(target);
        }

        if unparsable > 0 {
            warn!(cells = unparsable, "unparsable numeric cells treated as missing");
        }
        Ok(dataset)
    }
}

fn parse_number(cell: &str, column: &str, line: usize, unparsable: &mut usize) -> Option<f64> {
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            *unparsable += 1;
            if *unparsable <= 5 {
                warn!(column, line, cell, "numeric cell could not be parsed");
            }
            None
        }
    }
}
