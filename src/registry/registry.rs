use arrow::array::{Array, Float64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::AllocationError;
use crate::registry::{Category, CategoryRecord};
use crate::types::{CategoryId, Seconds};

pub const KEY_COLUMN: &str = "category_id";
pub const NAME_COLUMN: &str = "category_name";
pub const INCIDENCE_COLUMN: &str = "incidence_rate";
pub const LENGTH_COLUMN: &str = "category_length_seconds";

/// The validated, immutable set of categories for one run.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    categories: Vec<Category>,
}

impl Registry {
    /// Validates raw records and assigns dense ids in input order.
    ///
    /// Fails on the first record with a missing or non-positive incidence rate,
    /// an incidence above 1, a negative or non-finite length, or a repeated key.
    pub fn from_records(records: Vec<CategoryRecord>) -> Result<Self, AllocationError> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut categories = Vec::with_capacity(records.len());

        for (i, record) in records.into_iter().enumerate() {
            let location = format!("category '{}'", record.key);

            let incidence_rate = record
                .incidence_rate
                .ok_or_else(|| AllocationError::data(&location, "missing incidence_rate"))?;
            if !incidence_rate.is_finite() || incidence_rate <= 0.0 {
                return Err(AllocationError::data(
                    &location,
                    format!("incidence_rate must be positive, got {}", incidence_rate),
                ));
            }
            if incidence_rate > 1.0 {
                return Err(AllocationError::data(
                    &location,
                    format!("incidence_rate must not exceed 1, got {}", incidence_rate),
                ));
            }
            if !record.length_seconds.is_finite() || record.length_seconds < 0.0 {
                return Err(AllocationError::data(
                    &location,
                    format!(
                        "category_length_seconds must be non-negative, got {}",
                        record.length_seconds
                    ),
                ));
            }
            if !seen.insert(record.key.clone()) {
                return Err(AllocationError::data(&location, "duplicate category_id"));
            }

            let id = CategoryId::from_index(i)
                .ok_or_else(|| AllocationError::data(&location, "too many categories"))?;

            categories.push(Category {
                id,
                key: record.key,
                name: record.name,
                incidence_rate,
                length_seconds: record.length_seconds,
            });
        }

        Ok(Registry { categories })
    }

    /// Loads categories from a parquet file, or from CSV for any other extension.
    pub fn load(path: &Path) -> Result<Self, AllocationError> {
        let is_parquet = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));

        if is_parquet {
            Self::load_parquet(path)
        } else {
            let file = File::open(path)?;
            Self::parse_csv(BufReader::new(file))
        }
    }

    /// Parses CSV with a header row; columns may appear in any order.
    pub fn parse_csv<R: BufRead>(reader: R) -> Result<Self, AllocationError> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(i, line)| line.map(|l| (i + 1, l)))
            .filter(|line| match line {
                Ok((_, s)) => !s.trim().is_empty(),
                Err(_) => true,
            });

        let (_, header_line) = lines
            .next()
            .ok_or_else(|| AllocationError::data("header", "input is empty"))??;
        let header: Vec<String> = split_fields(&header_line)
            .ok_or_else(|| AllocationError::data("header", "unterminated quoted field"))?
            .into_iter()
            .map(|h| h.to_ascii_lowercase())
            .collect();

        let column = |name: &str| {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| AllocationError::data("header", format!("missing column '{}'", name)))
        };
        let key_idx = column(KEY_COLUMN)?;
        let name_idx = column(NAME_COLUMN)?;
        let incidence_idx = column(INCIDENCE_COLUMN)?;
        let length_idx = column(LENGTH_COLUMN)?;
        let required = key_idx.max(name_idx).max(incidence_idx).max(length_idx) + 1;

        let mut records = Vec::new();
        for line in lines {
            let (number, line) = line?;
            let location = format!("line {}", number);
            let parts = split_fields(&line)
                .ok_or_else(|| AllocationError::data(&location, "unterminated quoted field"))?;
            if parts.len() < required {
                return Err(AllocationError::data(
                    location,
                    format!("expected {} fields, found {}", required, parts.len()),
                ));
            }

            let incidence_rate = match parts[incidence_idx].as_str() {
                "" => None,
                raw => Some(raw.parse::<f64>().map_err(|e| {
                    AllocationError::data(&location, format!("bad incidence_rate '{}': {}", raw, e))
                })?),
            };
            let length_seconds: Seconds = parts[length_idx].parse().map_err(|e| {
                AllocationError::data(
                    &location,
                    format!("bad category_length_seconds '{}': {}", parts[length_idx], e),
                )
            })?;

            records.push(CategoryRecord {
                key: parts[key_idx].clone(),
                name: parts[name_idx].clone(),
                incidence_rate,
                length_seconds,
            });
        }

        Self::from_records(records)
    }

    pub fn load_parquet(path: &Path) -> Result<Self, AllocationError> {
        let file = File::open(path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut records = Vec::new();
        for batch in reader {
            let batch = batch?;
            let keys = string_column(&batch, KEY_COLUMN)?;
            let names = string_column(&batch, NAME_COLUMN)?;
            let rates = float_column(&batch, INCIDENCE_COLUMN)?;
            let lengths = float_column(&batch, LENGTH_COLUMN)?;

            for row in 0..batch.num_rows() {
                let location = format!("row {}", records.len() + 1);
                if keys.is_null(row) {
                    return Err(AllocationError::data(location, "missing category_id"));
                }
                if lengths.is_null(row) {
                    return Err(AllocationError::data(location, "missing category_length_seconds"));
                }
                records.push(CategoryRecord {
                    key: keys.value(row).to_string(),
                    name: if names.is_null(row) {
                        String::new()
                    } else {
                        names.value(row).to_string()
                    },
                    incidence_rate: (!rates.is_null(row)).then(|| rates.value(row)),
                    length_seconds: lengths.value(row),
                });
            }
        }

        Self::from_records(records)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[inline(always)]
    pub fn get(&self, id: CategoryId) -> &Category {
        &self.categories[id.index()]
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.categories.iter().map(|c| c.id)
    }

    /// Category ids ordered rarest first. Ties keep input order.
    pub fn by_incidence(&self) -> Vec<CategoryId> {
        let mut ids: Vec<CategoryId> = self.ids().collect();
        ids.sort_by(|a, b| {
            self.get(*a)
                .incidence_rate
                .total_cmp(&self.get(*b).incidence_rate)
        });
        ids
    }
}

/// Splits one CSV record on commas outside double quotes. Quotes are dropped
/// and `""` inside a quoted field is a literal quote. `None` if a quote is
/// left open.
fn split_fields(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return None;
    }
    fields.push(field.trim().to_string());
    Some(fields)
}

fn string_column(batch: &RecordBatch, name: &str) -> Result<StringArray, AllocationError> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| AllocationError::data("schema", format!("missing column '{}'", name)))?;
    let cast = arrow::compute::cast(column.as_ref(), &DataType::Utf8)?;
    cast.as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| AllocationError::data("schema", format!("column '{}' is not text", name)))
}

fn float_column(batch: &RecordBatch, name: &str) -> Result<Float64Array, AllocationError> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| AllocationError::data("schema", format!("missing column '{}'", name)))?;
    let cast = arrow::compute::cast(column.as_ref(), &DataType::Float64)?;
    cast.as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| AllocationError::data("schema", format!("column '{}' is not numeric", name)))
}
