use arrow::array::{BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_writer::ArrowWriter;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::error::AllocationError;
use crate::report::ApproachResult;
use crate::types::Cost;

#[derive(Clone, Debug, PartialEq)]
pub struct IterationRecord {
    pub iteration: usize,
    pub candidate_cost: Cost,
    pub candidate_seen: usize,
    pub current_cost: Cost,
    pub best_cost: Cost,
    pub accepted: bool,
    pub time: f64,
    pub temperature: f64,
}

pub fn serialize_to_parquet(
    iteration_data: &[IterationRecord],
    path: &Path,
) -> Result<(), AllocationError> {
    let iterations: Int64Array = iteration_data.iter().map(|d| d.iteration as i64).collect();
    let candidate_costs: Int64Array = iteration_data.iter().map(|d| d.candidate_cost as i64).collect();
    let candidate_observations: Int64Array = iteration_data.iter().map(|d| d.candidate_seen as i64).collect();
    let current_costs: Int64Array = iteration_data.iter().map(|d| d.current_cost as i64).collect();
    let best_costs: Int64Array = iteration_data.iter().map(|d| d.best_cost as i64).collect();
    let accepted: BooleanArray = iteration_data.iter().map(|d| Some(d.accepted)).collect();
    let times: Float64Array = iteration_data.iter().map(|d| d.time).collect();
    let temperatures: Float64Array = iteration_data.iter().map(|d| d.temperature).collect();

    // Arrow schema
    let schema = Schema::new(vec![
        Field::new("iteration", DataType::Int64, false),
        Field::new("candidate_cost", DataType::Int64, false),
        Field::new("candidate_seen", DataType::Int64, false),
        Field::new("current_cost", DataType::Int64, false),
        Field::new("best_cost", DataType::Int64, false),
        Field::new("accepted", DataType::Boolean, false),
        Field::new("time", DataType::Float64, false),
        Field::new("temperature", DataType::Float64, false),
    ]);

    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(iterations),
            Arc::new(candidate_costs),
            Arc::new(candidate_observations),
            Arc::new(current_costs),
            Arc::new(best_costs),
            Arc::new(accepted),
            Arc::new(times),
            Arc::new(temperatures),
        ],
    )?;

    write_batch(&batch, path)
}

/// Writes one row per approach; success and time are null for the naive baseline.
pub fn comparison_to_parquet(
    results: &[ApproachResult],
    naive_cost: Cost,
    path: &Path,
) -> Result<(), AllocationError> {
    let approaches = StringArray::from_iter_values(results.iter().map(|r| r.approach.as_str()));
    let costs: Int64Array = results.iter().map(|r| r.cost as i64).collect();
    let success_rates: Float64Array = results
        .iter()
        .map(|r| r.validation.map(|v| v.success_rate))
        .collect();
    let mean_times: Float64Array = results
        .iter()
        .map(|r| r.validation.map(|v| v.mean_time))
        .collect();
    let savings: Float64Array = results
        .iter()
        .map(|r| r.savings(naive_cost))
        .collect();

    let schema = Schema::new(vec![
        Field::new("approach", DataType::Utf8, false),
        Field::new("cost", DataType::Int64, false),
        Field::new("success_rate", DataType::Float64, true),
        Field::new("mean_time", DataType::Float64, true),
        Field::new("savings", DataType::Float64, true),
    ]);

    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(approaches),
            Arc::new(costs),
            Arc::new(success_rates),
            Arc::new(mean_times),
            Arc::new(savings),
        ],
    )?;

    write_batch(&batch, path)
}

fn write_batch(batch: &RecordBatch, path: &Path) -> Result<(), AllocationError> {
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationReport;
    use arrow::array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    fn read_back(path: &Path) -> RecordBatch {
        let file = File::open(path).unwrap();
        let mut reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        reader.next().unwrap().unwrap()
    }

    #[test]
    fn test_trace_written_with_all_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.parquet");
        let records = vec![
            IterationRecord {
                iteration: 0,
                candidate_cost: 120,
                candidate_seen: 1,
                current_cost: 120,
                best_cost: 120,
                accepted: true,
                time: 0.001,
                temperature: 1.0,
            },
            IterationRecord {
                iteration: 1,
                candidate_cost: 150,
                candidate_seen: 1,
                current_cost: 120,
                best_cost: 120,
                accepted: false,
                time: 0.001,
                temperature: 0.5,
            },
        ];

        serialize_to_parquet(&records, &path).unwrap();
        let batch = read_back(&path);

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 8);
        let accepted = batch
            .column_by_name("accepted")
            .unwrap()
            .as_any()
            .downcast_ref::<BooleanArray>()
            .unwrap();
        assert!(accepted.value(0));
        assert!(!accepted.value(1));
    }

    #[test]
    fn test_comparison_nulls_for_naive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comparison.parquet");
        let results = vec![
            ApproachResult {
                approach: "Smart Greedy".to_string(),
                cost: 900,
                validation: Some(ValidationReport {
                    success_rate: 0.98,
                    mean_time: 210.0,
                    trials: 100,
                }),
            },
            ApproachResult::naive(1000),
        ];

        comparison_to_parquet(&results, 1000, &path).unwrap();
        let batch = read_back(&path);

        let success = batch
            .column_by_name("success_rate")
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(success.value(0), 0.98);
        assert!(success.is_null(1));
    }
}
