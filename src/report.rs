use std::fmt;

use crate::packing::Packing;
use crate::params::Params;
use crate::types::Cost;
use crate::validation::ValidationReport;

pub const NAIVE_LABEL: &str = "Naive";

/// Cost and validation outcome of one approach.
#[derive(Clone, Debug, PartialEq)]
pub struct ApproachResult {
    pub approach: String,
    pub cost: Cost,
    /// `None` for the naive baseline, which is never simulated.
    pub validation: Option<ValidationReport>,
}

impl ApproachResult {
    pub fn naive(cost: Cost) -> Self {
        ApproachResult {
            approach: NAIVE_LABEL.to_string(),
            cost,
            validation: None,
        }
    }

    /// Percentage of respondents saved relative to `naive_cost`.
    /// Negative when sharing costs more; `None` when the baseline is zero.
    pub fn savings(&self, naive_cost: Cost) -> Option<f64> {
        (naive_cost > 0).then(|| (1.0 - self.cost as f64 / naive_cost as f64) * 100.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComparisonRow {
    pub approach: String,
    pub cost: Cost,
    pub success: String,
    pub time: String,
    pub savings: String,
}

/// The approach comparison, cheapest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComparisonTable {
    rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    const HEADERS: [&'static str; 5] = ["Approach", "Cost", "Success", "Time", "Savings"];

    pub fn new(results: &[ApproachResult], naive_cost: Cost) -> Self {
        let mut rows: Vec<ComparisonRow> = results
            .iter()
            .map(|result| {
                let (success, time) = match result.validation {
                    Some(v) => (
                        format!("{:.1}%", v.success_rate * 100.0),
                        format!("{:.1}s", v.mean_time),
                    ),
                    None => ("-".to_string(), "-".to_string()),
                };
                let savings = if result.validation.is_none() && result.approach == NAIVE_LABEL {
                    "0%".to_string()
                } else {
                    result
                        .savings(naive_cost)
                        .map_or_else(|| "-".to_string(), |s| format!("{:.1}%", s))
                };

                ComparisonRow {
                    approach: result.approach.clone(),
                    cost: result.cost,
                    success,
                    time,
                    savings,
                }
            })
            .collect();

        rows.sort_by_key(|row| row.cost);

        ComparisonTable { rows }
    }

    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    fn cells(row: &ComparisonRow) -> [String; 5] {
        [
            row.approach.clone(),
            row.cost.to_string(),
            row.success.clone(),
            row.time.clone(),
            row.savings.clone(),
        ]
    }
}

impl fmt::Display for ComparisonTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<[String; 5]> = self.rows.iter().map(Self::cells).collect();

        let mut widths = Self::HEADERS.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let header: Vec<String> = Self::HEADERS
            .iter()
            .zip(widths)
            .map(|(h, w)| format!("{:>w$}", h, w = w))
            .collect();
        write!(f, "{}", header.join(" "))?;

        for row in &cells {
            let line: Vec<String> = row
                .iter()
                .zip(widths)
                .map(|(c, w)| format!("{:>w$}", c, w = w))
                .collect();
            write!(f, "\n{}", line.join(" "))?;
        }

        Ok(())
    }
}

/// Shape of a packing, for display next to the comparison table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackingSummary {
    pub structures: usize,
    pub mean_categories: f64,
    /// Highest expected time of a structure as a fraction of the budget.
    pub max_fill: f64,
    pub over_budget: usize,
}

impl PackingSummary {
    pub fn new(packing: &Packing, params: &Params) -> Self {
        let structures = packing.len();
        let categories: usize = packing.structures().iter().map(|s| s.len()).sum();
        let max_time = packing
            .structures()
            .iter()
            .map(|s| s.expected_time())
            .fold(0.0, f64::max);

        PackingSummary {
            structures,
            mean_categories: if structures > 0 {
                categories as f64 / structures as f64
            } else {
                0.0
            },
            max_fill: max_time / params.time_budget,
            over_budget: packing.over_budget().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::packing::{PackingBuilder, StructureBuilder};

    fn validated(approach: &str, cost: Cost, success_rate: f64, mean_time: f64) -> ApproachResult {
        ApproachResult {
            approach: approach.to_string(),
            cost,
            validation: Some(ValidationReport {
                success_rate,
                mean_time,
                trials: 1000,
            }),
        }
    }

    #[test]
    fn test_rows_sorted_by_cost() {
        let results = vec![
            validated("Smart Greedy", 2700, 0.999, 12.34),
            validated("Incidence Banding", 3050, 1.0, 8.0),
            ApproachResult::naive(2623),
        ];

        let table = ComparisonTable::new(&results, 2623);
        let order: Vec<&str> = table.rows().iter().map(|r| r.approach.as_str()).collect();

        assert_eq!(order, vec!["Naive", "Smart Greedy", "Incidence Banding"]);
    }

    #[test]
    fn test_cell_formatting() {
        let results = vec![validated("Simulated Annealing", 750, 0.934, 123.45), ApproachResult::naive(1000)];

        let table = ComparisonTable::new(&results, 1000);
        let annealing = &table.rows()[0];
        let naive = &table.rows()[1];

        assert_eq!(annealing.success, "93.4%");
        assert_eq!(annealing.time, "123.5s");
        assert_eq!(annealing.savings, "25.0%");
        assert_eq!(naive.success, "-");
        assert_eq!(naive.time, "-");
        assert_eq!(naive.savings, "0%");
    }

    #[test]
    fn test_negative_savings_when_sharing_costs_more() {
        let result = validated("Smart Greedy", 2700, 1.0, 10.0);
        let savings = result.savings(2623).unwrap();
        assert!(savings < 0.0);
        assert_eq!(ComparisonTable::new(&[result], 2623).rows()[0].savings, "-2.9%");
    }

    #[test]
    fn test_display_aligns_columns() {
        let results = vec![validated("Smart Greedy", 900, 0.5, 1.0), ApproachResult::naive(1000)];
        let rendered = ComparisonTable::new(&results, 1000).to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].trim_start().starts_with("Approach"));
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
    }

    #[test]
    fn test_packing_summary() {
        let registry = fixtures::registry(&[(0.5, 480.0), (0.5, 240.0), (0.5, 240.0)]);
        let params = Params::default();
        let mut packing = PackingBuilder::new();
        packing.close(StructureBuilder::with(&registry.categories()[0]), &params);
        let mut pair = StructureBuilder::with(&registry.categories()[1]);
        pair.push(&registry.categories()[2]);
        packing.close(pair, &params);

        let summary = PackingSummary::new(&packing.build(), &params);

        assert_eq!(summary.structures, 2);
        assert_eq!(summary.mean_categories, 1.5);
        assert_eq!(summary.max_fill, 0.5);
        assert_eq!(summary.over_budget, 0);
    }
}
