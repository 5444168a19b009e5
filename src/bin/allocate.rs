use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::{error, info};

use quotapack::compare::compare;
use quotapack::metrics;
use quotapack::registry::Registry;
use quotapack::report::PackingSummary;
use quotapack::utils::{Args, Parser, enumerate_input_files};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let instance_files = enumerate_input_files(&args)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "Using random seed");

    let params = args.params(seed);
    params.validate()?;

    for dir in [&args.output_dir, &args.trace].into_iter().flatten() {
        fs::create_dir_all(dir)?;
    }

    for path in instance_files {
        let setup_time = Instant::now();

        let registry = match Registry::load(&path) {
            Ok(r) => r,
            Err(e) => {
                error!(path = %path.display(), "Failed to load categories: {}", e);
                continue;
            }
        };

        let base_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("categories")
            .to_string();

        println!("------");
        println!("Instance: {}", path.display());
        println!("Categories: {}", registry.len());

        let start_time = Instant::now();

        let mut trace = Vec::with_capacity(params.n_iterations);
        let trace_data = if args.trace.is_some() { Some(&mut trace) } else { None };

        let comparison = match compare(&registry, &params, trace_data) {
            Ok(c) => c,
            Err(e) => {
                error!(path = %path.display(), "Allocation failed: {}", e);
                continue;
            }
        };

        println!(
            "Time computing: {:?} ({:?} setup)",
            start_time.elapsed(),
            start_time - setup_time
        );
        println!();
        println!("{}", comparison.table());
        println!();

        for run in &comparison.runs {
            let summary = PackingSummary::new(&run.packing, &params);
            println!(
                "{}: {} structures, {:.1} categories each, {:.0}% max fill{}",
                run.strategy.label(),
                summary.structures,
                summary.mean_categories,
                summary.max_fill * 100.0,
                if summary.over_budget > 0 {
                    format!(", {} isolated over budget", summary.over_budget)
                } else {
                    String::new()
                }
            );
        }

        if let Some(dir) = &args.output_dir {
            let out = Path::new(dir).join(format!("comparison_{}.parquet", base_name));
            metrics::comparison_to_parquet(&comparison.results(), comparison.naive_cost, &out)?;
            info!(path = %out.display(), "Wrote comparison");
        }

        if let Some(dir) = &args.trace {
            let out = Path::new(dir).join(format!("annealing_{}.parquet", base_name));
            metrics::serialize_to_parquet(&trace, &out)?;
            info!(path = %out.display(), iterations = trace.len(), "Wrote annealing trace");
        }
    }

    Ok(())
}
