use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::params::{self, CapacityPolicy, Params};

#[derive(Parser, Debug)]
#[command(about = "Packs survey categories into shared structures and compares strategies")]
pub struct Args {
    /// Path to a directory containing category files, or a base path for category files
    #[arg(short, long)]
    prefix: Option<String>,

    /// Path to one or more category files (.csv or .parquet)
    #[arg(short, long)]
    file: Option<Vec<String>>,

    /// Safety multiplier on the raw respondent requirement
    #[arg(short, long, default_value_t = params::BUFFER)]
    pub buffer: f64,

    /// Expected seconds allowed per respondent in one structure
    #[arg(long, default_value_t = params::TIME_BUDGET)]
    pub time_budget: f64,

    /// Qualifying respondents required per category
    #[arg(long, default_value_t = params::TARGET)]
    pub target: u32,

    /// Monte Carlo trials per validation
    #[arg(short = 'n', long, default_value_t = params::N_SIMULATIONS)]
    pub simulations: usize,

    /// Annealing iterations
    #[arg(short, long, default_value_t = params::N_ITERATIONS)]
    pub iterations: usize,

    /// Seed for annealing and validation; random when omitted
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Place categories that exceed the time budget alone instead of failing
    #[arg(long)]
    pub isolate_oversized: bool,

    /// Directory for parquet exports of the comparison table
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Directory for parquet traces of the annealing run
    #[arg(short, long)]
    pub trace: Option<PathBuf>,
}

impl Args {
    pub fn params(&self, seed: u64) -> Params {
        Params {
            buffer: self.buffer,
            time_budget: self.time_budget,
            target: self.target,
            n_simulations: self.simulations,
            n_iterations: self.iterations,
            seed,
            capacity_policy: if self.isolate_oversized {
                CapacityPolicy::Isolate
            } else {
                CapacityPolicy::FailFast
            },
            ..Params::default()
        }
    }
}

/// Orders file names so embedded numbers compare numerically ("panel_2" < "panel_10").
fn natural_key(name: &str) -> Vec<Result<u64, String>> {
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut is_digit = None;

    let mut flush = |buf: &mut String, digits: bool| {
        if digits {
            parts.push(buf.parse::<u64>().map_err(|_| buf.clone()));
        } else {
            parts.push(Err(buf.clone()));
        }
        buf.clear();
    };

    for c in name.chars() {
        let c = if c == '_' { ' ' } else { c.to_ascii_lowercase() };
        let current_is_digit = c.is_ascii_digit();

        if let Some(prev) = is_digit {
            if prev != current_is_digit {
                flush(&mut buf, prev);
            }
        }
        buf.push(c);
        is_digit = Some(current_is_digit);
    }

    if let Some(digits) = is_digit {
        flush(&mut buf, digits);
    }

    parts
}

fn is_category_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("parquet"))
}

pub fn enumerate_input_files(args: &Args) -> io::Result<Vec<PathBuf>> {
    if let Some(files) = &args.file {
        if let Some(prefix) = &args.prefix {
            Ok(files.iter()
                .map(|f| Path::new(prefix).join(f))
                .collect())
        } else {
            Ok(files.iter()
                .map(|f| Path::new(f).to_path_buf())
                .collect())
        }
    } else if let Some(prefix) = &args.prefix {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(prefix)? {
            let path = entry?.path();
            if is_category_file(&path) {
                files.push(path);
            }
        }

        files.sort_by_cached_key(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(natural_key)
                .unwrap_or_default()
        });

        Ok(files)
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Either --file and/or --prefix must be provided",
        ))
    }
}
