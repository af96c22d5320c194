// Dweve Jacobi Bench - Parallel scaling harness for Jacobi solvers
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Benchmark sweep execution and reporting.

use colored::Colorize;
use jacobi_bench::core::{BenchmarkConfig, Measurement, RunOutcome, TimingSource};
use jacobi_bench::harness::{BenchmarkDriver, Invocation, SweepObserver};
use jacobi_bench::reporters::{export_csv, export_json, print_table, ResultTable};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::info;

/// A fully resolved benchmark invocation.
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Report heading.
    pub title: String,
    /// Sweep configuration.
    pub config: BenchmarkConfig,
    /// CSV destination, if any.
    pub csv: Option<PathBuf>,
    /// JSON destination, if any.
    pub json: Option<PathBuf>,
}

/// Prints one status line per run.
#[derive(Debug)]
pub struct ProgressReporter {
    unit: String,
}

impl ProgressReporter {
    /// Creates a reporter that names workers with `label` (e.g. `Threads`).
    pub fn new(label: &str) -> Self {
        Self {
            unit: label.to_lowercase(),
        }
    }
}

impl SweepObserver for ProgressReporter {
    fn on_start(&mut self, count: NonZeroUsize, invocation: &Invocation) {
        println!(
            "{} Running with {} {}: {}",
            "→".cyan(),
            count,
            self.unit,
            invocation
        );
    }

    fn on_finish(&mut self, measurement: &Measurement) {
        let count = measurement.worker_count;
        match &measurement.outcome {
            RunOutcome::Timed { elapsed_ms, source } => {
                let origin = match source {
                    TimingSource::WallClock => "wall clock",
                    TimingSource::SelfReported => "reported",
                };
                println!(
                    "{} {} {}: {:.3} ms ({})",
                    "✓".green().bold(),
                    count,
                    self.unit,
                    elapsed_ms,
                    origin
                );
            }
            RunOutcome::Failed { failure } => {
                println!("{} {} {}: {}", "✗".red().bold(), count, self.unit, failure);
            }
        }
    }
}

/// Runs the sweep, prints the report and writes the requested exports.
///
/// # Errors
///
/// Returns `Err` if the sweep cannot start or an export cannot be written.
/// Failed runs are shown in the table and do not make this fail.
pub fn run(plan: RunPlan) -> Result<(), String> {
    let RunPlan {
        title,
        config,
        csv,
        json,
    } = plan;
    let label = config.worker_label();

    println!("Benchmarking: {}", config.executable.display());
    if let Some(input) = &config.input_file {
        println!("Input file: {}", input.display());
    }
    println!("{} counts: {:?}", label, config.worker_counts);
    println!("Baseline: {}", config.baseline);

    let driver = BenchmarkDriver::new(config.clone());
    let mut progress = ProgressReporter::new(label);
    let measurements = driver
        .run_with_observer(&mut progress)
        .map_err(|e| e.to_string())?;

    let table = ResultTable::build(title, label, &measurements, config.baseline);
    print_table(&table);
    info!(
        valid = table.valid_count(),
        failed = table.failed_count(),
        "sweep complete"
    );

    if let Some(path) = csv {
        export_csv(&table, &path).map_err(|e| e.to_string())?;
        println!("Results saved to {}", path.display());
    }
    if let Some(path) = json {
        export_json(&table, &path).map_err(|e| e.to_string())?;
        println!("Results saved to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_reporter_unit() {
        let reporter = ProgressReporter::new("Processes");
        assert_eq!(reporter.unit, "processes");
    }

    #[test]
    fn test_missing_executable_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let plan = RunPlan {
            title: "T".to_string(),
            config: BenchmarkConfig::mpi().with_working_dir(dir.path()),
            csv: Some(dir.path().join("out.csv")),
            json: None,
        };

        let err = run(plan).unwrap_err();
        assert!(err.contains("not found"));
        assert!(!dir.path().join("out.csv").exists());
    }
}
