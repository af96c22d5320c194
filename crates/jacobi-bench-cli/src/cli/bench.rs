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

//! Benchmark sweep commands.
//!
//! Each subcommand starts from a [`BenchmarkConfig`] preset and applies the
//! flags on top of it, so an invocation without flags reproduces the preset.

use crate::commands::{self, RunPlan};
use clap::{Args, Subcommand};
use jacobi_bench::core::{Baseline, BenchmarkConfig, ParallelismMode, ReportUnit};
use jacobi_bench::harness::Toolchain;
use std::path::PathBuf;
use std::time::Duration;

/// Default CSV file of the `mpi` command.
pub const MPI_CSV: &str = "benchmark_results.csv";

/// Flags shared by every benchmark command.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Program to benchmark
    #[arg(long, value_name = "PATH")]
    pub exe: Option<PathBuf>,

    /// Worker counts to sweep, in order (e.g. 1,2,4,8)
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub counts: Option<Vec<usize>>,

    /// Input file passed as the first program argument
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Fixed baseline time in milliseconds
    #[arg(long, value_name = "MS", conflicts_with = "baseline_workers")]
    pub baseline_ms: Option<f64>,

    /// Use the run with this worker count as baseline
    #[arg(long, value_name = "N")]
    pub baseline_workers: Option<usize>,

    /// Per-run timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Untimed warm-up runs before each timed run
    #[arg(long, value_name = "RUNS")]
    pub warmup: Option<u32>,

    /// Write results as CSV to this file
    #[arg(long, value_name = "FILE", conflicts_with = "no_csv")]
    pub csv: Option<PathBuf>,

    /// Do not write a CSV file
    #[arg(long)]
    pub no_csv: bool,

    /// Write results as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Time runs with the wall clock even if the program reports its own time
    #[arg(long)]
    pub no_parse_output: bool,

    /// Unit of reported times that carry no unit (s, ms, us)
    #[arg(long, value_name = "UNIT", value_parser = clap::value_parser!(ReportUnit))]
    pub report_unit: Option<ReportUnit>,

    /// Directory to resolve relative paths against and run the program in
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Extra arguments passed to the program after the input file
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl CommonArgs {
    /// Applies the flags to `config`.
    pub fn apply(&self, mut config: BenchmarkConfig) -> BenchmarkConfig {
        if let Some(exe) = &self.exe {
            config = config.with_executable(exe);
        }
        if let Some(counts) = &self.counts {
            config = config.with_counts(counts);
        }
        if let Some(input) = &self.input {
            config = config.with_input_file(input);
        }
        if let Some(ms) = self.baseline_ms {
            config = config.with_baseline(Baseline::Explicit(ms));
        }
        if let Some(workers) = self.baseline_workers {
            config = config.with_baseline(Baseline::WorkerCount(workers));
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(runs) = self.warmup {
            config = config.with_warmup_runs(runs);
        }
        if self.no_parse_output {
            config = config.with_parse_output(false);
        }
        if let Some(unit) = self.report_unit {
            config = config.with_report_unit(unit);
        }
        if let Some(dir) = &self.workdir {
            config = config.with_working_dir(dir);
        }
        if !self.args.is_empty() {
            config = config.with_args(self.args.clone());
        }
        config
    }

    /// CSV destination: `--csv`, else `default` unless `--no-csv` is given.
    pub fn csv_path(&self, default: Option<&str>) -> Option<PathBuf> {
        if self.no_csv {
            return None;
        }
        self.csv.clone().or_else(|| default.map(PathBuf::from))
    }
}

/// Benchmark commands.
#[derive(Subcommand)]
pub enum BenchCommands {
    /// Benchmark an MPI executable across process counts
    ///
    /// Runs `mpiexec -n <N> ./jacobi_mpi.exe` for each count, timed with the
    /// wall clock. Results are written to benchmark_results.csv unless
    /// --no-csv is given.
    Mpi {
        #[command(flatten)]
        common: CommonArgs,

        /// MPI launcher program
        #[arg(long, value_name = "PROGRAM")]
        launcher: Option<String>,
    },

    /// Build (if stale) and benchmark an OpenMP executable across thread counts
    ///
    /// Compiles jacobi_openmp.c when the executable is missing or older than
    /// the source, then runs it with OMP_NUM_THREADS set per count after one
    /// warm-up run. Speedups are relative to a fixed 100 ms serial time.
    Omp {
        #[command(flatten)]
        common: CommonArgs,

        /// C source to build the executable from
        #[arg(long, value_name = "FILE")]
        source: Option<PathBuf>,

        /// C compiler (defaults to the first of gcc, clang on PATH)
        #[arg(long, value_name = "CC")]
        compiler: Option<String>,

        /// Compiler flags, whitespace separated
        #[arg(long, value_name = "FLAGS", allow_hyphen_values = true)]
        cflags: Option<String>,
    },

    /// Benchmark an OpenMP executable over an input dataset
    ///
    /// Runs `jacobi_omp.exe dataset_500.txt` with OMP_NUM_THREADS set per
    /// count and uses the program's "Execution time:" line when present.
    Threads {
        #[command(flatten)]
        common: CommonArgs,
    },
}

impl BenchCommands {
    /// Builds the run plan for this command.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a flag value is invalid.
    pub fn plan(&self) -> Result<RunPlan, String> {
        match self {
            BenchCommands::Mpi { common, launcher } => {
                let mut config = common.apply(BenchmarkConfig::mpi());
                if let Some(program) = launcher {
                    config = config.with_mode(ParallelismMode::Launcher {
                        program: program.clone(),
                        count_flag: "-n".to_string(),
                    });
                }
                Ok(RunPlan {
                    title: "MPI JACOBI BENCHMARK RESULTS".to_string(),
                    config,
                    csv: common.csv_path(Some(MPI_CSV)),
                    json: common.json.clone(),
                })
            }
            BenchCommands::Omp {
                common,
                source,
                compiler,
                cflags,
            } => {
                let config = common.apply(BenchmarkConfig::openmp());
                let mut toolchain = config
                    .toolchain
                    .clone()
                    .unwrap_or_else(|| Toolchain::openmp("jacobi_openmp.c"));
                if let Some(source) = source {
                    toolchain.source = source.clone();
                }
                if let Some(compiler) = compiler {
                    toolchain = toolchain.with_compiler(compiler.clone());
                }
                if let Some(flags) = cflags {
                    toolchain =
                        toolchain.with_flags(flags.split_whitespace().map(String::from).collect());
                }
                Ok(RunPlan {
                    title: "OPENMP JACOBI BENCHMARK RESULTS".to_string(),
                    config: config.with_toolchain(toolchain),
                    csv: common.csv_path(None),
                    json: common.json.clone(),
                })
            }
            BenchCommands::Threads { common } => Ok(RunPlan {
                title: "PERFORMANCE RESULTS".to_string(),
                config: common.apply(BenchmarkConfig::threads()),
                csv: common.csv_path(None),
                json: common.json.clone(),
            }),
        }
    }

    /// Execute the benchmark command.
    ///
    /// # Errors
    ///
    /// Returns `Err` on fatal conditions only; failed runs are reported in
    /// the table.
    pub fn execute(self) -> Result<(), String> {
        commands::run(self.plan()?)
    }
}
