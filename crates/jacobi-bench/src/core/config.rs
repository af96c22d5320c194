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

//! Benchmark session configuration.
//!
//! A [`BenchmarkConfig`] is built once (usually from one of the presets that
//! mirror the classic MPI/OpenMP runner scripts), adjusted with the `with_*`
//! builders, validated, and then only read.

use crate::core::baseline::Baseline;
use crate::error::{BenchError, Result};
use crate::harness::toolchain::Toolchain;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Worker counts swept by every preset.
pub const DEFAULT_COUNTS: &[usize] = &[1, 2, 4, 8, 16];

/// Per-run timeout when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Environment variable that overrides [`DEFAULT_TIMEOUT`], in whole seconds.
pub const TIMEOUT_ENV: &str = "JACOBI_BENCH_TIMEOUT_SECS";

/// Thread-count variable understood by OpenMP runtimes.
pub const OMP_THREADS_ENV: &str = "OMP_NUM_THREADS";

/// Serial baseline used by the compile-and-run OpenMP preset, in milliseconds.
pub const OPENMP_SERIAL_MS: f64 = 100.0;

/// Returns the default timeout, honouring [`TIMEOUT_ENV`].
///
/// Unparseable or zero values fall back to [`DEFAULT_TIMEOUT`].
pub fn default_timeout() -> Duration {
    std::env::var(TIMEOUT_ENV)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT)
}

/// How the requested degree of parallelism reaches the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParallelismMode {
    /// Multi-process: `<program> <count_flag> <N> <executable> ...`.
    Launcher {
        /// Launcher binary, e.g. `mpiexec`.
        program: String,
        /// Flag preceding the process count, e.g. `-n`.
        count_flag: String,
    },
    /// Multi-threaded: `<executable> ...` with `<name>=<N>` in the child's environment.
    EnvVar {
        /// Variable name, e.g. `OMP_NUM_THREADS`.
        name: String,
    },
}

impl ParallelismMode {
    /// `mpiexec -n <N>`.
    pub fn mpiexec() -> Self {
        Self::Launcher {
            program: "mpiexec".to_string(),
            count_flag: "-n".to_string(),
        }
    }

    /// `OMP_NUM_THREADS=<N>`.
    pub fn openmp() -> Self {
        Self::EnvVar {
            name: OMP_THREADS_ENV.to_string(),
        }
    }

    /// Column label for worker counts under this mode.
    pub fn worker_label(&self) -> &'static str {
        match self {
            Self::Launcher { .. } => "Processes",
            Self::EnvVar { .. } => "Threads",
        }
    }
}

/// Unit of a self-reported timing value when the line carries none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportUnit {
    /// Seconds (`Execution time: 0.512 seconds`).
    #[default]
    Seconds,
    /// Milliseconds.
    Millis,
    /// Microseconds.
    Micros,
}

impl ReportUnit {
    /// Multiplier that converts a value in this unit to milliseconds.
    pub fn to_ms_factor(self) -> f64 {
        match self {
            Self::Seconds => 1000.0,
            Self::Millis => 1.0,
            Self::Micros => 0.001,
        }
    }

    /// Recognises a unit token following the number on a timing line.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().trim_end_matches(['.', ',', ')']) {
            "s" | "sec" | "secs" | "second" | "seconds" => Some(Self::Seconds),
            "ms" | "msec" | "millisecond" | "milliseconds" => Some(Self::Millis),
            "us" | "µs" | "usec" | "microsecond" | "microseconds" => Some(Self::Micros),
            _ => None,
        }
    }
}

impl FromStr for ReportUnit {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_token(s).ok_or_else(|| {
            BenchError::invalid_config("report-unit", format!("unknown unit '{}'", s))
        })
    }
}

impl fmt::Display for ReportUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Seconds => "s",
            Self::Millis => "ms",
            Self::Micros => "us",
        })
    }
}

/// Configuration for one benchmark sweep.
///
/// # Example
///
/// ```no_run
/// use jacobi_bench::core::{Baseline, BenchmarkConfig};
///
/// let config = BenchmarkConfig::threads()
///     .with_counts(&[1, 2, 4])
///     .with_input_file("dataset_1000.txt")
///     .with_baseline(Baseline::WorkerCount(1));
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Worker counts, run in this order.
    pub worker_counts: Vec<usize>,
    /// Program to benchmark.
    pub executable: PathBuf,
    /// Optional input file passed as the first program argument.
    pub input_file: Option<PathBuf>,
    /// Extra program arguments after the input file.
    pub args: Vec<String>,
    /// How parallelism is requested.
    pub mode: ParallelismMode,
    /// Reference time for speedups.
    pub baseline: Baseline,
    /// Per-run timeout; the child is killed once it expires.
    pub timeout: Duration,
    /// Untimed runs before each timed run.
    pub warmup_runs: u32,
    /// Prefer the program's own timing line over wall-clock time.
    pub parse_output: bool,
    /// Unit assumed for self-reported values without a unit token.
    pub report_unit: ReportUnit,
    /// Directory relative paths resolve against and children run in.
    pub working_dir: Option<PathBuf>,
    /// Builds the executable when it is missing or stale.
    pub toolchain: Option<Toolchain>,
}

impl BenchmarkConfig {
    /// Creates a configuration with defaults for everything but the program and mode.
    pub fn new(executable: impl Into<PathBuf>, mode: ParallelismMode) -> Self {
        Self {
            worker_counts: DEFAULT_COUNTS.to_vec(),
            executable: executable.into(),
            input_file: None,
            args: Vec::new(),
            mode,
            baseline: Baseline::FirstValid,
            timeout: default_timeout(),
            warmup_runs: 0,
            parse_output: false,
            report_unit: ReportUnit::Seconds,
            working_dir: None,
            toolchain: None,
        }
    }

    /// Multi-process runs of `jacobi_mpi.exe` under `mpiexec`, wall-clock timed.
    pub fn mpi() -> Self {
        let exe = if cfg!(windows) {
            ".\\jacobi_mpi.exe"
        } else {
            "./jacobi_mpi.exe"
        };
        Self::new(exe, ParallelismMode::mpiexec())
    }

    /// Compile-if-stale OpenMP runs against a fixed 100 ms serial baseline,
    /// with one warm-up run per thread count.
    pub fn openmp() -> Self {
        let exe = if cfg!(windows) {
            "jacobi_openmp.exe"
        } else {
            "jacobi_openmp"
        };
        Self::new(exe, ParallelismMode::openmp())
            .with_baseline(Baseline::Explicit(OPENMP_SERIAL_MS))
            .with_warmup_runs(1)
            .with_toolchain(Toolchain::openmp("jacobi_openmp.c"))
    }

    /// OpenMP runs over `dataset_500.txt`, using the program's reported time
    /// and the single-thread run as baseline.
    pub fn threads() -> Self {
        Self::new("jacobi_omp.exe", ParallelismMode::openmp())
            .with_input_file("dataset_500.txt")
            .with_baseline(Baseline::WorkerCount(1))
            .with_parse_output(true)
    }

    /// Sets the worker counts.
    pub fn with_counts(mut self, counts: &[usize]) -> Self {
        self.worker_counts = counts.to_vec();
        self
    }

    /// Sets the program to benchmark.
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = path.into();
        self
    }

    /// Sets the input file.
    pub fn with_input_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_file = Some(path.into());
        self
    }

    /// Removes the input file.
    pub fn without_input_file(mut self) -> Self {
        self.input_file = None;
        self
    }

    /// Sets extra program arguments.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Sets the parallelism mode.
    pub fn with_mode(mut self, mode: ParallelismMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the baseline.
    pub fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Sets the per-run timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the number of warm-up runs.
    pub fn with_warmup_runs(mut self, runs: u32) -> Self {
        self.warmup_runs = runs;
        self
    }

    /// Enables or disables parsing of the program's timing line.
    pub fn with_parse_output(mut self, enabled: bool) -> Self {
        self.parse_output = enabled;
        self
    }

    /// Sets the unit of self-reported times.
    pub fn with_report_unit(mut self, unit: ReportUnit) -> Self {
        self.report_unit = unit;
        self
    }

    /// Sets the working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Sets the toolchain.
    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = Some(toolchain);
        self
    }

    /// Drops the toolchain; a missing executable becomes fatal.
    pub fn without_toolchain(mut self) -> Self {
        self.toolchain = None;
        self
    }

    /// Column label for worker counts.
    pub fn worker_label(&self) -> &'static str {
        self.mode.worker_label()
    }

    /// Resolves `path` against the working directory.
    ///
    /// Absolute paths are returned unchanged. Without a working directory,
    /// relative paths stay relative to the process's current directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.working_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Checks the configuration for values no sweep can run with.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidConfig`] when the count list is empty or
    /// holds a zero, the timeout is zero, or an explicit baseline is not a
    /// finite positive number.
    pub fn validate(&self) -> Result<()> {
        if self.worker_counts.is_empty() {
            return Err(BenchError::invalid_config(
                "counts",
                "at least one worker count is required",
            ));
        }
        if self.worker_counts.contains(&0) {
            return Err(BenchError::invalid_config(
                "counts",
                "worker counts must be positive integers",
            ));
        }
        if self.timeout.is_zero() {
            return Err(BenchError::invalid_config(
                "timeout",
                "timeout must be greater than zero",
            ));
        }
        self.baseline.validate()?;
        if let ParallelismMode::Launcher { program, .. } = &self.mode {
            if program.trim().is_empty() {
                return Err(BenchError::invalid_config(
                    "launcher",
                    "launcher program must not be empty",
                ));
            }
        }
        Ok(())
    }
}
