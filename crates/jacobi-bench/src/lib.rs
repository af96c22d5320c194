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

//! Jacobi Benchmark Harness
//!
//! Parallel scaling measurements for external Jacobi solver executables.
//!
//! ## Features
//!
//! - **Sweeps**: Run an MPI or OpenMP executable once per worker count
//! - **Timing**: Wall-clock timing or the solver's self-reported time
//! - **Reports**: Speedup and efficiency tables, CSV and JSON export
//!
//! ## Usage
//!
//! ```no_run
//! use jacobi_bench::{BenchmarkConfig, BenchmarkDriver, ResultTable};
//!
//! let config = BenchmarkConfig::mpi().with_counts(&[1, 2, 4]);
//! let driver = BenchmarkDriver::new(config.clone());
//! let measurements = driver.run()?;
//!
//! let table = ResultTable::build(
//!     "MPI JACOBI BENCHMARK RESULTS",
//!     config.worker_label(),
//!     &measurements,
//!     config.baseline,
//! );
//! jacobi_bench::print_table(&table);
//! # Ok::<(), jacobi_bench::BenchError>(())
//! ```

pub mod core;
pub mod error;
pub mod harness;
pub mod reporters;

// Re-export key types for convenience
pub use crate::core::{
    default_timeout, Baseline, BenchmarkConfig, Measurement, ParallelismMode, ReportUnit,
    ResolvedBaseline, RunFailure, RunOutcome, TimingSource, DEFAULT_COUNTS, DEFAULT_TIMEOUT,
    OMP_THREADS_ENV, TIMEOUT_ENV,
};
pub use error::{BenchError, Result};
pub use harness::{
    BenchmarkDriver, Executor, Invocation, NoopObserver, PreparedTarget, ProcessExecutor,
    SweepObserver, Toolchain,
};
pub use reporters::{export_csv, export_json, print_table, render_table, ResultTable};
