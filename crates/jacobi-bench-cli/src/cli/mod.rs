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

//! CLI command definitions and argument parsing.
//!
//! # Organization
//!
//! - [`bench`]: Benchmark sweeps (mpi, omp, threads)
//! - [`utility`]: Utility commands (completion)

mod bench;
mod utility;

use clap::{Parser, Subcommand};

pub use bench::{BenchCommands, CommonArgs};
pub use utility::UtilityCommands;

/// Jacobi Bench - parallel scaling harness for Jacobi solvers
///
/// Runs an MPI or OpenMP Jacobi executable once per worker count and
/// reports speedup and efficiency.
///
/// # Examples
///
/// ```bash
/// # MPI sweep with the default process counts, results in benchmark_results.csv
/// jacobi-bench mpi
///
/// # OpenMP sweep over a dataset, using the program's reported time
/// jacobi-bench threads --input dataset_1000.txt --counts 1,2,4,8
///
/// # Compile-if-stale OpenMP sweep against a fixed serial baseline
/// jacobi-bench omp --baseline-ms 250 --json results.json
/// ```
#[derive(Parser)]
#[command(name = "jacobi-bench")]
#[command(author, version, about = "Jacobi Bench - parallel scaling harness for Jacobi solvers", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands enum.
///
/// ```text
/// Commands
/// ├── Bench (mpi, omp, threads)
/// └── Utility (completion)
/// ```
#[derive(Subcommand)]
pub enum Commands {
    // Benchmark commands - flattened to appear at top level
    #[command(flatten)]
    Bench(BenchCommands),

    // Utility commands - flattened to appear at top level
    #[command(flatten)]
    Utility(UtilityCommands),
}

impl Commands {
    /// Execute the command with the provided arguments.
    ///
    /// # Errors
    ///
    /// Returns `Err` on fatal conditions: invalid flags, missing executable,
    /// input or source, compilation failure, or an unwritable output file.
    pub fn execute(self) -> Result<(), String> {
        match self {
            Commands::Bench(cmd) => cmd.execute(),
            Commands::Utility(cmd) => cmd.execute(),
        }
    }
}
