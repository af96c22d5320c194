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

//! Jacobi Bench CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! ## Benchmarks
//!
//! - **mpi**: Sweep process counts through `mpiexec -n <N>`
//! - **omp**: Compile-if-stale OpenMP sweep against a fixed serial baseline
//! - **threads**: OpenMP sweep over an input dataset, using the program's
//!   reported time
//!
//! ## Utilities
//!
//! - **completion**: Generate shell completion scripts (bash, zsh, fish, powershell, elvish)
//!
//! # Error Handling
//!
//! Commands return `Result<(), String>`. Failed runs inside a sweep are part
//! of the report, not errors; only conditions that stop a sweep from
//! starting or its results from being written are returned as `Err`.

pub mod cli;
pub mod commands;
