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

//! Benchmark harness: building, launching and timing the solver.
//!
//! # Modules
//!
//! - `runner`: The sweep driver
//! - `executor`: Process spawning with a bounded wait
//! - `invocation`: Command lines per worker count
//! - `parse`: Self-reported timing extraction
//! - `toolchain`: Rebuild-if-stale compilation

pub mod executor;
pub mod invocation;
pub mod parse;
pub mod runner;
pub mod toolchain;

pub use executor::{Executor, ProcessExecutor, ProcessOutput};
pub use invocation::Invocation;
pub use parse::{parse_reported_time, TIMING_LABELS};
pub use runner::{BenchmarkDriver, NoopObserver, PreparedTarget, SweepObserver};
pub use toolchain::{find_on_path, needs_rebuild, Toolchain};
