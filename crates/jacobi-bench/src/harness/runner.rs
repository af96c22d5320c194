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

//! Benchmark driver: one measurement per configured worker count.

use crate::core::config::BenchmarkConfig;
use crate::core::measurement::{Measurement, RunFailure, TimingSource};
use crate::error::{BenchError, Result};
use crate::harness::executor::{Executor, ProcessExecutor};
use crate::harness::invocation::Invocation;
use crate::harness::parse::parse_reported_time;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Maximum number of stderr characters repeated in a failure diagnostic.
const STDERR_EXCERPT: usize = 500;

/// Receives progress callbacks during a sweep.
///
/// All methods default to no-ops.
pub trait SweepObserver {
    /// Called before the runs for `count` start.
    fn on_start(&mut self, _count: NonZeroUsize, _invocation: &Invocation) {}

    /// Called once the measurement for a count is recorded.
    fn on_finish(&mut self, _measurement: &Measurement) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl SweepObserver for NoopObserver {}

/// Executable and input after resolution, existence checks and any build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTarget {
    /// Absolute path of the program to run.
    pub executable: PathBuf,
    /// Absolute path of the input file, if one is configured.
    pub input: Option<PathBuf>,
    /// Whether the executable was (re)built during preparation.
    pub rebuilt: bool,
}

/// Runs a configured sweep sequentially.
///
/// # Example
///
/// ```no_run
/// use jacobi_bench::core::BenchmarkConfig;
/// use jacobi_bench::harness::BenchmarkDriver;
///
/// let driver = BenchmarkDriver::new(BenchmarkConfig::mpi().with_counts(&[1, 2, 4]));
/// let measurements = driver.run().unwrap();
/// assert_eq!(measurements.len(), 3);
/// ```
#[derive(Debug)]
pub struct BenchmarkDriver<E = ProcessExecutor> {
    config: BenchmarkConfig,
    executor: E,
}

impl BenchmarkDriver<ProcessExecutor> {
    /// Creates a driver that spawns real processes.
    pub fn new(config: BenchmarkConfig) -> Self {
        Self::with_executor(config, ProcessExecutor)
    }
}

impl<E: Executor> BenchmarkDriver<E> {
    /// Creates a driver with a custom executor.
    pub fn with_executor(config: BenchmarkConfig, executor: E) -> Self {
        Self { config, executor }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Returns the executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Validates the configuration, builds the executable if needed, and
    /// checks that every file a run depends on exists.
    ///
    /// # Errors
    ///
    /// Fatal conditions only: invalid configuration, missing executable or
    /// input, and build failures.
    pub fn prepare(&self) -> Result<PreparedTarget> {
        self.config.validate()?;

        let executable = absolute(&self.config.resolve(&self.config.executable))?;
        let mut rebuilt = false;
        if let Some(toolchain) = &self.config.toolchain {
            let source = absolute(&self.config.resolve(&toolchain.source))?;
            rebuilt =
                toolchain.ensure_built(&executable, &source, self.config.working_dir.as_deref())?;
        }
        if !executable.is_file() {
            return Err(BenchError::MissingExecutable { path: executable });
        }

        let input = match &self.config.input_file {
            Some(input) => {
                let input = absolute(&self.config.resolve(input))?;
                if !input.is_file() {
                    return Err(BenchError::MissingInput { path: input });
                }
                Some(input)
            }
            None => None,
        };

        Ok(PreparedTarget {
            executable,
            input,
            rebuilt,
        })
    }

    /// Prepares and runs the sweep without progress callbacks.
    pub fn run(&self) -> Result<Vec<Measurement>> {
        self.run_with_observer(&mut NoopObserver)
    }

    /// Prepares and runs the sweep, reporting progress to `observer`.
    ///
    /// Individual run failures are recorded in the returned measurements and
    /// never abort the sweep.
    pub fn run_with_observer(
        &self,
        observer: &mut dyn SweepObserver,
    ) -> Result<Vec<Measurement>> {
        let target = self.prepare()?;
        self.sweep(&target, observer)
    }

    /// Runs every configured count against an already prepared target.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidConfig`] before any run if the
    /// configuration does not validate.
    pub fn sweep(
        &self,
        target: &PreparedTarget,
        observer: &mut dyn SweepObserver,
    ) -> Result<Vec<Measurement>> {
        self.config.validate()?;
        let counts = self
            .config
            .worker_counts
            .iter()
            .map(|&c| {
                NonZeroUsize::new(c).ok_or_else(|| {
                    BenchError::invalid_config("counts", "worker counts must be positive integers")
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            executable = %target.executable.display(),
            counts = ?self.config.worker_counts,
            "starting sweep"
        );

        let mut measurements = Vec::with_capacity(counts.len());
        for count in counts {
            let invocation = Invocation::for_count(
                &self.config,
                &target.executable,
                target.input.as_deref(),
                count,
            );
            observer.on_start(count, &invocation);
            let measurement = self.measure(count, &invocation);
            observer.on_finish(&measurement);
            measurements.push(measurement);
        }
        Ok(measurements)
    }

    fn measure(&self, count: NonZeroUsize, invocation: &Invocation) -> Measurement {
        for round in 1..=self.config.warmup_runs {
            debug!(count = count.get(), round, "warm-up run");
            if let Err(failure) = self.executor.execute(invocation, self.config.timeout) {
                warn!(count = count.get(), round, "warm-up run failed: {}", failure);
            }
        }

        debug!(count = count.get(), command = %invocation, "timed run");
        let output = match self.executor.execute(invocation, self.config.timeout) {
            Ok(output) => output,
            Err(failure) => {
                warn!(count = count.get(), "run failed: {}", failure);
                if let RunFailure::ExitStatus { stderr, .. } = &failure {
                    if !stderr.trim().is_empty() {
                        warn!(count = count.get(), "stderr: {}", excerpt(stderr));
                    }
                }
                return Measurement::failed(count, failure);
            }
        };

        if !self.config.parse_output {
            return Measurement::wall_clock(count, output.elapsed);
        }
        match parse_reported_time(&output.stdout, self.config.report_unit) {
            Some(ms) => Measurement::timed(count, ms, TimingSource::SelfReported),
            None => {
                warn!(
                    count = count.get(),
                    "could not parse execution time from output, using wall clock time"
                );
                debug!(count = count.get(), "program output:\n{}", output.stdout);
                Measurement::wall_clock(count, output.elapsed)
            }
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|e| BenchError::io_error(path, e))
}

fn excerpt(text: &str) -> &str {
    let text = text.trim();
    match text.char_indices().nth(STDERR_EXCERPT) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
