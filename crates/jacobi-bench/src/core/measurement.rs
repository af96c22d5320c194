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

//! Per-run measurement records.
//!
//! A [`Measurement`] is created once per worker count and never mutated. A
//! failed run keeps its slot in the sequence so reports stay aligned with the
//! configured counts.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::Duration;

/// Where a recorded time came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingSource {
    /// Measured by the harness around the child process.
    WallClock,
    /// Parsed from the program's own timing line.
    SelfReported,
}

/// Why a run produced no usable time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunFailure {
    /// The process could not be spawned or waited on.
    Launch {
        /// Underlying OS error
        message: String,
    },
    /// The process exited unsuccessfully.
    ExitStatus {
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },
    /// The process exceeded the per-run timeout and was killed.
    TimedOut {
        /// The timeout that expired
        #[serde(with = "duration_secs")]
        after: Duration,
    },
}

impl std::fmt::Display for RunFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunFailure::Launch { message } => write!(f, "failed to launch: {}", message),
            RunFailure::ExitStatus {
                code: Some(code), ..
            } => write!(f, "exited with code {}", code),
            RunFailure::ExitStatus { code: None, .. } => write!(f, "terminated by signal"),
            RunFailure::TimedOut { after } => {
                write!(f, "timed out after {} seconds", after.as_secs_f64())
            }
        }
    }
}

/// Outcome of a single timed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The run completed and produced a time.
    Timed {
        /// Elapsed time in milliseconds
        elapsed_ms: f64,
        /// Origin of `elapsed_ms`
        source: TimingSource,
    },
    /// The run failed; no time is available.
    Failed {
        /// Failure details
        failure: RunFailure,
    },
}

/// One result row: a worker count and what happened when it ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Processes or threads requested for this run.
    pub worker_count: NonZeroUsize,
    /// Time or failure.
    pub outcome: RunOutcome,
}

impl Measurement {
    /// Creates a measurement from a wall-clock duration.
    pub fn wall_clock(worker_count: NonZeroUsize, elapsed: Duration) -> Self {
        Self::timed(worker_count, duration_to_ms(elapsed), TimingSource::WallClock)
    }

    /// Creates a successful measurement.
    pub fn timed(worker_count: NonZeroUsize, elapsed_ms: f64, source: TimingSource) -> Self {
        Self {
            worker_count,
            outcome: RunOutcome::Timed { elapsed_ms, source },
        }
    }

    /// Creates a failed measurement.
    pub fn failed(worker_count: NonZeroUsize, failure: RunFailure) -> Self {
        Self {
            worker_count,
            outcome: RunOutcome::Failed { failure },
        }
    }

    /// Returns the elapsed time if it is a finite, positive number.
    ///
    /// Zero or non-finite times cannot serve as a speedup denominator, so they
    /// are treated the same as a failed run.
    pub fn valid_ms(&self) -> Option<f64> {
        match self.outcome {
            RunOutcome::Timed { elapsed_ms, .. } if elapsed_ms.is_finite() && elapsed_ms > 0.0 => {
                Some(elapsed_ms)
            }
            _ => None,
        }
    }

    /// Returns the failure, if any.
    pub fn failure(&self) -> Option<&RunFailure> {
        match &self.outcome {
            RunOutcome::Failed { failure } => Some(failure),
            RunOutcome::Timed { .. } => None,
        }
    }

    /// Returns the timing source for successful runs.
    pub fn source(&self) -> Option<TimingSource> {
        match self.outcome {
            RunOutcome::Timed { source, .. } => Some(source),
            RunOutcome::Failed { .. } => None,
        }
    }
}

/// Converts a duration to fractional milliseconds.
pub fn duration_to_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(count: usize) -> NonZeroUsize {
        NonZeroUsize::new(count).unwrap()
    }

    #[test]
    fn test_wall_clock_conversion() {
        let m = Measurement::wall_clock(n(2), Duration::from_millis(1500));
        assert_eq!(m.valid_ms(), Some(1500.0));
        assert_eq!(m.source(), Some(TimingSource::WallClock));
        assert!(m.failure().is_none());
    }

    #[test]
    fn test_failed_has_no_time() {
        let m = Measurement::failed(
            n(4),
            RunFailure::ExitStatus {
                code: Some(3),
                stderr: String::new(),
            },
        );
        assert_eq!(m.valid_ms(), None);
        assert_eq!(m.source(), None);
        assert_eq!(m.failure().unwrap().to_string(), "exited with code 3");
    }

    #[test]
    fn test_zero_and_nan_are_invalid() {
        let zero = Measurement::timed(n(1), 0.0, TimingSource::SelfReported);
        let nan = Measurement::timed(n(1), f64::NAN, TimingSource::WallClock);
        assert_eq!(zero.valid_ms(), None);
        assert_eq!(nan.valid_ms(), None);
    }

    #[test]
    fn test_failure_display() {
        let timeout = RunFailure::TimedOut {
            after: Duration::from_secs(60),
        };
        assert_eq!(timeout.to_string(), "timed out after 60 seconds");

        let signal = RunFailure::ExitStatus {
            code: None,
            stderr: String::new(),
        };
        assert_eq!(signal.to_string(), "terminated by signal");
    }

    #[test]
    fn test_measurement_serializes_tagged() {
        let m = Measurement::failed(
            n(8),
            RunFailure::TimedOut {
                after: Duration::from_secs(2),
            },
        );
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"status\":\"failed\""));
        assert!(json.contains("\"kind\":\"timed_out\""));
        assert!(json.contains("\"worker_count\":8"));
    }
}
