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

//! Baseline selection for speedup computation.
//!
//! The baseline is always chosen explicitly. [`Baseline::FirstValid`] keeps the
//! old "first row is serial" convention available, but callers have to ask
//! for it by name.

use crate::core::measurement::Measurement;
use crate::error::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the reference time for speedups is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Baseline {
    /// A known serial time in milliseconds.
    Explicit(f64),
    /// The measured time of a specific worker count.
    WorkerCount(usize),
    /// The first valid measurement in sweep order.
    FirstValid,
}

impl Baseline {
    /// Rejects explicit baselines that are not finite and positive.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Baseline::Explicit(ms) if !(ms.is_finite() && ms > 0.0) => Err(
                BenchError::invalid_config("baseline-ms", "must be a finite positive number"),
            ),
            Baseline::WorkerCount(0) => Err(BenchError::invalid_config(
                "baseline-workers",
                "must be a positive integer",
            )),
            _ => Ok(()),
        }
    }

    /// Resolves the baseline against a sweep.
    ///
    /// Returns `None` when the referenced measurement is missing or failed,
    /// in which case no speedups can be computed.
    pub fn resolve(&self, measurements: &[Measurement]) -> Option<ResolvedBaseline> {
        match *self {
            Baseline::Explicit(ms) => (ms.is_finite() && ms > 0.0).then_some(ResolvedBaseline {
                time_ms: ms,
                worker_count: None,
            }),
            Baseline::WorkerCount(count) => measurements
                .iter()
                .find(|m| m.worker_count.get() == count)
                .and_then(|m| m.valid_ms())
                .map(|time_ms| ResolvedBaseline {
                    time_ms,
                    worker_count: Some(count),
                }),
            Baseline::FirstValid => measurements.iter().find_map(|m| {
                m.valid_ms().map(|time_ms| ResolvedBaseline {
                    time_ms,
                    worker_count: Some(m.worker_count.get()),
                })
            }),
        }
    }
}

impl Default for Baseline {
    fn default() -> Self {
        Self::FirstValid
    }
}

impl fmt::Display for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Baseline::Explicit(ms) => write!(f, "{:.3} ms (explicit)", ms),
            Baseline::WorkerCount(n) => write!(f, "run with {} workers", n),
            Baseline::FirstValid => write!(f, "first valid run"),
        }
    }
}

/// A baseline time that speedups can be computed against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBaseline {
    /// Reference time in milliseconds.
    pub time_ms: f64,
    /// Worker count the time was taken from, `None` for explicit baselines.
    pub worker_count: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::measurement::{RunFailure, TimingSource};
    use std::num::NonZeroUsize;

    fn ok(count: usize, ms: f64) -> Measurement {
        Measurement::timed(NonZeroUsize::new(count).unwrap(), ms, TimingSource::WallClock)
    }

    fn failed(count: usize) -> Measurement {
        Measurement::failed(
            NonZeroUsize::new(count).unwrap(),
            RunFailure::Launch {
                message: "not found".to_string(),
            },
        )
    }

    #[test]
    fn test_first_valid_skips_failures() {
        let runs = vec![failed(1), ok(2, 60.0), ok(4, 30.0)];
        let resolved = Baseline::FirstValid.resolve(&runs).unwrap();
        assert_eq!(resolved.time_ms, 60.0);
        assert_eq!(resolved.worker_count, Some(2));
    }

    #[test]
    fn test_worker_count_baseline() {
        let runs = vec![ok(2, 60.0), ok(1, 100.0)];
        let resolved = Baseline::WorkerCount(1).resolve(&runs).unwrap();
        assert_eq!(resolved.time_ms, 100.0);

        let runs = vec![failed(1), ok(2, 60.0)];
        assert!(Baseline::WorkerCount(1).resolve(&runs).is_none());
        assert!(Baseline::WorkerCount(8).resolve(&runs).is_none());
    }

    #[test]
    fn test_explicit_ignores_measurements() {
        let resolved = Baseline::Explicit(100.0).resolve(&[]).unwrap();
        assert_eq!(resolved.time_ms, 100.0);
        assert_eq!(resolved.worker_count, None);
    }

    #[test]
    fn test_all_failed_is_unresolved() {
        let runs = vec![failed(1), failed(2)];
        assert!(Baseline::FirstValid.resolve(&runs).is_none());
    }

    #[test]
    fn test_validate() {
        assert!(Baseline::Explicit(0.0).validate().is_err());
        assert!(Baseline::Explicit(f64::INFINITY).validate().is_err());
        assert!(Baseline::WorkerCount(0).validate().is_err());
        assert!(Baseline::Explicit(12.5).validate().is_ok());
        assert!(Baseline::FirstValid.validate().is_ok());
    }
}
