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

//! Derived result table.
//!
//! A [`ResultTable`] is a pure function of the measurements and the baseline.
//! It is rebuilt for every report and only persisted through the exporters.

use crate::core::baseline::{Baseline, ResolvedBaseline};
use crate::core::measurement::{Measurement, TimingSource};
use serde::{Deserialize, Serialize};

/// One row per configured worker count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Processes or threads.
    pub worker_count: usize,
    /// Elapsed time in milliseconds, `None` for failed runs.
    pub time_ms: Option<f64>,
    /// Baseline time divided by `time_ms`.
    pub speedup: Option<f64>,
    /// Speedup per worker, as a percentage.
    pub efficiency_pct: Option<f64>,
    /// Origin of `time_ms`.
    pub source: Option<TimingSource>,
    /// Failure description for failed runs.
    pub failure: Option<String>,
}

/// The row that won a "best" comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestEntry {
    /// Worker count of the winning row.
    pub worker_count: usize,
    /// Its time in milliseconds.
    pub time_ms: f64,
    /// Its speedup, if a baseline was available.
    pub speedup: Option<f64>,
}

/// Speedup/efficiency view over a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    /// Report heading.
    pub title: String,
    /// Worker column label (`Processes` or `Threads`).
    pub worker_label: String,
    /// Requested baseline.
    pub baseline: Baseline,
    /// Baseline actually used, `None` if it could not be resolved.
    pub resolved_baseline: Option<ResolvedBaseline>,
    /// Rows in sweep order.
    pub rows: Vec<ResultRow>,
    /// Row with the highest speedup.
    pub best_speedup: Option<BestEntry>,
    /// Row with the lowest time.
    pub best_time: Option<BestEntry>,
}

impl ResultTable {
    /// Builds the table for `measurements` against `baseline`.
    ///
    /// Speedup is `baseline / time` and efficiency is `speedup / workers * 100`.
    /// Both are `None` for failed runs and when the baseline cannot be
    /// resolved. Failed runs never win either "best" comparison, and ties go
    /// to the earlier row.
    pub fn build(
        title: impl Into<String>,
        worker_label: impl Into<String>,
        measurements: &[Measurement],
        baseline: Baseline,
    ) -> Self {
        let resolved = baseline.resolve(measurements);

        let rows: Vec<ResultRow> = measurements
            .iter()
            .map(|m| {
                let time_ms = m.valid_ms();
                let speedup = match (resolved, time_ms) {
                    (Some(base), Some(t)) => Some(base.time_ms / t),
                    _ => None,
                };
                let efficiency_pct = speedup.map(|s| efficiency(s, m.worker_count.get()));
                ResultRow {
                    worker_count: m.worker_count.get(),
                    time_ms,
                    speedup,
                    efficiency_pct,
                    source: m.source(),
                    failure: m.failure().map(ToString::to_string),
                }
            })
            .collect();

        let best_speedup = best_by(&rows, |row| row.speedup);
        let best_time = best_by(&rows, |row| row.time_ms.map(|t| -t));

        Self {
            title: title.into(),
            worker_label: worker_label.into(),
            baseline,
            resolved_baseline: resolved,
            rows,
            best_speedup,
            best_time,
        }
    }

    /// Number of rows with a usable time.
    pub fn valid_count(&self) -> usize {
        self.rows.iter().filter(|r| r.time_ms.is_some()).count()
    }

    /// Number of failed rows.
    pub fn failed_count(&self) -> usize {
        self.rows.len() - self.valid_count()
    }
}

/// Parallel efficiency in percent.
pub fn efficiency(speedup: f64, worker_count: usize) -> f64 {
    speedup / worker_count as f64 * 100.0
}

/// First row with the strictly largest key.
fn best_by<F>(rows: &[ResultRow], key: F) -> Option<BestEntry>
where
    F: Fn(&ResultRow) -> Option<f64>,
{
    let mut best: Option<(f64, BestEntry)> = None;
    for row in rows {
        let (Some(k), Some(time_ms)) = (key(row), row.time_ms) else {
            continue;
        };
        if best.map_or(true, |(best_k, _)| k > best_k) {
            let entry = BestEntry {
                worker_count: row.worker_count,
                time_ms,
                speedup: row.speedup,
            };
            best = Some((k, entry));
        }
    }
    best.map(|(_, entry)| entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::measurement::RunFailure;
    use std::num::NonZeroUsize;

    fn ok(count: usize, ms: f64) -> Measurement {
        Measurement::timed(NonZeroUsize::new(count).unwrap(), ms, TimingSource::WallClock)
    }

    fn failed(count: usize) -> Measurement {
        Measurement::failed(
            NonZeroUsize::new(count).unwrap(),
            RunFailure::ExitStatus {
                code: Some(1),
                stderr: String::new(),
            },
        )
    }

    fn round2(x: f64) -> f64 {
        (x * 100.0).round() / 100.0
    }

    #[test]
    fn test_scaling_scenario() {
        let runs = vec![ok(1, 100.0), ok(2, 55.0), ok(4, 30.0)];
        let table = ResultTable::build("T", "Processes", &runs, Baseline::FirstValid);

        let speedups: Vec<f64> = table.rows.iter().map(|r| round2(r.speedup.unwrap())).collect();
        assert_eq!(speedups, vec![1.00, 1.82, 3.33]);

        let best = table.best_speedup.unwrap();
        assert_eq!(best.worker_count, 4);
        assert_eq!(round2(best.speedup.unwrap()), 3.33);
        assert_eq!(table.best_time.unwrap().worker_count, 4);
    }

    #[test]
    fn test_failed_row_excluded_from_best() {
        let runs = vec![ok(1, 100.0), failed(2)];
        let table = ResultTable::build("T", "Processes", &runs, Baseline::FirstValid);

        assert_eq!(table.rows[1].time_ms, None);
        assert_eq!(table.rows[1].speedup, None);
        assert_eq!(table.rows[1].failure.as_deref(), Some("exited with code 1"));

        let best = table.best_speedup.unwrap();
        assert_eq!(best.worker_count, 1);
        assert_eq!(best.speedup, Some(1.0));
        assert_eq!(table.failed_count(), 1);
    }

    #[test]
    fn test_efficiency_formula() {
        let runs = vec![ok(1, 100.0), ok(4, 40.0)];
        let table = ResultTable::build("T", "Threads", &runs, Baseline::FirstValid);
        let row = &table.rows[1];
        assert_eq!(
            row.efficiency_pct.unwrap(),
            row.speedup.unwrap() / 4.0 * 100.0
        );
        assert_eq!(table.rows[0].efficiency_pct, Some(100.0));
    }

    #[test]
    fn test_unresolved_baseline_has_no_speedups() {
        let runs = vec![failed(1), ok(2, 50.0)];
        let table = ResultTable::build("T", "Threads", &runs, Baseline::WorkerCount(1));

        assert!(table.resolved_baseline.is_none());
        assert!(table.rows.iter().all(|r| r.speedup.is_none()));
        assert!(table.best_speedup.is_none());
        assert_eq!(table.best_time.unwrap().worker_count, 2);
    }

    #[test]
    fn test_explicit_baseline() {
        let runs = vec![ok(1, 200.0), ok(2, 50.0)];
        let table = ResultTable::build("T", "Threads", &runs, Baseline::Explicit(100.0));
        assert_eq!(table.rows[0].speedup, Some(0.5));
        assert_eq!(table.rows[1].speedup, Some(2.0));
    }

    #[test]
    fn test_tie_goes_to_first_row() {
        let runs = vec![ok(1, 100.0), ok(2, 50.0), ok(4, 50.0)];
        let table = ResultTable::build("T", "Threads", &runs, Baseline::FirstValid);
        assert_eq!(table.best_speedup.unwrap().worker_count, 2);
        assert_eq!(table.best_time.unwrap().worker_count, 2);
    }

    #[test]
    fn test_empty_sweep() {
        let table = ResultTable::build("T", "Threads", &[], Baseline::FirstValid);
        assert!(table.rows.is_empty());
        assert!(table.best_speedup.is_none());
        assert!(table.best_time.is_none());
    }
}
