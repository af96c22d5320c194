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

//! Console reporter for benchmark results.
//!
//! Renders a [`ResultTable`] as fixed-width text. Rendering is separate from
//! printing so the exact layout can be tested.

use crate::reporters::types::{BestEntry, ResultTable};
use std::fmt::Write;

/// Marker shown in place of values a failed run cannot provide.
pub const ERROR_MARKER: &str = "ERROR";

/// Spaces between columns.
const COLUMN_GAP: usize = 2;

/// Minimum width of the `=`/`-` rules.
const MIN_RULE: usize = 45;

/// Renders the full report: title, aligned table, and summary lines.
pub fn render_table(table: &ResultTable) -> String {
    let headers = [
        table.worker_label.clone(),
        "Time (ms)".to_string(),
        "Speedup".to_string(),
        "Efficiency (%)".to_string(),
    ];
    let cells: Vec<[String; 4]> = table
        .rows
        .iter()
        .map(|row| {
            [
                row.worker_count.to_string(),
                fmt_or_error(row.time_ms, |t| format!("{:.3}", t)),
                fmt_or_error(row.speedup, |s| format!("{:.2}x", s)),
                fmt_or_error(row.efficiency_pct, |e| format!("{:.1}", e)),
            ]
        })
        .collect();

    let mut widths = headers.clone().map(|h| h.len());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let table_width = widths.iter().sum::<usize>() + COLUMN_GAP * (widths.len() - 1);
    let rule_width = table_width.max(MIN_RULE).max(table.title.len());

    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(rule_width));
    let _ = writeln!(out, "{:^width$}", table.title, width = rule_width);
    let _ = writeln!(out, "{}", "=".repeat(rule_width));
    let _ = writeln!(out, "{}", format_row(&headers, &widths));
    let _ = writeln!(out, "{}", "-".repeat(rule_width));
    for row in &cells {
        let _ = writeln!(out, "{}", format_row(row, &widths));
    }
    let _ = writeln!(out, "{}", "-".repeat(rule_width));

    for line in summary_lines(table) {
        let _ = writeln!(out, "{}", line);
    }
    let _ = writeln!(out, "{}", "=".repeat(rule_width));
    out
}

/// Prints [`render_table`] to stdout.
pub fn print_table(table: &ResultTable) {
    println!();
    print!("{}", render_table(table));
    println!();
}

/// Baseline, best-speedup and best-time lines.
pub fn summary_lines(table: &ResultTable) -> Vec<String> {
    let unit = table.worker_label.to_lowercase();
    let mut lines = Vec::new();

    match table.resolved_baseline {
        Some(base) => match base.worker_count {
            Some(count) => lines.push(format!(
                "Baseline: {:.3} ms ({} {})",
                base.time_ms, count, unit
            )),
            None => lines.push(format!("Baseline: {:.3} ms (explicit)", base.time_ms)),
        },
        None => lines.push(format!(
            "Baseline: unavailable ({} has no valid time), speedups cannot be computed",
            table.baseline
        )),
    }

    if let Some(BestEntry {
        worker_count,
        speedup: Some(speedup),
        ..
    }) = table.best_speedup
    {
        lines.push(format!(
            "Best speedup: {:.2}x with {} {}",
            speedup, worker_count, unit
        ));
    }
    if let Some(best) = table.best_time {
        lines.push(format!(
            "Best time: {:.3} ms with {} {}",
            best.time_ms, best.worker_count, unit
        ));
    }
    if table.valid_count() == 0 {
        lines.push("No run completed successfully".to_string());
    }
    lines
}

fn fmt_or_error(value: Option<f64>, f: impl Fn(f64) -> String) -> String {
    value.map(f).unwrap_or_else(|| ERROR_MARKER.to_string())
}

fn format_row(cells: &[String; 4], widths: &[usize; 4]) -> String {
    let gap = " ".repeat(COLUMN_GAP);
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join(&gap)
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::measurement::{Measurement, RunFailure, TimingSource};
    use crate::core::Baseline;
    use std::num::NonZeroUsize;

    fn ok(count: usize, ms: f64) -> Measurement {
        Measurement::timed(NonZeroUsize::new(count).unwrap(), ms, TimingSource::WallClock)
    }

    fn failed(count: usize) -> Measurement {
        Measurement::failed(
            NonZeroUsize::new(count).unwrap(),
            RunFailure::TimedOut {
                after: std::time::Duration::from_secs(60),
            },
        )
    }

    #[test]
    fn test_render_scaling_table() {
        let runs = vec![ok(1, 100.0), ok(2, 55.0), ok(4, 30.0)];
        let table = ResultTable::build(
            "MPI JACOBI BENCHMARK RESULTS",
            "Processes",
            &runs,
            Baseline::FirstValid,
        );
        let text = render_table(&table);

        assert!(text.contains("MPI JACOBI BENCHMARK RESULTS"));
        assert!(text.contains("Processes  Time (ms)  Speedup  Efficiency (%)"));
        assert!(text.contains("1          100.000    1.00x    100.0"));
        assert!(text.contains("2          55.000     1.82x    90.9"));
        assert!(text.contains("4          30.000     3.33x    83.3"));
        assert!(text.contains("Best speedup: 3.33x with 4 processes"));
        assert!(text.contains("Best time: 30.000 ms with 4 processes"));
        assert!(text.contains("Baseline: 100.000 ms (1 processes)"));
    }

    #[test]
    fn test_render_error_row() {
        let runs = vec![ok(1, 100.0), failed(2)];
        let table = ResultTable::build("T", "Threads", &runs, Baseline::FirstValid);
        let text = render_table(&table);

        assert!(text.contains("2        ERROR      ERROR    ERROR"));
        assert!(text.contains("Best speedup: 1.00x with 1 threads"));
    }

    #[test]
    fn test_columns_are_aligned() {
        let runs = vec![ok(1, 12345.678), ok(16, 1.0)];
        let table = ResultTable::build("T", "Threads", &runs, Baseline::FirstValid);
        let text = render_table(&table);
        let lines: Vec<&str> = text.lines().collect();

        let header = lines.iter().find(|l| l.starts_with("Threads")).unwrap();
        let row = lines.iter().find(|l| l.starts_with("16")).unwrap();
        assert_eq!(header.find("Time (ms)"), row.find("1.000"));
    }

    #[test]
    fn test_unresolved_baseline_message() {
        let runs = vec![failed(1), ok(2, 50.0)];
        let table = ResultTable::build("T", "Threads", &runs, Baseline::WorkerCount(1));
        let lines = summary_lines(&table);
        assert!(lines[0].contains("unavailable"));
        assert!(!lines.iter().any(|l| l.starts_with("Best speedup")));
    }

    #[test]
    fn test_all_failed() {
        let runs = vec![failed(1), failed(2)];
        let table = ResultTable::build("T", "Processes", &runs, Baseline::FirstValid);
        let lines = summary_lines(&table);
        assert!(lines.contains(&"No run completed successfully".to_string()));
    }
}
