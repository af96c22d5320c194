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

//! Extraction of a program's self-reported timing.
//!
//! Solvers commonly print a line such as `Execution time: 0.512340 seconds`.
//! The first line carrying a known label whose value parses wins.

use crate::core::config::ReportUnit;

/// Labels that mark a timing line.
pub const TIMING_LABELS: &[&str] = &["Execution time:", "Time:"];

/// Parses the self-reported run time from captured stdout, in milliseconds.
///
/// The value is the first whitespace-delimited token after the first colon
/// on a matching line. A recognised unit token right after it (`s`, `ms`,
/// `us`, ...) overrides `default_unit`. Lines whose value does not parse, or
/// is not a positive time, are skipped.
///
/// # Examples
///
/// ```
/// use jacobi_bench::core::ReportUnit;
/// use jacobi_bench::harness::parse_reported_time;
///
/// let out = "Grid: 500x500\nExecution time: 0.250000 seconds\n";
/// assert_eq!(parse_reported_time(out, ReportUnit::Seconds), Some(250.0));
/// assert_eq!(parse_reported_time("no timing here", ReportUnit::Seconds), None);
/// ```
pub fn parse_reported_time(stdout: &str, default_unit: ReportUnit) -> Option<f64> {
    stdout
        .lines()
        .filter(|line| TIMING_LABELS.iter().any(|label| line.contains(label)))
        .find_map(|line| parse_timing_line(line, default_unit))
}

fn parse_timing_line(line: &str, default_unit: ReportUnit) -> Option<f64> {
    let (_, rest) = line.split_once(':')?;
    let mut tokens = rest.split_whitespace();
    let value: f64 = tokens.next()?.parse().ok()?;
    let unit = tokens
        .next()
        .and_then(ReportUnit::from_token)
        .unwrap_or(default_unit);
    let ms = value * unit.to_ms_factor();
    (ms.is_finite() && ms > 0.0).then_some(ms)
}
