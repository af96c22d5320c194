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

//! CSV export for benchmark results.
//!
//! Layout: `<Label>,Time_ms,Speedup,Efficiency_pct`, one record per
//! configured worker count in sweep order, with `ERROR` in place of values a
//! failed run cannot provide.

use crate::error::{BenchError, Result};
use crate::reporters::console::ERROR_MARKER;
use crate::reporters::types::ResultTable;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes `table` as CSV to `writer`.
pub fn write_csv<W: Write>(table: &ResultTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        table.worker_label.as_str(),
        "Time_ms",
        "Speedup",
        "Efficiency_pct",
    ])?;
    for row in &table.rows {
        wtr.write_record([
            row.worker_count.to_string(),
            fixed(row.time_ms, 3),
            fixed(row.speedup, 3),
            fixed(row.efficiency_pct, 1),
        ])?;
    }
    wtr.flush()
        .map_err(|e| BenchError::Csv(format!("flush failed: {}", e)))?;
    Ok(())
}

/// Exports `table` as CSV to `path`, replacing any existing file.
pub fn export_csv(table: &ResultTable, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| BenchError::io_error(path, e))?;
    write_csv(table, file)
}

fn fixed(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => ERROR_MARKER.to_string(),
    }
}
