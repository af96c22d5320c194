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

//! JSON export for benchmark results.

use crate::error::{BenchError, Result};
use crate::reporters::types::ResultTable;
use std::fs;
use std::path::Path;

/// Serializes `table` as pretty-printed JSON.
pub fn to_json_string(table: &ResultTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(table)?)
}

/// Exports `table` as JSON to `path`.
pub fn export_json(table: &ResultTable, path: &Path) -> Result<()> {
    let json = to_json_string(table)?;
    fs::write(path, json).map_err(|e| BenchError::io_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::measurement::{Measurement, TimingSource};
    use crate::core::Baseline;
    use std::num::NonZeroUsize;
    use tempfile::NamedTempFile;

    #[test]
    fn test_export_json() {
        let runs = vec![Measurement::timed(
            NonZeroUsize::new(1).unwrap(),
            80.0,
            TimingSource::SelfReported,
        )];
        let table = ResultTable::build("PERFORMANCE RESULTS", "Threads", &runs, Baseline::FirstValid);
        let temp = NamedTempFile::new().unwrap();

        export_json(&table, temp.path()).unwrap();

        let content = fs::read_to_string(temp.path()).unwrap();
        let back: ResultTable = serde_json::from_str(&content).unwrap();
        assert_eq!(back.title, "PERFORMANCE RESULTS");
        assert_eq!(back.rows.len(), 1);
        assert!(content.contains("\"self_reported\""));
        assert!(content.contains("\"best_speedup\""));
    }
}
