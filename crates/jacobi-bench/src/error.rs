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

//! Error types for Jacobi benchmarking operations.
//!
//! Only conditions that stop a whole sweep live here. A single run that
//! crashes or times out is not an error: it is recorded as a
//! [`RunFailure`](crate::core::RunFailure) and the sweep moves on.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for benchmarking operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Fatal errors that abort a benchmark session before or after the sweep.
///
/// # Examples
///
/// ```rust,no_run
/// use jacobi_bench::error::BenchError;
///
/// fn read_input(path: &str) -> Result<String, BenchError> {
///     std::fs::read_to_string(path).map_err(|e| BenchError::io_error(path, e))
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BenchError {
    /// The executable to benchmark does not exist and cannot be built.
    #[error("Executable '{path}' not found")]
    MissingExecutable {
        /// Expected location of the executable
        path: PathBuf,
    },

    /// The input file handed to the executable does not exist.
    #[error("Input file '{path}' not found")]
    MissingInput {
        /// Expected location of the input file
        path: PathBuf,
    },

    /// A rebuild was required but the source file is absent.
    #[error("Source file '{path}' not found, cannot build the executable")]
    MissingSource {
        /// Expected location of the source file
        path: PathBuf,
    },

    /// Neither an explicit compiler nor any known compiler on `PATH`.
    #[error("No C compiler found (tried: {tried}). Hint: {hint}")]
    CompilerNotFound {
        /// Compilers that were searched for
        tried: String,
        /// Remediation hint for the user
        hint: String,
    },

    /// The compiler ran but did not produce an executable.
    #[error("Compilation failed: `{command}` ({reason}). Hint: {hint}")]
    CompilationFailed {
        /// The full compiler command line
        command: String,
        /// Exit status or spawn error
        reason: String,
        /// Remediation hint for the user
        hint: String,
    },

    /// Invalid configuration parameter
    #[error("Invalid configuration parameter '{parameter}': {reason}")]
    InvalidConfig {
        /// Parameter name
        parameter: String,
        /// Reason for invalidity
        reason: String,
    },

    /// I/O operation failed (metadata access, report writing).
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// CSV serialization failed.
    #[error("CSV export error: {0}")]
    Csv(String),

    /// JSON serialization failed.
    #[error("JSON export error: {0}")]
    Json(String),
}

/// Hint printed alongside compiler failures.
pub const COMPILER_HINT: &str = "install gcc (MinGW-w64 on Windows) or LLVM clang with OpenMP \
     support and make sure it is on PATH, or pass --compiler";

impl BenchError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the error is a missing prerequisite file.
    pub fn is_missing_prerequisite(&self) -> bool {
        matches!(
            self,
            Self::MissingExecutable { .. } | Self::MissingInput { .. } | Self::MissingSource { .. }
        )
    }
}

impl From<csv::Error> for BenchError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
