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

//! Build step for solvers that ship as source.
//!
//! The executable is rebuilt only when it is missing or older than its
//! source. A failed build is fatal: there is nothing left to benchmark.

use crate::error::{BenchError, Result, COMPILER_HINT};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Compilers probed on `PATH`, in order.
pub const COMPILER_CANDIDATES: &[&str] = &["gcc", "clang"];

/// Flags used for OpenMP builds.
pub const OPENMP_FLAGS: &[&str] = &["-O3", "-fopenmp"];

/// Source file plus the compiler invocation that turns it into the executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// C source of the solver.
    pub source: PathBuf,
    /// Compiler to use; probed from [`COMPILER_CANDIDATES`] when `None`.
    pub compiler: Option<String>,
    /// Flags appended after `-o <exe>`.
    pub flags: Vec<String>,
}

impl Toolchain {
    /// OpenMP build of `source` with the first available compiler.
    pub fn openmp(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            compiler: None,
            flags: OPENMP_FLAGS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Pins the compiler.
    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler = Some(compiler.into());
        self
    }

    /// Replaces the compiler flags.
    pub fn with_flags(mut self, flags: Vec<String>) -> Self {
        self.flags = flags;
        self
    }

    /// Returns the compiler to run.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::CompilerNotFound`] when no compiler is pinned and
    /// none of [`COMPILER_CANDIDATES`] is on `PATH`.
    pub fn select_compiler(&self) -> Result<String> {
        if let Some(compiler) = &self.compiler {
            return Ok(compiler.clone());
        }
        COMPILER_CANDIDATES
            .iter()
            .find(|name| find_on_path(name).is_some())
            .map(|name| name.to_string())
            .ok_or_else(|| BenchError::CompilerNotFound {
                tried: COMPILER_CANDIDATES.join(", "),
                hint: COMPILER_HINT.to_string(),
            })
    }

    /// Rebuilds `executable` from `source` if it is missing or stale.
    ///
    /// Both paths must already be resolved. Returns `true` when a build ran.
    ///
    /// # Errors
    ///
    /// - [`BenchError::MissingSource`] if a rebuild is needed but `source` is absent
    /// - [`BenchError::CompilerNotFound`] if no compiler is available
    /// - [`BenchError::CompilationFailed`] if the compiler fails
    pub fn ensure_built(
        &self,
        executable: &Path,
        source: &Path,
        working_dir: Option<&Path>,
    ) -> Result<bool> {
        if !needs_rebuild(executable, source)? {
            debug!(executable = %executable.display(), "executable is up to date");
            return Ok(false);
        }
        if !source.is_file() {
            return Err(BenchError::MissingSource {
                path: source.to_path_buf(),
            });
        }

        let compiler = self.select_compiler()?;
        let args = self.compiler_args(executable, source);
        let command_line = render_command(&compiler, &args);
        info!("Compiling: {}", command_line);

        let mut command = Command::new(&compiler);
        command.args(&args);
        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }

        let status = command
            .status()
            .map_err(|e| BenchError::CompilationFailed {
                command: command_line.clone(),
                reason: e.to_string(),
                hint: COMPILER_HINT.to_string(),
            })?;
        if !status.success() {
            return Err(BenchError::CompilationFailed {
                command: command_line,
                reason: status.to_string(),
                hint: COMPILER_HINT.to_string(),
            });
        }
        Ok(true)
    }

    /// `<source> -o <exe> <flags...>`
    fn compiler_args(&self, executable: &Path, source: &Path) -> Vec<OsString> {
        let mut args = vec![
            source.as_os_str().to_owned(),
            OsString::from("-o"),
            executable.as_os_str().to_owned(),
        ];
        args.extend(self.flags.iter().map(OsString::from));
        args
    }
}

/// Returns `true` if `executable` is absent or strictly older than `source`.
///
/// A missing source never forces a rebuild of an existing executable.
///
/// # Errors
///
/// Returns [`BenchError::Io`] if modification times cannot be read.
pub fn needs_rebuild(executable: &Path, source: &Path) -> Result<bool> {
    if !executable.exists() {
        return Ok(true);
    }
    if !source.exists() {
        return Ok(false);
    }
    let exe_time = modified(executable)?;
    let src_time = modified(source)?;
    Ok(exe_time < src_time)
}

fn modified(path: &Path) -> Result<std::time::SystemTime> {
    path.metadata()
        .and_then(|m| m.modified())
        .map_err(|e| BenchError::io_error(path, e))
}

/// Finds `name` in the directories listed by `PATH`.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths).find_map(|dir| {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = candidate.with_extension("exe");
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

fn render_command(program: &str, args: &[OsString]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}
