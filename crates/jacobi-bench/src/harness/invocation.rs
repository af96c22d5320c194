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

//! Command lines for a single run.

use crate::core::config::{BenchmarkConfig, ParallelismMode};
use std::ffi::OsString;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// A fully resolved process launch: program, arguments, extra environment.
///
/// The requested worker count is carried either in `args` (launcher mode) or
/// in `env` (environment mode). The harness's own environment is never
/// modified; `env` entries are applied to the child only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to spawn.
    pub program: OsString,
    /// Arguments after the program.
    pub args: Vec<OsString>,
    /// Variables added to the inherited environment of the child.
    pub env: Vec<(OsString, OsString)>,
    /// Directory the child runs in.
    pub working_dir: Option<PathBuf>,
}

impl Invocation {
    /// Builds the invocation for one worker count.
    ///
    /// `executable` and `input` must already be resolved; see
    /// [`BenchmarkDriver::prepare`](crate::harness::BenchmarkDriver::prepare).
    pub fn for_count(
        config: &BenchmarkConfig,
        executable: &Path,
        input: Option<&Path>,
        count: NonZeroUsize,
    ) -> Self {
        let mut program_args: Vec<OsString> = Vec::new();
        if let Some(input) = input {
            program_args.push(input.as_os_str().to_owned());
        }
        program_args.extend(config.args.iter().map(OsString::from));

        let (program, args, env) = match &config.mode {
            ParallelismMode::Launcher {
                program,
                count_flag,
            } => {
                let mut args = Vec::with_capacity(program_args.len() + 3);
                if !count_flag.is_empty() {
                    args.push(OsString::from(count_flag));
                }
                args.push(OsString::from(count.to_string()));
                args.push(executable.as_os_str().to_owned());
                args.extend(program_args);
                (OsString::from(program), args, Vec::new())
            }
            ParallelismMode::EnvVar { name } => (
                executable.as_os_str().to_owned(),
                program_args,
                vec![(OsString::from(name), OsString::from(count.to_string()))],
            ),
        };

        Self {
            program,
            args,
            env,
            working_dir: config.working_dir.clone(),
        }
    }

    /// Looks up an environment entry set for the child.
    pub fn env_value(&self, name: &str) -> Option<&OsString> {
        self.env
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={} ", key.to_string_lossy(), value.to_string_lossy())?;
        }
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
