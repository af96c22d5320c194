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

//! Utility commands.

use crate::commands;
use clap::{CommandFactory, Subcommand};
use clap_complete::Shell;
use std::io;

/// Utility commands.
#[derive(Subcommand)]
pub enum UtilityCommands {
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum, value_name = "SHELL")]
        shell: Shell,

        /// Print installation instructions instead of generating script
        #[arg(short, long)]
        install: bool,
    },
}

impl UtilityCommands {
    /// Execute the utility command.
    pub fn execute(self) -> Result<(), String> {
        match self {
            UtilityCommands::Completion { shell, install } => {
                if install {
                    print!("{}", commands::installation_instructions(shell));
                } else {
                    let mut cmd = super::Cli::command();
                    commands::write_completion(shell, &mut cmd, &mut io::stdout().lock());
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_shell_parsed_by_clap() {
        let cli = Cli::try_parse_from(["jacobi-bench", "completion", "powershell"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Utility(UtilityCommands::Completion {
                shell: Shell::PowerShell,
                install: false,
            })
        ));
    }

    #[test]
    fn test_unknown_shell_rejected_by_parser() {
        let err = Cli::try_parse_from(["jacobi-bench", "completion", "tcsh"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
