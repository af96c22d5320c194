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

//! Shell completion scripts.

use clap::Command;
use clap_complete::{generate, Generator, Shell};
use std::io::Write;

/// Name completions are registered under.
pub const BIN_NAME: &str = "jacobi-bench";

/// Writes the `shell` completion script for `cmd` to `out`.
pub fn write_completion(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    generate(shell, cmd, BIN_NAME, out);
}

/// Returns instructions for enabling `shell` completions.
///
/// ```
/// use clap_complete::Shell;
/// use jacobi_bench_cli::commands::installation_instructions;
///
/// assert!(installation_instructions(Shell::Zsh).contains("_jacobi-bench"));
/// ```
pub fn installation_instructions(shell: Shell) -> String {
    let script = format!("{} completion {}", BIN_NAME, shell);
    match shell {
        Shell::Bash => format!(
            "# Current session:\neval \"$({})\"\n\n# Every session:\n{} > ~/.local/share/bash-completion/completions/{}\n",
            script, script, BIN_NAME
        ),
        Shell::Zsh => format!(
            "# Save into a directory listed in $fpath:\n{} > ~/.zsh/completions/{}\n",
            script,
            shell.file_name(BIN_NAME)
        ),
        Shell::Fish => format!(
            "{} > ~/.config/fish/completions/{}\n",
            script,
            shell.file_name(BIN_NAME)
        ),
        Shell::PowerShell => format!(
            "# Add to $PROFILE:\n{} | Out-String | Invoke-Expression\n",
            script
        ),
        Shell::Elvish => format!("# Add to ~/.config/elvish/rc.elv:\neval ({} | slurp)\n", script),
        _ => format!(
            "# Save the output of `{}` where {} loads completions.\n",
            script, shell
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, ValueEnum};

    fn sample_command() -> Command {
        Command::new(BIN_NAME)
            .subcommand(Command::new("threads").arg(Arg::new("counts").long("counts")))
    }

    fn script_for(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completion(shell, &mut sample_command(), &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_bash_script_registers_binary() {
        let script = script_for(Shell::Bash);
        assert!(script.contains("COMPREPLY"));
        assert!(script.contains(BIN_NAME));
        assert!(script.contains("--counts"));
    }

    #[test]
    fn test_every_shell_produces_a_script() {
        for shell in Shell::value_variants() {
            assert!(!script_for(*shell).is_empty(), "{}", shell);
        }
    }

    #[test]
    fn test_instructions_name_the_shell() {
        for shell in Shell::value_variants() {
            let text = installation_instructions(*shell);
            assert!(
                text.contains(&format!("{} completion {}", BIN_NAME, shell)),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_instructions_use_generator_file_names() {
        assert!(installation_instructions(Shell::Fish).contains("completions/jacobi-bench.fish"));
        assert!(installation_instructions(Shell::Zsh).contains("completions/_jacobi-bench"));
    }
}
