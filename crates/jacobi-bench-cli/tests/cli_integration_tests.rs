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

//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn bench_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("jacobi-bench").expect("Failed to find jacobi-bench binary");
    cmd.current_dir(dir.path()).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn write_solver(dir: &TempDir) {
    fs::write(
        dir.path().join("solver.sh"),
        r#"case "$OMP_NUM_THREADS" in
  1) echo "Execution time: 0.080 seconds" ;;
  2) echo "out of memory" >&2; exit 3 ;;
  *) echo "Execution time: 0.030 seconds" ;;
esac
"#,
    )
    .unwrap();
}

// ===== Help and Version Tests =====

#[test]
fn test_help_output() {
    let dir = TempDir::new().unwrap();
    bench_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("parallel scaling harness"))
        .stdout(predicate::str::contains("mpi"))
        .stdout(predicate::str::contains("threads"));
}

#[test]
fn test_version_output() {
    let dir = TempDir::new().unwrap();
    bench_cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jacobi-bench"));
}

// ===== Fatal Error Tests =====

#[test]
fn test_mpi_missing_executable() {
    let dir = TempDir::new().unwrap();
    bench_cmd(&dir)
        .arg("mpi")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("jacobi_mpi.exe"))
        .stderr(predicate::str::contains("not found"))
        .stdout(predicate::str::contains("Running with").not());

    assert!(!dir.path().join("benchmark_results.csv").exists());
}

#[test]
fn test_threads_missing_input() {
    let dir = TempDir::new().unwrap();
    bench_cmd(&dir)
        .args(["threads", "--exe", "/bin/sh", "--input", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file"))
        .stderr(predicate::str::contains("missing.txt"));
}

#[test]
fn test_omp_missing_source() {
    let dir = TempDir::new().unwrap();
    bench_cmd(&dir)
        .args(["omp", "--compiler", "cc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("jacobi_openmp.c"));
}

#[test]
fn test_invalid_report_unit() {
    let dir = TempDir::new().unwrap();
    bench_cmd(&dir)
        .args(["threads", "--report-unit", "hours"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid value 'hours' for '--report-unit <UNIT>'"));
}

#[test]
fn test_zero_count_rejected() {
    let dir = TempDir::new().unwrap();
    bench_cmd(&dir)
        .args(["mpi", "--counts", "1,0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("counts"));
}

// ===== Sweep Tests =====

#[cfg(unix)]
#[test]
fn test_threads_sweep_with_failed_run() {
    let dir = TempDir::new().unwrap();
    write_solver(&dir);

    bench_cmd(&dir)
        .args([
            "threads",
            "--exe",
            "/bin/sh",
            "--input",
            "solver.sh",
            "--counts",
            "1,2,4",
            "--csv",
            "results.csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("PERFORMANCE RESULTS"))
        .stdout(predicate::str::contains("Threads  Time (ms)  Speedup  Efficiency (%)"))
        .stdout(predicate::str::contains("exited with code 3"))
        .stdout(predicate::str::contains("Best speedup: 2.67x with 4 threads"))
        .stdout(predicate::str::contains("Results saved to results.csv"));

    let csv = fs::read_to_string(dir.path().join("results.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Threads,Time_ms,Speedup,Efficiency_pct");
    assert_eq!(lines[1], "1,80.000,1.000,100.0");
    assert_eq!(lines[2], "2,ERROR,ERROR,ERROR");
    assert_eq!(lines[3], "4,30.000,2.667,66.7");
}

#[cfg(unix)]
#[test]
fn test_threads_json_export() {
    let dir = TempDir::new().unwrap();
    write_solver(&dir);

    bench_cmd(&dir)
        .args([
            "threads",
            "--exe",
            "/bin/sh",
            "--input",
            "solver.sh",
            "--counts",
            "1,4",
            "--json",
            "results.json",
        ])
        .assert()
        .success();

    let json = fs::read_to_string(dir.path().join("results.json")).unwrap();
    assert!(json.contains("\"worker_label\": \"Threads\""));
    assert!(json.contains("\"self_reported\""));
}

#[cfg(unix)]
#[test]
fn test_unwritable_csv_is_fatal() {
    let dir = TempDir::new().unwrap();
    write_solver(&dir);

    bench_cmd(&dir)
        .args([
            "threads",
            "--exe",
            "/bin/sh",
            "--input",
            "solver.sh",
            "--counts",
            "1",
            "--csv",
            "no/such/dir/results.csv",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("PERFORMANCE RESULTS"))
        .stderr(predicate::str::contains("I/O error"));
}

// ===== Completion Tests =====

#[test]
fn test_completion_bash() {
    let dir = TempDir::new().unwrap();
    bench_cmd(&dir)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jacobi-bench"))
        .stdout(predicate::str::contains("COMPREPLY"));
}

#[test]
fn test_completion_install_instructions() {
    let dir = TempDir::new().unwrap();
    bench_cmd(&dir)
        .args(["completion", "fish", "--install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("completions/jacobi-bench.fish"));
}

#[test]
fn test_completion_unsupported_shell() {
    let dir = TempDir::new().unwrap();
    bench_cmd(&dir)
        .args(["completion", "tcsh"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid value 'tcsh'"))
        .stderr(predicate::str::contains("powershell"));
}
