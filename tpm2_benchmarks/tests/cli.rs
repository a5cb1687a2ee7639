// Copyright 2025 Fondazione LINKS

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//     http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command-line surface checks. None of these need a simulator: the
//! configuration errors they provoke must be reported before any
//! connection attempt.

use assert_cmd::Command;
use predicates::prelude::*;

fn harness() -> Command {
    Command::cargo_bin("tpm2-benchmarks").unwrap()
}

#[test]
fn unknown_test_name_fails_fast_without_a_simulator() {
    // No simulator is listening anywhere; a connection attempt would
    // surface as a connection error instead of the name diagnostic.
    harness()
        .args(["--test_name", "not_a_real_test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized test name"))
        .stderr(predicate::str::contains("seal_unseal"))
        .stderr(predicate::str::contains("pcr_extend"))
        .stderr(predicate::str::contains("rsa_2048_create_sign_verify"))
        .stderr(predicate::str::contains("ecc_p256_create_sign_verify"));
}

#[test]
fn zero_iteration_count_is_rejected_at_parse_time() {
    harness()
        .args(["--test_count", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--test_count"));
}

#[test]
fn negative_iteration_count_is_rejected_at_parse_time() {
    harness()
        .args(["--test_count", "-5"])
        .assert()
        .failure();
}

#[test]
fn connection_refusal_is_fatal_and_diagnosed() {
    // Point the harness at a loopback port with nothing listening.
    harness()
        .args(["--test_name", "pcr", "--port", "1", "--timeout-ms", "500"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not connect"));
}
