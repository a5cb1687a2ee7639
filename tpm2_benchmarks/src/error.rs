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

/// Errors raised by the benchmark harness.
///
/// Configuration problems are detected before any transport activity;
/// everything else is fatal for the current run and carries enough
/// context to tell which stage failed.
#[derive(Debug, thiserror::Error)]
pub enum BenchmarkError {
    #[error("unrecognized test name: '{name}'. supported tests: {supported}")]
    UnknownBenchmark { name: String, supported: String },
    #[error("could not connect to the TPM simulator at {endpoint}: {source}")]
    Connection {
        endpoint: String,
        source: std::io::Error,
    },
    #[error("simulator platform channel I/O failed during '{command}': {source}")]
    PlatformIo {
        command: &'static str,
        source: std::io::Error,
    },
    #[error("simulator rejected platform command '{command}': response code {code:#010x}")]
    Platform { command: &'static str, code: u32 },
    #[error("could not open an ESAPI context with the TPM simulator: {0}")]
    Context(tss_esapi::Error),
    #[error("TPM startup failed: {0}")]
    Startup(tss_esapi::Error),
    #[error("unsealed incorrect data")]
    UnsealMismatch,
    #[error("test '{test}' aborted after {completed} completed iterations: {reason}")]
    Aborted {
        test: &'static str,
        completed: u32,
        reason: String,
    },
    #[error(transparent)]
    Tss(#[from] tss_esapi::Error),
}
