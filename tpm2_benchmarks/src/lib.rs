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

//! Micro-benchmarks for a TPM 2.0 simulator reachable over TCP.
//!
//! The harness acquires a session with the simulator (connect, power cycle,
//! startup with clear state), runs a selected operation sequence for a fixed
//! number of iterations and reports total and per-iteration wall time.

pub mod error;
pub mod pretty;
pub mod registry;
pub mod runner;
pub mod session;
pub mod simulator;
pub mod workloads;

pub use error::BenchmarkError;
pub use registry::Benchmark;
pub use runner::{run_benchmark, RunOutcome};
pub use session::{SessionConfig, TpmSession};
