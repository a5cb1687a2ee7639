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

use std::num::NonZeroU32;
use std::process;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget};
use tracing::error;
use tracing_subscriber::EnvFilter;

use tpm2_benchmarks::pretty::pretty_duration;
use tpm2_benchmarks::{run_benchmark, Benchmark, BenchmarkError, SessionConfig, TpmSession};

#[derive(Parser)]
#[command(name = "tpm2-benchmarks")]
#[command(about = "Run TPM 2.0 micro-benchmarks against a TCP simulator")]
#[command(version)]
struct Cli {
    /// Which test to run
    #[arg(long = "test_name", default_value = "seal_unseal")]
    test_name: String,

    /// How many iterations of the test to run
    #[arg(long = "test_count", default_value = "1000")]
    test_count: NonZeroU32,

    /// Simulator host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Simulator TPM command port (the platform port is the next one up)
    #[arg(long, default_value_t = 2321)]
    port: u16,

    /// Socket timeout in milliseconds
    #[arg(long = "timeout-ms", default_value_t = 2000)]
    timeout_ms: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        error!("{err}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), BenchmarkError> {
    // Resolve the test before touching the network, so a bad name never
    // opens a connection.
    let benchmark = Benchmark::from_str(&cli.test_name)?;

    let config = SessionConfig {
        host: cli.host.clone(),
        port: cli.port,
        timeout: Duration::from_millis(cli.timeout_ms),
    };
    let mut session = TpmSession::acquire(&config)?;

    let progress = ProgressBar::with_draw_target(
        Some(u64::from(cli.test_count.get())),
        ProgressDrawTarget::stdout(),
    );
    let outcome = run_benchmark(
        &mut session,
        |session| benchmark.run_once(session),
        cli.test_count,
        &progress,
    );
    progress.finish_and_clear();
    drop(session);

    match outcome.failure {
        None => {
            // The average over completed iterations equals elapsed / requested
            // here, since every requested iteration completed.
            let average = outcome.average().unwrap_or_default();
            println!(
                "Completed test '{}' in {}.\n({} per iteration)\n",
                benchmark,
                pretty_duration(outcome.elapsed),
                pretty_duration(average)
            );
            Ok(())
        }
        Some(failure) => {
            if outcome.completed > 0 {
                println!(
                    "Ran {} of {} iterations of '{}' in {} before aborting.",
                    outcome.completed,
                    outcome.requested,
                    benchmark,
                    pretty_duration(outcome.elapsed)
                );
            }
            Err(BenchmarkError::Aborted {
                test: benchmark.name(),
                completed: outcome.completed,
                reason: failure.to_string(),
            })
        }
    }
}
