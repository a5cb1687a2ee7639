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
use std::time::{Duration, Instant};

use indicatif::ProgressBar;

use crate::error::BenchmarkError;

/// Timing gathered by a benchmark run.
///
/// `elapsed` covers the iterations that actually ran, whether or not the
/// run completed; `failure` carries the error that stopped it early.
#[derive(Debug)]
pub struct RunOutcome {
    pub elapsed: Duration,
    pub completed: u32,
    pub requested: u32,
    pub failure: Option<BenchmarkError>,
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    /// Average duration of one completed iteration, `None` when the very
    /// first iteration failed.
    pub fn average(&self) -> Option<Duration> {
        (self.completed >= 1).then(|| self.elapsed / self.completed)
    }
}

/// Drive `iterations` invocations of `test` against `session`, stopping at
/// the first failure.
///
/// Timing uses a monotonic clock read before and after the loop, so clock
/// adjustments cannot skew the result. The progress bar ticks once per
/// completed iteration and has no effect on control flow.
pub fn run_benchmark<S, F>(
    session: &mut S,
    mut test: F,
    iterations: NonZeroU32,
    progress: &ProgressBar,
) -> RunOutcome
where
    F: FnMut(&mut S) -> Result<(), BenchmarkError>,
{
    let requested = iterations.get();
    let mut completed = 0;
    let mut failure = None;

    let start = Instant::now();
    for _ in 0..requested {
        match test(session) {
            Ok(()) => {
                completed += 1;
                progress.inc(1);
            }
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }
    let elapsed = start.elapsed();

    RunOutcome {
        elapsed,
        completed,
        requested,
        failure,
    }
}
