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

use std::time::Duration;

/// Render an elapsed time in the most readable unit.
///
/// Durations of at least one second are printed in seconds, durations of at
/// least one millisecond in milliseconds, everything else in microseconds.
/// At most three decimal digits are kept and trailing zeros are trimmed.
/// The decimal separator is always `.`, independent of locale.
pub fn pretty_duration(duration: Duration) -> String {
    if duration.as_secs() >= 1 {
        format!("{}s", trim_decimals(duration.as_secs_f64()))
    } else if duration.subsec_millis() >= 1 {
        format!(
            "{}ms",
            trim_decimals(duration.subsec_nanos() as f64 / 1_000_000.0)
        )
    } else {
        format!(
            "{}µs",
            trim_decimals(duration.subsec_nanos() as f64 / 1_000.0)
        )
    }
}

fn trim_decimals(value: f64) -> String {
    let rendered = format!("{value:.3}");
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_owned()
}
