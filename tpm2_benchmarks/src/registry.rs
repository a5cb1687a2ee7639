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

use std::fmt::Display;
use std::str::FromStr;

use crate::error::BenchmarkError;
use crate::session::TpmSession;
use crate::workloads;

/// The set of operation sequences the harness can measure.
///
/// A benchmark is resolved from its name once at startup; per-iteration
/// dispatch is a plain `match` on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Benchmark {
    SealUnseal,
    PcrExtend,
    Rsa2048CreateSignVerify,
    EccP256CreateSignVerify,
}

impl Benchmark {
    pub const ALL: [Benchmark; 4] = [
        Benchmark::SealUnseal,
        Benchmark::PcrExtend,
        Benchmark::Rsa2048CreateSignVerify,
        Benchmark::EccP256CreateSignVerify,
    ];

    /// Canonical test name.
    pub fn name(&self) -> &'static str {
        match self {
            Benchmark::SealUnseal => "seal_unseal",
            Benchmark::PcrExtend => "pcr_extend",
            Benchmark::Rsa2048CreateSignVerify => "rsa_2048_create_sign_verify",
            Benchmark::EccP256CreateSignVerify => "ecc_p256_create_sign_verify",
        }
    }

    pub fn supported_names() -> String {
        Self::ALL
            .iter()
            .map(Benchmark::name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Execute one complete iteration of this benchmark against a live session.
    pub fn run_once(&self, session: &mut TpmSession) -> Result<(), BenchmarkError> {
        match self {
            Benchmark::SealUnseal => workloads::seal_unseal(session),
            Benchmark::PcrExtend => workloads::pcr_extend(session),
            Benchmark::Rsa2048CreateSignVerify => workloads::rsa_2048_create_sign_verify(session),
            Benchmark::EccP256CreateSignVerify => workloads::ecc_p256_create_sign_verify(session),
        }
    }
}

impl FromStr for Benchmark {
    type Err = BenchmarkError;

    /// Case-insensitive match against the canonical name or an alias.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "seal" | "seal_unseal" => Ok(Benchmark::SealUnseal),
            "pcr" | "pcr_extend" => Ok(Benchmark::PcrExtend),
            "rsa" | "rsa_2048_create_sign_verify" => Ok(Benchmark::Rsa2048CreateSignVerify),
            "ecc" | "ecc_p256_create_sign_verify" => Ok(Benchmark::EccP256CreateSignVerify),
            _ => Err(BenchmarkError::UnknownBenchmark {
                name: name.to_owned(),
                supported: Self::supported_names(),
            }),
        }
    }
}

impl Display for Benchmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::Benchmark;
    use crate::error::BenchmarkError;
    use std::str::FromStr;

    #[test]
    fn canonical_names_resolve() {
        for benchmark in Benchmark::ALL {
            assert_eq!(Benchmark::from_str(benchmark.name()).unwrap(), benchmark);
        }
    }

    #[test]
    fn aliases_resolve_to_the_same_benchmark() {
        let pairs = [
            ("seal", Benchmark::SealUnseal),
            ("pcr", Benchmark::PcrExtend),
            ("rsa", Benchmark::Rsa2048CreateSignVerify),
            ("ecc", Benchmark::EccP256CreateSignVerify),
        ];
        for (alias, expected) in pairs {
            assert_eq!(Benchmark::from_str(alias).unwrap(), expected);
        }
    }

    #[test]
    fn resolution_is_case_insensitive() {
        assert_eq!(
            Benchmark::from_str("SEAL_UNSEAL").unwrap(),
            Benchmark::SealUnseal
        );
        assert_eq!(
            Benchmark::from_str("Rsa").unwrap(),
            Benchmark::Rsa2048CreateSignVerify
        );
    }

    #[test]
    fn unknown_names_are_rejected_with_the_supported_list() {
        let err = Benchmark::from_str("not_a_real_test").unwrap_err();
        match err {
            BenchmarkError::UnknownBenchmark { name, supported } => {
                assert_eq!(name, "not_a_real_test");
                for benchmark in Benchmark::ALL {
                    assert!(supported.contains(benchmark.name()));
                }
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
