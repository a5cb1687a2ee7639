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

use std::str::FromStr;
use std::time::Duration;

use tracing::debug;
use tss_esapi::constants::StartupType;
use tss_esapi::tcti_ldr::TctiNameConf;
use tss_esapi::Context;

use crate::error::BenchmarkError;
use crate::simulator::PlatformControl;

/// Endpoint of the TPM simulator and the socket timeout applied to the
/// platform channel.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            host: "127.0.0.1".to_owned(),
            port: 2321,
            timeout: Duration::from_millis(2000),
        }
    }
}

impl SessionConfig {
    /// The simulator accepts platform signals on the port after the command port.
    fn platform_port(&self) -> u16 {
        self.port + 1
    }

    fn tcti(&self) -> Result<TctiNameConf, BenchmarkError> {
        TctiNameConf::from_str(&format!("mssim:host={},port={}", self.host, self.port))
            .map_err(BenchmarkError::Context)
    }
}

/// A live session with the simulated TPM.
///
/// Acquisition connects the platform channel, power-cycles the simulator,
/// opens an ESAPI context over the mssim TCTI and issues a startup with
/// clear state. Any of those steps failing aborts before a single timed
/// iteration runs, and whatever was opened up to that point is released.
///
/// Every device response is checked by the ESAPI layer, so a response that
/// violates the protocol contract surfaces as an error instead of being
/// tolerated. The session owns both connections; dropping it finalizes the
/// context (closing the command socket) and ends the platform session.
pub struct TpmSession {
    context: Context,
    _platform: PlatformControl,
}

impl TpmSession {
    pub fn acquire(config: &SessionConfig) -> Result<Self, BenchmarkError> {
        let mut platform =
            PlatformControl::connect(&config.host, config.platform_port(), config.timeout)?;
        platform.power_cycle()?;

        let mut context = Context::new(config.tcti()?).map_err(BenchmarkError::Context)?;
        context
            .startup(StartupType::Clear)
            .map_err(BenchmarkError::Startup)?;
        debug!(
            host = %config.host,
            port = config.port,
            "TPM session established"
        );

        Ok(TpmSession {
            context,
            _platform: platform,
        })
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }
}

#[cfg(test)]
mod tests {
    use super::SessionConfig;
    use std::time::Duration;

    #[test]
    fn default_config_targets_the_local_simulator() {
        let config = SessionConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 2321);
        assert_eq!(config.timeout, Duration::from_millis(2000));
    }

    #[test]
    fn platform_channel_follows_the_command_port() {
        let config = SessionConfig::default();
        assert_eq!(config.platform_port(), 2322);
    }
}
