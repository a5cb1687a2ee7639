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

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::error::BenchmarkError;

// Platform signal codes understood by the Microsoft reference simulator.
const TPM_SIGNAL_POWER_ON: u32 = 1;
const TPM_SIGNAL_POWER_OFF: u32 = 2;
const TPM_SIGNAL_NV_ON: u32 = 11;
const TPM_SESSION_END: u32 = 20;

/// Client for the simulator's platform control channel.
///
/// The simulator listens on a second TCP port (command port + 1) for
/// platform signals. Each signal is a big-endian word and is acknowledged
/// with a zero word; any other acknowledgement is a protocol violation.
/// Dropping the client sends a session-end signal and closes the socket,
/// so the channel is released exactly once on every exit path.
#[derive(Debug)]
pub struct PlatformControl {
    stream: TcpStream,
}

impl PlatformControl {
    /// Connect to the platform channel with a bounded connect and I/O timeout.
    pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self, BenchmarkError> {
        let endpoint = format!("{host}:{port}");
        let connection = || -> std::io::Result<TcpStream> {
            let address = (host, port)
                .to_socket_addrs()?
                .next()
                .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::AddrNotAvailable))?;
            let stream = TcpStream::connect_timeout(&address, timeout)?;
            stream.set_read_timeout(Some(timeout))?;
            stream.set_write_timeout(Some(timeout))?;
            stream.set_nodelay(true)?;
            Ok(stream)
        };
        let stream = connection().map_err(|source| BenchmarkError::Connection { endpoint, source })?;
        debug!(host, port, "connected to the simulator platform channel");
        Ok(PlatformControl { stream })
    }

    /// Reset the simulator's volatile state, as if the device were cold booted.
    pub fn power_cycle(&mut self) -> Result<(), BenchmarkError> {
        self.signal("power off", TPM_SIGNAL_POWER_OFF)?;
        self.signal("power on", TPM_SIGNAL_POWER_ON)?;
        self.signal("NV on", TPM_SIGNAL_NV_ON)?;
        debug!("simulator power cycled");
        Ok(())
    }

    fn signal(&mut self, command: &'static str, code: u32) -> Result<(), BenchmarkError> {
        self.stream
            .write_all(&code.to_be_bytes())
            .map_err(|source| BenchmarkError::PlatformIo { command, source })?;
        let mut ack = [0u8; 4];
        self.stream
            .read_exact(&mut ack)
            .map_err(|source| BenchmarkError::PlatformIo { command, source })?;
        let ack = u32::from_be_bytes(ack);
        if ack != 0 {
            return Err(BenchmarkError::Platform { command, code: ack });
        }
        Ok(())
    }
}

impl Drop for PlatformControl {
    fn drop(&mut self) {
        // Best effort: the simulator tolerates a dropped connection, but a
        // clean session end keeps it from logging a broken pipe.
        let _ = self.stream.write_all(&TPM_SESSION_END.to_be_bytes());
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Accepts one connection, acknowledges every signal with `ack` and
    /// reports the received codes (terminated by EOF) on a channel.
    fn spawn_platform_stub(ack: u32) -> (u16, mpsc::Receiver<Vec<u32>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut received = Vec::new();
            let mut word = [0u8; 4];
            while stream.read_exact(&mut word).is_ok() {
                received.push(u32::from_be_bytes(word));
                let _ = stream.write_all(&ack.to_be_bytes());
            }
            sender.send(received).unwrap();
        });
        (port, receiver)
    }

    #[test]
    fn power_cycle_sends_the_expected_signals_and_session_end_once() {
        let (port, receiver) = spawn_platform_stub(0);
        let mut control =
            PlatformControl::connect("127.0.0.1", port, Duration::from_millis(2000)).unwrap();
        control.power_cycle().unwrap();
        drop(control);

        let received = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            received,
            vec![
                TPM_SIGNAL_POWER_OFF,
                TPM_SIGNAL_POWER_ON,
                TPM_SIGNAL_NV_ON,
                TPM_SESSION_END
            ]
        );
    }

    #[test]
    fn non_zero_acknowledgement_is_fatal() {
        let (port, _receiver) = spawn_platform_stub(0x101);
        let mut control =
            PlatformControl::connect("127.0.0.1", port, Duration::from_millis(2000)).unwrap();
        let err = control.power_cycle().unwrap_err();
        match err {
            BenchmarkError::Platform { command, code } => {
                assert_eq!(command, "power off");
                assert_eq!(code, 0x101);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn connection_failure_reports_the_endpoint() {
        // Bind and immediately drop a listener to get a port nothing accepts on.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let err = PlatformControl::connect("127.0.0.1", port, Duration::from_millis(500))
            .unwrap_err();
        match err {
            BenchmarkError::Connection { endpoint, .. } => {
                assert_eq!(endpoint, format!("127.0.0.1:{port}"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
