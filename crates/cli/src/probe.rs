//! TCP connectivity probe.

use fetch::ConnectivityProbe;
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;
use tokio::runtime::{Handle, RuntimeFlavor};

/// Reports the network as reachable when a TCP connection to `address`
/// succeeds within `timeout`.
///
/// Only consulted after a host failed to resolve, so the blocking connect
/// runs at most once per failed fetch. On a multi-threaded tokio runtime the
/// connect runs under `block_in_place` so other tasks keep their worker.
/// A current-thread runtime stalls for up to `timeout`.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: SocketAddr,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(address: SocketAddr, timeout: Duration) -> Self {
        Self { address, timeout }
    }
}

impl ConnectivityProbe for TcpProbe {
    fn has_network(&self) -> bool {
        let connect = || TcpStream::connect_timeout(&self.address, self.timeout);
        let result = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(connect)
            }
            _ => connect(),
        };
        match result {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(address = %self.address, error = %e, "connectivity probe failed");
                false
            }
        }
    }
}
