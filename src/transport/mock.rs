//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::Mutex;

use super::AgentTransport;
use crate::error::{Error, Result};

pub(crate) struct MockTransport {
    inbound: Mutex<VecDeque<(Vec<u8>, SocketAddr)>>,
    outbound: Mutex<Vec<(Vec<u8>, SocketAddr)>>,
    fail_sends: Mutex<bool>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self {
            inbound: Mutex::new(VecDeque::new()),
            outbound: Mutex::new(Vec::new()),
            fail_sends: Mutex::new(false),
        }
    }

    pub(crate) fn push_inbound(&self, data: &[u8], source: SocketAddr) {
        self.inbound.lock().unwrap().push_back((data.to_vec(), source));
    }

    pub(crate) fn take_outbound(&self) -> Vec<(Vec<u8>, SocketAddr)> {
        std::mem::take(&mut *self.outbound.lock().unwrap())
    }

    pub(crate) fn fail_sends(&self, fail: bool) {
        *self.fail_sends.lock().unwrap() = fail;
    }
}

impl AgentTransport for MockTransport {
    fn try_recv_from(&self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>> {
        let Some((data, source)) = self.inbound.lock().unwrap().pop_front() else {
            return Ok(None);
        };
        // Truncate like a datagram socket would
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        Ok(Some((n, source)))
    }

    fn try_send_to(&self, data: &[u8], target: SocketAddr) -> Result<()> {
        if *self.fail_sends.lock().unwrap() {
            return Err(Error::Io {
                target: Some(target),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "mock send failure"),
            });
        }
        self.outbound.lock().unwrap().push((data.to_vec(), target));
        Ok(())
    }

    fn local_addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 161))
    }
}
