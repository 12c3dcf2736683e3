//! In-process unreliable datagram link.
//!
//! Models packet loss, duplication, reordering, delay jitter, and a
//! bandwidth (in-flight count) cap over a set of virtual ports kept in a
//! shared registry, so test code can stand up a "network" of any number of
//! peers without touching a real socket.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sessionlink_core::transport::{DatagramPort, PortError};
use tokio::sync::{mpsc, Semaphore};

use crate::config::LinkConfig;
use crate::delay::sample_delay;
use crate::error::SimError;

type Queue = mpsc::UnboundedSender<(Bytes, String)>;

struct Inner {
    config: LinkConfig,
    ports: Mutex<HashMap<String, Queue>>,
    rng: Mutex<ChaCha8Rng>,
    reorder_buf: Mutex<Vec<(Bytes, String, String)>>,
    bandwidth: Option<Semaphore>,
}

/// A shared, cloneable handle onto one simulated network.
#[derive(Clone)]
pub struct LinkSimulator {
    inner: Arc<Inner>,
}

impl LinkSimulator {
    /// Build a simulator from `config`, seeded deterministically from
    /// `seed` so test runs are reproducible.
    #[must_use]
    pub fn new(config: LinkConfig, seed: u64) -> Self {
        let bandwidth =
            (config.bandwidth_limit > 0).then(|| Semaphore::new(config.bandwidth_limit));
        Self {
            inner: Arc::new(Inner {
                config,
                ports: Mutex::new(HashMap::new()),
                rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
                reorder_buf: Mutex::new(Vec::new()),
                bandwidth,
            }),
        }
    }

    /// Register `addr` as a listener and return its port.
    ///
    /// # Errors
    /// [`SimError::AddressInUse`] if `addr` is already bound.
    pub fn listen(&self, addr: &str) -> Result<SimPort, SimError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut ports = self.inner.ports.lock().expect("ports mutex poisoned");
        if ports.contains_key(addr) {
            return Err(SimError::AddressInUse(addr.to_string()));
        }
        ports.insert(addr.to_string(), tx);
        drop(ports);

        Ok(SimPort {
            sim: self.clone(),
            local_addr: addr.to_string(),
            default_remote: None,
            inbound: Mutex::new(rx),
            read_deadline: Mutex::new(None),
            write_deadline: Mutex::new(None),
            closed: Arc::new(std::sync::atomic::AtomicBool::new(false)),
        })
    }

    /// Register `local` as a listener with `remote` as the default send
    /// target, mirroring a UDP "connected" socket.
    ///
    /// # Errors
    /// [`SimError::AddressInUse`] if `local` is already bound.
    pub fn dial(&self, local: &str, remote: &str) -> Result<SimPort, SimError> {
        let port = self.listen(local)?;
        Ok(SimPort { default_remote: Some(remote.to_string()), ..port })
    }

    fn unregister(&self, addr: &str) {
        self.inner.ports.lock().expect("ports mutex poisoned").remove(addr);
    }

    /// Simulate sending `bytes` from `from` to `to`: apply loss,
    /// duplication, and reorder-then-shuffle, and schedule delivery of each
    /// surviving copy.
    fn send(&self, bytes: Bytes, from: String, to: String) {
        let loss_roll = self.roll();
        if loss_roll < self.inner.config.loss_prob {
            tracing::trace!(%from, %to, "link dropped packet");
            return;
        }

        let copies = if self.roll() < self.inner.config.dup_prob { 2 } else { 1 };

        for _ in 0..copies {
            self.send_one_copy(bytes.clone(), &from, &to);
        }
    }

    fn send_one_copy(&self, bytes: Bytes, from: &str, to: &str) {
        let reorder_cap = self.inner.config.reorder_buffer_cap;
        if reorder_cap > 0 && self.roll() < self.inner.config.reorder_prob {
            let mut buf = self.inner.reorder_buf.lock().expect("reorder buffer poisoned");
            buf.push((bytes, from.to_string(), to.to_string()));
            if buf.len() >= reorder_cap {
                let batch = std::mem::take(&mut *buf);
                drop(buf);
                self.flush_reorder(batch);
            }
            return;
        }
        self.deliver(bytes, from.to_string(), to.to_string());
    }

    fn flush_reorder(&self, mut batch: Vec<(Bytes, String, String)>) {
        {
            let mut rng = self.inner.rng.lock().expect("rng mutex poisoned");
            batch.shuffle(&mut *rng);
        }
        for (bytes, from, to) in batch {
            self.deliver(bytes, from, to);
        }
    }

    fn deliver(&self, bytes: Bytes, from: String, to: String) {
        let sim = self.clone();
        tokio::spawn(async move {
            let delay = {
                let mut rng = sim.inner.rng.lock().expect("rng mutex poisoned");
                sample_delay(&sim.inner.config, &mut *rng)
            };

            let _permit = match &sim.inner.bandwidth {
                Some(sem) => sem.acquire().await.ok(),
                None => None,
            };

            if delay > Duration::ZERO {
                tokio::time::sleep(delay).await;
            }

            let ports = sim.inner.ports.lock().expect("ports mutex poisoned");
            if let Some(queue) = ports.get(&to) {
                let _ = queue.send((bytes, from));
            }
        });
    }

    fn roll(&self) -> f64 {
        let mut rng = self.inner.rng.lock().expect("rng mutex poisoned");
        (rng.next_u64() as f64) / (u64::MAX as f64)
    }
}

/// One endpoint bound into a [`LinkSimulator`].
pub struct SimPort {
    sim: LinkSimulator,
    local_addr: String,
    default_remote: Option<String>,
    inbound: Mutex<mpsc::UnboundedReceiver<(Bytes, String)>>,
    read_deadline: Mutex<Option<Duration>>,
    write_deadline: Mutex<Option<Duration>>,
    closed: Arc<std::sync::atomic::AtomicBool>,
}

impl SimPort {
    /// The address this port is bound to.
    #[must_use]
    pub fn local_addr(&self) -> &str {
        &self.local_addr
    }
}

#[async_trait]
impl DatagramPort for SimPort {
    async fn send(&self, bytes: &[u8], peer_addr: &str) -> Result<(), PortError> {
        if self.closed.load(std::sync::atomic::Ordering::Acquire) {
            return Err(PortError::Closed);
        }

        let deadline = *self.write_deadline.lock().expect("deadline mutex poisoned");
        let write = async {
            self.sim.send(Bytes::copy_from_slice(bytes), self.local_addr.clone(), peer_addr.to_string());
            Ok(())
        };

        match deadline {
            Some(d) => {
                tokio::time::timeout(d, write).await.map_err(|_| PortError::DeadlineExceeded)?
            },
            None => write.await,
        }
    }

    async fn recv(&self) -> Result<(Bytes, String), PortError> {
        if self.closed.load(std::sync::atomic::Ordering::Acquire) {
            return Err(PortError::Closed);
        }

        let deadline = *self.read_deadline.lock().expect("deadline mutex poisoned");
        let mut rx = self.inbound.lock().expect("inbound mutex poisoned");

        match deadline {
            Some(d) => tokio::time::timeout(d, rx.recv())
                .await
                .map_err(|_| PortError::DeadlineExceeded)?
                .ok_or(PortError::Closed),
            None => rx.recv().await.ok_or(PortError::Closed),
        }
    }

    fn set_read_deadline(&self, deadline: Option<Duration>) {
        *self.read_deadline.lock().expect("deadline mutex poisoned") = deadline;
    }

    fn set_write_deadline(&self, deadline: Option<Duration>) {
        *self.write_deadline.lock().expect("deadline mutex poisoned") = deadline;
    }

    async fn close(&self) {
        self.closed.store(true, std::sync::atomic::Ordering::Release);
        self.sim.unregister(&self.local_addr);
    }
}

impl SimPort {
    /// Send to the default remote address registered by [`LinkSimulator::dial`].
    ///
    /// # Errors
    /// [`PortError::Closed`] if the port has no default remote, surfaced as
    /// an I/O-shaped error since that's a caller bug, not a link condition.
    pub async fn send_default(&self, bytes: &[u8]) -> Result<(), PortError> {
        match &self.default_remote {
            Some(remote) => DatagramPort::send(self, bytes, remote).await,
            None => Err(PortError::Io("no default remote address".to_string())),
        }
    }
}
