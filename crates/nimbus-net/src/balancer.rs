//! Proxy endpoint balancing
//!
//! Outbound transfers fan out across a pool of proxy endpoints, each with a
//! ceiling on in-flight requests. `acquire` hands out the first endpoint in
//! pool order with headroom; callers hold the returned lease for the lifetime
//! of their request and the slot frees when it drops.
//!
//! Selection and lease registration run as one serialized transaction, so two
//! concurrent acquires cannot both count the same free slot. Waiters park on
//! a `Notify` and rescan when a lease releases or an endpoint attaches —
//! there is no fairness between concurrent acquires beyond that serialization.

use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use nimbus_core::{NetworkConfig, NimbusError, NimbusResult};
use tokio::sync::Notify;
use tracing::{debug, warn};

use crate::serial::SerialExecutor;

struct EndpointState {
    url: String,
    /// Ids of in-flight requests; leases remove their own id, so a release
    /// can never decrement on behalf of someone else's request.
    active: HashSet<u64>,
}

struct Shared {
    pool: StdMutex<Vec<EndpointState>>,
    freed: Notify,
    serial: SerialExecutor,
    max_per_endpoint: usize,
    acquire_timeout: Option<Duration>,
}

/// Balances outbound requests across a pool of proxy endpoints.
///
/// Cheap to clone; clones share the pool. Construct once at startup and pass
/// down to whatever issues requests.
#[derive(Clone)]
pub struct ProxyBalancer {
    shared: Arc<Shared>,
}

impl ProxyBalancer {
    /// An empty pool with the given per-endpoint ceiling and no acquire
    /// timeout: callers wait as long as it takes.
    pub fn new(max_per_endpoint: usize) -> Self {
        Self::with_timeout(max_per_endpoint, None)
    }

    /// An empty pool that gives up acquiring after `acquire_timeout`.
    pub fn with_timeout(max_per_endpoint: usize, acquire_timeout: Option<Duration>) -> Self {
        Self {
            shared: Arc::new(Shared {
                pool: StdMutex::new(Vec::new()),
                freed: Notify::new(),
                serial: SerialExecutor::new(),
                max_per_endpoint,
                acquire_timeout,
            }),
        }
    }

    /// A pool populated from configuration.
    pub fn from_config(config: &NetworkConfig) -> Self {
        let balancer =
            Self::with_timeout(config.max_requests_per_proxy, config.acquire_timeout());
        for url in &config.proxies {
            balancer.attach(url.clone());
        }
        balancer
    }

    /// Add an endpoint to the back of the pool.
    pub fn attach(&self, url: impl Into<String>) {
        let url = url.into();
        debug!(url = %url, "proxy endpoint attached");
        self.shared
            .pool
            .lock()
            .expect("proxy pool lock poisoned")
            .push(EndpointState {
                url,
                active: HashSet::new(),
            });
        // New capacity: wake a parked acquire, if any.
        self.shared.freed.notify_one();
    }

    /// Remove every endpoint with this URL. In-flight leases against it stay
    /// valid; their release becomes a no-op.
    pub fn detach(&self, url: &str) {
        self.shared
            .pool
            .lock()
            .expect("proxy pool lock poisoned")
            .retain(|endpoint| endpoint.url != url);
    }

    /// Endpoint URLs in pool order.
    pub fn endpoints(&self) -> Vec<String> {
        self.shared
            .pool
            .lock()
            .expect("proxy pool lock poisoned")
            .iter()
            .map(|endpoint| endpoint.url.clone())
            .collect()
    }

    /// In-flight request count for an endpoint, if it is in the pool.
    pub fn in_flight(&self, url: &str) -> Option<usize> {
        self.shared
            .pool
            .lock()
            .expect("proxy pool lock poisoned")
            .iter()
            .find(|endpoint| endpoint.url == url)
            .map(|endpoint| endpoint.active.len())
    }

    /// Lease the least-burdened endpoint: the first one in pool order whose
    /// in-flight count is under the ceiling.
    ///
    /// Suspends until a slot exists. With a configured timeout, gives up with
    /// `NimbusError::ProxyStarved` instead of waiting forever; releasing the
    /// returned lease (or dropping it) frees the slot and wakes a waiter.
    pub async fn acquire(&self) -> NimbusResult<ProxyLease> {
        self.shared
            .serial
            .dispatch(|| async {
                match self.shared.acquire_timeout {
                    Some(limit) => {
                        match tokio::time::timeout(limit, self.next_available()).await {
                            Ok(lease) => Ok(lease),
                            Err(_) => {
                                warn!(?limit, "proxy pool saturated, giving up");
                                Err(NimbusError::ProxyStarved(limit))
                            }
                        }
                    }
                    None => Ok(self.next_available().await),
                }
            })
            .await
    }

    async fn next_available(&self) -> ProxyLease {
        loop {
            if let Some(lease) = self.try_lease() {
                return lease;
            }
            // Serialization means at most one task parks here, so a release
            // that lands between the scan and this await leaves a stored
            // permit and the wait returns immediately.
            self.shared.freed.notified().await;
        }
    }

    fn try_lease(&self) -> Option<ProxyLease> {
        let mut pool = self.shared.pool.lock().expect("proxy pool lock poisoned");
        let max = self.shared.max_per_endpoint;
        let endpoint = pool.iter_mut().find(|ep| ep.active.len() < max)?;

        let id = rand::random::<u64>();
        endpoint.active.insert(id);
        debug!(url = %endpoint.url, in_flight = endpoint.active.len(), "proxy endpoint leased");

        Some(ProxyLease {
            shared: Arc::clone(&self.shared),
            url: endpoint.url.clone(),
            id,
            released: false,
        })
    }
}

/// An endpoint slot held for the duration of one request.
///
/// Dropping the lease releases the slot; `free` does the same explicitly.
/// Either way the id is removed exactly once.
pub struct ProxyLease {
    shared: Arc<Shared>,
    url: String,
    id: u64,
    released: bool,
}

impl ProxyLease {
    /// The proxy URL requests should go through.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Release the slot now.
    pub fn free(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if std::mem::replace(&mut self.released, true) {
            return;
        }
        {
            let mut pool = self.shared.pool.lock().expect("proxy pool lock poisoned");
            if let Some(endpoint) = pool.iter_mut().find(|ep| ep.url == self.url) {
                endpoint.active.remove(&self.id);
                debug!(url = %self.url, in_flight = endpoint.active.len(), "proxy endpoint released");
            }
        }
        self.shared.freed.notify_one();
    }
}

impl Drop for ProxyLease {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ProxyLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyLease")
            .field("url", &self.url)
            .field("released", &self.released)
            .finish()
    }
}
