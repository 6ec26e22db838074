//! nimbus-net: transport coordination for the Nimbus storage network
//!
//! Two primitives sit under every upload and download:
//!
//! - [`SerialExecutor`]: exclusive execution in strict arrival order, for
//!   check-then-act sequences over shared state.
//! - [`ProxyBalancer`]: a pool of proxy endpoints with a per-endpoint ceiling
//!   on in-flight requests; hands out leases that free their slot on drop.
//!
//! Neither primitive issues requests itself — callers take a lease, talk to
//! the network through the leased URL, and let the lease go.

pub mod balancer;
pub mod serial;

pub use balancer::{ProxyBalancer, ProxyLease};
pub use serial::{SerialExecutor, SerialGuard};
