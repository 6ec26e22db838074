pub mod config;
pub mod error;

pub use config::NetworkConfig;
pub use error::{NimbusError, NimbusResult};
