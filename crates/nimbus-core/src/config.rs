use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Transport coordination settings (loaded from nimbus.toml).
///
/// The proxy pool is static configuration: endpoints are attached at startup
/// and only change through explicit attach/detach calls on the balancer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Proxy endpoints requests are balanced across, in priority order
    pub proxies: Vec<String>,
    /// In-flight request ceiling per endpoint (default: 6)
    pub max_requests_per_proxy: usize,
    /// Give up acquiring an endpoint after this many seconds (None = wait forever)
    pub acquire_timeout_secs: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            proxies: (1..=7)
                .map(|n| format!("https://proxy{n:02}.api.nimbusdrive.net"))
                .collect(),
            max_requests_per_proxy: 6,
            acquire_timeout_secs: None,
        }
    }
}

impl NetworkConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading network config: {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("parsing network config: {}", path.display()))?;
        debug!(
            proxies = config.proxies.len(),
            max_per_proxy = config.max_requests_per_proxy,
            "network config loaded"
        );
        Ok(config)
    }

    pub fn acquire_timeout(&self) -> Option<Duration> {
        self.acquire_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = NetworkConfig::default();
        assert_eq!(config.proxies.len(), 7);
        assert_eq!(config.max_requests_per_proxy, 6);
        assert_eq!(config.acquire_timeout(), None);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "proxies = [\"https://proxy-a.example\", \"https://proxy-b.example\"]\nacquire_timeout_secs = 30"
        )
        .unwrap();

        let config = NetworkConfig::load(file.path()).unwrap();
        assert_eq!(config.proxies.len(), 2);
        assert_eq!(config.max_requests_per_proxy, 6);
        assert_eq!(config.acquire_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_load_missing_file() {
        let result = NetworkConfig::load(Path::new("/nonexistent/nimbus.toml"));
        assert!(result.is_err());
    }
}
