use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which persistence backend the inventory runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Local,
    Remote,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(BackendKind::Local),
            "remote" => Ok(BackendKind::Remote),
            other => Err(format!("Unknown backend: {}", other)),
        }
    }
}

/// Application configuration.
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | INVENTORY_BACKEND | local | `local` or `remote` |
/// | INVENTORY_DATA_DIR | ./data | directory of the local snapshot |
/// | INVENTORY_SNAPSHOT_KEY | products | key of the local snapshot record |
/// | INVENTORY_PROJECT_ID | stock-control | remote project identifier |
/// | INVENTORY_COLLECTION | products | remote collection name |
/// | INVENTORY_CHANNEL_BUFFER | 32 | actor mailbox size |
/// | QUOTES_ENABLED | true | run the exchange-rate feed |
/// | QUOTES_URL | https://dolarapi.com/v1/dolares | quote endpoint |
/// | QUOTES_INTERVAL_SECS | 300 | quote refresh interval |
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryConfig {
    pub backend: BackendKind,
    pub data_dir: PathBuf,
    pub snapshot_key: String,
    pub project_id: String,
    pub collection: String,
    pub channel_buffer: usize,
    pub quotes_enabled: bool,
    pub quotes_url: String,
    pub quotes_interval: Duration,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Local,
            data_dir: PathBuf::from("./data"),
            snapshot_key: "products".into(),
            project_id: "stock-control".into(),
            collection: "products".into(),
            channel_buffer: 32,
            quotes_enabled: true,
            quotes_url: "https://dolarapi.com/v1/dolares".into(),
            quotes_interval: Duration::from_secs(300),
        }
    }
}

impl InventoryConfig {
    /// Loads configuration from the environment, falling back to defaults
    /// for unset or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            backend: lookup("INVENTORY_BACKEND")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.backend),
            data_dir: lookup("INVENTORY_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            snapshot_key: lookup("INVENTORY_SNAPSHOT_KEY").unwrap_or(defaults.snapshot_key),
            project_id: lookup("INVENTORY_PROJECT_ID").unwrap_or(defaults.project_id),
            collection: lookup("INVENTORY_COLLECTION").unwrap_or(defaults.collection),
            channel_buffer: lookup("INVENTORY_CHANNEL_BUFFER")
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.channel_buffer),
            quotes_enabled: lookup("QUOTES_ENABLED")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.quotes_enabled),
            quotes_url: lookup("QUOTES_URL").unwrap_or(defaults.quotes_url),
            quotes_interval: lookup("QUOTES_INTERVAL_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.quotes_interval),
        }
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = InventoryConfig::from_lookup(|_| None);
        assert_eq!(config, InventoryConfig::default());
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let env: HashMap<&str, &str> = [
            ("INVENTORY_BACKEND", "Remote"),
            ("INVENTORY_COLLECTION", "stock"),
            ("INVENTORY_CHANNEL_BUFFER", "0"),
            ("QUOTES_INTERVAL_SECS", "60"),
            ("QUOTES_ENABLED", "yes"),
        ]
        .into_iter()
        .collect();
        let config = InventoryConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.backend, BackendKind::Remote);
        assert_eq!(config.collection, "stock");
        assert_eq!(config.channel_buffer, 32);
        assert_eq!(config.quotes_interval, Duration::from_secs(60));
        assert!(config.quotes_enabled);
    }
}
