//! Client configuration
//!
//! Defines where the AppChains and beacon APIs live, the credential used for
//! authenticated calls and the default polling interval.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Scheme used to reach the AppChains and beacon APIs unless overridden
pub const DEFAULT_SCHEME: &str = "https";

/// Port used to reach the AppChains and beacon APIs unless overridden
pub const DEFAULT_PORT: u16 = 443;

/// Host serving beacon lookups
pub const DEFAULT_BEACON_HOSTNAME: &str = "beacon.sequencing.com";

/// Wait between two status polls of the same job
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// AppChains client configuration
#[derive(Clone)]
pub struct ClientConfig {
    /// AppChains API host (e.g., "api.sequencing.com")
    pub hostname: String,

    /// OAuth bearer token; beacon lookups work without one
    pub token: Option<String>,

    /// URL scheme for the AppChains API
    pub scheme: String,

    /// Port for the AppChains API
    pub port: u16,

    /// Beacon API host
    pub beacon_hostname: String,

    /// URL scheme for the beacon API, independent of `scheme`
    pub beacon_scheme: String,

    /// Port for the beacon API, independent of `port`
    pub beacon_port: u16,

    /// Interval used by the default fixed poll policy
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Creates a new configuration with defaults
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            token: None,
            scheme: DEFAULT_SCHEME.to_string(),
            port: DEFAULT_PORT,
            beacon_hostname: DEFAULT_BEACON_HOSTNAME.to_string(),
            beacon_scheme: DEFAULT_SCHEME.to_string(),
            beacon_port: DEFAULT_PORT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - APPCHAINS_HOSTNAME (required)
    /// - APPCHAINS_TOKEN (optional)
    /// - APPCHAINS_SCHEME (optional, default: https)
    /// - APPCHAINS_PORT (optional, default: 443)
    /// - APPCHAINS_BEACON_HOSTNAME (optional, default: beacon.sequencing.com)
    /// - APPCHAINS_BEACON_SCHEME (optional, default: https)
    /// - APPCHAINS_BEACON_PORT (optional, default: 443)
    /// - APPCHAINS_POLL_INTERVAL_MS (optional, milliseconds, default: 1000)
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from a variable lookup
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let hostname = var("APPCHAINS_HOSTNAME").ok_or_else(|| {
            ClientError::InvalidConfig("APPCHAINS_HOSTNAME environment variable not set".into())
        })?;

        let mut config = Self::new(hostname);

        config.token = var("APPCHAINS_TOKEN").filter(|token| !token.is_empty());

        if let Some(scheme) = var("APPCHAINS_SCHEME") {
            config.scheme = scheme;
        }

        config.port = var("APPCHAINS_PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        if let Some(beacon_hostname) = var("APPCHAINS_BEACON_HOSTNAME") {
            config.beacon_hostname = beacon_hostname;
        }

        if let Some(beacon_scheme) = var("APPCHAINS_BEACON_SCHEME") {
            config.beacon_scheme = beacon_scheme;
        }

        config.beacon_port = var("APPCHAINS_BEACON_PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        config.poll_interval = var("APPCHAINS_POLL_INTERVAL_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        Ok(config)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_beacon_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.beacon_hostname = hostname.into();
        self
    }

    pub fn with_beacon_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.beacon_scheme = scheme.into();
        self
    }

    pub fn with_beacon_port(mut self, port: u16) -> Self {
        self.beacon_port = port;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Base URL of the AppChains API, e.g. `https://api.sequencing.com:443`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.hostname, self.port)
    }

    /// Base URL of the beacon API
    pub fn beacon_base_url(&self) -> String {
        format!(
            "{}://{}:{}",
            self.beacon_scheme, self.beacon_hostname, self.beacon_port
        )
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.hostname.trim().is_empty() {
            return Err(ClientError::InvalidConfig("hostname cannot be empty".into()));
        }

        if self.hostname.contains('/') || self.hostname.contains(':') {
            return Err(ClientError::InvalidConfig(
                "hostname must not contain a scheme, port or path".into(),
            ));
        }

        if !is_http_scheme(&self.scheme) || !is_http_scheme(&self.beacon_scheme) {
            return Err(ClientError::InvalidConfig(
                "scheme must be http or https".into(),
            ));
        }

        if self.port == 0 || self.beacon_port == 0 {
            return Err(ClientError::InvalidConfig("port must be greater than 0".into()));
        }

        if self.beacon_hostname.trim().is_empty() {
            return Err(ClientError::InvalidConfig(
                "beacon_hostname cannot be empty".into(),
            ));
        }

        Ok(())
    }
}

fn is_http_scheme(scheme: &str) -> bool {
    scheme == "http" || scheme == "https"
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("hostname", &self.hostname)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("scheme", &self.scheme)
            .field("port", &self.port)
            .field("beacon_hostname", &self.beacon_hostname)
            .field("beacon_scheme", &self.beacon_scheme)
            .field("beacon_port", &self.beacon_port)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::new("api.sequencing.com");
        assert_eq!(config.scheme, "https");
        assert_eq!(config.port, 443);
        assert_eq!(config.beacon_hostname, "beacon.sequencing.com");
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert!(config.token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_urls() {
        let config = ClientConfig::new("api.sequencing.com");
        assert_eq!(config.base_url(), "https://api.sequencing.com:443");
        assert_eq!(
            config.beacon_base_url(),
            "https://beacon.sequencing.com:443"
        );

        let config = config.with_scheme("http").with_port(8080);
        assert_eq!(config.base_url(), "http://api.sequencing.com:8080");
        // Beacon keeps its own scheme and port
        assert_eq!(
            config.beacon_base_url(),
            "https://beacon.sequencing.com:443"
        );

        let config = config.with_beacon_scheme("http").with_beacon_port(9000);
        assert_eq!(config.beacon_base_url(), "http://beacon.sequencing.com:9000");
    }

    #[test]
    fn test_from_vars_requires_hostname() {
        let err = ClientConfig::from_vars(|_| None).unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig(msg) if msg.contains("APPCHAINS_HOSTNAME")));
    }

    #[test]
    fn test_from_vars_defaults() {
        let config = ClientConfig::from_vars(|key| match key {
            "APPCHAINS_HOSTNAME" => Some("api.sequencing.com".to_string()),
            "APPCHAINS_TOKEN" => Some(String::new()),
            "APPCHAINS_PORT" => Some("not-a-port".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.hostname, "api.sequencing.com");
        assert!(config.token.is_none());
        assert_eq!(config.scheme, "https");
        assert_eq!(config.port, 443);
        assert_eq!(config.beacon_hostname, "beacon.sequencing.com");
        assert_eq!(config.beacon_scheme, "https");
        assert_eq!(config.beacon_port, 443);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_from_vars_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("APPCHAINS_HOSTNAME", "staging.internal"),
            ("APPCHAINS_TOKEN", "abc"),
            ("APPCHAINS_SCHEME", "http"),
            ("APPCHAINS_PORT", "8080"),
            ("APPCHAINS_BEACON_HOSTNAME", "beacon.internal"),
            ("APPCHAINS_BEACON_PORT", "8443"),
            ("APPCHAINS_POLL_INTERVAL_MS", "250"),
        ]);
        let config = ClientConfig::from_vars(|key| vars.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.base_url(), "http://staging.internal:8080");
        assert_eq!(config.beacon_base_url(), "https://beacon.internal:8443");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_from_env_reports_missing_hostname() {
        // Only checked when the variable is absent from the test environment
        if std::env::var("APPCHAINS_HOSTNAME").is_err() {
            assert!(ClientConfig::from_env().is_err());
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::new("api.sequencing.com");

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Empty hostname should fail
        config.hostname = String::new();
        assert!(config.validate().is_err());

        // Hostname with scheme should fail
        config.hostname = "https://api.sequencing.com".to_string();
        assert!(config.validate().is_err());

        config.hostname = "api.sequencing.com".to_string();
        config.scheme = "ftp".to_string();
        assert!(config.validate().is_err());

        config.scheme = "https".to_string();
        config.port = 0;
        assert!(config.validate().is_err());

        config.port = 443;
        config.beacon_scheme = "ftp".to_string();
        assert!(config.validate().is_err());

        config.beacon_scheme = "https".to_string();
        config.beacon_port = 0;
        assert!(config.validate().is_err());

        config.beacon_port = 443;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::new("api.sequencing.com").with_token("secret-token");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
