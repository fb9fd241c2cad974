//! Connection configuration
//!
//! Resolves where the Gremlin server lives (a local TinkerPop server or a
//! managed Neptune cluster) from the environment, and opens a client for it.

use shopgraph_gremlin::{Credentials, GremlinClient, HttpClient, WebSocketClient};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 8182;
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_LOCAL_ENDPOINT: &str = "http://localhost:8182";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Remote target selected without NEPTUNE_ENDPOINT
    #[error("NEPTUNE_ENDPOINT is not set; it is required for the remote target")]
    MissingEndpoint,

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Unsupported endpoint scheme: {0}")]
    UnsupportedScheme(String),
}

/// Which server to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// LOCAL_GREMLIN_ENDPOINT, a local Gremlin Server
    Local,
    /// NEPTUNE_ENDPOINT:NEPTUNE_PORT over TLS
    Remote,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Local => write!(f, "local"),
            Target::Remote => write!(f, "remote"),
        }
    }
}

/// How to talk to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// `POST /gremlin`, one request per script
    Http,
    /// A persistent Gremlin Server session
    WebSocket,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Http => write!(f, "http"),
            Transport::WebSocket => write!(f, "websocket"),
        }
    }
}

/// Connection settings read from the environment
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Neptune cluster endpoint (host name only)
    pub endpoint: Option<String>,
    /// Neptune port
    pub port: u16,
    /// AWS region; reported only, requests are not signed
    pub region: String,
    /// Base URL of the local Gremlin server
    pub local_endpoint: String,
    /// Optional username/password
    pub credentials: Option<Credentials>,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            port: DEFAULT_PORT,
            region: DEFAULT_REGION.to_string(),
            local_endpoint: DEFAULT_LOCAL_ENDPOINT.to_string(),
            credentials: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ConnectionConfig {
    /// Read settings from the process environment, after loading `.env` if present
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is normal
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.endpoint = lookup("NEPTUNE_ENDPOINT").filter(|e| !e.trim().is_empty());
        if let Some(port) = lookup("NEPTUNE_PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "NEPTUNE_PORT",
                value: port.clone(),
            })?;
        }
        if let Some(region) = lookup("AWS_REGION") {
            config.region = region;
        }
        if let Some(local) = lookup("LOCAL_GREMLIN_ENDPOINT") {
            config.local_endpoint = local;
        }
        if let Some(secs) = lookup("GREMLIN_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "GREMLIN_TIMEOUT_SECS",
                value: secs.clone(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        match (lookup("GREMLIN_USERNAME"), lookup("GREMLIN_PASSWORD")) {
            (Some(username), Some(password)) => {
                config.credentials = Some(Credentials { username, password });
            }
            (None, None) => {}
            _ => warn!("GREMLIN_USERNAME and GREMLIN_PASSWORD must be set together; connecting without credentials"),
        }

        Ok(config)
    }

    /// The `/gremlin` URL for a target and transport
    pub fn endpoint_url(&self, target: Target, transport: Transport) -> Result<String, ConfigError> {
        match target {
            Target::Local => {
                let base = self.local_endpoint.trim().trim_end_matches('/');
                let (scheme, rest) = base.split_once("://").unwrap_or(("http", base));
                let secure = match scheme {
                    "http" | "ws" => false,
                    "https" | "wss" => true,
                    other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
                };
                let path = if rest.ends_with("/gremlin") { "" } else { "/gremlin" };
                Ok(format!("{}://{}{}", scheme_for(transport, secure), rest, path))
            }
            Target::Remote => {
                let endpoint = self.endpoint.as_deref().ok_or(ConfigError::MissingEndpoint)?;
                Ok(format!("{}://{}:{}/gremlin", scheme_for(transport, true), endpoint, self.port))
            }
        }
    }

    /// Open a client. One attempt; the caller decides what to do on failure.
    pub async fn connect(&self, target: Target, transport: Transport) -> anyhow::Result<Connection> {
        let url = self.endpoint_url(target, transport)?;
        println!("Connecting to: {}", url);
        if target == Target::Remote {
            info!(region = %self.region, "Using managed cluster endpoint");
        }

        let client: Arc<dyn GremlinClient> = match transport {
            Transport::Http => {
                let client = HttpClient::new(&url, self.timeout, self.credentials.clone())?;
                // No handshake over HTTP; a trivial script proves reachability
                client.ping().await?;
                Arc::new(client)
            }
            Transport::WebSocket => {
                Arc::new(WebSocketClient::connect(&url, self.timeout, self.credentials.clone()).await?)
            }
        };

        info!("Connected to {} ({}, {})", url, target, transport);
        Ok(Connection { client, target, transport })
    }
}

fn scheme_for(transport: Transport, secure: bool) -> &'static str {
    match (transport, secure) {
        (Transport::Http, false) => "http",
        (Transport::Http, true) => "https",
        (Transport::WebSocket, false) => "ws",
        (Transport::WebSocket, true) => "wss",
    }
}

/// A live client handle plus what it was opened for
#[derive(Clone)]
pub struct Connection {
    client: Arc<dyn GremlinClient>,
    pub target: Target,
    pub transport: Transport,
}

impl Connection {
    /// Wrap an already-open client
    pub fn from_client(client: Arc<dyn GremlinClient>, target: Target, transport: Transport) -> Self {
        Self { client, target, transport }
    }

    pub fn client(&self) -> Arc<dyn GremlinClient> {
        Arc::clone(&self.client)
    }

    /// Close the underlying session
    pub async fn close(&self) -> anyhow::Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ConnectionConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConnectionConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.endpoint, None);
        assert_eq!(config.port, 8182);
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.local_endpoint, "http://localhost:8182");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let config = config_from(&[
            ("NEPTUNE_ENDPOINT", "db.cluster-abc.us-west-2.neptune.amazonaws.com"),
            ("NEPTUNE_PORT", "8183"),
            ("AWS_REGION", "us-west-2"),
            ("GREMLIN_USERNAME", "stephen"),
            ("GREMLIN_PASSWORD", "password"),
            ("GREMLIN_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.port, 8183);
        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.credentials.unwrap().username, "stephen");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = config_from(&[("NEPTUNE_PORT", "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "NEPTUNE_PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn test_local_url_follows_transport() {
        let config = ConnectionConfig::default();
        assert_eq!(
            config.endpoint_url(Target::Local, Transport::Http).unwrap(),
            "http://localhost:8182/gremlin"
        );
        assert_eq!(
            config.endpoint_url(Target::Local, Transport::WebSocket).unwrap(),
            "ws://localhost:8182/gremlin"
        );
    }

    #[test]
    fn test_local_url_keeps_existing_path_and_tls() {
        let config = config_from(&[("LOCAL_GREMLIN_ENDPOINT", "wss://gremlin-server:8182/gremlin/")]).unwrap();
        assert_eq!(
            config.endpoint_url(Target::Local, Transport::Http).unwrap(),
            "https://gremlin-server:8182/gremlin"
        );
        assert_eq!(
            config.endpoint_url(Target::Local, Transport::WebSocket).unwrap(),
            "wss://gremlin-server:8182/gremlin"
        );
    }

    #[test]
    fn test_local_url_without_scheme() {
        let config = config_from(&[("LOCAL_GREMLIN_ENDPOINT", "localhost:8182")]).unwrap();
        assert_eq!(
            config.endpoint_url(Target::Local, Transport::WebSocket).unwrap(),
            "ws://localhost:8182/gremlin"
        );
    }

    #[test]
    fn test_unsupported_scheme() {
        let config = config_from(&[("LOCAL_GREMLIN_ENDPOINT", "ftp://localhost:8182")]).unwrap();
        assert_eq!(
            config.endpoint_url(Target::Local, Transport::Http),
            Err(ConfigError::UnsupportedScheme("ftp".to_string()))
        );
    }

    #[test]
    fn test_remote_url() {
        let config = config_from(&[("NEPTUNE_ENDPOINT", "db.example.com")]).unwrap();
        assert_eq!(
            config.endpoint_url(Target::Remote, Transport::WebSocket).unwrap(),
            "wss://db.example.com:8182/gremlin"
        );
        assert_eq!(
            config.endpoint_url(Target::Remote, Transport::Http).unwrap(),
            "https://db.example.com:8182/gremlin"
        );
    }

    #[test]
    fn test_remote_requires_endpoint() {
        let config = ConnectionConfig::default();
        assert_eq!(
            config.endpoint_url(Target::Remote, Transport::WebSocket),
            Err(ConfigError::MissingEndpoint)
        );
    }

    #[tokio::test]
    async fn test_connect_without_endpoint_fails() {
        let config = ConnectionConfig::default();
        assert!(config.connect(Target::Remote, Transport::Http).await.is_err());
    }

    #[test]
    fn test_half_configured_credentials_are_ignored() {
        let config = config_from(&[("GREMLIN_USERNAME", "stephen")]).unwrap();
        assert!(config.credentials.is_none());

        let config = config_from(&[("GREMLIN_PASSWORD", "password")]).unwrap();
        assert!(config.credentials.is_none());
    }
}
