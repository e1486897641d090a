//! Leader address handling and command forwarding.

use std::fmt;
use std::net::{Ipv6Addr, SocketAddr};

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};

use configsync_proto::{ApiResponse, ForwardMethod};

use crate::capability::CommandForwarder;
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::types::ForwardRequest;

/// A parsed leader address.
///
/// The log reports its leader as `host:port` where the port is the log's own
/// port. Forwarding only keeps the host and substitutes the config API port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderAddress {
    host: String,
    port: Option<u16>,
}

impl LeaderAddress {
    /// Parse `host`, `host:port`, `ipv6`, or `[ipv6]:port`.
    pub fn parse(addr: &str) -> Result<Self, SyncError> {
        let invalid = || SyncError::InvalidLeaderAddress(addr.to_string());
        let trimmed = addr.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }

        if let Ok(socket) = trimmed.parse::<SocketAddr>() {
            return Ok(Self {
                host: socket.ip().to_string(),
                port: Some(socket.port()),
            });
        }

        if let Some(rest) = trimmed.strip_prefix('[') {
            let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
            let host: Ipv6Addr = host.parse().map_err(|_| invalid())?;
            let port = match tail {
                "" => None,
                _ => {
                    let port = tail.strip_prefix(':').ok_or_else(invalid)?;
                    Some(parse_port(port).ok_or_else(invalid)?)
                }
            };
            return Ok(Self {
                host: host.to_string(),
                port,
            });
        }

        if let Ok(ip) = trimmed.parse::<Ipv6Addr>() {
            return Ok(Self {
                host: ip.to_string(),
                port: None,
            });
        }

        let (host, port) = match trimmed.rsplit_once(':') {
            Some((host, port)) => (host, Some(parse_port(port).ok_or_else(invalid)?)),
            None => (trimmed, None),
        };

        if !is_valid_host(host) {
            return Err(invalid());
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    /// The host part.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port part, if present.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Same host on a different port.
    pub fn with_port(&self, port: u16) -> Self {
        Self {
            host: self.host.clone(),
            port: Some(port),
        }
    }

    fn is_ipv6(&self) -> bool {
        self.host.contains(':')
    }
}

impl fmt::Display for LeaderAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ipv6() {
            write!(f, "[{}]", self.host)?;
        } else {
            f.write_str(&self.host)?;
        }
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}

fn parse_port(port: &str) -> Option<u16> {
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    port.parse().ok()
}

fn is_valid_host(host: &str) -> bool {
    !host.is_empty()
        && host
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
}

/// Forwards commands to the leader's HTTP config API.
pub struct HttpForwarder {
    client: Client,
    api_prefix: String,
}

impl HttpForwarder {
    /// Create a forwarder using the prefix and timeout from `config`.
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.forward_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SyncError::Forward(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_prefix: config.api_prefix.clone(),
        })
    }
}

#[async_trait]
impl CommandForwarder for HttpForwarder {
    async fn send(&self, request: ForwardRequest) -> Result<(), SyncError> {
        let url = request.url(&self.api_prefix)?;
        let method = match request.route.method {
            ForwardMethod::Post => Method::POST,
            ForwardMethod::Delete => Method::DELETE,
        };

        tracing::debug!(
            method = request.route.method.as_str(),
            url = %url,
            "forwarding command to leader"
        );

        let mut builder = self.client.request(method, url).bearer_auth(&request.token);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SyncError::Forward(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SyncError::Forward(e.to_string()))?;

        let message = ApiResponse::from_slice(&body)
            .error_message()
            .map(str::to_owned)
            .unwrap_or_else(|| {
                format!(
                    "leader rejected forwarded command with status {}",
                    status.as_u16()
                )
            });

        Err(SyncError::Forward(message))
    }
}
