//! WebSocket transport
//!
//! Socket plumbing for the capture channel: connect with timeout and
//! backoff, speak the tagged-JSON event envelope, auto-answer pings. All
//! protocol meaning lives above this layer.

use crate::channel::ChannelIo;
use crate::events::{ClientEvent, ServerEvent};
use crate::reconnect::ReconnectConfig;
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use shield_core::{ClientConfig, IdentityToken, ShieldError};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use url::Url;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection parameters for the channel socket.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Channel endpoint (`ws://` or `wss://`).
    pub url: Url,
    /// Identity token appended as a `token` query parameter, when the
    /// backend authenticates the channel.
    pub token: Option<IdentityToken>,
    /// Per-attempt connect timeout.
    pub connect_timeout: Duration,
    /// Backoff policy across connect attempts.
    pub reconnect: ReconnectConfig,
}

impl TransportConfig {
    /// Unauthenticated transport with default timing.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            token: None,
            connect_timeout: Duration::from_secs(10),
            reconnect: ReconnectConfig::default(),
        }
    }

    /// Authenticate the socket with the given identity token.
    pub fn with_token(mut self, token: IdentityToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Transport for the configured channel endpoint. The token is attached
    /// only when the configuration says the channel authenticates.
    pub fn from_config(config: &ClientConfig, token: &IdentityToken) -> Self {
        let transport = Self::new(config.channel_url.clone());
        if config.channel_auth {
            transport.with_token(token.clone())
        } else {
            transport
        }
    }

    fn connect_url(&self) -> Url {
        let mut url = self.url.clone();
        if let Some(token) = &self.token {
            url.query_pairs_mut().append_pair("token", token.expose());
        }
        url
    }
}

/// A live channel socket.
pub struct ChannelTransport {
    stream: WsStream,
}

impl ChannelTransport {
    /// Establish the socket, retrying per the configured backoff.
    pub async fn connect(config: &TransportConfig) -> Result<Self, ShieldError> {
        let url = config.connect_url();
        let mut last_error = None;

        for attempt in 1..=config.reconnect.max_attempts {
            let delay = config.reconnect.delay_before(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match Self::connect_once(&url, config.connect_timeout).await {
                Ok(transport) => {
                    debug!(url = %config.url, attempt, "channel connected");
                    return Ok(transport);
                }
                Err(error) => {
                    warn!(url = %config.url, attempt, error = %error, "channel connect failed");
                    last_error = Some(error);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| ShieldError::transport("channel connect attempts exhausted")))
    }

    async fn connect_once(url: &Url, connect_timeout: Duration) -> Result<Self, ShieldError> {
        let (stream, _response) = timeout(connect_timeout, connect_async(url.as_str()))
            .await
            .map_err(|_| ShieldError::transport("channel connect timeout"))?
            .map_err(|e| ShieldError::transport(format!("channel connect failed: {e}")))?;
        Ok(Self { stream })
    }
}

#[async_trait]
impl ChannelIo for ChannelTransport {
    async fn send(&mut self, event: ClientEvent) -> Result<(), ShieldError> {
        let text = serde_json::to_string(&event)
            .map_err(|e| ShieldError::channel(format!("event encode failed: {e}")))?;
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|e| ShieldError::transport(format!("channel send failed: {e}")))
    }

    async fn next(&mut self) -> Option<Result<ServerEvent, ShieldError>> {
        loop {
            let message = match self.stream.next().await? {
                Ok(message) => message,
                Err(e) => {
                    return Some(Err(ShieldError::transport(format!(
                        "channel receive failed: {e}"
                    ))))
                }
            };

            match message {
                Message::Text(text) => {
                    return Some(serde_json::from_str(&text).map_err(|e| {
                        ShieldError::channel(format!("event decode failed: {e}"))
                    }));
                }
                Message::Ping(payload) => {
                    if let Err(e) = self.stream.send(Message::Pong(payload)).await {
                        return Some(Err(ShieldError::transport(format!(
                            "channel pong failed: {e}"
                        ))));
                    }
                }
                Message::Close(_) => return None,
                // Binary and pong frames carry nothing for this protocol.
                _ => {}
            }
        }
    }

    async fn close(&mut self) {
        if let Err(error) = self.stream.close(None).await {
            debug!(error = %error, "channel close failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_appended_as_query_parameter() {
        let config = TransportConfig::new(Url::parse("ws://localhost:5000/channel").unwrap())
            .with_token(IdentityToken::new("abc123"));
        assert_eq!(
            config.connect_url().as_str(),
            "ws://localhost:5000/channel?token=abc123"
        );
    }

    #[test]
    fn test_unauthenticated_url_unchanged() {
        let config = TransportConfig::new(Url::parse("ws://localhost:5000/channel").unwrap());
        assert_eq!(config.connect_url().query(), None);
    }

    #[test]
    fn test_from_config_honors_channel_auth() {
        let token = IdentityToken::new("abc123");

        let open = TransportConfig::from_config(&ClientConfig::default(), &token);
        assert!(open.token.is_none());

        let client_config = ClientConfig {
            channel_auth: true,
            ..ClientConfig::default()
        };
        let authed = TransportConfig::from_config(&client_config, &token);
        assert_eq!(authed.connect_url().query(), Some("token=abc123"));
    }
}
