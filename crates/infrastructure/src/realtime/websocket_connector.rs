//! WebSocket connector speaking the Pusher protocol.

use std::sync::Arc;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use hirelink_application::ports::{
    ChannelAuthorizer, EventStream, RealtimeConnector, RealtimeError,
};
use hirelink_domain::{Channel, RealtimeConfig, RealtimeEvent};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, trace, warn};

use super::pusher::{self, Frame};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens broadcaster connections for a [`RealtimeConfig`].
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    config: RealtimeConfig,
}

impl WebSocketConnector {
    /// Creates a connector.
    #[must_use]
    pub const fn new(config: RealtimeConfig) -> Self {
        Self { config }
    }

    /// Reads frames until the broker sends its socket ID.
    async fn handshake(socket: &mut Socket) -> Result<String, RealtimeError> {
        while let Some(message) = socket.next().await {
            let message = message.map_err(|e| RealtimeError::Handshake(e.to_string()))?;
            let Message::Text(text) = message else {
                continue;
            };
            match pusher::decode(&text)? {
                Frame::ConnectionEstablished { socket_id, .. } => return Ok(socket_id),
                Frame::Error { code, message } => {
                    return Err(RealtimeError::Handshake(format!("{message} (code {code:?})")));
                }
                other => trace!(?other, "ignoring frame before handshake"),
            }
        }
        Err(RealtimeError::Closed)
    }

    async fn subscribe_all(
        socket: &mut Socket,
        socket_id: &str,
        channels: &[Channel],
        authorizer: &dyn ChannelAuthorizer,
    ) -> Result<(), RealtimeError> {
        for channel in channels {
            let auth = authorizer.authorize(socket_id, channel).await?;
            socket
                .send(Message::Text(pusher::subscribe(&channel.name(), &auth)))
                .await
                .map_err(|e| RealtimeError::Connection(e.to_string()))?;
            debug!(channel = %channel, "subscription sent");
        }
        Ok(())
    }
}

#[async_trait]
impl RealtimeConnector for WebSocketConnector {
    async fn connect(
        &self,
        channels: &[Channel],
        authorizer: Arc<dyn ChannelAuthorizer>,
    ) -> Result<EventStream, RealtimeError> {
        self.config
            .validate()
            .map_err(|e| RealtimeError::InvalidConfig(e.to_string()))?;

        let url = self.config.socket_url();
        let timeout = self.config.connect_timeout();

        let (mut socket, _) = tokio::time::timeout(timeout, connect_async(url.as_str()))
            .await
            .map_err(|_| RealtimeError::Connection(format!("timed out after {timeout:?}")))?
            .map_err(|e| RealtimeError::Connection(e.to_string()))?;

        let socket_id = tokio::time::timeout(timeout, Self::handshake(&mut socket))
            .await
            .map_err(|_| RealtimeError::Handshake(format!("no handshake after {timeout:?}")))??;
        info!(
            socket_id = %socket_id,
            channels = channels.len(),
            "realtime connection established"
        );

        Self::subscribe_all(&mut socket, &socket_id, channels, authorizer.as_ref()).await?;

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(pump(socket, tx));
        Ok(rx)
    }
}

/// Forwards events until the socket closes or the receiver goes away.
async fn pump(socket: Socket, events: mpsc::UnboundedSender<RealtimeEvent>) {
    let (mut sink, mut stream) = socket.split();
    loop {
        let message = tokio::select! {
            () = events.closed() => {
                debug!("event receiver dropped, closing socket");
                let _ = sink.send(Message::Close(None)).await;
                break;
            }
            message = stream.next() => message,
        };

        let text = match message {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(frame))) => {
                info!(?frame, "realtime connection closed by server");
                break;
            }
            Some(Ok(_)) => continue,
            Some(Err(error)) => {
                warn!(%error, "realtime connection failed");
                break;
            }
            None => break,
        };

        match pusher::decode(&text) {
            Ok(Frame::Event(event)) => {
                trace!(channel = %event.channel, kind = event.kind.as_wire(), "event received");
                if events.send(event).is_err() {
                    break;
                }
            }
            Ok(Frame::Ping) => {
                if let Err(error) = sink.send(Message::Text(pusher::pong())).await {
                    warn!(%error, "failed to answer ping");
                    break;
                }
            }
            Ok(Frame::SubscriptionSucceeded { channel }) => debug!(channel, "subscribed"),
            Ok(Frame::SubscriptionError { channel, message }) => {
                warn!(channel, message, "subscription refused");
            }
            Ok(Frame::Error { code, message }) => warn!(?code, message, "broker error"),
            Ok(Frame::Pong | Frame::ConnectionEstablished { .. }) => {}
            Err(error) => warn!(%error, "undecodable frame"),
        }
    }
}
