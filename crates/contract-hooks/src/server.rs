//! TCP hooks-handler server.
//!
//! The contract-testing tool connects, streams one [`HookMessage`] per line,
//! and waits for each reply before sending the next, so messages on a
//! connection are handled strictly in order.
//!
//! One connection is one run: every connection gets its own
//! [`HookDispatcher`] over the shared registry, and so its own
//! [`HookLog`](contract_hooks_core::HookLog), dropped when the tool hangs up.
//!
//! Hook failures are logged and answered with the original message so the
//! tool never stalls waiting for a reply. Malformed lines and unknown events
//! close the connection.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use contract_hooks_core::{HookError, Result};
use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::{Framed, LinesCodec, LinesCodecError};
use tracing::{debug, info, warn};

use crate::dispatcher::HookDispatcher;
use crate::protocol::{HookMessage, handle_message};
use crate::registry::HookRegistry;

/// Longest message line accepted, in bytes.
pub const MAX_LINE_LENGTH: usize = 8 * 1024 * 1024;

/// Hooks-handler bound to a TCP port.
pub struct HookServer {
    listener: TcpListener,
    registry: Arc<HookRegistry>,
}

impl HookServer {
    /// Bind to `addr` (port `0` picks a free port).
    pub async fn bind(addr: &str, registry: HookRegistry) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            registry: Arc::new(registry),
        })
    }

    /// Address actually bound.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// The registry every connection dispatches from.
    pub fn registry(&self) -> Arc<HookRegistry> {
        Arc::clone(&self.registry)
    }

    /// Accept connections until `shutdown` resolves.
    pub async fn serve_with_shutdown<S>(self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        let local_addr = self.local_addr()?;
        info!(addr = %local_addr, hooks = self.registry.count(), "Hooks handler listening");

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Hooks handler shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = accepted?;
                    debug!(peer = %peer, "Tool connected");
                    let dispatcher = HookDispatcher::from_shared(Arc::clone(&self.registry));
                    let _handle = tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, &dispatcher).await {
                            warn!(peer = %peer, error = %e, "Connection closed with error");
                        }
                        info!(peer = %peer, hook_lines = dispatcher.log().len(), "Run finished");
                    });
                }
            }
        }
    }

    /// Accept connections until Ctrl-C.
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await
    }
}

impl std::fmt::Debug for HookServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookServer")
            .field("local_addr", &self.listener.local_addr().ok())
            .field("registry", &self.registry)
            .finish()
    }
}

/// Serve one connection until the tool hangs up.
pub async fn handle_connection(stream: TcpStream, dispatcher: &HookDispatcher) -> Result<()> {
    let mut framed = Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));

    while let Some(line) = framed.next().await {
        let line = line.map_err(codec_error)?;
        if line.trim().is_empty() {
            continue;
        }

        let message = HookMessage::parse(&line)?;
        let reply = match handle_message(dispatcher, message.clone()) {
            Ok(reply) => reply,
            Err(e @ HookError::Handler { .. }) => {
                warn!(uuid = %message.uuid, event = %message.event, error = %e, "Hook failed, echoing message");
                message
            }
            Err(e) => return Err(e),
        };

        debug!(uuid = %reply.uuid, event = %reply.event, "Replying");
        framed.send(reply.to_line()?).await.map_err(codec_error)?;
    }

    Ok(())
}

fn codec_error(e: LinesCodecError) -> HookError {
    match e {
        LinesCodecError::Io(io) => HookError::Io(io),
        LinesCodecError::MaxLineLengthExceeded => {
            HookError::Protocol("message exceeds maximum line length".to_string())
        }
    }
}
