use crate::connection::ReadError;
use crate::{cmd::Command, Connection, ConnectionBase, Frame, Reply, SharedStore};
use tokio::net::TcpListener;
use tracing::{error, info};

/// Server listener state. Accepts inbound connections and spawns one
/// task per connection, so accepting never waits on an in-flight
/// handler.
#[derive(Debug)]
struct Listener {
    listener: TcpListener,

    /// The data store, threaded into every `ConnectionHandler` at
    /// construction. The caller of `run` owns its creation: there is
    /// no ambient global store.
    store: SharedStore,
}

/// Per-connection handler. Reads frames from `Connection`, dispatches
/// commands against the store, and writes replies in arrival order.
#[derive(Debug)]
struct ConnectionHandler {
    connection: Connection,
    store: SharedStore,
}

impl Listener {
    /// Listen for inbound connections, spawning a tokio task to
    /// process each one.
    ///
    /// Returns `Err` only if accepting fails, e.g. when the operating
    /// system runs out of sockets.
    async fn run(&mut self) -> Result<(), std::io::Error> {
        loop {
            let (socket, peer_address) = self.listener.accept().await?;
            info!("client connected from {}", peer_address);

            let mut handler = ConnectionHandler {
                // Allocates the read buffer used to frame requests.
                connection: Connection::new(socket),

                // An `Arc` internally; a clone only bumps the count.
                store: self.store.clone(),
            };

            tokio::spawn(async move {
                if let Err(err) = handler.run().await {
                    error!("connection error: {}", err);
                }
                info!("client disconnected");
            });
        }
    }
}

impl ConnectionHandler {
    /// Process a single connection to completion.
    ///
    /// A framing failure answers with one generic protocol-error reply
    /// and closes. Semantic failures (arity, unknown command, wrong
    /// type) answer with an error reply and keep the connection alive.
    /// A failed write abandons the connection with no further reads.
    async fn run(&mut self) -> Result<(), ReadError> {
        loop {
            let frame = match self.connection.read_frame().await {
                Ok(Some(frame)) => frame,
                // Clean end-of-input between frames: close, no reply.
                Ok(None) => return Ok(()),
                Err(ReadError::Protocol(err)) => {
                    let reply = Reply::Error("ERR Protocol error".to_string());
                    let _ = self.connection.write_reply(&reply).await;
                    return Err(ReadError::Protocol(err));
                }
                Err(err) => return Err(err),
            };

            // An empty multi-bulk array is a no-op read: nothing to
            // dispatch, no reply owed.
            if let Frame::Command(parts) = &frame {
                if parts.is_empty() {
                    continue;
                }
            }

            match Command::from_frame(frame) {
                Ok(cmd) => cmd.execute(&self.store, &mut self.connection).await?,
                Err(err) => {
                    let reply = Reply::Error(err.to_string());
                    self.connection.write_reply(&reply).await?;
                }
            }
        }
    }
}

/// Run the server on an already-bound listener against the given
/// store.
pub async fn run(listener: TcpListener, store: SharedStore) -> Result<(), std::io::Error> {
    let mut server = Listener { listener, store };

    server.run().await
}
