use crate::{deserialize_buffer, serialize_reply, Frame, ProtocolError, Reply};
use async_trait::async_trait;
use mockall::automock;
use thiserror::Error as ThisError;
use tokio::io::{self, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Failure while reading the next frame. Protocol violations and
/// transport errors close the connection through different paths, so
/// they stay distinguishable.
#[derive(Debug, ThisError)]
pub enum ReadError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// `mockall` must be a regular dependency: integration tests under
/// tests/ compile the library outside test mode, which would disable a
/// `cfg_attr`-gated automock.
///
/// Refer to:
/// https://stackoverflow.com/q/76831451
/// https://github.com/rust-lang/cargo/issues/2911
#[automock]
#[async_trait]
pub trait ConnectionBase: Send + Sync {
    async fn read_frame(&mut self) -> Result<Option<Frame>, ReadError>;

    async fn write_reply(&mut self, reply: &Reply) -> io::Result<()>;
}

/// Reads frames from and writes replies to the underlying `TcpStream`
/// established between the client and the server.
///
/// Incoming bytes accumulate in an internal buffer until the decoder
/// finds one complete frame; that frame's bytes are then drained so
/// the next read starts exactly at the following frame, which is what
/// lets clients pipeline frames back-to-back.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,

    // The buffer for reading frames.
    buffer: Vec<u8>,
}

impl Connection {
    pub fn new(socket: TcpStream) -> Connection {
        Connection {
            stream: socket,
            // 4KB to start with; reallocates for larger frames.
            buffer: Vec::with_capacity(4 * 1024),
        }
    }
}

#[async_trait]
impl ConnectionBase for Connection {
    async fn read_frame(&mut self) -> Result<Option<Frame>, ReadError> {
        loop {
            // A partial frame decodes to `None`; keep reading until the
            // buffer holds a complete one. Malformed bytes fail here.
            if let Some((frame, frame_size)) = deserialize_buffer(&self.buffer)? {
                self.buffer.drain(0..frame_size);
                return Ok(Some(frame));
            }

            // `0` bytes read marks the end of the stream.
            if self.stream.read_buf(&mut self.buffer).await? == 0 {
                if self.buffer.is_empty() {
                    // Clean shutdown between frames.
                    return Ok(None);
                }

                // The peer closed the stream in the middle of a frame.
                return Err(ReadError::Protocol(ProtocolError::UnexpectedEof));
            }
        }
    }

    /// Serializes the reply and writes the whole buffer to the stream.
    async fn write_reply(&mut self, reply: &Reply) -> io::Result<()> {
        let data = serialize_reply(reply);
        self.stream.write_all(&data).await?;

        // Make sure that any buffered contents are written.
        self.stream.flush().await
    }
}
