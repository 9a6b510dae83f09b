mod ping;
pub use ping::Ping;

mod echo;
pub use echo::Echo;

mod set;
pub use set::Set;

mod get;
pub use get::Get;

mod del;
pub use del::Del;

use crate::{ConnectionBase, Frame, StoreBase};
use bytes::Bytes;
use thiserror::Error as ThisError;
use tokio::io;

/// The error class for an operation that finds the key holding a kind
/// other than the one it expects.
pub const WRONGTYPE_ERROR: &str =
    "WRONGTYPE Operation against a key holding the wrong kind of value";

/// Methods called on `Command` are delegated to the command
/// implementation. `Command` essentially acts as a catalog.
#[derive(Debug)]
pub enum Command {
    Ping(Ping),
    Echo(Echo),
    Set(Set),
    Get(Get),
    Del(Del),
}

/// A recoverable dispatch failure. The `Display` text is the exact
/// error line sent back to the client, after which the connection
/// keeps reading; only framing failures close a connection.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ParseError {
    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(&'static str),
    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),
    #[error("ERR unexpected {0} frame")]
    UnexpectedFrame(&'static str),
}

impl Command {
    /// Resolve a decoded frame into a command. Names match
    /// case-insensitively; arguments pass through untouched and
    /// binary-safe.
    pub fn from_frame(frame: Frame) -> Result<Command, ParseError> {
        let parts: Vec<Bytes> = match frame {
            Frame::Command(parts) => parts,
            Frame::Error(_) => return Err(ParseError::UnexpectedFrame("error")),
            Frame::Integer(_) => return Err(ParseError::UnexpectedFrame("integer")),
        };

        let name = match parts.first() {
            Some(name) => String::from_utf8_lossy(name).to_lowercase(),
            None => return Err(ParseError::UnknownCommand(String::new())),
        };

        let cmd = match name.as_str() {
            "ping" => Command::Ping(Ping::parse(parts)?),
            "echo" => Command::Echo(Echo::parse(parts)?),
            "set" => Command::Set(Set::parse(parts)?),
            "get" => Command::Get(Get::parse(parts)?),
            "del" => Command::Del(Del::parse(parts)?),
            _ => return Err(ParseError::UnknownCommand(name)),
        };

        Ok(cmd)
    }

    /// Execute the command to completion: consult the store where the
    /// command needs it and write the reply to the connection. The
    /// only failure is a failed write, which is fatal to the
    /// connection.
    pub async fn execute(
        self,
        store: &dyn StoreBase,
        cnxn: &mut dyn ConnectionBase,
    ) -> io::Result<()> {
        match self {
            Command::Ping(cmd) => cmd.execute(cnxn).await,
            Command::Echo(cmd) => cmd.execute(cnxn).await,
            Command::Set(cmd) => cmd.execute(store, cnxn).await,
            Command::Get(cmd) => cmd.execute(store, cnxn).await,
            Command::Del(cmd) => cmd.execute(store, cnxn).await,
        }
    }
}
