use crate::cmd::ParseError;
use crate::{ConnectionBase, Reply};
use bytes::Bytes;
use tokio::io;

/// PING, with an optional message echoed back as the status text.
#[derive(Debug, Default)]
pub struct Ping {
    msg: Option<Bytes>,
}

impl Ping {
    /// Create a new `Ping` command
    pub fn new(msg: Option<Bytes>) -> Ping {
        Ping { msg }
    }

    /// Syntax:
    /// PING [msg]
    ///
    /// Arguments past the message are ignored.
    pub fn parse(parts: Vec<Bytes>) -> Result<Ping, ParseError> {
        Ok(Ping::new(parts.into_iter().nth(1)))
    }

    /// Execute the `Ping` command and return PONG, or the message if
    /// one was given.
    pub async fn execute(self, cnxn: &mut dyn ConnectionBase) -> io::Result<()> {
        let text = match &self.msg {
            Some(msg) => String::from_utf8_lossy(msg).into_owned(),
            None => "PONG".to_string(),
        };

        cnxn.write_reply(&Reply::SimpleString(text)).await
    }
}
