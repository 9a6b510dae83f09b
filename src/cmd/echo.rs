use crate::cmd::ParseError;
use crate::{ConnectionBase, Reply};
use bytes::Bytes;
use tokio::io;

/// ECHO returns its message as a bulk reply.
#[derive(Debug, Default)]
pub struct Echo {
    msg: Bytes,
}

impl Echo {
    /// Create a new `Echo` command with a `msg`
    pub fn new(msg: Bytes) -> Echo {
        Echo { msg }
    }

    /// Syntax:
    /// ECHO msg
    ///
    /// Arguments past the message are ignored.
    pub fn parse(parts: Vec<Bytes>) -> Result<Echo, ParseError> {
        match parts.into_iter().nth(1) {
            Some(msg) => Ok(Echo::new(msg)),
            None => Err(ParseError::WrongArity("echo")),
        }
    }

    /// Execute the `Echo` command
    pub async fn execute(self, cnxn: &mut dyn ConnectionBase) -> io::Result<()> {
        cnxn.write_reply(&Reply::BulkString(Some(self.msg))).await
    }
}
