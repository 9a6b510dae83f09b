use crate::cmd::{ParseError, WRONGTYPE_ERROR};
use crate::{ConnectionBase, GetResult, Reply, StoreBase};
use bytes::Bytes;
use tokio::io;

/// The classic GET operation.
#[derive(Debug)]
pub struct Get {
    // The key to look up
    key: Bytes,
}

impl Get {
    /// Create a new `Get` command
    pub fn new(key: Bytes) -> Get {
        Get { key }
    }

    /// Syntax:
    /// GET key
    pub fn parse(parts: Vec<Bytes>) -> Result<Get, ParseError> {
        if parts.len() != 2 {
            return Err(ParseError::WrongArity("get"));
        }

        Ok(Get::new(parts[1].clone()))
    }

    /// Execute the `Get` command
    ///
    /// A missing key answers with a null bulk; a key holding another
    /// kind answers WRONGTYPE rather than pretending the key is
    /// absent.
    pub async fn execute(
        self,
        store: &dyn StoreBase,
        cnxn: &mut dyn ConnectionBase,
    ) -> io::Result<()> {
        let reply = match store.get(self.key) {
            GetResult::Value(data) => Reply::BulkString(Some(data)),
            GetResult::Missing => Reply::BulkString(None),
            GetResult::WrongType => Reply::Error(WRONGTYPE_ERROR.to_string()),
        };

        cnxn.write_reply(&reply).await
    }
}
