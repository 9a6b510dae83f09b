use crate::cmd::ParseError;
use crate::{ConnectionBase, Reply, StoreBase};
use bytes::Bytes;
use tokio::io;

/// The DEL operation.
#[derive(Debug)]
pub struct Del {
    // The keys to remove
    keys: Vec<Bytes>,
}

impl Del {
    /// Create a new `Del` command
    pub fn new(keys: Vec<Bytes>) -> Del {
        Del { keys }
    }

    /// Syntax:
    /// DEL key [key ...]
    pub fn parse(parts: Vec<Bytes>) -> Result<Del, ParseError> {
        if parts.len() < 2 {
            return Err(ParseError::WrongArity("del"));
        }

        Ok(Del::new(parts[1..].to_vec()))
    }

    /// Execute the `Del` command
    ///
    /// Returns an integer reply counting the keys that existed
    /// immediately before removal.
    pub async fn execute(
        self,
        store: &dyn StoreBase,
        cnxn: &mut dyn ConnectionBase,
    ) -> io::Result<()> {
        let removed = store.del(self.keys);

        cnxn.write_reply(&Reply::Integer(removed as i64)).await
    }
}
