use crate::cmd::ParseError;
use crate::{ConnectionBase, Reply, StoreBase};
use bytes::Bytes;
use tokio::io;

/// The classic SET operation: unconditional insert-or-overwrite of a
/// string entry.
#[derive(Debug)]
pub struct Set {
    // The key to store at
    key: Bytes,

    // The value to be stored
    value: Bytes,
}

impl Set {
    /// Create a new `Set` command
    pub fn new(key: Bytes, value: Bytes) -> Set {
        Set { key, value }
    }

    /// Syntax:
    /// SET key value
    pub fn parse(parts: Vec<Bytes>) -> Result<Set, ParseError> {
        if parts.len() != 3 {
            return Err(ParseError::WrongArity("set"));
        }

        Ok(Set::new(parts[1].clone(), parts[2].clone()))
    }

    /// Execute the `Set` command, forwarding the store's fixed
    /// acknowledgement as the status text.
    pub async fn execute(
        self,
        store: &dyn StoreBase,
        cnxn: &mut dyn ConnectionBase,
    ) -> io::Result<()> {
        let ack = store.set(self.key, self.value);

        cnxn.write_reply(&Reply::SimpleString(ack.to_string())).await
    }
}
