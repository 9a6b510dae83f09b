pub mod cmd;
pub mod connection;
pub mod data_store;
pub use connection::Connection;
pub use connection::ConnectionBase;
pub use connection::MockConnectionBase;
pub use data_store::Entry;
pub use data_store::GetResult;
pub use data_store::Kind;
pub use data_store::MockStoreBase;
pub use data_store::SharedStore;
pub use data_store::StoreBase;
pub use data_store::Value;
pub mod protocol_handler;
pub use protocol_handler::deserialize_buffer;
pub use protocol_handler::serialize_reply;
pub use protocol_handler::Frame;
pub use protocol_handler::ProtocolError;
pub use protocol_handler::Reply;
pub mod server;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 6379;
