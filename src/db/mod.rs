pub mod manager;
pub mod mongo;

pub use manager::{ConnectionError, ConnectionManager, Connector};
pub use mongo::MongoConnector;
