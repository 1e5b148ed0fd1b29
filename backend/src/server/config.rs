//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use roster::domain::ports::UserRecords;

/// Everything the HTTP server needs to start listening.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) user_records: Arc<dyn UserRecords>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, user_records: Arc<dyn UserRecords>) -> Self {
        Self {
            bind_addr,
            user_records,
        }
    }
}
