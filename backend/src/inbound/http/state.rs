//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see the domain's
//! driving port, which keeps them testable without a database.

use std::sync::Arc;

use crate::domain::ports::UserRecords;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub user_records: Arc<dyn UserRecords>,
}

impl HttpState {
    pub fn new(user_records: Arc<dyn UserRecords>) -> Self {
        Self { user_records }
    }
}
