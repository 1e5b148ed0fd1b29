//! HTTP inbound adapter exposing the user record endpoints.

pub mod error;
pub mod state;
pub mod user_records;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register the user record endpoints and their extractor configuration.
///
/// The caller supplies [`state::HttpState`] through `app_data`.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::{App, web};
/// use roster::domain::UserRecordService;
/// use roster::domain::ports::FixtureUserRecordConnectionProvider;
/// use roster::inbound::http::{configure, state::HttpState};
///
/// let service = UserRecordService::new(Arc::new(FixtureUserRecordConnectionProvider::new()));
/// let app = App::new()
///     .app_data(web::Data::new(HttpState::new(Arc::new(service))))
///     .configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::path_config())
        .service(user_records::list_user_records)
        .service(user_records::get_user_record)
        .service(user_records::create_user_record)
        .service(user_records::update_user_record)
        .service(user_records::delete_user_record);
}
