//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the user record endpoints together with their request,
//! response and error schemas. The document backs Swagger UI in debug builds
//! and is exported by `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::user_records::{
    CreateUserRecordRequest, MessageResponse, UpdateUserRecordRequest, UpdateUserRecordResponse,
    UserRecordBody,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roster API",
        description = "CRUD access to student user records keyed by roll number."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::user_records::list_user_records,
        crate::inbound::http::user_records::get_user_record,
        crate::inbound::http::user_records::create_user_record,
        crate::inbound::http::user_records::update_user_record,
        crate::inbound::http::user_records::delete_user_record,
    ),
    components(schemas(
        UserRecordBody,
        CreateUserRecordRequest,
        UpdateUserRecordRequest,
        MessageResponse,
        UpdateUserRecordResponse,
        Error,
        ErrorCode
    )),
    tags(
        (name = "users", description = "Operations on user records")
    )
)]
pub struct ApiDoc;
