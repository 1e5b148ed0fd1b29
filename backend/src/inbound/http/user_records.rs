//! User record API handlers.
//!
//! ```text
//! GET    /users/
//! GET    /users/{rn}
//! POST   /users/      {"rn":101,"na":"Asha","m":88}
//! PUT    /users/{rn}  {"m":92}
//! DELETE /users/{rn}
//! ```

use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, RollNumber, UserRecord, UserRecordPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Wire representation of a user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserRecordBody {
    /// Roll number.
    #[schema(example = 101)]
    pub rn: i32,
    /// Name.
    #[schema(example = "Asha")]
    pub na: String,
    /// Mark.
    #[schema(example = 88)]
    pub m: i32,
}

impl From<UserRecord> for UserRecordBody {
    fn from(record: UserRecord) -> Self {
        Self {
            rn: record.roll_number().get(),
            na: record.name().to_owned(),
            m: record.mark(),
        }
    }
}

/// Request body for `POST /users/`. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRecordRequest {
    #[schema(example = 101)]
    pub rn: i32,
    #[schema(example = "Asha")]
    pub na: String,
    #[schema(example = 88)]
    pub m: i32,
}

impl From<CreateUserRecordRequest> for UserRecord {
    fn from(value: CreateUserRecordRequest) -> Self {
        UserRecord::new(RollNumber::new(value.rn), value.na, value.m)
    }
}

/// Request body for `PUT /users/{rn}`.
///
/// Both fields are optional; an omitted field leaves the stored column
/// untouched. An explicit `null` is rejected because neither column accepts
/// one. Unknown fields, including `rn`, are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRecordRequest {
    #[serde(
        default,
        deserialize_with = "supplied_value",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(example = "Asha")]
    pub na: Option<String>,
    #[serde(
        default,
        deserialize_with = "supplied_value",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(example = 92)]
    pub m: Option<i32>,
}

/// Deserialise a present field, refusing `null`.
///
/// Only runs for keys that appear in the body; absent keys fall back to
/// `None` through `serde(default)`.
fn supplied_value<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<T>::deserialize(deserializer)? {
        Some(value) => Ok(Some(value)),
        None => Err(serde::de::Error::custom(
            "null is not allowed; omit the field to keep its value",
        )),
    }
}

impl From<UpdateUserRecordRequest> for UserRecordPatch {
    fn from(value: UpdateUserRecordRequest) -> Self {
        UserRecordPatch::new(value.na, value.m)
    }
}

/// Acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "User created successfully")]
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

/// Response body for `PUT /users/{rn}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRecordResponse {
    #[schema(example = "User updated successfully")]
    pub message: String,
    pub user: UserRecordBody,
}

/// List every user record.
///
/// Order is whatever the database returns.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use roster::inbound::http::user_records::list_user_records;
///
/// let app = App::new().service(list_user_records);
/// ```
#[utoipa::path(
    get,
    path = "/users/",
    responses(
        (status = 200, description = "All user records", body = [UserRecordBody]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUserRecords"
)]
#[get("/users/")]
pub async fn list_user_records(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<UserRecordBody>>> {
    let records = state.user_records.list().await?;
    Ok(web::Json(
        records.into_iter().map(UserRecordBody::from).collect(),
    ))
}

/// Fetch one user record by roll number.
#[utoipa::path(
    get,
    path = "/users/{rn}",
    params(("rn" = i32, Path, description = "Roll number")),
    responses(
        (status = 200, description = "User record", body = UserRecordBody),
        (status = 404, description = "User not found", body = Error),
        (status = 422, description = "Roll number is not an integer", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUserRecord"
)]
#[get("/users/{rn}")]
pub async fn get_user_record(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<UserRecordBody>> {
    let roll_number = RollNumber::new(path.into_inner());
    let record = state.user_records.get(roll_number).await?;
    Ok(web::Json(record.into()))
}

/// Create a user record.
///
/// Duplicate roll numbers are rejected by the table's primary key and
/// reported as an internal error.
#[utoipa::path(
    post,
    path = "/users/",
    request_body = CreateUserRecordRequest,
    responses(
        (status = 200, description = "User created", body = MessageResponse),
        (status = 422, description = "Invalid request body", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUserRecord"
)]
#[post("/users/")]
pub async fn create_user_record(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRecordRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    state
        .user_records
        .create(payload.into_inner().into())
        .await?;
    Ok(web::Json(MessageResponse::new("User created successfully")))
}

/// Update the supplied fields of a user record.
#[utoipa::path(
    put,
    path = "/users/{rn}",
    params(("rn" = i32, Path, description = "Roll number")),
    request_body = UpdateUserRecordRequest,
    responses(
        (status = 200, description = "User updated", body = UpdateUserRecordResponse),
        (status = 404, description = "User not found", body = Error),
        (status = 422, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUserRecord"
)]
#[put("/users/{rn}")]
pub async fn update_user_record(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<UpdateUserRecordRequest>,
) -> ApiResult<web::Json<UpdateUserRecordResponse>> {
    let roll_number = RollNumber::new(path.into_inner());
    let record = state
        .user_records
        .update(roll_number, payload.into_inner().into())
        .await?;
    Ok(web::Json(UpdateUserRecordResponse {
        message: "User updated successfully".to_owned(),
        user: record.into(),
    }))
}

/// Delete a user record.
#[utoipa::path(
    delete,
    path = "/users/{rn}",
    params(("rn" = i32, Path, description = "Roll number")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found", body = Error),
        (status = 422, description = "Roll number is not an integer", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUserRecord"
)]
#[delete("/users/{rn}")]
pub async fn delete_user_record(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<MessageResponse>> {
    state
        .user_records
        .delete(RollNumber::new(path.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse::new("User deleted successfully")))
}
