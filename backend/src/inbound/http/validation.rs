//! Request validation for the HTTP adapter.
//!
//! Bodies and path segments are checked by actix extractors before a handler
//! runs. These configs turn extractor failures into the shared [`Error`]
//! payload with status 422, so a malformed request never reaches the user
//! record service.

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "rejected request body");
    Error::invalid_request("request body is invalid")
        .with_details(json!({ "reason": err.to_string() }))
        .into()
}

fn path_error(err: PathError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "rejected path parameter");
    Error::invalid_request("roll number must be an integer")
        .with_details(json!({ "field": "rn", "reason": err.to_string() }))
        .into()
}

/// JSON extractor configuration for user record bodies.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

/// Path extractor configuration for the `{rn}` segment.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Deserialize)]
    struct Body {
        #[expect(dead_code, reason = "only deserialisation is exercised")]
        rn: i32,
    }

    async fn accept(_body: web::Json<Body>, _rn: web::Path<i32>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn call(uri: &str, body: Value) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(json_config())
                .app_data(path_config())
                .route("/items/{rn}", web::post().to(accept)),
        )
        .await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(uri)
                .set_json(body)
                .to_request(),
        )
        .await;
        let status = response.status();
        let bytes = actix_test::read_body(response).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, value)
    }

    #[actix_web::test]
    async fn missing_field_is_unprocessable() {
        let (status, body) = call("/items/1", json!({})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], json!("invalid_request"));
        assert!(
            body["details"]["reason"]
                .as_str()
                .is_some_and(|reason| reason.contains("rn"))
        );
    }

    #[actix_web::test]
    async fn non_integer_path_is_unprocessable() {
        let (status, body) = call("/items/abc", json!({ "rn": 1 })).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"]["field"], json!("rn"));
    }

    #[actix_web::test]
    async fn valid_request_reaches_handler() {
        let (status, _) = call("/items/1", json!({ "rn": 1 })).await;
        assert_eq!(status, StatusCode::OK);
    }
}
