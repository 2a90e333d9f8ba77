//! Relay submission handlers.

use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header, StatusCode},
    response::Html,
    Form, Json,
};
use serde_json::{Map, Value};

use crate::relay::{RelayDispatcher, Submission};
use crate::web::dto::{ApiResponse, MessageResponse};
use crate::web::error::ApiError;

use super::AppState;

/// Static page returned to GET requests against a relay endpoint.
const METHOD_NOT_ALLOWED_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Method Not Allowed</title>
</head>
<body>
  <h1>Method Not Allowed</h1>
  <p>This endpoint only accepts <code>POST</code> requests.</p>
  <p>Please send your data using JSON or form encoding.</p>
</body>
</html>
"#;

/// POST /:clientId - relay a form submission.
///
/// Accepts JSON, urlencoded, or multipart bodies. Rate limiting has
/// already happened in middleware by the time this runs.
pub async fn relay_submit(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
    request: Request,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(|origin| origin.to_string());

    let fields = extract_fields(request).await?;

    let submission = Submission {
        client_id,
        origin,
        fields,
    };

    RelayDispatcher::new(&state.db, &state.mailer)
        .dispatch(&submission)
        .await?;

    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Email sent successfully",
    ))))
}

/// GET /:clientId - always rejected; forms must POST.
pub async fn relay_method_not_allowed() -> (StatusCode, Html<&'static str>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Html(METHOD_NOT_ALLOWED_PAGE),
    )
}

/// Decode the submission body into a field map based on content type.
async fn extract_fields(request: Request) -> Result<Map<String, Value>, ApiError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("application/json") {
        let Json(fields) = Json::<Map<String, Value>>::from_request(request, &())
            .await
            .map_err(|_| ApiError::bad_request("Invalid submission payload"))?;
        return Ok(fields);
    }

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|_| ApiError::bad_request("Invalid submission payload"))?;

        let mut fields = Map::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| ApiError::bad_request("Invalid submission payload"))?
        {
            let name = match field.name() {
                Some(name) => name.to_string(),
                None => continue,
            };
            let text = field
                .text()
                .await
                .map_err(|_| ApiError::bad_request("Invalid submission payload"))?;
            fields.insert(name, Value::String(text));
        }
        return Ok(fields);
    }

    // Urlencoded forms, the plain-HTML default.
    let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, &())
        .await
        .map_err(|_| ApiError::bad_request("Invalid submission payload"))?;

    Ok(pairs
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect())
}
