use crate::controller::SuccessResponse;
use crate::error::ErrorResponse;
use crate::params::notification::SendNotificationParams;
use crate::{AppState, Error};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use domain::notification as NotificationApi;
use log::*;

/// POST relay a notification to Gotify
#[utoipa::path(
    post,
    path = "/api/send-notification",
    request_body(
        content(
            (SendNotificationParams = "application/json"),
            (SendNotificationParams = "application/x-www-form-urlencoded")
        )
    ),
    responses(
        (status = 200, description = "Gotify accepted the notification", body = SuccessResponse),
        (status = 405, description = "Any method other than POST"),
        (status = 500, description = "Gotify configuration missing or the Gotify call failed", body = ErrorResponse),
    )
)]
pub async fn send(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let params = SendNotificationParams::from_body(content_type, &body);
    debug!("POST send notification: {params:?}");

    NotificationApi::send(&app_state.config, params.into()).await?;

    Ok((StatusCode::OK, Json(SuccessResponse::ok())))
}

/// Any method other than POST on the relay route.
pub async fn method_not_allowed(method: Method) -> impl IntoResponse {
    debug!("Rejecting {method} on the notification relay");
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        format!("Method {method} Not Allowed"),
    )
}
