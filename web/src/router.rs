use crate::controller::{health_check_controller, notification_controller, SuccessResponse};
use crate::error::ErrorResponse;
use crate::{params, AppState};
use axum::{
    routing::{get, post},
    Router,
};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// The OpenAPI document. A path or schema shows up in RapiDoc only if it
// is listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Gotify Relay API"
        ),
        paths(
            health_check_controller::health_check,
            notification_controller::send,
        ),
        components(
            schemas(
                params::notification::SendNotificationParams,
                SuccessResponse,
                ErrorResponse,
            )
        ),
        tags(
            (name = "gotify_relay", description = "Relays notifications to a Gotify server")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(notification_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn notification_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/api/send-notification",
            post(notification_controller::send)
                .fallback(notification_controller::method_not_allowed),
        )
        .with_state(app_state)
}
