use serde::Serialize;
use utoipa::ToSchema;

pub(crate) mod health_check_controller;
pub(crate) mod notification_controller;

/// Body returned once Gotify has accepted a notification.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct SuccessResponse {
    success: bool,
}

impl SuccessResponse {
    pub(crate) fn ok() -> Self {
        Self { success: true }
    }
}
