use domain::notification::NotificationRequest;
use serde_json::{Map, Value};
use utoipa::ToSchema;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Body of `POST /api/send-notification`.
///
/// Both fields are passed to Gotify exactly as received, whatever their JSON
/// type; only a missing key is left out.
///
/// # Fields
///
/// * `message` - The notification body
/// * `title` - The notification title
#[derive(Debug, Default, PartialEq, ToSchema)]
pub(crate) struct SendNotificationParams {
    #[schema(value_type = Option<String>, example = "The build finished")]
    pub(crate) message: Option<Value>,
    #[schema(value_type = Option<String>, example = "CI")]
    pub(crate) title: Option<Value>,
}

impl SendNotificationParams {
    /// Reads `message` and `title` from a raw request body.
    ///
    /// A form-encoded body is decoded when `content_type` says so; anything
    /// else is read as JSON. A body that is neither a form nor a JSON object
    /// reads as both fields absent.
    pub(crate) fn from_body(content_type: Option<&str>, body: &[u8]) -> Self {
        let value = if content_type.is_some_and(is_form) {
            form_object(body)
        } else {
            serde_json::from_slice::<Value>(body).unwrap_or(Value::Null)
        };

        Self {
            message: value.get("message").cloned(),
            title: value.get("title").cloned(),
        }
    }
}

fn is_form(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Decodes `a=1&b=2` into a JSON object. A repeated key collects its values
/// into an array.
fn form_object(body: &[u8]) -> Value {
    let Ok(pairs) = serde_urlencoded::from_bytes::<Vec<(String, String)>>(body) else {
        return Value::Null;
    };

    let mut object = Map::new();
    for (key, value) in pairs {
        match object.get_mut(&key) {
            None => {
                object.insert(key, Value::String(value));
            }
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
        }
    }
    Value::Object(object)
}

impl From<SendNotificationParams> for NotificationRequest {
    fn from(params: SendNotificationParams) -> Self {
        NotificationRequest {
            title: params.title,
            message: params.message,
        }
    }
}
