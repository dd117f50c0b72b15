//! Human-readable messages for failed API calls.

use boulders_core::api::HttpError;
use serde::Serialize;
use serde_json::Value;

/// What the member was doing when the call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureContext {
    #[default]
    General,
    Login,
    PersonalInfo,
    Payment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserMessage {
    pub title: String,
    /// Text taken from the upstream error envelope, when it carried any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

pub fn describe_failure(error: &HttpError, context: FailureContext) -> UserMessage {
    let title = match (error.status(), context) {
        (0, _) => "We could not reach the server. Check your connection and try again.",
        (400, _) => "Some of the submitted information is invalid. Please review it and try again.",
        (401, FailureContext::Login) => "Wrong email or password.",
        (401, _) => "Your session has expired. Please log in again.",
        (403, _) => "You are not allowed to perform this action.",
        (404, _) => "The requested resource could not be found.",
        (409, FailureContext::PersonalInfo) => "An account with this email already exists.",
        (409, _) => "This request conflicts with existing data.",
        (422, FailureContext::Payment) => "The payment could not be started with the given details.",
        (422, _) => "The submitted information could not be processed.",
        (429, _) => "Too many attempts. Please wait a moment and try again.",
        (500..=599, _) => "The server ran into a problem. Please try again later.",
        _ => "Something went wrong. Please try again.",
    };

    UserMessage {
        title: title.to_string(),
        detail: error.data().and_then(envelope_text),
    }
}

fn envelope_text(data: &Value) -> Option<String> {
    ["message", "error", "detail"].iter().find_map(|key| {
        data.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    })
}
