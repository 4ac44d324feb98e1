//! Application-level error detection in provider bodies.

use serde_json::Value;

use beacon_core::Provider;

fn text(value: &Value) -> String {
    value.as_str().map_or_else(|| value.to_string(), str::to_string)
}

/// Message of an application-level error carried by a well-formed body.
///
/// OMDb signals errors with an `Error` field; Douban answers
/// `{"code": .., "msg": ..}`.
pub fn rejection(provider: Provider, body: &Value) -> Option<String> {
    match provider {
        Provider::Omdb => body.get("Error").map(text),
        Provider::Douban | Provider::DoubanSearch => match (body.get("code"), body.get("msg")) {
            (Some(code), Some(msg)) => Some(format!("{} ({})", text(msg), text(code))),
            _ => None,
        },
    }
}
