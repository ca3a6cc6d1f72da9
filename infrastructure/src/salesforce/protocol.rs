//! Salesforce endpoint layout and REST error bodies

use super::error::SalesforceError;
use serde::Deserialize;

/// Max bytes of an unparseable error body kept in the error message
const MAX_ERROR_BODY: usize = 512;

/// Partner SOAP endpoint under a login or instance URL.
pub fn soap_endpoint(base_url: &str, api_version: &str) -> String {
    format!(
        "{}/services/Soap/u/{}",
        base_url.trim_end_matches('/'),
        api_version
    )
}

fn rest_base(instance_url: &str, api_version: &str) -> String {
    format!(
        "{}/services/data/v{}",
        instance_url.trim_end_matches('/'),
        api_version
    )
}

pub fn query_url(instance_url: &str, api_version: &str) -> String {
    format!("{}/query", rest_base(instance_url, api_version))
}

pub fn search_url(instance_url: &str, api_version: &str) -> String {
    format!("{}/search", rest_base(instance_url, api_version))
}

pub fn describe_url(instance_url: &str, api_version: &str, sobject: &str) -> String {
    format!(
        "{}/sobjects/{}/describe",
        rest_base(instance_url, api_version),
        sobject
    )
}

/// One entry of a REST error response (`[{"message", "errorCode"}]`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestError {
    message: String,
    error_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RestErrorBody {
    List(Vec<RestError>),
    Single(RestError),
}

/// Convert a non-2xx REST response into an error, keeping the remote
/// `errorCode` when the body has one.
pub fn rest_error(status: u16, body: &str) -> SalesforceError {
    let first = match serde_json::from_str::<RestErrorBody>(body) {
        Ok(RestErrorBody::List(errors)) => errors.into_iter().next(),
        Ok(RestErrorBody::Single(error)) => Some(error),
        Err(_) => None,
    };

    match first {
        Some(error) => SalesforceError::Api {
            code: error.error_code,
            message: error.message,
        },
        None => SalesforceError::Status {
            status,
            body: truncate(body.trim(), MAX_ERROR_BODY),
        },
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
