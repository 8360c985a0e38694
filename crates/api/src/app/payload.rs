//! Request body extraction for product payloads.
//!
//! Bodies arrive either as JSON or as `application/x-www-form-urlencoded`
//! pairs. Form pairs become a JSON object of strings (the last value wins for
//! a repeated key), so both encodings go through the same validator.
//! Anything unreadable becomes `null`, which the validator rejects.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
    Form, Json,
};
use serde_json::{Map, Value};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A product payload as an untyped JSON value, ready for validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload(pub Value);

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(req.headers()) {
            let value = match Form::<Vec<(String, String)>>::from_request(req, state).await {
                Ok(Form(pairs)) => form_object(pairs),
                Err(rejection) => {
                    tracing::debug!(%rejection, "request body is not a readable form");
                    Value::Null
                }
            };
            return Ok(Self(value));
        }

        let value = match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => value,
            Err(rejection) => {
                tracing::debug!(%rejection, "request body is not readable JSON");
                Value::Null
            }
        };
        Ok(Self(value))
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

fn form_object(pairs: Vec<(String, String)>) -> Value {
    let object: Map<String, Value> = pairs
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    Value::Object(object)
}
