//! Response helpers.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;

use crate::error::WebError;
use crate::Response;

/// Serializes `data` as a JSON response with the given status.
///
/// # Errors
///
/// Returns [`WebError::Serialization`] if the payload cannot be encoded.
pub fn respond_json<T: Serialize>(status: StatusCode, data: &T) -> Result<Response, WebError> {
    let body = serde_json::to_vec(data)?;
    let response = http::Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))?;
    Ok(response)
}

/// A plain-text response, used for error pages and fallbacks.
#[must_use]
pub fn respond_text(status: StatusCode, text: &str) -> Response {
    http::Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(text.to_string())))
        .unwrap_or_else(|_| {
            let mut fallback = http::Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Payload {
        greeting: &'static str,
    }

    #[tokio::test]
    async fn test_respond_json_sets_content_type() {
        let response = respond_json(StatusCode::OK, &Payload { greeting: "hi" }).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from(r#"{"greeting":"hi"}"#));
    }

    #[test]
    fn test_respond_text() {
        let response = respond_text(StatusCode::NOT_FOUND, "no such route");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
