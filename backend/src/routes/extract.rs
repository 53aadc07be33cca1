//! Request extractors shared by the route modules

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has passed its `validator` rules
///
/// Malformed JSON is a 400 with the parser's message; rule failures are a
/// 400 listing every failed field.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ApiError::BadRequest(rejection.body_text()))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header::CONTENT_TYPE};
    use devconnector_shared::RegisterRequest;

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let req = json_request(r#"{"name":"Ada","email":"ada@example.com","password":"abcdef"}"#);
        let ValidatedJson(body) = ValidatedJson::<RegisterRequest>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(body.name, "Ada");
    }

    #[tokio::test]
    async fn test_rule_failure_lists_fields() {
        let req = json_request(r#"{"email":"ada@example.com","password":"abc"}"#);
        let err = ValidatedJson::<RegisterRequest>::from_request(req, &())
            .await
            .unwrap_err();

        match err {
            ApiError::Validation(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["name", "password"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let req = json_request("{not json");
        let err = ValidatedJson::<RegisterRequest>::from_request(req, &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
