use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use shared::errors::ErrorCode;
use validator::Validate;

use crate::errors::AppError;

/// JSON body extractor that runs `validator` rules after deserialization
///
/// Both deserialization failures (missing fields, unknown enum values, wrong
/// types) and rule violations (ranges, precision, lengths) become a 422
/// validation error carrying the offending field path, before any handler
/// code touches storage.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => describe_data_error(&e.body_text()),
            JsonRejection::JsonSyntaxError(_) => AppError::validation(
                ErrorCode::VALIDATION_MALFORMED_BODY,
                "Invalid request body: failed to parse JSON",
            ),
            JsonRejection::MissingJsonContentType(_) => AppError::validation(
                ErrorCode::VALIDATION_MALFORMED_BODY,
                "Expected request with `Content-Type: application/json`",
            ),
            other => AppError::validation(ErrorCode::VALIDATION_MALFORMED_BODY, other.body_text()),
        }
    }
}

/// Turn serde's message (`stake.currency: unknown variant ... at line 1 column 9`)
/// into a field path and a reason.
fn describe_data_error(text: &str) -> AppError {
    let detail = text
        .split_once("target type: ")
        .map(|(_, detail)| detail)
        .unwrap_or(text);
    let detail = detail
        .rsplit_once(" at line ")
        .map(|(detail, _)| detail)
        .unwrap_or(detail);

    let (path, reason) = match detail.split_once(": ") {
        Some((path, reason)) if !path.contains(' ') => (Some(path), reason),
        _ => (None, detail),
    };

    if let Some(field) = missing_field(reason) {
        let field = match path {
            Some(path) => format!("{}.{}", path, field),
            None => field.to_string(),
        };
        return AppError::invalid_field(ErrorCode::VALIDATION_MISSING_FIELD, field, "field required");
    }

    AppError::invalid_field(
        ErrorCode::VALIDATION_INVALID_INPUT,
        path.unwrap_or("body"),
        reason,
    )
}

fn missing_field(reason: &str) -> Option<&str> {
    reason
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
}

/// Path extractor whose failures use the standard error body
pub struct ValidatedPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| {
                AppError::invalid_field(
                    ErrorCode::VALIDATION_INVALID_PATH,
                    "path",
                    rejection.body_text(),
                )
            })?;
        Ok(ValidatedPath(value))
    }
}

/// Query-string extractor whose failures use the standard error body
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| {
                AppError::invalid_field(
                    ErrorCode::VALIDATION_INVALID_QUERY,
                    "query",
                    rejection.body_text(),
                )
            })?;
        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields_of(error: AppError) -> (ErrorCode, Vec<(String, Vec<String>)>) {
        match error {
            AppError::Validation { code, fields, .. } => (code, fields.into_iter().collect()),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_path_and_reason_are_split() {
        let (code, fields) = fields_of(describe_data_error(
            "Failed to deserialize the JSON body into the target type: stake.currency: \
             unknown variant `JPY`, expected one of `USD`, `GBP`, `EUR` at line 1 column 40",
        ));
        assert_eq!(code, ErrorCode::VALIDATION_INVALID_INPUT);
        assert_eq!(fields[0].0, "stake.currency");
        assert!(fields[0].1[0].starts_with("unknown variant `JPY`"));
    }

    #[test]
    fn test_missing_field_at_root() {
        let (code, fields) = fields_of(describe_data_error(
            "Failed to deserialize the JSON body into the target type: \
             missing field `country` at line 1 column 17",
        ));
        assert_eq!(code, ErrorCode::VALIDATION_MISSING_FIELD);
        assert_eq!(fields[0].0, "country");
    }

    #[test]
    fn test_missing_nested_field() {
        let (code, fields) = fields_of(describe_data_error(
            "Failed to deserialize the JSON body into the target type: \
             balance: missing field `currency` at line 1 column 30",
        ));
        assert_eq!(code, ErrorCode::VALIDATION_MISSING_FIELD);
        assert_eq!(fields[0].0, "balance.currency");
    }
}
