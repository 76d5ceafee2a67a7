use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shared::errors::{ErrorCategory, ErrorCode, FieldErrors, ServiceError};
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{resource} not found: {key}")]
    NotFound { resource: &'static str, key: String },

    #[error("Invalid input: {message}")]
    Validation {
        code: ErrorCode,
        message: String,
        fields: FieldErrors,
    },

    #[error("Invalid or missing API key")]
    Unauthorized,

    #[error("Database is not configured")]
    StoreNotConfigured,

    #[error("Row decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// A stored row that does not fit the API's closed types.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("column {column}: {source}")]
    Variant {
        column: &'static str,
        #[source]
        source: shared::ValidationError,
    },

    #[error("money column {column} is half null")]
    PartialMoney { column: &'static str },
}

impl AppError {
    pub fn not_found(resource: &'static str, key: impl std::fmt::Display) -> Self {
        AppError::NotFound {
            resource,
            key: key.to_string(),
        }
    }

    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError::Validation {
            code,
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }

    pub fn invalid_field(
        code: ErrorCode,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let reason = reason.into();
        let mut fields = FieldErrors::new();
        fields.insert(field.clone(), vec![reason.clone()]);
        AppError::Validation {
            code,
            message: format!("{}: {}", field, reason),
            fields,
        }
    }

    fn to_service_error(&self) -> ServiceError {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                match e {
                    sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                        ServiceError::storage_unavailable()
                    }
                    _ => ServiceError::storage_failed(),
                }
            }
            AppError::NotFound { resource, key } => ServiceError::not_found(resource, key),
            AppError::Validation {
                code,
                message,
                fields,
            } => ServiceError::validation(*code, message.clone()).with_fields(fields.clone()),
            AppError::Unauthorized => ServiceError::unauthorized(),
            AppError::StoreNotConfigured => {
                tracing::error!("Storage access attempted with the database disabled");
                ServiceError::store_disabled()
            }
            AppError::Decode(e) => {
                tracing::error!("Row decode error: {}", e);
                ServiceError::internal(ErrorCode::INTERNAL_ROW_DECODE)
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        flatten_validation_errors(&errors, "", &mut fields);
        let message = match fields.keys().next() {
            Some(first) if fields.len() == 1 => format!("Invalid value for {}", first),
            _ => "Request failed validation".to_string(),
        };
        AppError::Validation {
            code: ErrorCode::VALIDATION_INVALID_INPUT,
            message,
            fields,
        }
    }
}

/// Collect nested `validator` errors into dotted field paths.
fn flatten_validation_errors(errors: &ValidationErrors, prefix: &str, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = match (prefix.is_empty(), *field) {
            (true, "__all__") => "body".to_string(),
            (false, "__all__") => prefix.to_string(),
            (true, _) => field.to_string(),
            (false, _) => format!("{}.{}", prefix, field),
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                let reasons = out.entry(path).or_default();
                for error in list {
                    let reason = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    reasons.push(reason);
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                flatten_validation_errors(nested, &path, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    flatten_validation_errors(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error = self.to_service_error();
        let status = StatusCode::from_u16(error.category.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if error.category == ErrorCategory::Validation {
            tracing::warn!(
                error_code = %error.code,
                error_message = %error.message,
                "Request validation failed"
            );
        }

        metrics::counter!(
            "errors_total",
            "category" => format!("{:?}", error.category),
            "code" => error.code.clone()
        )
        .increment(1);

        let body = Json(json!({
            "error": error,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Inner {
        #[validate(range(min = 1))]
        count: i32,
    }

    #[derive(Validate)]
    struct Outer {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
        #[validate]
        inner: Inner,
    }

    #[test]
    fn test_nested_validation_errors_flatten_to_paths() {
        let outer = Outer {
            name: String::new(),
            inner: Inner { count: 0 },
        };
        let error = AppError::from(outer.validate().unwrap_err());
        let AppError::Validation { code, fields, .. } = error else {
            panic!("expected a validation error");
        };
        assert_eq!(code, ErrorCode::VALIDATION_INVALID_INPUT);
        assert_eq!(fields["name"], vec!["must not be empty".to_string()]);
        assert_eq!(fields["inner.count"], vec!["range".to_string()]);
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::not_found("Team", 1), StatusCode::NOT_FOUND),
            (AppError::StoreNotConfigured, StatusCode::SERVICE_UNAVAILABLE),
            (
                AppError::validation(ErrorCode::VALIDATION_INVALID_INPUT, "bad"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_undecodable_row_is_an_internal_error() {
        let error = AppError::from(DecodeError::PartialMoney { column: "stake" });
        let service_error = error.to_service_error();
        assert_eq!(service_error.code, "INTERNAL_ROW_DECODE");
        assert_eq!(service_error.category, ErrorCategory::Internal);
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_pool_timeout_is_reported_as_unavailable() {
        let error = AppError::Database(sqlx::Error::PoolTimedOut).to_service_error();
        assert_eq!(error.code, "STORAGE_UNAVAILABLE");
        let error = AppError::Database(sqlx::Error::RowNotFound).to_service_error();
        assert_eq!(error.code, "STORAGE_QUERY_FAILED");
    }
}
